//! A 2D grid stored as a flat row-major array, with independently
//! configurable wraparound per axis.

use crate::topology::wrap_coord;

/// A 2D tile grid. Both axes can wrap toroidally, independently.
#[derive(Clone)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    pub wrap_x: bool,
    pub wrap_y: bool,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize, wrap_x: bool, wrap_y: bool) -> Self {
        Self {
            width,
            height,
            wrap_x,
            wrap_y,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, wrap_x: bool, wrap_y: bool, value: T) -> Self {
        Self {
            width,
            height,
            wrap_x,
            wrap_y,
            data: vec![value; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Look up a possibly out-of-bounds position, wrapping per-axis where
    /// enabled. Returns `None` past a non-wrapping edge.
    pub fn get_wrapped(&self, x: i64, y: i64) -> Option<&T> {
        let (x, y) = self.resolve(x, y)?;
        Some(self.get(x, y))
    }

    /// Resolve a possibly out-of-bounds position to in-bounds coordinates.
    pub fn resolve(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let x = wrap_coord(x, self.width, self.wrap_x)?;
        let y = wrap_coord(y, self.height, self.wrap_y)?;
        Some((x, y))
    }

    /// 4-connected neighbors, wrap-aware per axis. Up to 4 results.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(4);
        let candidates = [
            (x as i64 - 1, y as i64),
            (x as i64 + 1, y as i64),
            (x as i64, y as i64 - 1),
            (x as i64, y as i64 + 1),
        ];
        for (nx, ny) in candidates {
            if let Some(pos) = self.resolve(nx, ny) {
                result.push(pos);
            }
        }
        result
    }

    /// Iterate over all cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates, row-major.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}
