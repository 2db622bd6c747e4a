//! Seeded simplex noise in 2, 3 and 4 dimensions, plus a sampler that makes
//! the field seamless across wrapping grid axes.
//!
//! Wrapping works by circular embedding: a wrapping axis is not sampled along
//! a line but around a circle (`sin`/`cos` of the normalized coordinate), so
//! the field closes on itself exactly at the seam. Each wrapping axis costs
//! one extra noise dimension: no wrap = 2D, one axis = 3D, both axes = 4D.

use rand::Rng;

// =============================================================================
// SKEW / UNSKEW CONSTANTS
// =============================================================================

// 2D: skew onto a triangular lattice.
const F2: f64 = 0.36602540378443865; // 0.5 * (sqrt(3) - 1)
const G2: f64 = 0.21132486540518713; // (3 - sqrt(3)) / 6

// 3D: tetrahedral lattice.
const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

// 4D: 4-simplex lattice.
const F4: f64 = 0.30901699437494745; // (sqrt(5) - 1) / 4
const G4: f64 = 0.1381966011250105; // (5 - sqrt(5)) / 20

// Radial falloff starting values per dimension.
const FALLOFF_2D: f64 = 0.5;
const FALLOFF_3D: f64 = 0.6;
const FALLOFF_4D: f64 = 0.6;

// Output scale per dimension, chosen so the summed contributions land near
// [-1, 1] before the final 0.5 bias maps them near [0, 1].
const SCALE_2D: f64 = 70.0;
const SCALE_3D: f64 = 32.0;
const SCALE_4D: f64 = 27.0;

/// Gradient directions for 2D and 3D: midpoints of cube edges.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Gradient directions for 4D: one zero component, the rest ±1.
const GRAD4: [[f64; 4]; 32] = [
    [0.0, 1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, -1.0],
    [0.0, 1.0, -1.0, 1.0],
    [0.0, 1.0, -1.0, -1.0],
    [0.0, -1.0, 1.0, 1.0],
    [0.0, -1.0, 1.0, -1.0],
    [0.0, -1.0, -1.0, 1.0],
    [0.0, -1.0, -1.0, -1.0],
    [1.0, 0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, -1.0],
    [1.0, 0.0, -1.0, 1.0],
    [1.0, 0.0, -1.0, -1.0],
    [-1.0, 0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0, 1.0],
    [-1.0, 0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, -1.0],
    [1.0, -1.0, 0.0, 1.0],
    [1.0, -1.0, 0.0, -1.0],
    [-1.0, 1.0, 0.0, 1.0],
    [-1.0, 1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0, 1.0],
    [-1.0, -1.0, 0.0, -1.0],
    [1.0, 1.0, 1.0, 0.0],
    [1.0, 1.0, -1.0, 0.0],
    [1.0, -1.0, 1.0, 0.0],
    [1.0, -1.0, -1.0, 0.0],
    [-1.0, 1.0, 1.0, 0.0],
    [-1.0, 1.0, -1.0, 0.0],
    [-1.0, -1.0, 1.0, 0.0],
    [-1.0, -1.0, -1.0, 0.0],
];

/// Corner traversal order for the 4D simplex, indexed by six pairwise
/// coordinate comparison bits. Only 24 of the 64 entries are valid orderings;
/// the impossible bit patterns hold zeros and are never hit.
const SIMPLEX_4D: [[usize; 4]; 64] = [
    [0, 1, 2, 3], [0, 1, 3, 2], [0, 0, 0, 0], [0, 2, 3, 1],
    [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [1, 2, 3, 0],
    [0, 2, 1, 3], [0, 0, 0, 0], [0, 3, 1, 2], [0, 3, 2, 1],
    [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [1, 3, 2, 0],
    [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0],
    [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0],
    [1, 2, 0, 3], [0, 0, 0, 0], [1, 3, 0, 2], [0, 0, 0, 0],
    [0, 0, 0, 0], [0, 0, 0, 0], [2, 3, 0, 1], [2, 3, 1, 0],
    [1, 0, 2, 3], [1, 0, 3, 2], [0, 0, 0, 0], [0, 0, 0, 0],
    [0, 0, 0, 0], [2, 0, 3, 1], [0, 0, 0, 0], [2, 1, 3, 0],
    [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0],
    [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0],
    [2, 0, 1, 3], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0],
    [3, 0, 1, 2], [3, 0, 2, 1], [0, 0, 0, 0], [3, 1, 2, 0],
    [2, 1, 0, 3], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0],
    [3, 1, 0, 2], [0, 0, 0, 0], [3, 2, 0, 1], [3, 2, 1, 0],
];

// =============================================================================
// SIMPLEX NOISE
// =============================================================================

/// Gridded gradient noise over a skewed simplex lattice.
///
/// Gradient selection hashes lattice coordinates through a shuffled
/// permutation table. The table is doubled to 512 entries so nested lookups
/// never need an explicit modulus.
pub struct SimplexNoise {
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Build a noise field with a permutation table shuffled from `rng`.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut table = [0u8; 256];
        for (i, v) in table.iter_mut().enumerate() {
            *v = i as u8;
        }
        // Fisher-Yates
        for i in (1..256).rev() {
            let j = rng.gen_range(0..=i);
            table.swap(i, j);
        }
        let mut perm = [0u8; 512];
        for i in 0..512 {
            perm[i] = table[i & 255];
        }
        Self { perm }
    }

    fn hash(&self, idx: usize) -> usize {
        self.perm[idx] as usize
    }

    /// 2D simplex noise, output near [0, 1].
    pub fn noise2(&self, x: f64, y: f64) -> f64 {
        // Skew into lattice space to find the containing cell.
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        // Unskew back to get the cell origin in input space.
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Which of the two triangles are we in?
        let (i1, j1) = if x0 > y0 { (1.0, 0.0) } else { (0.0, 1.0) };

        let x1 = x0 - i1 + G2;
        let y1 = y0 - j1 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let gi0 = self.hash(ii + self.hash(jj)) % 12;
        let gi1 = self.hash(ii + i1 as usize + self.hash(jj + j1 as usize)) % 12;
        let gi2 = self.hash(ii + 1 + self.hash(jj + 1)) % 12;

        let mut total = 0.0;
        for (gi, cx, cy) in [(gi0, x0, y0), (gi1, x1, y1), (gi2, x2, y2)] {
            let t = FALLOFF_2D - cx * cx - cy * cy;
            if t >= 0.0 {
                let t2 = t * t;
                let g = &GRAD3[gi];
                total += t2 * t2 * (g[0] * cx + g[1] * cy);
            }
        }
        0.5 + 0.5 * (SCALE_2D * total)
    }

    /// 3D simplex noise, output near [0, 1].
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Rank the offsets to pick the traversal order of the simplex
        // corners: six possible orderings from three comparisons.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f64 + G3;
        let y1 = y0 - j1 as f64 + G3;
        let z1 = z0 - k1 as f64 + G3;
        let x2 = x0 - i2 as f64 + 2.0 * G3;
        let y2 = y0 - j2 as f64 + 2.0 * G3;
        let z2 = z0 - k2 as f64 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;
        let gi0 = self.hash(ii + self.hash(jj + self.hash(kk))) % 12;
        let gi1 = self.hash(ii + i1 + self.hash(jj + j1 + self.hash(kk + k1))) % 12;
        let gi2 = self.hash(ii + i2 + self.hash(jj + j2 + self.hash(kk + k2))) % 12;
        let gi3 = self.hash(ii + 1 + self.hash(jj + 1 + self.hash(kk + 1))) % 12;

        let mut total = 0.0;
        for (gi, cx, cy, cz) in [
            (gi0, x0, y0, z0),
            (gi1, x1, y1, z1),
            (gi2, x2, y2, z2),
            (gi3, x3, y3, z3),
        ] {
            let t = FALLOFF_3D - cx * cx - cy * cy - cz * cz;
            if t >= 0.0 {
                let t2 = t * t;
                let g = &GRAD3[gi];
                total += t2 * t2 * (g[0] * cx + g[1] * cy + g[2] * cz);
            }
        }
        0.5 + 0.5 * (SCALE_3D * total)
    }

    /// 4D simplex noise, output near [0, 1].
    pub fn noise4(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
        let s = (x + y + z + w) * F4;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let l = (w + s).floor();
        let t = (i + j + k + l) * G4;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);
        let w0 = w - (l - t);

        // Six pairwise comparisons index the 64-entry traversal table.
        let c = ((x0 > y0) as usize) << 5
            | ((x0 > z0) as usize) << 4
            | ((y0 > z0) as usize) << 3
            | ((x0 > w0) as usize) << 2
            | ((y0 > w0) as usize) << 1
            | (z0 > w0) as usize;
        let ranks = &SIMPLEX_4D[c];

        // A rank of 3 means that coordinate moves first, 2 second, 1 third.
        let i1 = (ranks[0] >= 3) as usize;
        let j1 = (ranks[1] >= 3) as usize;
        let k1 = (ranks[2] >= 3) as usize;
        let l1 = (ranks[3] >= 3) as usize;
        let i2 = (ranks[0] >= 2) as usize;
        let j2 = (ranks[1] >= 2) as usize;
        let k2 = (ranks[2] >= 2) as usize;
        let l2 = (ranks[3] >= 2) as usize;
        let i3 = (ranks[0] >= 1) as usize;
        let j3 = (ranks[1] >= 1) as usize;
        let k3 = (ranks[2] >= 1) as usize;
        let l3 = (ranks[3] >= 1) as usize;

        let x1 = x0 - i1 as f64 + G4;
        let y1 = y0 - j1 as f64 + G4;
        let z1 = z0 - k1 as f64 + G4;
        let w1 = w0 - l1 as f64 + G4;
        let x2 = x0 - i2 as f64 + 2.0 * G4;
        let y2 = y0 - j2 as f64 + 2.0 * G4;
        let z2 = z0 - k2 as f64 + 2.0 * G4;
        let w2 = w0 - l2 as f64 + 2.0 * G4;
        let x3 = x0 - i3 as f64 + 3.0 * G4;
        let y3 = y0 - j3 as f64 + 3.0 * G4;
        let z3 = z0 - k3 as f64 + 3.0 * G4;
        let w3 = w0 - l3 as f64 + 3.0 * G4;
        let x4 = x0 - 1.0 + 4.0 * G4;
        let y4 = y0 - 1.0 + 4.0 * G4;
        let z4 = z0 - 1.0 + 4.0 * G4;
        let w4 = w0 - 1.0 + 4.0 * G4;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;
        let ll = (l as i64 & 255) as usize;
        let gi0 = self.hash(ii + self.hash(jj + self.hash(kk + self.hash(ll)))) % 32;
        let gi1 =
            self.hash(ii + i1 + self.hash(jj + j1 + self.hash(kk + k1 + self.hash(ll + l1)))) % 32;
        let gi2 =
            self.hash(ii + i2 + self.hash(jj + j2 + self.hash(kk + k2 + self.hash(ll + l2)))) % 32;
        let gi3 =
            self.hash(ii + i3 + self.hash(jj + j3 + self.hash(kk + k3 + self.hash(ll + l3)))) % 32;
        let gi4 = self.hash(ii + 1 + self.hash(jj + 1 + self.hash(kk + 1 + self.hash(ll + 1)))) % 32;

        let mut total = 0.0;
        for (gi, cx, cy, cz, cw) in [
            (gi0, x0, y0, z0, w0),
            (gi1, x1, y1, z1, w1),
            (gi2, x2, y2, z2, w2),
            (gi3, x3, y3, z3, w3),
            (gi4, x4, y4, z4, w4),
        ] {
            let t = FALLOFF_4D - cx * cx - cy * cy - cz * cz - cw * cw;
            if t >= 0.0 {
                let t2 = t * t;
                let g = &GRAD4[gi];
                total += t2 * t2 * (g[0] * cx + g[1] * cy + g[2] * cz + g[3] * cw);
            }
        }
        0.5 + 0.5 * (SCALE_4D * total)
    }
}

// =============================================================================
// SEAMLESS GRID SAMPLER
// =============================================================================

/// Samples the noise field at tile coordinates so that wrapping axes are
/// seamless and the longer grid dimension spans one `noise_scale` unit.
pub struct SeamlessSampler {
    noise: SimplexNoise,
    width: usize,
    height: usize,
    wrap_x: bool,
    wrap_y: bool,
    /// Noise units spanned by each axis.
    units_x: f64,
    units_y: f64,
    /// Random translation so different runs sample different regions.
    offsets: [f64; 4],
}

impl SeamlessSampler {
    pub fn new<R: Rng>(
        rng: &mut R,
        width: usize,
        height: usize,
        wrap_x: bool,
        wrap_y: bool,
        noise_scale: f64,
    ) -> Self {
        let noise = SimplexNoise::new(rng);
        let longest = width.max(height) as f64;
        let units_x = noise_scale * width as f64 / longest;
        let units_y = noise_scale * height as f64 / longest;
        let mut offsets = [0.0; 4];
        for o in offsets.iter_mut() {
            *o = rng.gen::<f64>() * 256.0;
        }
        Self {
            noise,
            width,
            height,
            wrap_x,
            wrap_y,
            units_x,
            units_y,
            offsets,
        }
    }

    /// Sample raw noise at tile (x, y), output near [0, 1].
    ///
    /// Each wrapping axis is mapped onto a circle whose circumference equals
    /// the axis extent in noise units, so the field closes at the seam with
    /// the same spatial frequency a linear axis would have.
    pub fn sample(&self, x: usize, y: usize) -> f64 {
        use std::f64::consts::TAU;

        let fx = x as f64 / self.width as f64;
        let fy = y as f64 / self.height as f64;

        let mut coords = [0.0f64; 4];
        let mut dims = 0;
        if self.wrap_x {
            let r = self.units_x / TAU;
            let angle = fx * TAU;
            coords[dims] = r * angle.cos();
            coords[dims + 1] = r * angle.sin();
            dims += 2;
        } else {
            coords[dims] = fx * self.units_x;
            dims += 1;
        }
        if self.wrap_y {
            let r = self.units_y / TAU;
            let angle = fy * TAU;
            coords[dims] = r * angle.cos();
            coords[dims + 1] = r * angle.sin();
            dims += 2;
        } else {
            coords[dims] = fy * self.units_y;
            dims += 1;
        }
        for d in 0..dims {
            coords[d] += self.offsets[d];
        }

        match dims {
            2 => self.noise.noise2(coords[0], coords[1]),
            3 => self.noise.noise3(coords[0], coords[1], coords[2]),
            _ => self.noise.noise4(coords[0], coords[1], coords[2], coords[3]),
        }
    }
}
