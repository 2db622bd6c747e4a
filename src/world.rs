//! World data container and the generation pipeline.
//!
//! `generate` runs the stages in a fixed order over one shared tile grid:
//! elevation, temperature, baseline rainfall, ocean-distance attenuation,
//! orographic rainfall, rivers, tile types. Randomness comes from a single
//! seeded `ChaCha8Rng` consumed in that order, so seed + params reproduce a
//! bit-identical world.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biomes;
use crate::climate;
use crate::elevation;
use crate::hydrology;
use crate::params::{self, ValidationWarning, WorldParams};
use crate::rivers::{self, RiverNetwork};
use crate::tilemap::Tilemap;

/// One grid cell. Created once per run and filled in by successive stages.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tile {
    /// Metres; at or below zero means ocean.
    pub elevation: f32,
    /// °C, always strictly above absolute zero.
    pub temperature: f32,
    /// mm/yr, never negative.
    pub precipitation: f32,
    /// Coordinates of the nearest ocean tile; `None` until the distance
    /// transform has run (or on an all-land map).
    pub nearest_ocean: Option<(usize, usize)>,
    /// Index into the tile type list; `None` when nothing matched.
    pub tile_type: Option<usize>,
}

/// Everything one generation run produces.
pub struct WorldData {
    /// The seed actually used (reported even when none was supplied).
    pub seed: u64,
    /// The validated, clamped parameters the run executed with.
    pub params: WorldParams,
    /// Clamping adjustments made by validation.
    pub warnings: Vec<ValidationWarning>,
    pub tiles: Tilemap<Tile>,
    pub rivers: RiverNetwork,
}

impl WorldData {
    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    /// Fraction of tiles at or below sea level.
    pub fn ocean_fraction(&self) -> f64 {
        let ocean = self
            .tiles
            .iter()
            .filter(|(_, _, t)| t.elevation <= 0.0)
            .count();
        ocean as f64 / (self.tiles.width * self.tiles.height) as f64
    }

    /// Plain serializable snapshot for export.
    pub fn to_export(&self) -> WorldExport {
        WorldExport {
            seed: self.seed,
            width: self.tiles.width,
            height: self.tiles.height,
            wrap_x: self.tiles.wrap_x,
            wrap_y: self.tiles.wrap_y,
            tile_type_names: self
                .params
                .tile_types
                .iter()
                .map(|t| t.name.clone())
                .collect(),
            tiles: self.tiles.as_slice().to_vec(),
            river_corner_width: self.rivers.corner_width,
            river_corner_height: self.rivers.corner_height,
            river_corners: self
                .rivers
                .sorted_entries()
                .into_iter()
                .map(|(x, y, mask)| RiverCornerExport { x, y, mask })
                .collect(),
        }
    }
}

/// Flat, serializable form of a generated world (row-major tiles, sparse
/// sorted river corners).
#[derive(Serialize, Deserialize)]
pub struct WorldExport {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub wrap_x: bool,
    pub wrap_y: bool,
    pub tile_type_names: Vec<String>,
    pub tiles: Vec<Tile>,
    pub river_corner_width: usize,
    pub river_corner_height: usize,
    pub river_corners: Vec<RiverCornerExport>,
}

#[derive(Serialize, Deserialize)]
pub struct RiverCornerExport {
    pub x: usize,
    pub y: usize,
    pub mask: u8,
}

/// Run the whole pipeline. `seed = None` draws a fresh seed (reported in the
/// result so the run can be reproduced).
pub fn generate(params: &WorldParams, seed: Option<u64>) -> WorldData {
    let (params, warnings) = params::validate(params);
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut tiles: Tilemap<Tile> =
        Tilemap::new(params.width, params.height, params.wrap_x, params.wrap_y);

    elevation::generate_elevation(&mut tiles, &params, &mut rng);
    climate::generate_temperature(&mut tiles, &params);
    climate::generate_baseline_rainfall(&mut tiles, &params);
    hydrology::compute_ocean_distance(&mut tiles, &params);
    hydrology::attenuate_rainfall(&mut tiles, &params);
    hydrology::apply_orographic(&mut tiles, &params);
    let rivers = rivers::generate_rivers(&tiles, &params, &mut rng);
    biomes::assign_tile_types(&mut tiles, &params, &mut rng);

    WorldData {
        seed,
        params,
        warnings,
        tiles,
        rivers,
    }
}
