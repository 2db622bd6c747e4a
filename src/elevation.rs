//! Elevation synthesis: raw simplex noise calibrated to a target ocean
//! fraction via an empirical quantile.

use rand::Rng;
use rayon::prelude::*;

use crate::noise::SeamlessSampler;
use crate::params::WorldParams;
use crate::tilemap::Tilemap;
use crate::world::Tile;

/// Fill in tile elevations.
///
/// Raw noise is sampled per tile (seamless across wrapping axes, scaled so
/// the longer grid dimension spans `noise_scale` units), then shifted and
/// stretched so that exactly `floor(N * ocean_fraction)` tiles land at or
/// below sea level and the highest possible land elevation equals the top
/// elevation bound declared by the tile types.
pub fn generate_elevation<R: Rng>(tiles: &mut Tilemap<Tile>, params: &WorldParams, rng: &mut R) {
    let width = tiles.width;
    let height = tiles.height;
    let sampler = SeamlessSampler::new(
        rng,
        width,
        height,
        params.wrap_x,
        params.wrap_y,
        params.noise_scale as f64,
    );

    // Per-tile sampling is pure, so rows can run in parallel.
    let raw: Vec<f32> = (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            let sampler = &sampler;
            (0..width).map(move |x| sampler.sample(x, y) as f32)
        })
        .collect();

    let threshold = ocean_threshold(&raw, params.ocean_fraction);

    // Stretch so the maximum raw value (~1.0) maps to the tallest declared
    // tile type elevation. The denominator is guarded against raw samples
    // that overshoot 1.0.
    let denom = (1.0 - threshold).max(1.0e-3);
    let scale = params.max_tile_type_elevation() / denom;

    for (idx, tile) in tiles.as_mut_slice().iter_mut().enumerate() {
        tile.elevation = (raw[idx] - threshold) * scale;
    }
}

/// The raw-noise value that separates ocean from land: the greatest raw
/// sample among the `floor(N * fraction)` lowest ones, so subtracting it
/// sends exactly that many tiles to elevation <= 0.
fn ocean_threshold(raw: &[f32], fraction: f32) -> f32 {
    let mut sorted = raw.to_vec();
    sorted.sort_by(f32::total_cmp);
    let k = (sorted.len() as f64 * fraction as f64).floor() as usize;
    if k == 0 {
        // All-land map: threshold just below the minimum sample.
        sorted[0] - 1.0e-6
    } else {
        sorted[k - 1]
    }
}
