//! Hydrology part 1: continental rainfall shaping.
//!
//! Two passes over the baseline rainfall field: an ocean-distance decay that
//! dries out continental interiors, and a wind-direction orographic sweep
//! that wets windward slopes and dries lee sides.

use std::collections::VecDeque;

use crate::climate::{latitude, sea_level_temperature};
use crate::params::WorldParams;
use crate::tilemap::Tilemap;
use crate::topology::squared_distance_km;
use crate::world::Tile;

// =============================================================================
// NEAREST-OCEAN DISTANCE
// =============================================================================

/// Record each tile's nearest ocean tile (by toroidal physical distance).
///
/// Label-correcting relaxation: every ocean tile seeds the frontier with
/// itself as source; a popped tile offers its source to each neighbor, and a
/// neighbor that improves (unknown, or strictly nearer by squared km) adopts
/// the source and re-enters the frontier. Tiles can be revisited any number
/// of times until no improvement remains.
pub fn compute_ocean_distance(tiles: &mut Tilemap<Tile>, params: &WorldParams) {
    let width = tiles.width;
    let height = tiles.height;
    let mut frontier: VecDeque<(usize, usize)> = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            let tile = tiles.get_mut(x, y);
            if tile.elevation <= 0.0 {
                tile.nearest_ocean = Some((x, y));
                frontier.push_back((x, y));
            } else {
                tile.nearest_ocean = None;
            }
        }
    }

    let dist2 = |from: (usize, usize), source: (usize, usize)| {
        squared_distance_km(
            from,
            source,
            width,
            height,
            params.wrap_x,
            params.wrap_y,
            params.tile_scale_x,
            params.tile_scale_y,
        )
    };

    while let Some((x, y)) = frontier.pop_front() {
        let Some(source) = tiles.get(x, y).nearest_ocean else {
            continue;
        };
        for (nx, ny) in tiles.neighbors(x, y) {
            let candidate = dist2((nx, ny), source);
            let improves = match tiles.get(nx, ny).nearest_ocean {
                None => true,
                Some(current) => candidate < dist2((nx, ny), current),
            };
            if improves {
                tiles.get_mut(nx, ny).nearest_ocean = Some(source);
                frontier.push_back((nx, ny));
            }
        }
    }
}

/// Divide land rainfall by `exp(sqrt(distance_km) / efold)` once distances
/// have settled. Ocean tiles are left untouched.
pub fn attenuate_rainfall(tiles: &mut Tilemap<Tile>, params: &WorldParams) {
    let width = tiles.width;
    let height = tiles.height;
    for y in 0..height {
        for x in 0..width {
            let tile = tiles.get(x, y);
            if tile.elevation <= 0.0 {
                continue;
            }
            let Some(source) = tile.nearest_ocean else {
                continue; // all-land map: no ocean to measure from
            };
            let d2 = squared_distance_km(
                (x, y),
                source,
                width,
                height,
                params.wrap_x,
                params.wrap_y,
                params.tile_scale_x,
                params.tile_scale_y,
            );
            let distance = d2.sqrt();
            let factor = (distance.sqrt() / params.ocean_efolding_distance).exp();
            tiles.get_mut(x, y).precipitation /= factor;
        }
    }
}

// =============================================================================
// OROGRAPHIC RAINFALL
// =============================================================================

/// Wind direction for one row: +1 sweeps eastward (+x), -1 westward.
///
/// Inside the high-to-low-pressure latitude band the westerlies blow
/// eastward; outside it the trades/polar easterlies blow westward. A
/// westward-rotating planet swaps the mapping.
fn wind_direction(y: usize, height: usize, params: &WorldParams) -> i64 {
    let lat_deg = latitude(y, height).to_degrees().abs();
    let in_band =
        lat_deg >= params.high_pressure_latitude && lat_deg <= params.low_pressure_latitude;
    let eastward = in_band != params.rotate_west;
    if eastward {
        1
    } else {
        -1
    }
}

/// Orographic sweep: march each row in its wind direction, tracking the
/// upwind tile's land elevation, and add (or remove, on descent) moisture in
/// proportion to the saturation vapor pressure at this latitude's sea-level
/// temperature and the slope being climbed.
pub fn apply_orographic(tiles: &mut Tilemap<Tile>, params: &WorldParams) {
    let width = tiles.width;
    let height = tiles.height;
    let run_m = params.tile_scale_x * 1000.0;

    for y in 0..height {
        let dir = wind_direction(y, height, params);
        let sea_temp = sea_level_temperature(latitude(y, height), params);
        let saturation =
            (params.saturation_c1 * sea_temp / (params.saturation_c2 + sea_temp)).exp();

        // Sweep order: downwind. The first tile has an upwind predecessor
        // only when the axis wraps (the row's last tile in sweep order).
        let start: i64 = if dir > 0 { 0 } else { width as i64 - 1 };
        let mut prev_elevation = if params.wrap_x {
            let upwind = tiles
                .resolve(start - dir, y as i64)
                .map(|(ux, uy)| tiles.get(ux, uy).elevation)
                .unwrap_or(0.0);
            Some(upwind.max(0.0))
        } else {
            None
        };

        for step in 0..width as i64 {
            let x = match tiles.resolve(start + dir * step, y as i64) {
                Some((x, _)) => x,
                None => continue,
            };
            let tile = tiles.get(x, y);
            let elevation = tile.elevation;

            if elevation > 0.0 {
                if let Some(prev) = prev_elevation {
                    let kelvin = tile.temperature + 273.15;
                    let column = (-elevation * params.moisture_divisor * params.temperature_lapse
                        / (kelvin * kelvin))
                        .exp();
                    let lift = (elevation - prev) / run_m;
                    let delta = params.condensation_multiplier * saturation * column * lift;
                    let tile = tiles.get_mut(x, y);
                    tile.precipitation = (tile.precipitation + delta).max(0.0);
                }
            }
            prev_elevation = Some(elevation.max(0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::generate_baseline_rainfall;
    use crate::params::validate;

    fn flat_params(width: usize, height: usize) -> WorldParams {
        let mut p = WorldParams::default();
        p.width = width;
        p.height = height;
        p.wrap_x = false;
        p.wrap_y = false;
        validate(&p).0
    }

    #[test]
    fn test_ocean_distance_self_for_ocean() {
        let p = flat_params(4, 4);
        let mut tiles: Tilemap<Tile> = Tilemap::new(4, 4, false, false);
        tiles.get_mut(0, 0).elevation = -100.0;
        for (x, y, t) in tiles.iter_mut() {
            if (x, y) != (0, 0) {
                t.elevation = 100.0;
            }
        }
        compute_ocean_distance(&mut tiles, &p);
        assert_eq!(tiles.get(0, 0).nearest_ocean, Some((0, 0)));
        // Every land tile found the single ocean source.
        for (_, _, t) in tiles.iter() {
            assert_eq!(t.nearest_ocean, Some((0, 0)));
        }
    }

    #[test]
    fn test_ocean_distance_picks_nearer_source() {
        // Ocean at both ends of a 9-tile strip; the middle splits.
        let p = flat_params(9, 1);
        let mut tiles: Tilemap<Tile> = Tilemap::new(9, 1, false, false);
        for (x, _, t) in tiles.iter_mut() {
            t.elevation = if x == 0 || x == 8 { -10.0 } else { 10.0 };
        }
        compute_ocean_distance(&mut tiles, &p);
        assert_eq!(tiles.get(1, 0).nearest_ocean, Some((0, 0)));
        assert_eq!(tiles.get(7, 0).nearest_ocean, Some((8, 0)));
    }

    #[test]
    fn test_ocean_distance_wraps() {
        // With wrap, the tile at the far end is adjacent to the ocean at 0.
        let mut p = flat_params(8, 1);
        p.wrap_x = true;
        let mut tiles: Tilemap<Tile> = Tilemap::new(8, 1, true, false);
        for (x, _, t) in tiles.iter_mut() {
            t.elevation = if x == 0 { -10.0 } else { 10.0 };
        }
        compute_ocean_distance(&mut tiles, &p);
        assert_eq!(tiles.get(7, 0).nearest_ocean, Some((0, 0)));
    }

    #[test]
    fn test_attenuation_dries_the_interior() {
        let p = flat_params(16, 1);
        let mut tiles: Tilemap<Tile> = Tilemap::new(16, 1, false, false);
        for (x, _, t) in tiles.iter_mut() {
            t.elevation = if x == 0 { -10.0 } else { 10.0 };
        }
        generate_baseline_rainfall(&mut tiles, &p);
        compute_ocean_distance(&mut tiles, &p);
        attenuate_rainfall(&mut tiles, &p);
        // Monotone drying with distance from the coast.
        for x in 2..16 {
            assert!(
                tiles.get(x, 0).precipitation <= tiles.get(x - 1, 0).precipitation,
                "tile {} wetter than tile {}",
                x,
                x - 1
            );
        }
        // Ocean rainfall untouched.
        let base = tiles.get(0, 0).precipitation;
        assert!(base > 0.0);
    }

    #[test]
    fn test_orographic_windward_gain_lee_loss() {
        // One ridge in the middle of a flat strip at a westerly latitude:
        // the climb side gains moisture, the descent side loses it.
        let mut p = flat_params(7, 1);
        // Row 0 of height 1 sits at latitude -90°, outside the 30-60 band;
        // force the band to cover it so the sweep runs eastward.
        p.high_pressure_latitude = 0.0;
        p.low_pressure_latitude = 90.0;
        let p = validate(&p).0;

        let mut tiles: Tilemap<Tile> = Tilemap::new(7, 1, false, false);
        let profile = [100.0, 100.0, 1500.0, 3000.0, 1500.0, 100.0, 100.0];
        for (x, _, t) in tiles.iter_mut() {
            t.elevation = profile[x];
            t.temperature = 10.0;
            t.precipitation = 500.0;
        }
        apply_orographic(&mut tiles, &p);
        // Climbing tiles gained.
        assert!(tiles.get(2, 0).precipitation > 500.0);
        assert!(tiles.get(3, 0).precipitation > 500.0);
        // Descending tiles lost (clamped at zero).
        assert!(tiles.get(4, 0).precipitation < 500.0);
        assert!(tiles.get(4, 0).precipitation >= 0.0);
        // First tile has no upwind predecessor on a non-wrapping axis.
        assert_eq!(tiles.get(0, 0).precipitation, 500.0);
    }

    #[test]
    fn test_orographic_rotation_flag_swaps_direction() {
        let p = flat_params(8, 8);
        let mut swapped = p.clone();
        swapped.rotate_west = true;
        for y in 0..8 {
            assert_eq!(wind_direction(y, 8, &p), -wind_direction(y, 8, &swapped));
        }
    }
}
