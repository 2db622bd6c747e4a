//! Latitude-driven climate: temperature and baseline rainfall.

use rayon::prelude::*;
use std::f32::consts::PI;

use crate::params::{WorldParams, ABSOLUTE_ZERO_C};
use crate::tilemap::Tilemap;
use crate::world::Tile;

/// Latitude of row `y` in radians: -pi/2 at the top edge, +pi/2 at the
/// bottom (in the half-open row-center sense used throughout).
pub fn latitude(y: usize, height: usize) -> f32 {
    (y as f32 / height as f32 - 0.5) * PI
}

/// Sea-level temperature at a latitude: equatorial maximum falling off with
/// sin² toward the poles.
pub fn sea_level_temperature(lat: f32, params: &WorldParams) -> f32 {
    let spread = params.equator_temperature - params.pole_temperature;
    params.equator_temperature - spread * lat.sin() * lat.sin()
}

/// Fill in tile temperatures: sea-level latitude curve, minus the lapse-rate
/// drop over land elevation. Ocean tiles keep the sea-level value.
pub fn generate_temperature(tiles: &mut Tilemap<Tile>, params: &WorldParams) {
    let height = tiles.height;
    let width = tiles.width;
    tiles
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let base = sea_level_temperature(latitude(y, height), params);
            for tile in row {
                let mut t = base;
                if tile.elevation > 0.0 {
                    t -= tile.elevation * params.temperature_lapse;
                }
                tile.temperature = t.max(ABSOLUTE_ZERO_C + 0.01);
            }
        });
}

/// Baseline annual rainfall at a latitude: one peak at the equator and two
/// mirrored peaks at the low-pressure belts, each a Witch-of-Agnesi curve
/// `peak / (1 + ((lat - center) / evenness)²)`.
pub fn baseline_rainfall(lat: f32, params: &WorldParams) -> f32 {
    let belt = params.low_pressure_latitude.to_radians();
    let peaked = |peak: f32, center: f32| {
        let d = (lat - center) / params.rain_evenness;
        peak / (1.0 + d * d)
    };
    peaked(params.rain_peak_equator, 0.0)
        + peaked(params.rain_peak_midlat, belt)
        + peaked(params.rain_peak_midlat, -belt)
}

/// Fill in baseline precipitation for every tile from latitude alone.
/// Hydrology refines this afterwards.
pub fn generate_baseline_rainfall(tiles: &mut Tilemap<Tile>, params: &WorldParams) {
    let height = tiles.height;
    let width = tiles.width;
    tiles
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let rain = baseline_rainfall(latitude(y, height), params).max(0.0);
            for tile in row {
                tile.precipitation = rain;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_endpoints() {
        assert!((latitude(0, 64) + PI / 2.0).abs() < 1.0e-6);
        assert!((latitude(32, 64)).abs() < 1.0e-6);
        assert!(latitude(63, 64) > 0.0);
        assert!(latitude(63, 64) < PI / 2.0);
    }

    #[test]
    fn test_equator_warmer_than_poles() {
        let p = WorldParams::default();
        let equator = sea_level_temperature(0.0, &p);
        let pole = sea_level_temperature(PI / 2.0, &p);
        assert!((equator - p.equator_temperature).abs() < 1.0e-4);
        assert!((pole - p.pole_temperature).abs() < 1.0e-4);
        assert!(equator > pole);
    }

    #[test]
    fn test_lapse_applies_to_land_only() {
        let p = WorldParams::default();
        let mut tiles: Tilemap<Tile> = Tilemap::new(4, 4, false, false);
        tiles.get_mut(0, 2).elevation = 2000.0;
        tiles.get_mut(1, 2).elevation = -2000.0;
        generate_temperature(&mut tiles, &p);
        let base = sea_level_temperature(latitude(2, 4), &p);
        let land = tiles.get(0, 2).temperature;
        let ocean = tiles.get(1, 2).temperature;
        assert!((land - (base - 2000.0 * p.temperature_lapse)).abs() < 1.0e-3);
        // Deep ocean keeps the sea-level temperature.
        assert!((ocean - base).abs() < 1.0e-3);
    }

    #[test]
    fn test_temperature_clamped_above_absolute_zero() {
        let mut p = WorldParams::default();
        p.temperature_lapse = 1.0; // 1 °C per metre, absurdly steep
        let mut tiles: Tilemap<Tile> = Tilemap::new(2, 2, false, false);
        for (_, _, t) in tiles.iter_mut() {
            t.elevation = 5000.0;
        }
        generate_temperature(&mut tiles, &p);
        for (_, _, t) in tiles.iter() {
            assert!(t.temperature > ABSOLUTE_ZERO_C);
        }
    }

    #[test]
    fn test_rainfall_peaks_at_equator_and_belts() {
        let p = WorldParams::default();
        let belt = p.low_pressure_latitude.to_radians();
        let equator = baseline_rainfall(0.0, &p);
        let belt_rain = baseline_rainfall(belt, &p);
        let trough = baseline_rainfall(belt / 2.0, &p);
        assert!(equator > trough);
        assert!(belt_rain > trough);
        // Symmetric under hemisphere mirroring, up to f32 summation order.
        let mirrored = baseline_rainfall(-belt, &p);
        assert!((mirrored - belt_rain).abs() < belt_rain.abs() * 1.0e-4);
    }
}
