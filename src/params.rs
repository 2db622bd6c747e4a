//! Generation parameters, tile type definitions, and the validation pre-pass.
//!
//! Validation is clamping, not failure: `validate` returns a corrected copy
//! of the parameters plus a list of structured warnings describing every
//! adjustment it made. Generation itself never sees an invalid value.

use serde::{Deserialize, Serialize};

/// Lowest representable temperature, °C.
pub const ABSOLUTE_ZERO_C: f32 = -273.15;

/// An inclusive value range. A tile type lists one or more of these per
/// attribute; matching is disjunctive within an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A tile classification: a tile matches when its elevation, temperature and
/// precipitation each fall inside at least one of the respective ranges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileType {
    pub name: String,
    /// Elevation ranges, metres.
    pub elevation: Vec<ValueRange>,
    /// Temperature ranges, °C.
    pub temperature: Vec<ValueRange>,
    /// Precipitation ranges, mm/yr.
    pub precipitation: Vec<ValueRange>,
}

impl TileType {
    pub fn matches(&self, elevation: f32, temperature: f32, precipitation: f32) -> bool {
        self.elevation.iter().any(|r| r.contains(elevation))
            && self.temperature.iter().any(|r| r.contains(temperature))
            && self.precipitation.iter().any(|r| r.contains(precipitation))
    }
}

/// All knobs for one generation run. Immutable once validated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldParams {
    /// Grid width in tiles.
    pub width: usize,
    /// Grid height in tiles.
    pub height: usize,
    /// Toroidal wrap on the X axis.
    pub wrap_x: bool,
    /// Toroidal wrap on the Y axis.
    pub wrap_y: bool,
    /// Physical tile extent along X, km.
    pub tile_scale_x: f32,
    /// Physical tile extent along Y, km.
    pub tile_scale_y: f32,
    /// Target fraction of tiles that end up at or below sea level.
    pub ocean_fraction: f32,
    /// Noise units spanned by the longer grid axis. Higher = busier terrain.
    pub noise_scale: f32,
    /// Latitude of the subtropical low-rainfall belt boundary, degrees.
    pub low_pressure_latitude: f32,
    /// Latitude of the high-pressure belt boundary, degrees.
    pub high_pressure_latitude: f32,
    /// Sea-level temperature at the equator, °C.
    pub equator_temperature: f32,
    /// Sea-level temperature at the poles, °C.
    pub pole_temperature: f32,
    /// Temperature drop per metre of land elevation, °C/m.
    pub temperature_lapse: f32,
    /// Baseline rainfall peak at the equator, mm/yr.
    pub rain_peak_equator: f32,
    /// Baseline rainfall peak at the mid-latitude belts, mm/yr.
    pub rain_peak_midlat: f32,
    /// Width of the rainfall peaks, radians of latitude.
    pub rain_evenness: f32,
    /// Distance over which inland rainfall decays by e, km.
    pub ocean_efolding_distance: f32,
    /// Orographic condensation strength, mm/yr.
    pub condensation_multiplier: f32,
    /// Saturation-pressure exponent numerator constant.
    pub saturation_c1: f32,
    /// Saturation-pressure exponent denominator constant, °C.
    pub saturation_c2: f32,
    /// Moisture column scale divisor, K.
    pub moisture_divisor: f32,
    /// Rainfall weight in the river seeding probability, 1/(mm/yr).
    pub river_rain_multiplier: f32,
    /// Slope weight in the river seeding probability, dimensionless.
    pub river_slope_multiplier: f32,
    /// Swap the wind direction mapping (westward-rotating planet).
    pub rotate_west: bool,
    /// Ordered tile type definitions; tiles reference these by index.
    pub tile_types: Vec<TileType>,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            wrap_x: true,
            wrap_y: false,
            tile_scale_x: 100.0,
            tile_scale_y: 100.0,
            ocean_fraction: 0.6,
            noise_scale: 2.0,
            low_pressure_latitude: 60.0,
            high_pressure_latitude: 30.0,
            equator_temperature: 28.0,
            pole_temperature: -25.0,
            temperature_lapse: 0.0065,      // standard atmospheric lapse
            rain_peak_equator: 2200.0,
            rain_peak_midlat: 1100.0,
            rain_evenness: 0.25,
            ocean_efolding_distance: 400.0,
            condensation_multiplier: 12000.0,
            saturation_c1: 17.67,           // Magnus formula
            saturation_c2: 243.5,
            moisture_divisor: 5418.0,       // L/Rv for water vapor
            river_rain_multiplier: 0.001,
            river_slope_multiplier: 300.0,
            rotate_west: false,
            tile_types: default_tile_types(),
        }
    }
}

impl WorldParams {
    /// Highest elevation bound declared by any tile type; elevation
    /// calibration stretches land to reach exactly this.
    pub fn max_tile_type_elevation(&self) -> f32 {
        let max = self
            .tile_types
            .iter()
            .flat_map(|t| t.elevation.iter())
            .map(|r| r.max)
            .fold(f32::NEG_INFINITY, f32::max);
        if max.is_finite() && max > 0.0 {
            max
        } else {
            1000.0
        }
    }
}

/// An Earth-like default tile type palette covering the full value space.
pub fn default_tile_types() -> Vec<TileType> {
    let all_temps = vec![ValueRange::new(ABSOLUTE_ZERO_C, 100.0)];
    let all_rain = vec![ValueRange::new(0.0, 1.0e9)];
    vec![
        TileType {
            name: "ocean".into(),
            elevation: vec![ValueRange::new(-20000.0, 0.0)],
            temperature: all_temps.clone(),
            precipitation: all_rain.clone(),
        },
        TileType {
            name: "glacier".into(),
            elevation: vec![ValueRange::new(0.0, 9000.0)],
            temperature: vec![ValueRange::new(ABSOLUTE_ZERO_C, -8.0)],
            precipitation: all_rain.clone(),
        },
        TileType {
            name: "tundra".into(),
            elevation: vec![ValueRange::new(0.0, 2500.0)],
            temperature: vec![ValueRange::new(-8.0, 2.0)],
            precipitation: all_rain.clone(),
        },
        TileType {
            name: "desert".into(),
            elevation: vec![ValueRange::new(0.0, 2500.0)],
            temperature: vec![ValueRange::new(2.0, 100.0)],
            precipitation: vec![ValueRange::new(0.0, 300.0)],
        },
        TileType {
            name: "grassland".into(),
            elevation: vec![ValueRange::new(0.0, 2500.0)],
            temperature: vec![ValueRange::new(2.0, 100.0)],
            precipitation: vec![ValueRange::new(300.0, 1100.0)],
        },
        TileType {
            name: "forest".into(),
            elevation: vec![ValueRange::new(0.0, 2500.0)],
            temperature: vec![ValueRange::new(2.0, 22.0)],
            precipitation: vec![ValueRange::new(1100.0, 1.0e9)],
        },
        TileType {
            name: "jungle".into(),
            elevation: vec![ValueRange::new(0.0, 2500.0)],
            temperature: vec![ValueRange::new(22.0, 100.0)],
            precipitation: vec![ValueRange::new(1100.0, 1.0e9)],
        },
        TileType {
            name: "mountains".into(),
            elevation: vec![ValueRange::new(2500.0, 5000.0)],
            temperature: vec![ValueRange::new(-8.0, 100.0)],
            precipitation: all_rain.clone(),
        },
        TileType {
            name: "peaks".into(),
            elevation: vec![ValueRange::new(5000.0, 9000.0)],
            temperature: all_temps,
            precipitation: all_rain,
        },
    ]
}

// =============================================================================
// VALIDATION
// =============================================================================

/// One clamping adjustment made by `validate`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: &'static str,
    pub message: String,
}

impl ValidationWarning {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

const MIN_TILE_SCALE_KM: f32 = 1.0e-3;
const MAX_TILE_SCALE_KM: f32 = 1.0e5;
const MIN_EVENNESS: f32 = 1.0e-4;
const MIN_EFOLDING_KM: f32 = 1.0e-3;

/// Clamp every parameter into its valid domain, collecting a warning for
/// each adjustment. Generation must only ever run on the returned copy.
pub fn validate(params: &WorldParams) -> (WorldParams, Vec<ValidationWarning>) {
    let mut p = params.clone();
    let mut warnings = Vec::new();

    if p.width == 0 {
        p.width = 1;
        warnings.push(ValidationWarning::new("width", "clamped to 1"));
    }
    if p.height == 0 {
        p.height = 1;
        warnings.push(ValidationWarning::new("height", "clamped to 1"));
    }

    for (field, scale) in [
        ("tile_scale_x", &mut p.tile_scale_x),
        ("tile_scale_y", &mut p.tile_scale_y),
    ] {
        let clamped = scale.clamp(MIN_TILE_SCALE_KM, MAX_TILE_SCALE_KM);
        if clamped != *scale || !scale.is_finite() {
            let clamped = if scale.is_finite() { clamped } else { 1.0 };
            warnings.push(ValidationWarning::new(
                field,
                format!("clamped to {} km", clamped),
            ));
            *scale = clamped;
        }
    }

    // Keep at least one land tile: floor(N * f) must stay below N.
    let n = (p.width * p.height) as f32;
    let max_fraction = 1.0 - 1.0 / n;
    if !(0.0..=max_fraction).contains(&p.ocean_fraction) {
        let clamped = if p.ocean_fraction.is_finite() {
            p.ocean_fraction.clamp(0.0, max_fraction)
        } else {
            0.0
        };
        warnings.push(ValidationWarning::new(
            "ocean_fraction",
            format!("clamped to {}", clamped),
        ));
        p.ocean_fraction = clamped;
    }

    if p.noise_scale <= 0.0 || !p.noise_scale.is_finite() {
        p.noise_scale = 1.0;
        warnings.push(ValidationWarning::new("noise_scale", "clamped to 1"));
    }

    for (field, lat) in [
        ("low_pressure_latitude", &mut p.low_pressure_latitude),
        ("high_pressure_latitude", &mut p.high_pressure_latitude),
    ] {
        let clamped = if lat.is_finite() {
            lat.clamp(0.0, 90.0)
        } else {
            0.0
        };
        if clamped != *lat {
            warnings.push(ValidationWarning::new(
                field,
                format!("clamped to {}°", clamped),
            ));
            *lat = clamped;
        }
    }
    if p.low_pressure_latitude < p.high_pressure_latitude {
        p.low_pressure_latitude = p.high_pressure_latitude;
        warnings.push(ValidationWarning::new(
            "low_pressure_latitude",
            "raised to high_pressure_latitude",
        ));
    }

    for (field, temp) in [
        ("equator_temperature", &mut p.equator_temperature),
        ("pole_temperature", &mut p.pole_temperature),
    ] {
        if *temp <= ABSOLUTE_ZERO_C || !temp.is_finite() {
            *temp = ABSOLUTE_ZERO_C + 1.0;
            warnings.push(ValidationWarning::new(
                field,
                "raised above absolute zero",
            ));
        }
    }

    if p.rain_evenness.abs() < MIN_EVENNESS || !p.rain_evenness.is_finite() {
        p.rain_evenness = MIN_EVENNESS;
        warnings.push(ValidationWarning::new(
            "rain_evenness",
            "clamped away from zero",
        ));
    }
    if p.ocean_efolding_distance < MIN_EFOLDING_KM || !p.ocean_efolding_distance.is_finite() {
        p.ocean_efolding_distance = MIN_EFOLDING_KM;
        warnings.push(ValidationWarning::new(
            "ocean_efolding_distance",
            "clamped away from zero",
        ));
    }

    // The orographic exponent divides by (c2 + T). If -c2 falls inside the
    // achievable sea-level temperature range, nudge it just below the range
    // so the denominator can never hit zero.
    let lo = p.equator_temperature.min(p.pole_temperature);
    let hi = p.equator_temperature.max(p.pole_temperature);
    if (-p.saturation_c2) >= lo && (-p.saturation_c2) <= hi {
        p.saturation_c2 = 1.0 - lo;
        warnings.push(ValidationWarning::new(
            "saturation_c2",
            "moved outside the sea-level temperature range",
        ));
    }

    (p, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_matching_disjunctive_conjunctive() {
        let t = TileType {
            name: "split".into(),
            elevation: vec![ValueRange::new(0.0, 100.0), ValueRange::new(500.0, 600.0)],
            temperature: vec![ValueRange::new(-10.0, 10.0)],
            precipitation: vec![ValueRange::new(0.0, 1000.0)],
        };
        // Either elevation band works.
        assert!(t.matches(50.0, 0.0, 500.0));
        assert!(t.matches(550.0, 0.0, 500.0));
        // Between the bands fails.
        assert!(!t.matches(300.0, 0.0, 500.0));
        // All attributes must match.
        assert!(!t.matches(50.0, 20.0, 500.0));
        assert!(!t.matches(50.0, 0.0, 2000.0));
    }

    #[test]
    fn test_validate_clamps_dimensions_and_fraction() {
        let mut p = WorldParams::default();
        p.width = 0;
        p.height = 4;
        p.ocean_fraction = 1.5;
        let (v, warnings) = validate(&p);
        assert_eq!(v.width, 1);
        // 1x4 grid: at least one land tile must remain possible.
        assert!(v.ocean_fraction <= 1.0 - 1.0 / 4.0);
        assert!(warnings.iter().any(|w| w.field == "width"));
        assert!(warnings.iter().any(|w| w.field == "ocean_fraction"));
    }

    #[test]
    fn test_validate_orders_latitude_bands() {
        let mut p = WorldParams::default();
        p.low_pressure_latitude = 20.0;
        p.high_pressure_latitude = 140.0;
        let (v, _) = validate(&p);
        assert_eq!(v.high_pressure_latitude, 90.0);
        assert!(v.low_pressure_latitude >= v.high_pressure_latitude);
    }

    #[test]
    fn test_validate_nudges_saturation_constant() {
        let mut p = WorldParams::default();
        // -c2 = 10 °C sits inside [-25, 28].
        p.saturation_c2 = -10.0;
        let (v, warnings) = validate(&p);
        let lo = v.equator_temperature.min(v.pole_temperature);
        let hi = v.equator_temperature.max(v.pole_temperature);
        assert!(-v.saturation_c2 < lo || -v.saturation_c2 > hi);
        assert!(warnings.iter().any(|w| w.field == "saturation_c2"));
    }

    #[test]
    fn test_validate_clean_params_no_warnings() {
        let (_, warnings) = validate(&WorldParams::default());
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_max_tile_type_elevation() {
        let p = WorldParams::default();
        assert_eq!(p.max_tile_type_elevation(), 9000.0);
        let mut p = p;
        p.tile_types.clear();
        assert_eq!(p.max_tile_type_elevation(), 1000.0);
    }
}
