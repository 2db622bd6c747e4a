//! ASCII rendering of generated worlds for quick terminal inspection.

use crate::topology::wrap_coord;
use crate::world::WorldData;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Tile type characters
    Types,
    /// Elevation gradient
    Elevation,
    /// Temperature gradient
    Temperature,
    /// Precipitation gradient
    Rainfall,
    /// Terrain with river corners overlaid
    Rivers,
}

impl AsciiMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "types" => Some(AsciiMode::Types),
            "elevation" => Some(AsciiMode::Elevation),
            "temperature" => Some(AsciiMode::Temperature),
            "rainfall" => Some(AsciiMode::Rainfall),
            "rivers" => Some(AsciiMode::Rivers),
            _ => None,
        }
    }
}

const ELEVATION_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
const GRADIENT_RAMP: &[char] = &[' ', '.', ':', 'o', 'O', '0', '@'];

fn ramp_char(ramp: &[char], value: f32, min: f32, max: f32) -> char {
    if max <= min {
        return ramp[0];
    }
    let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
    let idx = (t * (ramp.len() - 1) as f32).round() as usize;
    ramp[idx]
}

/// Character for a tile in type view: first letter of the type name, ocean
/// shown as '~', unmatched tiles as '?'.
fn type_char(world: &WorldData, x: usize, y: usize) -> char {
    let tile = world.tiles.get(x, y);
    if tile.elevation <= 0.0 {
        return '~';
    }
    match tile.tile_type {
        Some(idx) => world.params.tile_types[idx]
            .name
            .chars()
            .next()
            .unwrap_or('?'),
        None => '?',
    }
}

/// True when any of the four corners of tile (x, y) carries a river.
fn tile_touches_river(world: &WorldData, x: usize, y: usize) -> bool {
    let rivers = &world.rivers;
    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let cx = wrap_coord(x as i64 + dx, rivers.corner_width, world.tiles.wrap_x);
        let cy = wrap_coord(y as i64 + dy, rivers.corner_height, world.tiles.wrap_y);
        if let (Some(cx), Some(cy)) = (cx, cy) {
            if rivers.has_river(cx, cy) {
                return true;
            }
        }
    }
    false
}

/// Render the world as one string, rows separated by newlines.
pub fn render(world: &WorldData, mode: AsciiMode) -> String {
    let width = world.tiles.width;
    let height = world.tiles.height;

    let (min_elev, max_elev) = world.tiles.iter().fold(
        (f32::MAX, f32::MIN),
        |(lo, hi), (_, _, t)| (lo.min(t.elevation), hi.max(t.elevation)),
    );
    let (min_temp, max_temp) = world.tiles.iter().fold(
        (f32::MAX, f32::MIN),
        |(lo, hi), (_, _, t)| (lo.min(t.temperature), hi.max(t.temperature)),
    );
    let (min_rain, max_rain) = world.tiles.iter().fold(
        (f32::MAX, f32::MIN),
        |(lo, hi), (_, _, t)| (lo.min(t.precipitation), hi.max(t.precipitation)),
    );

    let mut out = String::with_capacity((width + 1) * height);
    for y in 0..height {
        for x in 0..width {
            let tile = world.tiles.get(x, y);
            let c = match mode {
                AsciiMode::Types => type_char(world, x, y),
                AsciiMode::Elevation => {
                    if tile.elevation <= 0.0 {
                        '~'
                    } else {
                        ramp_char(ELEVATION_RAMP, tile.elevation, min_elev.max(0.0), max_elev)
                    }
                }
                AsciiMode::Temperature => {
                    ramp_char(GRADIENT_RAMP, tile.temperature, min_temp, max_temp)
                }
                AsciiMode::Rainfall => {
                    ramp_char(GRADIENT_RAMP, tile.precipitation, min_rain, max_rain)
                }
                AsciiMode::Rivers => {
                    if tile_touches_river(world, x, y) {
                        '+'
                    } else if tile.elevation <= 0.0 {
                        '~'
                    } else {
                        '.'
                    }
                }
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}
