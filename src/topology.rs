//! Coordinate wrapping and toroidal distance arithmetic.
//!
//! Every other module goes through these helpers when stepping to a neighbor
//! or measuring distance, so wrap behavior lives in exactly one place.

/// Wrap or reject a coordinate on one axis.
///
/// Returns the in-bounds index, wrapping around the seam when the axis wraps,
/// or `None` when the coordinate falls off a non-wrapping edge.
pub fn wrap_coord(coord: i64, len: usize, wraps: bool) -> Option<usize> {
    let len_i = len as i64;
    if coord >= 0 && coord < len_i {
        return Some(coord as usize);
    }
    if wraps {
        Some(coord.rem_euclid(len_i) as usize)
    } else {
        None
    }
}

/// Absolute coordinate difference along one axis, in tile units.
///
/// On a wrapping axis this takes the shorter way around the seam:
/// `min(|a-b|, len - |a-b|)`.
pub fn axis_delta(a: usize, b: usize, len: usize, wraps: bool) -> f32 {
    let direct = a.abs_diff(b);
    if wraps {
        direct.min(len - direct) as f32
    } else {
        direct as f32
    }
}

/// Squared physical distance (km²) between two grid positions, wrap-aware
/// per axis. Used by the nearest-ocean relaxation, where only comparisons
/// matter and the square root can be deferred.
pub fn squared_distance_km(
    a: (usize, usize),
    b: (usize, usize),
    width: usize,
    height: usize,
    wrap_x: bool,
    wrap_y: bool,
    tile_scale_x: f32,
    tile_scale_y: f32,
) -> f32 {
    let dx = axis_delta(a.0, b.0, width, wrap_x) * tile_scale_x;
    let dy = axis_delta(a.1, b.1, height, wrap_y) * tile_scale_y;
    dx * dx + dy * dy
}
