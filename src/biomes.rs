//! Tile type assignment by range matching.

use rand::Rng;

use crate::params::WorldParams;
use crate::tilemap::Tilemap;
use crate::world::Tile;

/// Assign every tile its type index.
///
/// A tile collects every `TileType` whose elevation, temperature and
/// precipitation ranges all contain the tile's values; ties are broken
/// uniformly at random, and a tile matching nothing stays `None` (the
/// display layer marks those invalid).
pub fn assign_tile_types<R: Rng>(tiles: &mut Tilemap<Tile>, params: &WorldParams, rng: &mut R) {
    let mut candidates: Vec<usize> = Vec::with_capacity(params.tile_types.len());
    for (_, _, tile) in tiles.iter_mut() {
        candidates.clear();
        for (idx, tile_type) in params.tile_types.iter().enumerate() {
            if tile_type.matches(tile.elevation, tile.temperature, tile.precipitation) {
                candidates.push(idx);
            }
        }
        tile.tile_type = match candidates.len() {
            0 => None,
            1 => Some(candidates[0]),
            n => Some(candidates[rng.gen_range(0..n)]),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{TileType, ValueRange};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn covering_type(name: &str) -> TileType {
        TileType {
            name: name.into(),
            elevation: vec![ValueRange::new(-1.0e6, 1.0e6)],
            temperature: vec![ValueRange::new(-300.0, 300.0)],
            precipitation: vec![ValueRange::new(0.0, 1.0e9)],
        }
    }

    fn test_tiles() -> Tilemap<Tile> {
        let mut tiles: Tilemap<Tile> = Tilemap::new(4, 4, false, false);
        for (x, y, t) in tiles.iter_mut() {
            t.elevation = (x as f32 - 2.0) * 500.0;
            t.temperature = 10.0;
            t.precipitation = 100.0 * y as f32;
        }
        tiles
    }

    #[test]
    fn test_single_covering_type_matches_everything() {
        let mut p = WorldParams::default();
        p.tile_types = vec![covering_type("everything")];
        let mut tiles = test_tiles();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assign_tile_types(&mut tiles, &p, &mut rng);
        for (_, _, t) in tiles.iter() {
            assert_eq!(t.tile_type, Some(0));
        }
    }

    #[test]
    fn test_no_match_leaves_none() {
        let mut p = WorldParams::default();
        p.tile_types = vec![TileType {
            name: "unreachable".into(),
            elevation: vec![ValueRange::new(90000.0, 99999.0)],
            temperature: vec![ValueRange::new(-300.0, 300.0)],
            precipitation: vec![ValueRange::new(0.0, 1.0e9)],
        }];
        let mut tiles = test_tiles();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assign_tile_types(&mut tiles, &p, &mut rng);
        for (_, _, t) in tiles.iter() {
            assert_eq!(t.tile_type, None);
        }
    }

    #[test]
    fn test_overlapping_types_tie_break_is_seeded() {
        let mut p = WorldParams::default();
        p.tile_types = vec![covering_type("a"), covering_type("b")];
        let mut first = test_tiles();
        let mut second = test_tiles();
        let mut rng_a = ChaCha8Rng::seed_from_u64(99);
        let mut rng_b = ChaCha8Rng::seed_from_u64(99);
        assign_tile_types(&mut first, &p, &mut rng_a);
        assign_tile_types(&mut second, &p, &mut rng_b);
        let mut seen = [false; 2];
        for ((_, _, a), (_, _, b)) in first.iter().zip(second.iter()) {
            assert_eq!(a.tile_type, b.tile_type);
            seen[a.tile_type.unwrap()] = true;
        }
        // Over 16 draws both candidates should have been picked.
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn test_default_palette_covers_generated_values() {
        // A sea-level tile in moderate climate must match something.
        let p = WorldParams::default();
        let mut tiles: Tilemap<Tile> = Tilemap::new(1, 1, false, false);
        tiles.get_mut(0, 0).elevation = 120.0;
        tiles.get_mut(0, 0).temperature = 14.0;
        tiles.get_mut(0, 0).precipitation = 700.0;
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assign_tile_types(&mut tiles, &p, &mut rng);
        let idx = tiles.get(0, 0).tile_type.unwrap();
        assert_eq!(p.tile_types[idx].name, "grassland");
    }
}
