//! Procedural tile-based planetary map generation.
//!
//! Pipeline: seamless simplex elevation calibrated to a target ocean
//! fraction, latitude/elevation climate, ocean-distance and orographic
//! rainfall shaping, steepest-descent rivers on the corner grid, and
//! range-matched tile type assignment. Everything is driven by one seeded
//! RNG so a seed plus parameters reproduces a world exactly.

pub mod ascii;
pub mod biomes;
pub mod climate;
pub mod elevation;
pub mod hydrology;
pub mod noise;
pub mod params;
pub mod rivers;
pub mod tilemap;
pub mod topology;
pub mod world;

pub use params::{TileType, ValidationWarning, ValueRange, WorldParams};
pub use rivers::RiverNetwork;
pub use tilemap::Tilemap;
pub use world::{generate, Tile, WorldData};
