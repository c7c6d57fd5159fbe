//! Maze-chase ghost behavior engine and tile-graph navigation layer.
//!
//! The crate builds a directional adjacency graph over maze cells, moves
//! characters along it at a fixed tick rate, and drives the classic ghost
//! AI: per-archetype pursuit targeting, the scatter/chase/frightened/eaten
//! mode machine, and the caught-Pac-Man sequence. Rendering, audio, and
//! scoring are external consumers of the emitted events.

pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod map;
pub mod systems;
