//! The typed event channel connecting the simulation systems.
//!
//! Events are queued during a tick and drained by whichever systems care;
//! publishers never know who is listening.

use bevy_ecs::{entity::Entity, event::Event};

use crate::map::graph::TileId;

/// Gameplay events observable from outside the simulation.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A character finished crossing onto a new tile.
    TileChanged { entity: Entity, tile: TileId },
    /// Pac-Man consumed a dot.
    DotEaten { tile: TileId },
    /// Pac-Man consumed a power pill.
    PillEaten { tile: TileId },
    /// Pac-Man was caught; the death sequence has started.
    PacmanDied,
    /// The death sequence finished and the level was reset.
    PacmanRespawned,
}

/// Pac-Man and a ghost occupy the same tile this tick.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub pacman: Entity,
    pub ghost: Entity,
}

/// Mode transitions requested for a single ghost, independent of the
/// global phase schedule.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostCommand {
    /// This ghost's frightened timer ran out; return it to the scheduled phase.
    ExitFrightened(Entity),
    /// This ghost was eaten while frightened; send it home.
    MarkEaten(Entity),
}
