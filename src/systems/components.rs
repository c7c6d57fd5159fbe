use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;
use strum_macros::AsRefStr;

use crate::constants::FRIGHTENED_TICKS;
use crate::map::direction::Direction;
use crate::map::graph::{TileGraph, TileId, TraversalFlags};

/// A tag component for the entity controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// A tag component for entities whose movement is currently paused.
#[derive(Default, Component)]
pub struct Frozen;

/// A tag component denoting the type of entity, used for traversal checks.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Pacman,
    Ghost,
}

impl EntityKind {
    /// Returns the traversal flags for this entity kind.
    pub fn traversal_flags(&self) -> TraversalFlags {
        match self {
            EntityKind::Pacman => TraversalFlags::PACMAN,
            EntityKind::Ghost => TraversalFlags::GHOST,
        }
    }
}

/// The five ghost archetypes, each with its own pursuit algorithm.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Personality {
    Blinky,
    Pinky,
    Inky,
    Sue,
    Mobile,
}

impl Personality {
    /// All archetypes, in spawn order.
    pub const ALL: [Personality; 5] = [
        Personality::Blinky,
        Personality::Pinky,
        Personality::Inky,
        Personality::Sue,
        Personality::Mobile,
    ];
}

/// Per-ghost configuration, assembled once at spawn and never mutated.
#[derive(Component, Debug, Clone, Copy)]
pub struct GhostConfig {
    pub personality: Personality,
    /// Fixed retreat tile used during scatter mode and as Sue's retreat target.
    pub scatter_corner: TileId,
    /// The tile an eaten ghost returns to before reviving.
    pub house: TileId,
}

/// The mode a ghost is currently in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    /// Heading to its scatter corner.
    Scatter,
    /// Actively pursuing Pac-Man using its archetype's strategy.
    Chase,
    /// Vulnerable after a pill pickup; slow, with its own countdown.
    Frightened { remaining_ticks: u32 },
    /// Eaten; returning to the ghost house.
    Eaten,
}

impl GhostMode {
    pub fn new_frightened() -> GhostMode {
        GhostMode::Frightened {
            remaining_ticks: FRIGHTENED_TICKS,
        }
    }

    pub fn is_frightened(&self) -> bool {
        matches!(self, GhostMode::Frightened { .. })
    }

    pub fn is_eaten(&self) -> bool {
        matches!(self, GhostMode::Eaten)
    }
}

/// The ghost's current pursuit target, exposed for debug overlays.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChaseTarget(pub TileId);

/// Represents the current position of a character traversing the tile graph.
///
/// This enum allows for precise tracking of whether a character is exactly
/// at a tile center or moving along a link between two tiles.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// The character is located exactly at a tile center.
    Stopped { tile: TileId },
    /// The character is on a link between two tile centers.
    Moving {
        from: TileId,
        to: TileId,
        /// Remaining distance until the `to` tile center, in pixels.
        remaining_distance: f32,
    },
}

impl Position {
    /// Returns `true` if the character sits exactly at a tile center.
    pub fn is_at_tile(&self) -> bool {
        matches!(self, Position::Stopped { .. })
    }

    /// The tile the character currently occupies: the departed tile while a
    /// link crossing is still in progress.
    pub fn current_tile(&self) -> TileId {
        match self {
            Position::Stopped { tile } => *tile,
            Position::Moving { from, .. } => *from,
        }
    }

    /// The tile whose links decide the next turn: the tile currently being
    /// approached, or the tile stood on.
    pub fn decision_tile(&self) -> TileId {
        match self {
            Position::Stopped { tile } => *tile,
            Position::Moving { to, .. } => *to,
        }
    }

    /// Advances along the current link by `distance` pixels.
    ///
    /// Returns `Some(overflow)` when the `to` tile center is reached (the
    /// position becomes `Stopped` there), or `None` while still on the link.
    pub fn tick(&mut self, distance: f32) -> Option<f32> {
        if let Position::Moving {
            to, remaining_distance, ..
        } = self
        {
            if distance <= 0.0 {
                return None;
            }
            if *remaining_distance > distance {
                *remaining_distance -= distance;
                return None;
            }
            let overflow = distance - *remaining_distance;
            *self = Position::Stopped { tile: *to };
            return Some(overflow);
        }
        None
    }

    /// Calculates the current pixel position, interpolating along the link.
    pub fn pixel_position(&self, graph: &TileGraph) -> Option<Vec2> {
        match self {
            Position::Stopped { tile } => graph.center(*tile),
            Position::Moving {
                from,
                to,
                remaining_distance,
            } => {
                let from_center = graph.center(*from)?;
                let to_center = graph.center(*to)?;
                let link = graph
                    .links(*from)
                    .iter()
                    .find(|link| link.target == *to)?;
                if link.distance <= 0.0 {
                    return Some(to_center);
                }
                let progress = 1.0 - (remaining_distance / link.distance);
                Some(from_center.lerp(to_center, progress.clamp(0.0, 1.0)))
            }
        }
    }
}

/// A component for characters that have a velocity, with a direction and speed.
///
/// Speed is in pixels per tick at the fixed rate; it is written by the mode
/// and item systems, never computed by the movement controller itself.
#[derive(Component, Debug, Clone, Copy)]
pub struct Velocity {
    pub direction: Direction,
    pub speed: f32,
}

/// A buffered direction change, applied opportunistically at the next tile
/// boundary if the path there is open (the "preturn"). Requests into walls
/// are dropped silently when the buffer expires.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum BufferedDirection {
    #[default]
    None,
    Some {
        direction: Direction,
        /// Remaining wall-clock time before the request expires, in seconds.
        remaining_time: f32,
    },
}

/// The tile a character occupied after the previous tick, used to detect
/// tile-boundary crossings.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastTile(pub TileId);

/// The elapsed time since the previous tick, in seconds.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DeltaTime(pub f32);

/// Speed tiers for every character, in pixels per tick. External
/// configuration; the movement controller just reads whatever the mode and
/// item systems select from here.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpeedConfig {
    pub pacman_normal: f32,
    pub pacman_dot: f32,
    pub pacman_frightened: f32,
    pub pacman_frightened_dot: f32,
    pub ghost_normal: f32,
    pub ghost_frightened: f32,
    /// Eaten ghosts hurry home at a multiple of their normal speed.
    pub ghost_eaten: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            pacman_normal: 1.0,
            pacman_dot: 0.875,
            pacman_frightened: 1.125,
            pacman_frightened_dot: 1.0,
            ghost_normal: 0.9375,
            ghost_frightened: 0.625,
            ghost_eaten: 1.875,
        }
    }
}

impl SpeedConfig {
    /// Pac-Man's speed for the current frightened/dot-eating combination.
    pub fn pacman_tier(&self, frightened_active: bool, ate_dot: bool) -> f32 {
        match (frightened_active, ate_dot) {
            (false, false) => self.pacman_normal,
            (false, true) => self.pacman_dot,
            (true, false) => self.pacman_frightened,
            (true, true) => self.pacman_frightened_dot,
        }
    }
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub kind: EntityKind,
    pub position: Position,
    pub velocity: Velocity,
    pub buffered: BufferedDirection,
    pub last_tile: LastTile,
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub kind: EntityKind,
    pub personality: Personality,
    pub config: GhostConfig,
    pub mode: GhostMode,
    pub chase: ChaseTarget,
    pub position: Position,
    pub velocity: Velocity,
    pub buffered: BufferedDirection,
    pub last_tile: LastTile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_current_tile() {
        let stopped = Position::Stopped { tile: 5 };
        let moving = Position::Moving {
            from: 3,
            to: 7,
            remaining_distance: 4.0,
        };

        assert_eq!(stopped.current_tile(), 5);
        assert_eq!(moving.current_tile(), 3);
        assert_eq!(stopped.decision_tile(), 5);
        assert_eq!(moving.decision_tile(), 7);
    }

    #[test]
    fn test_position_tick_partial() {
        let mut pos = Position::Moving {
            from: 0,
            to: 1,
            remaining_distance: 8.0,
        };
        assert_eq!(pos.tick(3.0), None);
        assert_eq!(
            pos,
            Position::Moving {
                from: 0,
                to: 1,
                remaining_distance: 5.0,
            }
        );
    }

    #[test]
    fn test_position_tick_arrival_overflow() {
        let mut pos = Position::Moving {
            from: 0,
            to: 1,
            remaining_distance: 2.0,
        };
        assert_eq!(pos.tick(5.0), Some(3.0));
        assert_eq!(pos, Position::Stopped { tile: 1 });
    }

    #[test]
    fn test_position_tick_noop_when_stopped() {
        let mut pos = Position::Stopped { tile: 2 };
        assert_eq!(pos.tick(5.0), None);
        assert_eq!(pos, Position::Stopped { tile: 2 });
    }

    #[test]
    fn test_pixel_position_interpolates_along_link() {
        use crate::map::parser::BoardParser;

        let graph = TileGraph::from_parsed(&BoardParser::parse_board(&["====", "=..=", "===="]).unwrap());
        let from = graph.walkable_at(glam::IVec2::new(1, 1)).unwrap();
        let to = graph.walkable_at(glam::IVec2::new(2, 1)).unwrap();

        let stopped = Position::Stopped { tile: from };
        assert_eq!(stopped.pixel_position(&graph), graph.center(from));

        // Halfway across an 8-pixel link.
        let moving = Position::Moving {
            from,
            to,
            remaining_distance: 4.0,
        };
        let expected = (graph.center(from).unwrap() + graph.center(to).unwrap()) / 2.0;
        assert_eq!(moving.pixel_position(&graph), Some(expected));
    }

    #[test]
    fn test_pacman_tier() {
        let config = SpeedConfig::default();
        assert_eq!(config.pacman_tier(false, false), config.pacman_normal);
        assert_eq!(config.pacman_tier(false, true), config.pacman_dot);
        assert_eq!(config.pacman_tier(true, false), config.pacman_frightened);
        assert_eq!(config.pacman_tier(true, true), config.pacman_frightened_dot);
    }
}
