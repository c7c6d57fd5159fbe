use bevy_ecs::{
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use smallvec::SmallVec;
use tracing::warn;

use crate::constants::{CELL_SIZE, SUE_CHASE_RADIUS_TILES};
use crate::map::builder::TileMap;
use crate::map::direction::Direction;
use crate::map::graph::{Link, TileGraph, TileId, TraversalFlags};
use crate::systems::components::{
    BufferedDirection, ChaseTarget, GhostConfig, GhostMode, Personality, PlayerControlled, Position, Velocity,
};
use crate::systems::frightened::FrightenedSteering;

/// How long a steering decision stays valid before it expires unused, in seconds.
const STEER_BUFFER_TIME: f32 = 0.25;

/// Everything a pursuit algorithm is allowed to see, captured once per tick.
///
/// Strategies are pure functions over this snapshot; none of them may reach
/// into live ECS state.
#[derive(Debug, Clone, Copy)]
pub struct TargetSnapshot {
    pub pacman_tile: TileId,
    pub pacman_direction: Direction,
    pub own_tile: TileId,
    /// Blinky's tile, needed only by Inky's reflection rule.
    pub blinky_tile: Option<TileId>,
    pub scatter_corner: TileId,
}

/// Computes the chase-mode target tile for a ghost archetype.
///
/// - Blinky targets Pac-Man's tile directly.
/// - Pinky leads four links ahead along Pac-Man's facing, the walk stopping
///   early at walls.
/// - Inky reflects Blinky's position through the point two links ahead of
///   Pac-Man, snapping out-of-bounds results to the nearest walkable tile.
/// - Sue chases while farther than a fixed radius from Pac-Man and retreats
///   to her scatter corner once inside it.
/// - Mobile leads two links ahead, a shorter-lead Pinky.
///
/// A missing tile reference anywhere resolves toward the chase branch
/// rather than failing.
pub fn chase_target(graph: &TileGraph, personality: Personality, snapshot: &TargetSnapshot) -> TileId {
    match personality {
        Personality::Blinky => snapshot.pacman_tile,
        Personality::Pinky => graph.walk(snapshot.pacman_tile, snapshot.pacman_direction, 4),
        Personality::Inky => {
            let ahead = graph.walk(snapshot.pacman_tile, snapshot.pacman_direction, 2);
            match (
                graph.tile(ahead).map(|tile| tile.grid),
                snapshot.blinky_tile.and_then(|id| graph.tile(id)).map(|tile| tile.grid),
            ) {
                (Some(ahead), Some(blinky)) => graph
                    .resolve(ahead * 2 - blinky)
                    .unwrap_or(snapshot.pacman_tile),
                _ => snapshot.pacman_tile,
            }
        }
        Personality::Sue => {
            let distance = graph.tile_distance(Some(snapshot.pacman_tile), Some(snapshot.own_tile));
            // The unreachable sentinel compares greater, defaulting to chase.
            if distance > SUE_CHASE_RADIUS_TILES * CELL_SIZE as f32 {
                snapshot.pacman_tile
            } else {
                snapshot.scatter_corner
            }
        }
        Personality::Mobile => graph.walk(snapshot.pacman_tile, snapshot.pacman_direction, 2),
    }
}

/// Picks the outgoing link that brings the ghost closest to its target.
///
/// Reversing is forbidden unless it is the only traversable option, the
/// classic rule that keeps ghosts committed at intersections.
pub fn steer_towards(graph: &TileGraph, from: TileId, facing: Direction, target: TileId) -> Option<Direction> {
    let opposite = facing.opposite();
    let mut options: SmallVec<[Link; 3]> = SmallVec::new();

    for link in graph.links(from).iter() {
        if link.flags.contains(TraversalFlags::GHOST) && link.direction != opposite {
            options.push(link);
        }
    }

    if options.is_empty() {
        // Dead end; the reversal ban yields.
        return graph
            .link(from, opposite)
            .filter(|link| link.flags.contains(TraversalFlags::GHOST))
            .map(|link| link.direction);
    }

    options
        .iter()
        .min_by(|a, b| {
            let da = graph.tile_distance(Some(a.target), Some(target));
            let db = graph.tile_distance(Some(b.target), Some(target));
            da.total_cmp(&db)
        })
        .map(|link| link.direction)
}

/// Recomputes each ghost's target tile and buffers its next turn.
///
/// Scatter ghosts head for their corner, chasing ghosts run their
/// archetype's algorithm, eaten ghosts head for the house door, and
/// frightened ghosts defer to the externally supplied steering policy.
pub fn ghost_targeting_system(
    map: Res<TileMap>,
    mut steering: ResMut<FrightenedSteering>,
    pacman: Query<(&Position, &Velocity), With<PlayerControlled>>,
    mut ghosts: Query<
        (
            &GhostConfig,
            &GhostMode,
            &Position,
            &Velocity,
            &mut BufferedDirection,
            &mut ChaseTarget,
        ),
        Without<PlayerControlled>,
    >,
) {
    let Ok((pacman_position, pacman_velocity)) = pacman.single() else {
        warn!("no player entity for targeting");
        return;
    };
    let pacman_tile = pacman_position.current_tile();
    let pacman_direction = pacman_velocity.direction;

    let blinky_tile = ghosts
        .iter()
        .find(|(config, ..)| config.personality == Personality::Blinky)
        .map(|(_, _, position, ..)| position.current_tile());

    for (config, mode, position, velocity, mut buffered, mut chase) in ghosts.iter_mut() {
        let decision_tile = position.decision_tile();

        if let GhostMode::Frightened { .. } = mode {
            if let Some(direction) = steering.0.choose(&map.graph, decision_tile, velocity.direction) {
                *buffered = BufferedDirection::Some {
                    direction,
                    remaining_time: STEER_BUFFER_TIME,
                };
            }
            continue;
        }

        let target = match mode {
            GhostMode::Scatter => config.scatter_corner,
            GhostMode::Chase => {
                let snapshot = TargetSnapshot {
                    pacman_tile,
                    pacman_direction,
                    own_tile: position.current_tile(),
                    blinky_tile,
                    scatter_corner: config.scatter_corner,
                };
                chase_target(&map.graph, config.personality, &snapshot)
            }
            GhostMode::Eaten => {
                // House return runs its own pathfinding; just record the target.
                chase.0 = config.house;
                continue;
            }
            GhostMode::Frightened { .. } => unreachable!(),
        };
        chase.0 = target;

        if let Some(direction) = steer_towards(&map.graph, decision_tile, velocity.direction, target) {
            *buffered = BufferedDirection::Some {
                direction,
                remaining_time: STEER_BUFFER_TIME,
            };
        }
    }
}
