use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::{With, Without},
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::constants::{CAUGHT_FREEZE_HOLD_TICKS, CAUGHT_SPIN_HOLD_TICKS, CAUGHT_TURNS};
use crate::events::{CollisionEvent, GameEvent};
use crate::map::builder::TileMap;
use crate::map::direction::Direction;
use crate::systems::components::{
    BufferedDirection, Frozen, GhostConfig, GhostMode, LastTile, PlayerControlled, Position, SpeedConfig, Velocity,
};
use crate::systems::mode::{FrightenedRoster, ModeSchedule};

/// Observable phase of the caught sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaughtPhase {
    Idle,
    /// Pac-Man spins through the direction cycle on a short cadence.
    Spinning,
    /// The final two counts hold still on a long cadence.
    Frozen,
}

/// The multi-phase sequence played when a hostile ghost catches Pac-Man.
///
/// A counter starts at 9: while above 2, Pac-Man's facing advances through
/// the spin cycle every 5 ticks; the final two counts hold for 25 ticks
/// each; reaching 0 resets the level.
#[derive(Resource, Debug, Default)]
pub struct CaughtSequence {
    turns: u8,
    hold: u8,
}

impl CaughtSequence {
    pub fn begin(&mut self) {
        self.turns = CAUGHT_TURNS;
        self.hold = 0;
    }

    pub fn is_active(&self) -> bool {
        self.turns > 0
    }

    pub fn phase(&self) -> CaughtPhase {
        match self.turns {
            0 => CaughtPhase::Idle,
            1..=2 => CaughtPhase::Frozen,
            _ => CaughtPhase::Spinning,
        }
    }

    pub fn turns(&self) -> u8 {
        self.turns
    }
}

/// Runs the caught sequence and resets the level when it completes.
///
/// A collision with a ghost that is neither frightened nor eaten starts the
/// sequence and freezes every character. While active, the sequence spins
/// Pac-Man's facing on its fixed cadence; when the counter runs out the
/// level is reset and play resumes.
#[allow(clippy::too_many_arguments)]
pub fn death_system(
    mut commands: Commands,
    map: Res<TileMap>,
    speeds: Res<SpeedConfig>,
    mut sequence: ResMut<CaughtSequence>,
    mut schedule: ResMut<ModeSchedule>,
    mut roster: ResMut<FrightenedRoster>,
    mut collisions: EventReader<CollisionEvent>,
    mut events: EventWriter<GameEvent>,
    mut pacman: Query<
        (Entity, &mut Position, &mut Velocity, &mut BufferedDirection, &mut LastTile),
        With<PlayerControlled>,
    >,
    mut ghosts: Query<
        (
            Entity,
            &GhostConfig,
            &mut GhostMode,
            &mut Position,
            &mut Velocity,
            &mut BufferedDirection,
            &mut LastTile,
        ),
        Without<PlayerControlled>,
    >,
) {
    let Ok((pacman_entity, mut position, mut velocity, mut buffered, mut last_tile)) = pacman.single_mut() else {
        return;
    };

    if !sequence.is_active() {
        for collision in collisions.read() {
            let Ok((_, config, mode, ..)) = ghosts.get_mut(collision.ghost) else {
                continue;
            };
            if mode.is_frightened() || mode.is_eaten() {
                continue;
            }

            info!(ghost = config.personality.as_ref(), "pacman caught");
            sequence.begin();
            velocity.direction = Direction::Right;
            commands.entity(pacman_entity).insert(Frozen);
            for (ghost_entity, ..) in ghosts.iter_mut() {
                commands.entity(ghost_entity).insert(Frozen);
            }
            break;
        }
        if !sequence.is_active() {
            return;
        }
    } else {
        // Collisions during the sequence are meaningless; drop them.
        collisions.clear();
    }

    if sequence.hold > 0 {
        sequence.hold -= 1;
        return;
    }

    if sequence.turns == CAUGHT_TURNS {
        events.write(GameEvent::PacmanDied);
    }

    if sequence.turns > 2 {
        velocity.direction = velocity.direction.spun();
        sequence.hold = CAUGHT_SPIN_HOLD_TICKS;
    } else {
        sequence.hold = CAUGHT_FREEZE_HOLD_TICKS;
    }
    sequence.turns -= 1;

    if sequence.turns == 0 {
        debug!("caught sequence complete, resetting level");
        sequence.hold = 0;

        *position = Position::Stopped {
            tile: map.start_positions.pacman,
        };
        *velocity = Velocity {
            direction: Direction::Left,
            speed: speeds.pacman_normal,
        };
        *buffered = BufferedDirection::None;
        last_tile.0 = map.start_positions.pacman;
        commands.entity(pacman_entity).remove::<Frozen>();

        schedule.reset();
        roster.clear();
        for (ghost_entity, config, mut mode, mut position, mut velocity, mut buffered, mut last_tile) in
            ghosts.iter_mut()
        {
            let start = map.start_positions.ghost(config.personality);
            *mode = schedule.current().mode();
            *position = Position::Stopped { tile: start };
            *velocity = Velocity {
                direction: Direction::Left,
                speed: speeds.ghost_normal,
            };
            *buffered = BufferedDirection::None;
            last_tile.0 = start;
            commands.entity(ghost_entity).remove::<Frozen>();
        }

        events.write(GameEvent::PacmanRespawned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_tracks_counter() {
        let mut sequence = CaughtSequence::default();
        assert_eq!(sequence.phase(), CaughtPhase::Idle);

        sequence.begin();
        assert_eq!(sequence.turns(), CAUGHT_TURNS);
        assert_eq!(sequence.phase(), CaughtPhase::Spinning);

        sequence.turns = 2;
        assert_eq!(sequence.phase(), CaughtPhase::Frozen);
        sequence.turns = 0;
        assert_eq!(sequence.phase(), CaughtPhase::Idle);
    }
}
