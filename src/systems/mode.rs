use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use pathfinding::prelude::dijkstra;
use tracing::{debug, trace, warn};

use crate::error::GameError;
use crate::events::{GameEvent, GhostCommand};
use crate::map::builder::TileMap;
use crate::map::direction::Direction;
use crate::map::graph::{TileId, TraversalFlags};
use crate::systems::components::{BufferedDirection, GhostConfig, GhostMode, Position, SpeedConfig, Velocity};

/// A phase of the global scatter/chase alternation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scatter,
    Chase,
}

impl Phase {
    pub fn mode(self) -> GhostMode {
        match self {
            Phase::Scatter => GhostMode::Scatter,
            Phase::Chase => GhostMode::Chase,
        }
    }
}

/// The global scatter/chase timetable, externally configured.
///
/// Phases run in order for their tick duration; the final phase holds
/// forever once reached.
#[derive(Resource, Debug, Clone)]
pub struct ModeSchedule {
    phases: Vec<(Phase, u32)>,
    index: usize,
    ticks_in_phase: u32,
}

impl ModeSchedule {
    pub fn new(phases: Vec<(Phase, u32)>) -> ModeSchedule {
        assert!(!phases.is_empty(), "schedule needs at least one phase");
        ModeSchedule {
            phases,
            index: 0,
            ticks_in_phase: 0,
        }
    }

    /// The phase currently in effect.
    pub fn current(&self) -> Phase {
        self.phases[self.index].0
    }

    /// Advances one tick. Returns the new phase when a boundary is crossed.
    pub fn tick(&mut self) -> Option<Phase> {
        if self.index == self.phases.len() - 1 {
            return None;
        }
        self.ticks_in_phase += 1;
        if self.ticks_in_phase >= self.phases[self.index].1 {
            self.index += 1;
            self.ticks_in_phase = 0;
            return Some(self.current());
        }
        None
    }

    /// Rewinds to the first phase.
    pub fn reset(&mut self) {
        self.index = 0;
        self.ticks_in_phase = 0;
    }
}

impl Default for ModeSchedule {
    fn default() -> Self {
        // The classic level-one timetable, in ticks.
        ModeSchedule::new(vec![
            (Phase::Scatter, 420),
            (Phase::Chase, 1200),
            (Phase::Scatter, 420),
            (Phase::Chase, 1200),
            (Phase::Scatter, 300),
            (Phase::Chase, 1200),
            (Phase::Scatter, 300),
            (Phase::Chase, u32::MAX),
        ])
    }
}

/// The ordered set of currently-frightened ghosts.
///
/// Entry appends if absent; exit removes the one ghost whose timer (or
/// external trigger) fired, so membership stays fully independent.
#[derive(Resource, Debug, Default)]
pub struct FrightenedRoster {
    ghosts: Vec<Entity>,
}

impl FrightenedRoster {
    /// Appends a ghost if it is not already present. Returns whether it was added.
    pub fn insert(&mut self, ghost: Entity) -> bool {
        if self.ghosts.contains(&ghost) {
            return false;
        }
        self.ghosts.push(ghost);
        true
    }

    /// Removes a single ghost. Returns whether it was present.
    pub fn remove(&mut self, ghost: Entity) -> bool {
        match self.ghosts.iter().position(|&g| g == ghost) {
            Some(index) => {
                self.ghosts.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, ghost: Entity) -> bool {
        self.ghosts.contains(&ghost)
    }

    /// Whether any ghost is currently frightened.
    pub fn is_active(&self) -> bool {
        !self.ghosts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.ghosts.iter().copied()
    }

    pub fn clear(&mut self) {
        self.ghosts.clear();
    }
}

/// Drives every ghost's mode each tick.
///
/// Applies scatter/chase flips from the global schedule, enters frightened
/// mode on pill pickup (with the one-time direction reversal), counts down
/// each ghost's own frightened timer, and services per-ghost commands from
/// the collision system or external callers.
pub fn ghost_mode_system(
    mut schedule: ResMut<ModeSchedule>,
    mut roster: ResMut<FrightenedRoster>,
    speeds: Res<SpeedConfig>,
    mut game_events: EventReader<GameEvent>,
    mut commands: EventReader<GhostCommand>,
    mut ghosts: Query<(Entity, &GhostConfig, &mut GhostMode, &mut Velocity)>,
) {
    // Schedule flips apply only to ghosts following the schedule.
    if let Some(phase) = schedule.tick() {
        debug!(?phase, "scatter/chase flip");
        for (_, _, mut mode, _) in ghosts.iter_mut() {
            if matches!(*mode, GhostMode::Scatter | GhostMode::Chase) {
                *mode = phase.mode();
            }
        }
    }

    // Pill pickups frighten every ghost that is not eaten.
    for event in game_events.read() {
        if !matches!(event, GameEvent::PillEaten { .. }) {
            continue;
        }
        for (entity, config, mut mode, mut velocity) in ghosts.iter_mut() {
            if mode.is_eaten() {
                continue;
            }
            velocity.direction = velocity.direction.opposite();
            velocity.speed = speeds.ghost_frightened;
            *mode = GhostMode::new_frightened();
            if roster.insert(entity) {
                trace!(ghost = config.personality.as_ref(), "frightened");
            }
        }
    }

    // Per-ghost frightened timers expire independently.
    for (entity, config, mut mode, mut velocity) in ghosts.iter_mut() {
        if let GhostMode::Frightened { remaining_ticks } = &mut *mode {
            *remaining_ticks = remaining_ticks.saturating_sub(1);
            if *remaining_ticks == 0 {
                trace!(ghost = config.personality.as_ref(), "frightened timer expired");
                *mode = schedule.current().mode();
                velocity.speed = speeds.ghost_normal;
                roster.remove(entity);
            }
        }
    }

    for command in commands.read() {
        match *command {
            GhostCommand::ExitFrightened(entity) => {
                if let Ok((_, config, mut mode, mut velocity)) = ghosts.get_mut(entity) {
                    if mode.is_frightened() {
                        trace!(ghost = config.personality.as_ref(), "frightened exit requested");
                        *mode = schedule.current().mode();
                        velocity.speed = speeds.ghost_normal;
                        roster.remove(entity);
                    }
                }
            }
            GhostCommand::MarkEaten(entity) => {
                if let Ok((_, config, mut mode, mut velocity)) = ghosts.get_mut(entity) {
                    debug!(ghost = config.personality.as_ref(), "eaten, heading home");
                    *mode = GhostMode::Eaten;
                    velocity.speed = speeds.ghost_eaten;
                    roster.remove(entity);
                }
            }
        }
    }
}

/// Walks eaten ghosts home along the shortest path and revives them.
///
/// Runs after targeting so its steering decision wins for eaten ghosts.
pub fn eaten_return_system(
    map: Res<TileMap>,
    schedule: Res<ModeSchedule>,
    speeds: Res<SpeedConfig>,
    mut ghosts: Query<(
        &GhostConfig,
        &mut GhostMode,
        &Position,
        &mut Velocity,
        &mut BufferedDirection,
    )>,
    mut errors: EventWriter<GameError>,
) {
    for (config, mut mode, position, mut velocity, mut buffered) in ghosts.iter_mut() {
        if !mode.is_eaten() {
            continue;
        }

        if position.is_at_tile() && position.current_tile() == config.house {
            debug!(ghost = config.personality.as_ref(), "reached house, reviving");
            *mode = schedule.current().mode();
            velocity.speed = speeds.ghost_normal;
            continue;
        }

        let start = position.decision_tile();
        match shortest_path_step(&map, start, config.house) {
            Some(direction) => {
                *buffered = BufferedDirection::Some {
                    direction,
                    remaining_time: 0.25,
                };
            }
            None => {
                warn!(ghost = config.personality.as_ref(), start, "no path to house");
                errors.write(GameError::InvalidState(format!(
                    "no ghost path from tile {} to house {}",
                    start, config.house
                )));
            }
        }
    }
}

/// First hop of the shortest ghost-traversable path between two tiles.
fn shortest_path_step(map: &TileMap, start: TileId, goal: TileId) -> Option<Direction> {
    if start == goal {
        return None;
    }
    let (path, _cost) = dijkstra(
        &start,
        |&id| {
            map.graph
                .links(id)
                .iter()
                .filter(|link| link.flags.contains(TraversalFlags::GHOST))
                .map(|link| (link.target, (link.distance * 100.0) as u32))
                .collect::<Vec<_>>()
        },
        |&id| id == goal,
    )?;

    let next = *path.get(1)?;
    map.graph
        .links(start)
        .iter()
        .find(|link| link.target == next)
        .map(|link| link.direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_flips_at_boundaries() {
        let mut schedule = ModeSchedule::new(vec![(Phase::Scatter, 3), (Phase::Chase, 2), (Phase::Scatter, 1)]);
        assert_eq!(schedule.current(), Phase::Scatter);

        assert_eq!(schedule.tick(), None);
        assert_eq!(schedule.tick(), None);
        assert_eq!(schedule.tick(), Some(Phase::Chase));
        assert_eq!(schedule.tick(), None);
        assert_eq!(schedule.tick(), Some(Phase::Scatter));

        // The final phase holds forever.
        for _ in 0..10 {
            assert_eq!(schedule.tick(), None);
        }
        assert_eq!(schedule.current(), Phase::Scatter);
    }

    #[test]
    fn test_schedule_reset() {
        let mut schedule = ModeSchedule::new(vec![(Phase::Scatter, 1), (Phase::Chase, 1)]);
        schedule.tick();
        assert_eq!(schedule.current(), Phase::Chase);

        schedule.reset();
        assert_eq!(schedule.current(), Phase::Scatter);
    }

    #[test]
    fn test_roster_append_if_absent() {
        let mut roster = FrightenedRoster::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        assert!(roster.insert(a));
        assert!(!roster.insert(a));
        assert!(roster.insert(b));
        assert_eq!(roster.iter().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_roster_independent_removal() {
        let mut roster = FrightenedRoster::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        roster.insert(a);
        roster.insert(b);

        assert!(roster.remove(a));
        assert!(!roster.remove(a));
        assert!(roster.contains(b));
        assert!(roster.is_active());

        roster.remove(b);
        assert!(!roster.is_active());
    }
}
