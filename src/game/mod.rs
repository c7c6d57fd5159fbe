//! Game assembly and the fixed-rate tick loop.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::{schedule::Schedule, world::World};
use glam::IVec2;
use tracing::info;

use crate::constants::{DEFAULT_BOARD, PACMAN_START};
use crate::error::{GameError, GameResult};
use crate::events::{CollisionEvent, GameEvent, GhostCommand};
use crate::map::builder::TileMap;
use crate::map::direction::Direction;
use crate::systems::collision::collision_system;
use crate::systems::components::{
    BufferedDirection, ChaseTarget, DeltaTime, EntityKind, GhostBundle, GhostConfig, LastTile, Personality,
    PlayerBundle, PlayerControlled, Position, SpeedConfig, Velocity,
};
use crate::systems::death::{death_system, CaughtSequence};
use crate::systems::frightened::{FrightenedSteering, RandomTurn};
use crate::systems::item::item_system;
use crate::systems::mode::{eaten_return_system, ghost_mode_system, FrightenedRoster, ModeSchedule};
use crate::systems::movement::movement_system;
use crate::systems::targeting::ghost_targeting_system;

/// The assembled simulation: a world of characters over a tile graph, and
/// the fixed per-tick system pipeline.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Builds a game from a raw board and Pac-Man's starting grid position.
    pub fn new(raw_board: &[&str], pacman_start: IVec2) -> GameResult<Game> {
        let mut world = World::default();
        let mut schedule = Schedule::default();

        EventRegistry::register_event::<GameError>(&mut world);
        EventRegistry::register_event::<GameEvent>(&mut world);
        EventRegistry::register_event::<CollisionEvent>(&mut world);
        EventRegistry::register_event::<GhostCommand>(&mut world);

        let map = TileMap::new(raw_board, pacman_start)?;
        let speeds = SpeedConfig::default();
        let mode_schedule = ModeSchedule::default();

        world.spawn(PlayerBundle {
            player: PlayerControlled,
            kind: EntityKind::Pacman,
            position: Position::Stopped {
                tile: map.start_positions.pacman,
            },
            velocity: Velocity {
                direction: Direction::Left,
                speed: speeds.pacman_normal,
            },
            buffered: BufferedDirection::None,
            last_tile: LastTile(map.start_positions.pacman),
        });

        for personality in Personality::ALL {
            let start = map.start_positions.ghost(personality);
            world.spawn(GhostBundle {
                kind: EntityKind::Ghost,
                personality,
                config: GhostConfig {
                    personality,
                    scatter_corner: map.scatter_corners.get(personality),
                    house: map.house_target,
                },
                mode: mode_schedule.current().mode(),
                chase: ChaseTarget(map.scatter_corners.get(personality)),
                position: Position::Stopped { tile: start },
                velocity: Velocity {
                    direction: Direction::Up,
                    speed: speeds.ghost_normal,
                },
                buffered: BufferedDirection::None,
                last_tile: LastTile(start),
            });
        }

        info!(
            width = map.graph.width(),
            height = map.graph.height(),
            items = map.graph.remaining_items(),
            "game assembled"
        );

        world.insert_resource(map);
        world.insert_resource(speeds);
        world.insert_resource(mode_schedule);
        world.insert_resource(DeltaTime(0f32));
        world.insert_resource(FrightenedRoster::default());
        world.insert_resource(CaughtSequence::default());
        world.insert_resource(FrightenedSteering::new(RandomTurn));

        schedule.add_systems(
            (
                movement_system,
                collision_system,
                item_system,
                ghost_targeting_system,
                ghost_mode_system,
                eaten_return_system,
                death_system,
            )
                .chain(),
        );

        Ok(Game { world, schedule })
    }

    /// Builds a game on the bundled board.
    pub fn default_level() -> GameResult<Game> {
        Game::new(&DEFAULT_BOARD, PACMAN_START)
    }

    /// Advances the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.world.insert_resource(DeltaTime(dt));
        self.schedule.run(&mut self.world);

        // Age the event buffers; external consumers get one tick to drain.
        self.world.resource_mut::<Events<GameError>>().update();
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<CollisionEvent>>().update();
        self.world.resource_mut::<Events<GhostCommand>>().update();
    }

    /// Buffers a direction change for Pac-Man, applied at the next open
    /// tile-center crossing.
    pub fn set_player_direction(&mut self, direction: Direction) {
        let mut players = self
            .world
            .query_filtered::<&mut BufferedDirection, With<PlayerControlled>>();
        if let Ok(mut buffered) = players.single_mut(&mut self.world) {
            *buffered = BufferedDirection::Some {
                direction,
                remaining_time: 0.25,
            };
        }
    }

    /// Drains every gameplay event emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.world.resource_mut::<Events<GameEvent>>().drain().collect()
    }

    /// Drains every runtime error emitted since the last call.
    pub fn take_errors(&mut self) -> Vec<GameError> {
        self.world.resource_mut::<Events<GameError>>().drain().collect()
    }
}
