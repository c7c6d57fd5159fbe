#![allow(dead_code)]

use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use glam::IVec2;

use maze_chase::game::Game;
use maze_chase::map::graph::TileId;
use maze_chase::systems::components::{LastTile, Personality, PlayerControlled, Position};

/// A small board with an open ghost house hanging off the east corridor.
pub const BOARD: [&str; 7] = [
    "===========",
    "=*........=",
    "=.=======.=",
    "=.=hhhhh..=",
    "=.=======.=",
    "=.........=",
    "===========",
];

pub const PACMAN_START: IVec2 = IVec2::new(1, 5);

pub const DT: f32 = 1.0 / 60.0;

pub fn game() -> Game {
    Game::new(&BOARD, PACMAN_START).unwrap()
}

pub fn run_ticks(game: &mut Game, ticks: u32) {
    for _ in 0..ticks {
        game.tick(DT);
    }
}

/// Ticks the game, draining and accumulating gameplay events every tick.
pub fn run_collect(game: &mut Game, ticks: u32) -> Vec<maze_chase::events::GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        game.tick(DT);
        events.extend(game.take_events());
    }
    events
}

pub fn tile_at(game: &mut Game, pos: IVec2) -> TileId {
    game.world
        .resource::<maze_chase::map::builder::TileMap>()
        .graph
        .walkable_at(pos)
        .unwrap()
}

pub fn pacman_entity(game: &mut Game) -> Entity {
    game.world
        .query_filtered::<Entity, With<PlayerControlled>>()
        .single(&game.world)
        .unwrap()
}

pub fn ghost_entity(game: &mut Game, personality: Personality) -> Entity {
    game.world
        .query::<(Entity, &Personality)>()
        .iter(&game.world)
        .find(|(_, p)| **p == personality)
        .map(|(entity, _)| entity)
        .unwrap()
}

/// Teleports an entity to a tile, as if it had just arrived there.
pub fn place(game: &mut Game, entity: Entity, tile: TileId) {
    let mut entry = game.world.entity_mut(entity);
    *entry.get_mut::<Position>().unwrap() = Position::Stopped { tile };
    entry.get_mut::<LastTile>().unwrap().0 = tile;
}

pub fn position_of(game: &mut Game, entity: Entity) -> Position {
    *game.world.entity(entity).get::<Position>().unwrap()
}
