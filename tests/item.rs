use glam::IVec2;
use maze_chase::events::GameEvent;
use maze_chase::map::builder::TileMap;
use maze_chase::map::direction::Direction;
use maze_chase::systems::components::{SpeedConfig, Velocity};
use pretty_assertions::assert_eq;

mod common;
use common::*;

fn dot_events(events: &[GameEvent]) -> Vec<GameEvent> {
    events
        .iter()
        .copied()
        .filter(|e| matches!(e, GameEvent::DotEaten { .. } | GameEvent::PillEaten { .. }))
        .collect()
}

#[test]
fn test_dot_eaten_fires_once_per_tile() {
    let mut game = game();
    let first_dot = tile_at(&mut game, IVec2::new(1, 4));

    // Eat the whole west corridor going up.
    game.set_player_direction(Direction::Up);
    let eaten = dot_events(&run_collect(&mut game, 60));
    assert!(eaten.contains(&GameEvent::DotEaten { tile: first_dot }));

    // Every consumed tile fired exactly one event.
    let mut tiles: Vec<_> = eaten
        .iter()
        .map(|e| match e {
            GameEvent::DotEaten { tile } | GameEvent::PillEaten { tile } => *tile,
            _ => unreachable!(),
        })
        .collect();
    tiles.sort_unstable();
    tiles.dedup();
    assert_eq!(tiles.len(), eaten.len());

    // Walking back over the emptied corridor re-fires nothing.
    game.set_player_direction(Direction::Down);
    let repeat = dot_events(&run_collect(&mut game, 60));
    assert!(repeat.is_empty());
    assert_eq!(game.world.resource::<TileMap>().graph.item_at(first_dot), None);
}

#[test]
fn test_pill_event_reaches_consumers() {
    let mut game = game();
    let pill = tile_at(&mut game, IVec2::new(1, 1));

    // Walk the west corridor up to the pill at the corner.
    game.set_player_direction(Direction::Up);
    let events = run_collect(&mut game, 60);

    assert!(events.contains(&GameEvent::PillEaten { tile: pill }));
    assert_eq!(game.world.resource::<TileMap>().graph.item_at(pill), None);
}

#[test]
fn test_dot_speed_tier_applies_on_the_dot_tile() {
    let mut game = game();
    let speeds = *game.world.resource::<SpeedConfig>();
    let pacman = pacman_entity(&mut game);

    game.set_player_direction(Direction::Up);
    run_ticks(&mut game, 10);

    let velocity = game.world.entity(pacman).get::<Velocity>().unwrap();
    assert_eq!(velocity.speed, speeds.pacman_dot);
}

#[test]
fn test_remaining_items_decrease() {
    let mut game = game();
    let before = game.world.resource::<TileMap>().graph.remaining_items();

    game.set_player_direction(Direction::Up);
    run_ticks(&mut game, 40);

    let after = game.world.resource::<TileMap>().graph.remaining_items();
    assert!(after < before);
}
