use glam::IVec2;
use maze_chase::game::Game;
use maze_chase::map::direction::Direction;
use maze_chase::systems::components::{Position, Velocity};

mod common;
use common::*;

#[test]
fn test_buffered_direction_commits_at_tile_center() {
    let mut game = game();
    // Facing left into the outer wall; the buffered turn takes over.
    game.set_player_direction(Direction::Up);

    run_ticks(&mut game, 8);

    let pacman = pacman_entity(&mut game);
    let expected = tile_at(&mut game, IVec2::new(1, 4));
    assert_eq!(position_of(&mut game, pacman).current_tile(), expected);
}

#[test]
fn test_buffered_direction_into_wall_is_ignored() {
    let mut game = game();
    game.set_player_direction(Direction::Down);

    run_ticks(&mut game, 20);

    let pacman = pacman_entity(&mut game);
    let start = tile_at(&mut game, IVec2::new(1, 5));
    assert_eq!(position_of(&mut game, pacman), Position::Stopped { tile: start });
}

#[test]
fn test_stops_at_dead_end() {
    let mut game = game();
    game.set_player_direction(Direction::Up);

    run_ticks(&mut game, 60);

    let pacman = pacman_entity(&mut game);
    let corner = tile_at(&mut game, IVec2::new(1, 1));
    assert_eq!(position_of(&mut game, pacman), Position::Stopped { tile: corner });
}

#[test]
fn test_overshoot_chains_across_links() {
    let mut game = game();
    game.set_player_direction(Direction::Up);

    // 24 pixels in a single frame crosses three tiles.
    game.tick(24.0 / 60.0);

    let pacman = pacman_entity(&mut game);
    let expected = tile_at(&mut game, IVec2::new(1, 2));
    assert_eq!(position_of(&mut game, pacman).current_tile(), expected);
}

#[test]
fn test_tunnel_wraps_to_far_side() {
    let mut game = Game::default_level().unwrap();
    let pacman = pacman_entity(&mut game);
    let start = tile_at(&mut game, IVec2::new(2, 14));
    place(&mut game, pacman, start);
    game.world.entity_mut(pacman).get_mut::<Velocity>().unwrap().direction = Direction::Left;

    run_ticks(&mut game, 30);

    let far_mouth = tile_at(&mut game, IVec2::new(27, 14));
    assert_eq!(position_of(&mut game, pacman).current_tile(), far_mouth);
}
