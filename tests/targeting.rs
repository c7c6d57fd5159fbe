use glam::IVec2;
use maze_chase::map::direction::Direction;
use maze_chase::systems::components::{ChaseTarget, GhostMode, Personality, Velocity};
use maze_chase::systems::mode::{ModeSchedule, Phase};
use pretty_assertions::assert_eq;

mod common;
use common::*;

/// Forces every ghost into chase mode under a chase-forever schedule.
fn force_chase(game: &mut maze_chase::game::Game) {
    game.world.insert_resource(ModeSchedule::new(vec![(Phase::Chase, u32::MAX)]));
    let ghosts: Vec<_> = game
        .world
        .query::<(bevy_ecs::entity::Entity, &Personality)>()
        .iter(&game.world)
        .map(|(entity, _)| entity)
        .collect();
    for entity in ghosts {
        *game.world.entity_mut(entity).get_mut::<GhostMode>().unwrap() = GhostMode::Chase;
    }
}

fn target_of(game: &mut maze_chase::game::Game, personality: Personality) -> usize {
    let entity = ghost_entity(game, personality);
    game.world.entity(entity).get::<ChaseTarget>().unwrap().0
}

fn face_pacman_up(game: &mut maze_chase::game::Game) {
    let pacman = pacman_entity(game);
    game.world.entity_mut(pacman).get_mut::<Velocity>().unwrap().direction = Direction::Up;
}

#[test]
fn test_scatter_targets_are_the_corners() {
    let mut game = game();
    game.tick(DT);

    let map = game.world.resource::<maze_chase::map::builder::TileMap>();
    let corners = map.scatter_corners;
    for personality in Personality::ALL {
        let corner = corners.get(personality);
        assert_eq!(target_of(&mut game, personality), corner);
    }
}

#[test]
fn test_blinky_chases_pacman_directly() {
    let mut game = game();
    force_chase(&mut game);
    game.tick(DT);

    let pacman_tile = tile_at(&mut game, PACMAN_START);
    assert_eq!(target_of(&mut game, Personality::Blinky), pacman_tile);
}

#[test]
fn test_pinky_leads_pacman_up_the_corridor() {
    let mut game = game();
    force_chase(&mut game);
    face_pacman_up(&mut game);
    game.tick(DT);

    // Four tiles up from the start: the corridor's top corner.
    assert_eq!(
        target_of(&mut game, Personality::Pinky),
        tile_at(&mut game, IVec2::new(1, 1))
    );
}

#[test]
fn test_inky_reflection_snaps_into_the_maze() {
    let mut game = game();
    force_chase(&mut game);
    face_pacman_up(&mut game);
    game.tick(DT);

    // ahead = (1,3); Blinky sits at (3,3), so the reflection (-1,3) falls
    // off the west edge and snaps to the nearest walkable tile.
    assert_eq!(
        target_of(&mut game, Personality::Inky),
        tile_at(&mut game, IVec2::new(1, 3))
    );
}

#[test]
fn test_mobile_leads_two_tiles() {
    let mut game = game();
    force_chase(&mut game);
    face_pacman_up(&mut game);
    game.tick(DT);

    assert_eq!(
        target_of(&mut game, Personality::Mobile),
        tile_at(&mut game, IVec2::new(1, 3))
    );
}

#[test]
fn test_sue_retreats_inside_her_radius() {
    let mut game = game();
    force_chase(&mut game);
    game.tick(DT);

    // The whole test board fits inside Sue's 16-tile radius.
    let map = game.world.resource::<maze_chase::map::builder::TileMap>();
    let corner = map.scatter_corners.sue;
    assert_eq!(target_of(&mut game, Personality::Sue), corner);
}
