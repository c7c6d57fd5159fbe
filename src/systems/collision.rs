use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::Query,
};
use tracing::debug;

use crate::events::{CollisionEvent, GhostCommand};
use crate::systems::components::{GhostMode, PlayerControlled, Position};

/// Detects Pac-Man sharing a tile with a ghost.
///
/// Emits a `CollisionEvent` for every overlapping ghost; frightened ghosts
/// are additionally marked eaten here, while the death sequence decides
/// what a collision with a hostile ghost means.
pub fn collision_system(
    pacman: Query<(Entity, &Position), With<PlayerControlled>>,
    ghosts: Query<(Entity, &Position, &GhostMode), Without<PlayerControlled>>,
    mut collisions: EventWriter<CollisionEvent>,
    mut commands: EventWriter<GhostCommand>,
) {
    let Ok((pacman_entity, pacman_position)) = pacman.single() else {
        return;
    };
    let pacman_tile = pacman_position.current_tile();

    for (ghost_entity, ghost_position, mode) in ghosts.iter() {
        if ghost_position.current_tile() != pacman_tile {
            continue;
        }

        collisions.write(CollisionEvent {
            pacman: pacman_entity,
            ghost: ghost_entity,
        });

        if mode.is_frightened() {
            debug!(?ghost_entity, "frightened ghost caught");
            commands.write(GhostCommand::MarkEaten(ghost_entity));
        }
    }
}
