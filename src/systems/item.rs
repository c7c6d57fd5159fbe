use bevy_ecs::{
    event::EventWriter,
    query::With,
    system::{Local, Query, Res, ResMut},
};
use tracing::{debug, trace};

use crate::events::GameEvent;
use crate::map::builder::TileMap;
use crate::map::graph::{ItemKind, TileId};
use crate::systems::components::{PlayerControlled, Position, SpeedConfig, Velocity};
use crate::systems::mode::FrightenedRoster;

/// Consumes the item under Pac-Man and selects his speed tier.
///
/// Runs only when Pac-Man crosses onto a new tile: the item there is
/// consumed (a single time; re-entering an eaten tile yields nothing) and
/// his speed for the next stretch is picked from the tier table based on
/// whether he just ate and whether any ghost is frightened.
pub fn item_system(
    mut map: ResMut<TileMap>,
    speeds: Res<SpeedConfig>,
    roster: Res<FrightenedRoster>,
    mut previous_tile: Local<Option<TileId>>,
    mut pacman: Query<(&Position, &mut Velocity), With<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
) {
    let Ok((position, mut velocity)) = pacman.single_mut() else {
        return;
    };

    let tile = position.current_tile();
    if *previous_tile == Some(tile) {
        return;
    }
    *previous_tile = Some(tile);

    let item = map.graph.consume(tile);
    match item {
        Some(ItemKind::Dot) => {
            trace!(tile, remaining = map.graph.remaining_items(), "dot eaten");
            events.write(GameEvent::DotEaten { tile });
        }
        Some(ItemKind::Pill) => {
            debug!(tile, "pill eaten");
            events.write(GameEvent::PillEaten { tile });
        }
        None => {}
    }

    velocity.speed = speeds.pacman_tier(roster.is_active(), item.is_some());
}
