use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::Without,
    system::{Query, Res},
};

use crate::constants::TICK_RATE;
use crate::events::GameEvent;
use crate::map::builder::TileMap;
use crate::map::graph::Link;
use crate::systems::components::{BufferedDirection, DeltaTime, EntityKind, Frozen, LastTile, Position, Velocity};

/// Whether a character of the given kind may cross this link.
pub fn can_traverse(kind: EntityKind, link: Link) -> bool {
    link.flags.contains(kind.traversal_flags())
}

/// Advances every unfrozen character along the tile graph.
///
/// At each tile center the buffered direction is tried first, falling back
/// to the current direction, and stopping dead when neither has a
/// traversable link. Movement chains across several links in one frame when
/// the distance covered overshoots a tile center. Emits `TileChanged` when
/// a character's occupied tile differs from the previous frame.
pub fn movement_system(
    map: Res<TileMap>,
    delta_time: Res<DeltaTime>,
    mut characters: Query<
        (
            Entity,
            &EntityKind,
            &mut Position,
            &mut Velocity,
            &mut BufferedDirection,
            &mut LastTile,
        ),
        Without<Frozen>,
    >,
    mut events: EventWriter<GameEvent>,
) {
    for (entity, kind, mut position, mut velocity, mut buffered, mut last_tile) in characters.iter_mut() {
        // Expire stale buffered requests
        if let BufferedDirection::Some {
            direction,
            remaining_time,
        } = *buffered
        {
            if remaining_time <= 0.0 {
                *buffered = BufferedDirection::None;
            } else {
                *buffered = BufferedDirection::Some {
                    direction,
                    remaining_time: remaining_time - delta_time.0,
                };
            }
        }

        let mut distance = velocity.speed * TICK_RATE * delta_time.0;

        loop {
            match *position {
                Position::Stopped { tile } => {
                    // A buffered direction wins if its link is open.
                    if let BufferedDirection::Some { direction, .. } = *buffered {
                        if let Some(link) = map.graph.link(tile, direction) {
                            if can_traverse(*kind, link) {
                                velocity.direction = link.direction;
                                *position = Position::Moving {
                                    from: tile,
                                    to: link.target,
                                    remaining_distance: link.distance,
                                };
                                *buffered = BufferedDirection::None;
                                continue;
                            }
                        }
                    }

                    // Otherwise carry on in the current direction, or stop.
                    match map.graph.link(tile, velocity.direction) {
                        Some(link) if can_traverse(*kind, link) => {
                            *position = Position::Moving {
                                from: tile,
                                to: link.target,
                                remaining_distance: link.distance,
                            };
                        }
                        _ => {
                            *buffered = BufferedDirection::None;
                            break;
                        }
                    }
                }
                Position::Moving { .. } => {
                    if let Some(overflow) = position.tick(distance) {
                        distance = overflow;
                    } else {
                        break;
                    }
                }
            }
        }

        let tile = position.current_tile();
        if tile != last_tile.0 {
            last_tile.0 = tile;
            events.write(GameEvent::TileChanged { entity, tile });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::direction::Direction;
    use crate::map::graph::TraversalFlags;

    #[test]
    fn test_can_traverse() {
        let link = Link {
            target: 0,
            distance: 8.0,
            direction: Direction::Up,
            flags: TraversalFlags::GHOST,
        };

        assert!(can_traverse(EntityKind::Ghost, link));
        assert!(!can_traverse(EntityKind::Pacman, link));
    }
}
