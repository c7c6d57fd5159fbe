use bevy_ecs::resource::Resource;
use rand::seq::IndexedRandom;
use smallvec::SmallVec;

use crate::map::direction::Direction;
use crate::map::graph::{TileGraph, TileId, TraversalFlags};

/// Direction selection for frightened ghosts.
///
/// How a frightened ghost wanders is deliberately pluggable: the engine
/// only tracks membership and speed, and asks the installed policy where
/// to go at each decision tile.
pub trait FrightenedPolicy: Send + Sync {
    /// Picks the next direction from `tile`, or `None` to keep going.
    fn choose(&mut self, graph: &TileGraph, tile: TileId, facing: Direction) -> Option<Direction>;
}

/// The installed frightened-movement policy.
#[derive(Resource)]
pub struct FrightenedSteering(pub Box<dyn FrightenedPolicy>);

impl FrightenedSteering {
    pub fn new(policy: impl FrightenedPolicy + 'static) -> FrightenedSteering {
        FrightenedSteering(Box::new(policy))
    }
}

/// The default policy: a uniformly random non-reversing turn, reversing
/// only at dead ends.
#[derive(Default)]
pub struct RandomTurn;

impl FrightenedPolicy for RandomTurn {
    fn choose(&mut self, graph: &TileGraph, tile: TileId, facing: Direction) -> Option<Direction> {
        let opposite = facing.opposite();
        let mut options: SmallVec<[Direction; 3]> = SmallVec::new();

        for link in graph.links(tile).iter() {
            if link.flags.contains(TraversalFlags::GHOST) && link.direction != opposite {
                options.push(link.direction);
            }
        }

        if options.is_empty() {
            return graph
                .link(tile, opposite)
                .filter(|link| link.flags.contains(TraversalFlags::GHOST))
                .map(|link| link.direction);
        }

        options.choose(&mut rand::rng()).copied()
    }
}
