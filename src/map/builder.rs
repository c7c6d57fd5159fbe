use bevy_ecs::resource::Resource;
use glam::IVec2;
use tracing::debug;

use crate::error::{GameResult, MapError};
use crate::map::graph::{TileGraph, TileId};
use crate::map::parser::BoardParser;
use crate::systems::components::Personality;

/// Spawn tiles for every character, resolved once at build time.
#[derive(Debug, Clone, Copy)]
pub struct StartPositions {
    pub pacman: TileId,
    pub blinky: TileId,
    pub pinky: TileId,
    pub inky: TileId,
    pub sue: TileId,
    pub mobile: TileId,
}

impl StartPositions {
    /// The spawn tile for a ghost archetype.
    pub fn ghost(&self, personality: Personality) -> TileId {
        match personality {
            Personality::Blinky => self.blinky,
            Personality::Pinky => self.pinky,
            Personality::Inky => self.inky,
            Personality::Sue => self.sue,
            Personality::Mobile => self.mobile,
        }
    }
}

/// Per-ghost scatter corners, one per board corner region.
#[derive(Debug, Clone, Copy)]
pub struct ScatterCorners {
    pub blinky: TileId,
    pub pinky: TileId,
    pub inky: TileId,
    pub sue: TileId,
    pub mobile: TileId,
}

impl ScatterCorners {
    pub fn get(&self, personality: Personality) -> TileId {
        match personality {
            Personality::Blinky => self.blinky,
            Personality::Pinky => self.pinky,
            Personality::Inky => self.inky,
            Personality::Sue => self.sue,
            Personality::Mobile => self.mobile,
        }
    }
}

/// The fully-built maze: the tile graph plus every derived landmark the
/// systems need (spawn tiles, scatter corners, the ghost-house return tile).
#[derive(Resource)]
pub struct TileMap {
    pub graph: TileGraph,
    pub start_positions: StartPositions,
    pub scatter_corners: ScatterCorners,
    /// The tile an eaten ghost navigates back to before reviving.
    pub house_target: TileId,
}

impl TileMap {
    /// Parses the raw board and derives all landmarks.
    ///
    /// Fails if the board is malformed, the Pac-Man start is not a walkable
    /// tile, or the board has fewer than five ghost-house tiles to spawn
    /// the ghosts on.
    pub fn new(raw_board: &[&str], pacman_start: IVec2) -> GameResult<TileMap> {
        let parsed = BoardParser::parse_board(raw_board)?;
        let graph = TileGraph::from_parsed(&parsed);

        let pacman = graph
            .walkable_at(pacman_start)
            .ok_or(MapError::TileNotFound(pacman_start))?;

        if parsed.house.len() < 5 {
            return Err(MapError::InvalidConfig(format!(
                "board has {} ghost-house tiles, need at least 5",
                parsed.house.len()
            ))
            .into());
        }

        // House tiles arrive in reading order from the parser; the first
        // five are the ghost spawns.
        let spawn = |index: usize| -> GameResult<TileId> {
            let grid = parsed.house[index];
            graph
                .walkable_at(grid)
                .ok_or_else(|| MapError::TileNotFound(grid).into())
        };
        let start_positions = StartPositions {
            pacman,
            blinky: spawn(0)?,
            pinky: spawn(1)?,
            inky: spawn(2)?,
            sue: spawn(3)?,
            mobile: spawn(4)?,
        };

        let (w, h) = (graph.width() as i32, graph.height() as i32);
        let corner = |pos: IVec2| -> GameResult<TileId> {
            graph
                .resolve(pos)
                .ok_or_else(|| MapError::TileNotFound(pos).into())
        };
        let scatter_corners = ScatterCorners {
            blinky: corner(IVec2::new(w - 3, 0))?,
            pinky: corner(IVec2::new(0, 0))?,
            inky: corner(IVec2::new(w - 1, h - 1))?,
            sue: corner(IVec2::new(0, h - 1))?,
            mobile: corner(IVec2::new(w - 1, 0))?,
        };

        let house_target = Self::house_center(&graph, &parsed.house)
            .ok_or_else(|| MapError::InvalidConfig("no ghost-house tiles".into()))?;

        debug!(
            width = graph.width(),
            height = graph.height(),
            items = graph.remaining_items(),
            "maze built"
        );

        Ok(TileMap {
            graph,
            start_positions,
            scatter_corners,
            house_target,
        })
    }

    /// Picks the house tile nearest the centroid of all house tiles.
    fn house_center(graph: &TileGraph, house: &[IVec2]) -> Option<TileId> {
        if house.is_empty() {
            return None;
        }
        let sum: IVec2 = house.iter().copied().sum();
        let centroid = sum.as_vec2() / house.len() as f32;
        house
            .iter()
            .min_by(|a, b| {
                let da = a.as_vec2().distance_squared(centroid);
                let db = b.as_vec2().distance_squared(centroid);
                da.total_cmp(&db)
            })
            .and_then(|&grid| graph.walkable_at(grid))
    }
}
