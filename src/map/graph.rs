use bitflags::bitflags;
use glam::{IVec2, Vec2};

use crate::constants::{TileKind, CELL_SIZE};
use crate::map::direction::Direction;
use crate::map::parser::ParsedBoard;

/// A unique identifier for a tile, represented by its index in the graph's storage.
pub type TileId = usize;

bitflags! {
    /// Defines which characters may traverse a given link.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct TraversalFlags: u8 {
        const PACMAN = 1 << 0;
        const GHOST = 1 << 1;
        const ALL = Self::PACMAN.bits() | Self::GHOST.bits();
    }
}

/// An item sitting on a tile, consumable exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Dot,
    Pill,
}

/// Represents a directed link from one tile to an adjacent (or tunnel-wrapped) tile.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    /// The destination tile of this link.
    pub target: TileId,
    /// The length of the link, in pixels.
    pub distance: f32,
    /// The cardinal direction of this link.
    pub direction: Direction,
    /// Defines who is allowed to traverse this link.
    pub flags: TraversalFlags,
}

/// The four possible links out of a tile.
///
/// Each field contains an optional link leading in that direction. This is
/// the adjacency storage for each tile, providing O(1) access to links in
/// any cardinal direction.
#[derive(Debug, Default, Clone, Copy)]
pub struct TileLinks {
    pub up: Option<Link>,
    pub down: Option<Link>,
    pub left: Option<Link>,
    pub right: Option<Link>,
}

impl TileLinks {
    /// Returns an iterator over all links out of this tile.
    ///
    /// This iterator yields only the links that exist (non-None values).
    pub fn iter(&self) -> impl Iterator<Item = Link> {
        [self.up, self.down, self.left, self.right].into_iter().flatten()
    }

    /// Retrieves the link in the specified direction, if it exists.
    pub fn get(&self, direction: Direction) -> Option<Link> {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Sets the link in the specified direction, overwriting any existing link.
    pub fn set(&mut self, direction: Direction, link: Link) {
        match direction {
            Direction::Up => self.up = Some(link),
            Direction::Down => self.down = Some(link),
            Direction::Left => self.left = Some(link),
            Direction::Right => self.right = Some(link),
        }
    }
}

/// A single maze cell: walkability code, pixel-center coordinates, and an
/// optional item slot.
#[derive(Debug)]
pub struct Tile {
    /// Grid coordinates (x = column, y = row).
    pub grid: IVec2,
    /// Pixel coordinates of the tile center.
    pub center: Vec2,
    /// The walkability code this tile was built from.
    pub kind: TileKind,
    item: Option<ItemKind>,
}

impl Tile {
    /// Returns true if characters can occupy this tile.
    pub fn is_walkable(&self) -> bool {
        self.kind.is_walkable()
    }

    /// Returns the item currently on this tile, without consuming it.
    pub fn item(&self) -> Option<ItemKind> {
        self.item
    }
}

/// The maze's directional adjacency graph.
///
/// Tiles are stored row-major in a vector, and their indices serve as their
/// `TileId`, so position lookups and neighbor lookups are both O(1). Links
/// are precomputed at construction, including tunnel wraparound at board
/// edges; nothing is searched per call. Topology is immutable after
/// construction — only the item slots mutate.
pub struct TileGraph {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    links: Vec<TileLinks>,
}

impl TileGraph {
    /// Builds the graph from a parsed board.
    ///
    /// Every cell (walls included) gets a tile so grid lookups stay O(1);
    /// links exist only between walkable tiles. Links touching a
    /// ghost-house tile are ghost-only, which is what keeps Pac-Man out of
    /// the house. Tunnel tiles sitting on a board edge are wrap-linked to
    /// the opposite edge of the same row or column.
    pub fn from_parsed(parsed: &ParsedBoard) -> TileGraph {
        let (width, height) = (parsed.width, parsed.height);
        let cell = CELL_SIZE as f32;
        let half = Vec2::splat(cell / 2.0);

        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let grid = IVec2::new(x as i32, y as i32);
                let kind = parsed.kind_at(grid).unwrap_or(TileKind::Wall);
                let item = match kind {
                    TileKind::Dot => Some(ItemKind::Dot),
                    TileKind::Pill => Some(ItemKind::Pill),
                    _ => None,
                };
                tiles.push(Tile {
                    grid,
                    center: grid.as_vec2() * cell + half,
                    kind,
                    item,
                });
            }
        }

        let mut links = vec![TileLinks::default(); width * height];
        for id in 0..tiles.len() {
            if !tiles[id].is_walkable() {
                continue;
            }
            for direction in Direction::DIRECTIONS {
                let neighbor_grid = tiles[id].grid + direction.as_ivec2();
                let target = match Self::index_of(width, height, neighbor_grid) {
                    Some(target) if tiles[target].is_walkable() => target,
                    // Hard boundary or wall; tunnel tiles at the board edge
                    // wrap to the opposite edge instead.
                    _ => match Self::wrap_target(width, height, &tiles, id, direction) {
                        Some(target) => target,
                        None => continue,
                    },
                };

                let flags = if tiles[id].kind == TileKind::House || tiles[target].kind == TileKind::House {
                    TraversalFlags::GHOST
                } else {
                    TraversalFlags::ALL
                };

                links[id].set(
                    direction,
                    Link {
                        target,
                        distance: cell,
                        direction,
                        flags,
                    },
                );
            }
        }

        TileGraph {
            width,
            height,
            tiles,
            links,
        }
    }

    fn index_of(width: usize, height: usize, pos: IVec2) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= width || pos.y as usize >= height {
            return None;
        }
        Some(pos.y as usize * width + pos.x as usize)
    }

    /// Computes the wrap destination for a tunnel tile at a board edge.
    ///
    /// The wrap exists whenever the opposite-edge cell is walkable; if that
    /// cell is not itself a tunnel, the link is one-way, which is the one
    /// intentional break in the graph's symmetry invariant.
    fn wrap_target(width: usize, height: usize, tiles: &[Tile], id: usize, direction: Direction) -> Option<usize> {
        if tiles[id].kind != TileKind::Tunnel {
            return None;
        }
        let grid = tiles[id].grid;
        let wrapped = match direction {
            Direction::Left if grid.x == 0 => IVec2::new(width as i32 - 1, grid.y),
            Direction::Right if grid.x == width as i32 - 1 => IVec2::new(0, grid.y),
            Direction::Up if grid.y == 0 => IVec2::new(grid.x, height as i32 - 1),
            Direction::Down if grid.y == height as i32 - 1 => IVec2::new(grid.x, 0),
            _ => return None,
        };
        Self::index_of(width, height, wrapped).filter(|&target| tiles[target].is_walkable())
    }

    /// Board width, in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Board height, in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the total number of tiles (walls included).
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Retrieves an immutable reference to a tile.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Returns the tile at the given grid position, if in bounds.
    pub fn tile_at(&self, pos: IVec2) -> Option<TileId> {
        Self::index_of(self.width, self.height, pos)
    }

    /// Returns the walkable tile at the given grid position, if any.
    pub fn walkable_at(&self, pos: IVec2) -> Option<TileId> {
        self.tile_at(pos).filter(|&id| self.tiles[id].is_walkable())
    }

    /// Returns the adjacent (or tunnel-wrapped) tile in the given direction. O(1).
    pub fn neighbor(&self, id: TileId, direction: Direction) -> Option<TileId> {
        self.link(id, direction).map(|link| link.target)
    }

    /// Returns the link out of a tile in the given direction. O(1).
    pub fn link(&self, id: TileId, direction: Direction) -> Option<Link> {
        self.links.get(id)?.get(direction)
    }

    /// Returns all links out of a tile.
    pub fn links(&self, id: TileId) -> TileLinks {
        self.links.get(id).copied().unwrap_or_default()
    }

    /// Follows up to `steps` links in the given direction, stopping early
    /// where a link is missing. Returns the last tile reached.
    pub fn walk(&self, from: TileId, direction: Direction, steps: usize) -> TileId {
        let mut current = from;
        for _ in 0..steps {
            match self.neighbor(current, direction) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Resolves arbitrary grid coordinates to the nearest valid walkable
    /// tile: out-of-bounds coordinates are clamped onto the board first,
    /// then snapped to the closest walkable tile (ties broken by tile id).
    pub fn resolve(&self, pos: IVec2) -> Option<TileId> {
        let clamped = IVec2::new(
            pos.x.clamp(0, self.width as i32 - 1),
            pos.y.clamp(0, self.height as i32 - 1),
        );
        if let Some(id) = self.walkable_at(clamped) {
            return Some(id);
        }

        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_walkable())
            .min_by_key(|(_, tile)| {
                let delta = tile.grid - clamped;
                delta.x as i64 * delta.x as i64 + delta.y as i64 * delta.y as i64
            })
            .map(|(id, _)| id)
    }

    /// Returns the pixel-center coordinates of a tile.
    pub fn center(&self, id: TileId) -> Option<Vec2> {
        self.tiles.get(id).map(|tile| tile.center)
    }

    /// Returns the item currently on a tile, without consuming it.
    pub fn item_at(&self, id: TileId) -> Option<ItemKind> {
        self.tiles.get(id).and_then(|tile| tile.item)
    }

    /// Removes and returns the tile's item.
    ///
    /// The item is consumed exactly once: a second call on an
    /// already-emptied tile is a no-op returning `None`, never an error.
    pub fn consume(&mut self, id: TileId) -> Option<ItemKind> {
        self.tiles.get_mut(id).and_then(|tile| tile.item.take())
    }

    /// Returns the number of items still on the board.
    pub fn remaining_items(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.item.is_some()).count()
    }

    /// Euclidean pixel distance between two tile centers.
    ///
    /// A missing or invalid tile reference on either side yields the
    /// "unreachable" sentinel (`f32::INFINITY`) rather than an error, so a
    /// single malformed reference degrades gracefully instead of halting
    /// the tick loop.
    pub fn tile_distance(&self, a: Option<TileId>, b: Option<TileId>) -> f32 {
        match (a.and_then(|id| self.center(id)), b.and_then(|id| self.center(id))) {
            (Some(a), Some(b)) => a.distance(b),
            _ => f32::INFINITY,
        }
    }
}
