//! This module contains all the constants used by the engine.

use std::time::Duration;

use glam::IVec2;

/// The duration of one tick at the fixed 60 Hz rate.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The fixed tick rate, in ticks per second.
pub const TICK_RATE: f32 = 60.0;

/// The size of each cell, in pixels.
pub const CELL_SIZE: u32 = 8;

/// Sue's chase radius, in tile widths. Inside this radius she retreats to
/// her scatter corner; outside it she chases directly. The comparison is
/// done on pixel distance between tile centers.
pub const SUE_CHASE_RADIUS_TILES: f32 = 16.0;

/// Number of spin/freeze steps in the caught sequence.
pub const CAUGHT_TURNS: u8 = 9;
/// Ticks between facing rotations during the spin phase.
pub const CAUGHT_SPIN_HOLD_TICKS: u8 = 5;
/// Ticks held per remaining step during the final freeze phase.
pub const CAUGHT_FREEZE_HOLD_TICKS: u8 = 25;

/// Default frightened-mode duration after a pill pickup, in ticks.
pub const FRIGHTENED_TICKS: u32 = 360;

/// An enum representing the different kinds of tiles on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// An empty, passable tile.
    Empty,
    /// A wall tile.
    Wall,
    /// A passable tile holding a dot.
    Dot,
    /// A passable tile holding a power pill.
    Pill,
    /// A tunnel tile, passable and wrap-linked at the board edge.
    Tunnel,
    /// A ghost-house tile, passable by ghosts only.
    House,
}

impl TileKind {
    /// Returns true if characters can stand on this tile at all.
    pub const fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }
}

/// Pac-Man's starting cell on [`DEFAULT_BOARD`].
pub const PACMAN_START: IVec2 = IVec2::new(13, 23);

/// The default board layout, one string per row.
///
/// Codes: `=` wall, `.` dot, `*` power pill, `t` tunnel, `h` ghost house,
/// `-` empty.
pub const DEFAULT_BOARD: [&str; 31] = [
    "============================",
    "=............==............=",
    "=.====.=====.==.=====.====.=",
    "=*====.=====.==.=====.====*=",
    "=.====.=====.==.=====.====.=",
    "=..........................=",
    "=.====.==.========.==.====.=",
    "=.====.==.========.==.====.=",
    "=......==....==....==......=",
    "======.=====-==-=====.======",
    "-----=.=====-==-=====.=-----",
    "-----=.==----hh----==.=-----",
    "-----=.==-=hhhhhh=-==.=-----",
    "======.==-=hhhhhh=-==.======",
    "t-----.---=hhhhhh=---.-----t",
    "======.==-========-==.======",
    "-----=.==----------==.=-----",
    "-----=.==----------==.=-----",
    "-----=.==-========-==.=-----",
    "======.==-========-==.======",
    "=............==............=",
    "=.====.=====.==.=====.====.=",
    "=.====.=====.==.=====.====.=",
    "=*..==.......--.......==..*=",
    "===.==.==.========.==.==.===",
    "===.==.==.========.==.==.===",
    "=......==....==....==......=",
    "=.==========.==.==========.=",
    "=.==========.==.==========.=",
    "=..........................=",
    "============================",
];
