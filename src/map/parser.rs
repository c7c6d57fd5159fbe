//! Board parsing functionality for converting raw layouts into structured data.

use crate::constants::TileKind;
use crate::error::ParseError;
use glam::IVec2;

/// Represents the parsed data from a raw board layout.
#[derive(Debug)]
pub struct ParsedBoard {
    /// Board width, in cells.
    pub width: usize,
    /// Board height, in cells.
    pub height: usize,
    /// The parsed tile layout, row-major.
    pub tiles: Vec<TileKind>,
    /// The positions of tunnel tiles, in reading order.
    pub tunnels: Vec<IVec2>,
    /// The positions of ghost-house tiles, in reading order.
    pub house: Vec<IVec2>,
}

impl ParsedBoard {
    /// Returns the tile kind at the given cell, if in bounds.
    pub fn kind_at(&self, pos: IVec2) -> Option<TileKind> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return None;
        }
        Some(self.tiles[pos.y as usize * self.width + pos.x as usize])
    }
}

/// Parser for converting raw board layouts into structured board data.
pub struct BoardParser;

impl BoardParser {
    /// Parses a single character into a tile kind.
    pub fn parse_character(c: char) -> Result<TileKind, ParseError> {
        match c {
            '=' => Ok(TileKind::Wall),
            '.' => Ok(TileKind::Dot),
            '*' => Ok(TileKind::Pill),
            't' => Ok(TileKind::Tunnel),
            'h' => Ok(TileKind::House),
            '-' => Ok(TileKind::Empty),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured board data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, not rectangular, or contains
    /// unknown characters. These are the only errors surfaced to the caller
    /// of level construction.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedBoard, ParseError> {
        if raw_board.is_empty() {
            return Err(ParseError::EmptyBoard);
        }

        let width = raw_board[0].chars().count();
        if width == 0 {
            return Err(ParseError::EmptyBoard);
        }

        let height = raw_board.len();
        let mut tiles = Vec::with_capacity(width * height);
        let mut tunnels = Vec::new();
        let mut house = Vec::new();

        for (y, line) in raw_board.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character)?;

                // Track special positions
                match tile {
                    TileKind::Tunnel => tunnels.push(IVec2::new(x as i32, y as i32)),
                    TileKind::House => house.push(IVec2::new(x as i32, y as i32)),
                    _ => {}
                }

                tiles.push(tile);
            }
        }

        Ok(ParsedBoard {
            width,
            height,
            tiles,
            tunnels,
            house,
        })
    }
}
