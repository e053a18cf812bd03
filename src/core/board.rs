//! Board snapshots - the immutable payload committed into history
//!
//! A `BoardSnapshot` is built once, mutated only while it is the working
//! copy of a move in flight, and never touched again after it is committed.
//! All later changes happen on a fresh clone.

use crate::core::unit::{Unit, UnitRoster};
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plain RGBA color carried on each tile (view concern, but part of the
/// committed state because moves repaint tiles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba { r: 255, g: 255, b: 255, a: 255 };
    /// Accent color of odd columns in the default checkerboard.
    pub const ORANGE: Rgba = Rgba { r: 255, g: 127, b: 51, a: 200 };
}

/// Zero-based cell coordinates: `x` is the column, `y` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub x: usize,
    pub y: usize,
}

impl CellPos {
    pub fn new(x: usize, y: usize) -> Self {
        CellPos { x, y }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One board cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub color: Rgba,
    /// Display highlight carried through snapshots; not load-bearing.
    pub selected: bool,
    pub occupant: Option<Unit>,
}

impl Tile {
    fn new(color: Rgba) -> Self {
        Tile { color, selected: false, occupant: None }
    }

    /// Reset to the unoccupied default appearance (a vacated cell).
    pub fn clear(&mut self) {
        self.occupant = None;
        self.color = Rgba::WHITE;
        self.selected = false;
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// A rectangular grid of tiles. Dimensions are fixed at creation.
///
/// The zero-dimension snapshot is a sentinel marking "no real state here"
/// (the root of the history chain); every traversal must treat it as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    width: usize,
    height: usize,
    /// Row-major: tile (x, y) lives at `y * width + x`.
    tiles: Vec<Tile>,
}

impl BoardSnapshot {
    /// Create a populated board with the default checkerboard coloring.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions(width, height));
        }
        let mut tiles = Vec::with_capacity(width * height);
        for _y in 0..height {
            for x in 0..width {
                let color = if x % 2 == 0 { Rgba::WHITE } else { Rgba::ORANGE };
                tiles.push(Tile::new(color));
            }
        }
        Ok(BoardSnapshot { width, height, tiles })
    }

    /// The zero-dimension placeholder used as the history root.
    pub fn sentinel() -> Self {
        BoardSnapshot { width: 0, height: 0, tiles: Vec::new() }
    }

    pub fn is_sentinel(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: CellPos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn tile(&self, pos: CellPos) -> Result<&Tile> {
        if !self.in_bounds(pos) {
            return Err(EngineError::OutOfBounds { x: pos.x, y: pos.y });
        }
        Ok(&self.tiles[pos.y * self.width + pos.x])
    }

    pub fn tile_mut(&mut self, pos: CellPos) -> Result<&mut Tile> {
        if !self.in_bounds(pos) {
            return Err(EngineError::OutOfBounds { x: pos.x, y: pos.y });
        }
        Ok(&mut self.tiles[pos.y * self.width + pos.x])
    }

    /// Iterate all cells with their positions, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, &Tile)> {
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            (CellPos::new(i % self.width, i / self.width), tile)
        })
    }

    /// Place the standard starting lineup: player units on the near columns,
    /// bot units mirrored on the far side.
    pub fn populate(&mut self, roster: &UnitRoster) -> Result<()> {
        // The lineup needs room for both factions plus a gap between them
        if self.width < 7 || self.height < 3 {
            return Err(EngineError::InvalidDimensions(self.width, self.height));
        }
        let w = self.width;
        let placements = [
            ("Lyndon B. Johnson", CellPos::new(1, 0)),
            ("Phonomancer", CellPos::new(2, 2)),
            ("Newt-Hands", CellPos::new(3, 1)),
            ("Wizzy", CellPos::new(w - 2, self.height - 1)),
            ("Wing Centipede", CellPos::new(w - 3, self.height - 2)),
        ];
        for (name, pos) in placements {
            self.tile_mut(pos)?.occupant = Some(roster.spawn(name)?);
        }
        Ok(())
    }

    /// Count living units of each faction: `(player, bot)`.
    pub fn living_units(&self) -> (usize, usize) {
        let mut player = 0;
        let mut bot = 0;
        for tile in &self.tiles {
            if let Some(unit) = &tile.occupant {
                if unit.is_alive() {
                    match unit.faction {
                        crate::core::Faction::Player => player += 1,
                        crate::core::Faction::Bot => bot += 1,
                    }
                }
            }
        }
        (player, bot)
    }
}
