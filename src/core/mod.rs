//! Core board and unit value types

pub mod board;
pub mod unit;

pub use board::{BoardSnapshot, CellPos, Rgba, Tile};
pub use unit::{Faction, Unit, UnitRoster};
