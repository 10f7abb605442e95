//! Board geometry: tiles and diagonal arithmetic

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use thiserror::Error;

/// Board side length
pub const BOARD_SIZE: i8 = 8;

/// A board square addressed by (row, column)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub row: i8,
    pub col: i8,
}

/// Diagonal offsets, forward-left first. The order is load-bearing: together
/// with the row-major board scan it produces the "leftmost" move ordering the
/// AI tie-break relies on.
const DIAGONALS: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];

impl Tile {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this tile is on the board
    pub fn is_valid(self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Only the dark squares, where (row + column) is odd, hold pieces
    pub fn is_playable(self) -> bool {
        self.is_valid() && (self.row + self.col) % 2 == 1
    }

    /// The in-bounds diagonal neighbors at the given distance (1 or 2)
    pub fn diagonal_neighbors(self, distance: i8) -> impl Iterator<Item = Tile> {
        DIAGONALS
            .iter()
            .map(move |&(dr, dc)| Tile::new(self.row + dr * distance, self.col + dc * distance))
            .filter(|t| t.is_valid())
    }

    /// Diagonal distance to another tile.
    ///
    /// Panics on a non-diagonal pair: every caller walks a move path, so
    /// unequal deltas mean an engine bug, not a user error.
    pub fn distance_from(self, other: Tile) -> i8 {
        let dr = (self.row - other.row).abs();
        let dc = (self.col - other.col).abs();
        if dr != dc {
            panic!("non-diagonal distance query: {self} -> {other}");
        }
        dr
    }

    /// The square jumped over by a distance-2 diagonal move
    pub fn midpoint(self, other: Tile) -> Tile {
        if self.distance_from(other) != 2 {
            panic!("midpoint of tiles that are not a jump apart: {self} -> {other}");
        }
        Tile::new((self.row + other.row) / 2, (self.col + other.col) / 2)
    }

    /// Promotion row for either color
    pub fn is_end_row(self) -> bool {
        self.row == 0 || self.row == BOARD_SIZE - 1
    }
}

impl Add for Tile {
    type Output = Tile;

    fn add(self, other: Tile) -> Tile {
        Tile::new(self.row + other.row, self.col + other.col)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseTileError {
    #[error("expected `row,col`, got `{0}`")]
    Malformed(String),
    #[error("tile ({0}, {1}) is off the board")]
    OutOfBounds(i8, i8),
}

impl FromStr for Tile {
    type Err = ParseTileError;

    /// Parses the `row,col` notation used by the CLI, e.g. `2,1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseTileError::Malformed(s.to_string());
        let (row, col) = s.trim().split_once(',').ok_or_else(malformed)?;
        let row: i8 = row.trim().parse().map_err(|_| malformed())?;
        let col: i8 = col.trim().parse().map_err(|_| malformed())?;
        let tile = Tile::new(row, col);
        if !tile.is_valid() {
            return Err(ParseTileError::OutOfBounds(row, col));
        }
        Ok(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_addition() {
        assert_eq!(Tile::new(3, 4), Tile::new(1, 3) + Tile::new(2, 1));
        assert_eq!(Tile::new(1, 1), Tile::new(4, 2) + Tile::new(-3, -1));
    }

    #[test]
    fn test_validity() {
        assert!(Tile::new(0, 0).is_valid());
        assert!(Tile::new(7, 7).is_valid());
        assert!(!Tile::new(8, 0).is_valid());
        assert!(!Tile::new(3, -1).is_valid());
    }

    #[test]
    fn test_playable_squares() {
        assert!(Tile::new(2, 1).is_playable());
        assert!(Tile::new(5, 0).is_playable());
        assert!(!Tile::new(0, 0).is_playable()); // light square
        assert!(!Tile::new(-1, 2).is_playable());
    }

    #[test]
    fn test_diagonal_neighbors_clipped_at_edges() {
        // Corner tile has a single diagonal neighbor at each distance
        let corner = Tile::new(0, 0);
        assert_eq!(corner.diagonal_neighbors(1).count(), 1);
        assert_eq!(corner.diagonal_neighbors(2).count(), 1);
        // Central tile has all four
        assert_eq!(Tile::new(4, 3).diagonal_neighbors(1).count(), 4);
        assert_eq!(Tile::new(4, 3).diagonal_neighbors(2).count(), 4);
    }

    #[test]
    fn test_neighbor_order_is_forward_left_first() {
        let neighbors: Vec<Tile> = Tile::new(2, 1).diagonal_neighbors(1).collect();
        assert_eq!(neighbors[0], Tile::new(3, 0));
        assert_eq!(neighbors[1], Tile::new(3, 2));
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(Tile::new(3, 2), Tile::new(2, 1).midpoint(Tile::new(4, 3)));
        assert_eq!(Tile::new(4, 4), Tile::new(5, 5).midpoint(Tile::new(3, 3)));
    }

    #[test]
    fn test_distance() {
        assert_eq!(1, Tile::new(2, 1).distance_from(Tile::new(3, 0)));
        assert_eq!(2, Tile::new(2, 1).distance_from(Tile::new(4, 3)));
    }

    #[test]
    #[should_panic(expected = "non-diagonal")]
    fn test_distance_panics_off_diagonal() {
        Tile::new(2, 1).distance_from(Tile::new(2, 3));
    }

    #[test]
    fn test_end_row() {
        assert!(Tile::new(0, 3).is_end_row());
        assert!(Tile::new(7, 4).is_end_row());
        assert!(!Tile::new(3, 4).is_end_row());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Ok(Tile::new(2, 1)), "2,1".parse());
        assert_eq!(Ok(Tile::new(5, 0)), " 5, 0 ".parse());
        assert!(matches!(
            "9,0".parse::<Tile>(),
            Err(ParseTileError::OutOfBounds(9, 0))
        ));
        assert!(matches!(
            "x".parse::<Tile>(),
            Err(ParseTileError::Malformed(_))
        ));
    }
}
