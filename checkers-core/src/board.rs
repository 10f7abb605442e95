//! Board rule state machine
//!
//! The board owns all rule enforcement: move classification, mandatory
//! capture, multi-jump chains, promotion, capture bookkeeping and win
//! detection. Rule violations come back as [`MoveKind::Invalid`]; broken
//! engine invariants panic.

use crate::movegen::Move;
use crate::tile::{Tile, BOARD_SIZE};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Piece color. Red starts on rows 0-2 and advances toward row 7, black
/// starts on rows 5-7 and advances toward row 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// Forward row direction for men of this color
    pub fn forward(self) -> i8 {
        match self {
            Color::Red => 1,
            Color::Black => -1,
        }
    }

    /// Evaluation sign convention: red maximizes, black minimizes
    pub fn sign(self) -> f32 {
        match self {
            Color::Red => 1.0,
            Color::Black => -1.0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "RED"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub king: bool,
}

impl Piece {
    pub fn new(color: Color) -> Self {
        Self { color, king: false }
    }

    pub fn king(color: Color) -> Self {
        Self { color, king: true }
    }
}

/// Classification of a single (start, end) step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Invalid,
    Normal,
    Jump,
}

// ============================================================================
// UNDO LOG
// ============================================================================

/// Everything needed to strictly reverse one applied ply: the path walked,
/// the captured pieces with their squares in capture order, and the prior
/// king / must_jump / target_tile / turn state.
#[derive(Clone, Debug)]
pub struct MoveRecord {
    mv: Move,
    captured: Vec<(Tile, Piece)>,
    was_king: bool,
    prior_must_jump: bool,
    prior_target: Option<Tile>,
    prior_turn: Color,
}

impl MoveRecord {
    pub fn captured(&self) -> &[(Tile, Piece)] {
        &self.captured
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Game state. Created once per game (or cloned per search worker) and
/// mutated in place; the search relies on [`Board::apply_move`] /
/// [`Board::undo_move`] restoring prior state bit for bit.
#[derive(Clone, Debug)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
    turn: Color,
    /// Set only mid multi-jump; the next step must start here
    target_tile: Option<Tile>,
    /// Whether the side to move is forced into a capture
    must_jump: bool,
    red_count: u8,
    black_count: u8,
    /// Tiles whose piece currently has a jump available, per color. Derived
    /// from the grid and kept current incrementally: a piece's jump
    /// availability only depends on its own 2-distance diagonal neighborhood,
    /// so each mutation rechecks just the neighborhoods it touched.
    red_jumpers: FxHashSet<Tile>,
    black_jumpers: FxHashSet<Tile>,
    /// Completed moves, for the status readout
    move_count: u32,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard opening setup, black to move
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let tile = Tile::new(row, col);
                if !tile.is_playable() {
                    continue;
                }
                if row <= 2 {
                    board.set_piece(tile, Some(Piece::new(Color::Red)));
                } else if row >= 5 {
                    board.set_piece(tile, Some(Piece::new(Color::Black)));
                }
            }
        }
        board
    }

    /// Empty board, black to move; used to build up test and puzzle positions
    pub fn empty() -> Self {
        Self {
            grid: [[None; 8]; 8],
            turn: Color::Black,
            target_tile: None,
            must_jump: false,
            red_count: 0,
            black_count: 0,
            red_jumpers: FxHashSet::default(),
            black_jumpers: FxHashSet::default(),
            move_count: 0,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn piece_at(&self, tile: Tile) -> Option<Piece> {
        if !tile.is_valid() {
            return None;
        }
        self.grid[tile.row as usize][tile.col as usize]
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn target_tile(&self) -> Option<Tile> {
        self.target_tile
    }

    pub fn must_jump(&self) -> bool {
        self.must_jump
    }

    pub fn red_count(&self) -> u8 {
        self.red_count
    }

    pub fn black_count(&self) -> u8 {
        self.black_count
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// The game ends the instant a color runs out of pieces
    pub fn winner(&self) -> Option<Color> {
        if self.red_count == 0 {
            Some(Color::Black)
        } else if self.black_count == 0 {
            Some(Color::Red)
        } else {
            None
        }
    }

    // ========================================================================
    // SETUP MUTATORS
    // ========================================================================

    /// Place or clear a piece, keeping counts and jump bookkeeping coherent.
    ///
    /// Panics on a non-playable square: pieces never sit on light squares.
    pub fn set_piece(&mut self, tile: Tile, piece: Option<Piece>) {
        if !tile.is_playable() {
            panic!("cannot place a piece on non-playable tile {tile}");
        }
        if let Some(old) = self.grid[tile.row as usize][tile.col as usize] {
            match old.color {
                Color::Red => self.red_count -= 1,
                Color::Black => self.black_count -= 1,
            }
        }
        if let Some(new) = piece {
            match new.color {
                Color::Red => self.red_count += 1,
                Color::Black => self.black_count += 1,
            }
        }
        self.grid[tile.row as usize][tile.col as usize] = piece;
        self.refresh_jumps(&[tile]);
        self.must_jump = self.has_jump(self.turn);
    }

    /// Hand the move to the given side (test and puzzle setup)
    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
        self.must_jump = self.has_jump(color);
    }

    // ========================================================================
    // MOVE CLASSIFICATION
    // ========================================================================

    /// Classify a candidate step without mutating anything.
    ///
    /// `Invalid` covers every user-facing rule violation: wrong turn, bad
    /// geometry, occupied destination, ignoring a mandatory capture, or
    /// moving a different piece while a jump chain is in progress.
    pub fn classify_move(&self, start: Tile, end: Tile) -> MoveKind {
        if let Some(target) = self.target_tile {
            if start != target {
                return MoveKind::Invalid;
            }
        }
        if !start.is_playable() || !end.is_playable() {
            return MoveKind::Invalid;
        }
        let piece = match self.piece_at(start) {
            Some(p) if p.color == self.turn => p,
            _ => return MoveKind::Invalid,
        };
        if self.piece_at(end).is_some() {
            return MoveKind::Invalid;
        }
        let kind = self.classify_step(piece, start, end);
        if self.must_jump && kind == MoveKind::Normal {
            return MoveKind::Invalid;
        }
        kind
    }

    /// Geometry-only classification for a piece assumed to sit at `start`.
    /// Kings get a second try in the backward direction.
    fn classify_step(&self, piece: Piece, start: Tile, end: Tile) -> MoveKind {
        let forward = piece.color.forward();
        let kind = self.classify_directed_step(piece, start, end, forward);
        if kind == MoveKind::Invalid && piece.king {
            return self.classify_directed_step(piece, start, end, -forward);
        }
        kind
    }

    fn classify_directed_step(&self, piece: Piece, start: Tile, end: Tile, dir: i8) -> MoveKind {
        let drow = end.row - start.row;
        let dcol = end.col - start.col;
        if drow == dir && dcol.abs() == 1 {
            return MoveKind::Normal;
        }
        if drow == 2 * dir && dcol.abs() == 2 {
            let over = start.midpoint(end);
            if self
                .piece_at(over)
                .is_some_and(|p| p.color == piece.color.opponent())
            {
                return MoveKind::Jump;
            }
        }
        MoveKind::Invalid
    }

    /// Whether the piece at `tile` (of either color) has a jump available
    pub fn can_jump(&self, tile: Tile) -> bool {
        let Some(piece) = self.piece_at(tile) else {
            return false;
        };
        tile.diagonal_neighbors(2).any(|end| {
            self.piece_at(end).is_none() && self.classify_step(piece, tile, end) == MoveKind::Jump
        })
    }

    // ========================================================================
    // MOVE EXECUTION
    // ========================================================================

    /// Classify and, when legal, perform a single step.
    ///
    /// On a jump whose landing tile permits a further jump, the turn is held
    /// and `target_tile` pins the chain to that tile; otherwise the move
    /// completes: the turn flips and `must_jump` is recomputed from the
    /// squares this move touched. Returns the classification and the
    /// captured piece, if any, for the caller's bookkeeping.
    pub fn move_piece(&mut self, start: Tile, end: Tile) -> (MoveKind, Option<Piece>) {
        let kind = self.classify_move(start, end);
        if kind == MoveKind::Invalid {
            return (kind, None);
        }

        let mut piece = self.grid[start.row as usize][start.col as usize]
            .take()
            .expect("classify_move guaranteed a piece at start");
        let mut captured = None;
        let mut touched = vec![start, end];

        if kind == MoveKind::Jump {
            let over = start.midpoint(end);
            let victim = self.grid[over.row as usize][over.col as usize]
                .take()
                .expect("jump classified without a piece to capture");
            match victim.color {
                Color::Red => self.red_count -= 1,
                Color::Black => self.black_count -= 1,
            }
            captured = Some(victim);
            touched.push(over);
        }

        if end.is_end_row() {
            piece.king = true;
        }
        self.grid[end.row as usize][end.col as usize] = Some(piece);
        self.refresh_jumps(&touched);

        if kind == MoveKind::Jump && self.can_jump(end) {
            // Chain continues: same turn, only this piece may move next
            self.target_tile = Some(end);
            self.must_jump = true;
        } else {
            self.target_tile = None;
            self.turn = self.turn.opponent();
            self.must_jump = self.has_jump(self.turn);
            self.move_count += 1;
        }

        (kind, captured)
    }

    /// Apply a complete move (single step or full jump chain) and return the
    /// undo log for it.
    ///
    /// Panics if any step classifies `Invalid` or the turn fails to flip:
    /// callers hand in moves the generator produced, so either is an engine
    /// bug.
    pub fn apply_move(&mut self, mv: &Move) -> MoveRecord {
        let start = mv.start();
        let piece = self
            .piece_at(start)
            .unwrap_or_else(|| panic!("apply_move: no piece at move start {start}"));
        let was_king = piece.king;
        let prior_must_jump = self.must_jump;
        let prior_target = self.target_tile;
        let prior_turn = self.turn;

        let mut captured = Vec::new();
        let mut from = start;
        for &to in &mv.path()[1..] {
            let (kind, victim) = self.move_piece(from, to);
            if kind == MoveKind::Invalid {
                panic!("apply_move: illegal step {from} -> {to} in {mv}");
            }
            if let Some(victim) = victim {
                captured.push((from.midpoint(to), victim));
            }
            from = to;
        }
        if self.turn == prior_turn {
            panic!("apply_move: turn did not flip after {mv}");
        }

        MoveRecord {
            mv: mv.clone(),
            captured,
            was_king,
            prior_must_jump,
            prior_target,
            prior_turn,
        }
    }

    /// Strictly reverse a move applied by [`Board::apply_move`]: every piece
    /// returns to its prior tile with its prior king flag, captures are
    /// restored to their exact squares in reverse capture order, and turn,
    /// `must_jump` and `target_tile` revert.
    pub fn undo_move(&mut self, record: MoveRecord) {
        let MoveRecord {
            mv,
            mut captured,
            was_king,
            prior_must_jump,
            prior_target,
            prior_turn,
        } = record;

        let mut touched: Vec<Tile> = mv.path().to_vec();
        let inverse = mv.inverse();
        for pair in inverse.path().windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let mut piece = self.grid[from.row as usize][from.col as usize]
                .take()
                .unwrap_or_else(|| panic!("undo_move: no piece at expected tile {from}"));
            piece.king = was_king;
            self.grid[to.row as usize][to.col as usize] = Some(piece);

            if from.distance_from(to) == 2 {
                let (square, victim) = captured
                    .pop()
                    .unwrap_or_else(|| panic!("undo_move: capture log empty undoing {mv}"));
                debug_assert_eq!(square, from.midpoint(to));
                self.grid[square.row as usize][square.col as usize] = Some(victim);
                match victim.color {
                    Color::Red => self.red_count += 1,
                    Color::Black => self.black_count += 1,
                }
                touched.push(square);
            }
        }

        self.turn = prior_turn;
        self.target_tile = prior_target;
        self.move_count -= 1;
        self.refresh_jumps(&touched);
        self.must_jump = prior_must_jump;
        debug_assert_eq!(self.must_jump, self.has_jump(self.turn));
    }

    /// Speculatively relocate the piece at `start` to `end` (promoting it
    /// when the landing square is an end row, so deeper probes honor king
    /// mobility), run `probe`, then revert on every exit path. Counts, jump
    /// bookkeeping and the jumped-over piece are deliberately untouched;
    /// chain discovery only needs the moving piece displaced.
    pub(crate) fn trial_step<R>(
        &mut self,
        start: Tile,
        end: Tile,
        probe: impl FnOnce(&mut Board) -> R,
    ) -> R {
        let mut piece = self.grid[start.row as usize][start.col as usize]
            .take()
            .expect("trial_step: no piece at start");
        let was_king = piece.king;
        if end.is_end_row() {
            piece.king = true;
        }
        self.grid[end.row as usize][end.col as usize] = Some(piece);

        let result = probe(self);

        let mut piece = self.grid[end.row as usize][end.col as usize]
            .take()
            .expect("trial_step: piece vanished from probe tile");
        piece.king = was_king;
        self.grid[start.row as usize][start.col as usize] = Some(piece);
        result
    }

    // ========================================================================
    // JUMP BOOKKEEPING
    // ========================================================================

    /// Recheck jump availability in the diagonal 2-neighborhood of each
    /// touched square. Availability elsewhere cannot have changed.
    fn refresh_jumps(&mut self, touched: &[Tile]) {
        for &tile in touched {
            self.refresh_tile(tile);
            for distance in 1..=2 {
                for neighbor in tile.diagonal_neighbors(distance) {
                    self.refresh_tile(neighbor);
                }
            }
        }
    }

    fn refresh_tile(&mut self, tile: Tile) {
        if !tile.is_playable() {
            return;
        }
        self.red_jumpers.remove(&tile);
        self.black_jumpers.remove(&tile);
        if self.can_jump(tile) {
            match self.piece_at(tile).map(|p| p.color) {
                Some(Color::Red) => self.red_jumpers.insert(tile),
                Some(Color::Black) => self.black_jumpers.insert(tile),
                None => unreachable!("empty tiles cannot jump"),
            };
        }
    }

    fn has_jump(&self, color: Color) -> bool {
        match color {
            Color::Red => !self.red_jumpers.is_empty(),
            Color::Black => !self.black_jumpers.is_empty(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let glyph = match self.piece_at(Tile::new(row, col)) {
                    Some(Piece { color: Color::Red, king: false }) => 'r',
                    Some(Piece { color: Color::Red, king: true }) => 'R',
                    Some(Piece { color: Color::Black, king: false }) => 'b',
                    Some(Piece { color: Color::Black, king: true }) => 'B',
                    None => ' ',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
