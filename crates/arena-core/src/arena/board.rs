//! Position wrapper over the rules engine.
//!
//! The engine (`shakmaty`) owns legality, notation, and most terminal
//! detection; this wrapper adds the one piece it does not track, repetition
//! history, and exposes the per-turn snapshot the arbitration pipeline works
//! with. Positions only move forward: a move is applied once and never rolled
//! back.

use std::collections::HashMap;

use anyhow::Context;
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

/// One legal move from the current position, in both notations the agents
/// are prompted with. SAN is the primary notation; UCI is the secondary one
/// the extractor can fall back across.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalMove {
    pub mv: Move,
    pub san: String,
    pub uci: String,
}

/// Immutable snapshot of every legal move for one turn's arbitration.
///
/// The engine guarantees SAN disambiguation, so notations are unique within
/// a snapshot.
#[derive(Debug, Clone)]
pub struct MoveSnapshot {
    pub moves: Vec<LegalMove>,
}

impl MoveSnapshot {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn san_list(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.san.clone()).collect()
    }

    pub fn uci_list(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.uci.clone()).collect()
    }

    pub fn by_san(&self, san: &str) -> Option<&LegalMove> {
        self.moves.iter().find(|m| m.san == san)
    }

    pub fn by_uci(&self, uci: &str) -> Option<&LegalMove> {
        self.moves.iter().find(|m| m.uci == uci)
    }
}

/// Why the rules engine considers the game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

impl TerminalKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TerminalKind::Checkmate { winner: Color::White } => "checkmate_white_wins",
            TerminalKind::Checkmate { winner: Color::Black } => "checkmate_black_wins",
            TerminalKind::Stalemate => "stalemate",
            TerminalKind::InsufficientMaterial => "insufficient_material",
            TerminalKind::SeventyFiveMoves => "seventy_five_moves",
            TerminalKind::FivefoldRepetition => "fivefold_repetition",
        }
    }
}

/// Game state owned by the loop: the engine position plus a repetition table
/// keyed on the position's EPD (FEN minus the move counters).
#[derive(Debug, Clone)]
pub struct Board {
    pos: Chess,
    repetitions: HashMap<String, u32>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position.
    pub fn new() -> Self {
        let pos = Chess::default();
        let mut repetitions = HashMap::new();
        repetitions.insert(epd_of(&pos), 1);
        Self { pos, repetitions }
    }

    /// Position from a FEN fingerprint. Repetition history starts fresh at
    /// the given position.
    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        let parsed: Fen = fen.parse().context("invalid fen")?;
        let pos: Chess = parsed
            .into_position(CastlingMode::Standard)
            .context("fen is not a legal position")?;
        let mut repetitions = HashMap::new();
        repetitions.insert(epd_of(&pos), 1);
        Ok(Self { pos, repetitions })
    }

    pub fn pos(&self) -> &Chess {
        &self.pos
    }

    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    /// Stable textual fingerprint of the position.
    pub fn fen(&self) -> String {
        Fen::from_position(self.pos.clone(), EnPassantMode::Legal).to_string()
    }

    /// Snapshot of every legal move with its SAN and UCI notations. Taken
    /// once per turn; never reuse one across turns.
    pub fn legal_snapshot(&self) -> MoveSnapshot {
        let moves = self
            .pos
            .legal_moves()
            .iter()
            .map(|m| LegalMove {
                mv: m.clone(),
                san: SanPlus::from_move(self.pos.clone(), m).to_string(),
                uci: m.to_uci(CastlingMode::Standard).to_string(),
            })
            .collect();
        MoveSnapshot { moves }
    }

    /// Checks every terminal condition the loop cares about. The engine
    /// covers checkmate, stalemate, and material; the 75-move and fivefold
    /// rules come from the halfmove clock and our repetition table.
    pub fn terminal(&self) -> Option<TerminalKind> {
        if self.pos.is_checkmate() {
            return Some(TerminalKind::Checkmate {
                winner: !self.pos.turn(),
            });
        }
        if self.pos.is_stalemate() {
            return Some(TerminalKind::Stalemate);
        }
        if self.pos.is_insufficient_material() {
            return Some(TerminalKind::InsufficientMaterial);
        }
        if self.pos.halfmoves() >= 150 {
            return Some(TerminalKind::SeventyFiveMoves);
        }
        if self
            .repetitions
            .get(&epd_of(&self.pos))
            .is_some_and(|&n| n >= 5)
        {
            return Some(TerminalKind::FivefoldRepetition);
        }
        None
    }

    /// Applies an already-validated legal move and advances side-to-move.
    pub fn push(&mut self, mv: &Move) {
        debug_assert!(self.pos.is_legal(mv));
        self.pos.play_unchecked(mv);
        *self.repetitions.entry(epd_of(&self.pos)).or_insert(0) += 1;
    }
}

fn epd_of(pos: &Chess) -> String {
    let fen = Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string();
    // Drop the halfmove/fullmove counters so repeated positions collide.
    fen.split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}
