use chrono::NaiveDate;

use super::arbiter::Provenance;

/// One applied move, in the SAN of the position it was played from, plus
/// where it came from. Provenance is kept for auditability only.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMove {
    pub san: String,
    pub provenance: Provenance,
}

/// Accumulates the applied move sequence and renders the final PGN.
///
/// Strictly additive: one entry per completed turn, never rewritten. The
/// loop keeps this in lockstep with the board, so replaying the record from
/// the start always reaches the live position.
#[derive(Debug, Clone)]
pub struct GameRecorder {
    white: String,
    black: String,
    moves: Vec<RecordedMove>,
}

impl GameRecorder {
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            white: white.into(),
            black: black.into(),
            moves: Vec::new(),
        }
    }

    pub fn push(&mut self, san: impl Into<String>, provenance: Provenance) {
        self.moves.push(RecordedMove {
            san: san.into(),
            provenance,
        });
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[RecordedMove] {
        &self.moves
    }

    /// Renders the standard portable record: seven-tag headers followed by
    /// numbered movetext terminated with the result code.
    pub fn to_pgn(&self, result: &str, date: NaiveDate) -> String {
        let mut pgn = String::new();
        pgn.push_str("[Event \"LLM Chess Arena\"]\n");
        pgn.push_str("[Site \"local\"]\n");
        pgn.push_str(&format!("[Date \"{}\"]\n", date.format("%Y.%m.%d")));
        pgn.push_str("[Round \"1\"]\n");
        pgn.push_str(&format!("[White \"{}\"]\n", self.white));
        pgn.push_str(&format!("[Black \"{}\"]\n", self.black));
        pgn.push_str(&format!("[Result \"{result}\"]\n\n"));

        for (i, rec) in self.moves.iter().enumerate() {
            if i % 2 == 0 {
                pgn.push_str(&format!("{}. ", i / 2 + 1));
            }
            pgn.push_str(&rec.san);
            pgn.push(' ');
        }
        pgn.push_str(result);
        pgn.push('\n');
        pgn
    }
}
