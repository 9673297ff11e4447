//! Turns one agent response into exactly one legal move.
//!
//! Every recoverable problem (transport failure, no extractable move, a
//! lexical match that fails live legality) funnels into the same uniform
//! random fallback. Randomness sits behind an injectable chooser so tests
//! can pin the pick.

use anyhow::bail;
use rand::Rng;
use shakmaty::{Move, Position};

use super::adapter::AgentResponse;
use super::board::Board;
use super::extract::extract_move;

/// Where a turn's move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    AgentChosen,
    FallbackRandom,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::AgentChosen => "agent_chosen",
            Provenance::FallbackRandom => "fallback_random",
        }
    }
}

/// The single move decided for a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Arbitration {
    pub mv: Move,
    pub san: String,
    pub provenance: Provenance,
    /// Audit detail for fallback picks: why the agent text was unusable.
    pub note: Option<String>,
}

/// Decides one legal move per turn from an agent response.
pub struct Arbiter {
    /// Index chooser for the fallback: given the legal-move count `n`,
    /// returns an index in `0..n`. Out-of-range picks are clamped.
    choose: Box<dyn FnMut(usize) -> usize + Send>,
}

impl Arbiter {
    /// Production chooser: uniform over all legal moves.
    pub fn uniform() -> Self {
        Self {
            choose: Box::new(|n| rand::thread_rng().gen_range(0..n)),
        }
    }

    /// Deterministic chooser for tests.
    pub fn with_chooser(choose: impl FnMut(usize) -> usize + Send + 'static) -> Self {
        Self {
            choose: Box::new(choose),
        }
    }

    /// Resolves `response` against the live position.
    ///
    /// Extraction runs over the SAN notations first, then over UCI with the
    /// hit translated back through the same snapshot entry. Any miss or
    /// mismatch falls back to a uniform random legal move. Errors only when
    /// the position has no legal moves at all, which the loop's terminal
    /// check must rule out before dispatching.
    pub fn arbitrate(
        &mut self,
        board: &Board,
        response: &AgentResponse,
    ) -> anyhow::Result<Arbitration> {
        // Always a fresh snapshot; a stale one from a previous turn could
        // lexically collide with a now-illegal move.
        let snapshot = board.legal_snapshot();
        if snapshot.is_empty() {
            bail!("arbitrate called with no legal moves; terminal check must run before dispatch");
        }

        let text = match response {
            AgentResponse::Failed(reason) => {
                return Ok(self.fallback(board, format!("agent failure: {reason}")));
            }
            AgentResponse::Text(text) => text,
        };

        if let Some(san) = extract_move(text, &snapshot.san_list()) {
            if let Some(hit) = snapshot.by_san(san)
                && board.pos().is_legal(&hit.mv)
            {
                return Ok(Arbitration {
                    mv: hit.mv.clone(),
                    san: hit.san.clone(),
                    provenance: Provenance::AgentChosen,
                    note: None,
                });
            }
            // A lexical match is not proof of legality on the live position.
            return Ok(self.fallback(board, format!("extracted '{san}' failed legality check")));
        }

        if let Some(uci) = extract_move(text, &snapshot.uci_list()) {
            if let Some(hit) = snapshot.by_uci(uci)
                && board.pos().is_legal(&hit.mv)
            {
                return Ok(Arbitration {
                    mv: hit.mv.clone(),
                    san: hit.san.clone(),
                    provenance: Provenance::AgentChosen,
                    note: None,
                });
            }
            return Ok(self.fallback(board, format!("extracted '{uci}' failed legality check")));
        }

        Ok(self.fallback(board, "no legal move found in response".to_string()))
    }

    fn fallback(&mut self, board: &Board, note: String) -> Arbitration {
        let snapshot = board.legal_snapshot();
        let idx = (self.choose)(snapshot.len()).min(snapshot.len() - 1);
        let pick = &snapshot.moves[idx];
        Arbitration {
            mv: pick.mv.clone(),
            san: pick.san.clone(),
            provenance: Provenance::FallbackRandom,
            note: Some(note),
        }
    }
}
