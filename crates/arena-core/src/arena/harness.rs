//! Game-loop state machine: terminal check, dispatch, arbitration, apply.
//!
//! One deterministic "tick" per turn. The core is intentionally small and
//! pure: it owns no timers, threads, or network clients. Pacing and console
//! tracing belong to the runner; deterministic tests drive ticks directly
//! with fake LLM clients.

use chrono::NaiveDate;
use shakmaty::Color;

use super::adapter::{AgentAdapter, AgentResponse, LlmClient};
use super::arbiter::{Arbiter, Provenance};
use super::board::{Board, TerminalKind};
use super::recorder::GameRecorder;

#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Hard ceiling on applied half-moves; reaching it is a designed
    /// termination, not an error.
    pub max_moves: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { max_moves: 100 }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Rules(TerminalKind),
    MoveLimit,
}

impl GameEnd {
    pub fn reason(&self) -> &'static str {
        match self {
            GameEnd::Rules(kind) => kind.describe(),
            GameEnd::MoveLimit => "move_limit",
        }
    }

    pub fn result_code(&self) -> &'static str {
        match self {
            GameEnd::Rules(TerminalKind::Checkmate { winner: Color::White }) => "1-0",
            GameEnd::Rules(TerminalKind::Checkmate { winner: Color::Black }) => "0-1",
            GameEnd::Rules(_) => "1/2-1/2",
            GameEnd::MoveLimit => "*",
        }
    }
}

/// What one completed turn did, for the trace and for tests.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub side: Color,
    pub san: String,
    pub provenance: Provenance,
    /// Fallback audit detail, when the agent text was unusable.
    pub note: Option<String>,
    /// Raw agent text, or the failure reason when the call failed.
    pub raw: String,
    /// Applied half-moves so far, including this one.
    pub move_count: u32,
    pub fen_after: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Finished(GameEnd),
    Played(TurnReportSummary),
}

/// Comparable subset of [`TurnReport`] carried inside [`TurnOutcome`].
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReportSummary {
    pub side: Color,
    pub san: String,
    pub provenance: Provenance,
}

/// All state the loop owns: the single position, the record, the arbiter,
/// and the two symmetric agents. Nothing here is shared or concurrent.
pub struct Match {
    pub board: Board,
    pub recorder: GameRecorder,
    pub arbiter: Arbiter,
    pub white: AgentAdapter,
    pub black: AgentAdapter,
    pub move_count: u32,
    turns: Vec<TurnReport>,
}

impl Match {
    pub fn new(white: AgentAdapter, black: AgentAdapter) -> Self {
        Self {
            recorder: GameRecorder::new(white.label.clone(), black.label.clone()),
            board: Board::new(),
            arbiter: Arbiter::uniform(),
            white,
            black,
            move_count: 0,
            turns: Vec::new(),
        }
    }

    pub fn turns(&self) -> &[TurnReport] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&TurnReport> {
        self.turns.last()
    }
}

/// Plays at most one turn.
///
/// Terminal conditions (rules-engine state, then the move ceiling) are
/// checked strictly before dispatch, so arbitration never sees an empty
/// legal-move set. A turn is one agent call, one arbitration, and one
/// applied move, with no re-prompting within a turn.
pub async fn tick(
    game: &mut Match,
    white_llm: &dyn LlmClient,
    black_llm: &dyn LlmClient,
    cfg: &MatchConfig,
) -> anyhow::Result<TurnOutcome> {
    if let Some(kind) = game.board.terminal() {
        return Ok(TurnOutcome::Finished(GameEnd::Rules(kind)));
    }
    if game.move_count >= cfg.max_moves {
        return Ok(TurnOutcome::Finished(GameEnd::MoveLimit));
    }

    let side = game.board.turn();
    let (adapter, llm) = match side {
        Color::White => (&game.white, white_llm),
        Color::Black => (&game.black, black_llm),
    };

    let snapshot = game.board.legal_snapshot();
    let response = adapter.request_move(llm, &game.board, &snapshot).await;
    let arbitration = game.arbiter.arbitrate(&game.board, &response)?;

    game.board.push(&arbitration.mv);
    game.recorder.push(arbitration.san.clone(), arbitration.provenance);
    game.move_count += 1;

    let raw = match response {
        AgentResponse::Text(text) => text,
        AgentResponse::Failed(reason) => reason,
    };
    game.turns.push(TurnReport {
        side,
        san: arbitration.san.clone(),
        provenance: arbitration.provenance,
        note: arbitration.note,
        raw,
        move_count: game.move_count,
        fen_after: game.board.fen(),
    });

    Ok(TurnOutcome::Played(TurnReportSummary {
        side,
        san: arbitration.san,
        provenance: arbitration.provenance,
    }))
}

/// Final report of a completed match.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub end: GameEnd,
    pub result_code: &'static str,
    pub moves_played: u32,
    pub pgn: String,
}

/// Drives ticks until the game ends, then stamps and renders the record.
pub async fn run(
    game: &mut Match,
    white_llm: &dyn LlmClient,
    black_llm: &dyn LlmClient,
    cfg: &MatchConfig,
    date: NaiveDate,
) -> anyhow::Result<MatchReport> {
    loop {
        match tick(game, white_llm, black_llm, cfg).await? {
            TurnOutcome::Finished(end) => {
                let result_code = end.result_code();
                return Ok(MatchReport {
                    end,
                    result_code,
                    moves_played: game.move_count,
                    pgn: game.recorder.to_pgn(result_code, date),
                });
            }
            TurnOutcome::Played(_) => {}
        }
    }
}
