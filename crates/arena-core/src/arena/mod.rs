//! Match framework: move extraction/arbitration and the game-loop harness.
//!
//! The hard part of an LLM-vs-LLM match is not chess (the rules engine owns
//! legality, notation, and terminal detection) but turning free-form agent
//! text into exactly one legal move per turn, with a bounded fallback when
//! the text is malformed, ambiguous, or illegal. These modules lock that
//! pipeline down so the loop always terminates with a recorded game.

pub mod adapter;
pub mod arbiter;
pub mod board;
pub mod extract;
pub mod harness;
pub mod prompt;
pub mod recorder;

pub use adapter::{AgentAdapter, AgentResponse, LlmClient};
pub use arbiter::{Arbiter, Arbitration, Provenance};
pub use board::{Board, MoveSnapshot, TerminalKind};
pub use extract::extract_move;
pub use harness::{GameEnd, Match, MatchConfig, MatchReport, TurnOutcome, run, tick};
pub use recorder::GameRecorder;
