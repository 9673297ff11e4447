//! Shared arena primitives: board wrapper, move arbitration, and LLM client.
//!
//! This crate holds everything both the headless runner and tests need to
//! drive an LLM-vs-LLM chess match: the position wrapper over the rules
//! engine, prompt building, move extraction/arbitration, the game recorder,
//! and the per-turn harness.

pub mod arena;
pub mod llm;
