//! End-to-end matches over the public API: scripted agents, failing agents,
//! and the record/position lockstep invariant.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use chrono::NaiveDate;
use shakmaty::san::SanPlus;
use shakmaty::Color;

use arena_core::arena::{
    AgentAdapter, Arbiter, Board, GameEnd, LlmClient, Match, MatchConfig, Provenance,
    TerminalKind, run,
};

#[derive(Default)]
struct ScriptedLlm {
    responses: Mutex<VecDeque<anyhow::Result<String>>>,
}

impl ScriptedLlm {
    fn with_responses(responses: &[&str]) -> Self {
        let llm = Self::default();
        for r in responses {
            llm.responses
                .lock()
                .unwrap()
                .push_back(Ok(r.to_string()));
        }
        llm
    }
}

impl LlmClient for ScriptedLlm {
    fn complete<'a>(
        &'a self,
        _prompt: String,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| anyhow::bail!("agent unreachable"))
        })
    }
}

fn new_match() -> Match {
    let mut game = Match::new(
        AgentAdapter::new("white-model", Color::White),
        AgentAdapter::new("black-model", Color::Black),
    );
    game.arbiter = Arbiter::with_chooser(|_| 0);
    game
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
}

fn replay_fen(sans: &[String]) -> String {
    let mut board = Board::new();
    for san in sans {
        let parsed: SanPlus = san.parse().expect("recorded san parses");
        let mv = parsed
            .san
            .to_move(board.pos())
            .expect("recorded san is legal in replay");
        board.push(&mv);
    }
    board.fen()
}

#[tokio::test]
async fn scholars_mate_with_prose_wrapped_moves() {
    let white = ScriptedLlm::with_responses(&[
        "e4 looks strong here",
        "Bc4",
        "Qh5!",
        "Qxf7#",
    ]);
    let black = ScriptedLlm::with_responses(&["e5", "Nc6", "Nf6"]);
    let mut game = new_match();

    let report = run(&mut game, &white, &black, &MatchConfig::default(), date())
        .await
        .unwrap();

    assert_eq!(
        report.end,
        GameEnd::Rules(TerminalKind::Checkmate {
            winner: Color::White
        })
    );
    assert_eq!(report.result_code, "1-0");
    assert!(report.pgn.contains("1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0"));
    assert!(game
        .turns()
        .iter()
        .all(|t| t.provenance == Provenance::AgentChosen));

    // Record and position never diverge.
    let sans: Vec<String> = game
        .recorder
        .moves()
        .iter()
        .map(|m| m.san.clone())
        .collect();
    assert_eq!(replay_fen(&sans), game.board.fen());
}

#[tokio::test]
async fn unreachable_agents_still_produce_a_complete_record() {
    // Empty scripts: every call fails, every move is a fallback.
    let white = ScriptedLlm::default();
    let black = ScriptedLlm::default();
    let mut game = new_match();
    let mut turn = 0usize;
    game.arbiter = Arbiter::with_chooser(move |n| {
        turn += 1;
        (turn * 13) % n
    });
    let cfg = MatchConfig { max_moves: 40 };

    let report = run(&mut game, &white, &black, &cfg, date()).await.unwrap();

    assert!(game.move_count <= cfg.max_moves);
    assert_eq!(game.recorder.len() as u32, game.move_count);
    assert!(game
        .turns()
        .iter()
        .all(|t| t.provenance == Provenance::FallbackRandom));
    assert!(report.pgn.starts_with("[Event "));
    assert!(report.pgn.trim_end().ends_with(report.result_code));

    let sans: Vec<String> = game
        .recorder
        .moves()
        .iter()
        .map(|m| m.san.clone())
        .collect();
    assert_eq!(replay_fen(&sans), game.board.fen());
}

#[tokio::test]
async fn mixed_good_and_garbage_turns_alternate_provenance() {
    // Black talks but never names a move, so both of its turns fall back;
    // d4 stays legal for White whatever Black's fallback played.
    let white = ScriptedLlm::with_responses(&["e4", "d4"]);
    let black = ScriptedLlm::with_responses(&["no idea, you pick", "still thinking about it"]);
    let mut game = new_match();
    let cfg = MatchConfig { max_moves: 4 };

    let report = run(&mut game, &white, &black, &cfg, date()).await.unwrap();

    assert_eq!(report.end, GameEnd::MoveLimit);
    let provenances: Vec<Provenance> = game.turns().iter().map(|t| t.provenance).collect();
    assert_eq!(
        provenances,
        vec![
            Provenance::AgentChosen,
            Provenance::FallbackRandom,
            Provenance::AgentChosen,
            Provenance::FallbackRandom,
        ]
    );
}
