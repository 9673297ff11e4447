use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use reqwest::Client;
use shakmaty::Color;

use arena_core::arena::{AgentAdapter, LlmClient, Match, MatchConfig, TurnOutcome, tick};
use arena_core::llm::{LlmEndpoint, query_generate};

struct RunnerLlm {
    client: Client,
    cfg: LlmEndpoint,
}

impl LlmClient for RunnerLlm {
    fn complete<'a>(
        &'a self,
        prompt: String,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move { query_generate(&self.client, &prompt, &self.cfg).await })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn u64_or(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    u64_or(std::env::var(name).ok(), default)
}

fn u32_or(raw: Option<String>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    u32_or(std::env::var(name).ok(), default)
}

fn side_name(side: Color) -> &'static str {
    match side {
        Color::White => "white",
        Color::Black => "black",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let request_timeout = Duration::from_millis(env_u64("ARENA_LLM_TIMEOUT_MS", 30_000));
    let white_cfg = LlmEndpoint {
        endpoint: env_or("ARENA_WHITE_ENDPOINT", "http://127.0.0.1:11434/api/generate"),
        model: env_or("ARENA_WHITE_MODEL", "openhermes:latest"),
        request_timeout,
    };
    let black_cfg = LlmEndpoint {
        endpoint: env_or("ARENA_BLACK_ENDPOINT", "http://127.0.0.1:11434/api/generate"),
        model: env_or("ARENA_BLACK_MODEL", "openhermes:latest"),
        request_timeout,
    };
    let white_label = env_or("ARENA_WHITE_LABEL", &white_cfg.model);
    let black_label = env_or("ARENA_BLACK_LABEL", &black_cfg.model);

    let cfg = MatchConfig {
        max_moves: env_u32("ARENA_MAX_MOVES", 100),
    };
    let pace = Duration::from_millis(env_u64("ARENA_PACE_MS", 1_000));
    let pgn_path = env_or("ARENA_PGN_PATH", "game.pgn");

    let client = Client::new();
    let white_llm = RunnerLlm {
        client: client.clone(),
        cfg: white_cfg,
    };
    let black_llm = RunnerLlm {
        client,
        cfg: black_cfg,
    };

    let mut game = Match::new(
        AgentAdapter::new(white_label, Color::White),
        AgentAdapter::new(black_label, Color::Black),
    );

    println!(
        "arena.start white={} black={} max_moves={}",
        game.white.label, game.black.label, cfg.max_moves
    );

    loop {
        tokio::time::sleep(pace).await;
        println!(
            "arena.dispatch side={} move_count={} fen={}",
            side_name(game.board.turn()),
            game.move_count,
            game.board.fen()
        );

        match tick(&mut game, &white_llm, &black_llm, &cfg).await? {
            TurnOutcome::Finished(end) => {
                let result_code = end.result_code();
                let pgn = game.recorder.to_pgn(result_code, Local::now().date_naive());
                std::fs::write(&pgn_path, &pgn)
                    .with_context(|| format!("write pgn to {pgn_path}"))?;
                println!(
                    "arena.game_over reason={} result={} moves={} pgn={pgn_path}",
                    end.reason(),
                    result_code,
                    game.move_count
                );
                break;
            }
            TurnOutcome::Played(_) => {
                if let Some(turn) = game.last_turn() {
                    println!(
                        "arena.agent.raw side={} text={:?}",
                        side_name(turn.side),
                        turn.raw
                    );
                    if let Some(note) = &turn.note {
                        eprintln!(
                            "arena.turn.fallback side={} reason={note}",
                            side_name(turn.side)
                        );
                    }
                    println!(
                        "arena.turn.played side={} san={} provenance={} move_count={}",
                        side_name(turn.side),
                        turn.san,
                        turn.provenance.as_str(),
                        turn.move_count
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_or_parses_and_falls_back() {
        assert_eq!(u64_or(Some("250".to_string()), 100), 250);
        assert_eq!(u64_or(Some(" 250 ".to_string()), 100), 250);
        assert_eq!(u64_or(Some("not-a-number".to_string()), 100), 100);
        assert_eq!(u64_or(None, 100), 100);
    }

    #[test]
    fn u32_or_rejects_oversized_values_instead_of_wrapping() {
        assert_eq!(u32_or(Some("200".to_string()), 100), 200);
        // Larger than u32::MAX: fall back to the default, never truncate.
        assert_eq!(u32_or(Some("5000000000".to_string()), 100), 100);
        assert_eq!(u32_or(Some("-5".to_string()), 100), 100);
        assert_eq!(u32_or(None, 100), 100);
    }
}
