use std::future::Future;
use std::pin::Pin;

use shakmaty::Color;

use super::board::{Board, MoveSnapshot};
use super::prompt::{PromptConfig, build_move_prompt};

/// Boundary to a text-generation service. The runner implements this over an
/// HTTP generate endpoint; tests implement it with queued responses.
pub trait LlmClient: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: String,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;
}

/// Raw outcome of one agent call: text, or an explicit failure marker.
///
/// Failures are data, not errors; the arbiter turns them into a fallback
/// move and the game continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentResponse {
    Text(String),
    Failed(String),
}

/// One side's agent: fixed identity plus the prompt configuration.
///
/// Both sides are structurally symmetric; the same adapter type is
/// instantiated once per color.
#[derive(Debug, Clone)]
pub struct AgentAdapter {
    /// Participant label, used for the game record and the trace.
    pub label: String,
    pub side: Color,
    pub prompt_cfg: PromptConfig,
}

impl AgentAdapter {
    pub fn new(label: impl Into<String>, side: Color) -> Self {
        Self {
            label: label.into(),
            side,
            prompt_cfg: PromptConfig::default(),
        }
    }

    /// Asks the agent for one move. Exactly one service call, no retry.
    ///
    /// Transport errors and blank output become the failure marker, with the
    /// reason preserved so the trace can say why a fallback happened.
    pub async fn request_move(
        &self,
        llm: &dyn LlmClient,
        board: &Board,
        snapshot: &MoveSnapshot,
    ) -> AgentResponse {
        let prompt = build_move_prompt(self.side, &board.fen(), snapshot, &self.prompt_cfg);
        match llm.complete(prompt).await {
            Ok(text) if text.trim().is_empty() => {
                AgentResponse::Failed("empty response".to_string())
            }
            Ok(text) => AgentResponse::Text(text),
            Err(err) => AgentResponse::Failed(format!("{err:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub(crate) struct FakeLlm {
        responses: Mutex<VecDeque<anyhow::Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeLlm {
        pub(crate) fn push_response(&self, raw: impl Into<String>) {
            self.responses.lock().unwrap().push_back(Ok(raw.into()));
        }

        pub(crate) fn push_error(&self, msg: &str) {
            let msg = msg.to_string();
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(anyhow::anyhow!(msg)));
        }

        pub(crate) fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl LlmClient for FakeLlm {
        fn complete<'a>(
            &'a self,
            prompt: String,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
            Box::pin(async move {
                self.prompts.lock().unwrap().push(prompt);
                self.responses
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| anyhow::bail!("no llm response queued"))
            })
        }
    }

    #[tokio::test]
    async fn text_response_passes_through() {
        let llm = FakeLlm::default();
        llm.push_response("e4");
        let board = Board::new();
        let snap = board.legal_snapshot();
        let adapter = AgentAdapter::new("white-model", Color::White);

        let res = adapter.request_move(&llm, &board, &snap).await;
        assert_eq!(res, AgentResponse::Text("e4".to_string()));

        // Exactly one call, and the prompt carried the legal moves.
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("e2e4"));
    }

    #[tokio::test]
    async fn empty_text_becomes_failure_marker() {
        let llm = FakeLlm::default();
        llm.push_response("   \n");
        let board = Board::new();
        let snap = board.legal_snapshot();
        let adapter = AgentAdapter::new("white-model", Color::White);

        let res = adapter.request_move(&llm, &board, &snap).await;
        assert_eq!(res, AgentResponse::Failed("empty response".to_string()));
    }

    #[tokio::test]
    async fn transport_error_becomes_failure_marker_not_err() {
        let llm = FakeLlm::default();
        llm.push_error("connection refused");
        let board = Board::new();
        let snap = board.legal_snapshot();
        let adapter = AgentAdapter::new("black-model", Color::Black);

        match adapter.request_move(&llm, &board, &snap).await {
            AgentResponse::Failed(reason) => assert!(reason.contains("connection refused")),
            other => panic!("expected failure marker, got {other:?}"),
        }
    }
}
