use shakmaty::Color;

use super::board::MoveSnapshot;

#[derive(Debug, Clone)]
pub struct PromptConfig {
    /// Output contract appended to every prompt.
    pub contract: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            contract: "Reply with EXACTLY ONE move from the legal lists above.\nOutput only the move token, no explanation, no punctuation.\nExamples of valid replies: e4  Nf3  O-O  e7e5".to_string(),
        }
    }
}

/// Builds the per-turn prompt: the side to play, the position fingerprint,
/// the full legal-move lists in both notations, and the output contract.
///
/// Both SAN and UCI lists are included on purpose: they give the extractor
/// two independent notation tiers to fall back across when the agent answers
/// in the "wrong" one.
pub fn build_move_prompt(side: Color, fen: &str, snapshot: &MoveSnapshot, cfg: &PromptConfig) -> String {
    let side_name = match side {
        Color::White => "White",
        Color::Black => "Black",
    };

    format!(
        "You are playing {side_name} in a chess game.\n\n[FEN]\n{fen}\n\n[LEGAL_MOVES_SAN]\n{}\n\n[LEGAL_MOVES_UCI]\n{}\n\n[CONTRACT]\n{}\n",
        snapshot.san_list().join(", "),
        snapshot.uci_list().join(", "),
        cfg.contract
    )
}
