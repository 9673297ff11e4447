//! Extracts a legal move notation from free-form agent text.
//!
//! Agents are told to answer with exactly one move token, but in practice
//! they wrap the move in prose, code fences, or apologies. Extraction runs a
//! fixed ladder of tiers, first hit wins, and is deterministic for identical
//! inputs so arbitration behavior is reproducible in tests.

/// Finds at most one element of `legal` in `text`.
///
/// Tiers, tried in order:
/// 1. the trimmed text equals a legal notation verbatim;
/// 2. a legal notation occurs as a substring (snapshot order decides ties);
/// 3. some word-like token of the text is itself a legal notation;
/// 4. castling rescue: an `O-O-O` / `O-O` shaped token that is legal.
pub fn extract_move<'a>(text: &str, legal: &'a [String]) -> Option<&'a str> {
    let trimmed = text.trim();

    if let Some(hit) = legal.iter().find(|n| n.as_str() == trimmed) {
        return Some(hit);
    }

    if let Some(hit) = legal.iter().find(|n| text.contains(n.as_str())) {
        return Some(hit);
    }

    for token in tokens(text) {
        if let Some(hit) = legal.iter().find(|n| n.as_str() == token) {
            return Some(hit);
        }
    }

    // Longer castling first so O-O-O is never truncated to O-O.
    for castle in ["O-O-O", "O-O"] {
        if text.contains(castle)
            && let Some(hit) = legal.iter().find(|n| n.as_str() == castle)
        {
            return Some(hit);
        }
    }

    None
}

/// Splits text into word-like tokens: alphanumeric runs, allowing internal
/// hyphens so castling notation survives as one token.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
}
