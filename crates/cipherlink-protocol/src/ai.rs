//! Rendering and parsing of the automated agent's conversation turns.
//!
//! The agent's reasoning and guess land in the transcript as a single
//! turn with a fixed textual layout:
//!
//! ```text
//! Thinking: <joined thoughts>
//!
//! Guess: <guess>
//! ```
//!
//! Consumers split the content back apart for display (thoughts styled
//! differently from the guess), so parsing must tolerate content where
//! either marker is missing and yield empty strings for the absent
//! part.

const THINKING_MARKER: &str = "Thinking:";
const GUESS_MARKER: &str = "Guess:";

/// The two segments of an agent turn, parsed back out of its content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AiUtterance {
    /// The joined reasoning trace; empty when the marker was absent.
    pub thinking: String,
    /// The committed guess; empty when the marker was absent.
    pub guess: String,
}

/// Renders the canonical content for an agent turn.
///
/// Thoughts are joined with single spaces; an empty slice renders an
/// empty thinking segment rather than dropping the marker, so rendered
/// content always parses back losslessly.
pub fn render_ai_turn(thoughts: &[String], guess: &str) -> String {
    format!(
        "{THINKING_MARKER} {}\n\n{GUESS_MARKER} {}",
        thoughts.join(" "),
        guess
    )
}

/// Parses agent-turn content into its segments.
///
/// Tolerant by design: content without a `Thinking:` segment yields an
/// empty `thinking`, content without a `Guess:` segment yields an empty
/// `guess`, and arbitrary text yields both empty.
pub fn parse_ai_turn(content: &str) -> AiUtterance {
    let thinking = content
        .split_once(THINKING_MARKER)
        .map(|(_, rest)| rest)
        .map(|rest| {
            rest.split_once(GUESS_MARKER)
                .map_or(rest, |(before, _)| before)
        })
        .map_or(String::new(), |s| s.trim().to_owned());

    let guess = content
        .split_once(GUESS_MARKER)
        .map_or(String::new(), |(_, rest)| rest.trim().to_owned());

    AiUtterance { thinking, guess }
}

// =========================================================================
// Tests
// =========================================================================
