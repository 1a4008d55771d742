// crates/respond-cli/src/intent.rs
// ============================================================================
// Module: Respond Intent Modifiers
// Description: Splits response text into say, act, and notice replies.
// Purpose: Expand inline modifiers and nick placeholders in stored responses.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Response text may embed `%say%`, `%act%`, `%notice%`, and `%rainbow%`.
//! Each modifier applies to the text up to the next modifier. Text before the
//! first modifier is said. `%rainbow%` is said with per-character IRC colors.
//! `%nick%` is replaced with the caller's nickname in every segment.

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder replaced with the caller's nickname.
pub const NICK_PLACEHOLDER: &str = "%nick%";
/// Recognised modifiers.
const MODIFIERS: [(&str, Modifier); 4] = [
    ("%act%", Modifier::Act),
    ("%notice%", Modifier::Notice),
    ("%say%", Modifier::Say),
    ("%rainbow%", Modifier::Rainbow),
];
/// IRC color control character.
const COLOR_CODE: char = '\u{3}';
/// IRC formatting reset character.
const RESET_CODE: char = '\u{f}';
/// mIRC palette indices cycled by `%rainbow%` (red through purple).
const RAINBOW_PALETTE: [u8; 7] = [4, 7, 8, 9, 12, 2, 6];

// ============================================================================
// SECTION: Types
// ============================================================================

/// How a reply is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Plain channel message.
    Say,
    /// Action (`/me`).
    Act,
    /// Notice.
    Notice,
}

impl Intent {
    /// Returns the stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Say => "say",
            Self::Act => "act",
            Self::Notice => "notice",
        }
    }
}

/// One deliverable reply segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Delivery intent.
    pub intent: Intent,
    /// Message text.
    pub message: String,
}

impl Reply {
    /// Creates a reply.
    #[must_use]
    pub fn new(intent: Intent, message: impl Into<String>) -> Self {
        Self { intent, message: message.into() }
    }
}

/// Inline modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    /// `%act%`.
    Act,
    /// `%notice%`.
    Notice,
    /// `%say%`.
    Say,
    /// `%rainbow%`.
    Rainbow,
}

impl Modifier {
    /// Returns the delivery intent.
    const fn intent(self) -> Intent {
        match self {
            Self::Act => Intent::Act,
            Self::Notice => Intent::Notice,
            Self::Say | Self::Rainbow => Intent::Say,
        }
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Splits response text into replies for `nick`.
#[must_use]
pub fn parse(text: &str, nick: &str) -> Vec<Reply> {
    let mut replies = Vec::new();
    let mut current = Modifier::Say;
    let mut segment_start = 0;
    let mut cursor = 0;
    while let Some(offset) = text[cursor ..].find('%') {
        let at = cursor + offset;
        let found = MODIFIERS.iter().find(|(token, _)| text[at ..].starts_with(token));
        if let Some((token, modifier)) = found {
            push_segment(&mut replies, &text[segment_start .. at], current, nick);
            current = *modifier;
            segment_start = at + token.len();
            cursor = segment_start;
        } else {
            cursor = at + 1;
        }
    }
    push_segment(&mut replies, &text[segment_start ..], current, nick);
    replies
}

/// Appends a non-empty segment with nick substitution and styling.
fn push_segment(replies: &mut Vec<Reply>, segment: &str, modifier: Modifier, nick: &str) {
    if segment.is_empty() {
        return;
    }
    let substituted = segment.replace(NICK_PLACEHOLDER, nick);
    let message = if modifier == Modifier::Rainbow { rainbow(&substituted) } else { substituted };
    replies.push(Reply::new(modifier.intent(), message));
}

/// Colors each visible character with the next palette entry.
#[must_use]
pub fn rainbow(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 4);
    let mut index = 0;
    for ch in text.chars() {
        if ch.is_whitespace() {
            out.push(ch);
            continue;
        }
        let color = RAINBOW_PALETTE[index % RAINBOW_PALETTE.len()];
        out.push(COLOR_CODE);
        out.push_str(&format!("{color:02}"));
        out.push(ch);
        index += 1;
    }
    out.push(RESET_CODE);
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
