//! Line classification for generated report text.
//!
//! The generative API returns loosely formatted Markdown. Each non-blank line
//! becomes one block, classified by its leading characters and casing.

use crate::inline::strip_emphasis;
use crate::text::sanitize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Bullet,
    Signature,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

/// Split generated text into classified blocks, dropping blank lines and
/// horizontal rules.
pub fn classify(text: &str) -> Vec<Block> {
    text.lines()
        .map(sanitize)
        .filter_map(|line| classify_line(line.trim()))
        .collect()
}

fn classify_line(line: &str) -> Option<Block> {
    if line.is_empty() || is_rule(line) {
        return None;
    }

    if line.starts_with('#') {
        let text = strip_emphasis(&line.replace('#', "")).trim().to_string();
        if text.is_empty() {
            return None;
        }
        return Some(Block {
            kind: BlockKind::Heading,
            text,
        });
    }

    if is_shouting(line) {
        return Some(Block {
            kind: BlockKind::Heading,
            text: strip_emphasis(line).trim().to_string(),
        });
    }

    if let Some(rest) = bullet_text(line) {
        let text = rest.trim();
        if text.is_empty() {
            return None;
        }
        return Some(Block {
            kind: BlockKind::Bullet,
            text: text.to_string(),
        });
    }

    let lower = line.to_ascii_lowercase();
    let kind = if lower.contains("signature") || lower.contains("sign") || lower.contains("date:") {
        BlockKind::Signature
    } else {
        BlockKind::Body
    };

    Some(Block {
        kind,
        text: line.to_string(),
    })
}

/// An all-caps line (at least one letter, no lowercase) longer than three
/// characters reads as a section heading.
fn is_shouting(line: &str) -> bool {
    line.chars().count() > 3
        && line.chars().any(|c| c.is_alphabetic())
        && !line.chars().any(|c| c.is_lowercase())
}

/// Glyph bullets mark a list item with or without a following space.
const GLYPH_BULLETS: &[char] = &['\u{2022}', '\u{25CF}', '\u{25AA}', '\u{25E6}', '\u{2023}', '\u{00B7}'];

// "-" and "+" count when a space or a letter follows; "*" only with a space,
// so "-5%" and "*emphasis*" stay body text.
fn bullet_text(line: &str) -> Option<&str> {
    if line.starts_with("**") {
        return None;
    }
    if let Some(rest) = line.strip_prefix(GLYPH_BULLETS) {
        return Some(rest);
    }
    if let Some(rest) = line.strip_prefix(['-', '+']) {
        return (rest.starts_with(' ') || rest.starts_with(char::is_alphabetic)).then_some(rest);
    }
    line.strip_prefix("* ")
}

fn is_rule(line: &str) -> bool {
    line.chars().count() >= 3
        && line.chars().all(|c| matches!(c, '-' | '*' | '_' | '='))
}
