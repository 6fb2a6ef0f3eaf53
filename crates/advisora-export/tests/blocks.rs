use advisora_export::blocks::{Block, BlockKind, classify};
use advisora_export::inline::{Span, parse_inline};
use advisora_export::text::sanitize;

fn kinds(text: &str) -> Vec<BlockKind> {
    classify(text).into_iter().map(|b| b.kind).collect()
}

#[test]
fn markdown_headings_lose_their_hashes() {
    let blocks = classify("## 1. **Executive Summary**\n\nBody text here.");

    assert_eq!(
        blocks,
        vec![
            Block {
                kind: BlockKind::Heading,
                text: "1. Executive Summary".to_string(),
            },
            Block {
                kind: BlockKind::Body,
                text: "Body text here.".to_string(),
            },
        ]
    );
}

#[test]
fn all_caps_lines_are_headings_but_short_ones_are_not() {
    assert_eq!(
        kinds("RISK ASSESSMENT\nROI\n2024 - 2025"),
        vec![BlockKind::Heading, BlockKind::Body, BlockKind::Body]
    );
}

#[test]
fn bullet_markers_are_recognised_and_removed() {
    let blocks = classify("- First\n* Second\n\u{2022} Third\n**Bold lead** sentence.");

    assert_eq!(blocks[0].kind, BlockKind::Bullet);
    assert_eq!(blocks[0].text, "First");
    assert_eq!(blocks[1].text, "Second");
    assert_eq!(blocks[2].kind, BlockKind::Bullet);
    assert_eq!(blocks[2].text, "Third");
    assert_eq!(blocks[3].kind, BlockKind::Body);
}

#[test]
fn signature_and_date_lines_are_flagged() {
    assert_eq!(
        kinds("Signature: ____\nDate: today\nPrepared for review."),
        vec![BlockKind::Signature, BlockKind::Signature, BlockKind::Body]
    );
}

#[test]
fn blank_lines_and_rules_are_dropped() {
    assert_eq!(kinds("\n   \n---\n***\nText\n"), vec![BlockKind::Body]);
}

#[test]
fn bold_segments_become_bold_spans() {
    assert_eq!(
        parse_inline("Use **chatbots** for support"),
        vec![
            Span { text: "Use ".to_string(), bold: false },
            Span { text: "chatbots".to_string(), bold: true },
            Span { text: " for support".to_string(), bold: false },
        ]
    );
}

#[test]
fn unclosed_bold_marker_is_literal() {
    assert_eq!(
        parse_inline("Costs **may vary"),
        vec![
            Span { text: "Costs ".to_string(), bold: false },
            Span { text: "**may vary".to_string(), bold: false },
        ]
    );
}

#[test]
fn glyph_bullets_need_no_space() {
    let blocks = classify("\u{2022}Automate invoicing\n\u{25CF} Track margins\n-Reduce churn");

    assert_eq!(
        blocks,
        vec![
            Block {
                kind: BlockKind::Bullet,
                text: "Automate invoicing".to_string(),
            },
            Block {
                kind: BlockKind::Bullet,
                text: "Track margins".to_string(),
            },
            Block {
                kind: BlockKind::Bullet,
                text: "Reduce churn".to_string(),
            },
        ]
    );
}

#[test]
fn markers_without_text_are_not_bullets() {
    assert_eq!(
        kinds("-5% churn expected\n*emphasis* matters\n\u{2022}\nDone."),
        vec![BlockKind::Body, BlockKind::Body, BlockKind::Body]
    );
}

#[test]
fn sanitize_keeps_printable_unicode() {
    assert_eq!(
        sanitize("\u{201C}Caf\u{00E9}\u{201D}\tcosts \u{20AC}5\u{200B}\u{0007}"),
        "\u{201C}Caf\u{00E9}\u{201D} costs \u{20AC}5"
    );
}
