/// A run of text sharing one weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
        }
    }
}

/// Parse simple inline formatting: **bold** segments.
///
/// An opening `**` without a closing one is kept as literal text.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut remaining = text;

    while let Some(start) = remaining.find("**") {
        let before = &remaining[..start];
        if !before.is_empty() {
            spans.push(Span::plain(before));
        }

        let after_start = &remaining[start + 2..];
        if let Some(end) = after_start.find("**") {
            let bold_text = &after_start[..end];
            if !bold_text.is_empty() {
                spans.push(Span {
                    text: bold_text.to_string(),
                    bold: true,
                });
            }
            remaining = &after_start[end + 2..];
        } else {
            spans.push(Span::plain(&remaining[start..]));
            return spans;
        }
    }

    if !remaining.is_empty() {
        spans.push(Span::plain(remaining));
    }

    spans
}

/// Drop `**` markers entirely, for text that is already bold.
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
}
