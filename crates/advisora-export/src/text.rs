/// Normalise generated text for the PDF.
///
/// The embedded TrueType family covers accented Latin and common
/// typography, so printable characters pass through. Tabs and exotic
/// spaces become plain spaces; zero-width and control characters are
/// dropped.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\t' | '\u{00A0}' | '\u{2002}' | '\u{2003}' | '\u{2009}' | '\u{202F}' => Some(' '),
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
