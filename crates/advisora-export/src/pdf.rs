use genpdf::elements::{Break, Paragraph, UnorderedList};
use genpdf::{Document, Margins, SimplePageDecorator, Size};
use jiff::civil::Date;
use tracing::info;

use crate::blocks::{Block, BlockKind, classify};
use crate::error::ExportError;
use crate::fonts::ReportFonts;
use crate::inline::parse_inline;
use crate::styles::{DocumentStyles, TextStyle};
use crate::text::sanitize;

/// Header information printed above the generated text.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Document title, e.g. "AI Readiness Audit". Printed uppercased.
    pub title: String,
    pub business_name: String,
    pub date: Date,
}

/// Turns generated report text into PDF bytes with one font family and
/// style sheet.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    fonts: ReportFonts,
    styles: DocumentStyles,
}

impl ReportRenderer {
    pub fn new(fonts: ReportFonts) -> Self {
        Self::with_styles(fonts, DocumentStyles::default())
    }

    pub fn with_styles(fonts: ReportFonts, styles: DocumentStyles) -> Self {
        Self { fonts, styles }
    }

    pub fn fonts(&self) -> &ReportFonts {
        &self.fonts
    }

    pub fn styles(&self) -> &DocumentStyles {
        &self.styles
    }

    /// Generate a PDF report from generated text.
    ///
    /// The flow is:
    /// 1. Generated text → classified blocks ([`classify`])
    /// 2. Blocks → styled paragraphs, lists and breaks
    /// 3. genpdf wraps, paginates and writes the document
    pub fn render(&self, meta: &ReportMeta, text: &str) -> Result<Vec<u8>, ExportError> {
        let blocks = classify(text);
        if blocks.is_empty() {
            return Err(ExportError::EmptyDocument);
        }

        let mut doc = self.document(&meta.title);
        self.push_header(&mut doc, meta);
        for block in &blocks {
            self.push_block(&mut doc, block);
        }

        let mut bytes = Vec::new();
        doc.render(&mut bytes)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;

        info!(
            title = %meta.title,
            fonts = self.fonts.name(),
            blocks = blocks.len(),
            bytes = bytes.len(),
            "rendered PDF"
        );

        Ok(bytes)
    }

    fn document(&self, title: &str) -> Document {
        let styles = &self.styles;
        let mut doc = Document::new(self.fonts.family());
        doc.set_title(title);
        doc.set_paper_size(Size::new(styles.page_width_mm, styles.page_height_mm));
        doc.set_font_size(styles.body.font_size);
        doc.set_line_spacing(styles.line_spacing);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(Margins::all(styles.margin_mm));
        doc.set_page_decorator(decorator);
        doc
    }

    fn push_header(&self, doc: &mut Document, meta: &ReportMeta) {
        let styles = &self.styles;
        let title = sanitize(&meta.title).to_uppercase();
        let for_line = format!("For: {}", sanitize(&meta.business_name));

        doc.push(styled_paragraph(&title, &styles.title));
        doc.push(styled_paragraph(&for_line, &styles.title));
        doc.push(Break::new(styles.header_spacer));

        let date = format!("Date: {}", meta.date.strftime("%B %d, %Y"));
        doc.push(styled_paragraph(&date, &styles.date));
        doc.push(Break::new(styles.header_spacer));
    }

    fn push_block(&self, doc: &mut Document, block: &Block) {
        let styles = &self.styles;
        match block.kind {
            BlockKind::Heading => {
                doc.push(styled_paragraph(&block.text, &styles.heading));
                doc.push(Break::new(styles.heading_gap));
            }
            BlockKind::Bullet => {
                let mut list = UnorderedList::with_bullet(styles.bullet_marker.as_str());
                list.push(inline_paragraph(&block.text, &styles.bullet));
                doc.push(list);
                doc.push(Break::new(styles.block_gap));
            }
            BlockKind::Signature => {
                doc.push(Break::new(styles.block_gap));
                doc.push(inline_paragraph(&block.text, &styles.signature));
                doc.push(Break::new(styles.block_gap));
            }
            BlockKind::Body => {
                doc.push(inline_paragraph(&block.text, &styles.body));
                doc.push(Break::new(styles.block_gap));
            }
        }
    }
}

/// One run of text in a single style.
fn styled_paragraph(text: &str, style: &TextStyle) -> Paragraph {
    let mut paragraph = Paragraph::default();
    paragraph.push_styled(text.to_string(), style.to_style(false));
    paragraph.aligned(style.alignment.into())
}

/// Text with `**bold**` runs rendered in the bold face.
fn inline_paragraph(text: &str, style: &TextStyle) -> Paragraph {
    let mut paragraph = Paragraph::default();
    for span in parse_inline(text) {
        paragraph.push_styled(span.text, style.to_style(span.bold));
    }
    paragraph.aligned(style.alignment.into())
}
