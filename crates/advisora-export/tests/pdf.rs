use advisora_export::error::ExportError;
use advisora_export::fonts::ReportFonts;
use advisora_export::pdf::{ReportMeta, ReportRenderer};

fn renderer() -> ReportRenderer {
    ReportRenderer::new(ReportFonts::discover(None).unwrap())
}

fn meta() -> ReportMeta {
    ReportMeta {
        title: "AI Ethics Framework".to_string(),
        business_name: "Caf\u{00E9} Northwind (Ltd)".to_string(),
        date: jiff::civil::date(2026, 10, 18),
    }
}

fn page_count(bytes: &[u8]) -> usize {
    lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
}

const REPORT: &str = "\
# Executive Summary
Northwind should adopt AI **gradually**, starting with low-risk tools.

## Key Opportunities
- Demand forecasting
- Customer support triage
\u{2022}Document summarisation

RISK ASSESSMENT
Data privacy obligations apply to every recommendation (see section 6).

Signature: ______________________
";

#[test]
fn renders_a_single_page_pdf() {
    let bytes = renderer().render(&meta(), REPORT).unwrap();

    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn long_reports_flow_onto_more_pages() {
    let long = REPORT.repeat(40);
    let bytes = renderer().render(&meta(), &long).unwrap();

    assert!(page_count(&bytes) > 3);
}

#[test]
fn empty_text_is_rejected() {
    let err = renderer().render(&meta(), "\n  \n---\n").unwrap_err();
    assert!(matches!(err, ExportError::EmptyDocument));
}

#[test]
fn missing_fonts_are_reported_with_the_searched_dirs() {
    let dir = tempfile::tempdir().unwrap();

    let err = ReportFonts::discover_in(&[dir.path().to_path_buf()]).unwrap_err();

    match err {
        ExportError::FontsNotFound { searched } => {
            assert_eq!(searched, dir.path().display().to_string())
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unreadable_font_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DejaVuSans.ttf"), b"not a font").unwrap();
    std::fs::write(dir.path().join("DejaVuSans-Bold.ttf"), b"not a font").unwrap();

    let err = ReportFonts::discover_in(&[dir.path().to_path_buf()]).unwrap_err();

    match err {
        ExportError::InvalidFont { path, .. } => {
            assert_eq!(path, dir.path().join("DejaVuSans.ttf"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn configured_dir_is_searched_first() {
    let system = ReportFonts::discover(None).unwrap();
    let dir = tempfile::tempdir().unwrap();
    for entry in std::fs::read_dir(system.dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "ttf") {
            std::fs::copy(&path, dir.path().join(path.file_name().unwrap())).unwrap();
        }
    }

    let fonts = ReportFonts::discover(Some(dir.path())).unwrap();

    assert_eq!(fonts.dir(), dir.path());
    assert_eq!(fonts.name(), system.name());
}
