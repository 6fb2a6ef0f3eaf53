//! Generated document naming conventions.
//!
//! Pure string functions. These define the layout of the download directory
//! and the URLs that point into it.

use uuid::Uuid;

use crate::models::consultancy::ConsultancyType;

/// `{slug}_{8 hex chars}.pdf`, e.g. `audit_3f2a9c1b.pdf`.
pub fn pdf_filename(consultancy_type: ConsultancyType, id: Uuid) -> String {
    let hex = id.simple().to_string();
    format!("{}_{}.pdf", consultancy_type.slug(), &hex[..8])
}

pub fn download_url(filename: &str) -> String {
    format!("/download/{filename}")
}

/// Whether `name` is safe to use as a single path component in the
/// download directory.
pub fn is_valid_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
