//! Localization - Description tables for components and commands
//!
//! Each table implements [`EditorLocalization`] (and through it
//! [`ComponentLocalization`]). Partial translations fall back to English for
//! any string they do not translate.

mod english;
mod spanish;

pub use english::*;
pub use spanish::*;

use edit_engine::EditorLocalization;

/// Language codes with a table in this crate
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "es"];

/// The table for `language` (e.g. "es" or "es-MX"), falling back to English
pub fn for_language(language: &str) -> Box<dyn EditorLocalization + Send + Sync> {
    let primary = language
        .split(|c: char| c == '-' || c == '_')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match primary.as_str() {
        "es" => Box::new(Spanish),
        "en" => Box::new(English),
        _ => {
            tracing::debug!(language, "No table for language, using English");
            Box::new(English)
        }
    }
}
