//! Reporting utilities: terminal formatting and narrative-input assembly.

pub mod format;

pub use format::{comparison_to_csv, format_cards, format_catalog, format_change_lines};
