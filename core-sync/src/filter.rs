//! # Filename Filter
//!
//! Decides which files in the source directory are product images.
//!
//! A product image is named `<5-digit product number>.<ext>`, e.g.
//! `12345.jpg`. Everything before the first `.` must be exactly five
//! characters that parse as an integer.

use std::path::Path;

/// Length of the product number stem
const STEM_LEN: usize = 5;

/// Check whether the base name `file_name` names a product image.
///
/// # Examples
///
/// ```
/// use core_sync::filter::is_eligible;
///
/// assert!(is_eligible("12345.jpg"));
/// assert!(is_eligible("00042.jpg"));
/// assert!(!is_eligible("1234.jpg"));
/// assert!(!is_eligible("tn_12345.jpg"));
/// ```
pub fn is_eligible(file_name: &str) -> bool {
    let Some((stem, _)) = file_name.split_once('.') else {
        return false;
    };

    stem.chars().count() == STEM_LEN && stem.parse::<i32>().is_ok()
}

/// Check whether the last extension of `file_name` equals `extension`,
/// ignoring ASCII case.
///
/// ```
/// use core_sync::filter::has_extension;
///
/// assert!(has_extension("12345.JPG", "jpg"));
/// assert!(!has_extension("12345.jpg.bak", "jpg"));
/// ```
pub fn has_extension(file_name: &str, extension: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension.trim_start_matches('.')))
}
