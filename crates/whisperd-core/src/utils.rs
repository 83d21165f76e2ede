//! Utility functions for the `whisperd` transcription service

use std::path::Path;

/// Validate file extension against an allow list
#[must_use]
pub fn validate_file_extension(filename: &str, allowed: &[String]) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            allowed
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// Generate a collision-free staging filename for an uploaded audio payload
#[must_use]
pub fn staging_filename(original: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    let extension = Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("wav");

    format!("upload_{uuid}.{extension}")
}

/// Extract the client-supplied basename without directories or extension,
/// sanitized for safe use in a report filename
#[must_use]
pub fn sanitize_basename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let sanitized = stem
        .chars()
        .map(|c| {
            match c {
                // Keep alphanumeric, dots, underscores, and hyphens
                c if c.is_alphanumeric() || c == '.' || c == '_' || c == '-' => c,
                // Replace everything else with underscore
                _ => '_',
            }
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string();

    if sanitized.is_empty() {
        "audio".to_string()
    } else {
        sanitized
    }
}

/// Format a timestamp for a report filename (`YYMMDD_HHMM`)
#[must_use]
pub fn report_timestamp(datetime: &chrono::DateTime<chrono::Local>) -> String {
    datetime.format("%y%m%d_%H%M").to_string()
}
