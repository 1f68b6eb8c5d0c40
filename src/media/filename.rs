use crate::media::FormatKind;

pub const MAX_FILENAME_LEN: usize = 200;

const FALLBACK_NAME: &str = "download";

/// Turns a video title into a download filename with the extension for `kind`.
///
/// Only ASCII letters, digits, `-`, `_`, `.` and spaces survive. The result
/// never exceeds [`MAX_FILENAME_LEN`] bytes and always keeps its extension.
pub fn sanitize_filename(title: &str, kind: FormatKind) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
        .collect();

    let base = kept.trim().trim_end_matches('.');
    let base = if base.is_empty() { FALLBACK_NAME } else { base };
    let ext = kind.extension();

    // base is pure ASCII, so byte slicing is char-safe
    let room = MAX_FILENAME_LEN - ext.len();
    let base = if base.len() > room { &base[..room] } else { base };
    format!("{}{}", base, ext)
}

/// `Content-Disposition` value for an attachment named `filename`.
pub fn content_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", urlencoding::encode(filename))
}
