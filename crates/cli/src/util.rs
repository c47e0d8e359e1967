use chrono::NaiveDateTime;

/// Collapse a free-form label into a filesystem-safe slug: lowercase,
/// with each run of characters outside [A-Za-z0-9_-] becoming one '_'.
pub(crate) fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_gap = false;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            in_gap = false;
            out.push(ch.to_ascii_lowercase());
        } else if !in_gap {
            in_gap = true;
            out.push('_');
        }
    }
    out
}

/// Timestamped artifact name: `<slug>_<YYYYMMDDTHHMMSS>.<ext>`.
/// Repeated runs never clobber each other.
pub(crate) fn output_file_name(prefix: &str, extension: &str, at: NaiveDateTime) -> String {
    format!("{}_{}.{}", slug(prefix), at.format("%Y%m%dT%H%M%S"), extension)
}
