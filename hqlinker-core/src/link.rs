pub const DEFAULT_SCHEME_PREFIX: &str = "hq://";
pub const DEFAULT_CLIENT_PROCESS: &str = "HQClient";

/// Trimmed clipboard text, or `None` when nothing but whitespace is left.
pub fn normalize_clipboard_text(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// A link must start with the scheme prefix and carry no embedded whitespace.
pub fn is_link(text: &str, scheme_prefix: &str) -> bool {
    text.starts_with(scheme_prefix) && !text.chars().any(char::is_whitespace)
}

/// Compares process image names the way Windows does: ASCII case-insensitive,
/// with an optional `.exe` suffix on either side.
pub fn process_name_matches(candidate: &str, target: &str) -> bool {
    strip_exe(candidate).eq_ignore_ascii_case(strip_exe(target))
}

fn strip_exe(name: &str) -> &str {
    let name = name.trim();
    let split = name.len().saturating_sub(4);
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(".exe") => stem,
        _ => name,
    }
}
