//! PATH-like variable helpers
//!
//! Containment is a plain substring test on the whole variable value, not a
//! per-component comparison. `C:\poppler\bin` is therefore considered
//! present in `C:\poppler\bin\extra`. Re-running an append is always a no-op.

/// Separator between PATH segments on this platform.
#[cfg(windows)]
pub const SEPARATOR: char = ';';

/// Separator between PATH segments on this platform.
#[cfg(not(windows))]
pub const SEPARATOR: char = ':';

/// Whether `segment` already appears anywhere in `value`.
pub fn contains_segment(value: &str, segment: &str) -> bool {
    !segment.is_empty() && value.contains(segment)
}

/// Append `segment` to `value` unless it is already present.
///
/// Returns the value unchanged when the segment is present, the bare
/// segment when the value is empty, and otherwise `value + separator +
/// segment` without doubling a trailing separator.
pub fn append_segment(value: &str, segment: &str, separator: char) -> String {
    if contains_segment(value, segment) {
        return value.to_string();
    }
    if value.is_empty() {
        return segment.to_string();
    }
    if value.ends_with(separator) {
        format!("{value}{segment}")
    } else {
        format!("{value}{separator}{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_when_already_present_is_noop() {
        let path = r"C:\a;C:\poppler\bin";
        assert_eq!(append_segment(path, r"C:\poppler\bin", ';'), path);
    }

    #[test]
    fn test_append_new_segment() {
        assert_eq!(
            append_segment(r"C:\a", r"C:\poppler\bin", ';'),
            r"C:\a;C:\poppler\bin"
        );
        assert_eq!(
            append_segment("/usr/bin", "/opt/poppler/bin", ':'),
            "/usr/bin:/opt/poppler/bin"
        );
    }

    #[test]
    fn test_append_to_empty_value() {
        assert_eq!(append_segment("", "/opt/bin", ':'), "/opt/bin");
    }

    #[test]
    fn test_append_after_trailing_separator() {
        assert_eq!(append_segment(r"C:\a;", r"C:\b", ';'), r"C:\a;C:\b");
    }

    #[test]
    fn test_contains_is_substring_match() {
        assert!(contains_segment(r"C:\poppler\bin\extra", r"C:\poppler\bin"));
        assert!(!contains_segment(r"C:\a", r"C:\poppler\bin"));
        assert!(!contains_segment(r"C:\a", ""));
    }

    #[test]
    fn test_append_twice_is_stable() {
        let once = append_segment("/usr/bin", "/opt/bin", ':');
        let twice = append_segment(&once, "/opt/bin", ':');
        assert_eq!(once, twice);
    }
}
