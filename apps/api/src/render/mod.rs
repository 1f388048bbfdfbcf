//! Document rendering — Typst markup generation and compilation to PDF via
//! the external `typst` binary.

mod compile;
pub mod typst;

pub use compile::compile_typst;

/// Keeps Content-Disposition filenames header-safe: ASCII alphanumerics,
/// dashes, and underscores only, so the name survives header encoding as-is.
pub fn sanitize_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_keeps_safe_chars() {
        assert_eq!(sanitize_filename("Acme Ltd"), "Acme_Ltd");
        assert_eq!(sanitize_filename("Senior-Engineer_2"), "Senior-Engineer_2");
    }

    #[test]
    fn test_sanitize_filename_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("R&D/Team: AI"), "R_D_Team__AI");
        assert_eq!(sanitize_filename("a\"b\nc"), "a_b_c");
    }

    #[test]
    fn test_sanitize_filename_replaces_non_ascii() {
        assert_eq!(sanitize_filename("Señor Engineer"), "Se_or_Engineer");
    }
}
