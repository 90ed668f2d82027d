//! Case-insensitive text helpers shared by the classifier and extractors.

/// A note paired with its case-folded copy.
///
/// Folding happens once per note so that every keyword probe afterwards is a
/// plain substring search.
#[derive(Debug, Clone)]
pub struct FoldedText<'a> {
    raw: &'a str,
    folded: String,
}

impl<'a> FoldedText<'a> {
    #[must_use]
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            folded: raw.to_lowercase(),
        }
    }

    /// The note as written.
    #[must_use]
    pub const fn raw(&self) -> &'a str {
        self.raw
    }

    /// Case-insensitive containment check.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.folded.contains(&needle.to_lowercase())
    }
}

/// Trim a captured value, treating an all-whitespace capture as absent.
#[must_use]
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_ignores_case() {
        let text = FoldedText::new("Patient uses a CPAP nightly");
        assert!(text.contains("cpap"));
        assert!(text.contains("PATIENT USES"));
        assert!(!text.contains("oxygen"));
        assert_eq!(text.raw(), "Patient uses a CPAP nightly");
    }

    #[test]
    fn non_blank_trims_and_rejects_whitespace() {
        assert_eq!(non_blank("  John Doe \t"), Some("John Doe".to_string()));
        assert_eq!(non_blank(" \t "), None);
        assert_eq!(non_blank(""), None);
    }
}
