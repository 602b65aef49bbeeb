//! Change detection: rendered output versus original bytes.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Input already canonical; nothing to emit.
    Unchanged,
    /// Canonical text differing from the input.
    Changed(String),
}

impl Change {
    pub fn is_changed(&self) -> bool {
        matches!(self, Change::Changed(_))
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Change::Changed(text) => Some(text),
            Change::Unchanged => None,
        }
    }
}

pub fn detect(original: &[u8], rendered: String) -> Change {
    if original == rendered.as_bytes() {
        Change::Unchanged
    } else {
        Change::Changed(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_are_unchanged() {
        assert_eq!(detect(b"package p\n", "package p\n".into()), Change::Unchanged);
    }

    #[test]
    fn any_byte_difference_is_a_change() {
        let change = detect(b"package p", "package p\n".into());
        assert!(change.is_changed());
        assert_eq!(change.into_text().as_deref(), Some("package p\n"));
    }
}
