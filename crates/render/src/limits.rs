use serde::{Deserialize, Serialize};

/// Marker appended after a cut docstring
pub const TRUNCATION_MARKER: &str = "[...docstring truncated...]";

/// Fixed output caps applied by the text renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderLimits {
    /// Lines of a module docstring (and of classes listed inside another view)
    pub docstring_lines: usize,

    /// Lines of the docstring of a class or function inspected directly
    pub target_docstring_lines: usize,

    /// Array items shown before eliding the rest
    pub max_array_items: usize,

    /// Nesting depth below the root at which containers are collapsed to a count
    pub max_display_depth: usize,

    /// Characters of a string value shown before truncation
    pub max_string_length: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            docstring_lines: 8,
            target_docstring_lines: 15,
            max_array_items: 10,
            max_display_depth: 1,
            max_string_length: 80,
        }
    }
}

impl RenderLimits {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.docstring_lines == 0 || self.target_docstring_lines == 0 {
            return Err("docstring line caps must be > 0".to_string());
        }

        if self.max_string_length == 0 {
            return Err("max_string_length must be > 0".to_string());
        }

        Ok(())
    }
}

/// Keep the first `max_lines` lines of a docstring, marking the cut.
pub fn truncate_docstring(docstring: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = docstring.split('\n').collect();
    if lines.len() <= max_lines {
        return docstring.to_string();
    }
    format!("{}\n\n{TRUNCATION_MARKER}", lines[..max_lines].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_limits_valid() {
        assert!(RenderLimits::default().validate().is_ok());

        let limits = RenderLimits {
            max_string_length: 0,
            ..Default::default()
        };
        assert_eq!(
            limits.validate(),
            Err("max_string_length must be > 0".to_string())
        );
    }

    #[test]
    fn test_truncate_docstring() {
        let doc = (1..=20).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let cut = truncate_docstring(&doc, 8);
        assert_eq!(cut, "1\n2\n3\n4\n5\n6\n7\n8\n\n[...docstring truncated...]");
        assert_eq!(truncate_docstring("short\ndoc", 8), "short\ndoc");
    }
}
