use peek_protocol::NO_CONTENT_PLACEHOLDER;

/// Section headers recognized in Google/NumPy style docstrings
pub const SECTION_HEADERS: &[&str] = &[
    "Args:",
    "Arguments:",
    "Parameters:",
    "Returns:",
    "Return:",
    "Yields:",
    "Raises:",
    "Exceptions:",
    "Example:",
    "Examples:",
    "Note:",
    "Notes:",
    "Warning:",
    "Warnings:",
];

const PARAMETER_SECTIONS: &[&str] = &["Args", "Arguments", "Parameters"];

/// Normalize a raw docstring for display.
///
/// Line endings are unified, common indentation is removed, section headers get a
/// blank line in front of them and `name: description` lines inside argument
/// sections are re-indented. Text inside ```` ``` ```` or `:::` fences is left untouched.
pub fn format_docstring(raw: &str) -> String {
    if raw.is_empty() {
        return NO_CONTENT_PLACEHOLDER.to_string();
    }

    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines = normalize_indentation(text.split('\n').collect());

    let mut formatted: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;
    let mut section: Option<&str> = None;

    for (idx, line) in lines.into_iter().enumerate() {
        let stripped = line.trim();

        if stripped.starts_with("```") || stripped.starts_with(":::") {
            in_fence = !in_fence;
            formatted.push(line);
            continue;
        }
        if in_fence {
            formatted.push(line);
            continue;
        }

        if let Some(header) = section_header(stripped) {
            section = Some(header.trim_end_matches(':'));
            let previous_blank = formatted.last().map_or(true, |prev| prev.trim().is_empty());
            if idx > 0 && !previous_blank {
                formatted.push(String::new());
            }
            formatted.push(line);
            continue;
        }

        if section.is_some_and(|s| PARAMETER_SECTIONS.contains(&s)) {
            if let Some((name, description)) = stripped.split_once(':') {
                let name = name.trim();
                if !name.starts_with("- ") {
                    formatted.push(format!("  {name}: {}", description.trim()));
                    continue;
                }
            }
        }

        formatted.push(line);
    }

    formatted.join("\n")
}

fn section_header(stripped: &str) -> Option<&'static str> {
    SECTION_HEADERS.iter().copied().find(|header| {
        stripped == *header
            || stripped
                .strip_prefix(header)
                .is_some_and(|rest| rest.starts_with(' '))
    })
}

/// Strip the smallest leading whitespace shared by all non-blank lines.
/// Whitespace-only lines become empty.
fn normalize_indentation(lines: Vec<&str>) -> Vec<String> {
    let min_indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min();

    let Some(min_indent) = min_indent else {
        return lines.into_iter().map(str::to_string).collect();
    };

    lines
        .into_iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                line.char_indices()
                    .nth(min_indent)
                    .map_or("", |(offset, _)| &line[offset..])
                    .to_string()
            }
        })
        .collect()
}
