/// Turn the source text of a string literal into a cleaned docstring.
///
/// Returns `None` for f-strings, byte strings, malformed literals and blank docstrings.
pub(crate) fn docstring_from_literal(literal: &str) -> Option<String> {
    let body = literal_body(literal)?;
    let cleaned = clean_docstring(&body);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Contents of a plain string literal with quotes, prefix and escapes processed.
pub(crate) fn literal_body(literal: &str) -> Option<String> {
    let literal = literal.trim();
    let prefix_len = literal
        .find(|c: char| c == '"' || c == '\'')
        .unwrap_or(literal.len());
    let prefix = literal[..prefix_len].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') || prefix.len() > 2 {
        return None;
    }
    let raw = prefix.contains('r');
    let quoted = &literal[prefix_len..];

    let quote = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|q| quoted.starts_with(q) && quoted.ends_with(q) && quoted.len() >= 2 * q.len())?;
    let inner = &quoted[quote.len()..quoted.len() - quote.len()];

    Some(if raw {
        inner.to_string()
    } else {
        unescape(inner)
    })
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            // line continuation
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Docstring cleaning as done by Python's `inspect.cleandoc`: the first line is
/// left-trimmed, the common indentation of the remaining lines is removed, and
/// leading/trailing blank lines are dropped.
pub(crate) fn clean_docstring(text: &str) -> String {
    let expanded = text.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    let margin = lines[1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indentation(line))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    cleaned.push(lines[0].trim_start().to_string());
    for line in &lines[1..] {
        cleaned.push(dedent(line, margin).trim_end().to_string());
    }

    while cleaned.last().is_some_and(|line| line.trim().is_empty()) {
        cleaned.pop();
    }
    let leading_blank = cleaned
        .iter()
        .take_while(|line| line.trim().is_empty())
        .count();

    cleaned[leading_blank..].join("\n")
}

/// Leading whitespace, counted in characters.
fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// `line` without its first `margin` characters.
fn dedent(line: &str, margin: usize) -> &str {
    match line.char_indices().nth(margin) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}
