use peek_protocol::DocstringMetadata;

const RULE: char = '─';

/// Frame one page of docstring content with a target header and, when the
/// text spans several pages, a position footer with navigation hints.
pub fn render_page(content: &str, metadata: &DocstringMetadata) -> String {
    let mut header_parts = Vec::with_capacity(3);
    if !metadata.target.is_empty() {
        header_parts.push(format!("Docstring for: {}", metadata.target));
    }
    if let Some(kind) = metadata.kind.as_deref().filter(|k| !k.is_empty()) {
        header_parts.push(format!("Type: {kind}"));
    }
    if let Some(module) = metadata.module.as_deref().filter(|m| !m.is_empty()) {
        header_parts.push(format!("Module: {module}"));
    }
    let header = header_parts.join(" | ");

    let mut out: Vec<String> = Vec::new();
    if !header.is_empty() {
        out.push(rule(&header));
        out.push(header.clone());
        out.push(rule(&header));
        out.push(String::new());
    }

    out.push(content.to_string());

    let pagination = &metadata.pagination;
    if pagination.total_pages > 1 {
        let mut position = format!("Page {}/{}", pagination.page + 1, pagination.total_pages);
        if !pagination.lines_range.is_empty() {
            position.push_str(&format!(" (Lines {})", pagination.lines_range));
        }

        let mut hints = Vec::with_capacity(2);
        if pagination.has_prev {
            hints.push(format!(
                "Use page={} for previous page",
                pagination.page.saturating_sub(1)
            ));
        }
        if pagination.has_next {
            hints.push(format!("Use page={} for next page", pagination.page + 1));
        }

        out.push(String::new());
        out.push(rule(&position));
        out.push(position);
        if !hints.is_empty() {
            out.push(hints.join(" | "));
        }
    }

    out.join("\n")
}

fn rule(text: &str) -> String {
    std::iter::repeat(RULE).take(text.chars().count()).collect()
}
