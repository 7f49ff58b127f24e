use peek_protocol::{PaginationInfo, NO_CONTENT_PLACEHOLDER};

/// One page of a paginated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub content: String,
    pub info: PaginationInfo,
}

/// Cut `text` into pages of `page_size` lines and return the requested one.
///
/// Out-of-range page numbers are clamped to the last page; a page size of zero is
/// treated as one line per page. Calling this twice with the same arguments yields
/// the same page.
pub fn paginate(text: &str, page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);

    if text.is_empty() {
        return Page {
            content: NO_CONTENT_PLACEHOLDER.to_string(),
            info: PaginationInfo::single_page(page_size, 0),
        };
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let total_lines = lines.len();
    let total_pages = total_lines.div_ceil(page_size);
    let page = page.min(total_pages - 1);

    let start = page * page_size;
    let end = (start + page_size).min(total_lines);

    Page {
        content: lines[start..end].join("\n"),
        info: PaginationInfo {
            page,
            page_size,
            total_pages,
            total_lines,
            has_next: page + 1 < total_pages,
            has_prev: page > 0,
            lines_range: format!("{}-{end} of {total_lines}", start + 1),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbered(count: usize) -> String {
        (1..=count)
            .map(|n| format!("line {n}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn middle_page() {
        let page = paginate(&numbered(45), 1, 20);
        assert_eq!(page.content.lines().next(), Some("line 21"));
        assert_eq!(page.content.lines().count(), 20);
        assert_eq!(page.info.total_pages, 3);
        assert_eq!(page.info.lines_range, "21-40 of 45");
        assert!(page.info.has_next && page.info.has_prev);
    }

    #[test]
    fn exact_fit_is_single_page() {
        let page = paginate(&numbered(20), 0, 20);
        assert_eq!(page.info.total_pages, 1);
        assert!(!page.info.has_next);
        assert!(!page.info.has_prev);
        assert_eq!(page.info.lines_range, "1-20 of 20");
    }

    #[test]
    fn page_is_clamped() {
        let page = paginate(&numbered(45), 99, 20);
        assert_eq!(page.info.page, 2);
        assert_eq!(page.content, "line 41\nline 42\nline 43\nline 44\nline 45");
        assert!(!page.info.has_next);
    }

    #[test]
    fn empty_text() {
        let page = paginate("", 3, 20);
        assert_eq!(page.content, "(No docstring available)");
        assert_eq!(page.info.total_pages, 1);
        assert!(!page.info.has_next && !page.info.has_prev);
    }

    #[test]
    fn zero_page_size_means_one_line() {
        let page = paginate("a\nb\nc", 1, 0);
        assert_eq!(page.content, "b");
        assert_eq!(page.info.page_size, 1);
        assert_eq!(page.info.total_pages, 3);
    }

    #[test]
    fn pagination_is_idempotent() {
        let text = numbered(33);
        assert_eq!(paginate(&text, 1, 10), paginate(&text, 1, 10));
    }
}
