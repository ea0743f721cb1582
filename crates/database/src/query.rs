//! Shared pieces of the invoice and customer queries: the free-text search
//! pattern and pagination arithmetic.

/// Rows per page of the invoices table.
pub const ITEMS_PER_PAGE: i64 = 6;

/// Rows shown in the "latest invoices" card.
pub const LATEST_INVOICES_LIMIT: i64 = 5;

/// The WHERE clause shared by the filtered invoice list and its page count.
/// `$1` is the pattern produced by [`search_pattern`].
macro_rules! invoice_search_filter {
    () => {
        r#"
        WHERE
            customers.name ILIKE $1 OR
            customers.email ILIKE $1 OR
            invoices.amount::text ILIKE $1 OR
            invoices.date::text ILIKE $1 OR
            invoices.status ILIKE $1
        "#
    };
}
pub(crate) use invoice_search_filter;

/// Turns a free-text query into an ILIKE substring pattern. LIKE wildcards in
/// the query are escaped so they match literally.
pub fn search_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Row offset of a 1-based page. Pages below 1 are treated as page 1.
pub fn page_offset(page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(ITEMS_PER_PAGE)
}

/// Number of pages needed to show `count` rows.
pub fn total_pages(count: i64) -> i64 {
    if count <= 0 {
        return 0;
    }
    (count + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_wraps_query_in_wildcards() {
        assert_eq!(search_pattern("acme"), "%acme%");
        assert_eq!(search_pattern(""), "%%");
        assert_eq!(search_pattern("acme "), "%acme %");
    }

    #[test]
    fn pattern_escapes_like_metacharacters() {
        assert_eq!(search_pattern("50%"), "%50\\%%");
        assert_eq!(search_pattern("a_b"), "%a\\_b%");
        assert_eq!(search_pattern("c:\\"), "%c:\\\\%");
    }

    #[test]
    fn pattern_keeps_quotes_as_plain_text() {
        // Values are bound, never spliced, so quotes need no treatment.
        assert_eq!(search_pattern("o'brien"), "%o'brien%");
    }

    #[test]
    fn offsets_follow_page_size() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), 6);
        assert_eq!(page_offset(5), 24);
    }

    #[test]
    fn pages_below_one_start_at_the_top() {
        assert_eq!(page_offset(0), 0);
        assert_eq!(page_offset(-3), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(6), 1);
        assert_eq!(total_pages(7), 2);
        assert_eq!(total_pages(13), 3);
    }
}
