pub const PAGE_SIZE: usize = 10;

/// Rows that take part in the client-side search box.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

pub fn matches_term(fields: &[&str], term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter_rows<'a, T, F>(rows: &'a [T], term: &str, keep: F) -> Vec<&'a T>
where
    T: Searchable,
    F: Fn(&T) -> bool,
{
    rows.iter()
        .filter(|row| keep(row) && matches_term(&row.search_fields(), term))
        .collect()
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    (len + page_size - 1) / page_size
}

/// One-based page slice; out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// Keeps the current page valid after the underlying rows shrink.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(len, page_size).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Row {
        name: String,
        email: String,
        active: bool,
    }

    impl Searchable for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str(), self.email.as_str()]
        }
    }

    fn rows() -> Vec<Row> {
        [
            ("PT Sumber Air", "admin@sumberair.co.id", true),
            ("CV Maju Jaya", "maju@jaya.id", true),
            ("Koperasi Tirta", "tirta@example.com", false),
            ("PDAM Kota", "info@pdamkota.go.id", true),
        ]
        .into_iter()
        .map(|(name, email, active)| Row {
            name: name.to_string(),
            email: email.to_string(),
            active,
        })
        .collect()
    }

    #[rstest]
    #[case("air")]
    #[case("JAYA")]
    #[case("go.id")]
    #[case("tirta")]
    fn every_match_contains_term(#[case] term: &str) {
        let data = rows();
        let found = filter_rows(&data, term, |_| true);
        assert!(!found.is_empty());
        let needle = term.to_lowercase();
        for row in found {
            assert!(row
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle)));
        }
    }

    #[test]
    fn empty_term_keeps_everything() {
        let data = rows();
        assert_eq!(filter_rows(&data, "", |_| true).len(), data.len());
        assert_eq!(filter_rows(&data, "   ", |_| true).len(), data.len());
    }

    #[test]
    fn predicate_is_applied_with_term() {
        let data = rows();
        let found = filter_rows(&data, "tirta", |row| row.active);
        assert!(found.is_empty());
        assert_eq!(filter_rows(&data, "", |row| row.active).len(), 3);
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 7, 4)]
    fn counts_pages(#[case] len: usize, #[case] size: usize, #[case] expected: usize) {
        assert_eq!(page_count(len, size), expected);
    }

    #[rstest]
    #[case(0, 10)]
    #[case(1, 10)]
    #[case(23, 10)]
    #[case(30, 10)]
    #[case(17, 4)]
    fn pages_cover_everything_once(#[case] len: usize, #[case] size: usize) {
        let items: Vec<usize> = (0..len).collect();
        let mut seen = Vec::new();
        for page in 1..=page_count(len, size) {
            let slice = paginate(&items, size, page);
            assert!(slice.len() <= size);
            assert!(!slice.is_empty());
            seen.extend_from_slice(slice);
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 10, 0).is_empty());
        assert!(paginate(&items, 10, 2).is_empty());
        assert!(paginate(&items, 0, 1).is_empty());
    }

    #[test]
    fn clamps_current_page() {
        assert_eq!(clamp_page(5, 12, 10), 2);
        assert_eq!(clamp_page(0, 12, 10), 1);
        assert_eq!(clamp_page(3, 0, 10), 1);
    }
}
