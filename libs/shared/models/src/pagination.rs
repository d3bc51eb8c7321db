use serde::Serialize;

/// List envelope returned by every collection endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// `count` is the number of matching rows before `offset`/`limit` apply.
    pub fn paginate(rows: Vec<T>, limit: Option<usize>, offset: Option<usize>) -> Self {
        let count = rows.len();
        let results = rows
            .into_iter()
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        Self { count, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_ignores_paging() {
        let page = Page::paginate((1..=10).collect(), Some(3), Some(4));

        assert_eq!(page.count, 10);
        assert_eq!(page.results, vec![5, 6, 7]);
    }

    #[test]
    fn no_paging_returns_everything() {
        let page = Page::paginate(vec!["a", "b"], None, None);

        assert_eq!(page.count, 2);
        assert_eq!(page.results.len(), 2);
    }
}
