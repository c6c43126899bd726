use crate::dto::prelude::*;

///
/// PageRequest
///
/// Cursor pagination over newest-first listings. `start` is inclusive; `None`
/// starts at the newest entry.
///

#[derive(CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PageRequest {
    pub start: Option<u64>,
    pub size: u64,
}

impl PageRequest {
    #[must_use]
    pub const fn first(size: u64) -> Self {
        Self { start: None, size }
    }
}

///
/// Page
/// Generic pagination envelope
///

#[derive(CandidType, Clone, Debug, Deserialize, Serialize)]
pub struct Page<T> {
    pub entries: Vec<(u64, T)>,
    pub next_cursor: Option<u64>,
}

impl<T> Page<T> {
    /// Wrap a newest-first slice. A full page whose last id is above zero
    /// may have older entries behind it.
    #[must_use]
    pub fn from_desc(entries: Vec<(u64, T)>, request: PageRequest) -> Self {
        let full = request.size > 0 && entries.len() as u64 >= request.size;
        let next_cursor = match entries.last() {
            Some((id, _)) if full && *id > 0 => Some(id - 1),
            _ => None,
        };

        Self {
            entries,
            next_cursor,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_page_exposes_next_cursor() {
        let page = Page::from_desc(vec![(5, ()), (4, ())], PageRequest::first(2));

        assert_eq!(page.next_cursor, Some(3));
    }

    #[test]
    fn short_page_is_last() {
        let page = Page::from_desc(vec![(1, ())], PageRequest::first(2));

        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn page_ending_at_zero_is_last() {
        let page = Page::from_desc(vec![(1, ()), (0, ())], PageRequest::first(2));

        assert_eq!(page.next_cursor, None);
        assert_eq!(page.len(), 2);
    }
}
