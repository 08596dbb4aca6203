use std::collections::BTreeSet;

/// Set of type tags a caller wants to keep.
///
/// An empty filter accepts every block, including blocks with an empty type
/// tag; a non-empty filter is a strict membership test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    wanted: BTreeSet<String>,
}

impl TypeFilter {
    /// A filter that accepts all blocks.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.wanted.is_empty()
    }

    /// Whether a block with this type tag passes the filter.
    pub fn matches(&self, type_tag: &str) -> bool {
        self.wanted.is_empty() || self.wanted.contains(type_tag)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TypeFilter {
    /// Builds a filter from type tags, trimming surrounding whitespace.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            wanted: iter
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .collect(),
        }
    }
}
