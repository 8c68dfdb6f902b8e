//! List queries.

use crate::name::{ResourcePath, WILDCARD};
use crate::types::ListOptions;

/// A scoped, paged listing of one entity type.
///
/// `ancestors[i]` constrains the i-th ancestor ID of each row; `None` matches
/// any ancestor. Rows are ordered by ancestor IDs then resource ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub ancestors: Vec<Option<String>>,
    pub page_size: u32,
    pub offset: u64,
}

impl ListQuery {
    /// Lists top-level entities.
    pub fn root(options: &ListOptions) -> Self {
        Self {
            ancestors: Vec::new(),
            page_size: options.page_size,
            offset: options.offset(),
        }
    }

    /// Lists the children of `parent`. Wildcard IDs in the parent match any ancestor.
    pub fn children_of(parent: &ResourcePath, options: &ListOptions) -> Self {
        let ancestors = parent
            .ids()
            .map(|id| (id != WILDCARD).then(|| id.to_string()))
            .collect();
        Self {
            ancestors,
            page_size: options.page_size,
            offset: options.offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::{LOCATION_COLLECTIONS, ParseOptions};
    use crate::types::PageInfo;

    #[test]
    fn test_children_of_maps_wildcards() {
        let parent = ResourcePath::parse(
            "accounts/-/locations/hq01",
            LOCATION_COLLECTIONS,
            ParseOptions::allow_wildcard(),
        )
        .unwrap();
        let options = ListOptions::new(
            10,
            PageInfo {
                end_cursor: 20,
                ..PageInfo::default()
            },
        );

        let query = ListQuery::children_of(&parent, &options);
        assert_eq!(query.ancestors, vec![None, Some("hq01".to_string())]);
        assert_eq!(query.page_size, 10);
        assert_eq!(query.offset, 20);
    }

    #[test]
    fn test_root_has_no_ancestors() {
        let query = ListQuery::root(&ListOptions::new(5, PageInfo::default()));
        assert!(query.ancestors.is_empty());
        assert_eq!(query.offset, 0);
    }
}
