// src/pipeline/group.rs

use crate::models::{CategoryMap, FeedRecord};

/// Group records by their category text.
///
/// Keys are taken verbatim, so `""` is a valid category. Each record lands in
/// exactly one group and groups keep discovery order.
pub fn group_by_category(records: &[FeedRecord]) -> CategoryMap {
    let mut groups = CategoryMap::new();
    for record in records {
        groups
            .entry(record.category.clone())
            .or_default()
            .push(record.clone());
    }
    groups
}
