//! Meter-level merge of catalog items into a stored bucket.
//!
//! A bucket is kept sorted by `meter_id` and holds at most one item per meter.

use crate::models::CatalogItem;

/// Replace the item with the same meter id, or insert it in meter id order
pub fn merge_item(bucket: &mut Vec<CatalogItem>, item: CatalogItem) {
    match bucket.binary_search_by(|existing| existing.meter_id.cmp(&item.meter_id)) {
        Ok(index) => bucket[index] = item,
        Err(index) => bucket.insert(index, item),
    }
}

/// Merge a batch of items; later items for the same meter win
pub fn merge_items(bucket: &mut Vec<CatalogItem>, items: impl IntoIterator<Item = CatalogItem>) {
    for item in items {
        merge_item(bucket, item);
    }
}

/// Restore the sorted, one-per-meter shape of a bucket read from an older writer
pub fn normalize(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let mut bucket = Vec::with_capacity(items.len());
    merge_items(&mut bucket, items);
    bucket
}
