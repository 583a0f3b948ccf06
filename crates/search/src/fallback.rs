use enjoyrecord_core::MediaType;

use crate::{SearchItem, Source};

/// Placeholder result for manual entry when no catalog produced anything.
///
/// Never touches the network. The manual ID is the current Unix time in
/// milliseconds; it only needs to be unique within one page of results.
pub fn basic_search(media_type: MediaType, query: &str) -> Vec<SearchItem> {
    let manual_id = chrono::Utc::now().timestamp_millis().to_string();
    let mut item = SearchItem::new(Source::Manual, manual_id, media_type, query);
    item.summary = Some(format!("请手动编辑{}信息", media_type.label_zh()));
    vec![item]
}
