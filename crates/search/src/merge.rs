//! Search result merge engine.
//!
//! Merge rules:
//! 1. Items are grouped by `type-normalizedTitle-year`.
//! 2. The first item of a group is the base entry; output keeps first-seen order.
//! 3. Later duplicates add their sources, add provider IDs the entry does not
//!    have yet, and fill optional fields that are still empty. Populated
//!    fields are never overwritten.

use std::collections::HashMap;

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::SearchItem;

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]").unwrap());

/// Lowercase, then drop whitespace and everything that is not a letter or digit.
pub fn normalize(value: &str) -> String {
    let lowered: String = value
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    NON_WORD_RE.replace_all(&lowered, "").into_owned()
}

pub fn merge_key(item: &SearchItem) -> String {
    format!(
        "{}-{}-{}",
        item.media_type,
        normalize(&item.title),
        item.year.map(|y| y.to_string()).unwrap_or_default()
    )
}

/// Collapse duplicates across providers into one entry per merge key.
pub fn merge_results(items: Vec<SearchItem>) -> Vec<SearchItem> {
    let input_len = items.len();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<SearchItem> = Vec::with_capacity(items.len());

    for item in items {
        let key = merge_key(&item);
        let Some(&pos) = index.get(&key) else {
            index.insert(key, merged.len());
            merged.push(item);
            continue;
        };
        absorb(&mut merged[pos], item);
    }

    if merged.len() != input_len {
        debug!(input = input_len, output = merged.len(), "merged duplicate search results");
    }
    merged
}

fn absorb(existing: &mut SearchItem, item: SearchItem) {
    for source in item.sources {
        if !existing.sources.contains(&source) {
            existing.sources.push(source);
        }
    }
    for (source, id) in item.source_ids {
        existing.source_ids.entry(source).or_insert(id);
    }

    macro_rules! fill_field {
        ($field:ident) => {
            if existing.$field.is_none() && item.$field.is_some() {
                existing.$field = item.$field;
            }
        };
    }

    fill_field!(cover_url);
    fill_field!(summary);
    fill_field!(original_title);
    fill_field!(year);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Source;
    use enjoyrecord_core::MediaType;

    fn item(source: Source, id: &str, title: &str, year: Option<i32>) -> SearchItem {
        let mut it = SearchItem::new(source, id, MediaType::Film, title);
        it.year = year;
        it
    }

    #[test]
    fn normalize_ignores_case_space_and_punctuation() {
        assert_eq!(normalize("Harry Potter!"), normalize("harry potter"));
        assert_eq!(normalize("Harry Potter!"), "harrypotter");
        assert_eq!(normalize("三体：黑暗森林"), "三体黑暗森林");
        assert_eq!(normalize("Ｆｕｌｌ　Width"), "ｆｕｌｌwidth");
    }

    #[test]
    fn same_key_merges_and_unions_sources() {
        let a = item(Source::Tmdb, "603", "The Matrix", Some(1999));
        let b = item(Source::Omdb, "tt0133093", "the matrix", Some(1999));
        assert_eq!(merge_key(&a), merge_key(&b));

        let out = merge_results(vec![a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sources, vec![Source::Tmdb, Source::Omdb]);
        assert_eq!(out[0].source_ids[&Source::Tmdb], "603");
        assert_eq!(out[0].source_ids[&Source::Omdb], "tt0133093");
        assert_eq!(out[0].title, "The Matrix");
    }

    #[test]
    fn different_years_stay_separate_in_first_seen_order() {
        let out = merge_results(vec![
            item(Source::Tmdb, "1", "Dune", Some(2021)),
            item(Source::Tmdb, "2", "Dune", Some(1984)),
            item(Source::Omdb, "tt1", "Dune", Some(2021)),
            item(Source::Omdb, "tt2", "Dune", None),
        ]);
        let years: Vec<_> = out.iter().map(|i| i.year).collect();
        assert_eq!(years, vec![Some(2021), Some(1984), None]);
        assert_eq!(out[0].sources, vec![Source::Tmdb, Source::Omdb]);
    }

    #[test]
    fn absent_fields_are_filled_from_later_duplicates() {
        let first = item(Source::Tmdb, "1", "X", None);
        let mut second = item(Source::Omdb, "2", "X", None);
        second.cover_url = Some("http://a".into());
        second.summary = Some("summary".into());

        let out = merge_results(vec![first, second]);
        assert_eq!(out[0].cover_url.as_deref(), Some("http://a"));
        assert_eq!(out[0].summary.as_deref(), Some("summary"));
    }

    #[test]
    fn first_populated_field_wins() {
        let mut first = item(Source::Tmdb, "1", "X", None);
        first.cover_url = Some("http://a".into());
        let mut second = item(Source::Omdb, "2", "X", None);
        second.cover_url = Some("http://b".into());
        second.original_title = Some("Original".into());

        let out = merge_results(vec![first, second]);
        assert_eq!(out[0].cover_url.as_deref(), Some("http://a"));
        assert_eq!(out[0].original_title.as_deref(), Some("Original"));
    }

    #[test]
    fn first_seen_source_id_wins_for_same_provider() {
        let a = item(Source::Tmdb, "first", "X", None);
        let b = item(Source::Tmdb, "second", "X", None);
        let out = merge_results(vec![a, b]);
        assert_eq!(out[0].sources, vec![Source::Tmdb]);
        assert_eq!(out[0].source_ids[&Source::Tmdb], "first");
    }

    #[test]
    fn type_is_part_of_the_key() {
        let film = item(Source::Tmdb, "1", "Fargo", Some(1996));
        let mut series = item(Source::Tmdb, "2", "Fargo", Some(1996));
        series.media_type = MediaType::Series;
        assert_eq!(merge_results(vec![film, series]).len(), 2);
    }

    #[test]
    fn merging_is_idempotent() {
        let mut with_cover = item(Source::Omdb, "tt", "Alien", Some(1979));
        with_cover.cover_url = Some("https://c".into());
        let input = vec![
            item(Source::Tmdb, "348", "Alien", Some(1979)),
            with_cover,
            item(Source::Tmdb, "679", "Aliens", Some(1986)),
        ];
        let once = merge_results(input);
        let twice = merge_results(once.clone());
        assert_eq!(once, twice);
    }
}
