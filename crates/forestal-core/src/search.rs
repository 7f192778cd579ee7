//! Autocomplete ranking over the prebuilt product search index.
//!
//! The index is a flat list of [`SearchEntry`] values built once at site
//! generation time by [`build_search_index`]. Queries are scored in a single
//! linear pass. No index structure is needed at catalog scale (tens to low
//! hundreds of entries).
//!
//! # Scoring Algorithm
//!
//! 1. Normalize the trimmed query with [`normalize`]. Empty → no results.
//! 2. Name prefix match scores `3`, otherwise a name substring match scores `2`.
//! 3. Only when the name did not match, the first keyword containing the
//!    query scores `1`. Further keyword hits add nothing.
//! 4. Drop entries scoring `0`.
//! 5. Sort by score (desc), then priority (desc). Remaining ties keep index order.
//! 6. Truncate to `max_results`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::models::ProductRecord;
use crate::normalize::{normalize, strip_diacritics};

/// Result cap used by the header autocomplete.
pub const DEFAULT_MAX_RESULTS: usize = 6;

/// Highest author-assigned priority.
pub const MAX_PRIORITY: u8 = 10;

/// One autocomplete target. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub handler: String,
    pub name: String,
    /// `normalize(name)`, computed at build time.
    pub name_lower: String,
    pub catalog: String,
    pub catalog_slug: String,
    pub image_url: String,
    pub url: String,
    /// Botanical and common names, pre-normalized.
    pub keywords: Vec<String>,
    /// 0–10. Higher appears first when scores tie.
    pub priority: u8,
}

/// An entry paired with the score it earned for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry<'a> {
    pub entry: &'a SearchEntry,
    pub score: u8,
}

/// Score a single entry against an already-normalized query.
///
/// Returns `0` when nothing matches.
pub fn score_entry(entry: &SearchEntry, query: &str) -> u8 {
    if entry.name_lower.starts_with(query) {
        3
    } else if entry.name_lower.contains(query) {
        2
    } else if entry.keywords.iter().any(|kw| kw.contains(query)) {
        1
    } else {
        0
    }
}

/// Score every entry against `raw_query` and return the ranked matches with
/// their scores, capped at `max_results`.
pub fn rank<'a>(entries: &'a [SearchEntry], raw_query: &str, max_results: usize) -> Vec<ScoredEntry<'a>> {
    let query = normalize(raw_query.trim());
    if query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredEntry<'a>> = entries
        .iter()
        .filter_map(|entry| match score_entry(entry, &query) {
            0 => None,
            score => Some(ScoredEntry { entry, score }),
        })
        .collect();

    // `sort_by` is stable, so equal score + priority keeps index order.
    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.entry.priority.cmp(&a.entry.priority))
    });

    scored.truncate(max_results);
    scored
}

/// Rank `entries` against `raw_query` and return up to `max_results` entries.
///
/// Never fails: empty or whitespace-only queries yield an empty list.
pub fn score_and_filter<'a>(
    entries: &'a [SearchEntry],
    raw_query: &str,
    max_results: usize,
) -> Vec<&'a SearchEntry> {
    rank(entries, raw_query, max_results)
        .into_iter()
        .map(|s| s.entry)
        .collect()
}

/// Build the search index from product records.
///
/// Keywords are the botanical name followed by each common name, normalized,
/// with blanks dropped. Priority is clamped to [`MAX_PRIORITY`].
pub fn build_search_index(products: &[ProductRecord]) -> Vec<SearchEntry> {
    products
        .iter()
        .map(|p| {
            let keywords = p
                .botanical_name
                .iter()
                .chain(p.common_names.iter())
                .map(|k| normalize(k.trim()))
                .filter(|k| !k.is_empty())
                .collect();

            SearchEntry {
                handler: p.handler.clone(),
                name: p.name.clone(),
                name_lower: normalize(&p.name),
                catalog: p.catalog.clone(),
                catalog_slug: p.catalog_slug.clone(),
                image_url: p.media.image.url.clone(),
                url: p.path(),
                keywords,
                priority: p.priority.min(MAX_PRIORITY),
            }
        })
        .collect()
}

/// Locate the query inside a display name for bolding.
///
/// Matching happens on folded text, but the returned byte range indexes the
/// original `name` and always falls on `char` boundaries, so accented names
/// highlight correctly (`"Bataná"` matched by `"batana"` covers all of
/// `"Bataná"`).
pub fn highlight_match(name: &str, raw_query: &str) -> Option<Range<usize>> {
    let query = normalize(raw_query.trim());
    if query.is_empty() {
        return None;
    }

    // Lowercase the whole name once so context-dependent mappings (final
    // sigma) agree with the index. Each char still lowercases to the same
    // number of chars as `char::to_lowercase`, which keeps the walk aligned.
    let lowered = name.to_lowercase();
    let mut lowered_chars = lowered.chars();

    // (folded_start, folded_end, original_start, original_end) per char
    let mut folded = String::with_capacity(name.len());
    let mut spans = Vec::with_capacity(name.len());
    let mut chunk = String::new();
    for (i, ch) in name.char_indices() {
        chunk.clear();
        chunk.extend(lowered_chars.by_ref().take(ch.to_lowercase().count()));
        let start = folded.len();
        folded.push_str(&strip_diacritics(&chunk));
        spans.push((start, folded.len(), i, i + ch.len_utf8()));
    }

    let at = folded.find(&query)?;
    let end = at + query.len();
    let first = spans.iter().find(|s| s.1 > at)?;
    let mut last = spans.iter().rposition(|s| s.0 < end)?;
    // Combining marks after the match fold to nothing but belong to it.
    while spans.get(last + 1).is_some_and(|s| s.0 == s.1) {
        last += 1;
    }
    Some(first.2..spans[last].3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(handler: &str, name: &str, keywords: &[&str], priority: u8) -> SearchEntry {
        SearchEntry {
            handler: handler.to_string(),
            name: name.to_string(),
            name_lower: normalize(name),
            catalog: "Catalog".to_string(),
            catalog_slug: "catalog".to_string(),
            image_url: format!("https://cdn.forestal-mt.com/products/productGroup/{handler}.png"),
            url: format!("/products/{handler}/"),
            keywords: keywords.iter().map(|k| normalize(k)).collect(),
            priority,
        }
    }

    fn mock_entries() -> Vec<SearchEntry> {
        vec![
            entry("raw-batana-oil", "Raw Batana Oil", &["elaeis oleifera", "ojon oil"], 10),
            entry(
                "stingless-bee-honey",
                "Stingless Bee Honey",
                &["jimerito", "meliponini honey"],
                8,
            ),
            entry(
                "amaranth-greens",
                "Amaranth Greens",
                &["amaranthus spp", "bledo", "quelite"],
                2,
            ),
        ]
    }

    fn handlers(results: &[&SearchEntry]) -> Vec<String> {
        results.iter().map(|e| e.handler.clone()).collect()
    }

    #[test]
    fn empty_query_returns_nothing() {
        assert!(score_and_filter(&mock_entries(), "", DEFAULT_MAX_RESULTS).is_empty());
    }

    #[test]
    fn whitespace_query_returns_nothing() {
        assert!(score_and_filter(&mock_entries(), "   ", DEFAULT_MAX_RESULTS).is_empty());
    }

    #[test]
    fn matches_by_name() {
        let entries = mock_entries();
        let results = score_and_filter(&entries, "batana", DEFAULT_MAX_RESULTS);
        assert!(handlers(&results).contains(&"raw-batana-oil".to_string()));
    }

    #[test]
    fn matches_by_keyword() {
        let entries = mock_entries();
        let results = score_and_filter(&entries, "jimerito", DEFAULT_MAX_RESULTS);
        assert_eq!(handlers(&results), vec!["stingless-bee-honey"]);
    }

    #[test]
    fn prefix_match_ranks_first() {
        let entries = mock_entries();
        let results = score_and_filter(&entries, "raw", DEFAULT_MAX_RESULTS);
        assert_eq!(results[0].handler, "raw-batana-oil");
    }

    #[test]
    fn name_match_outranks_keyword_only_match() {
        let entries = vec![
            entry("honey-keyword", "Forest Resin", &["wild honey"], 10),
            entry("honey-name", "Stingless Bee Honey", &["honey"], 1),
        ];
        let ranked = rank(&entries, "honey", DEFAULT_MAX_RESULTS);
        assert_eq!(ranked[0].entry.handler, "honey-name");
        assert_eq!(ranked[0].score, 2);
        assert_eq!(ranked[1].entry.handler, "honey-keyword");
        assert_eq!(ranked[1].score, 1);
    }

    #[test]
    fn keyword_bonus_does_not_stack_on_name_match() {
        let e = entry("h", "Honey Jar", &["honey", "raw honey"], 0);
        assert_eq!(score_entry(&e, "honey"), 3);
        let e = entry("h", "Bee Honey", &["honey", "raw honey"], 0);
        assert_eq!(score_entry(&e, "honey"), 2);
    }

    #[test]
    fn multiple_keyword_hits_score_once() {
        let e = entry("h", "Jar", &["honey", "raw honey", "honeycomb"], 0);
        assert_eq!(score_entry(&e, "honey"), 1);
    }

    #[test]
    fn ties_break_by_priority_desc() {
        let entries = vec![
            entry("low", "Honey Low", &[], 2),
            entry("high", "Honey High", &[], 9),
            entry("mid", "Honey Mid", &[], 5),
        ];
        let results = score_and_filter(&entries, "honey", DEFAULT_MAX_RESULTS);
        assert_eq!(handlers(&results), vec!["high", "mid", "low"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let entries = vec![
            entry("first", "Oil One", &[], 5),
            entry("second", "Oil Two", &[], 5),
            entry("third", "Oil Three", &[], 5),
        ];
        let results = score_and_filter(&entries, "oil", DEFAULT_MAX_RESULTS);
        assert_eq!(handlers(&results), vec!["first", "second", "third"]);
    }

    #[test]
    fn respects_max_results() {
        let entries = mock_entries();
        let results = score_and_filter(&entries, "a", 2);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn case_and_diacritic_insensitive_query() {
        let entries = mock_entries();
        assert_eq!(score_and_filter(&entries, "HONEY", DEFAULT_MAX_RESULTS).len(), 1);
        assert_eq!(score_and_filter(&entries, "honey", DEFAULT_MAX_RESULTS).len(), 1);
        assert_eq!(
            handlers(&score_and_filter(&entries, "  Bataná ", DEFAULT_MAX_RESULTS)),
            vec!["raw-batana-oil"]
        );
    }

    #[test]
    fn no_match_returns_nothing() {
        assert!(score_and_filter(&mock_entries(), "xyz-no-match", DEFAULT_MAX_RESULTS).is_empty());
    }

    #[test]
    fn results_keep_all_fields() {
        let entries = mock_entries();
        let results = score_and_filter(&entries, "batana", DEFAULT_MAX_RESULTS);
        let hit = results.iter().find(|e| e.handler == "raw-batana-oil").unwrap();
        assert_eq!(hit.url, "/products/raw-batana-oil/");
        assert!(hit.image_url.contains("cdn.forestal-mt.com"));
    }

    #[test]
    fn entry_serializes_camel_case() {
        let json = serde_json::to_value(entry("h", "Name", &[], 1)).unwrap();
        assert!(json.get("nameLower").is_some());
        assert!(json.get("catalogSlug").is_some());
        assert!(json.get("imageUrl").is_some());
    }

    #[test]
    fn index_normalizes_names_and_keywords() {
        let mut p = crate::models::fixtures::product(
            "jalapeno-pepper",
            "Jalapeño Pepper",
            "traditional-herbs",
            &[5.0],
        );
        p.botanical_name = Some("Capsicum Annuum".to_string());
        p.common_names = vec!["Chile Jalapeño".to_string(), "  ".to_string()];
        p.priority = 42;

        let index = build_search_index(&[p]);
        assert_eq!(index.len(), 1);
        let e = &index[0];
        assert_eq!(e.name, "Jalapeño Pepper");
        assert_eq!(e.name_lower, "jalapeno pepper");
        assert_eq!(e.keywords, vec!["capsicum annuum", "chile jalapeno"]);
        assert_eq!(e.url, "/products/jalapeno-pepper/");
        assert_eq!(e.catalog_slug, "traditional-herbs");
        assert_eq!(e.priority, MAX_PRIORITY);
    }

    #[test]
    fn highlight_maps_back_to_original_bytes() {
        let name = "Bataná Oil";
        let range = highlight_match(name, "batana").unwrap();
        assert_eq!(&name[range], "Bataná");

        let name = "Raw Batana Oil";
        let range = highlight_match(name, "  OIL").unwrap();
        assert_eq!(&name[range], "Oil");
    }

    #[test]
    fn highlight_agrees_with_index_on_final_sigma() {
        let name = "ΟΔΟΣ Honey";
        assert!(normalize(name).contains("οδος"));
        let range = highlight_match(name, "οδος").unwrap();
        assert_eq!(&name[range], "ΟΔΟΣ");
    }

    #[test]
    fn highlight_keeps_trailing_combining_mark() {
        let name = "Cafe\u{301} Latte";
        let range = highlight_match(name, "cafe").unwrap();
        assert_eq!(&name[range], "Cafe\u{301}");

        let range = highlight_match(name, "latte").unwrap();
        assert_eq!(&name[range], "Latte");
    }

    #[test]
    fn highlight_none_for_empty_or_missing() {
        assert_eq!(highlight_match("Raw Batana Oil", "   "), None);
        assert_eq!(highlight_match("Raw Batana Oil", "honey"), None);
    }
}
