use nasa_data_guide::client::cmr::{normalize_entry, select_link, CmrEntry, CmrLink};
use nasa_data_guide::client::gemini::GenerateContentResponse;
use nasa_data_guide::{Config, KeywordQuery};
use proptest::prelude::*;
use serde_json::json;

/// Property-based tests for keyword handling and response normalization
mod keyword_query_props {
    use super::*;

    proptest! {
        #[test]
        fn test_search_string_has_no_blank_tokens(
            words in prop::collection::vec(r"\s{0,2}[A-Za-z0-9]{0,8}\s{0,2}", 0..8)
        ) {
            let query = KeywordQuery::new(&words);
            let search = query.search_string();

            prop_assert_eq!(search.trim(), search.as_str());
            prop_assert!(!search.contains("  "));
            prop_assert_eq!(query.is_empty(), search.is_empty());
        }

        #[test]
        fn test_keyword_order_is_preserved(words in prop::collection::vec("[a-z]{1,8}", 1..8)) {
            let query = KeywordQuery::new(&words);
            prop_assert_eq!(query.keywords(), words.as_slice());
            prop_assert_eq!(query.search_string(), words.join(" "));
        }
    }
}

mod normalization_props {
    use super::*;

    proptest! {
        #[test]
        fn test_summary_is_always_trimmed(summary in r"\s{0,4}[ -~]{0,40}\s{0,4}") {
            let dataset = normalize_entry(CmrEntry {
                title: None,
                summary: Some(summary.clone()),
                links: None,
            });
            prop_assert_eq!(dataset.summary.as_str(), summary.trim());
            prop_assert_eq!(dataset.title.as_str(), "No Title");
        }

        #[test]
        fn test_single_doi_link_is_selected(
            others in prop::collection::vec("https://example\\.com/[a-z]{1,10}", 0..5),
            position in 0usize..5,
            suffix in "[0-9]{4}/[a-z]{1,6}",
        ) {
            let doi = format!("https://doi.org/10.{suffix}");
            let mut links: Vec<CmrLink> = others
                .into_iter()
                .map(|href| CmrLink { href: Some(href) })
                .collect();
            let position = position.min(links.len());
            links.insert(position, CmrLink { href: Some(doi.clone()) });

            prop_assert_eq!(select_link(&links), Some(doi));
        }

        #[test]
        fn test_no_doi_link_yields_none(
            others in prop::collection::vec("https://example\\.com/[a-z]{1,10}", 0..5)
        ) {
            let links: Vec<CmrLink> = others
                .into_iter()
                .map(|href| CmrLink { href: Some(href) })
                .collect();
            prop_assert_eq!(select_link(&links), None);
        }

        #[test]
        fn test_explanation_is_always_trimmed(text in r"\s{0,4}[ -~]{0,60}\s{0,4}") {
            let response: GenerateContentResponse = serde_json::from_value(json!({
                "candidates": [{"content": {"parts": [{"text": text.clone()}]}}]
            })).unwrap();
            let explanation = response.into_explanation().unwrap();
            prop_assert_eq!(explanation.trim(), explanation.as_str());
            prop_assert_eq!(explanation.as_str(), text.trim());
        }
    }
}

mod config_validation_props {
    use super::*;

    proptest! {
        #[test]
        fn test_page_size_validation(page_size in 1u32..=2000) {
            let mut config = Config::default();
            config.dataset_search.page_size = page_size;
            prop_assert!(
                config.validate().is_ok(),
                "Valid page size should be accepted: {}",
                page_size
            );
        }

        #[test]
        fn test_oversized_page_size_rejected(page_size in 2001u32..100_000) {
            let mut config = Config::default();
            config.dataset_search.page_size = page_size;
            prop_assert!(config.validate().is_err());
        }
    }
}
