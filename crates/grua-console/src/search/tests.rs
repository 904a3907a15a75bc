use crate::config::PatternMode;
use crate::models::{ActivationState, RecordId, SearchableRecord};

use super::{DATASET_CERTNAME, DATASET_CLASSES, LabelFragment, Matcher, SearchIndex};

fn web_classes() -> Vec<SearchableRecord> {
    vec![
        SearchableRecord::new("1", "apache"),
        SearchableRecord::new("2", "nginx"),
    ]
}

fn ids(suggestions: &[super::Suggestion]) -> Vec<&str> {
    suggestions
        .iter()
        .map(|suggestion| suggestion.record_id.as_str())
        .collect()
}

#[test]
fn query_on_unknown_key_is_empty() {
    let index = SearchIndex::new();
    assert!(index.query("classes").is_empty());
    assert!(!index.contains_key("classes"));
}

#[test]
fn load_replaces_records_and_drops_duplicate_ids() {
    let mut index = SearchIndex::new();
    index.load(DATASET_CLASSES, web_classes());
    index.load(
        DATASET_CLASSES,
        vec![
            SearchableRecord::new("7", "ntp"),
            SearchableRecord::new("7", "ntp-duplicate"),
        ],
    );
    let records = index.query(DATASET_CLASSES);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "ntp");
}

#[test]
fn set_state_is_a_silent_noop_for_missing_ids() {
    let mut index = SearchIndex::new();
    assert!(!index.set_state("classes", &RecordId::new("1"), ActivationState::Disabled));

    index.load(DATASET_CLASSES, web_classes());
    assert!(!index.set_state(DATASET_CLASSES, &RecordId::new("99"), ActivationState::Disabled));
    assert!(index.set_state(DATASET_CLASSES, &RecordId::new("2"), ActivationState::Disabled));
    assert!(!index.set_state(DATASET_CLASSES, &RecordId::new("2"), ActivationState::Disabled));
    assert_eq!(index.query(DATASET_CLASSES)[1].state, ActivationState::Disabled);
    assert_eq!(index.query(DATASET_CLASSES).len(), 2);
}

#[test]
fn set_state_by_field_matches_on_certname() {
    let mut index = SearchIndex::new();
    index.load(
        DATASET_CERTNAME,
        vec![
            SearchableRecord::new("a", "web01").with_field("certname", "web01"),
            SearchableRecord::new("b", "db01").with_field("certname", "db01"),
        ],
    );
    assert_eq!(
        index.set_state_by_field(DATASET_CERTNAME, "certname", "db01", ActivationState::Disabled),
        1
    );
    assert_eq!(
        index.set_state_by_field(DATASET_CERTNAME, "certname", "nope", ActivationState::Disabled),
        0
    );
    assert!(!index.query(DATASET_CERTNAME)[1].is_enabled());
}

#[test]
fn scenario_query_ng_highlights_nginx_only() {
    let matcher = Matcher::default();
    let result = matcher.filter("ng", &web_classes(), "name").expect("filter");
    assert_eq!(ids(&result), vec!["2"]);
    assert_eq!(result[0].render_marked(), "<hl>ng</hl>inx");
    assert_eq!(result[0].label, "nginx");
}

#[test]
fn empty_query_returns_every_enabled_record_in_order() {
    let mut records = web_classes();
    records.push(SearchableRecord::new("3", "haproxy"));
    records[1].state = ActivationState::Disabled;

    let result = Matcher::default().filter("", &records, "name").expect("filter");
    assert_eq!(ids(&result), vec!["1", "3"]);
    assert_eq!(
        result[0].fragments,
        vec![LabelFragment::Plain("apache".to_string())]
    );
}

#[test]
fn matching_is_case_insensitive_and_keeps_label_casing() {
    let records = vec![SearchableRecord::new("1", "Nginx-Proxy")];
    let result = Matcher::default().filter("NGINX", &records, "name").expect("filter");
    assert_eq!(result[0].render_marked(), "<hl>Nginx</hl>-Proxy");
}

#[test]
fn highlight_shows_the_matched_label_text_not_the_query() {
    let records = vec![SearchableRecord::new("1", "NGINX-edge")];
    let result = Matcher::new(PatternMode::Raw)
        .filter("ng.n", &records, "name")
        .expect("filter");
    assert_eq!(
        result[0].fragments,
        vec![
            LabelFragment::Highlight("NGIN".to_string()),
            LabelFragment::Plain("X-edge".to_string()),
        ]
    );
    assert_eq!(result[0].render_marked(), "<hl>NGIN</hl>X-edge");
}

#[test]
fn every_occurrence_is_highlighted() {
    let records = vec![SearchableRecord::new("1", "banana")];
    let result = Matcher::default().filter("an", &records, "name").expect("filter");
    assert_eq!(result[0].render_marked(), "b<hl>an</hl><hl>an</hl>a");
}

#[test]
fn disabled_records_never_appear_even_when_matching() {
    let mut records = web_classes();
    records[1].state = ActivationState::Disabled;
    let result = Matcher::default().filter("nginx", &records, "name").expect("filter");
    assert!(result.is_empty());
}

#[test]
fn records_without_the_search_field_are_skipped() {
    let records = vec![
        SearchableRecord::new("a", "web01").with_field("certname", "web01"),
        SearchableRecord::new("b", "orphan"),
    ];
    let result = Matcher::default().filter("", &records, "certname").expect("filter");
    assert_eq!(ids(&result), vec!["a"]);
}

#[test]
fn raw_mode_treats_query_as_a_pattern() {
    let matcher = Matcher::new(PatternMode::Raw);
    let result = matcher.filter("ng.n", &web_classes(), "name").expect("filter");
    assert_eq!(ids(&result), vec!["2"]);
    assert_eq!(result[0].render_marked(), "<hl>ngin</hl>x");

    let err = matcher.filter("(", &web_classes(), "name").expect_err("unbalanced");
    assert_eq!(err.code(), "INVALID_PATTERN");
}

#[test]
fn raw_mode_empty_width_matches_keep_record_without_markers() {
    let matcher = Matcher::new(PatternMode::Raw);
    let result = matcher.filter("z*", &web_classes(), "name").expect("filter");
    assert_eq!(ids(&result), vec!["1", "2"]);
    assert_eq!(result[0].render_marked(), "apache");
}

#[test]
fn literal_mode_escapes_metacharacters() {
    let matcher = Matcher::new(PatternMode::Literal);
    assert!(
        matcher
            .filter("ng.n", &web_classes(), "name")
            .expect("filter")
            .is_empty()
    );

    let records = vec![
        SearchableRecord::new("1", "profile::base(legacy)"),
        SearchableRecord::new("2", "profile::base"),
    ];
    let result = matcher.filter("(", &records, "name").expect("filter");
    assert_eq!(ids(&result), vec!["1"]);
    assert_eq!(result[0].render_marked(), "profile::base<hl>(</hl>legacy)");
}
