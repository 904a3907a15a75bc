use crate::config::PatternMode;
use crate::models::{ActivationState, RecordId, SearchableRecord};
use crate::search::{DATASET_CLASSES, Matcher, SearchIndex};

use super::{AutocompleteController, ControllerState, InputEvent, Rect, SuggestionList};

fn fixture() -> (AutocompleteController, SearchIndex, Matcher) {
    let mut index = SearchIndex::new();
    index.load(
        DATASET_CLASSES,
        vec![
            SearchableRecord::new("1", "apache"),
            SearchableRecord::new("2", "nginx"),
        ],
    );
    (
        AutocompleteController::new(DATASET_CLASSES, 100.0),
        index,
        Matcher::default(),
    )
}

fn focus() -> InputEvent {
    InputEvent::Focus {
        bounds: Rect::new(10.0, 20.0, 200.0, 30.0),
        scroll_y: 5.0,
    }
}

fn key(text: &str) -> InputEvent {
    InputEvent::KeyUp {
        text: text.to_string(),
    }
}

fn click(id: &str) -> InputEvent {
    InputEvent::SuggestionClicked {
        record_id: RecordId::new(id),
    }
}

#[test]
fn focus_opens_list_under_input_with_every_enabled_record() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);

    assert_eq!(controller.state(), ControllerState::Querying);
    let placement = controller.placement().expect("placement");
    assert_eq!(placement.left, 10.0);
    assert_eq!(placement.top, 55.0);
    assert_eq!(placement.width, 300.0);
    assert_eq!(placement.z_index, super::LIST_Z_INDEX);
    assert_eq!(controller.list().items().len(), 2);
}

#[test]
fn keystrokes_refilter_and_show_nothing_found_placeholder() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(key("ng"), &index, &matcher);
    assert_eq!(controller.list().items().len(), 1);
    assert_eq!(controller.list().items()[0].render_marked(), "<hl>ng</hl>inx");

    controller.handle(key("zzz"), &index, &matcher);
    assert_eq!(controller.list(), &SuggestionList::NothingFound);
    assert_eq!(controller.input_text(), "zzz");
}

#[test]
fn click_writes_record_id_and_raw_label() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(key("ng"), &index, &matcher);
    let selection = controller
        .handle(click("2"), &index, &matcher)
        .expect("selection");

    assert_eq!(selection.record_id.as_str(), "2");
    assert_eq!(selection.label, "nginx");
    assert_eq!(controller.input_text(), "nginx");
    assert_eq!(controller.state(), ControllerState::Selected);
}

#[test]
fn click_then_blur_keeps_selection() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(click("1"), &index, &matcher);
    controller.handle(InputEvent::Blur, &index, &matcher);

    assert_eq!(controller.input_text(), "apache");
    assert_eq!(
        controller.selection().map(|s| s.record_id.as_str()),
        Some("1")
    );
}

#[test]
fn blur_then_click_in_same_interaction_still_selects() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(key("ap"), &index, &matcher);
    controller.handle(InputEvent::Blur, &index, &matcher);
    assert_eq!(controller.input_text(), "");
    assert!(controller.is_open());

    let selection = controller.handle(click("1"), &index, &matcher);
    assert!(selection.is_some());
    assert_eq!(controller.input_text(), "apache");
}

#[test]
fn blur_without_click_clears_free_text() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(key("apa"), &index, &matcher);
    controller.handle(InputEvent::Blur, &index, &matcher);
    assert_eq!(controller.input_text(), "");
    assert!(controller.selection().is_none());
}

#[test]
fn latch_is_reset_after_every_blur() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(click("1"), &index, &matcher);
    controller.handle(InputEvent::Blur, &index, &matcher);

    controller.handle(focus(), &index, &matcher);
    controller.handle(InputEvent::Blur, &index, &matcher);
    assert_eq!(controller.input_text(), "");
    assert!(controller.selection().is_none());
}

#[test]
fn typing_after_a_click_invalidates_the_selection() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(click("2"), &index, &matcher);
    controller.handle(key("nginxx"), &index, &matcher);
    assert!(controller.selection().is_none());
    assert_eq!(controller.state(), ControllerState::Querying);
}

#[test]
fn outside_click_closes_and_ignores_late_clicks() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(InputEvent::OutsideClick, &index, &matcher);
    assert_eq!(controller.state(), ControllerState::Closed);
    assert!(controller.handle(click("1"), &index, &matcher).is_none());
}

#[test]
fn typing_into_a_closed_input_drops_the_selection() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(click("2"), &index, &matcher);
    controller.handle(InputEvent::OutsideClick, &index, &matcher);
    controller.handle(key("apache"), &index, &matcher);

    assert_eq!(controller.input_text(), "apache");
    assert!(controller.selection().is_none());
    assert_eq!(controller.state(), ControllerState::Closed);
}

#[test]
fn record_disabled_after_listing_cannot_be_clicked() {
    let (mut controller, mut index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    assert_eq!(controller.list().items().len(), 2);

    index.set_state(DATASET_CLASSES, &RecordId::new("2"), ActivationState::Disabled);
    assert!(controller.handle(click("2"), &index, &matcher).is_none());
    assert!(controller.selection().is_none());
    assert!(controller.handle(click("1"), &index, &matcher).is_some());
}

#[test]
fn reset_closes_the_list() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(click("1"), &index, &matcher);
    controller.reset();

    assert_eq!(controller.state(), ControllerState::Closed);
    assert_eq!(controller.input_text(), "");
    assert!(controller.handle(click("1"), &index, &matcher).is_none());
}

#[test]
fn clicking_an_unlisted_id_is_ignored() {
    let (mut controller, index, matcher) = fixture();
    controller.handle(focus(), &index, &matcher);
    controller.handle(key("ng"), &index, &matcher);
    assert!(controller.handle(click("1"), &index, &matcher).is_none());
    assert_eq!(controller.state(), ControllerState::Querying);
}

#[test]
fn invalid_raw_pattern_keeps_previous_suggestions() {
    let (mut controller, index, _) = fixture();
    let matcher = Matcher::new(PatternMode::Raw);
    controller.handle(focus(), &index, &matcher);
    controller.handle(key("ng"), &index, &matcher);
    controller.handle(key("ng("), &index, &matcher);

    assert_eq!(controller.list().items().len(), 1);
    assert!(controller.last_error().is_some());

    controller.handle(key("ap"), &index, &matcher);
    assert!(controller.last_error().is_none());
}

#[test]
fn display_field_drives_labels() {
    let mut index = SearchIndex::new();
    index.load(
        "certname",
        vec![SearchableRecord::new("n1", "node one").with_field("certname", "web01.example")],
    );
    let matcher = Matcher::default();
    let mut controller = AutocompleteController::with_display_field("certname", "certname", 100.0);
    controller.handle(focus(), &index, &matcher);
    let selection = controller
        .handle(click("n1"), &index, &matcher)
        .expect("selection");
    assert_eq!(selection.label, "web01.example");
    assert_eq!(controller.list().items()[0].title, "node one");
}
