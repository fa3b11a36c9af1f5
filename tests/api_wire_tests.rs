//! Wire-format tests for the slideshow API: the event payloads the page
//! posts and the state snapshot the page polls.

use screenshot_site::events::{ArrowKey, ControllerEvent};
use screenshot_site::state::SlideshowState;

#[test]
fn events_deserialize_from_tagged_json() {
    let cases = [
        (r#"{"type":"pointer-entered"}"#, ControllerEvent::PointerEntered),
        (r#"{"type":"pointer-left"}"#, ControllerEvent::PointerLeft),
        (
            r#"{"type":"key-pressed","key":"left"}"#,
            ControllerEvent::KeyPressed {
                key: ArrowKey::Left,
            },
        ),
        (
            r#"{"type":"key-pressed","key":"right"}"#,
            ControllerEvent::KeyPressed {
                key: ArrowKey::Right,
            },
        ),
        (
            r#"{"type":"dot-clicked","index":2}"#,
            ControllerEvent::DotClicked { index: 2 },
        ),
        (r#"{"type":"next-clicked"}"#, ControllerEvent::NextClicked),
        (r#"{"type":"prev-clicked"}"#, ControllerEvent::PrevClicked),
    ];
    for (json, expected) in cases {
        let event: ControllerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, expected, "payload {json}");
    }
}

#[test]
fn unknown_event_types_are_rejected() {
    assert!(serde_json::from_str::<ControllerEvent>(r#"{"type":"double-clicked"}"#).is_err());
}

#[test]
fn state_snapshot_exposes_only_public_fields() {
    let mut state = SlideshowState::new(600.0);
    state.finish_loading(vec!["/screenshots/01.png".to_string()]);

    let json = serde_json::to_value(&state).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj["current-index"], 0);
    assert_eq!(obj["is-loading"], false);
    assert_eq!(obj["is-paused"], false);
    assert_eq!(obj["screenshots"][0], "/screenshots/01.png");
    assert!(
        !obj.contains_key("dimension-load-id"),
        "internal bookkeeping must not leak onto the wire"
    );
}
