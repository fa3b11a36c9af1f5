//! Tests for the carousel rendering contract: placeholders for the loading
//! and empty phases, one visible slide, one dot per slide, and prev/next
//! controls only while paused.

use screenshot_site::events::{ControllerEvent, Measured};
use screenshot_site::state::SlideshowState;
use screenshot_site::web::render_carousel;

fn playing_gallery() -> SlideshowState {
    let mut state = SlideshowState::new(600.0);
    state.finish_loading(vec![
        "/screenshots/01.png".to_string(),
        "/screenshots/02.png".to_string(),
        "/screenshots/03.png".to_string(),
    ]);
    state
}

#[test]
fn loading_phase_renders_placeholder() {
    let state = SlideshowState::new(600.0);
    let html = render_carousel(&state);
    assert!(html.contains("is-loading"));
    assert!(!html.contains("<img"));
}

#[test]
fn empty_phase_renders_placeholder() {
    let mut state = SlideshowState::new(600.0);
    state.finish_loading(Vec::new());
    let html = render_carousel(&state);
    assert!(html.contains("is-empty"));
    assert!(!html.contains("class=\"dot"));
}

#[test]
fn exactly_one_slide_is_visible() {
    let mut state = playing_gallery();
    state.go_to_slide(1);
    let html = render_carousel(&state);

    assert_eq!(html.matches("<img").count(), 3, "all slides stay in the DOM");
    assert_eq!(html.matches("slide visible").count(), 1);
    assert!(html.contains("src=\"/screenshots/02.png\""));
}

#[test]
fn one_dot_per_slide_and_the_current_one_is_active() {
    let mut state = playing_gallery();
    state.go_to_slide(2);
    let html = render_carousel(&state);

    assert_eq!(html.matches("class=\"dot").count(), 3);
    assert_eq!(html.matches("dot active").count(), 1);
    assert!(html.contains("data-index=\"2\""));
}

#[test]
fn controls_only_render_while_paused() {
    let mut state = playing_gallery();
    assert!(!render_carousel(&state).contains("control prev"));

    state.handle_event(ControllerEvent::PointerEntered);
    let html = render_carousel(&state);
    assert!(html.contains("control prev"));
    assert!(html.contains("control next"));

    state.handle_event(ControllerEvent::PointerLeft);
    assert!(!render_carousel(&state).contains("control prev"));
}

#[test]
fn measured_dimensions_size_the_container() {
    let mut state = playing_gallery();
    let id = state.dimension_load_id();
    state.apply_measurement(Measured {
        load_id: id,
        natural_width: 1200,
        natural_height: 600,
    });

    let html = render_carousel(&state);
    assert!(html.contains("width:600px"));
    assert!(html.contains("height:300px"));
}

#[test]
fn unmeasured_gallery_renders_without_inline_size() {
    let state = playing_gallery();
    let html = render_carousel(&state);
    assert!(!html.contains("style="));
}
