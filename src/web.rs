use std::fmt::Write as _;
use std::path::PathBuf;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::mpsc::Sender;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Configuration;
use crate::events::ControllerEvent;
use crate::lister;
use crate::state::{Phase, SlideshowState};

#[derive(Clone)]
struct AppState {
    screenshots_dir: PathBuf,
    route_prefix: String,
    events_tx: Sender<ControllerEvent>,
    slideshow: watch::Receiver<SlideshowState>,
}

/// Build the site router. Standalone so tests can drive the routes without
/// binding a socket.
pub fn router(
    cfg: &Configuration,
    events_tx: Sender<ControllerEvent>,
    slideshow: watch::Receiver<SlideshowState>,
) -> Router {
    let state = AppState {
        screenshots_dir: cfg.screenshots_dir.clone(),
        route_prefix: cfg.route_prefix.clone(),
        events_tx,
        slideshow,
    };
    let screenshot_route = format!("{}/:name", cfg.route_prefix.trim_end_matches('/'));
    Router::new()
        .route("/", get(landing_page))
        .route("/api/screenshots", get(api_screenshots))
        .route("/api/slideshow", get(api_slideshow))
        .route("/api/slideshow/events", post(api_slideshow_event))
        .route(&screenshot_route, get(screenshot_file))
        .with_state(state)
}

pub fn spawn(
    cfg: &Configuration,
    events_tx: Sender<ControllerEvent>,
    slideshow: watch::Receiver<SlideshowState>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let app = router(cfg, events_tx, slideshow);
    let bind_addr = cfg.bind_address;

    tokio::spawn(async move {
        tracing::info!(%bind_addr, "starting site server");
        match TcpListener::bind(bind_addr).await {
            Ok(listener) => {
                let shutdown = cancel.clone();
                if let Err(err) = axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await
                {
                    tracing::error!(error = %err, "site server failed");
                }
            }
            Err(err) => {
                tracing::error!(error = %err, %bind_addr, "failed to bind site server");
            }
        }
    })
}

/// The listing contract: always `200` with a JSON array, possibly empty.
/// Filesystem trouble degrades to an empty gallery, never a 5xx.
async fn api_screenshots(State(state): State<AppState>) -> Json<Vec<String>> {
    let dir = state.screenshots_dir.clone();
    let prefix = state.route_prefix.clone();
    let list = tokio::task::spawn_blocking(move || lister::list_screenshots(&dir, &prefix))
        .await
        .unwrap_or_default();
    Json(list)
}

async fn api_slideshow(State(state): State<AppState>) -> Json<SlideshowState> {
    Json(state.slideshow.borrow().clone())
}

async fn api_slideshow_event(
    State(state): State<AppState>,
    Json(event): Json<ControllerEvent>,
) -> StatusCode {
    match state.events_tx.try_send(event) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(err) => {
            tracing::warn!(error = %err, "dropping slideshow event");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn screenshot_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    if !valid_screenshot_name(&name) {
        return StatusCode::NOT_FOUND.into_response();
    }
    match tokio::fs::read(state.screenshots_dir.join(&name)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(err) => {
            tracing::debug!(%name, error = %err, "screenshot not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn landing_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.slideshow.borrow().clone();
    Html(layout(&render_landing(&snapshot)))
}

/// File names are single path segments of safe characters; anything else is
/// treated as a miss rather than an error.
fn valid_screenshot_name(name: &str) -> bool {
    !name.starts_with('.')
        && name.ends_with(".png")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn render_landing(state: &SlideshowState) -> String {
    let mut body = String::new();
    body.push_str(render_hero());
    body.push_str(&render_carousel(state));
    body.push_str(render_features());
    body.push_str(render_faq());
    body.push_str(render_download());
    body.push_str(render_footer());
    body
}

fn render_hero() -> &'static str {
    "<header class=\"hero\"><h1>Snapbar</h1>\
     <p class=\"tagline\">Your screenshots, one click away in the macOS menu bar.</p>\
     <a class=\"cta\" href=\"#download\">Download for macOS</a></header>"
}

/// Behavioral contract of the carousel markup: a loading placeholder while the
/// gallery loads, an empty placeholder when it settles empty, otherwise all
/// slides stacked with only the current one visible, one dot per slide, and
/// prev/next controls only while paused.
pub fn render_carousel(state: &SlideshowState) -> String {
    match state.phase() {
        Phase::Loading => {
            return "<section class=\"carousel is-loading\"><p>Loading screenshots</p></section>"
                .to_string();
        }
        Phase::Empty => {
            return "<section class=\"carousel is-empty\"><p>No screenshots yet</p></section>"
                .to_string();
        }
        Phase::Playing | Phase::Paused => {}
    }

    let mut out = String::new();
    let sized = state.container_width > 0.0;
    if sized {
        write!(
            &mut out,
            "<section class=\"carousel\" style=\"width:{:.0}px;height:{:.0}px\">",
            state.container_width, state.container_height
        )
        .ok();
    } else {
        out.push_str("<section class=\"carousel\">");
    }
    for (index, path) in state.screenshots.iter().enumerate() {
        let visible = if index == state.current_index {
            " visible"
        } else {
            ""
        };
        write!(
            &mut out,
            "<img class=\"slide{}\" src=\"{}\" alt=\"App screenshot {}\">",
            visible,
            escape_html(path),
            index + 1
        )
        .ok();
    }
    if state.phase() == Phase::Paused {
        out.push_str("<button class=\"control prev\" aria-label=\"Previous slide\">&lsaquo;</button>");
        out.push_str("<button class=\"control next\" aria-label=\"Next slide\">&rsaquo;</button>");
    }
    out.push_str("<nav class=\"dots\">");
    for index in 0..state.screenshots.len() {
        let active = if index == state.current_index {
            " active"
        } else {
            ""
        };
        write!(
            &mut out,
            "<button class=\"dot{active}\" data-index=\"{index}\" aria-label=\"Go to slide {}\"></button>",
            index + 1
        )
        .ok();
    }
    out.push_str("</nav></section>");
    out
}

fn render_features() -> &'static str {
    "<section class=\"features\"><h2>Why Snapbar</h2><ul>\
     <li><strong>Always at hand.</strong> Every capture lands in the menu bar, ready to drag anywhere.</li>\
     <li><strong>Stays out of the way.</strong> No dock icon, no window clutter, no background indexing.</li>\
     <li><strong>Private by default.</strong> Screenshots never leave your Mac unless you share them.</li>\
     </ul></section>"
}

fn render_faq() -> &'static str {
    "<section class=\"faq\"><h2>FAQ</h2>\
     <details><summary>Which macOS versions are supported?</summary><p>macOS 15.6 and later.</p></details>\
     <details><summary>Does Snapbar replace the system screenshot tool?</summary><p>No. It picks up the captures you already take and keeps them within reach.</p></details>\
     <details><summary>How do updates work?</summary><p>Snapbar checks its update feed and installs new versions in place.</p></details>\
     </section>"
}

fn render_download() -> &'static str {
    "<section class=\"download\" id=\"download\">\
     <a class=\"cta\" href=\"/downloads/Snapbar.zip\">Download Snapbar</a>\
     <p class=\"note\">Free while in beta.</p></section>"
}

fn render_footer() -> &'static str {
    "<footer><p>&copy; 2026 Snapbar. All rights reserved.</p></footer>"
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>Snapbar</title><style>{}</style></head><body><main>{}</main><script>{}</script></body></html>",
        styles(),
        body,
        script()
    )
}

/// Client-side wiring for the carousel: dots, prev/next, pointer pause, and
/// arrow keys post controller events; a poll keeps the markup in step with
/// the controller's snapshot.
fn script() -> &'static str {
    "(function () {\n\
     var carousel = document.querySelector('.carousel');\n\
     if (!carousel) return;\n\
     function post(event) {\n\
       fetch('/api/slideshow/events', {\n\
         method: 'POST',\n\
         headers: { 'Content-Type': 'application/json' },\n\
         body: JSON.stringify(event),\n\
       });\n\
     }\n\
     carousel.addEventListener('pointerenter', function () { post({ type: 'pointer-entered' }); });\n\
     carousel.addEventListener('pointerleave', function () { post({ type: 'pointer-left' }); });\n\
     carousel.addEventListener('click', function (e) {\n\
       var dot = e.target.closest('.dot');\n\
       if (dot) { post({ type: 'dot-clicked', index: Number(dot.dataset.index) }); return; }\n\
       if (e.target.closest('.control.prev')) { post({ type: 'prev-clicked' }); return; }\n\
       if (e.target.closest('.control.next')) { post({ type: 'next-clicked' }); }\n\
     });\n\
     window.addEventListener('keydown', function (e) {\n\
       if (e.key === 'ArrowLeft') { e.preventDefault(); post({ type: 'key-pressed', key: 'left' }); }\n\
       if (e.key === 'ArrowRight') { e.preventDefault(); post({ type: 'key-pressed', key: 'right' }); }\n\
     });\n\
     function apply(state) {\n\
       var current = state['current-index'];\n\
       carousel.querySelectorAll('.slide').forEach(function (img, i) {\n\
         img.classList.toggle('visible', i === current);\n\
       });\n\
       carousel.querySelectorAll('.dot').forEach(function (dot, i) {\n\
         dot.classList.toggle('active', i === current);\n\
       });\n\
       if (state['container-width'] > 0) {\n\
         carousel.style.width = state['container-width'] + 'px';\n\
         carousel.style.height = state['container-height'] + 'px';\n\
       }\n\
     }\n\
     setInterval(function () {\n\
       fetch('/api/slideshow').then(function (res) { return res.json(); }).then(apply).catch(function () {});\n\
     }, 1000);\n\
     })();"
}

fn styles() -> &'static str {
    "body { font-family: -apple-system, sans-serif; margin: 0; background: #0f1115; color: #e8e8e8; }\nmain { max-width: 720px; margin: 0 auto; padding: 32px 24px; }\n.hero { text-align: center; padding: 48px 0 24px; }\n.hero .tagline { color: #9aa3ad; font-size: 1.2rem; }\n.cta { display: inline-block; padding: 12px 24px; border-radius: 8px; background: #2f81f7; color: #fff; text-decoration: none; font-weight: 600; }\n.cta:hover { background: #2a74de; }\n.carousel { position: relative; margin: 24px auto; max-width: 600px; }\n.carousel .slide { position: absolute; inset: 0; width: 100%; opacity: 0; transition: opacity 0.4s; }\n.carousel .slide.visible { opacity: 1; }\n.carousel.is-loading, .carousel.is-empty { text-align: center; color: #9aa3ad; padding: 48px 0; }\n.control { position: absolute; top: 50%; transform: translateY(-50%); background: rgba(0,0,0,0.5); color: #fff; border: none; border-radius: 50%; width: 36px; height: 36px; cursor: pointer; }\n.control.prev { left: 8px; }\n.control.next { right: 8px; }\n.dots { position: absolute; bottom: 8px; left: 0; right: 0; text-align: center; }\n.dot { width: 10px; height: 10px; border-radius: 50%; border: none; margin: 0 4px; background: rgba(255,255,255,0.4); cursor: pointer; }\n.dot.active { background: #fff; }\n.features ul { list-style: none; padding: 0; }\n.features li { margin: 12px 0; }\n.faq details { margin: 8px 0; }\n.download { text-align: center; padding: 32px 0; }\n.note { color: #9aa3ad; font-size: 0.9rem; }\nfooter { text-align: center; color: #5c6570; padding: 24px 0; font-size: 0.85rem; }"
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
