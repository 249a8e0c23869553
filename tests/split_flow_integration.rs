// Integration tests for the split flow with GPX files on disk
//
// Covers the complete path a user takes:
// 1. Open the split map screen for a file reference
// 2. Wait for the file to be read and parsed
// 3. Pick a split point and check the navigation request

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gpxsplit::ui::split_map::SplitMapScreen;
use gpxsplit::{
    LoaderContext, LocalFileStore, PostSplitParams, RenderedView, Route, SplitMapParams,
    ViewState, ui::theme::Theme,
};
use tempfile::TempDir;

/// Helper function to write a GPX file with `points` track points
fn write_gpx(dir: &TempDir, name: &str, points: usize) -> String {
    let mut gpx = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="gpxsplit-tests" xmlns="http://www.topografix.com/GPX/1/1">
<trk><name>Integration</name><trkseg>
"#,
    );
    for i in 0..points {
        writeln!(
            gpx,
            r#"<trkpt lat="{:.6}" lon="{:.6}"><ele>{}</ele></trkpt>"#,
            45.0 + i as f64 * 0.0005,
            7.0 + i as f64 * 0.0005,
            200 + i
        )
        .unwrap();
    }
    gpx.push_str("</trkseg></trk>\n</gpx>\n");

    let path = dir.path().join(name);
    std::fs::write(&path, gpx).unwrap();
    path.display().to_string()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .build()
        .unwrap()
}

fn open_screen(runtime: &tokio::runtime::Runtime, reference: &str) -> SplitMapScreen {
    let context = LoaderContext::new(runtime.handle().clone(), Arc::new(LocalFileStore::new()));
    SplitMapScreen::new(
        SplitMapParams {
            file_reference: reference.to_string(),
            access_token: "strava-token".to_string(),
        },
        context.loader(),
    )
}

/// Helper function to poll a screen until its load settles
fn wait_settled(screen: &mut SplitMapScreen) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while screen.view() == ViewState::Loading && Instant::now() < deadline {
        screen.poll();
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn render(screen: &mut SplitMapScreen, requests: &mut Vec<Route>) -> RenderedView {
    let ctx = egui::Context::default();
    let mut rendered = RenderedView::Loading;
    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        rendered = screen.show(ctx, &Theme::default(), "SPLIT", requests);
    });
    rendered
}

#[test]
fn test_split_track_with_100_points() {
    let temp_dir = TempDir::new().unwrap();
    let reference = write_gpx(&temp_dir, "track1.gpx", 100);
    let runtime = runtime();
    let mut screen = open_screen(&runtime, &reference);

    wait_settled(&mut screen);
    match screen.view() {
        ViewState::Loaded(track) => {
            assert_eq!(track.len(), 100);
            assert_eq!(track.name.as_deref(), Some("Integration"));
        }
        other => panic!("Expected Loaded, got {:?}", other),
    }

    let mut requests = Vec::new();
    assert_eq!(render(&mut screen, &mut requests), RenderedView::Map);

    screen.map_state_mut().select(42);
    let index = screen.map_state_mut().selected_index();
    screen.on_split_selected(index, &mut requests);

    assert_eq!(
        requests,
        vec![Route::PostSplit(PostSplitParams {
            file_reference: reference,
            split_index: 42,
            access_token: "strava-token".to_string(),
        })]
    );
}

#[test]
fn test_file_uri_reference() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_gpx(&temp_dir, "uri.gpx", 10);
    let runtime = runtime();
    let mut screen = open_screen(&runtime, &format!("file://{}", path));

    wait_settled(&mut screen);
    assert!(matches!(screen.view(), ViewState::Loaded(_)));
}

#[test]
fn test_missing_file_shows_error_and_no_map() {
    let temp_dir = TempDir::new().unwrap();
    let reference = temp_dir.path().join("missing.gpx").display().to_string();
    let runtime = runtime();
    let mut screen = open_screen(&runtime, &reference);

    wait_settled(&mut screen);
    match screen.view() {
        ViewState::Error(message) => assert!(!message.is_empty()),
        other => panic!("Expected Error, got {:?}", other),
    }

    let mut requests = Vec::new();
    assert_eq!(render(&mut screen, &mut requests), RenderedView::Error);
    assert!(requests.is_empty());
}

#[test]
fn test_non_gpx_file_shows_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.gpx");
    std::fs::write(&path, "just some notes").unwrap();
    let runtime = runtime();
    let mut screen = open_screen(&runtime, &path.display().to_string());

    wait_settled(&mut screen);
    assert!(matches!(screen.view(), ViewState::Error(_)));
}
