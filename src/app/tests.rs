use std::path::PathBuf;
use std::time::{Duration, Instant};

use tempfile::tempdir;

use crate::preview::SharedMarkup;

use super::App;

fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    done()
}

#[test]
fn test_new_app_defaults() {
    let app = App::new("weekly.md");
    assert_eq!(app.source_path(), PathBuf::from("weekly.md"));
    assert_eq!(app.interval(), Duration::from_millis(1000));
    assert!(!app.standalone);
    assert!(!app.watch_enabled);
}

#[test]
fn test_page_title_uses_file_name() {
    let app = App::new("/notes/2024-w01.md");
    assert_eq!(app.page_title(), "2024-w01.md");
}

#[test]
fn test_render_once_writes_output_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("weekly.md");
    let output = dir.path().join("out").join("weekly.html");
    std::fs::write(&source, "# Title").unwrap();

    App::new(&source)
        .with_output(Some(output.clone()))
        .render_once()
        .unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "<h1>Title</h1>\n");
}

#[test]
fn test_render_once_standalone_page() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("weekly.md");
    let output = dir.path().join("weekly.html");
    std::fs::write(&source, "hello").unwrap();

    App::new(&source)
        .with_output(Some(output.clone()))
        .with_standalone(true)
        .render_once()
        .unwrap();

    let page = std::fs::read_to_string(&output).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>weekly.md</title>"));
    assert!(page.contains("<p>hello</p>"));
}

#[test]
fn test_missing_source_fails_at_startup() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.md");
    let err = App::new(&missing)
        .start_with_target(Box::new(SharedMarkup::new()))
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to preview"), "got: {message}");
    assert!(message.contains("missing.md"), "got: {message}");
}

#[test]
fn test_running_preview_follows_file_edits() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("weekly.md");
    std::fs::write(&source, "# One").unwrap();
    let view = SharedMarkup::new();

    let running = App::new(&source)
        .with_interval(Duration::from_millis(20))
        .start_with_target(Box::new(view.clone()))
        .unwrap();
    assert_eq!(view.markup().unwrap(), "<h1>One</h1>\n");

    std::fs::write(&source, "# Two").unwrap();
    assert!(wait_until(|| view.markup().unwrap() == "<h1>Two</h1>\n"));

    let writes = view.writes().unwrap();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(view.writes().unwrap(), writes, "unchanged file must not be re-rendered");

    assert!(running.stop() > 0);
}

#[test]
fn test_running_preview_survives_missing_file_tick() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("weekly.md");
    std::fs::write(&source, "before").unwrap();
    let view = SharedMarkup::new();

    let running = App::new(&source)
        .with_interval(Duration::from_millis(20))
        .start_with_target(Box::new(view.clone()))
        .unwrap();

    std::fs::remove_file(&source).unwrap();
    std::thread::sleep(Duration::from_millis(80));
    std::fs::write(&source, "after").unwrap();

    assert!(wait_until(|| view.markup().unwrap() == "<p>after</p>\n"));
    running.stop();
}

#[test]
fn test_wake_renders_without_waiting_for_interval() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("weekly.md");
    std::fs::write(&source, "a").unwrap();
    let view = SharedMarkup::new();

    let running = App::new(&source)
        .with_interval(Duration::from_secs(60))
        .start_with_target(Box::new(view.clone()))
        .unwrap();
    assert!(!running.is_watching());

    std::fs::write(&source, "b").unwrap();
    running.wake();
    assert!(wait_until(|| view.markup().unwrap() == "<p>b</p>\n"));
    assert_eq!(running.stop(), 1);
}

#[test]
fn test_live_mode_without_output_file_is_rejected() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("weekly.md");
    std::fs::write(&source, "# One").unwrap();

    let err = App::new(&source).start().unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("--output"), "got: {message}");
    assert!(App::new(&source).run().is_err());
}

#[test]
fn test_live_output_file_holds_only_latest_render() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("weekly.md");
    let output = dir.path().join("weekly.html");
    std::fs::write(&source, "# One").unwrap();

    let running = App::new(&source)
        .with_output(Some(output.clone()))
        .with_interval(Duration::from_millis(20))
        .start()
        .unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "<h1>One</h1>\n");

    std::fs::write(&source, "# Two").unwrap();
    assert!(wait_until(|| {
        std::fs::read_to_string(&output).is_ok_and(|html| html == "<h1>Two</h1>\n")
    }));
    running.stop();
}
