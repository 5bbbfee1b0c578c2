// Ooga Workbench - Debug visualization for ooga-lang programs
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ooga_common::types::{Address, RunResponse, StackRegion};
use ooga_engine::{Highlight, StackNodeId};
use ooga_tui::{
    App, ColorScheme, Config, EventResponse, ExecutionClient, PanelType, TuiConfig,
    DEFAULT_SERVICE_URL, SERVICE_UNAVAILABLE,
};
use ratatui::{backend::TestBackend, Terminal};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use tracing::info;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn sample_response() -> serde_json::Value {
    json!({
        "success": true,
        "output": "hello\n",
        "heaps": [
            [
                {"address": 1, "tag": "Env", "size": 2, "value": null, "children": [2], "parents": []},
                {"address": 2, "tag": "Number", "size": 1, "value": 7, "children": [], "parents": [1]}
            ],
            [
                {"address": 2, "tag": "Number", "size": 1, "value": 7, "children": [], "parents": []}
            ]
        ],
        "stacks": [
            {"threads": [{"os": [{"address": 2, "value": 7, "raw": "0x07"}], "rts": []}, {"os": [], "rts": []}], "currentThread": 0},
            {"threads": [{"os": [], "rts": []}], "currentThread": 0}
        ]
    })
}

fn loaded_app() -> App {
    let mut app = App::new(ColorScheme::default(), DEFAULT_SERVICE_URL);
    app.install(serde_json::from_value(sample_response()).unwrap());
    app
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn screen(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
}

#[test]
fn test_default_tui_config() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let config = TuiConfig::default();

    assert_eq!(config.service_url, "http://localhost:3001");
    assert_eq!(config.refresh_interval, Duration::from_millis(50));
    assert!(!config.enable_mouse);
    assert!(config.source.is_none());
}

#[test]
fn test_config_round_trip() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ooga.toml");

    let mut config = Config::default();
    config.service.url = "http://ooga.test:4000".to_string();
    config.set_theme("monokai").unwrap();
    config.save_to_path(&path).unwrap();

    let loaded = Config::load_from_path(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.active_colors().current, "#f92672");
}

#[test]
fn test_invalid_config_file() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ooga.toml");
    std::fs::write(&path, "service = [").unwrap();

    assert!(Config::load_from_path(&path).is_err());
    assert!(Config::load_from_path(dir.path().join("missing.toml")).is_err());
}

#[tokio::test]
async fn test_client_posts_code() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/run"))
        .and(body_json(json!({"code": "display(1);"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ExecutionClient::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
    let response = client.run("display(1);").await.unwrap();

    assert!(response.success);
    assert_eq!(response.heaps.len(), 2);
    assert_eq!(response.into_breakpoints().len(), 2);
}

#[tokio::test]
async fn test_client_reports_service_failure() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/run"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ExecutionClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    assert!(client.run("x").await.is_err());

    let response = client.run_or_report("x").await;
    assert!(!response.success);
    assert_eq!(response.display_output(), format!("Error: {SERVICE_UNAVAILABLE}"));
    assert!(response.into_breakpoints().is_empty());
}

#[tokio::test]
async fn test_client_keeps_service_error_on_error_status() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/run"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"success": false, "error": "Type error at line 3"})),
        )
        .mount(&server)
        .await;

    let client = ExecutionClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let response = client.run_or_report("x").await;
    assert!(!response.success);
    assert_eq!(response.display_output(), "Error: Type error at line 3");
    assert!(response.into_breakpoints().is_empty());
}

#[tokio::test]
async fn test_client_reports_garbage_body() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/run"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ExecutionClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    assert!(!client.run_or_report("x").await.success);
}

#[test]
fn test_empty_app_renders_empty_state() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut app = App::new(ColorScheme::default(), DEFAULT_SERVICE_URL);
    let screen = screen(&mut app);

    assert!(screen.contains("No heap data for this breakpoint"));
    assert!(screen.contains("No threads for this breakpoint"));
    assert!(screen.contains("No breakpoints"));
}

#[test]
fn test_loaded_app_renders_both_views() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut app = loaded_app();
    let screen = screen(&mut app);

    assert!(screen.contains("Heap (2 nodes, 1 edges)"));
    assert!(screen.contains("Thread 0 (Current)"));
    assert!(screen.contains("Tag: Env"));
    assert!(screen.contains("Raw: 0x07"));
    assert!(screen.contains("Breakpoint 1/2"));
    assert!(screen.contains("hello"));
}

#[test]
fn test_failed_run_shows_error() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut app = loaded_app();
    app.install(RunResponse::failure(SERVICE_UNAVAILABLE));
    let screen = screen(&mut app);

    assert!(screen.contains("Error: Unable to call the ooga-lang service"));
    assert!(app.workbench().heap().is_empty());
}

#[test]
fn test_heap_keys_click_cursor_node() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut app = loaded_app();
    assert_eq!(app.current_panel(), PanelType::Heap);

    app.handle_key_event(key(KeyCode::Right)).unwrap();
    app.handle_key_event(key(KeyCode::Enter)).unwrap();

    let heap = app.workbench().heap();
    assert_eq!(heap.focus(), Some(Address(2)));
    assert_eq!(heap.highlight(Address(1)), Some(Highlight::Ancestor));
}

#[test]
fn test_stack_keys_relay_to_heap() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut app = loaded_app();

    assert_eq!(
        app.handle_key_event(key(KeyCode::Tab)).unwrap(),
        EventResponse::ChangeFocus(PanelType::Stack)
    );
    app.change_focus(PanelType::Stack);

    app.handle_key_event(key(KeyCode::Down)).unwrap();
    app.handle_key_event(key(KeyCode::Char(' '))).unwrap();

    let entry = StackNodeId::Entry { thread: 0, region: StackRegion::OperandStash, index: 0 };
    assert_eq!(app.workbench().stack().selected(), vec![entry]);
    assert_eq!(app.workbench().heap().focus(), Some(Address(2)));
}

#[test]
fn test_navigation_keys_rebuild() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut app = loaded_app();
    app.handle_key_event(key(KeyCode::Enter)).unwrap();
    assert!(app.workbench().heap().focus().is_some());

    app.handle_key_event(key(KeyCode::Char('n'))).unwrap();
    assert_eq!(app.workbench().navigator().breakpoint_index(), 1);
    assert!(app.workbench().heap().focus().is_none());

    app.handle_key_event(key(KeyCode::Char('n'))).unwrap();
    assert_eq!(app.workbench().navigator().breakpoint_index(), 1);

    app.handle_key_event(key(KeyCode::Char('p'))).unwrap();
    app.handle_key_event(key(KeyCode::Char('t'))).unwrap();
    assert_eq!(app.workbench().navigator().thread_index(), 1);
    app.handle_key_event(key(KeyCode::Char('t'))).unwrap();
    assert_eq!(app.workbench().navigator().thread_index(), 1);
    app.handle_key_event(KeyEvent::new(KeyCode::Char('T'), KeyModifiers::SHIFT)).unwrap();
    assert_eq!(app.workbench().navigator().thread_index(), 0);

    assert_eq!(app.handle_key_event(key(KeyCode::Char('r'))).unwrap(), EventResponse::Rerun);
    assert_eq!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap(), EventResponse::Exit);
    assert!(app.should_exit());
}

#[test]
fn test_mouse_click_on_heap_node() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut app = loaded_app();
    // Populate hit areas
    screen(&mut app);

    // Heap panel starts below the status bar; the first node sits just inside its border
    let click = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 3,
        row: 4,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(app.handle_mouse_event(click).unwrap(), EventResponse::Handled);
    assert_eq!(app.workbench().heap().focus(), Some(Address(1)));
    assert_eq!(app.current_panel(), PanelType::Heap);
}
