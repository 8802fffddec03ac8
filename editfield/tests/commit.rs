//! End-to-end commit tests against a local HTTP endpoint.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use editfield::{EditField, FieldEvent};

/// Bind a local endpoint answering each request with the next status in
/// `statuses` (the last one repeats). Returns the action URL and the
/// recorded request paths.
async fn spawn_endpoint(
    statuses: Vec<u16>,
    delay: Duration,
) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("failed to bind endpoint");
    let addr = listener.local_addr().expect("failed to get local address");
    let paths: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let hits = Arc::new(AtomicUsize::new(0));

    let recorded = Arc::clone(&paths);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let io = TokioIo::new(stream);
            let recorded = Arc::clone(&recorded);
            let statuses = statuses.clone();
            let hits = Arc::clone(&hits);
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let recorded = Arc::clone(&recorded);
                    let statuses = statuses.clone();
                    let hits = Arc::clone(&hits);
                    async move {
                        recorded
                            .lock()
                            .expect("paths lock")
                            .push(req.uri().path().to_string());
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        let hit = hits.fetch_add(1, Ordering::SeqCst);
                        let status = statuses
                            .get(hit)
                            .or(statuses.last())
                            .copied()
                            .unwrap_or(200);
                        let response = Response::builder()
                            .status(StatusCode::from_u16(status).expect("status"))
                            .body(Full::new(Bytes::new()))
                            .expect("response");
                        Ok::<_, Infallible>(response)
                    }
                });
                let _ = http1::Builder::new().serve_connection(io, service).await;
            });
        }
    });

    (format!("http://{addr}/api/field"), paths)
}

fn scenario_field(action: &str) -> EditField {
    EditField::builder()
        .action(action)
        .value("a")
        .options(vec![("a", "Alpha"), ("b", "Beta")])
        .build()
}

#[tokio::test]
async fn successful_save_commits_the_selection() {
    let (action, paths) = spawn_endpoint(vec![200], Duration::ZERO).await;
    let field = scenario_field(&action);

    field.open();
    field.select_index(1);
    field.save();

    // The form closes before the request resolves
    assert!(!field.is_editing());

    field.wait_idle().await;

    assert_eq!(field.committed_value(), "b");
    assert_eq!(field.display_label(), "Beta");
    assert!(!field.save_failed());
    assert_eq!(
        field.drain_events(),
        vec![
            FieldEvent::Open,
            FieldEvent::Change("b".to_string()),
            FieldEvent::Submit,
            FieldEvent::Close,
            FieldEvent::Update("b".to_string()),
        ]
    );
    assert_eq!(
        paths.lock().expect("paths lock").as_slice(),
        ["/api/field/b"]
    );
}

#[tokio::test]
async fn failing_save_sets_the_error_flag() {
    let (action, _paths) = spawn_endpoint(vec![500], Duration::ZERO).await;
    let field = scenario_field(&action);

    field.open();
    field.select_index(1);
    field.save();
    field.wait_idle().await;

    assert_eq!(field.committed_value(), "a");
    assert_eq!(field.display_label(), "Alpha");
    assert!(field.save_failed());

    let events = field.drain_events();
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, FieldEvent::Update(_))),
        "no update must be emitted on failure, got {events:?}"
    );
}

#[tokio::test]
async fn transport_failure_behaves_like_a_rejection() {
    // Nothing listens on port 1
    let field = scenario_field("http://127.0.0.1:1/api/field");

    field.open();
    field.select_index(1);
    field.save();
    field.wait_idle().await;

    assert_eq!(field.committed_value(), "a");
    assert!(field.save_failed());
    assert!(
        !field
            .drain_events()
            .iter()
            .any(|event| matches!(event, FieldEvent::Update(_)))
    );
}

#[tokio::test]
async fn successful_save_clears_a_previous_failure() {
    let (action, _paths) = spawn_endpoint(vec![500, 200], Duration::ZERO).await;
    let field = scenario_field(&action);

    field.open();
    field.select_index(1);
    field.save();
    field.wait_idle().await;
    assert!(field.save_failed());

    field.open();
    field.select_index(1);
    field.save();
    field.wait_idle().await;

    assert!(!field.save_failed());
    assert_eq!(field.committed_value(), "b");
}

#[tokio::test]
async fn overlapping_save_is_ignored() {
    let (action, paths) = spawn_endpoint(vec![200], Duration::from_millis(200)).await;
    let field = scenario_field(&action);

    field.open();
    field.select_index(1);
    field.save();
    assert!(field.is_saving());
    field.save();

    field.wait_idle().await;

    assert_eq!(paths.lock().expect("paths lock").len(), 1);
    let submits = field
        .drain_events()
        .into_iter()
        .filter(|event| *event == FieldEvent::Submit)
        .count();
    assert_eq!(submits, 1);
    assert_eq!(field.committed_value(), "b");
}

#[tokio::test]
async fn enter_key_saves_the_selection() {
    let (action, _paths) = spawn_endpoint(vec![200], Duration::ZERO).await;
    let field = scenario_field(&action);

    let none = KeyModifiers::NONE;
    field.on_key(&KeyEvent::new(KeyCode::Char('e'), none));
    field.on_key(&KeyEvent::new(KeyCode::Down, none));
    field.on_key(&KeyEvent::new(KeyCode::Enter, none));

    assert!(!field.is_editing());
    field.wait_idle().await;

    assert_eq!(field.committed_value(), "b");
    assert_eq!(field.display_label(), "Beta");
}

#[tokio::test]
async fn commit_path_is_percent_encoded() {
    let (action, paths) = spawn_endpoint(vec![200], Duration::ZERO).await;
    // Trailing slash on the action is normalized away
    let field = EditField::builder()
        .action(format!("{action}/"))
        .value("plain")
        .options(vec![("b c", "Spaced")])
        .build();

    field.open();
    field.select_index(0);
    field.save();
    field.wait_idle().await;

    assert_eq!(
        paths.lock().expect("paths lock").as_slice(),
        ["/api/field/b%20c"]
    );
    assert_eq!(field.committed_value(), "b c");
    assert_eq!(field.display_label(), "Spaced");
}
