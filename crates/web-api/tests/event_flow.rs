use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use application::{
    Announcement, EventService, EventServiceDependencies, LoggingFailureHandler, NotifierError,
    NotificationWorker, NotificationWorkerDependencies, WebhookNotifier,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use domain::EventRepository;
use infrastructure::{create_sqlite_pool, InMemoryEventRepository, SqliteEventRepository, MIGRATOR};
use serde_json::{json, Value};
use tokio::{
    sync::{oneshot, Notify},
    task::JoinHandle,
};
use tower::ServiceExt;

use web_api::{router, AppState};

/// 记录所有推送；`status` 非空时模拟 Webhook 拒绝
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Announcement>>,
    status: Option<u16>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<Announcement> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookNotifier for RecordingNotifier {
    async fn send(&self, announcement: &Announcement) -> Result<(), NotifierError> {
        self.sent.lock().unwrap().push(announcement.clone());
        match self.status {
            Some(status) => Err(NotifierError::rejected(status, "rejected")),
            None => Ok(()),
        }
    }
}

/// 进入 `send` 后一直挂起，直到测试放行
struct GatedNotifier {
    entered: Mutex<Option<oneshot::Sender<()>>>,
    release: Notify,
    delivered: Mutex<Vec<Announcement>>,
}

impl GatedNotifier {
    fn new() -> (Self, oneshot::Receiver<()>) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let notifier = Self {
            entered: Mutex::new(Some(entered_tx)),
            release: Notify::new(),
            delivered: Mutex::default(),
        };
        (notifier, entered_rx)
    }
}

#[async_trait]
impl WebhookNotifier for GatedNotifier {
    async fn send(&self, announcement: &Announcement) -> Result<(), NotifierError> {
        if let Some(entered) = self.entered.lock().unwrap().take() {
            let _ = entered.send(());
        }
        self.release.notified().await;
        self.delivered.lock().unwrap().push(announcement.clone());
        Ok(())
    }
}

fn test_router(notifier: Arc<dyn WebhookNotifier>) -> (Router, JoinHandle<()>) {
    router_with(Arc::new(InMemoryEventRepository::new()), notifier)
}

fn router_with(
    event_repository: Arc<dyn EventRepository>,
    notifier: Arc<dyn WebhookNotifier>,
) -> (Router, JoinHandle<()>) {
    let (dispatcher, worker) = NotificationWorker::spawn(NotificationWorkerDependencies {
        event_repository: event_repository.clone(),
        notifier,
        failure_handler: Arc::new(LoggingFailureHandler),
    });

    let event_service = Arc::new(EventService::new(EventServiceDependencies {
        event_repository,
        dispatcher,
    }));

    (router(AppState::new(event_service)), worker)
}

/// 释放路由（连同通知队列发送端），等待 worker 处理完剩余任务
async fn drain(app: Router, worker: JoinHandle<()>) {
    drop(app);
    worker.await.expect("worker");
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));
    (status, body)
}

fn create_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/events/create/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn list_request() -> Request<Body> {
    get_request("/events/")
}

fn midnight_session(is_published: bool) -> Value {
    json!({
        "title": "Midnight Coding Session",
        "host": "CodeMaster99",
        "public_description": "Bring snacks",
        "vault_details": "room 42",
        "is_published": is_published
    })
}

#[tokio::test]
async fn published_event_is_listed_and_announced() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (app, worker) = test_router(notifier.clone());

    let (status, created) = send_request(&app, create_request(midnight_session(true))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "Success");
    assert_eq!(created["title"], "Midnight Coding Session");
    let event_id = created["event_id"].as_i64().expect("numeric id");

    let (status, listed) = send_request(&app, list_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listed,
        json!([{
            "id": event_id,
            "title": "Midnight Coding Session",
            "host": "CodeMaster99",
            "desc": "Bring snacks"
        }])
    );
    assert!(!listed.to_string().contains("room 42"));

    drain(app, worker).await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].event_id.value(), event_id);
    assert!(sent[0].content.contains("Midnight Coding Session"));
    assert!(sent[0].content.contains("CodeMaster99"));
    assert!(!sent[0].content.contains("room 42"));
}

#[tokio::test]
async fn unpublished_event_is_listed_without_announcement() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (app, worker) = test_router(notifier.clone());

    let (status, created) = send_request(&app, create_request(midnight_session(false))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "Success");

    let (_, listed) = send_request(&app, list_request()).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["desc"], "Bring snacks");

    drain(app, worker).await;
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn publish_flag_defaults_to_false() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (app, worker) = test_router(notifier.clone());

    let (status, _) = send_request(
        &app,
        create_request(json!({
            "title": "t",
            "host": "h",
            "public_description": "",
            "vault_details": ""
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    drain(app, worker).await;
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn rejected_webhook_does_not_fail_create() {
    let notifier = Arc::new(RecordingNotifier {
        sent: Mutex::default(),
        status: Some(500),
    });
    let (app, worker) = test_router(notifier.clone());

    let (status, created) = send_request(&app, create_request(midnight_session(true))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "Success");

    drain(app, worker).await;
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn missing_field_is_rejected_before_persistence() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (app, worker) = test_router(notifier.clone());

    let (status, body) = send_request(
        &app,
        create_request(json!({
            "title": "Midnight Coding Session",
            "host": "CodeMaster99",
            "public_description": "Bring snacks",
            "is_published": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("vault_details"));

    let (_, listed) = send_request(&app, list_request()).await;
    assert_eq!(listed, json!([]));

    drain(app, worker).await;
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn each_create_gets_a_distinct_id() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (app, worker) = test_router(notifier);

    let mut ids = HashSet::new();
    for i in 0..5 {
        let (_, created) = send_request(
            &app,
            create_request(json!({
                "title": format!("event {i}"),
                "host": "h",
                "public_description": "d",
                "vault_details": "v"
            })),
        )
        .await;
        ids.insert(created["event_id"].as_i64().unwrap());
    }
    assert_eq!(ids, HashSet::from([1, 2, 3, 4, 5]));

    drain(app, worker).await;
}

#[tokio::test]
async fn health_check_responds_ok() {
    let (app, worker) = test_router(Arc::new(RecordingNotifier::default()));

    let (status, _) = send_request(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    drain(app, worker).await;
}

#[tokio::test]
async fn create_responds_while_delivery_is_pending() {
    let (notifier, entered) = GatedNotifier::new();
    let notifier = Arc::new(notifier);
    let (app, worker) = test_router(notifier.clone());

    // 投递被挂起时，创建请求仍应立即返回
    let (status, created) = tokio::time::timeout(
        Duration::from_secs(5),
        send_request(&app, create_request(midnight_session(true))),
    )
    .await
    .expect("create must not wait for delivery");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "Success");

    tokio::time::timeout(Duration::from_secs(5), entered)
        .await
        .expect("worker picked up the job")
        .expect("entered signal");
    assert!(notifier.delivered.lock().unwrap().is_empty());

    notifier.release.notify_one();
    drain(app, worker).await;

    let delivered = notifier.delivered.lock().unwrap().clone();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].event_id.value(), created["event_id"].as_i64().unwrap());
}

#[tokio::test]
async fn sqlite_store_backs_create_list_and_announcement() {
    let pool = create_sqlite_pool("sqlite::memory:", 1)
        .await
        .expect("open database");
    MIGRATOR.run(&pool).await.expect("migrate");
    let notifier = Arc::new(RecordingNotifier::default());
    let (app, worker) = router_with(Arc::new(SqliteEventRepository::new(pool)), notifier.clone());

    let (status, created) = send_request(&app, create_request(midnight_session(true))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["event_id"], 1);

    let (_, listed) = send_request(&app, list_request()).await;
    assert_eq!(
        listed,
        json!([{
            "id": 1,
            "title": "Midnight Coding Session",
            "host": "CodeMaster99",
            "desc": "Bring snacks"
        }])
    );

    drain(app, worker).await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].content.contains("**Midnight Coding Session** is being hosted by **CodeMaster99**"));
    assert!(sent[0].content.contains("**Details:** Bring snacks"));
    assert!(!sent[0].content.contains("room 42"));
}

#[tokio::test]
async fn single_event_is_returned_as_public_view() {
    let (app, worker) = test_router(Arc::new(RecordingNotifier::default()));

    let (_, created) = send_request(&app, create_request(midnight_session(false))).await;
    let event_id = created["event_id"].as_i64().unwrap();

    let (status, event) = send_request(&app, get_request(&format!("/events/{event_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        event,
        json!({
            "id": event_id,
            "title": "Midnight Coding Session",
            "host": "CodeMaster99",
            "desc": "Bring snacks"
        })
    );

    drain(app, worker).await;
}

#[tokio::test]
async fn unknown_event_id_is_404() {
    let (app, worker) = test_router(Arc::new(RecordingNotifier::default()));

    let (status, body) = send_request(&app, get_request("/events/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], "event 42 not found");

    drain(app, worker).await;
}

#[tokio::test]
async fn non_json_body_gets_error_json() {
    let (app, worker) = test_router(Arc::new(RecordingNotifier::default()));

    let (status, body) = send_request(
        &app,
        Request::builder()
            .method("POST")
            .uri("/events/create/")
            .header("content-type", "text/plain")
            .body(Body::from("title=x"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["code"], "INVALID_REQUEST");

    drain(app, worker).await;
}
