//! End-to-end job lifecycle through the HTTP router and dispatch loop.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use simjobs_api::{
    AppState, MemoryJobStore, ScenarioParams, SimulationExecutor, Simulator, SyntheticSimulator,
    create_router,
};
use simjobs_workqueue::{QueueConfig, TaskQueue, WorkerPool};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower::ServiceExt;

struct Harness {
    app: Router,
    shutdown_tx: broadcast::Sender<()>,
    dispatch: JoinHandle<()>,
}

impl Harness {
    fn start() -> Self {
        let config = QueueConfig::default();
        let store = Arc::new(MemoryJobStore::new());
        let queue = Arc::new(TaskQueue::new(config.clone()));
        let pool = Arc::new(WorkerPool::new(config));
        let executor = Arc::new(SimulationExecutor::new(
            store.clone(),
            Arc::new(SyntheticSimulator),
        ));

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let dispatch = tokio::spawn(pool.clone().run_loop(queue.clone(), executor, shutdown_rx));

        let state = Arc::new(AppState::new(store, queue, pool));
        Self {
            app: create_router(state),
            shutdown_tx,
            dispatch,
        }
    }

    async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn submit(&self, body: Value) -> (StatusCode, Value) {
        self.request(
            Request::builder()
                .method("POST")
                .uri("/start-simulation")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn get(&self, uri: &str) -> Value {
        self.request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .1
    }

    async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        self.dispatch.await.unwrap();
    }
}

fn submission(duration: i64) -> Value {
    json!({
        "duration": duration,
        "name": "credit-stress",
        "num_scenarios": 3,
        "scenario_type": "historical",
        "start_date": "2024-01-01T00:00:00Z",
        "end_date": "2024-01-31T00:00:00Z"
    })
}

#[tokio::test(start_paused = true)]
async fn test_job_completes_after_delay() {
    let harness = Harness::start();

    let (status, ack) = harness.submit(submission(1)).await;
    assert_eq!(status, StatusCode::OK);
    let uri = format!("/simulations/{}", ack["id"].as_str().unwrap());

    let before = harness.get(&uri).await;
    assert_eq!(before["simulation"]["status"], "pending");

    tokio::time::sleep(Duration::from_secs(2)).await;

    let after = harness.get(&uri).await;
    let simulation = &after["simulation"];
    assert_eq!(simulation["status"], "completed");
    assert!(simulation["completed_at"].is_string());
    assert_eq!(simulation["results"]["processed_duration"], 1);
    assert_eq!(simulation["results"]["data"]["num_scenarios"], 3);
    assert!(
        simulation["results"]["message"]
            .as_str()
            .unwrap()
            .contains(ack["id"].as_str().unwrap())
    );

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_results_carry_simulator_output() {
    let harness = Harness::start();

    let (_, ack) = harness
        .submit(json!({
            "duration": 1,
            "name": "t",
            "num_scenarios": 5,
            "scenario_type": "x",
            "start_date": "2024-01-01T00:00:00Z",
            "end_date": "2024-01-02T00:00:00Z"
        }))
        .await;
    assert_eq!(ack["status"], "pending");
    let uri = format!("/simulations/{}", ack["id"].as_str().unwrap());

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let expected = SyntheticSimulator
        .run(&ScenarioParams {
            num_scenarios: 5,
            scenario_type: "x".to_string(),
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        })
        .await
        .unwrap();

    let simulation = harness.get(&uri).await["simulation"].clone();
    assert_eq!(simulation["status"], "completed");
    assert_eq!(simulation["results"]["data"], expected);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_jobs_complete_in_due_order() {
    let harness = Harness::start();

    let (_, slow) = harness.submit(submission(10)).await;
    let (_, fast) = harness.submit(submission(2)).await;
    let slow_uri = format!("/simulations/{}", slow["id"].as_str().unwrap());
    let fast_uri = format!("/simulations/{}", fast["id"].as_str().unwrap());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(harness.get(&fast_uri).await["simulation"]["status"], "completed");
    assert_eq!(harness.get(&slow_uri).await["simulation"]["status"], "pending");

    tokio::time::sleep(Duration::from_secs(8)).await;
    assert_eq!(harness.get(&slow_uri).await["simulation"]["status"], "completed");

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_deleted_job_is_not_resurrected() {
    let harness = Harness::start();

    let (_, ack) = harness.submit(submission(5)).await;
    let uri = format!("/simulations/{}", ack["id"].as_str().unwrap());

    let (status, deleted) = harness
        .request(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Simulation deleted successfully");

    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(harness.get(&uri).await["error"], "Simulation not found");
    assert_eq!(harness.get("/simulations").await["simulations"], json!([]));

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_invalid_range_creates_nothing() {
    let harness = Harness::start();

    let mut body = submission(1);
    body["end_date"] = json!("2024-01-01T00:00:00Z");
    let (status, response) = harness.submit(body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["detail"], "End date must be after start date");

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(harness.get("/simulations").await["simulations"], json!([]));

    harness.stop().await;
}
