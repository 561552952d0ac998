//! Behaviour tests for the objective lifecycle over HTTP.
//!
//! Each scenario runs against a real server bound to an ephemeral port and
//! backed by the in-memory demo organisation, so progress, completion and
//! review linking travel through sessions, handlers and the domain service.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use mockable::DefaultClock;
use okr_backend::Trace;
use okr_backend::domain::{DirectoryLoginService, ObjectiveLifecycleService, TRACE_ID_HEADER};
use okr_backend::inbound::http::configure_api;
use okr_backend::inbound::http::session_config::SessionSettings;
use okr_backend::inbound::http::state::HttpState;
use okr_backend::outbound::memory::InMemoryObjectiveStore;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

struct LifecycleWorld {
    runtime: Runtime,
    local: LocalSet,
    base_url: String,
    server: ServerHandle,
    cookies: HashMap<i64, String>,
    objective_id: Option<i64>,
    last_status: Option<u16>,
    last_trace_id: Option<String>,
    last_body: Option<Value>,
}

/// Owns the running server and stops it when the scenario ends, even on
/// panic.
struct WorldFixture {
    world: RefCell<LifecycleWorld>,
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

struct RequestSpec<'a> {
    method: Method,
    path: String,
    payload: Option<Value>,
    label: &'a str,
}

fn demo_state() -> HttpState {
    let store = Arc::new(InMemoryObjectiveStore::with_demo_organisation());
    let service = Arc::new(ObjectiveLifecycleService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(DefaultClock),
    ));
    HttpState::new(
        Arc::new(DirectoryLoginService::new(store)),
        service.clone(),
        service,
    )
}

async fn spawn_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    };
    let http_data = web::Data::new(demo_state());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session.middleware())
                    .configure(configure_api),
            )
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

#[fixture]
fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let (base_url, server) = local
        .block_on(&runtime, spawn_server())
        .expect("spawn objective server");
    WorldFixture {
        world: RefCell::new(LifecycleWorld {
            runtime,
            local,
            base_url,
            server,
            cookies: HashMap::new(),
            objective_id: None,
            last_status: None,
            last_trace_id: None,
            last_body: None,
        }),
    }
}

impl WorldFixture {
    fn block_on<R, F>(&self, operation: impl FnOnce(String) -> F) -> R
    where
        F: Future<Output = R>,
    {
        let ctx = self.world.borrow();
        let base_url = ctx.base_url.clone();
        ctx.local.block_on(&ctx.runtime, operation(base_url))
    }

    fn session_for(&self, employee_id: i64) -> String {
        if let Some(cookie) = self.world.borrow().cookies.get(&employee_id) {
            return cookie.clone();
        }
        let cookie = self.block_on(|base_url| async move {
            let response = Client::default()
                .post(format!("{base_url}/api/v1/login"))
                .send_json(&json!({
                    "username": employee_id.to_string(),
                    "password": "password"
                }))
                .await
                .expect("login request");
            assert_eq!(response.status().as_u16(), 200, "login should succeed");
            response
                .headers()
                .get(header::SET_COOKIE)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(';').next())
                .map(str::to_owned)
                .expect("session cookie")
        });
        self.world
            .borrow_mut()
            .cookies
            .insert(employee_id, cookie.clone());
        cookie
    }

    fn request_as(&self, employee_id: i64, spec: RequestSpec<'_>) {
        let cookie = self.session_for(employee_id);
        let RequestSpec {
            method,
            path,
            payload,
            label,
        } = spec;
        let (status, trace_id, body) = self.block_on(|base_url| async move {
            let request = Client::default()
                .request(method, format!("{base_url}{path}"))
                .insert_header((header::COOKIE, cookie));
            let mut response = match payload {
                Some(payload) => request.send_json(&payload).await.expect(label),
                None => request.send().await.expect(label),
            };
            let status = response.status().as_u16();
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.body().await.expect(label);
            let json: Value = serde_json::from_slice(&body).expect(label);
            (status, trace_id, json)
        });

        let mut ctx = self.world.borrow_mut();
        ctx.last_status = Some(status);
        ctx.last_trace_id = trace_id;
        ctx.last_body = Some(body);
    }

    fn objective_path(&self, suffix: &str) -> String {
        let id = self.world.borrow().objective_id.expect("objective created");
        format!("/api/v1/objectives/{id}{suffix}")
    }

    fn objective(&self) -> Value {
        let ctx = self.world.borrow();
        ctx.last_body
            .as_ref()
            .and_then(|body| body.get("data"))
            .cloned()
            .expect("objective payload")
    }

    fn report_progress(&self, employee_id: i64, progress: i64, as_manager: bool) {
        self.request_as(
            employee_id,
            RequestSpec {
                method: Method::PUT,
                path: self.objective_path("/progress"),
                payload: Some(json!({ "progress": progress, "asManager": as_manager })),
                label: "progress request",
            },
        );
    }
}

#[given("a running server backed by the demo organisation")]
fn a_running_server_backed_by_the_demo_organisation(world: &WorldFixture) {
    let _ = world;
}

#[given("employee {employee_id} has created an objective weighted {weight}")]
fn employee_has_created_an_objective(world: &WorldFixture, employee_id: i64, weight: i64) {
    world.request_as(
        employee_id,
        RequestSpec {
            method: Method::POST,
            path: "/api/v1/objectives".to_owned(),
            payload: Some(json!({
                "employeeId": employee_id,
                "title": "Publish the analytical engine notes",
                "weight": weight,
                "startDate": "2026-01-05",
                "dueDate": "2026-03-31"
            })),
            label: "create objective request",
        },
    );
    assert_eq!(world.world.borrow().last_status, Some(201));
    let created = world.objective();
    assert_eq!(created.get("status").and_then(Value::as_str), Some("NOT_STARTED"));
    assert_eq!(created.get("weight").and_then(Value::as_i64), Some(weight));
    world.world.borrow_mut().objective_id = created.get("id").and_then(Value::as_i64);
}

#[when("employee {employee_id} reports self progress of {progress}")]
fn employee_reports_self_progress(world: &WorldFixture, employee_id: i64, progress: i64) {
    world.report_progress(employee_id, progress, false);
}

#[when("employee {employee_id} reports manager progress of {progress}")]
fn employee_reports_manager_progress(world: &WorldFixture, employee_id: i64, progress: i64) {
    world.report_progress(employee_id, progress, true);
}

#[when("employee {employee_id} links the objective to review {review_id}")]
fn employee_links_the_objective(world: &WorldFixture, employee_id: i64, review_id: i64) {
    world.request_as(
        employee_id,
        RequestSpec {
            method: Method::POST,
            path: world.objective_path("/review"),
            payload: Some(json!({ "reviewId": review_id })),
            label: "link review request",
        },
    );
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    let ctx = world.world.borrow();
    assert_eq!(ctx.last_status, Some(status), "body: {:?}", ctx.last_body);
}

#[then("the objective status is {status}")]
fn the_objective_status_is(world: &WorldFixture, status: String) {
    let objective = world.objective();
    assert_eq!(
        objective.get("status").and_then(Value::as_str),
        Some(status.as_str())
    );
}

#[then("the objective self progress is {progress}")]
fn the_objective_self_progress_is(world: &WorldFixture, progress: i64) {
    let objective = world.objective();
    assert_eq!(
        objective.get("selfProgress").and_then(Value::as_i64),
        Some(progress)
    );
    assert!(objective.get("managerProgress").is_some_and(Value::is_null));
}

#[then("the objective has a completion timestamp")]
fn the_objective_has_a_completion_timestamp(world: &WorldFixture) {
    let objective = world.objective();
    assert_eq!(objective.get("managerProgress").and_then(Value::as_i64), Some(100));
    let completed_at = objective
        .get("completedAt")
        .and_then(Value::as_str)
        .expect("completedAt set");
    assert!(chrono::DateTime::parse_from_rfc3339(completed_at).is_ok());
}

#[then("the objective is linked to review {review_id}")]
fn the_objective_is_linked_to_review(world: &WorldFixture, review_id: i64) {
    let objective = world.objective();
    assert_eq!(
        objective.get("reviewId").and_then(Value::as_i64),
        Some(review_id)
    );
}

#[then("the error code is {code}")]
fn the_error_code_is(world: &WorldFixture, code: String) {
    let ctx = world.world.borrow();
    let body = ctx.last_body.as_ref().expect("error body");
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
    assert_eq!(body.get("code").and_then(Value::as_str), Some(code.as_str()));
}

#[then("the error carries the response trace id")]
fn the_error_carries_the_response_trace_id(world: &WorldFixture) {
    let ctx = world.world.borrow();
    let trace_id = ctx.last_trace_id.as_deref().expect("trace id header");
    let body = ctx.last_body.as_ref().expect("error body");
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(trace_id));
}

#[scenario(path = "tests/features/objective_lifecycle.feature")]
fn objective_lifecycle_scenarios(world: WorldFixture) {
    drop(world);
}
