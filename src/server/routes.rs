use crate::solver::integral_solver::{IntegralSolver, SolveResult};
use crate::solver::rules::{rule_catalog, run_examples};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinError;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const MAIN_JS: &str = include_str!("../../static/js/main.js");

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";
pub const INVALID_REQUEST: &str = "Request body must be JSON like {\"expression\": \"x^2\"}";

#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    /// missing or null is treated as an empty expression
    #[serde(default)]
    pub expression: Option<String>,
}

pub fn router(solver: Arc<IntegralSolver>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/static/js/main.js", get(script_handler))
        .route("/health", get(health_handler))
        .route("/solve", post(solve_handler))
        .route("/rules", get(rules_handler))
        .route("/examples", get(examples_handler))
        .fallback(not_found_handler)
        .with_state(solver)
}

async fn index_handler() -> Html<&'static str> {
    info!("Accessing index page");
    Html(INDEX_HTML)
}

async fn script_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], MAIN_JS)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn solve_handler(
    State(solver): State<Arc<IntegralSolver>>,
    body: Result<Json<SolveRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("rejected /solve body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": INVALID_REQUEST,
                    "details": rejection.body_text(),
                })),
            )
                .into_response();
        }
    };
    let expression = request.expression.unwrap_or_default();
    info!("Solving expression: {}", expression);
    let outcome = tokio::task::spawn_blocking(move || solver.solve_integral(&expression)).await;
    solve_response(outcome)
}

/// 200 with the result, or the generic 500 if the solver task died
pub fn solve_response(outcome: Result<SolveResult, JoinError>) -> Response {
    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            error!("Error in /solve endpoint: {}", err);
            unexpected_error()
        }
    }
}

fn unexpected_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": UNEXPECTED_ERROR })),
    )
        .into_response()
}

async fn rules_handler() -> Response {
    Json(rule_catalog()).into_response()
}

async fn examples_handler(State(solver): State<Arc<IntegralSolver>>) -> Response {
    match tokio::task::spawn_blocking(move || run_examples(&solver)).await {
        Ok(examples) => Json(examples).into_response(),
        Err(err) => {
            error!("Error in /examples endpoint: {}", err);
            unexpected_error()
        }
    }
}

async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Not found" })),
    )
        .into_response()
}
