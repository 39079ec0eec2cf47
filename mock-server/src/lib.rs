use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Todos keyed by id. Ids are sequential so responses are predictable.
#[derive(Default)]
pub struct Store {
    next_id: AtomicU64,
    todos: RwLock<BTreeMap<u64, Todo>>,
}

pub type Db = Arc<Store>;

/// Sample service for exercising handler suites.
///
/// - `GET /health` → `ok`
/// - `GET /status/{code}` → that status, canonical reason as body
/// - `POST /echo` → the request body, `400` if empty
/// - `GET /headers/{name}` → the request header's value, `404` if absent
/// - `GET|POST /todos`, `GET /todos/{id}` → small JSON store
pub fn app() -> Router {
    let db: Db = Arc::new(Store::default());
    Router::new()
        .route("/health", get(health))
        .route("/status/{code}", get(status))
        .route("/echo", post(echo))
        .route("/headers/{name}", get(header))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo))
        .with_state(db)
}

async fn health() -> &'static str {
    "ok"
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, status.canonical_reason().unwrap_or_default().to_string()),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")),
    }
}

async fn echo(body: String) -> (StatusCode, String) {
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "empty body".to_string());
    }
    (StatusCode::OK, body)
}

async fn header(Path(name): Path<String>, headers: HeaderMap) -> (StatusCode, String) {
    match headers.get(&name).and_then(|v| v.to_str().ok()) {
        Some(value) => (StatusCode::OK, value.to_string()),
        None => (StatusCode::NOT_FOUND, "missing header".to_string()),
    }
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let todos = db.todos.read().await;
    Json(todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let todo = Todo {
        id: db.next_id.fetch_add(1, Ordering::Relaxed) + 1,
        title: input.title,
        completed: input.completed,
    };
    tracing::debug!(id = todo.id, "todo created");
    db.todos.write().await.insert(todo.id, todo.clone());
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, StatusCode> {
    let todos = db.todos.read().await;
    todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: 7,
            title: "Test".to_string(),
            completed: false,
        };
        assert_eq!(
            serde_json::to_string(&todo).unwrap(),
            r#"{"id":7,"title":"Test","completed":false}"#
        );
    }

    #[test]
    fn create_todo_defaults_completed_to_false() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No completed field"}"#).unwrap();
        assert_eq!(input.title, "No completed field");
        assert!(!input.completed);
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }
}
