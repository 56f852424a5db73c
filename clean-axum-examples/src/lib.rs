//! A small todo list API built from clean-axum stages.
//!
//! - `POST /todos` creates a todo from `{"title": "..."}`
//! - `GET /todos/{id}` fetches one
//! - `POST /xml/todos` creates a todo from `<CreateTodo><title>...</title></CreateTodo>`
//!
//! Each route is an [`HttpHandler`]: a decoder producing a `Result` input,
//! an interactor producing a `Result` output and a presenter mapping that
//! output to a view model.

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    response::Response,
    routing::{get_service, post_service},
};
use clean_axum::prelude::*;
use clean_axum::DeadlineExceeded;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Id given to the first todo of an empty store.
pub const FIRST_TODO_ID: u64 = 42;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 256;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Deadline given to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Bind address used when `CLEAN_AXUM_ADDR` is not set.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Returns the bind address from the `CLEAN_AXUM_ADDR` env var, defaulting
/// to [`DEFAULT_ADDR`].
pub fn server_addr() -> Result<SocketAddr, AddrParseError> {
    parse_addr(std::env::var("CLEAN_AXUM_ADDR").ok().as_deref())
}

/// Parse a configured bind address, falling back to [`DEFAULT_ADDR`].
pub fn parse_addr(raw: Option<&str>) -> Result<SocketAddr, AddrParseError> {
    raw.unwrap_or(DEFAULT_ADDR).parse()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
}

/// Body of a create request.
#[derive(Debug, Deserialize)]
pub struct CreateTodoPayload {
    pub title: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    #[error("empty title")]
    Empty,
    #[error("title longer than {max} characters")]
    TooLong { max: usize },
}

impl Validate for CreateTodoPayload {
    type Error = TitleError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.title.trim().is_empty() {
            return Err(TitleError::Empty);
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(TitleError::TooLong { max: MAX_TITLE_LEN });
        }
        Ok(())
    }
}

/// Business errors carried by use case outputs.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("input error caused by {0}")]
    Input(#[from] ExtractError<TitleError>),
    #[error("invalid todo id {0:?}")]
    InvalidId(String),
    #[error("todo {0} not found")]
    NotFound(u64),
    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}

impl TodoError {
    fn status(&self) -> StatusCode {
        match self {
            TodoError::Input(err) if err.is_extraction() => StatusCode::BAD_REQUEST,
            TodoError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TodoError::InvalidId(_) => StatusCode::BAD_REQUEST,
            TodoError::NotFound(_) => StatusCode::NOT_FOUND,
            TodoError::Deadline(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Message safe to show to clients.
    fn public_message(&self) -> String {
        match self {
            TodoError::Input(ExtractError::Validation(err)) => err.to_string(),
            TodoError::Input(ExtractError::Extraction(_)) => "request read error".into(),
            other => other.to_string(),
        }
    }
}

/// In-memory todo repository, shared by every route.
#[derive(Clone, Debug)]
pub struct TodoStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug)]
struct StoreInner {
    next_id: u64,
    todos: BTreeMap<u64, Todo>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::starting_at(FIRST_TODO_ID)
    }

    /// An empty store whose first todo gets `first_id`.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                next_id: first_id,
                todos: BTreeMap::new(),
            })),
        }
    }

    pub async fn insert(&self, title: String) -> Todo {
        let mut inner = self.inner.write().await;
        let todo = Todo {
            id: inner.next_id,
            title,
        };
        inner.next_id += 1;
        inner.todos.insert(todo.id, todo.clone());
        todo
    }

    pub async fn get(&self, id: u64) -> Option<Todo> {
        self.inner.read().await.todos.get(&id).cloned()
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Input of the create use case, as produced by a [`PayloadExtractor`].
pub type CreateTodoInput = Result<CreateTodoPayload, ExtractError<TitleError>>;

/// Output of every todo use case.
pub type TodoOutput = Result<Todo, TodoError>;

/// Saves a new todo.
#[derive(Clone, Debug)]
pub struct CreateTodo {
    store: TodoStore,
}

impl CreateTodo {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }
}

impl UseCaseHandler<CreateTodoInput> for CreateTodo {
    type Output = TodoOutput;

    async fn handle(&self, ctx: RequestContext, input: CreateTodoInput) -> Self::Output {
        let payload = input?;
        let todo = ctx
            .run_until_deadline(self.store.insert(payload.title))
            .await?;
        tracing::info!(id = todo.id, "todo created");
        Ok(todo)
    }
}

/// Reads the todo id from the last path segment.
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoIdDecoder;

impl RequestDecoder for TodoIdDecoder {
    type Input = Result<u64, TodoError>;

    async fn decode(&self, req: Request) -> Self::Input {
        let segment = req.uri().path().rsplit('/').next().unwrap_or_default();
        segment
            .parse()
            .map_err(|_| TodoError::InvalidId(segment.to_owned()))
    }
}

/// Looks a todo up by id.
#[derive(Clone, Debug)]
pub struct GetTodo {
    store: TodoStore,
}

impl GetTodo {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }
}

impl UseCaseHandler<Result<u64, TodoError>> for GetTodo {
    type Output = TodoOutput;

    async fn handle(&self, ctx: RequestContext, input: Result<u64, TodoError>) -> Self::Output {
        let id = input?;
        ctx.run_until_deadline(self.store.get(id))
            .await?
            .ok_or(TodoError::NotFound(id))
    }
}

/// JSON body of every todo response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoBody {
    Data(Todo),
    Error { message: String },
}

/// Map a todo output to its JSON view, using `success` when there is no error.
pub fn todo_view(success: StatusCode, output: TodoOutput) -> JsonView<TodoBody> {
    match output {
        Ok(todo) => JsonView::new(success, TodoBody::Data(todo)),
        Err(err) => {
            tracing::debug!(error = %err, "todo request failed");
            JsonView::new(
                err.status(),
                TodoBody::Error {
                    message: err.public_message(),
                },
            )
        }
    }
}

/// Presents todo outputs as JSON.
#[derive(Clone, Debug)]
pub struct TodoPresenter {
    sender: ResponseSender,
    success: StatusCode,
}

impl TodoPresenter {
    /// Answers `201 Created` on success.
    pub fn created(sender: ResponseSender) -> Self {
        Self {
            sender,
            success: StatusCode::CREATED,
        }
    }

    /// Answers `200 OK` on success.
    pub fn found(sender: ResponseSender) -> Self {
        Self {
            sender,
            success: StatusCode::OK,
        }
    }
}

impl Presenter<TodoOutput> for TodoPresenter {
    fn present(&self, ctx: &RequestContext, output: TodoOutput) -> Response {
        self.sender.send(ctx, &todo_view(self.success, output))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "Error")]
struct XmlError {
    message: String,
}

fn todo_xml_view(output: TodoOutput) -> Box<dyn ViewModel> {
    match output {
        Ok(todo) => Box::new(XmlView::new(StatusCode::CREATED, todo)),
        Err(err) => Box::new(XmlView::new(
            err.status(),
            XmlError {
                message: err.public_message(),
            },
        )),
    }
}

/// Headers and fallback shared by every route.
pub fn response_config() -> ResponseConfig {
    ResponseConfig::builder()
        .header("cache-control", "no-store")
        .header("x-content-type-options", "nosniff")
        .fallback(r#"{"error":{"message":"internal error"}}"#)
        .build()
}

/// Build the todo routes on top of `store`.
pub fn router(store: TodoStore, config: ResponseConfig, timeout: Duration) -> Router {
    let sender = ResponseSender::new(config);

    let create = HttpHandler::new(
        PayloadExtractor::<CreateTodoPayload>::json().limit(MAX_BODY_BYTES),
        CreateTodo::new(store.clone()),
        TodoPresenter::created(sender.clone()),
    )
    .timeout(timeout);

    let fetch = HttpHandler::new(
        TodoIdDecoder,
        GetTodo::new(store.clone()),
        TodoPresenter::found(sender.clone()),
    )
    .timeout(timeout);

    let create_xml = HttpHandler::new(
        PayloadExtractor::<CreateTodoPayload>::xml().limit(MAX_BODY_BYTES),
        CreateTodo::new(store),
        view_presenter(sender, todo_xml_view),
    )
    .timeout(timeout);

    Router::new()
        .route("/todos", post_service(create))
        .route("/todos/{id}", get_service(fetch))
        .route("/xml/todos", post_service(create_xml))
}
