use crate::events::ServerEvent;
use crate::page::HOST_PAGE;
use crate::{AppState, ServerError};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use devbox_preview::{
    GenerationOutcome, PaneLayout, RefreshPolicy, RenderFrame, Selection, SessionSnapshot, Upload,
    ViewMode,
};
use devbox_tools::{JsonFormatter, JsonStyle, MarkdownPreview};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::{Duration, Instant};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Html(HOST_PAGE) }))
        .route("/api/state", get(state_handler))
        .route("/api/preview", get(preview_sse_handler))
        .route("/api/source", post(source_handler))
        .route("/api/tab", post(tab_handler))
        .route("/api/run", post(run_handler))
        .route("/api/policy", post(policy_handler))
        .route("/api/view", post(view_handler))
        .route("/api/upload", post(upload_handler))
        .route("/api/download", get(download_handler))
        .route("/api/clear", post(clear_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/tools", get(tools_handler))
        .route("/api/json/format", post(json_format_handler))
        .route("/api/json/sample", post(json_sample_handler))
        .route("/api/json/clear", post(json_clear_handler))
        .route("/api/json/copy", get(json_copy_handler))
        .route("/api/markdown/render", post(markdown_handler))
        .route("/api/markdown/clear", post(markdown_clear_handler))
        .route("/api/markdown/copy", get(markdown_copy_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Preview
// ============================================================================

/// Result of any event that mutates or commits
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub revision: u64,
    pub pending_commit: bool,
    /// Frame committed by this event, if it committed one
    pub frame: Option<RenderFrame>,
}

impl MutationResponse {
    fn from_state(state: &AppState, frame: Option<RenderFrame>) -> Self {
        state.read_session(|session| {
            let snapshot = session.snapshot();
            Self {
                revision: snapshot.revision,
                pending_commit: snapshot.pending_commit,
                frame,
            }
        })
    }
}

async fn state_handler(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.read_session(|session| session.snapshot()))
}

/// SSE stream: the current frame first, then every commit and external source change
async fn preview_sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before reading the current frame so nothing falls in between
    let rx = state.subscribe();
    let initial = state.read_session(|session| session.last_frame().map(ServerEvent::frame));

    tracing::info!("preview client connected");

    let updates = BroadcastStream::new(rx).filter_map(|message| async move {
        match message {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(n)) => {
                tracing::warn!("[SSE] Subscriber lagged by {} messages", n);
                None
            }
        }
    });

    let events = stream::iter(initial)
        .chain(updates)
        .map(|event| Ok(to_sse(&event)));

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn to_sse(event: &ServerEvent) -> Event {
    let json = serde_json::to_string(event).unwrap_or_default();
    Event::default().event(event.name()).data(json)
}

#[derive(Debug, Deserialize)]
pub struct SourceRequest {
    pub value: String,
}

async fn source_handler(
    State(state): State<AppState>,
    Json(request): Json<SourceRequest>,
) -> Json<MutationResponse> {
    let frame = state.with_session(|session| session.edit(request.value, Instant::now()));
    Json(MutationResponse::from_state(&state, frame))
}

#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Serialize)]
pub struct TabResponse {
    pub value: String,
    pub cursor: usize,
}

async fn tab_handler(
    State(state): State<AppState>,
    Json(request): Json<TabRequest>,
) -> Result<Json<TabResponse>, ServerError> {
    let selection = Selection::range(request.start, request.end);
    let (value, cursor) = state.with_session(|session| {
        let cursor = session.press_tab(selection, Instant::now())?;
        Ok::<_, ServerError>((session.source().to_string(), cursor))
    })?;

    Ok(Json(TabResponse { value, cursor }))
}

async fn run_handler(State(state): State<AppState>) -> Json<MutationResponse> {
    let frame = state.with_session(|session| session.run());
    Json(MutationResponse::from_state(&state, frame))
}

#[derive(Debug, Deserialize)]
pub struct PolicyRequest {
    pub policy: String,
}

async fn policy_handler(
    State(state): State<AppState>,
    Json(request): Json<PolicyRequest>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    let policy: RefreshPolicy = request.policy.parse()?;
    let snapshot = state.with_session(|session| {
        session.set_policy(policy);
        session.snapshot()
    });
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub mode: String,
}

async fn view_handler(
    State(state): State<AppState>,
    Json(request): Json<ViewRequest>,
) -> Result<Json<PaneLayout>, ServerError> {
    let mode: ViewMode = request.mode.parse()?;
    Ok(Json(state.with_session(|session| session.select_view(mode))))
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default = "default_upload_name")]
    pub name: String,
}

fn default_upload_name() -> String {
    "upload.html".to_string()
}

async fn upload_handler(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Json<MutationResponse> {
    let upload = Upload::new(query.name, body.to_vec());
    let frame = state.with_session(|session| session.upload(upload, Instant::now()));
    Json(MutationResponse::from_state(&state, frame))
}

async fn download_handler(State(state): State<AppState>) -> impl IntoResponse {
    let download = state.read_session(|session| session.download());
    let disposition = format!("attachment; filename=\"{}\"", download.file_name);

    (
        [
            (header::CONTENT_TYPE, download.mime),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
    pub revision: u64,
}

async fn clear_handler(
    State(state): State<AppState>,
    Json(request): Json<ClearRequest>,
) -> Json<ClearResponse> {
    let (cleared, revision) = state.with_session(|session| {
        let cleared = session.clear(request.confirmed, Instant::now());
        (cleared, session.revision())
    });
    Json(ClearResponse { cleared, revision })
}

// ============================================================================
// Generation
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub applied: bool,
    pub notice: Option<String>,
    pub revision: u64,
    /// Source after the request resolved
    pub source: String,
    pub frame: Option<RenderFrame>,
}

/// Start a request and resolve it on its own task. Only one request can be
/// outstanding (409 otherwise).
///
/// The task owns the ticket, so a client that goes away before the generator
/// answers does not leave the control disabled.
async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ServerError> {
    let pending = state.with_session(|session| session.begin_generation(&request.prompt))?;

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let generator = task_state.generator();
        let result = generator.generate(&pending.prompt, &pending.current_code).await;

        task_state.with_session(|session| {
            let outcome = session.finish_generation(pending.ticket, result, Instant::now())?;
            Ok::<_, ServerError>((outcome, session.revision(), session.source().to_string()))
        })
    });

    let (outcome, revision, source) = task.await??;

    let response = match outcome {
        GenerationOutcome::Applied { frame } => GenerateResponse {
            applied: true,
            notice: None,
            revision,
            source,
            frame,
        },
        GenerationOutcome::Failed { notice } => GenerateResponse {
            applied: false,
            notice: Some(notice),
            revision,
            source,
            frame: None,
        },
    };

    Ok(Json(response))
}

// ============================================================================
// Tools
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub json: JsonFormatter,
    pub markdown: MarkdownPreview,
}

async fn tools_handler(State(state): State<AppState>) -> Json<ToolsResponse> {
    Json(state.with_tools(|tools| ToolsResponse {
        json: tools.json.clone(),
        markdown: tools.markdown.clone(),
    }))
}

/// Result of a confirmed-clear action on a tool
#[derive(Debug, Serialize)]
pub struct ToolClearResponse<T> {
    pub cleared: bool,
    pub state: T,
}

/// Clipboard text, if there is anything to copy
#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JsonFormatRequest {
    pub input: String,
    #[serde(default)]
    pub style: JsonStyle,
}

async fn json_format_handler(
    State(state): State<AppState>,
    Json(request): Json<JsonFormatRequest>,
) -> Json<JsonFormatter> {
    Json(state.with_tools(|tools| {
        tools.json.set_input(request.input);
        tools.json.format(request.style);
        tools.json.clone()
    }))
}

async fn json_sample_handler(State(state): State<AppState>) -> Json<JsonFormatter> {
    Json(state.with_tools(|tools| {
        tools.json.load_sample();
        tools.json.clone()
    }))
}

async fn json_clear_handler(
    State(state): State<AppState>,
    Json(request): Json<ClearRequest>,
) -> Json<ToolClearResponse<JsonFormatter>> {
    Json(state.with_tools(|tools| ToolClearResponse {
        cleared: tools.json.clear(request.confirmed),
        state: tools.json.clone(),
    }))
}

async fn json_copy_handler(State(state): State<AppState>) -> Json<CopyResponse> {
    Json(CopyResponse {
        text: state.with_tools(|tools| tools.json.copy_output().map(str::to_string)),
    })
}

#[derive(Debug, Deserialize)]
pub struct MarkdownRequest {
    pub markdown: String,
}

async fn markdown_handler(
    State(state): State<AppState>,
    Json(request): Json<MarkdownRequest>,
) -> Json<MarkdownPreview> {
    Json(state.with_tools(|tools| {
        tools.markdown.set(request.markdown);
        tools.markdown.clone()
    }))
}

async fn markdown_clear_handler(
    State(state): State<AppState>,
    Json(request): Json<ClearRequest>,
) -> Json<ToolClearResponse<MarkdownPreview>> {
    Json(state.with_tools(|tools| ToolClearResponse {
        cleared: tools.markdown.clear(request.confirmed),
        state: tools.markdown.clone(),
    }))
}

async fn markdown_copy_handler(State(state): State<AppState>) -> Json<CopyResponse> {
    Json(CopyResponse {
        text: state.with_tools(|tools| Some(tools.markdown.copy_html().to_string())),
    })
}
