/*!
 * Browser surface: a two-tab page plus a small JSON API.
 *
 * Handlers read what a stage needs from the session, run the stage without
 * holding the session lock, then record only the fields that stage owns. A
 * speech conversion and a script generation on the same session therefore
 * never overwrite each other, and output derived from a script that was
 * replaced in the meantime is discarded. Stage errors are returned as marker-prefixed messages with a 200 status so
 * the page shows them in place of content. Fatal and invalid-input errors map
 * to HTTP error statuses.
 */

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::app_config::ServerConfig;
use crate::app_controller::Controller;
use crate::document::DocumentFormat;
use crate::errors::{StageErrorKind, StageResult};
use crate::file_utils::DownloadKind;
use crate::language_utils::{self, SUPPORTED_TARGET_LANGUAGES};
use crate::session::{SessionContext, SessionManager};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared server state
pub struct AppState {
    pub controller: Controller,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            sessions: SessionManager::new(),
        }
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct ScriptRequest {
    pub topic: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_duration() -> u32 {
    2
}

#[derive(Debug, Deserialize)]
pub struct TranslationRequest {
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LanguageOption {
    pub label: &'static str,
    pub code: &'static str,
    pub rtl: bool,
}

#[derive(Debug, Serialize)]
pub struct TranslatedView {
    pub language: String,
    pub text: String,
    pub rtl: bool,
}

/// What the page needs to render a session
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub topic: Option<String>,
    pub script: Option<String>,
    pub video_script: Option<String>,
    pub translated_script: Option<TranslatedView>,
    pub script_version: u64,
    pub speech_status: Option<String>,
    pub has_audio: bool,
    pub last_uploaded_file: Option<String>,
}

impl SessionView {
    fn new(session_id: Uuid, ctx: &SessionContext) -> Self {
        Self {
            session_id,
            topic: ctx.topic().map(str::to_string),
            script: ctx.script().map(str::to_string),
            video_script: ctx.video_script().map(str::to_string),
            translated_script: ctx.translated_script().map(|t| TranslatedView {
                language: t.language.clone(),
                text: t.text.clone(),
                rtl: t.is_right_to_left(),
            }),
            script_version: ctx.script_version(),
            speech_status: ctx.speech_status().map(str::to_string),
            has_audio: ctx.audio().is_some(),
            last_uploaded_file: ctx.last_uploaded_file().map(str::to_string),
        }
    }
}

/// Outcome of one stage invocation
#[derive(Debug, Serialize)]
pub struct StageReply {
    pub ok: bool,
    /// Marker-prefixed message when the stage failed
    pub error: Option<String>,
    pub session: SessionView,
}

/// Errors that become HTTP error statuses
#[derive(Debug)]
pub enum ApiError {
    SessionNotFound,
    BadRequest(String),
    UnsupportedMedia(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::SessionNotFound => (StatusCode::NOT_FOUND, "Unknown session".to_string()),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::UnsupportedMedia(m) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn create_router(state: SharedState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/languages", get(list_languages))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(clear_session))
        .route("/api/sessions/:id/script", post(generate_script))
        .route("/api/sessions/:id/video-script", post(generate_video_script))
        .route("/api/sessions/:id/translation", post(translate_script))
        .route("/api/sessions/:id/speech", post(convert_speech))
        .route("/api/sessions/:id/download/:kind", get(download))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

pub async fn start_server(config: &ServerConfig, state: SharedState) -> Result<()> {
    let app = create_router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!("Serving on http://{}:{}", config.host, config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn list_languages() -> Json<Vec<LanguageOption>> {
    Json(
        SUPPORTED_TARGET_LANGUAGES
            .iter()
            .map(|(label, code)| LanguageOption {
                label,
                code,
                rtl: language_utils::is_right_to_left(code),
            })
            .collect(),
    )
}

async fn create_session(State(state): State<SharedState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create();
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let ctx = state.sessions.snapshot(&id).ok_or(ApiError::SessionNotFound)?;
    Ok(Json(SessionView::new(id, &ctx)))
}

async fn clear_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_session(&id, |ctx| {
            state.controller.clear(ctx);
            SessionView::new(id, ctx)
        })
        .ok_or(ApiError::SessionNotFound)?;
    Ok(Json(view))
}

async fn generate_script(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ScriptRequest>,
) -> Result<Json<StageReply>, ApiError> {
    let base_version = state
        .sessions
        .with_session(&id, |ctx| ctx.script_version())
        .ok_or(ApiError::SessionNotFound)?;

    let result = state
        .controller
        .synthesize_script(&request.topic, request.duration)
        .await;

    finish(&state, id, |ctx| {
        state
            .controller
            .apply_script(ctx, &request.topic, base_version, result)
    })
}

async fn generate_video_script(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StageReply>, ApiError> {
    let (script, base_version) = current_script(&state, &id)?;
    let result = state.controller.expand_script(script.as_deref()).await;
    finish(&state, id, |ctx| {
        state.controller.apply_video_script(ctx, base_version, result)
    })
}

async fn translate_script(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TranslationRequest>,
) -> Result<Json<StageReply>, ApiError> {
    let (script, base_version) = current_script(&state, &id)?;
    let result = state
        .controller
        .translate_text(script.as_deref(), &request.language)
        .await;
    finish(&state, id, |ctx| {
        state.controller.apply_translation(ctx, base_version, result)
    })
}

async fn convert_speech(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<StageReply>, ApiError> {
    if !state.sessions.exists(&id) {
        return Err(ApiError::SessionNotFound);
    }

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("Upload has no file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Upload a {} file in the 'file' field",
            DocumentFormat::ACCEPTED_EXTENSIONS.join("/")
        ))
    })?;

    let speech_version = state
        .sessions
        .with_session(&id, |ctx| ctx.begin_speech(&file_name))
        .ok_or(ApiError::SessionNotFound)?;

    let result = state.controller.synthesize_speech(&file_name, &bytes).await;

    finish(&state, id, |ctx| {
        state
            .controller
            .apply_speech(ctx, speech_version, &file_name, result)
    })
}

/// The session's script and the version it was read at
fn current_script(state: &AppState, id: &Uuid) -> Result<(Option<String>, u64), ApiError> {
    state
        .sessions
        .with_session(id, |ctx| (ctx.script().map(str::to_string), ctx.script_version()))
        .ok_or(ApiError::SessionNotFound)
}

async fn download(
    State(state): State<SharedState>,
    Path((id, kind)): Path<(Uuid, String)>,
) -> Result<Response, ApiError> {
    let kind: DownloadKind = kind
        .parse()
        .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))?;
    let ctx = state.sessions.snapshot(&id).ok_or(ApiError::SessionNotFound)?;

    let file = state
        .controller
        .download(&ctx, kind)
        .ok_or_else(|| ApiError::NotFound(format!("Nothing to download for {}", kind.suffix())))?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(&file.file_name)),
    ];
    Ok((headers, file.bytes).into_response())
}

/// `attachment` disposition with an ASCII fallback and a UTF-8 file name
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' { c } else { '_' })
        .collect();
    let encoded = urlencoding::encode(file_name);
    format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", ascii, encoded)
}

/// Record a stage outcome under the session lock and build the reply
fn finish<T>(
    state: &AppState,
    id: Uuid,
    apply: impl FnOnce(&mut SessionContext) -> StageResult<T>,
) -> Result<Json<StageReply>, ApiError> {
    let (result, session) = state
        .sessions
        .with_session(&id, |ctx| {
            let result = apply(ctx);
            (result, SessionView::new(id, ctx))
        })
        .ok_or(ApiError::SessionNotFound)?;

    match result {
        Ok(_) => Ok(Json(StageReply {
            ok: true,
            error: None,
            session,
        })),
        Err(e) if e.is_fatal() => Err(ApiError::UnsupportedMedia(e.user_message())),
        Err(e) if e.kind == StageErrorKind::InvalidInput => Err(ApiError::BadRequest(e.user_message())),
        Err(e) => {
            error!("Stage failed for session {}: {}", &id.to_string()[..8], e);
            Ok(Json(StageReply {
                ok: false,
                error: Some(e.user_message()),
                session,
            }))
        }
    }
}
