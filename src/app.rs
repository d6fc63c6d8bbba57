use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderName, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

use crate::converter::{self, ConvertOptions, ConvertedFile};
use crate::error::ConvertError;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

const UPLOAD_FIELD: &str = "file";
const ROWS_PROCESSED: HeaderName = HeaderName::from_static("x-rows-processed");
const ROW_ERRORS: HeaderName = HeaderName::from_static("x-row-errors");

/// Read-only settings shared by all requests. Each upload still runs its own
/// pipeline with its own counters.
pub struct AppState {
    options: ConvertOptions,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    message: String,
}

pub fn router(options: ConvertOptions) -> Router {
    let app_state = Arc::new(AppState { options });

    Router::new()
        .route("/", get(serve_index))
        .route("/upload", post(upload_file))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .with_state(app_state)
}

pub async fn run(addr: SocketAddr, options: ConvertOptions) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(options);

    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn upload_file(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut upload = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(UPLOAD_FIELD) {
                    continue;
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((filename, bytes)),
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
                }
            }
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }

    let Some((filename, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "no file sent in the request");
    };
    if filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "no file selected");
    }
    log::info!("received {} ({} bytes)", filename, bytes.len());

    match converter::convert_upload(&bytes, &filename, &state.options) {
        Ok(file) => file_response(file),
        Err(e @ ConvertError::Decode(_)) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            log::error!("conversion of {} failed: {}", filename, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn file_response(file: ConvertedFile) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.filename.replace('"', "")
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (ROWS_PROCESSED, file.summary.lines_processed.to_string()),
            (ROW_ERRORS, file.summary.error_count().to_string()),
        ],
        file.bytes,
    )
        .into_response()
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            status: "error".to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}
