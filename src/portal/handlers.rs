use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

use crate::pipeline::Stage;
use crate::portal::render::{self, TableView};
use crate::portal::PortalState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

struct Upload {
    file_name: String,
    data: Bytes,
}

pub async fn index() -> Html<String> {
    Html(render::upload_form())
}

pub async fn health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// Store the uploaded CSV, run the pipeline on it and show the result.
pub async fn upload(State(state): State<PortalState>, mut multipart: Multipart) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return Redirect::to("/").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Malformed upload");
            return (
                StatusCode::BAD_REQUEST,
                Html(render::error_page("Upload failed", &e.to_string())),
            )
                .into_response();
        }
    };

    // Per-request name: concurrent uploads may share a client file name.
    let path = state
        .upload_dir
        .join(format!("{}-{}", Uuid::new_v4(), upload.file_name));
    if let Err(e) = tokio::fs::write(&path, &upload.data).await {
        tracing::error!(path = %path.display(), error = %e, "Failed to store upload");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render::error_page("Upload failed", "could not store the uploaded file")),
        )
            .into_response();
    }
    tracing::info!(path = %path.display(), bytes = upload.data.len(), "Upload stored");

    // Runs share the output file.
    let _guard = state.run_lock.lock().await;
    match state.pipeline.run(&path).await {
        Ok(_) => Redirect::to("/transactions").into_response(),
        Err(e) => (
            status_for(e.stage()),
            Html(render::error_page("Transaction failed", &e.to_string())),
        )
            .into_response(),
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let Some(file_name) = field.file_name().and_then(sanitize_file_name) else {
            return Ok(None);
        };
        let data = field.bytes().await?;
        return Ok(Some(Upload { file_name, data }));
    }
    Ok(None)
}

/// Reduce a client-supplied file name to its final component.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?;
    let base = Path::new(last).file_name()?.to_str()?;
    if base.is_empty() || base.starts_with('.') {
        return None;
    }
    Some(base.to_string())
}

fn status_for(stage: Stage) -> StatusCode {
    match stage {
        Stage::Read | Stage::Build => StatusCode::UNPROCESSABLE_ENTITY,
        Stage::Submit | Stage::Fetch => StatusCode::BAD_GATEWAY,
        Stage::KeyGeneration | Stage::Write => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render the last retrieved table.
pub async fn transactions(State(state): State<PortalState>) -> Response {
    let path = state.pipeline.output_path();
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Html(render::transactions_page(None)).into_response();
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read retrieved table");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::error_page("Unavailable", "could not read retrieved table")),
            )
                .into_response();
        }
    };

    match load_table(&bytes) {
        Ok(table) => Html(render::transactions_page(Some(&table))).into_response(),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Retrieved table is not valid CSV");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::error_page("Unavailable", &e.to_string())),
            )
                .into_response()
        }
    }
}

fn load_table(bytes: &[u8]) -> Result<TableView, csv::Error> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(TableView { headers, rows })
}

pub async fn dashboard(State(state): State<PortalState>) -> Response {
    match state.dashboard_url.as_deref() {
        Some(url) => Redirect::to(url).into_response(),
        None => (StatusCode::NOT_FOUND, "No dashboard configured").into_response(),
    }
}

pub async fn metrics(State(state): State<PortalState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics disabled").into_response(),
    }
}
