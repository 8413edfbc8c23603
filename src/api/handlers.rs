use std::cmp::Reverse;
use std::path::Path;

use axum::{
    body::to_bytes,
    extract::{Multipart, Path as UrlPath, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    advisor,
    api::types::{
        AdvisorRequest, AdvisorResponse, AlertQuery, AlertsResponse, DetectionsResponse,
        Prediction, PredictJsonRequest, PredictResponse,
    },
    api::AppState,
    classifier::classify_image_content,
    detection::mock_prediction,
    model::Detection,
    store::AlertFilter,
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub async fn advise(
    State(state): State<AppState>,
    Json(req): Json<AdvisorRequest>,
) -> Json<AdvisorResponse> {
    let reply = advisor::generate_response(&state.knowledge, &req.message);
    Json(AdvisorResponse { reply })
}

/// Run the upload through the content check, then serve a simulated
/// prediction after the configured processing delay.
pub async fn predict(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<PredictResponse>, (StatusCode, String)> {
    let upload = if is_multipart(req.headers()) {
        read_multipart_upload(req, &state).await?
    } else {
        read_json_upload(req).await?
    };

    let bytes = match upload.bytes {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "No image file provided".to_string(),
            ))
        }
    };
    let crop_type = upload
        .crop_type
        .ok_or((StatusCode::BAD_REQUEST, "No crop type specified".to_string()))?;

    // The per-pixel scan is bounded but synchronous; keep it off the
    // runtime threads.
    let (verdict, bytes) = tokio::task::spawn_blocking(move || {
        let verdict = classify_image_content(&bytes);
        (verdict, bytes)
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if !verdict.valid {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, verdict.reason));
    }

    let stored = state
        .photos
        .save(&bytes, upload.filename.as_deref())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let image_url = format!("/api/photos/{}", stored.filename);

    // Simulated analysis time, as the real product would spend here
    tokio::time::sleep(state.predict_delay).await;

    let outcome = mock_prediction();
    let now = Utc::now();

    state
        .store
        .add_detection(Detection {
            id: Uuid::new_v4().to_string(),
            image_url: Some(image_url.clone()),
            crop_type: crop_type.clone(),
            disease_name: outcome.disease.to_string(),
            confidence: outcome.confidence,
            severity: outcome.severity,
            treatment: outcome.treatment.to_string(),
            location: None,
            created_at: now,
        })
        .await;

    info!(crop = %crop_type, disease = outcome.disease, "served mock prediction");

    Ok(Json(PredictResponse {
        success: true,
        prediction: Prediction {
            disease: outcome.disease.to_string(),
            confidence: outcome.confidence,
            severity: outcome.severity,
            treatment: outcome.treatment.to_string(),
            crop_type,
            image_url,
            timestamp: now,
        },
    }))
}

pub async fn list_detections(State(state): State<AppState>) -> Json<DetectionsResponse> {
    let mut detections = state.store.list_detections().await;
    detections.sort_by_key(|d| Reverse(d.created_at));

    let total = detections.len();
    Json(DetectionsResponse {
        success: true,
        detections,
        total,
    })
}

pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> Json<AlertsResponse> {
    let filter = AlertFilter {
        crop: query.crop,
        severity: query.severity,
        region: query.region,
    };

    let mut alerts = state.store.list_alerts(&filter).await;
    alerts.sort_by_key(|a| Reverse(a.created_at));

    let total = alerts.len();
    Json(AlertsResponse {
        success: true,
        alerts,
        total,
    })
}

pub async fn get_photo(
    State(state): State<AppState>,
    UrlPath(filename): UrlPath<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err((StatusCode::BAD_REQUEST, "Invalid filename".to_string()));
    }

    let path = state.photos.path_for(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| (StatusCode::NOT_FOUND, "Photo not found".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&filename)),
    );

    Ok((headers, bytes))
}

struct IncomingUpload {
    bytes: Option<Vec<u8>>,
    filename: Option<String>,
    crop_type: Option<String>,
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_multipart_upload(
    req: Request,
    state: &AppState,
) -> Result<IncomingUpload, (StatusCode, String)> {
    let mut multipart = <Multipart as axum::extract::FromRequest<AppState>>::from_request(
        req, state,
    )
    .await
    .map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid multipart payload (check Content-Type boundary or use JSON upload): {e}"),
        )
    })?;

    let mut upload = IncomingUpload {
        bytes: None,
        filename: None,
        crop_type: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid multipart payload: {e}"),
        )
    })? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("image") => {
                upload.filename = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read image field: {e}"),
                    )
                })?;
                upload.bytes = Some(bytes.to_vec());
            }
            Some("cropType") => {
                let text = field.text().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read cropType field: {e}"),
                    )
                })?;
                if !text.trim().is_empty() {
                    upload.crop_type = Some(text);
                }
            }
            _ => {}
        }
    }

    Ok(upload)
}

async fn read_json_upload(req: Request) -> Result<IncomingUpload, (StatusCode, String)> {
    let body = to_bytes(req.into_body(), MAX_UPLOAD_BYTES)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read body: {e}")))?;

    let parsed: PredictJsonRequest = serde_json::from_slice(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Expected JSON (or multipart) upload: {e}"),
        )
    })?;

    let bytes = decode_base64_payload(&parsed.image_base64)?;

    Ok(IncomingUpload {
        bytes: Some(bytes),
        filename: parsed.filename,
        crop_type: Some(parsed.crop_type).filter(|c| !c.trim().is_empty()),
    })
}

fn decode_base64_payload(raw: &str) -> Result<Vec<u8>, (StatusCode, String)> {
    if raw.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Empty base64 payload".to_string()));
    }

    // Tolerate data-URL prefixes like "data:image/png;base64,...."
    let cleaned = match raw.find(',') {
        Some(idx) if raw[..idx + 1].contains("base64") => &raw[idx + 1..],
        _ => raw,
    };

    STANDARD
        .decode(cleaned.trim())
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid base64: {e}")))
}

fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
