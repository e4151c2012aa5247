//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::abbreviation::{abbreviation_report, AbbreviationReport};
use crate::error::TwraResult;
use crate::excel::WorkbookReader;
use crate::source::SheetSource;
use crate::export::{self, CompareTarget, RangeInput};
use crate::types::ExportOptions;

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> Json<ApiResponse<RootResponse>> {
    Json(ApiResponse::ok(RootResponse {
        name: "TWRA API Server".to_string(),
        version: state.version.clone(),
        description: "Raid assignment spreadsheets to TWRA import strings".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint("/api/v1/abbreviations", "GET", "List the abbreviation table"),
            endpoint("/api/v1/generate", "POST", "Import string from sheets or a preset"),
            endpoint("/api/v1/range", "POST", "Import string from an A1 range"),
            endpoint("/api/v1/decode", "POST", "Decode an import string"),
            endpoint("/api/v1/compare", "POST", "Compare normal and compact sizes"),
        ],
    }))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> Json<ApiResponse<VersionResponse>> {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["generate", "range", "decode", "compare", "abbreviations"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }))
}

/// GET /api/v1/abbreviations - Abbreviation table and pattern rules
pub async fn abbreviations() -> Json<ApiResponse<AbbreviationReport>> {
    Json(ApiResponse::ok(abbreviation_report()))
}

/// Generate request: explicit sheets, or a preset name
#[derive(Deserialize, Default)]
pub struct GenerateRequest {
    pub file_path: String,
    #[serde(default)]
    pub sheets: Vec<String>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub prefer_short_keys: Option<bool>,
    #[serde(default)]
    pub use_abbreviations: Option<bool>,
}

/// Import string response
#[derive(Serialize, Debug)]
pub struct EncodedResponse {
    pub encoded: String,
    pub length: usize,
    pub sections: usize,
}

impl EncodedResponse {
    fn new(encoded: String, sections: usize) -> Self {
        Self {
            length: encoded.len(),
            encoded,
            sections,
        }
    }
}

fn request_options(
    base: ExportOptions,
    prefer_short_keys: Option<bool>,
    use_abbreviations: Option<bool>,
) -> ExportOptions {
    ExportOptions {
        prefer_short_keys: prefer_short_keys.unwrap_or(base.prefer_short_keys),
        use_abbreviations: use_abbreviations.unwrap_or(base.use_abbreviations),
    }
}

fn generate_internal(state: &AppState, req: &GenerateRequest) -> TwraResult<EncodedResponse> {
    let options = request_options(
        state.config.options,
        req.prefer_short_keys,
        req.use_abbreviations,
    );
    let mut workbook = WorkbookReader::open(&req.file_path)?;

    let sheets = match &req.preset {
        Some(name) => {
            let (_, preset_sheets) = state.config.preset(name).ok_or_else(|| {
                crate::error::TwraError::Config(format!("Unknown preset: {}", name))
            })?;
            export::resolve_preset_sheets(&workbook, preset_sheets)
        }
        None if req.sheets.is_empty() => workbook.active_sheet().into_iter().collect(),
        None => req.sheets.clone(),
    };

    let sections = export::collect_sheet_sections(&mut workbook, &sheets, options.use_abbreviations);
    Ok(EncodedResponse::new(
        export::render(&sections, options),
        sections.len(),
    ))
}

/// POST /api/v1/generate - Import string from whole sheets
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Json<ApiResponse<EncodedResponse>> {
    match generate_internal(&state, &req) {
        Ok(response) => Json(ApiResponse::ok(response)),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}

/// Range request
#[derive(Deserialize, Default)]
pub struct RangeRequest {
    pub file_path: String,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub prefer_short_keys: Option<bool>,
    #[serde(default)]
    pub use_abbreviations: Option<bool>,
}

/// POST /api/v1/range - Import string from one range
pub async fn range(Json(req): Json<RangeRequest>) -> Json<ApiResponse<EncodedResponse>> {
    let options = request_options(
        ExportOptions::compact(),
        req.prefer_short_keys,
        req.use_abbreviations,
    );

    let mut workbook = match WorkbookReader::open(&req.file_path) {
        Ok(workbook) => workbook,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };

    let input = RangeInput::from_arg(req.range.as_deref());
    match export::range_sections(&mut workbook, &input, options.use_abbreviations) {
        Ok(sections) => Json(ApiResponse::ok(EncodedResponse::new(
            export::render(&sections, options),
            sections.len(),
        ))),
        Err(e) => Json(ApiResponse::err(export::range_error_message(&e))),
    }
}

/// Decode request
#[derive(Deserialize)]
pub struct DecodeRequest {
    pub encoded: String,
}

/// Decode response
#[derive(Serialize, Debug)]
pub struct DecodeResponse {
    pub text: String,
}

/// POST /api/v1/decode - Table text inside an import string
pub async fn decode(Json(req): Json<DecodeRequest>) -> Json<ApiResponse<DecodeResponse>> {
    match crate::core::encoder::decode(&req.encoded) {
        Ok(text) => Json(ApiResponse::ok(DecodeResponse { text })),
        Err(e) => Json(ApiResponse::err(format!("Error decoding: {}", e))),
    }
}

/// Compare request: a sheet, a range, or neither for the first sheet
#[derive(Deserialize, Default)]
pub struct CompareRequest {
    pub file_path: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
}

/// Compare response
#[derive(Serialize, Debug)]
pub struct CompareResponse {
    pub normal: usize,
    pub compact: usize,
    pub reduction: String,
}

/// POST /api/v1/compare - Normal vs compact size
pub async fn compare(Json(req): Json<CompareRequest>) -> Json<ApiResponse<CompareResponse>> {
    let mut workbook = match WorkbookReader::open(&req.file_path) {
        Ok(workbook) => workbook,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };

    let target = match (req.sheet, req.range) {
        (Some(sheet), _) => CompareTarget::Sheet(sheet),
        (None, Some(range)) => CompareTarget::Range(RangeInput::from_arg(Some(&range))),
        (None, None) => match workbook.active_sheet() {
            Some(sheet) => CompareTarget::Sheet(sheet),
            None => return Json(ApiResponse::err("Workbook error: Workbook has no sheets")),
        },
    };

    match export::compare(&mut workbook, &target) {
        Ok(cmp) => Json(ApiResponse::ok(CompareResponse {
            normal: cmp.normal,
            compact: cmp.compact,
            reduction: cmp.reduction_label(),
        })),
        Err(message) => Json(ApiResponse::err(message)),
    }
}
