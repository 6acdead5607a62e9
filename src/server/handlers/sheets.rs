//! Sheet and calibration rendering handlers.
//!
//! Both handlers are read-only with respect to the ledger.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::error::ErrorKind;
use crate::render::{calibration, sheet};

use super::super::state::AppState;

fn default_start() -> usize {
    1
}

/// Body for POST /api/sheets.
#[derive(Debug, Deserialize)]
pub struct SheetRequest {
    pub codes: Vec<String>,
    /// 1-based grid position of the first label
    #[serde(default = "default_start", alias = "startPosition")]
    pub start_position: usize,
    /// Built-in layout name; the server default when absent
    pub layout: Option<String>,
}

fn pdf_response(pdf: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", filename),
            ),
        ],
        pdf,
    )
        .into_response()
}

/// Handle POST /api/sheets - render codes onto label sheets.
pub async fn render(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SheetRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    let layout = state.layout(req.layout.as_deref())?;

    let rendered = tokio::task::spawn_blocking(move || {
        sheet::render(&req.codes, req.start_position, &layout)
    })
    .await
    .map_err(|e| ApiError::task(e, ErrorKind::Render))??;

    Ok(pdf_response(rendered.pdf, "labels.pdf"))
}

#[derive(Debug, Deserialize)]
pub struct CalibrationQuery {
    pub layout: Option<String>,
}

/// Handle GET /api/sheets/calibration - render the alignment grid.
pub async fn calibration(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CalibrationQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let layout = state.layout(query.layout.as_deref())?;

    let pdf = tokio::task::spawn_blocking(move || calibration::render_grid(&layout))
        .await
        .map_err(|e| ApiError::task(e, ErrorKind::Render))??;

    Ok(pdf_response(pdf.pdf, "calibration.pdf"))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{AllocatorConfig, BlockRequest};
    use crate::code::Code;
    use crate::error::LabelError;
    use crate::layout::SheetLayout;
    use crate::ledger::{LabelRecord, Ledger, LedgerStats};
    use crate::server::ServerConfig;
    use axum::http::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Ledger that only counts how often it is touched.
    #[derive(Default)]
    struct CountingLedger {
        calls: AtomicUsize,
    }

    impl Ledger for CountingLedger {
        fn allocate(&self, _request: &BlockRequest) -> Result<Vec<Code>, LabelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        fn recent(&self, _limit: usize) -> Result<Vec<LabelRecord>, LabelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        fn stats(&self) -> Result<LedgerStats, LabelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LedgerStats { total: 0 })
        }
    }

    fn state(ledger: Arc<CountingLedger>) -> Arc<AppState> {
        let config = ServerConfig {
            listen_addr: "127.0.0.1:0".into(),
            ledger_path: "unused.db".into(),
            allocator: AllocatorConfig::default(),
            default_layout: SheetLayout::letter_7x9(),
        };
        Arc::new(AppState::with_ledger(config, ledger))
    }

    #[tokio::test]
    async fn test_calibration_never_touches_ledger() {
        let ledger = Arc::new(CountingLedger::default());

        let response = calibration(
            State(state(ledger.clone())),
            Ok(Query(CalibrationQuery { layout: None })),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sheet_never_touches_ledger() {
        let ledger = Arc::new(CountingLedger::default());
        let req = SheetRequest {
            codes: vec!["T-000001".into(), "T-000002".into()],
            start_position: 5,
            layout: Some("letter-7x9".into()),
        };

        let response = render(State(state(ledger.clone())), Ok(Json(req)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_sheet_is_bad_request() {
        let ledger = Arc::new(CountingLedger::default());
        let req = SheetRequest {
            codes: Vec::new(),
            start_position: 1,
            layout: None,
        };

        let err = render(State(state(ledger)), Ok(Json(req))).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_layout() {
        let ledger = Arc::new(CountingLedger::default());
        let err = calibration(
            State(state(ledger)),
            Ok(Query(CalibrationQuery {
                layout: Some("a4-3x8".into()),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
