//! Layout profile handlers.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::layout::SheetLayout;

use super::super::state::AppState;

/// GET /api/layouts - built-in profiles plus the server default.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<SheetLayout>> {
    let mut layouts = SheetLayout::built_in();
    let default = &state.config.default_layout;
    match layouts
        .iter()
        .position(|l| l.name.eq_ignore_ascii_case(&default.name))
    {
        Some(i) => layouts[i] = default.clone(),
        None => layouts.insert(0, default.clone()),
    }
    Json(layouts)
}
