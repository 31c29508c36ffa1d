use axum::extract::State;
use axum::Json;

use responselog::{latency_series, table_rows, ChartPoint, TableRow};

use crate::state::SharedState;

/// Response-time series of the active dataset (success records only,
/// ascending by timestamp). Empty while nothing is selected or a fetch is
/// pending.
pub async fn get_chart(State(state): State<SharedState>) -> Json<Vec<ChartPoint>> {
    let store = state.store.read().await;
    Json(latency_series(store.records()))
}

/// Tabular projection of the active dataset, one row per record.
pub async fn get_table(State(state): State<SharedState>) -> Json<Vec<TableRow>> {
    let store = state.store.read().await;
    Json(table_rows(store.records()))
}
