use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use perfolio_core::{BenchmarkComparison, PerformanceResult, Period, ValuationSeries};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{BenchmarkRequestBody, PerformanceRequestBody, PeriodInfo},
};

async fn list_periods() -> Json<Vec<PeriodInfo>> {
    Json(Period::ALL.into_iter().map(PeriodInfo::from).collect())
}

async fn calculate_performance(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PerformanceRequestBody>, JsonRejection>,
) -> ApiResult<Json<PerformanceResult>> {
    let Json(body) = body?;
    let (request, prices) = body.into_parts();
    let result = state
        .service_for(prices)
        .calculate_performance(&request)
        .await?;
    Ok(Json(result))
}

async fn compare_with_benchmark(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BenchmarkRequestBody>, JsonRejection>,
) -> ApiResult<Json<BenchmarkComparison>> {
    let Json(body) = body?;
    let (request, prices) = body.request.into_parts();
    let comparison = state
        .service_for(prices)
        .compare_with_benchmark(&request, &body.benchmark_symbol)
        .await?;
    Ok(Json(comparison))
}

async fn get_valuations(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PerformanceRequestBody>, JsonRejection>,
) -> ApiResult<Json<ValuationSeries>> {
    let Json(body) = body?;
    let (request, prices) = body.into_parts();
    let series = state.service_for(prices).valuation_series(&request).await?;
    Ok(Json(series))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/performance/periods", get(list_periods))
        .route("/performance", post(calculate_performance))
        .route("/performance/benchmark", post(compare_with_benchmark))
        .route("/performance/valuations", post(get_valuations))
}
