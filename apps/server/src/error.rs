use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use perfolio_core::errors::{Error as CoreError, ErrorKind};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e.kind() {
                ErrorKind::InvalidPeriod
                | ErrorKind::InvalidTransaction
                | ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::SymbolNotFound => StatusCode::NOT_FOUND,
                ErrorKind::PriceUnavailable | ErrorKind::NoConvergence => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ErrorKind::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfolio_core::errors::ValidationError;
    use perfolio_core::TransactionError;
    use perfolio_market_data::MarketDataError;

    #[test]
    fn test_core_errors_map_to_statuses() {
        let err = ApiError::from(CoreError::InvalidPeriod("bad".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(CoreError::from(MarketDataError::SymbolNotFound(
            "NOPE".into(),
        )));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from(CoreError::NoConvergence { iterations: 100 });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from(CoreError::from(MarketDataError::unavailable(
            "MEMORY", "down",
        )));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from(CoreError::Unexpected("boom".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_input_errors_are_bad_requests() {
        let err = ApiError::from(CoreError::from(TransactionError::Overflow {
            id: "b1".into(),
            what: "cash value",
        }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(CoreError::from(ValidationError::InvalidInput(
            "portfolio value on 2024-01-02 is too large to represent".into(),
        )));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
