use std::{error, fmt, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDate;
use model::{
    session::Session,
    totals::SaveTotalsRequest,
    visit::VisitRecord,
    wire::{DecodeError, RawVisitRecord},
};

pub mod client;
pub mod memory;

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    DecodeError(DecodeError),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    Unauthorized,
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::DecodeError(e) => write!(f, "malformed visit data: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ApiError::Unauthorized => write!(f, "Session is missing or expired."),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        ApiError::DecodeError(e)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Where visit records come from and where computed totals go.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Raw documents for one calendar day, in backend order.
    async fn fetch_raw_by_date(
        &self,
        session: &Session,
        date: NaiveDate,
    ) -> ApiResult<Vec<RawVisitRecord>>;

    /// Raw documents for an inclusive range of calendar days.
    async fn fetch_raw_range(
        &self,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<RawVisitRecord>>;

    async fn save_totals(
        &self,
        session: &Session,
        totals: &SaveTotalsRequest,
    ) -> ApiResult<()>;

    /// Decoded records for an inclusive range of calendar days.
    async fn fetch_range(
        &self,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<VisitRecord>> {
        let raw = self.fetch_raw_range(session, start, end).await?;
        Ok(model::wire::decode_all(raw)?)
    }
}
