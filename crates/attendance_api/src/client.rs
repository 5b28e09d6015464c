use std::{env, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use model::{session::Session, totals::SaveTotalsRequest, wire::RawVisitRecord};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{ApiError, ApiResult, AttendanceSource};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const BY_DATE_ENDPOINT: &str = "api/attendance/by-date";
const RANGE_ENDPOINT: &str = "api/attendance/range";
const SAVE_TOTALS_ENDPOINT: &str = "api/attendance/save-total-distance";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl AttendanceApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn from_env() -> Option<Self> {
        let base_url = env::var("ATTENDANCE_API_URL").ok()?;
        let timeout_secs = env::var("ATTENDANCE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Some(Self {
            timeout_secs,
            ..Self::new(base_url)
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

/// The backend answers either with a bare array or with `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsEnvelope {
    Bare(Vec<RawVisitRecord>),
    Wrapped { data: Vec<RawVisitRecord> },
}

impl RecordsEnvelope {
    fn into_records(self) -> Vec<RawVisitRecord> {
        match self {
            RecordsEnvelope::Bare(records) => records,
            RecordsEnvelope::Wrapped { data } => data,
        }
    }
}

#[derive(Clone)]
pub struct AttendanceClient {
    config: AttendanceApiConfig,
    http: reqwest::Client,
}

impl AttendanceClient {
    pub fn new(config: AttendanceApiConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        session: &Session,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        if !session.is_authenticated() {
            return Err(ApiError::Unauthorized);
        }
        let url = self.config.url(endpoint);
        log::info!("requesting '{}'", url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, session.authorization_header())
            .query(query)
            .send()
            .await?;
        Self::parse(url, response).await
    }

    async fn ensure_success(
        url: String,
        response: reqwest::Response,
    ) -> ApiResult<reqwest::Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(ApiError::Unauthorized)
            }
            other => Err(ApiError::InvalidResponse {
                status_code: other,
                url,
                response: response.text().await.ok(),
            }),
        }
    }

    async fn parse<T: DeserializeOwned>(
        url: String,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let text = Self::ensure_success(url, response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl AttendanceSource for AttendanceClient {
    async fn fetch_raw_by_date(
        &self,
        session: &Session,
        date: NaiveDate,
    ) -> ApiResult<Vec<RawVisitRecord>> {
        let envelope: RecordsEnvelope = self
            .get(session, BY_DATE_ENDPOINT, &[("date", date.to_string())])
            .await?;
        Ok(envelope.into_records())
    }

    async fn fetch_raw_range(
        &self,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<RawVisitRecord>> {
        let mut query = vec![
            ("startDate", start.to_string()),
            ("endDate", end.to_string()),
        ];
        if let Some(email) = session.email() {
            query.push(("email", email.to_owned()));
        }
        let envelope: RecordsEnvelope =
            self.get(session, RANGE_ENDPOINT, &query).await?;
        Ok(envelope.into_records())
    }

    async fn save_totals(
        &self,
        session: &Session,
        totals: &SaveTotalsRequest,
    ) -> ApiResult<()> {
        if !session.is_authenticated() {
            return Err(ApiError::Unauthorized);
        }
        let url = self.config.url(SAVE_TOTALS_ENDPOINT);
        log::info!(
            "saving {:.2} km for {} to '{}'",
            totals.total_distance_km,
            totals.date,
            url
        );
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, session.authorization_header())
            .json(totals)
            .send()
            .await?;
        // the body varies between backend versions and is not needed
        Self::ensure_success(url, response).await?;
        Ok(())
    }
}
