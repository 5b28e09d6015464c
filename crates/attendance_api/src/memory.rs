use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate};
use model::{session::Session, totals::SaveTotalsRequest, wire::RawVisitRecord};
use tokio::sync::RwLock;
use utility::serde::date_time;

use crate::{ApiError, ApiResult, AttendanceSource};

/// Attendance backend held in memory, for local runs without the real
/// service and for tests.
pub struct InMemorySource {
    zone: FixedOffset,
    token: Option<String>,
    records: RwLock<Vec<RawVisitRecord>>,
    saved: RwLock<Vec<SaveTotalsRequest>>,
}

impl InMemorySource {
    /// `zone` decides which calendar day a stored instant belongs to.
    pub fn new(zone: FixedOffset) -> Self {
        Self {
            zone,
            token: None,
            records: RwLock::new(Vec::new()),
            saved: RwLock::new(Vec::new()),
        }
    }

    pub fn with_records(self, records: Vec<RawVisitRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            ..self
        }
    }

    /// Only sessions carrying `token` are let through.
    pub fn require_token(self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self
        }
    }

    pub async fn saved_totals(&self) -> Vec<SaveTotalsRequest> {
        self.saved.read().await.clone()
    }

    fn authorize(&self, session: &Session) -> ApiResult<()> {
        let accepted = match &self.token {
            Some(token) => session.token() == token,
            None => session.is_authenticated(),
        };
        if accepted {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    /// Records without a readable timestamp match every day, so the decode
    /// step gets to reject them instead of them silently disappearing.
    async fn filter<F>(&self, in_range: F) -> Vec<RawVisitRecord>
    where
        F: Fn(NaiveDate) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| {
                record
                    .timestamp
                    .as_deref()
                    .and_then(date_time::parse_instant)
                    .map(|instant| in_range(instant.with_timezone(&self.zone).date_naive()))
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AttendanceSource for InMemorySource {
    async fn fetch_raw_by_date(
        &self,
        session: &Session,
        date: NaiveDate,
    ) -> ApiResult<Vec<RawVisitRecord>> {
        self.authorize(session)?;
        Ok(self.filter(|day| day == date).await)
    }

    async fn fetch_raw_range(
        &self,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<RawVisitRecord>> {
        self.authorize(session)?;
        Ok(self.filter(|day| start <= day && day <= end).await)
    }

    async fn save_totals(
        &self,
        session: &Session,
        totals: &SaveTotalsRequest,
    ) -> ApiResult<()> {
        self.authorize(session)?;
        self.saved.write().await.push(totals.clone());
        Ok(())
    }
}
