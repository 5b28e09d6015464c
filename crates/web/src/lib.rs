pub use crate::common::RouteResult;

use std::{env, sync::Arc};

use attendance_api::AttendanceSource;
use axum::{extract::FromRef, Router};
use itinerary::format::{DisplayZone, DEFAULT_UTC_OFFSET_MINUTES};
use tokio::net::TcpListener;

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Clone, FromRef)]
pub struct WebState {
    pub attendance: Arc<dyn AttendanceSource>,
    pub zone: DisplayZone,
}

impl WebState {
    pub fn new(attendance: Arc<dyn AttendanceSource>, zone: DisplayZone) -> Self {
        Self { attendance, zone }
    }
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: String,
    pub zone: DisplayZone,
}

impl WebConfig {
    /// Reads `WEB_BIND_ADDRESS` and `DISPLAY_UTC_OFFSET_MINUTES`, falling back
    /// to defaults for anything unset. An unusable offset is reported and
    /// replaced by the default.
    pub fn from_env() -> Self {
        let bind_address =
            env::var("WEB_BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned());
        let offset_minutes = env::var("DISPLAY_UTC_OFFSET_MINUTES")
            .ok()
            .map(|raw| match raw.trim().parse::<i32>() {
                Ok(minutes) => minutes,
                Err(_) => {
                    log::warn!("ignoring DISPLAY_UTC_OFFSET_MINUTES='{}'", raw);
                    DEFAULT_UTC_OFFSET_MINUTES
                }
            })
            .unwrap_or(DEFAULT_UTC_OFFSET_MINUTES);
        let zone = DisplayZone::from_offset_minutes(offset_minutes).unwrap_or_else(|| {
            log::warn!("UTC offset of {} minutes is out of range", offset_minutes);
            DisplayZone::default()
        });
        Self { bind_address, zone }
    }
}

pub fn router(state: WebState) -> Router {
    Router::new().nest_service("/api", api::routes(state))
}

pub async fn start_web_server(state: WebState, bind_address: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_address).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}
