use axum::{
    routing::{get, on},
    Router,
};

use crate::{
    common::{route_not_found, route_not_implemented, METHOD_FILTER_ALL},
    middleware::base_url::base_url_middleware,
    WebState,
};

mod itineraries;
mod movements;

pub use itineraries::{ItineraryDto, SegmentDto, WaypointDto};
pub use movements::DailyMovementDto;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(route_not_implemented))
        .nest_service("/itineraries", itineraries::routes(state.clone()))
        .nest_service("/movements", movements::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
