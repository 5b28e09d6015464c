use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use axum_extra::TypedHeader;
use chrono::{DateTime, NaiveDate, Utc};
use headers::{authorization::Bearer, Authorization};
use itinerary::{daily::daily_movements, format::DisplayZone, Itinerary};
use model::{movement::DailyMovement, ExampleData};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::let_also::LetAlso;

use super::itineraries::{self, ItineraryDto};
use crate::{
    common::{
        route_not_found, schema, session_from_header, HateoasResult, RouteErrorResponse,
        VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/movements{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<DailyMovementDto>))
        .route("/", get(get_movements))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyMovementDto {
    pub date: NaiveDate,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_in_text: Option<String>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_out_text: Option<String>,
    pub site_visits: usize,
    pub movement_count: usize,
    pub itinerary: ItineraryDto,
}

impl DailyMovementDto {
    pub fn new(day: &DailyMovement, zone: &DisplayZone) -> Self {
        let clock = |instant: Option<DateTime<Utc>>| instant.map(|at| zone.time_of_day(at));
        Self {
            date: day.date,
            check_in_time: day.check_in_time,
            check_in_text: clock(day.check_in_time),
            check_out_time: day.check_out_time,
            check_out_text: clock(day.check_out_time),
            site_visits: day.site_visits,
            movement_count: day.movements.len(),
            itinerary: ItineraryDto::new(Some(day.date), &day.movements, &day.summary, zone),
        }
    }
}

impl ExampleData for DailyMovementDto {
    fn example_data() -> Self {
        let zone = DisplayZone::default();
        let day = Itinerary::new(itineraries::example_records())
            .daily_movement(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default());
        Self::new(&day, &zone)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovementParams {
    start_date: NaiveDate,
    end_date: NaiveDate,
    email: Option<String>,
}

async fn get_movements(
    OriginalUri(original_uri): OriginalUri,
    Query(params): Query<MovementParams>,
    State(WebState { attendance, zone }): State<WebState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<DailyMovementDto>>> {
    let error = |why: RouteErrorResponse| {
        why.with_method(&Method::GET)
            .with_uri(original_uri.path())
    };
    if params.start_date > params.end_date {
        return Err(error(RouteErrorResponse::bad_request(
            "startDate must not be after endDate.",
        )));
    }
    let session =
        session_from_header(bearer, params.email, &Method::GET, original_uri.path())?;

    let records = attendance
        .fetch_range(&session, params.start_date, params.end_date)
        .await
        .map_err(|why| error(why.into()))?;

    daily_movements(records, &zone)
        .iter()
        .map(|day| daily_movement_hateoas(DailyMovementDto::new(day, &zone), base_url.clone()))
        .collect::<Vec<_>>()
        .let_owned(|data| {
            hateoas::Response::builder(VecResponse::non_paginated(data), base_url)
                .link(
                    "self",
                    resource!(
                        "?startDate={}&endDate={}",
                        params.start_date,
                        params.end_date
                    ),
                )
                .link("schema", resource!("/schema"))
                .build()
                .json()
        })
        .let_owned(Ok)
}

fn daily_movement_hateoas(
    dto: DailyMovementDto,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<DailyMovementDto> {
    let date = dto.date;
    hateoas::Response::builder(dto, base_url)
        .link("itinerary", itineraries::resource!("/{}", date))
        .build()
}
