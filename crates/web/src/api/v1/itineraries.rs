use std::sync::Arc;

use attendance_api::ApiError;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::Method,
    routing::{get, on, post},
    Extension, Json, Router,
};
use axum_extra::TypedHeader;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use headers::{authorization::Bearer, Authorization};
use itinerary::{
    distance::parse_reported_total_km,
    format::{format_distance_km, format_duration, DisplayZone},
    Itinerary,
};
use model::{
    itinerary::{ItinerarySummary, TransitSegment},
    totals::SaveTotalsRequest,
    visit::{Coordinates, Purpose, VisitRecord},
    wire::{decode_all, RawVisitRecord},
    ExampleData,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{
        route_not_found, schema, session_from_header, HateoasResult, RouteErrorResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/itineraries{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<ItineraryDto>))
        .route("/summary", post(summarize_records))
        .route("/:date", get(get_itinerary))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaypointDto {
    pub label: String,
    pub id: Id<VisitRecord>,
    pub time: DateTime<Utc>,
    /// Clock time in the display zone, e.g. `"09:05 AM"`.
    pub time_of_day: String,
    pub purpose: Purpose,
    pub sub_purpose: Option<String>,
    pub location_name: String,
    pub location: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDto {
    #[serde(flatten)]
    pub segment: TransitSegment,
    pub distance_text: String,
    pub duration_text: String,
    pub from_location: String,
    pub to_location: String,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDto {
    pub date: Option<NaiveDate>,
    pub total_distance_km: f64,
    pub total_distance_text: String,
    pub total_duration_minutes: u64,
    pub total_duration_text: String,
    pub waypoints: Vec<WaypointDto>,
    pub segments: Vec<SegmentDto>,
}

impl ItineraryDto {
    /// `records` must be the ones `summary` was computed from, in the same
    /// order.
    pub fn new(
        date: Option<NaiveDate>,
        records: &[VisitRecord],
        summary: &ItinerarySummary,
        zone: &DisplayZone,
    ) -> Self {
        let waypoints = records
            .iter()
            .zip(summary.labels.iter())
            .map(|(record, label)| WaypointDto {
                label: label.clone(),
                id: record.id.clone(),
                time: record.timestamp,
                time_of_day: zone.time_of_day(record.timestamp),
                purpose: record.purpose.clone(),
                sub_purpose: record.sub_purpose.clone(),
                location_name: record.location_name_or_unknown().to_owned(),
                location: record.location,
            })
            .collect::<Vec<_>>();

        let location_name = |index: usize| {
            records
                .get(index)
                .map(|record| record.location_name_or_unknown().to_owned())
                .unwrap_or_default()
        };
        let segments = summary
            .segments
            .iter()
            .map(|segment| SegmentDto {
                distance_text: format_distance_km(segment.distance_km),
                duration_text: format_duration(segment.duration_minutes),
                from_location: location_name(segment.from_index),
                to_location: location_name(segment.to_index),
                segment: segment.clone(),
            })
            .collect::<Vec<_>>();

        let total_duration_minutes = summary.total_duration_minutes();
        Self {
            date,
            total_distance_km: summary.total_distance_km,
            total_distance_text: format_distance_km(summary.total_distance_km),
            total_duration_minutes,
            total_duration_text: format_duration(total_duration_minutes),
            waypoints,
            segments,
        }
    }

    pub fn from_itinerary(
        date: Option<NaiveDate>,
        itinerary: &Itinerary,
        zone: &DisplayZone,
    ) -> Self {
        Self::new(date, itinerary.records(), &itinerary.summary(), zone)
    }
}

/// A check-in at the regional office followed by one site visit.
pub(crate) fn example_records() -> Vec<VisitRecord> {
    let arrival = VisitRecord::example_data();
    let departure = VisitRecord {
        id: Id::new("65f1c0a2b7e4d9a1c2f30010".to_owned()),
        timestamp: arrival.timestamp - Duration::minutes(45),
        location: Coordinates::new(28.6280, 77.2189),
        location_name: Some("Regional Office, Barakhamba Road".to_owned()),
        purpose: Purpose::CheckIn,
        sub_purpose: None,
        distance_from_previous: None,
        ..arrival.clone()
    };
    vec![departure, arrival]
}

impl ExampleData for ItineraryDto {
    fn example_data() -> Self {
        let zone = DisplayZone::default();
        let itinerary = Itinerary::new(example_records());
        let date = itinerary
            .records()
            .first()
            .map(|record| record.local_date(zone.offset()));
        Self::from_itinerary(date, &itinerary, &zone)
    }
}

/// The backend's own day total, when any record carries one. Reported for
/// comparison only.
fn reported_total_km(raw: &[RawVisitRecord]) -> Option<f64> {
    raw.iter()
        .find_map(|record| parse_reported_total_km(record.total_distance.as_deref()))
}

async fn summarize_records(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { zone, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(raw): Json<Vec<RawVisitRecord>>,
) -> HateoasResult<ItineraryDto> {
    let backend_total_km = reported_total_km(&raw);
    let itinerary = decode_all(raw)
        .map(Itinerary::new)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })?;

    let date = itinerary
        .records()
        .first()
        .map(|record| record.local_date(zone.offset()));
    ItineraryDto::from_itinerary(date, &itinerary, &zone)
        .let_owned(|dto| Ok(itinerary_hateoas(dto, base_url, backend_total_km).json()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItineraryParams {
    #[serde(default)]
    persist: bool,
}

async fn get_itinerary(
    OriginalUri(original_uri): OriginalUri,
    Path(date): Path<NaiveDate>,
    Query(params): Query<ItineraryParams>,
    State(WebState { attendance, zone }): State<WebState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<ItineraryDto> {
    let session = session_from_header(bearer, None, &Method::GET, original_uri.path())?;
    let error = |why: RouteErrorResponse| {
        why.with_method(&Method::GET)
            .with_uri(original_uri.path())
    };

    let raw = attendance
        .fetch_raw_by_date(&session, date)
        .await
        .map_err(|why| error(why.into()))?;
    let backend_total_km = reported_total_km(&raw);
    let itinerary = decode_all(raw)
        .map(Itinerary::new)
        .map_err(|why| error(ApiError::from(why).into()))?;
    let summary = itinerary.summary();

    // an empty day has nothing to report and must not replace a stored total
    let persisted = if params.persist && !itinerary.is_empty() {
        let totals = SaveTotalsRequest::from_summary(date, &summary);
        match attendance.save_totals(&session, &totals).await {
            Ok(()) => true,
            Err(why) => {
                log::warn!("could not persist totals for {}: {}", date, why);
                false
            }
        }
    } else {
        if params.persist {
            log::info!("no visits on {}, not persisting totals", date);
        }
        false
    };

    let dto = ItineraryDto::new(Some(date), itinerary.records(), &summary, &zone);
    Ok(hateoas::Response::builder(dto, base_url)
        .link("self", resource!("/{}", date))
        .link("schema", resource!("/schema"))
        .link(
            "movements",
            crate::api::v1::resource!("/movements?startDate={}&endDate={}", date, date),
        )
        .debug_info("persisted", persisted)
        .debug_info_option("backendTotalKm", backend_total_km)
        .build()
        .json())
}

fn itinerary_hateoas(
    dto: ItineraryDto,
    base_url: Arc<BaseUrl>,
    backend_total_km: Option<f64>,
) -> hateoas::Response<ItineraryDto> {
    let date = dto.date;
    hateoas::Response::builder(dto, base_url)
        .link_option("self", date.map(|date| resource!("/{}", date)))
        .link("schema", resource!("/schema"))
        .debug_info_option("backendTotalKm", backend_total_km)
        .build()
}
