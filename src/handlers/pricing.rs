//! Ingest, raw snapshot reads, fetch triggers and the simple UI read views.

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::booking::normalize::normalize;
use crate::booking::BookingApiClient;
use crate::errors::ApiError;
use crate::models::external_hotel::ExternalHotel;
use crate::models::price_table::{PriceTableExternalHotel, SingleDayListRow};
use crate::models::snapshot::{
    MultiPriceSimple, NightlySimpleRow, PriceRow, PriceSnapshot, NO_DATA,
};
use crate::services::{fetch, ingest};

#[derive(Debug, Deserialize)]
pub struct SingleDayQuery {
    pub provider: String,
    pub external_hotel_id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct StayQuery {
    pub provider: String,
    pub external_hotel_id: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub hotel_id: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct TableDayQuery {
    pub price_table_id: i64,
    pub date: NaiveDate,
}

/// POST /api/ingest/booking — store a raw provider JSON payload directly.
pub async fn ingest_booking(
    pool: web::Data<PgPool>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let stay = normalize(&body)?;
    ingest::save_stay(pool.get_ref(), &stay).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

/// GET /api/prices/single-day — all snapshots for (date, date+1).
pub async fn prices_single_day(
    pool: web::Data<PgPool>,
    params: web::Query<SingleDayQuery>,
) -> Result<HttpResponse, ApiError> {
    let snapshots = snapshots_for_stay(
        pool.get_ref(),
        &params.provider,
        &params.external_hotel_id,
        params.date,
        params.date + chrono::Duration::days(1),
    )
    .await?;
    Ok(HttpResponse::Ok().json(snapshots))
}

/// GET /api/prices/multi-day — all snapshots for the exact range.
pub async fn prices_multi_day(
    pool: web::Data<PgPool>,
    params: web::Query<StayQuery>,
) -> Result<HttpResponse, ApiError> {
    let snapshots = snapshots_for_stay(
        pool.get_ref(),
        &params.provider,
        &params.external_hotel_id,
        params.checkin,
        params.checkout,
    )
    .await?;
    Ok(HttpResponse::Ok().json(snapshots))
}

/// POST /api/fetch/single — fetch one stay from the provider and store it.
pub async fn fetch_single(
    pool: web::Data<PgPool>,
    api: web::Data<BookingApiClient>,
    params: web::Query<FetchQuery>,
) -> Result<HttpResponse, ApiError> {
    fetch::fetch_and_save(
        pool.get_ref(),
        api.get_ref(),
        &params.hotel_id,
        params.checkin,
        params.checkout,
    )
    .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

/// POST /api/fetch/multi-sum — nightly-sum aggregation over the range.
pub async fn fetch_multi_sum(
    pool: web::Data<PgPool>,
    api: web::Data<BookingApiClient>,
    params: web::Query<FetchQuery>,
) -> Result<HttpResponse, ApiError> {
    fetch::fetch_and_save_multi_night_sum(
        pool.get_ref(),
        api.get_ref(),
        &params.hotel_id,
        params.checkin,
        params.checkout,
    )
    .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

/// GET /api/ui/single-day — latest price for one night, joined with the
/// cached hotel row; NO_DATA when nothing has been fetched.
pub async fn ui_single_day(
    pool: web::Data<PgPool>,
    params: web::Query<SingleDayQuery>,
) -> Result<HttpResponse, ApiError> {
    let checkout = params.date + chrono::Duration::days(1);
    let snapshot = latest_snapshot(
        pool.get_ref(),
        &params.provider,
        &params.external_hotel_id,
        params.date,
        checkout,
    )
    .await?;
    let hotel = find_hotel(pool.get_ref(), &params.provider, &params.external_hotel_id).await?;

    let row = match snapshot {
        Some(s) => PriceRow {
            hotel_id: params.external_hotel_id.clone(),
            name: hotel.as_ref().and_then(|h| h.name_cached.clone()),
            url: hotel.as_ref().and_then(|h| h.url_cached.clone()),
            currency: Some(s.currency),
            price: Some(s.price_total),
            availability: s.availability,
        },
        None => PriceRow {
            hotel_id: params.external_hotel_id.clone(),
            name: hotel.as_ref().and_then(|h| h.name_cached.clone()),
            url: hotel.as_ref().and_then(|h| h.url_cached.clone()),
            currency: None,
            price: None,
            availability: NO_DATA.to_string(),
        },
    };
    Ok(HttpResponse::Ok().json(row))
}

/// GET /api/ui/multi-day-simple — hotel name plus latest total for the range.
pub async fn ui_multi_day_simple(
    pool: web::Data<PgPool>,
    params: web::Query<StayQuery>,
) -> Result<HttpResponse, ApiError> {
    let snapshot = latest_snapshot(
        pool.get_ref(),
        &params.provider,
        &params.external_hotel_id,
        params.checkin,
        params.checkout,
    )
    .await?;
    let hotel = find_hotel(pool.get_ref(), &params.provider, &params.external_hotel_id).await?;

    Ok(HttpResponse::Ok().json(MultiPriceSimple {
        hotel_id: params.external_hotel_id.clone(),
        name: hotel.and_then(|h| h.name_cached),
        total: snapshot.map(|s| s.price_total),
    }))
}

/// GET /api/ui/per-night-simple — nightly rows for snapshots inside the range.
pub async fn ui_per_night_simple(
    pool: web::Data<PgPool>,
    params: web::Query<StayQuery>,
) -> Result<HttpResponse, ApiError> {
    let hotel = find_hotel(pool.get_ref(), &params.provider, &params.external_hotel_id).await?;
    let name = hotel.and_then(|h| h.name_cached);

    let snapshots = snapshots_in_range(
        pool.get_ref(),
        &params.provider,
        &params.external_hotel_id,
        params.checkin,
        params.checkout,
    )
    .await?;

    let rows: Vec<NightlySimpleRow> = snapshots
        .into_iter()
        .map(|s| NightlySimpleRow {
            hotel_name: name.clone(),
            date: s.checkin_date,
            price: Some(s.price_total),
        })
        .collect();
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/ui/price-table/single-day — one row per hotel linked to the table.
pub async fn ui_price_table_single_day(
    pool: web::Data<PgPool>,
    params: web::Query<TableDayQuery>,
) -> Result<HttpResponse, ApiError> {
    let links = sqlx::query_as::<_, PriceTableExternalHotel>(
        "SELECT * FROM price_table_external_hotels WHERE price_table_id = $1",
    )
    .bind(params.price_table_id)
    .fetch_all(pool.get_ref())
    .await?;

    let checkout = params.date + chrono::Duration::days(1);
    let mut rows = Vec::with_capacity(links.len());
    for link in links {
        let hotel = sqlx::query_as::<_, ExternalHotel>("SELECT * FROM external_hotels WHERE id = $1")
            .bind(link.external_hotel_ref)
            .fetch_optional(pool.get_ref())
            .await?;
        let Some(hotel) = hotel else { continue };

        let snapshot = latest_snapshot(
            pool.get_ref(),
            &hotel.provider,
            &hotel.external_hotel_id,
            params.date,
            checkout,
        )
        .await?;

        rows.push(SingleDayListRow {
            price_table_id: params.price_table_id,
            hotel_id: hotel.external_hotel_id,
            name: hotel.name_cached,
            price: snapshot.map(|s| s.price_total),
            owner: link.is_owner_hotel,
        });
    }
    Ok(HttpResponse::Ok().json(rows))
}

// Shared snapshot/hotel lookups, also used by the owner UI handlers.

pub async fn latest_snapshot(
    pool: &PgPool,
    provider: &str,
    external_hotel_id: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Result<Option<PriceSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, PriceSnapshot>(
        r#"
        SELECT * FROM price_snapshots
        WHERE provider = $1 AND external_hotel_id = $2
          AND checkin_date = $3 AND checkout_date = $4
        ORDER BY fetched_at DESC
        LIMIT 1
        "#,
    )
    .bind(provider)
    .bind(external_hotel_id)
    .bind(checkin)
    .bind(checkout)
    .fetch_optional(pool)
    .await
}

pub async fn find_hotel(
    pool: &PgPool,
    provider: &str,
    external_hotel_id: &str,
) -> Result<Option<ExternalHotel>, sqlx::Error> {
    sqlx::query_as::<_, ExternalHotel>(
        "SELECT * FROM external_hotels WHERE provider = $1 AND external_hotel_id = $2",
    )
    .bind(provider)
    .bind(external_hotel_id)
    .fetch_optional(pool)
    .await
}

async fn snapshots_for_stay(
    pool: &PgPool,
    provider: &str,
    external_hotel_id: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Result<Vec<PriceSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, PriceSnapshot>(
        r#"
        SELECT * FROM price_snapshots
        WHERE provider = $1 AND external_hotel_id = $2
          AND checkin_date = $3 AND checkout_date = $4
        ORDER BY fetched_at
        "#,
    )
    .bind(provider)
    .bind(external_hotel_id)
    .bind(checkin)
    .bind(checkout)
    .fetch_all(pool)
    .await
}

pub async fn snapshots_in_range(
    pool: &PgPool,
    provider: &str,
    external_hotel_id: &str,
    checkin_from: NaiveDate,
    checkout_to: NaiveDate,
) -> Result<Vec<PriceSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, PriceSnapshot>(
        r#"
        SELECT * FROM price_snapshots
        WHERE provider = $1 AND external_hotel_id = $2
          AND checkin_date >= $3 AND checkout_date <= $4
        ORDER BY checkin_date
        "#,
    )
    .bind(provider)
    .bind(external_hotel_id)
    .bind(checkin_from)
    .bind(checkout_to)
    .fetch_all(pool)
    .await
}
