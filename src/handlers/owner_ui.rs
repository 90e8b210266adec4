//! Owner-facing views: their price tables, per-table price grids and the
//! bulk fetch triggers behind the dashboard buttons.

use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;

use crate::booking::{BookingApiClient, PROVIDER};
use crate::config::Config;
use crate::errors::ApiError;
use crate::handlers::pricing::{find_hotel, latest_snapshot, snapshots_in_range};
use crate::models::external_hotel::ExternalHotel;
use crate::models::price_table::{
    PriceTable, PriceTableExternalHotel, PriceTableResponse, SingleDayTablePriceRow, TableHotelRow,
};
use crate::models::snapshot::{NightlySimpleResponse, NightlySimpleRow, NO_DATA};
use crate::services::fetch;

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: NaiveDate,
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_provider() -> String {
    PROVIDER.to_string()
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Inclusive first night.
    pub from: NaiveDate,
    /// Exclusive end; nights fetched are [from, to).
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct PerNightQuery {
    pub provider: String,
    pub external_hotel_id: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

/// GET /api/ui/owner/{owner_id}/price-tables
pub async fn owner_tables(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let owner_id = path.into_inner();
    let tables = sqlx::query_as::<_, PriceTable>(
        "SELECT * FROM price_tables WHERE owner_id = $1 ORDER BY id",
    )
    .bind(owner_id)
    .fetch_all(pool.get_ref())
    .await?;
    let responses: Vec<PriceTableResponse> =
        tables.into_iter().map(PriceTableResponse::from).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// GET /api/ui/price-tables/{table_id}/hotels
pub async fn table_hotels(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let table_id = path.into_inner();
    require_table(pool.get_ref(), table_id).await?;

    let links = table_links(pool.get_ref(), table_id).await?;
    if links.is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<TableHotelRow>::new()));
    }

    let hotels_by_id = hotels_for_links(pool.get_ref(), &links).await?;
    let rows: Vec<TableHotelRow> = links
        .iter()
        .filter_map(|link| {
            let hotel = hotels_by_id.get(&link.external_hotel_ref)?;
            Some(TableHotelRow {
                external_hotel_id: hotel.external_hotel_id.clone(),
                name: hotel.name_cached.clone(),
                owner: link.is_owner_hotel,
            })
        })
        .collect();
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/ui/price-tables/{table_id}/single-day — the main comparison grid:
/// latest price per linked hotel for one night, owner rows first.
pub async fn table_single_day(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    params: web::Query<DayQuery>,
) -> Result<HttpResponse, ApiError> {
    let table_id = path.into_inner();
    require_table(pool.get_ref(), table_id).await?;

    let checkout = params.date + chrono::Duration::days(1);
    let links = table_links(pool.get_ref(), table_id).await?;
    let hotels_by_id = hotels_for_links(pool.get_ref(), &links).await?;

    let mut rows = Vec::with_capacity(links.len());
    for link in &links {
        let Some(hotel) = hotels_by_id.get(&link.external_hotel_ref) else {
            continue;
        };
        let snapshot = latest_snapshot(
            pool.get_ref(),
            &hotel.provider,
            &hotel.external_hotel_id,
            params.date,
            checkout,
        )
        .await?;

        let name = hotel
            .name_cached
            .clone()
            .unwrap_or_else(|| "(unknown)".to_string());
        rows.push(match snapshot {
            Some(s) => SingleDayTablePriceRow {
                external_hotel_id: hotel.external_hotel_id.clone(),
                name,
                currency: Some(s.currency),
                price: Some(s.price_total),
                availability: s.availability,
                owner: link.is_owner_hotel,
            },
            None => SingleDayTablePriceRow {
                external_hotel_id: hotel.external_hotel_id.clone(),
                name,
                currency: None,
                price: None,
                availability: NO_DATA.to_string(),
                owner: link.is_owner_hotel,
            },
        });
    }

    // Owner's own hotel on top.
    rows.sort_by(|a, b| b.owner.cmp(&a.owner));
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/ui/hotel/per-night-simple — one row per night in
/// [checkin, checkout), null price where no snapshot exists.
pub async fn per_night_simple(
    pool: web::Data<PgPool>,
    params: web::Query<PerNightQuery>,
) -> Result<HttpResponse, ApiError> {
    let hotel = find_hotel(pool.get_ref(), &params.provider, &params.external_hotel_id).await?;
    let name = hotel
        .and_then(|h| h.name_cached)
        .unwrap_or_else(|| "(unknown)".to_string());

    let snapshots = snapshots_in_range(
        pool.get_ref(),
        &params.provider,
        &params.external_hotel_id,
        params.checkin,
        params.checkout,
    )
    .await?;

    // Index by checkin date; keep the first row per night.
    let mut by_checkin = HashMap::new();
    for s in snapshots {
        by_checkin.entry(s.checkin_date).or_insert(s);
    }

    let mut nights = Vec::new();
    let mut d = params.checkin;
    while d < params.checkout {
        nights.push(NightlySimpleRow {
            hotel_name: Some(name.clone()),
            date: d,
            price: by_checkin.get(&d).map(|s| s.price_total),
        });
        d += chrono::Duration::days(1);
    }

    Ok(HttpResponse::Ok().json(NightlySimpleResponse {
        external_hotel_id: params.external_hotel_id.clone(),
        name,
        nights,
    }))
}

/// GET /api/ui/owner/{owner_id}/price-tables/{table_id}/fetch — fetch one
/// night for every hotel linked to the table.
pub async fn fetch_table_for_day(
    pool: web::Data<PgPool>,
    api: web::Data<BookingApiClient>,
    path: web::Path<(i64, i64)>,
    params: web::Query<DayQuery>,
) -> Result<HttpResponse, ApiError> {
    let (owner_id, table_id) = path.into_inner();
    require_owned_table(pool.get_ref(), owner_id, table_id).await?;

    let checkout = params.date + chrono::Duration::days(1);
    let links = table_links(pool.get_ref(), table_id).await?;
    if links.is_empty() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": format!("No hotels linked to table {}", table_id)
        })));
    }
    let hotels_by_id = hotels_for_links(pool.get_ref(), &links).await?;

    let mut count = 0;
    for hotel in hotels_by_id.values() {
        fetch::fetch_and_save(
            pool.get_ref(),
            api.get_ref(),
            &hotel.external_hotel_id,
            params.date,
            checkout,
        )
        .await?;
        count += 1;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Fetched prices for {} hotels on {}", count, params.date)
    })))
}

/// GET /api/ui/owner/{owner_id}/hotel/{external_hotel_id}/fetch-range —
/// fetch each night in [from, to) for one hotel.
pub async fn fetch_hotel_range(
    pool: web::Data<PgPool>,
    api: web::Data<BookingApiClient>,
    path: web::Path<(i64, String)>,
    params: web::Query<RangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let (_owner_id, external_hotel_id) = path.into_inner();

    let mut nights = 0;
    let mut d = params.from;
    while d < params.to {
        fetch::fetch_and_save(
            pool.get_ref(),
            api.get_ref(),
            &external_hotel_id,
            d,
            d + chrono::Duration::days(1),
        )
        .await?;
        nights += 1;
        d += chrono::Duration::days(1);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!(
            "Fetched {} night(s) for hotel {} from {} to {}",
            nights, external_hotel_id, params.from, params.to
        )
    })))
}

/// GET /api/ui/owner/{owner_id}/price-tables/{table_id}/fetch-range — fetch
/// every night for every linked hotel, optionally throttled between calls to
/// avoid provider rate limits on bursts.
pub async fn fetch_table_range(
    pool: web::Data<PgPool>,
    api: web::Data<BookingApiClient>,
    config: web::Data<Config>,
    path: web::Path<(i64, i64)>,
    params: web::Query<RangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let (owner_id, table_id) = path.into_inner();
    require_owned_table(pool.get_ref(), owner_id, table_id).await?;

    let links = table_links(pool.get_ref(), table_id).await?;
    if links.is_empty() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": format!("No hotels linked to table {}", table_id)
        })));
    }
    let hotels_by_id = hotels_for_links(pool.get_ref(), &links).await?;

    let throttle = config.fetch_throttle_ms;
    let mut hotels_count = 0;
    let mut nights_count = 0;

    for hotel in hotels_by_id.values() {
        hotels_count += 1;
        let mut d = params.from;
        while d < params.to {
            fetch::fetch_and_save(
                pool.get_ref(),
                api.get_ref(),
                &hotel.external_hotel_id,
                d,
                d + chrono::Duration::days(1),
            )
            .await?;
            nights_count += 1;
            if throttle > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(throttle)).await;
            }
            d += chrono::Duration::days(1);
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!(
            "Fetched {} night(s) across {} hotel(s) for table {} from {} to {}",
            nights_count, hotels_count, table_id, params.from, params.to
        )
    })))
}

async fn require_table(pool: &PgPool, table_id: i64) -> Result<PriceTable, ApiError> {
    sqlx::query_as::<_, PriceTable>("SELECT * FROM price_tables WHERE id = $1")
        .bind(table_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("price table not found".to_string()))
}

async fn require_owned_table(
    pool: &PgPool,
    owner_id: i64,
    table_id: i64,
) -> Result<PriceTable, ApiError> {
    let table = require_table(pool, table_id).await?;
    if table.owner_id != owner_id {
        return Err(ApiError::Forbidden(
            "this table does not belong to you".to_string(),
        ));
    }
    Ok(table)
}

async fn table_links(
    pool: &PgPool,
    table_id: i64,
) -> Result<Vec<PriceTableExternalHotel>, sqlx::Error> {
    sqlx::query_as::<_, PriceTableExternalHotel>(
        "SELECT * FROM price_table_external_hotels WHERE price_table_id = $1",
    )
    .bind(table_id)
    .fetch_all(pool)
    .await
}

async fn hotels_for_links(
    pool: &PgPool,
    links: &[PriceTableExternalHotel],
) -> Result<HashMap<i64, ExternalHotel>, sqlx::Error> {
    let refs: Vec<i64> = links.iter().map(|l| l.external_hotel_ref).collect();
    let hotels = sqlx::query_as::<_, ExternalHotel>(
        "SELECT * FROM external_hotels WHERE id = ANY($1)",
    )
    .bind(&refs)
    .fetch_all(pool)
    .await?;
    Ok(hotels.into_iter().map(|h| (h.id, h)).collect())
}
