//! Persistence for normalized provider data: hotel upserts and the
//! append-only snapshot log.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::booking::normalize::NormalizedStay;
use crate::booking::{PROVIDER, SOURCE};
use crate::models::external_hotel::ExternalHotel;
use crate::models::snapshot::PriceSnapshot;

/// Insert the hotel or refresh its cached fields, bumping `last_seen_at`.
pub async fn upsert_hotel(pool: &PgPool, stay: &NormalizedStay) -> Result<ExternalHotel, sqlx::Error> {
    sqlx::query_as::<_, ExternalHotel>(
        r#"
        INSERT INTO external_hotels
            (provider, external_hotel_id, name_cached, url_cached,
             city_cached, state_cached, country_cached, is_active, last_seen_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, now())
        ON CONFLICT (provider, external_hotel_id) DO UPDATE
        SET name_cached    = EXCLUDED.name_cached,
            url_cached     = EXCLUDED.url_cached,
            city_cached    = EXCLUDED.city_cached,
            state_cached   = EXCLUDED.state_cached,
            country_cached = EXCLUDED.country_cached,
            is_active      = TRUE,
            last_seen_at   = now(),
            updated_at     = now()
        RETURNING *
        "#,
    )
    .bind(PROVIDER)
    .bind(&stay.external_hotel_id)
    .bind(&stay.name)
    .bind(&stay.url)
    .bind(&stay.city)
    .bind(&stay.state)
    .bind(&stay.country)
    .fetch_one(pool)
    .await
}

/// Append one snapshot row. Snapshots are never updated afterwards.
#[allow(clippy::too_many_arguments)]
pub async fn insert_snapshot(
    pool: &PgPool,
    provider: &str,
    external_hotel_id: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
    currency: &str,
    price_total: Decimal,
    price_per_night: Option<Decimal>,
    availability: &str,
) -> Result<PriceSnapshot, sqlx::Error> {
    sqlx::query_as::<_, PriceSnapshot>(
        r#"
        INSERT INTO price_snapshots
            (provider, external_hotel_id, checkin_date, checkout_date,
             currency, price_total, price_per_night, availability, source)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(provider)
    .bind(external_hotel_id)
    .bind(checkin)
    .bind(checkout)
    .bind(currency)
    .bind(price_total)
    .bind(price_per_night)
    .bind(availability)
    .bind(SOURCE)
    .fetch_one(pool)
    .await
}

/// Store the normalized stay: hotel upsert followed by a snapshot insert.
pub async fn save_stay(pool: &PgPool, stay: &NormalizedStay) -> Result<PriceSnapshot, sqlx::Error> {
    upsert_hotel(pool, stay).await?;
    insert_snapshot(
        pool,
        PROVIDER,
        &stay.external_hotel_id,
        stay.checkin,
        stay.checkout,
        &stay.currency,
        stay.price_total,
        Some(stay.price_per_night),
        stay.availability.as_str(),
    )
    .await
}
