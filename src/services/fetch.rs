//! Live price fetching: single stays and the nightly-sum aggregation with
//! its freshness cache and retry loop.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::booking::normalize::{normalize, per_night_price};
use crate::booking::{BookingApiClient, PROVIDER};
use crate::errors::ApiError;
use crate::models::snapshot::{Availability, PriceSnapshot};
use crate::services::ingest;

/// Snapshots fetched within this trailing window are reused instead of
/// calling the provider again.
pub const FRESHNESS_WINDOW_MINUTES: i64 = 60;

const MAX_FETCH_ATTEMPTS: u32 = 3;
const MAX_NIGHTS: i64 = 30;

/// Fetch one stay from the provider, normalize it, upsert the hotel and
/// append a snapshot.
pub async fn fetch_and_save(
    pool: &PgPool,
    api: &BookingApiClient,
    hotel_id: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Result<PriceSnapshot, ApiError> {
    let json = api.fetch_stay(hotel_id, checkin, checkout).await?;
    let stay = normalize(&json)?;
    let snapshot = ingest::save_stay(pool, &stay).await?;
    Ok(snapshot)
}

/// Multi-night quote built from nightly prices.
///
/// For each night in [checkin, checkout): reuse a snapshot fetched within the
/// freshness window, otherwise fetch that night with retries. Nightly totals
/// are summed; a SOLD_OUT night aborts the sum and no aggregate is stored,
/// while a LIMITED night downgrades the rolled-up availability. Otherwise an
/// aggregate snapshot for the full range is appended with per-night price =
/// total / nights (2 dp, half-up).
pub async fn fetch_and_save_multi_night_sum(
    pool: &PgPool,
    api: &BookingApiClient,
    hotel_id: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Result<(), ApiError> {
    let nights = (checkout - checkin).num_days();
    if !(1..=MAX_NIGHTS).contains(&nights) {
        return Err(ApiError::BadRequest(format!(
            "nights must be 1..{}, got {}",
            MAX_NIGHTS, nights
        )));
    }

    let mut total = Decimal::ZERO;
    let mut rolled_up = Availability::Available;

    let mut night = checkin;
    while night < checkout {
        let night_out = night + chrono::Duration::days(1);

        let snapshot = match find_fresh(pool, hotel_id, night, night_out).await? {
            Some(s) => s,
            None => fetch_night(pool, api, hotel_id, night, night_out).await?,
        };

        total += snapshot.price_total;
        rolled_up = combine_availability(
            rolled_up,
            Availability::parse(&snapshot.availability).unwrap_or(Availability::Available),
        );
        if rolled_up == Availability::SoldOut {
            break;
        }

        night = night_out;
    }

    if rolled_up == Availability::SoldOut {
        log::info!(
            "hotel {} sold out within {}..{}, skipping aggregate",
            hotel_id,
            checkin,
            checkout
        );
        return Ok(());
    }

    ingest::insert_snapshot(
        pool,
        PROVIDER,
        hotel_id,
        checkin,
        checkout,
        "USD",
        total,
        Some(per_night_price(total, nights)),
        rolled_up.as_str(),
    )
    .await?;
    Ok(())
}

/// Latest snapshot for the exact night fetched within the freshness window.
async fn find_fresh(
    pool: &PgPool,
    hotel_id: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Result<Option<PriceSnapshot>, sqlx::Error> {
    let fresh_after = Utc::now() - chrono::Duration::minutes(FRESHNESS_WINDOW_MINUTES);
    sqlx::query_as::<_, PriceSnapshot>(
        r#"
        SELECT * FROM price_snapshots
        WHERE provider = $1 AND external_hotel_id = $2
          AND checkin_date = $3 AND checkout_date = $4
          AND fetched_at >= $5
        ORDER BY fetched_at DESC
        LIMIT 1
        "#,
    )
    .bind(PROVIDER)
    .bind(hotel_id)
    .bind(checkin)
    .bind(checkout)
    .bind(fresh_after)
    .fetch_optional(pool)
    .await
}

/// One night with up to three attempts; transient failures back off linearly
/// (2s, 4s, capped at 5s). The last error is propagated.
async fn fetch_night(
    pool: &PgPool,
    api: &BookingApiClient,
    hotel_id: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Result<PriceSnapshot, ApiError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match fetch_and_save(pool, api, hotel_id, checkin, checkout).await {
            Ok(snapshot) => return Ok(snapshot),
            Err(err) if attempt < MAX_FETCH_ATTEMPTS => {
                log::warn!(
                    "fetch attempt {}/{} failed for hotel {} night {}: {}",
                    attempt,
                    MAX_FETCH_ATTEMPTS,
                    hotel_id,
                    checkin,
                    err
                );
                tokio::time::sleep(backoff_delay(attempt)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis((2000 * u64::from(attempt)).min(5000))
}

/// SOLD_OUT dominates; LIMITED is sticky once seen.
fn combine_availability(rolled_up: Availability, night: Availability) -> Availability {
    match night {
        Availability::SoldOut => Availability::SoldOut,
        Availability::Limited if rolled_up == Availability::Available => Availability::Limited,
        _ => rolled_up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_is_linear_and_capped() {
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(3), Duration::from_secs(5));
        assert_eq!(backoff_delay(4), Duration::from_secs(5));
    }

    #[test]
    fn sold_out_dominates_roll_up() {
        let mut agg = Availability::Available;
        for night in [
            Availability::Available,
            Availability::Limited,
            Availability::SoldOut,
            Availability::Available,
        ] {
            agg = combine_availability(agg, night);
        }
        assert_eq!(agg, Availability::SoldOut);
    }

    #[test]
    fn limited_is_sticky() {
        let agg = combine_availability(Availability::Available, Availability::Limited);
        assert_eq!(agg, Availability::Limited);
        // A later fully-available night doesn't upgrade the roll-up.
        assert_eq!(
            combine_availability(agg, Availability::Available),
            Availability::Limited
        );
    }

    #[test]
    fn all_available_stays_available() {
        let mut agg = Availability::Available;
        for _ in 0..5 {
            agg = combine_availability(agg, Availability::Available);
        }
        assert_eq!(agg, Availability::Available);
    }
}
