use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Availability reported in UI rows when no snapshot exists for the day.
pub const NO_DATA: &str = "NO_DATA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    Available,
    Limited,
    SoldOut,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Available => "AVAILABLE",
            Availability::Limited => "LIMITED",
            Availability::SoldOut => "SOLD_OUT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(Availability::Available),
            "LIMITED" => Some(Availability::Limited),
            "SOLD_OUT" => Some(Availability::SoldOut),
            _ => None,
        }
    }
}

/// One recorded observation of a hotel's price for a given stay.
/// Append-only: snapshots are inserted, never updated. Freshness is decided
/// by filtering on `fetched_at`, not by invalidating rows.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct PriceSnapshot {
    pub id: i64,
    pub provider: String,
    pub external_hotel_id: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub currency: String,
    pub price_total: Decimal,
    pub price_per_night: Option<Decimal>,
    pub availability: String,
    pub source: Option<String>,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

/// Single-day price for one hotel, joined with the cached hotel row.
#[derive(Debug, Serialize)]
pub struct PriceRow {
    pub hotel_id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub currency: Option<String>,
    pub price: Option<Decimal>,
    pub availability: String,
}

#[derive(Debug, Serialize)]
pub struct MultiPriceSimple {
    pub hotel_id: String,
    pub name: Option<String>,
    pub total: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct NightlySimpleRow {
    pub hotel_name: Option<String>,
    pub date: NaiveDate,
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct NightlySimpleResponse {
    pub external_hotel_id: String,
    pub name: String,
    pub nights: Vec<NightlySimpleRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_round_trips_through_strings() {
        for a in [
            Availability::Available,
            Availability::Limited,
            Availability::SoldOut,
        ] {
            assert_eq!(Availability::parse(a.as_str()), Some(a));
        }
        assert_eq!(Availability::parse("NO_DATA"), None);
    }
}
