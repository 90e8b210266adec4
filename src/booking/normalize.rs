//! Turns a raw `getHotelDetails` provider response into a normalized price
//! record. The provider JSON is loosely typed, so fields are read with
//! fallbacks rather than strict deserialization.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::snapshot::Availability;

/// A provider response reduced to the fields the system stores.
#[derive(Debug)]
pub struct NormalizedStay {
    pub external_hotel_id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub currency: String,
    pub price_total: Decimal,
    pub price_per_night: Decimal,
    pub availability: Availability,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

pub fn normalize(root: &Value) -> Result<NormalizedStay, ApiError> {
    let d = root.get("data").unwrap_or(&Value::Null);

    let external_hotel_id = d
        .get("hotel_id")
        .and_then(text)
        .ok_or_else(|| ApiError::BadRequest("missing hotel_id in booking payload".into()))?;

    let name = d.get("hotel_name").and_then(text);
    let url = d.get("url").and_then(text);
    // city_trans is the transliterated name; prefer it when present.
    let city = d
        .get("city_trans")
        .and_then(text)
        .or_else(|| d.get("city").and_then(text));
    let state = parse_state(d.get("zip").and_then(Value::as_str));
    let country = d
        .get("countrycode")
        .and_then(Value::as_str)
        .unwrap_or("US")
        .to_uppercase();

    let gross = d
        .pointer("/product_price_breakdown/gross_amount_hotel_currency")
        .unwrap_or(&Value::Null);
    let currency = gross
        .get("currency")
        .and_then(text)
        .or_else(|| d.get("currency_code").and_then(text))
        .unwrap_or_else(|| "USD".to_string());
    let price_total = gross
        .get("value")
        .and_then(|v| serde_json::from_value::<Decimal>(v.clone()).ok())
        .unwrap_or(Decimal::ZERO);

    let checkin = required_date(d, "arrival_date")?;
    let checkout = required_date(d, "departure_date")?;

    let nights = (checkout - checkin).num_days();
    let price_per_night = if nights > 0 {
        per_night_price(price_total, nights)
    } else {
        price_total
    };

    let availability = map_availability(
        d.get("soldout").and_then(Value::as_i64).unwrap_or(0),
        d.get("available_rooms").and_then(Value::as_i64).unwrap_or(0),
        d.get("is_closed").and_then(Value::as_i64).unwrap_or(0),
    );

    Ok(NormalizedStay {
        external_hotel_id,
        name,
        url,
        city,
        state,
        country,
        currency,
        price_total,
        price_per_night,
        availability,
        checkin,
        checkout,
    })
}

/// Total divided evenly across nights, rounded to 2 decimal places, half-up.
pub fn per_night_price(total: Decimal, nights: i64) -> Decimal {
    (total / Decimal::from(nights)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The provider reports room counts rather than a status; collapse them into
/// the three-level availability stored on snapshots.
pub fn map_availability(soldout: i64, available_rooms: i64, is_closed: i64) -> Availability {
    if soldout == 1 || is_closed == 1 || available_rooms <= 0 {
        Availability::SoldOut
    } else if available_rooms <= 3 {
        Availability::Limited
    } else {
        Availability::Available
    }
}

// The provider packs the state into the zip field ("NY 10019").
fn parse_state(zip: Option<&str>) -> Option<String> {
    let first = zip?.split_whitespace().next()?;
    Some(first.to_uppercase())
}

fn required_date(d: &Value, field: &str) -> Result<NaiveDate, ApiError> {
    let raw = d
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} is missing or empty", field)))?;
    raw.parse::<NaiveDate>()
        .map_err(|_| ApiError::BadRequest(format!("{} is not a valid date: {}", field, raw)))
}

// Hotel ids arrive as numbers, names as strings; accept both.
fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "data": {
                "hotel_id": 1046167,
                "hotel_name": "The Manhattan Club",
                "url": "https://www.booking.com/hotel/us/the-manhattan-club.html",
                "city": "New York",
                "city_trans": "New York",
                "zip": "NY 10019",
                "countrycode": "us",
                "currency_code": "USD",
                "arrival_date": "2025-08-27",
                "departure_date": "2025-08-30",
                "soldout": 0,
                "available_rooms": 5,
                "is_closed": 0,
                "product_price_breakdown": {
                    "gross_amount_hotel_currency": {
                        "currency": "USD",
                        "value": 1246.05
                    }
                }
            }
        })
    }

    #[test]
    fn normalizes_full_payload() {
        let n = normalize(&sample_payload()).unwrap();
        assert_eq!(n.external_hotel_id, "1046167");
        assert_eq!(n.name.as_deref(), Some("The Manhattan Club"));
        assert_eq!(n.city.as_deref(), Some("New York"));
        assert_eq!(n.state.as_deref(), Some("NY"));
        assert_eq!(n.country, "US");
        assert_eq!(n.currency, "USD");
        assert_eq!(n.price_total, Decimal::new(124605, 2));
        // 1246.05 / 3 nights = 415.35
        assert_eq!(n.price_per_night, Decimal::new(41535, 2));
        assert_eq!(n.availability, Availability::Available);
        assert_eq!(n.checkin, "2025-08-27".parse::<NaiveDate>().unwrap());
        assert_eq!(n.checkout, "2025-08-30".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn missing_hotel_id_is_an_error() {
        let payload = json!({"data": {"arrival_date": "2025-08-27", "departure_date": "2025-08-28"}});
        assert!(normalize(&payload).is_err());
    }

    #[test]
    fn missing_dates_are_an_error() {
        let mut payload = sample_payload();
        payload["data"]["arrival_date"] = json!("");
        assert!(normalize(&payload).is_err());

        let mut payload = sample_payload();
        payload["data"].as_object_mut().unwrap().remove("departure_date");
        assert!(normalize(&payload).is_err());
    }

    #[test]
    fn availability_mapping() {
        assert_eq!(map_availability(1, 10, 0), Availability::SoldOut);
        assert_eq!(map_availability(0, 10, 1), Availability::SoldOut);
        assert_eq!(map_availability(0, 0, 0), Availability::SoldOut);
        assert_eq!(map_availability(0, 3, 0), Availability::Limited);
        assert_eq!(map_availability(0, 1, 0), Availability::Limited);
        assert_eq!(map_availability(0, 4, 0), Availability::Available);
    }

    #[test]
    fn currency_falls_back_to_currency_code_then_usd() {
        let mut payload = sample_payload();
        payload["data"]["product_price_breakdown"]["gross_amount_hotel_currency"]
            .as_object_mut()
            .unwrap()
            .remove("currency");
        let n = normalize(&payload).unwrap();
        assert_eq!(n.currency, "USD");

        payload["data"].as_object_mut().unwrap().remove("currency_code");
        payload["data"]["product_price_breakdown"] = json!({});
        let n = normalize(&payload).unwrap();
        assert_eq!(n.currency, "USD");
        assert_eq!(n.price_total, Decimal::ZERO);
    }

    #[test]
    fn per_night_price_rounds_half_up() {
        // 100 / 3 = 33.333... -> 33.33
        assert_eq!(per_night_price(Decimal::from(100), 3), Decimal::new(3333, 2));
        // 0.105 midpoint rounds away from zero -> 0.11 per night over 1 night
        assert_eq!(per_night_price(Decimal::new(105, 3), 1), Decimal::new(11, 2));
    }

    #[test]
    fn state_parsed_from_zip_first_token() {
        let mut payload = sample_payload();
        payload["data"]["zip"] = json!("ca 94103");
        let n = normalize(&payload).unwrap();
        assert_eq!(n.state.as_deref(), Some("CA"));

        payload["data"].as_object_mut().unwrap().remove("zip");
        let n = normalize(&payload).unwrap();
        assert_eq!(n.state, None);
    }
}
