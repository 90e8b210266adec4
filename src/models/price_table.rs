use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A curated list of hotels (the owner's own plus competitors) for one city.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct PriceTable {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub city_label: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Link row between a price table and an external hotel.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct PriceTableExternalHotel {
    pub price_table_id: i64,
    pub external_hotel_ref: i64,
    pub is_owner_hotel: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreatePriceTableRequest {
    pub name: String,
    pub city_label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceTableResponse {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub city_label: Option<String>,
}

impl From<PriceTable> for PriceTableResponse {
    fn from(pt: PriceTable) -> Self {
        Self {
            id: pt.id,
            owner_id: pt.owner_id,
            name: pt.name,
            city_label: pt.city_label,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddHotelToPriceTableRequest {
    pub external_hotel_id: String,
    /// True for the owner's own hotel, false for a competitor.
    pub is_owner_hotel: bool,
    pub provider: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TableHotelRow {
    pub external_hotel_id: String,
    pub name: Option<String>,
    pub owner: bool,
}

/// One row of the single-day price-table view.
#[derive(Debug, Serialize)]
pub struct SingleDayTablePriceRow {
    pub external_hotel_id: String,
    pub name: String,
    pub currency: Option<String>,
    pub price: Option<Decimal>,
    pub availability: String,
    pub owner: bool,
}

#[derive(Debug, Serialize)]
pub struct SingleDayListRow {
    pub price_table_id: i64,
    pub hotel_id: String,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub owner: bool,
}
