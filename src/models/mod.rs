pub mod external_hotel;
pub mod owner;
pub mod price_table;
pub mod snapshot;
pub mod user;
