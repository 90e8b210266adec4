pub mod admin;
pub mod owner_ui;
pub mod pricing;
pub mod users;
