use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

mod booking;
mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use handlers::{admin, owner_ui, pricing, users};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger and environment
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = config::Config::from_env();
    let bind_addr = config.bind_addr.clone();

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config.database_url).await;

    // Run migrations
    log::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let api_client = booking::BookingApiClient::new(&config);

    log::info!("Starting server at http://{}", bind_addr);

    let pool_data = web::Data::new(pool);
    let config_data = web::Data::new(config);
    let client_data = web::Data::new(api_client);

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .app_data(client_data.clone())
            .wrap(middleware::Logger::default())
            .wrap(Cors::permissive())
            .service(
                web::scope("/api")
                    .route("/auth/signup", web::post().to(users::signup))
                    .service(
                        web::scope("/users")
                            .route("", web::get().to(users::get_users))
                            .route("/{id}", web::get().to(users::get_user))
                            .route("/{id}", web::put().to(users::update_user))
                            .route("/{id}", web::delete().to(users::delete_user)),
                    )
                    .service(
                        web::scope("/admin")
                            .route("/users/pending", web::get().to(admin::pending_users))
                            .route("/users/{id}/approve", web::post().to(admin::approve_user))
                            .route("/owners", web::get().to(admin::list_owners))
                            .route(
                                "/owners/{owner_id}/price-tables",
                                web::post().to(admin::create_price_table),
                            )
                            .route(
                                "/price-tables/{table_id}/hotels",
                                web::post().to(admin::add_hotel_to_table),
                            ),
                    )
                    .route("/ingest/booking", web::post().to(pricing::ingest_booking))
                    .service(
                        web::scope("/prices")
                            .route("/single-day", web::get().to(pricing::prices_single_day))
                            .route("/multi-day", web::get().to(pricing::prices_multi_day)),
                    )
                    .service(
                        web::scope("/fetch")
                            .route("/single", web::post().to(pricing::fetch_single))
                            .route("/multi-sum", web::post().to(pricing::fetch_multi_sum)),
                    )
                    .service(
                        web::scope("/ui")
                            .route("/single-day", web::get().to(pricing::ui_single_day))
                            .route(
                                "/multi-day-simple",
                                web::get().to(pricing::ui_multi_day_simple),
                            )
                            .route(
                                "/per-night-simple",
                                web::get().to(pricing::ui_per_night_simple),
                            )
                            .route(
                                "/price-table/single-day",
                                web::get().to(pricing::ui_price_table_single_day),
                            )
                            .route(
                                "/owner/{owner_id}/price-tables",
                                web::get().to(owner_ui::owner_tables),
                            )
                            .route(
                                "/owner/{owner_id}/price-tables/{table_id}/fetch",
                                web::get().to(owner_ui::fetch_table_for_day),
                            )
                            .route(
                                "/owner/{owner_id}/price-tables/{table_id}/fetch-range",
                                web::get().to(owner_ui::fetch_table_range),
                            )
                            .route(
                                "/owner/{owner_id}/hotel/{external_hotel_id}/fetch-range",
                                web::get().to(owner_ui::fetch_hotel_range),
                            )
                            .route(
                                "/price-tables/{table_id}/hotels",
                                web::get().to(owner_ui::table_hotels),
                            )
                            .route(
                                "/price-tables/{table_id}/single-day",
                                web::get().to(owner_ui::table_single_day),
                            )
                            .route(
                                "/hotel/per-night-simple",
                                web::get().to(owner_ui::per_night_simple),
                            ),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
