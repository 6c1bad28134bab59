use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use task_manager_server::{
    auth::{AuthMiddleware, TokenService},
    config::Config,
    routes, Store,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    log::info!("Connected to the database");

    let store = Store::postgres(pool.clone())
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let store = web::Data::new(store);
    let tokens = web::Data::new(TokenService::new(config.access_token_secret.as_bytes()));

    log::info!("Server is running on {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(tokens.clone())
            .wrap(AuthMiddleware)
            .wrap(routes::cors())
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    pool.close().await;
    log::info!("Server stopped, database connections closed");
    Ok(())
}
