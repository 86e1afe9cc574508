use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use planboard::{
    auth::TokenService,
    config::Config,
    routes,
    store::{MemoryStore, PgStore},
    AppState,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let tokens = TokenService::new(&config.jwt_secret);

    let state = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.bcrypt_cost)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            store
                .ensure_schema()
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            log::info!("using PostgreSQL store");
            AppState::new(Arc::new(store), tokens.clone())
        }
        None => {
            log::warn!("DATABASE_URL not set, data will not survive a restart");
            AppState::new(Arc::new(MemoryStore::new(config.bcrypt_cost)), tokens.clone())
        }
    };
    let state = web::Data::new(state);

    log::info!("Starting planboard server at {}", config.server_url());
    HttpServer::new(move || {
        let tokens = tokens.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(move |cfg| routes::config(cfg, tokens))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
