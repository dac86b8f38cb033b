use dotenv::dotenv;
use steam_stat_card::api::{SteamApi, SteamWebAPI};
use steam_stat_card::cache::CacheStore;
use steam_stat_card::card::Assets;
use steam_stat_card::server::{self, AppState};
use steam_stat_card::Config;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let api: Arc<dyn SteamApi> = Arc::new(SteamWebAPI::builder(config.steam_api_key.clone()).build()?);
    let assets = Arc::new(Assets::load(&config.assets_dir));
    let state = AppState::new(api, CacheStore::new(config.cache_ttls), assets);
    let app = server::router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;

    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
