//! HTTP interface.

mod error;
mod handler;

pub use error::{AppError, GENERIC_ERROR_MESSAGE};
pub use handler::{CardQuery, DEFAULT_COUNTRY_CODE};

use crate::api::SteamApi;
use crate::avatar::AvatarLoader;
use crate::cache::CacheStore;
use crate::card::{Assets, CardRenderer};
use crate::library::LibraryAggregator;
use crate::profile::ProfileResolver;
use std::sync::Arc;
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Sent with every response, failures included.
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=3600, s-maxage=3600, stale-while-revalidate=86400";

/// Shared state of the handlers. Cloning is cheap; clones share caches and assets.
#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileResolver,
    pub library: LibraryAggregator,
    pub avatars: AvatarLoader,
    pub renderer: CardRenderer,
}

impl AppState {
    pub fn new(
        api: Arc<dyn SteamApi>,
        cache: CacheStore,
        assets: Arc<Assets>,
    ) -> Self {
        Self {
            profiles: ProfileResolver::new(Arc::clone(&api), cache.clone()),
            library: LibraryAggregator::new(Arc::clone(&api), cache.clone()),
            avatars: AvatarLoader::new(api, cache),
            renderer: CardRenderer::new(assets),
        }
    }
}

/// Builds the router with all middleware. Layers apply bottom-up, so the cache header is also
/// set on responses produced by panic recovery.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/card", get(handler::get_card))
        .route("/health", get(handler::health))
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_VALUE),
        ))
        .with_state(state)
}
