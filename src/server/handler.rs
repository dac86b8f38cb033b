use super::error::AppError;
use super::AppState;
use crate::card::{Card, RenderConfig, RenderOverrides};
use crate::error::ProfileError;
use crate::time::get_server_time_now;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Prices are looked up in this country's currency unless another is given.
pub const DEFAULT_COUNTRY_CODE: &str = "US";

/// Query string of `GET /api/card`.
#[derive(Deserialize, Debug, Default)]
pub struct CardQuery {
    /// Vanity name or 64-bit SteamID.
    pub uid: Option<String>,
    pub country_code: Option<String>,
    #[serde(flatten)]
    pub overrides: RenderOverrides,
}

/// GET /api/card
pub async fn get_card(
    State(state): State<AppState>,
    query: Result<Query<CardQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let uid = query.uid
        .as_deref()
        .map(str::trim)
        .filter(|uid| !uid.is_empty())
        .ok_or(ProfileError::MissingIdentifier)?;
    let country_code = query.country_code
        .as_deref()
        .map(str::trim)
        .filter(|country_code| !country_code.is_empty())
        .unwrap_or(DEFAULT_COUNTRY_CODE);
    let config = RenderConfig::from_overrides(&query.overrides);
    let steamid = state.profiles.resolve_steamid(uid).await?;
    let (profile, library) = tokio::join!(
        state.profiles.get_profile(uid),
        state.library.get_library(steamid, country_code),
    );
    let profile = profile?;
    let avatar = match &profile.avatar_url {
        Some(url) => state.avatars.load(url).await,
        None => None,
    };
    let renderer = state.renderer.clone();
    let png = tokio::task::spawn_blocking(move || {
        renderer.render(&Card {
            profile: &profile,
            library: &library,
            avatar: avatar.as_ref(),
            config: &config,
            now: get_server_time_now(),
        })
    }).await??;

    log::debug!("Rendered card for {uid} ({} bytes)", png.len());

    Ok(([(CONTENT_TYPE, "image/png")], png).into_response())
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
