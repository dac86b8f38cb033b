//! Drives the router end to end against an in-memory Steam.

use std::collections::HashMap;
use std::io::Cursor;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use image::{ImageFormat, Rgba, RgbaImage};
use steam_stat_card::api::{CommunityProfile, OwnedGame, PlayerSummary, PriceOverview, SteamApi};
use steam_stat_card::cache::CacheStore;
use steam_stat_card::card::{Assets, Palette};
use steam_stat_card::enums::ProfileVisibility;
use steam_stat_card::server::{self, AppState, CACHE_CONTROL_VALUE};
use steam_stat_card::types::AppId;
use steam_stat_card::{Error, SteamID};
use tower::ServiceExt;

const STEAMID: u64 = 76561197960287930;
const PRIVATE_STEAMID: u64 = 76561197960287931;
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Default)]
struct FakeSteam {
    resolves: AtomicUsize,
}

#[async_trait]
impl SteamApi for FakeSteam {
    async fn resolve_vanity_url(&self, vanity: &str) -> Result<SteamID, Error> {
        self.resolves.fetch_add(1, Ordering::SeqCst);

        match vanity {
            "gaben" => Ok(SteamID::from(STEAMID)),
            "hermit" => Ok(SteamID::from(PRIVATE_STEAMID)),
            _ => Err(Error::Response("No match".into())),
        }
    }

    async fn get_player_summary(&self, steamid: SteamID) -> Result<PlayerSummary, Error> {
        Ok(PlayerSummary {
            steamid: u64::from(steamid),
            personaname: "Rabscuttle".into(),
            communityvisibilitystate: ProfileVisibility::Public,
            avatarfull: Some("https://avatars.test/full.png".into()),
            lastlogoff: Some(1_717_200_000),
            timecreated: Some(1_063_407_589),
            loccountrycode: Some("US".into()),
        })
    }

    async fn get_community_profile(&self, _steamid: SteamID) -> Result<CommunityProfile, Error> {
        Ok(CommunityProfile {
            online_state: Some("online".into()),
            location: Some("Bellevue, Washington, United States".into()),
        })
    }

    async fn get_owned_games(&self, steamid: SteamID) -> Result<Vec<OwnedGame>, Error> {
        if u64::from(steamid) == PRIVATE_STEAMID {
            return Err(Error::PrivateGamesList);
        }

        Ok(vec![
            OwnedGame {
                appid: 440,
                playtime_forever: 60_000,
            },
            OwnedGame {
                appid: 620,
                playtime_forever: 900,
            },
            OwnedGame {
                appid: 70,
                playtime_forever: 0,
            },
        ])
    }

    async fn get_app_prices(
        &self,
        appids: &[AppId],
        _country_code: &str,
    ) -> Result<HashMap<AppId, PriceOverview>, Error> {
        Ok(appids
            .iter()
            .filter(|appid| **appid != 440)
            .map(|appid| (*appid, PriceOverview {
                currency: "USD".into(),
                initial: 999,
                final_price: 499,
                discount_percent: 50,
            }))
            .collect())
    }

    async fn get_image(&self, _url: &str) -> Result<Bytes, Error> {
        let mut png = Cursor::new(Vec::new());

        RgbaImage::from_pixel(184, 184, Rgba([200, 40, 40, 255]))
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|error| Error::Response(error.to_string()))?;

        Ok(Bytes::from(png.into_inner()))
    }
}

fn app() -> (Arc<FakeSteam>, Router) {
    let api = Arc::new(FakeSteam::default());
    let assets = Assets::load(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"));
    let state = AppState::new(Arc::clone(&api) as Arc<dyn SteamApi>, CacheStore::default(), Arc::new(assets));

    (api, server::router(state))
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

fn assert_cache_header(response: &Response) {
    assert_eq!(response.headers()[CACHE_CONTROL], CACHE_CONTROL_VALUE);
}

fn rgba(color: steam_stat_card::card::Color) -> [u8; 4] {
    [color.r, color.g, color.b, 255]
}

async fn decode_card(response: Response) -> RgbaImage {
    let body = body_bytes(response).await;

    assert_eq!(body[..8], PNG_SIGNATURE);

    image::load_from_memory(&body).unwrap().to_rgba8()
}

fn drawn_pixels(card: &RgbaImage, x: Range<u32>, y: Range<u32>) -> usize {
    let background = rgba(Palette::STEAM.background);

    y.flat_map(|y| x.clone().map(move |x| (x, y)))
        .filter(|(x, y)| card.get_pixel(*x, *y).0 != background)
        .count()
}

#[tokio::test]
async fn renders_card_for_vanity_name() {
    let (_api, app) = app();
    let response = get(app, "/api/card?uid=gaben").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    assert_cache_header(&response);

    let card = decode_card(response).await;

    assert_eq!(card.dimensions(), (705, 385));
    // Two of three games played.
    assert_eq!(card.get_pixel(300, 308).0, rgba(Palette::STEAM.progress_fill));
    assert_eq!(card.get_pixel(200, 370).0, rgba(Palette::STEAM.background));
    // Display name.
    assert!(drawn_pixels(&card, 25..220, 165..195) > 100);
}

#[tokio::test]
async fn numeric_ids_are_not_resolved() {
    let (api, app) = app();
    let response = get(app, "/api/card?uid=76561197960287930&country_code=de").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(api.resolves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn restricted_library_renders_message_instead_of_stats() {
    let (_api, app) = app();
    let response = get(app, "/api/card?uid=hermit").await;

    assert_eq!(response.status(), StatusCode::OK);

    let card = decode_card(response).await;

    assert_eq!(card.get_pixel(300, 308).0, rgba(Palette::STEAM.background));
    assert!(drawn_pixels(&card, 330..640, 180..205) > 100);
}

#[tokio::test]
async fn theme_wins_over_individual_colors() {
    let (_api, app) = app();
    let response = get(app, "/api/card?uid=gaben&theme=dark&bg_color=fff").await;
    let card = decode_card(response).await;

    assert_eq!(card.get_pixel(200, 370).0, rgba(Palette::DARK.background));
}

#[tokio::test]
async fn individual_colors_apply_without_theme() {
    let (_api, app) = app();
    let response = get(app, "/api/card?uid=gaben&bg_color=%23ffffff&progbar_color=ff0000&border_width=abc").await;
    let card = decode_card(response).await;

    assert_eq!(card.get_pixel(200, 370).0, [255, 255, 255, 255]);
    assert_eq!(card.get_pixel(300, 308).0, [255, 0, 0, 255]);
}

#[tokio::test]
async fn failed_resolution_is_a_generic_error() {
    let (_api, app) = app();
    let response = get(app, "/api/card?uid=nobody").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cache_header(&response);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();

    assert_eq!(body, serde_json::json!({ "error": "Failed to generate image" }));
}

#[tokio::test]
async fn missing_uid_is_a_generic_error() {
    let (api, app) = app();

    for uri in ["/api/card", "/api/card?uid=", "/api/card?theme=dark"] {
        let response = get(app.clone(), uri).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cache_header(&response);
    }

    assert_eq!(api.resolves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_check() {
    let (_api, app) = app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();

    assert_eq!(body["status"], "ok");
}
