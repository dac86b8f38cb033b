//! Requests to Steam's services.

mod builder;
mod deserializers;
mod helpers;
pub mod response;

pub use builder::SteamWebAPIBuilder;
pub use helpers::parse_community_profile;
pub use response::{CommunityProfile, OwnedGame, PlayerSummary, PriceOverview};

use crate::error::Error;
use crate::types::{AppId, HttpClient};
use helpers::{check_response, parses_response};
use response::{
    AppDetailsResponse,
    GetOwnedGamesResponse,
    GetPlayerSummariesResponse,
    ResolveVanityURLResponse,
};
use std::collections::HashMap;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use steamid_ng::SteamID;

pub(crate) const USER_AGENT_STRING: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// The upstream calls the card service depends on.
#[async_trait]
pub trait SteamApi: Send + Sync {
    /// Resolves a vanity URL name to a [`SteamID`].
    async fn resolve_vanity_url(&self, vanity: &str) -> Result<SteamID, Error>;

    /// Gets the public summary for a player.
    async fn get_player_summary(&self, steamid: SteamID) -> Result<PlayerSummary, Error>;

    /// Gets fields only available on the community profile.
    async fn get_community_profile(&self, steamid: SteamID) -> Result<CommunityProfile, Error>;

    /// Gets every game the player owns, including played free games and free subs. Fails with
    /// [`Error::PrivateGamesList`] when the list cannot be read.
    async fn get_owned_games(&self, steamid: SteamID) -> Result<Vec<OwnedGame>, Error>;

    /// Gets store prices for `appids` in the currency of `country_code`. Apps without a price are
    /// left out of the map.
    async fn get_app_prices(
        &self,
        appids: &[AppId],
        country_code: &str,
    ) -> Result<HashMap<AppId, PriceOverview>, Error>;

    /// Downloads an image.
    async fn get_image(&self, url: &str) -> Result<Bytes, Error>;
}

/// [`SteamApi`] backed by the Steam Web API, the community site and the store.
#[derive(Debug, Clone)]
pub struct SteamWebAPI {
    client: HttpClient,
    api_key: String,
}

impl SteamWebAPI {
    pub const API_HOSTNAME: &'static str = "https://api.steampowered.com";
    pub const COMMUNITY_HOSTNAME: &'static str = "https://steamcommunity.com";
    pub const STORE_HOSTNAME: &'static str = "https://store.steampowered.com";

    /// Builder for constructing a [`SteamWebAPI`].
    pub fn builder(api_key: String) -> SteamWebAPIBuilder {
        SteamWebAPIBuilder::new(api_key)
    }

    fn get_api_url(
        interface: &str,
        method: &str,
        version: usize,
    ) -> String {
        format!("{}/{interface}/{method}/v{version}", Self::API_HOSTNAME)
    }
}

#[async_trait]
impl SteamApi for SteamWebAPI {
    async fn resolve_vanity_url(&self, vanity: &str) -> Result<SteamID, Error> {
        #[derive(Serialize)]
        struct Query<'a> {
            key: &'a str,
            vanityurl: &'a str,
        }

        let uri = Self::get_api_url("ISteamUser", "ResolveVanityURL", 1);
        let response = self.client.get(&uri)
            .query(&Query {
                key: &self.api_key,
                vanityurl: vanity,
            })
            .send()
            .await?;
        let body: ResolveVanityURLResponse = parses_response(response).await?;

        match body.response.steamid {
            Some(steamid) if body.response.success == 1 => Ok(SteamID::from(steamid)),
            _ => Err(Error::Response(
                body.response.message.unwrap_or_else(|| "No match".into())
            )),
        }
    }

    async fn get_player_summary(&self, steamid: SteamID) -> Result<PlayerSummary, Error> {
        #[derive(Serialize)]
        struct Query<'a> {
            key: &'a str,
            steamids: u64,
        }

        let uri = Self::get_api_url("ISteamUser", "GetPlayerSummaries", 2);
        let response = self.client.get(&uri)
            .query(&Query {
                key: &self.api_key,
                steamids: u64::from(steamid),
            })
            .send()
            .await?;
        let body: GetPlayerSummariesResponse = parses_response(response).await?;

        body.response.players
            .into_iter()
            .next()
            .ok_or_else(|| Error::Response("No player found".into()))
    }

    async fn get_community_profile(&self, steamid: SteamID) -> Result<CommunityProfile, Error> {
        let uri = format!("{}/profiles/{}", Self::COMMUNITY_HOSTNAME, u64::from(steamid));
        let response = self.client.get(&uri)
            .query(&[("xml", "1")])
            .send()
            .await?;
        let body = check_response(response).await?;

        parse_community_profile(&String::from_utf8_lossy(&body))
    }

    async fn get_owned_games(&self, steamid: SteamID) -> Result<Vec<OwnedGame>, Error> {
        #[derive(Serialize)]
        struct Query<'a> {
            key: &'a str,
            steamid: u64,
            include_appinfo: bool,
            include_played_free_games: bool,
            include_free_sub: bool,
            include_extended_appinfo: bool,
        }

        let uri = Self::get_api_url("IPlayerService", "GetOwnedGames", 1);
        let response = self.client.get(&uri)
            .query(&Query {
                key: &self.api_key,
                steamid: u64::from(steamid),
                include_appinfo: true,
                include_played_free_games: true,
                include_free_sub: true,
                include_extended_appinfo: true,
            })
            .send()
            .await?;
        let body: GetOwnedGamesResponse = parses_response(response).await?;

        body.response.games.ok_or(Error::PrivateGamesList)
    }

    async fn get_app_prices(
        &self,
        appids: &[AppId],
        country_code: &str,
    ) -> Result<HashMap<AppId, PriceOverview>, Error> {
        if appids.is_empty() {
            return Ok(HashMap::new());
        }

        let appids_param = appids
            .iter()
            .map(|appid| appid.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let uri = url::Url::parse_with_params(
            &format!("{}/api/appdetails", Self::STORE_HOSTNAME),
            &[
                ("appids", appids_param.as_str()),
                ("cc", country_code),
                ("filters", "price_overview"),
            ],
        )
            .map_err(|_| Error::Parameter("Invalid appdetails URL"))?;
        let response = self.client.get(uri)
            .send()
            .await?;
        let body: AppDetailsResponse = parses_response(response).await?;
        let prices = body
            .into_iter()
            .filter(|(_, details)| details.success)
            .filter_map(|(appid, details)| {
                let appid = appid.parse::<AppId>().ok()?;
                let price = details.data?.price_overview?;

                Some((appid, price))
            })
            .collect();

        Ok(prices)
    }

    async fn get_image(&self, url: &str) -> Result<Bytes, Error> {
        let response = self.client.get(url)
            .send()
            .await?;

        check_response(response).await
    }
}
