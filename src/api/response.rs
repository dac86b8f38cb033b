//! Response bodies from Steam's services.

use super::deserializers::empty_array_as_none;
use crate::enums::ProfileVisibility;
use crate::serializers::{string, option_string};
use crate::types::{AppId, Cents, Minutes};
use std::collections::HashMap;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ResolveVanityURLResponse {
    pub response: ResolveVanityURLBody,
}

#[derive(Deserialize, Debug)]
pub struct ResolveVanityURLBody {
    /// `1` on success, `42` when no match was found.
    pub success: u8,
    #[serde(default, deserialize_with = "option_string::deserialize")]
    pub steamid: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct GetPlayerSummariesResponse {
    pub response: GetPlayerSummariesBody,
}

#[derive(Deserialize, Debug)]
pub struct GetPlayerSummariesBody {
    #[serde(default)]
    pub players: Vec<PlayerSummary>,
}

/// A player's public summary.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    #[serde(deserialize_with = "string::deserialize")]
    pub steamid: u64,
    pub personaname: String,
    pub communityvisibilitystate: ProfileVisibility,
    #[serde(default)]
    pub avatarfull: Option<String>,
    #[serde(default)]
    pub lastlogoff: Option<i64>,
    #[serde(default)]
    pub timecreated: Option<i64>,
    #[serde(default)]
    pub loccountrycode: Option<String>,
}

/// Fields read from a player's community profile XML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityProfile {
    /// E.g. "online", "offline" or "in-game".
    pub online_state: Option<String>,
    /// Free-form location the player entered.
    pub location: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct GetOwnedGamesResponse {
    pub response: GetOwnedGamesBody,
}

/// Steam answers with an empty body when the games list is private.
#[derive(Deserialize, Debug)]
pub struct GetOwnedGamesBody {
    #[serde(default)]
    pub games: Option<Vec<OwnedGame>>,
}

/// A game in a player's library.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OwnedGame {
    pub appid: AppId,
    /// Total playtime in minutes.
    #[serde(default)]
    pub playtime_forever: Minutes,
}

/// Keyed by the app ID as a string.
pub type AppDetailsResponse = HashMap<String, AppDetails>;

#[derive(Deserialize, Debug)]
pub struct AppDetails {
    pub success: bool,
    #[serde(default, deserialize_with = "empty_array_as_none")]
    pub data: Option<AppDetailsData>,
}

#[derive(Deserialize, Debug)]
pub struct AppDetailsData {
    #[serde(default)]
    pub price_overview: Option<PriceOverview>,
}

/// Store price of an app in the requested country's currency.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PriceOverview {
    pub currency: String,
    /// Price before discounts.
    pub initial: Cents,
    /// Price after discounts.
    #[serde(rename = "final")]
    pub final_price: Cents,
    #[serde(default)]
    pub discount_percent: u32,
}
