//! Resolving identifiers and building merged profiles.

use crate::api::{CommunityProfile, PlayerSummary, SteamApi};
use crate::cache::{keys, CacheStore};
use crate::enums::ProfileVisibility;
use crate::error::ProfileError;
use crate::time::{timestamp_to_server_time, ServerTime};
use std::sync::Arc;
use steamid_ng::SteamID;

/// A Steam profile merged from the player summary and the community profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub steamid: SteamID,
    pub display_name: String,
    pub visibility: ProfileVisibility,
    pub avatar_url: Option<String>,
    pub last_seen: Option<ServerTime>,
    pub created: Option<ServerTime>,
    pub country_code: Option<String>,
    /// `None` when the community profile could not be read.
    pub online_state: Option<String>,
    /// `None` when the community profile could not be read or has no location.
    pub location: Option<String>,
}

impl Profile {
    /// Merges both sources. Missing community fields stay `None`.
    pub fn from_sources(
        summary: PlayerSummary,
        community: Option<CommunityProfile>,
    ) -> Self {
        let CommunityProfile {
            online_state,
            location,
        } = community.unwrap_or_default();

        Self {
            steamid: SteamID::from(summary.steamid),
            display_name: summary.personaname,
            visibility: summary.communityvisibilitystate,
            avatar_url: summary.avatarfull.filter(|url| !url.is_empty()),
            last_seen: summary.lastlogoff.and_then(timestamp_to_server_time),
            created: summary.timecreated.and_then(timestamp_to_server_time),
            country_code: summary.loccountrycode,
            online_state,
            location,
        }
    }
}

/// Whether `value` is a 64-bit SteamID of an individual account in the public universe.
pub fn is_individual_steamid64(value: u64) -> bool {
    let universe = value >> 56;
    let account_type = (value >> 52) & 0xF;

    universe == 1 && account_type == 1
}

/// Resolves identifiers to [`SteamID`]s and fetches [`Profile`]s through the cache.
#[derive(Clone)]
pub struct ProfileResolver {
    api: Arc<dyn SteamApi>,
    cache: CacheStore,
}

impl ProfileResolver {
    pub fn new(api: Arc<dyn SteamApi>, cache: CacheStore) -> Self {
        Self {
            api,
            cache,
        }
    }

    /// Resolves `uid` to a [`SteamID`]. Numeric 64-bit IDs are used as-is; anything else is
    /// treated as a vanity URL name.
    pub async fn resolve_steamid(&self, uid: &str) -> Result<SteamID, ProfileError> {
        let uid = uid.trim();

        if uid.is_empty() {
            return Err(ProfileError::MissingIdentifier);
        }

        if let Ok(value) = uid.parse::<u64>() {
            if is_individual_steamid64(value) {
                return Ok(SteamID::from(value));
            }
        }

        let api = Arc::clone(&self.api);
        let vanity = uid.to_string();

        self.cache.steamids.get_or_fetch(&keys::steamid(uid), move || async move {
            api.resolve_vanity_url(&vanity).await
                .map_err(|error| ProfileError::Resolve(vanity, Arc::new(error)))
        }).await
    }

    /// Gets the merged profile for `uid`.
    pub async fn get_profile(&self, uid: &str) -> Result<Profile, ProfileError> {
        let resolver = self.clone();
        let owned_uid = uid.to_string();

        self.cache.profiles.get_or_fetch(&keys::profile(uid), move || async move {
            resolver.fetch_profile(&owned_uid).await
        }).await
    }

    async fn fetch_profile(&self, uid: &str) -> Result<Profile, ProfileError> {
        let steamid = self.resolve_steamid(uid).await?;
        let (summary, community) = tokio::join!(
            self.api.get_player_summary(steamid),
            self.api.get_community_profile(steamid),
        );
        let summary = summary
            .map_err(|error| ProfileError::Unavailable(Arc::new(error)))?;
        let community = match community {
            Ok(community) => Some(community),
            Err(error) => {
                log::debug!("Community profile unavailable for {}: {error}", u64::from(steamid));
                None
            },
        };

        Ok(Profile::from_sources(summary, community))
    }
}
