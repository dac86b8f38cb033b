//! In-memory caching of upstream responses and decoded images.

mod ttl_cache;

pub use ttl_cache::{CacheEntry, TtlCache};

use crate::avatar::CachedImage;
use crate::error::{AssetError, LibraryError, ProfileError};
use crate::library::LibraryTotals;
use crate::profile::Profile;
use std::time::Duration;
use steamid_ng::SteamID;

const ONE_HOUR: Duration = Duration::from_secs(60 * 60);

/// Time-to-live for each cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    /// Merged profiles. Defaults to 1 hour.
    pub profile: Duration,
    /// Decoded avatar images. Defaults to 24 hours.
    pub avatar: Duration,
    /// Vanity identifiers resolved to SteamIDs. Defaults to 7 days.
    pub steamid: Duration,
    /// Library totals. Defaults to 6 hours.
    pub library: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            profile: ONE_HOUR,
            avatar: ONE_HOUR * 24,
            steamid: ONE_HOUR * 24 * 7,
            library: ONE_HOUR * 6,
        }
    }
}

/// All cache namespaces used by the service. Constructed once at startup and shared by cloning;
/// clones refer to the same storage.
#[derive(Debug, Clone)]
pub struct CacheStore {
    pub profiles: TtlCache<Profile, ProfileError>,
    pub steamids: TtlCache<SteamID, ProfileError>,
    pub libraries: TtlCache<LibraryTotals, LibraryError>,
    pub images: TtlCache<CachedImage, AssetError>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}

impl CacheStore {
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            profiles: TtlCache::new(ttls.profile),
            steamids: TtlCache::new(ttls.steamid),
            libraries: TtlCache::new(ttls.library),
            images: TtlCache::new(ttls.avatar),
        }
    }
}

/// Cache keys. Every caller must build keys through these so that concurrent requests for the
/// same inputs land on the same entry.
pub mod keys {
    use steamid_ng::SteamID;

    pub fn profile(uid: &str) -> String {
        format!("profile:{}", uid.trim().to_lowercase())
    }

    pub fn steamid(uid: &str) -> String {
        format!("steamid:{}", uid.trim().to_lowercase())
    }

    pub fn library(steamid: SteamID, country_code: &str) -> String {
        format!("library:{}:{}", u64::from(steamid), country_code.trim().to_uppercase())
    }

    pub fn image(url: &str) -> String {
        format!("image:{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttls() {
        let ttls = CacheTtls::default();

        assert_eq!(ttls.profile.as_secs(), 3_600);
        assert_eq!(ttls.avatar.as_secs(), 86_400);
        assert_eq!(ttls.steamid.as_secs(), 604_800);
        assert_eq!(ttls.library.as_secs(), 21_600);
    }

    #[test]
    fn keys_separate_inputs() {
        let steamid = SteamID::from(76561197960287930);

        assert_eq!(keys::library(steamid, "us"), "library:76561197960287930:US");
        assert_ne!(keys::library(steamid, "US"), keys::library(steamid, "DE"));
        assert_eq!(keys::steamid(" GabeN "), keys::steamid("gaben"));
        assert_ne!(keys::profile("gaben"), keys::steamid("gaben"));
    }
}
