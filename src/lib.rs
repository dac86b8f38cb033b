//! Renders shareable PNG stat cards for Steam profiles and game libraries.
//!
//! The card service resolves a player, aggregates their library through
//! time-limited, deduplicated caches and draws the result on a fixed-size card.

mod avatar;
mod currency;
mod library;
mod profile;

pub mod api;
pub mod cache;
pub mod card;
pub mod config;
pub mod enums;
pub mod error;
pub mod serializers;
pub mod server;
pub mod time;
pub mod types;

pub use avatar::{AvatarLoader, CachedImage};
pub use config::Config;
pub use currency::{format_hours_compact, format_hours_precise, format_usd, format_usd_cents};
pub use error::Error;
pub use library::{
    summarize_playtime,
    sum_prices,
    LibraryAggregator,
    LibraryOutcome,
    LibraryTotals,
    PlaytimeSummary,
    PriceSums,
    PRICE_CHUNK_SIZE,
    PRICE_CHUNK_TIMEOUT,
};
pub use profile::{is_individual_steamid64, Profile, ProfileResolver};
pub use steamid_ng::SteamID;
