//! Aggregating a player's game library into displayable totals.

use crate::api::{OwnedGame, PriceOverview, SteamApi};
use crate::cache::{keys, CacheStore};
use crate::currency::{format_hours_compact, format_hours_precise, format_usd, format_usd_cents};
use crate::error::LibraryError;
use crate::types::{AppId, Cents, Minutes};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use futures::future::join_all;
use steamid_ng::SteamID;

/// The store accepts at most this many app IDs per price lookup.
pub const PRICE_CHUNK_SIZE: usize = 200;
/// Upper bound on a single price lookup.
pub const PRICE_CHUNK_TIMEOUT: Duration = Duration::from_secs(10);

/// Totals over a player's library, formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryTotals {
    /// Sum of current (discounted) prices, e.g. `$1,234.56`.
    pub current_value: String,
    /// Sum of prices before discounts.
    pub initial_value: String,
    /// Initial value divided by the number of priced games.
    pub average_price: String,
    /// Current value divided by total hours played.
    pub price_per_hour: String,
    /// Total playtime, compact, e.g. `12.3K hrs`.
    pub total_playtime_hours: String,
    /// Total playtime to a tenth of an hour, e.g. `12,345.6 hrs`.
    pub total_playtime_precise: String,
    /// Total playtime divided by the number of played games.
    pub average_playtime_hours: String,
    pub total_game_count: usize,
    pub played_count: usize,
    pub unplayed_count: usize,
    pub total_playtime_minutes: Minutes,
}

/// Result of aggregating a library.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryOutcome {
    Totals(LibraryTotals),
    /// The games list could not be read, e.g. because it is private.
    Restricted,
}

/// Played/unplayed split of a library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaytimeSummary {
    pub played: usize,
    pub unplayed: usize,
    pub total_minutes: Minutes,
}

impl PlaytimeSummary {
    pub fn total_games(&self) -> usize {
        self.played + self.unplayed
    }
}

/// Price sums over the games with a nonzero initial price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceSums {
    pub current: Cents,
    pub initial: Cents,
    pub priced: usize,
}

/// Splits games into played (any playtime) and unplayed and sums playtime.
pub fn summarize_playtime(games: &[OwnedGame]) -> PlaytimeSummary {
    games
        .iter()
        .fold(PlaytimeSummary::default(), |mut summary, game| {
            if game.playtime_forever > 0 {
                summary.played += 1;
                summary.total_minutes += game.playtime_forever;
            } else {
                summary.unplayed += 1;
            }

            summary
        })
}

/// Sums prices, skipping entries without an initial price.
pub fn sum_prices<'a, I>(prices: I) -> PriceSums
where
    I: IntoIterator<Item = &'a PriceOverview>,
{
    prices
        .into_iter()
        .filter(|price| price.initial > 0)
        .fold(PriceSums::default(), |mut sums, price| {
            sums.current += price.final_price;
            sums.initial += price.initial;
            sums.priced += 1;
            sums
        })
}

impl LibraryTotals {
    pub fn compute(
        playtime: PlaytimeSummary,
        prices: PriceSums,
    ) -> Self {
        let total_hours = playtime.total_minutes as f64 / 60.0;
        let average_price = prices.initial as f64 / 100.0 / prices.priced as f64;
        let price_per_hour = prices.current as f64 / 100.0 / total_hours;
        let average_playtime_minutes = playtime.total_minutes
            .checked_div(playtime.played as u64)
            .unwrap_or(0);

        Self {
            current_value: format_usd_cents(prices.current),
            initial_value: format_usd_cents(prices.initial),
            average_price: format_usd(average_price),
            price_per_hour: format_usd(price_per_hour),
            total_playtime_hours: format_hours_compact(playtime.total_minutes),
            total_playtime_precise: format_hours_precise(playtime.total_minutes),
            average_playtime_hours: format_hours_precise(average_playtime_minutes),
            total_game_count: playtime.total_games(),
            played_count: playtime.played,
            unplayed_count: playtime.unplayed,
            total_playtime_minutes: playtime.total_minutes,
        }
    }
}

/// Fetches libraries and prices and reduces them into [`LibraryTotals`] through the cache.
#[derive(Clone)]
pub struct LibraryAggregator {
    api: Arc<dyn SteamApi>,
    cache: CacheStore,
}

impl LibraryAggregator {
    pub fn new(api: Arc<dyn SteamApi>, cache: CacheStore) -> Self {
        Self {
            api,
            cache,
        }
    }

    /// Gets the library totals for `steamid` priced in the currency of `country_code`.
    pub async fn get_library(
        &self,
        steamid: SteamID,
        country_code: &str,
    ) -> LibraryOutcome {
        let aggregator = self.clone();
        let country_code = country_code.trim().to_uppercase();
        let key = keys::library(steamid, &country_code);
        let result = self.cache.libraries.get_or_fetch(&key, move || async move {
            aggregator.fetch_totals(steamid, &country_code).await
        }).await;

        match result {
            Ok(totals) => LibraryOutcome::Totals(totals),
            Err(LibraryError::Restricted(error)) => {
                log::info!("Library of {} is restricted: {error}", u64::from(steamid));
                LibraryOutcome::Restricted
            },
        }
    }

    async fn fetch_totals(
        &self,
        steamid: SteamID,
        country_code: &str,
    ) -> Result<LibraryTotals, LibraryError> {
        let games = self.api.get_owned_games(steamid).await
            .map_err(|error| LibraryError::Restricted(Arc::new(error)))?;
        let playtime = summarize_playtime(&games);
        let appids = games
            .iter()
            .map(|game| game.appid)
            .collect::<Vec<_>>();
        let prices = self.fetch_prices(&appids, country_code).await;

        Ok(LibraryTotals::compute(playtime, sum_prices(prices.values())))
    }

    /// Looks up prices in chunks, all at once. Chunks that fail or time out are skipped.
    async fn fetch_prices(
        &self,
        appids: &[AppId],
        country_code: &str,
    ) -> HashMap<AppId, PriceOverview> {
        let tasks = appids
            .chunks(PRICE_CHUNK_SIZE)
            .map(|chunk| tokio::time::timeout(
                PRICE_CHUNK_TIMEOUT,
                self.api.get_app_prices(chunk, country_code),
            ))
            .collect::<Vec<_>>();
        let mut prices = HashMap::with_capacity(appids.len());

        for result in join_all(tasks).await {
            match result {
                Ok(Ok(chunk_prices)) => prices.extend(chunk_prices),
                Ok(Err(error)) => log::warn!("Error fetching prices: {error}"),
                Err(_elapsed) => log::warn!("Timed out fetching prices after {PRICE_CHUNK_TIMEOUT:?}"),
            }
        }

        prices
    }
}
