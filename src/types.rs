//! Types for common values in Steam responses.

/// Uniquely identifies an application on Steam. For example: 440 for Team Fortress 2.
pub type AppId = u32;
/// Playtime as reported by Steam, in minutes.
pub type Minutes = u64;
/// An amount of money in the smallest unit of its currency (e.g. cents).
pub type Cents = u64;

pub use crate::time::ServerTime;

// Types internally used by the crate.
use reqwest_middleware::ClientWithMiddleware;

pub(crate) type HttpClient = ClientWithMiddleware;
