use num_enum::{TryFromPrimitive, IntoPrimitive};
use serde_repr::{Serialize_repr, Deserialize_repr};
use strum_macros::{Display, EnumString};

/// Community visibility state of a profile, as reported by `GetPlayerSummaries`.
#[derive(Serialize_repr, Deserialize_repr, Display, EnumString, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Clone, Copy)]
#[repr(u8)]
pub enum ProfileVisibility {
    /// Only the owner can see the profile.
    Private = 1,
    /// Only friends can see the profile.
    FriendsOnly = 2,
    /// Everyone can see the profile.
    Public = 3,
}
