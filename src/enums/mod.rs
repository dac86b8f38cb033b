//! Enumerated types.

mod profile_visibility;
mod theme;

pub use profile_visibility::ProfileVisibility;
pub use theme::Theme;
