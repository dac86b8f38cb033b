use strum_macros::{Display, EnumString};

/// Named color theme for a card. A theme replaces every individually supplied color.
#[derive(Display, EnumString, Debug, PartialEq, Eq, Clone, Copy)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    Dark,
    Light,
}
