//! Serde helpers for values Steam encodes as strings.

pub mod string {
    use std::fmt::Display;
    use std::str::FromStr;
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
        where T: FromStr,
              T::Err: Display,
              D: Deserializer<'de>
    {
        String::deserialize(deserializer)?.parse().map_err(de::Error::custom)
    }
}

pub mod option_string {
    use std::fmt::Display;
    use std::str::FromStr;
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
        where T: FromStr,
              T::Err: Display,
              D: Deserializer<'de>
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.is_empty() => s.parse().map(Some).map_err(de::Error::custom),
            _ => Ok(None),
        }
    }
}
