use std::sync::Arc;
use reqwest_middleware;

/// Any error from a request to one of Steam's services.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid parameter: {}", .0)]
    Parameter(&'static str),
    #[error("Unexpected response: {}", .0)]
    Response(String),
    #[error("Request error: {}", .0)]
    Reqwest(#[from] reqwest::Error),
    #[error("Request middleware error: {}", .0)]
    ReqwestMiddleware(anyhow::Error),
    #[error("Error parsing response: {}", .0)]
    Parse(#[from] serde_json::Error),
    #[error("Error {}", .0)]
    Http(reqwest::StatusCode),
    #[error("Games list is private")]
    PrivateGamesList,
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Error {
        match error {
            reqwest_middleware::Error::Reqwest(e) => Error::Reqwest(e),
            reqwest_middleware::Error::Middleware(e) => Error::ReqwestMiddleware(e),
        }
    }
}

/// Failure to build a [`Profile`][crate::Profile]. Cloneable so every caller waiting on the same
/// deduplicated fetch receives it.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ProfileError {
    #[error("Missing identifier")]
    MissingIdentifier,
    #[error("Could not resolve \"{}\": {}", .0, .1)]
    Resolve(String, Arc<Error>),
    #[error("Profile unavailable: {}", .0)]
    Unavailable(Arc<Error>),
}

/// Failure to aggregate a game library.
#[derive(thiserror::Error, Debug, Clone)]
pub enum LibraryError {
    /// The owned games could not be read, usually because the games list is private.
    #[error("Library restricted: {}", .0)]
    Restricted(Arc<Error>),
}

/// Failure to fetch or decode an image.
#[derive(thiserror::Error, Debug, Clone)]
pub enum AssetError {
    #[error("Error fetching image: {}", .0)]
    Fetch(Arc<Error>),
    #[error("Error decoding image: {}", .0)]
    Decode(String),
}

/// Failure to produce the final image.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Error parsing card SVG: {}", .0)]
    Svg(#[from] resvg::usvg::Error),
    #[error("Invalid canvas size {}x{}", .0, .1)]
    Canvas(u32, u32),
    #[error("Error encoding PNG: {}", .0)]
    Encode(#[from] image::ImageError),
}

/// Failure to load configuration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{} must be set", .0)]
    Missing(&'static str),
    #[error("{} has an invalid value: {}", .name, .value)]
    Invalid {
        name: &'static str,
        value: String,
    },
}
