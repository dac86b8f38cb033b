use super::{SteamWebAPI, USER_AGENT_STRING};
use crate::error::Error;
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;

/// Builder for constructing a [`SteamWebAPI`].
#[derive(Debug, Clone)]
pub struct SteamWebAPIBuilder {
    /// Your API key from <https://steamcommunity.com/dev/apikey>.
    pub(crate) api_key: String,
    /// Client to use for requests.
    pub(crate) client: Option<ClientWithMiddleware>,
    /// User agent for requests.
    pub(crate) user_agent: &'static str,
}

impl SteamWebAPIBuilder {
    /// Creates a new [`SteamWebAPIBuilder`]. An API key is required for the Steam Web API.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: None,
            user_agent: USER_AGENT_STRING,
        }
    }

    /// Client to use for requests. The user agent setting is ignored when a client is given.
    pub fn client(mut self, client: ClientWithMiddleware) -> Self {
        self.client = Some(client);
        self
    }

    /// User agent for requests.
    pub fn user_agent(mut self, user_agent: &'static str) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Builds the [`SteamWebAPI`].
    pub fn build(self) -> Result<SteamWebAPI, Error> {
        let client = match self.client {
            Some(client) => client,
            None => get_default_client(self.user_agent)?,
        };

        Ok(SteamWebAPI {
            client,
            api_key: self.api_key,
        })
    }
}

fn get_default_client(user_agent: &'static str) -> Result<ClientWithMiddleware, Error> {
    let mut headers = header::HeaderMap::new();

    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(user_agent));

    let client = reqwest::ClientBuilder::new()
        .default_headers(headers)
        .gzip(true)
        .build()?;

    Ok(reqwest_middleware::ClientBuilder::new(client).build())
}
