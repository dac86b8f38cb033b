use super::response::CommunityProfile;
use crate::error::Error;
use serde::de::DeserializeOwned;
use lazy_regex::{regex_captures, regex_is_match, regex_replace_all};

/// Checks the status of a response and reads its body.
pub async fn check_response(response: reqwest::Response) -> Result<bytes::Bytes, Error> {
    let status = response.status();

    match status.as_u16() {
        400..=599 => Err(Error::Http(status)),
        _ => Ok(response.bytes().await?),
    }
}

/// Checks a response and deserializes its JSON body.
pub async fn parses_response<D>(response: reqwest::Response) -> Result<D, Error>
where
    D: DeserializeOwned,
{
    let body = check_response(response).await?;

    match serde_json::from_slice::<D>(&body) {
        Ok(body) => Ok(body),
        Err(parse_error) => {
            // Steam serves HTML error pages with a 200 status when it is having trouble.
            let html = String::from_utf8_lossy(&body);

            if let Some((_, message)) = regex_captures!("<title>(.+)</title>", &html) {
                Err(Error::Response(message.trim().into()))
            } else {
                Err(Error::Parse(parse_error))
            }
        },
    }
}

/// Parses the XML document served at `/profiles/{steamid}?xml=1`.
pub fn parse_community_profile(body: &str) -> Result<CommunityProfile, Error> {
    if !regex_is_match!(r#"<profile>"#, body) {
        let message = element_text(regex_captures!(r#"<error>([\s\S]*?)</error>"#, body))
            .unwrap_or_else(|| "Missing profile element".into());

        return Err(Error::Response(message));
    }

    Ok(CommunityProfile {
        online_state: element_text(regex_captures!(r#"<onlineState>([\s\S]*?)</onlineState>"#, body)),
        location: element_text(regex_captures!(r#"<location>([\s\S]*?)</location>"#, body)),
    })
}

/// Text of a captured element, unwrapped from CDATA. Blank text is `None`.
fn element_text(captures: Option<(&str, &str)>) -> Option<String> {
    let (_, value) = captures?;
    let value = value.trim();
    let value = regex_captures!(r#"^<!\[CDATA\[([\s\S]*)\]\]>$"#, value)
        .map(|(_, inner)| inner)
        .unwrap_or(value)
        .trim();

    if value.is_empty() {
        None
    } else {
        Some(unescape_xml(value))
    }
}

fn unescape_xml(value: &str) -> String {
    regex_replace_all!(r#"&(lt|gt|quot|apos|amp);"#, value, |_, entity: &str| match entity {
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => "&",
    })
    .into_owned()
}
