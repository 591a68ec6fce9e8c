use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use cashshop_domain::LookupError;

#[derive(Debug, Deserialize)]
pub(crate) struct Document<A, I = serde::de::IgnoredAny> {
    pub data: Resource<A>,
    #[serde(default = "Vec::new")]
    pub included: Vec<I>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Resource<A> {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: A,
}

/// GETs a JSON:API document. 404 maps to `NotFound(what)`.
pub(crate) async fn fetch<A, I>(
    client: &Client,
    url: &str,
    what: String,
) -> Result<Document<A, I>, LookupError>
where
    A: DeserializeOwned,
    I: DeserializeOwned,
{
    let response = client
        .get(url)
        .header("Accept", "application/vnd.api+json")
        .send()
        .await
        .map_err(|err| LookupError::Transport(err.into()))?;
    if response.status() == StatusCode::NOT_FOUND {
        return Err(LookupError::NotFound(what));
    }
    let response = response
        .error_for_status()
        .map_err(|err| LookupError::Transport(err.into()))?;
    let body = response
        .text()
        .await
        .map_err(|err| LookupError::Transport(err.into()))?;
    parse(&body)
}

pub(crate) fn parse<A, I>(body: &str) -> Result<Document<A, I>, LookupError>
where
    A: DeserializeOwned,
    I: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|err| LookupError::Transport(err.into()))
}
