use crate::core::error::FetchError;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

/// Builds the HTTP client used by the providers. `timeout` bounds the whole
/// request, from connect to the end of the body.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .user_agent("coinconv/0.1")
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// A request URL with its query parameters percent-encoded.
///
/// Parameters added with [`Endpoint::secret`] are sent on the wire but left
/// out of the `Display` form, which is what logs and errors carry.
#[derive(Clone)]
pub struct Endpoint {
    url: Url,
    display: String,
}

impl Endpoint {
    pub fn new(base_url: &str, path: &str, params: &[(&str, &str)]) -> Result<Self, FetchError> {
        let raw = format!("{}/{}", base_url.trim_end_matches('/'), path);
        let url = Url::parse_with_params(&raw, params).map_err(|e| FetchError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        let display = url.to_string();
        Ok(Self { url, display })
    }

    pub fn secret(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Endpoint").field(&self.display).finish()
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

/// Issues a single GET to `endpoint` and decodes the JSON body into `T`.
///
/// # Errors
/// `FetchError::Request` on transport failures and timeouts,
/// `FetchError::Status` on a non-success status and `FetchError::Decode`
/// when the body does not match `T`. None of them carry secret parameters.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    endpoint: &Endpoint,
) -> Result<T, FetchError> {
    debug!("Requesting {}", endpoint);
    let response = client
        .get(endpoint.url.clone())
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: endpoint.to_string(),
        });
    }

    let text = response
        .text()
        .await
        .map_err(reqwest::Error::without_url)?;
    serde_json::from_str(&text).map_err(|e| FetchError::Decode {
        url: endpoint.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_encoded() {
        let endpoint = Endpoint::new(
            "http://localhost:8080/api/v3/",
            "simple/price",
            &[("ids", "a&b c#d"), ("vs_currencies", "usd")],
        )
        .unwrap();

        assert_eq!(
            endpoint.to_string(),
            "http://localhost:8080/api/v3/simple/price?ids=a%26b+c%23d&vs_currencies=usd"
        );
        let pairs: Vec<_> = endpoint.url.query_pairs().collect();
        assert_eq!(pairs[0].1, "a&b c#d");
    }

    #[test]
    fn test_secret_is_sent_but_not_displayed() {
        let endpoint = Endpoint::new("http://localhost", "convert", &[("from", "USD")])
            .unwrap()
            .secret("access_key", "SECRET123");

        assert!(endpoint.url.as_str().contains("access_key=SECRET123"));
        assert_eq!(endpoint.to_string(), "http://localhost/convert?from=USD");
        assert!(!format!("{endpoint:?}").contains("SECRET123"));
    }

    #[test]
    fn test_bad_base_url() {
        let result = Endpoint::new("not a url", "convert", &[]);
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
