//! Async HTTP client wrapping the vaxchain JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response, Url};
use serde_json::{Value, json};

/// Async HTTP client for a running `vaxchain-server`.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: Url,
}

impl ApiClient {
  pub fn new(base_url: String) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    let base_url = Url::parse(&base_url)
      .with_context(|| format!("invalid server URL {base_url}"))?;
    if base_url.cannot_be_a_base() {
      return Err(anyhow!("server URL {base_url} cannot carry a path"));
    }
    Ok(Self { client, base_url })
  }

  /// `<base>/api/<segments..>`, each segment percent-encoded on its own.
  fn url(&self, segments: &[&str]) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|()| anyhow!("server URL {} cannot carry a path", self.base_url))?
      .pop_if_empty()
      .push("api")
      .extend(segments);
    Ok(url)
  }

  /// `POST /api/invoke` — returns the raw response body.
  pub async fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
    tracing::debug!(function, args = args.len(), "POST /invoke");
    let resp = self
      .client
      .post(self.url(&["invoke"])?)
      .json(&json!({ "function": function, "args": args }))
      .send()
      .await
      .context("POST /invoke failed")?;
    let resp = check(resp).await?;
    Ok(resp.bytes().await.context("reading response body")?.to_vec())
  }

  /// `GET /api/{collection}/{id}` for `children`, `vaccines` or `plans`.
  pub async fn list(&self, collection: &str, id: &str) -> Result<Value> {
    let url = self.url(&[collection, id])?;
    tracing::debug!(url = %url, "GET");
    let resp = self
      .client
      .get(url.clone())
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?;
    check(resp)
      .await?
      .json()
      .await
      .with_context(|| format!("decoding {url} response"))
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body: Value = resp.json().await.unwrap_or(Value::Null);
  let message = body["error"].as_str().unwrap_or("no error message").to_owned();
  Err(anyhow!("server returned {status}: {message}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(base: &str) -> ApiClient { ApiClient::new(base.to_owned()).unwrap() }

  #[test]
  fn ids_are_encoded_as_one_segment() {
    let url = client("http://ledger:7050").url(&["children", "ward/7?a#b"]).unwrap();
    assert_eq!(url.as_str(), "http://ledger:7050/api/children/ward%2F7%3Fa%23b");
  }

  #[test]
  fn base_path_is_kept() {
    let url = client("http://ledger:7050/vax/").url(&["invoke"]).unwrap();
    assert_eq!(url.as_str(), "http://ledger:7050/vax/api/invoke");
  }

  #[test]
  fn unparseable_base_is_rejected() {
    assert!(ApiClient::new("not a url".into()).is_err());
    assert!(ApiClient::new("mailto:someone@example.com".into()).is_err());
  }
}
