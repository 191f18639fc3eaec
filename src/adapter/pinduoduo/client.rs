//! Merchant gateway HTTP client.
//!
//! Every request/response exchange with the gateway goes through
//! [`RequestClient`]: it applies the configured default headers, attaches
//! the session cookie set, and retries transient failures with exponential
//! backoff plus jitter. Exhausted retries yield `Ok(None)` rather than an
//! error — "no response" is a real outcome some endpoints produce, and
//! callers that need a body must treat `None` as their own failure.
//!
//! The single low-level exchange sits behind the [`HttpExchange`] trait so
//! the retry loop can be driven against scripted outcomes in tests.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::PlatformConfig;
use crate::domain::CookieJar;
use crate::error::{Error, Result};

/// Total attempts per logical request, including the first.
const MAX_ATTEMPTS: u32 = 3;
/// Wait before the first retry; doubles (plus jitter) after each failure.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
/// Jitter added after each doubling, in milliseconds.
const JITTER_MS: std::ops::Range<u64> = 100..400;
/// Hard timeout for a single HTTP exchange.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw outcome of a single exchange.
#[derive(Debug, Clone)]
pub struct ExchangeResponse {
    pub status: u16,
    pub body: String,
}

impl ExchangeResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One low-level HTTP exchange: a POST with prepared headers and body.
#[async_trait]
pub trait HttpExchange: Send + Sync {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> Result<ExchangeResponse>;
}

/// Production [`HttpExchange`] backed by reqwest.
pub struct ReqwestExchange {
    client: reqwest::Client,
}

impl ReqwestExchange {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpExchange for ReqwestExchange {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> Result<ExchangeResponse> {
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ExchangeResponse { status, body })
    }
}

/// Retrying gateway client bound to one header set and one cookie snapshot.
///
/// Each logical caller constructs its own client; cookies are copied in at
/// construction and never shared mutably afterwards.
pub struct RequestClient<E: HttpExchange> {
    exchange: E,
    default_headers: BTreeMap<String, String>,
    cookies: CookieJar,
}

impl RequestClient<ReqwestExchange> {
    pub fn new(platform: &PlatformConfig, cookies: CookieJar) -> Result<Self> {
        Ok(Self::with_exchange(
            ReqwestExchange::new()?,
            platform.default_headers.clone(),
            cookies,
        ))
    }
}

impl<E: HttpExchange> RequestClient<E> {
    pub fn with_exchange(
        exchange: E,
        default_headers: BTreeMap<String, String>,
        cookies: CookieJar,
    ) -> Self {
        Self {
            exchange,
            default_headers,
            cookies,
        }
    }

    /// POST a JSON payload and parse the response body, if any.
    pub async fn post_json(&self, url: &str, payload: &Value) -> Result<Option<Value>> {
        self.send(url, payload.to_string()).await
    }

    /// POST a raw (possibly empty) body and parse the response body, if any.
    pub async fn post_raw(&self, url: &str, body: impl Into<String>) -> Result<Option<Value>> {
        self.send(url, body.into()).await
    }

    async fn send(&self, url: &str, body: String) -> Result<Option<Value>> {
        let headers = self.prepare_headers();
        let mut delay = INITIAL_BACKOFF;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(url, &headers, body.clone()).await {
                Ok(parsed) => return Ok(parsed),
                Err(error) => {
                    warn!(%url, attempt, error = %error, "gateway request failed");
                    if attempt < MAX_ATTEMPTS {
                        sleep(delay).await;
                        let jitter = rand::thread_rng().gen_range(JITTER_MS);
                        delay = delay * 2 + Duration::from_millis(jitter);
                    }
                }
            }
        }

        // Exhausted: degrade to "no response" and let the caller decide
        // whether that is fatal.
        debug!(%url, "all attempts exhausted");
        Ok(None)
    }

    async fn attempt(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> Result<Option<Value>> {
        let response = self.exchange.post(url, headers, body).await?;
        if !response.is_success() {
            debug!(status = response.status, body = %response.body, "non-success response");
            return Err(Error::Status {
                status: response.status,
                url: url.to_string(),
            });
        }
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&response.body)?))
    }

    fn prepare_headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .default_headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        if !headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        {
            headers.push((
                "content-type".into(),
                "application/json; charset=utf-8".into(),
            ));
        }
        if !self.cookies.is_empty() {
            headers.retain(|(name, _)| !name.eq_ignore_ascii_case("cookie"));
            headers.push(("cookie".into(), self.cookies.header()));
        }
        headers
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::ScriptedExchange;
    use super::*;

    fn client(exchange: &ScriptedExchange) -> RequestClient<ScriptedExchange> {
        exchange.client()
    }

    #[tokio::test]
    async fn first_success_makes_a_single_attempt() {
        let exchange =
            ScriptedExchange::with_outcomes(vec![ScriptedExchange::ok(200, r#"{"ok":true}"#)]);
        let response = client(&exchange)
            .post_raw("https://gw.test/a", "")
            .await
            .unwrap();
        assert_eq!(response, Some(json!({"ok": true})));
        assert_eq!(exchange.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_success_body_yields_no_response() {
        let exchange = ScriptedExchange::with_outcomes(vec![ScriptedExchange::ok(200, "  ")]);
        let response = client(&exchange)
            .post_raw("https://gw.test/a", "")
            .await
            .unwrap();
        assert_eq!(response, None);
        assert_eq!(exchange.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_degrade_to_no_response() {
        let exchange = ScriptedExchange::with_outcomes(vec![
            ScriptedExchange::ok(500, "boom"),
            ScriptedExchange::transport_error(),
            ScriptedExchange::ok(502, "still down"),
        ]);
        let response = client(&exchange)
            .post_raw("https://gw.test/a", "")
            .await
            .unwrap();
        assert_eq!(response, None);

        let calls = exchange.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);

        // First wait is exactly the base backoff; the second doubles it and
        // adds jitter, so the gaps must strictly increase.
        let first_gap = calls[1].at - calls[0].at;
        let second_gap = calls[2].at - calls[1].at;
        assert_eq!(first_gap, Duration::from_secs(1));
        assert!(second_gap > first_gap);
        assert!(second_gap >= Duration::from_millis(2100));
        assert!(second_gap < Duration::from_millis(2400));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_on_a_later_attempt() {
        let exchange = ScriptedExchange::with_outcomes(vec![
            ScriptedExchange::transport_error(),
            ScriptedExchange::ok(200, r#"{"n":1}"#),
        ]);
        let response = client(&exchange)
            .post_raw("https://gw.test/a", "")
            .await
            .unwrap();
        assert_eq!(response, Some(json!({"n": 1})));
        assert_eq!(exchange.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unparseable_success_body_is_retried() {
        let exchange = ScriptedExchange::with_outcomes(vec![
            ScriptedExchange::ok(200, "<html>gateway error</html>"),
            ScriptedExchange::ok(200, r#"{"n":2}"#),
        ]);
        let response = client(&exchange)
            .post_raw("https://gw.test/a", "")
            .await
            .unwrap();
        assert_eq!(response, Some(json!({"n": 2})));
        assert_eq!(exchange.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cookie_header_replaces_configured_one() {
        let exchange = ScriptedExchange::default();
        let mut defaults = BTreeMap::new();
        defaults.insert("Cookie".to_string(), "stale=1".to_string());
        defaults.insert("user-agent".to_string(), "test".to_string());
        let client = RequestClient::with_exchange(
            exchange.clone(),
            defaults,
            CookieJar::parse("a=1; b=2"),
        );

        client.post_json("https://gw.test/a", &json!({})).await.unwrap();

        let calls = exchange.calls.lock().unwrap();
        let cookie_headers: Vec<_> = calls[0]
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("cookie"))
            .collect();
        assert_eq!(cookie_headers.len(), 1);
        assert_eq!(cookie_headers[0].1, "a=1; b=2");
        assert!(calls[0]
            .headers
            .iter()
            .any(|(name, value)| name == "user-agent" && value == "test"));
    }

    #[tokio::test]
    async fn json_payloads_are_serialized_into_the_body() {
        let exchange = ScriptedExchange::default();
        client(&exchange)
            .post_json("https://gw.test/a", &json!({"version": "3"}))
            .await
            .unwrap();
        assert_eq!(exchange.calls.lock().unwrap()[0].body, r#"{"version":"3"}"#);
    }
}
