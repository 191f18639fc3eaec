//! Session setup round-trips.
//!
//! Opening a chat stream needs three sequential exchanges with the gateway:
//! the account profile, the merchant (shop) record, and finally a
//! short-lived chat token. Callers build one [`RequestClient`] per exchange
//! so every call carries its own cookie snapshot. Failures here are fatal
//! to startup; there is no session to relay without them.

use serde_json::{json, Value};

use super::client::{HttpExchange, RequestClient};
use crate::domain::Shop;
use crate::error::{Result, SessionError};

/// Identity of the operator account as the gateway reports it.
#[derive(Debug, Clone)]
pub struct AccountProfile {
    pub user_id: String,
    pub username: String,
    pub mall_id: String,
}

/// Fetch the operator's account profile.
pub async fn fetch_profile<E: HttpExchange>(
    client: &RequestClient<E>,
    url: &str,
) -> Result<AccountProfile> {
    const CONTEXT: &str = "account profile lookup failed";

    let document = client
        .post_raw(url, "")
        .await?
        .ok_or(SessionError::EmptyResponse { context: CONTEXT })?;
    let result = require_success(&document, CONTEXT)?;

    Ok(AccountProfile {
        user_id: require_str(result, "id", CONTEXT)?,
        username: optional_str(result, "username"),
        mall_id: optional_str(result, "mall_id"),
    })
}

/// Fetch the shop record attached to the session.
pub async fn fetch_shop<E: HttpExchange>(client: &RequestClient<E>, url: &str) -> Result<Shop> {
    const CONTEXT: &str = "shop info lookup failed";

    let document = client
        .post_json(url, &json!({}))
        .await?
        .ok_or(SessionError::EmptyResponse { context: CONTEXT })?;
    let result = require_success(&document, CONTEXT)?;

    Ok(Shop {
        shop_id: require_str(result, "mallId", CONTEXT)?,
        name: optional_str(result, "mallName"),
        logo: result
            .get("mallLogo")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Fetch the chat stream access token.
///
/// The gateway has shipped this in two shapes over time: a top-level
/// `token` and a nested `result.token`. Accept either.
pub async fn fetch_chat_token<E: HttpExchange>(
    client: &RequestClient<E>,
    url: &str,
) -> Result<String> {
    const CONTEXT: &str = "chat token request failed";

    let document = client
        .post_json(url, &json!({"version": "3"}))
        .await?
        .ok_or(SessionError::EmptyResponse { context: CONTEXT })?;

    if let Some(token) = document.get("token").and_then(Value::as_str) {
        return Ok(token.to_string());
    }
    if let Some(token) = document
        .get("result")
        .and_then(|result| result.get("token"))
        .and_then(Value::as_str)
    {
        return Ok(token.to_string());
    }

    Err(SessionError::MissingField {
        context: CONTEXT,
        field: "token",
    }
    .into())
}

/// Check the gateway's boolean `success` envelope and return the nested
/// `result` object, or surface the server's error text.
fn require_success<'a>(
    document: &'a Value,
    context: &'static str,
) -> Result<&'a Value> {
    if document.get("success").and_then(Value::as_bool) != Some(true) {
        let message = document
            .get("errorMsg")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(SessionError::Rejected { context, message }.into());
    }
    document.get("result").ok_or_else(|| {
        SessionError::MissingField {
            context,
            field: "result",
        }
        .into()
    })
}

fn require_str(result: &Value, field: &'static str, context: &'static str) -> Result<String> {
    result
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SessionError::MissingField { context, field }.into())
}

fn optional_str(result: &Value, field: &str) -> String {
    result
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
