//! Interactive operator console.
//!
//! All dialoguer prompts run on the blocking pool so the stream task keeps
//! receiving while the operator types.

pub mod output;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

use crate::domain::{CookieJar, InboundMessage};
use crate::error::{ConfigError, Error, Result};
use crate::relay::OperatorConsole;

/// What the operator typed in at startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub cookies: CookieJar,
}

/// Collect account credentials and the session cookie set.
///
/// Cookies are accepted as a JSON object or a `name=value; ...` line; an
/// input that parses to nothing is a startup error, since no gateway call
/// can succeed without cookies.
pub async fn collect_credentials() -> Result<Credentials> {
    let (username, password, cookie_line) = prompt_blocking(|| {
        let theme = ColorfulTheme::default();
        let username: String = Input::with_theme(&theme)
            .with_prompt("Account")
            .interact_text()?;
        let password = Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()?;
        let cookie_line: String = Input::with_theme(&theme)
            .with_prompt("Cookies (JSON object or name=value; pairs)")
            .interact_text()?;
        Ok((username, password, cookie_line))
    })
    .await?;

    let cookies = CookieJar::parse(&cookie_line);
    if cookies.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "cookies",
            reason: "no cookie pairs could be parsed from the input".into(),
        }
        .into());
    }

    Ok(Credentials {
        username,
        password,
        cookies,
    })
}

/// [`OperatorConsole`] backed by the terminal.
#[derive(Debug, Default)]
pub struct CliConsole;

impl CliConsole {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OperatorConsole for CliConsole {
    fn show_system(&mut self, message: &InboundMessage) {
        output::system(message.text.as_deref().unwrap_or("(no detail)"));
    }

    fn show_message(&mut self, message: &InboundMessage) {
        output::divider();
        output::field("time", format_timestamp(message.timestamp_ms));
        output::field(
            "from",
            message
                .nickname
                .as_deref()
                .unwrap_or(message.sender_uid.as_str()),
        );
        output::field("kind", message.context);
        output::field("content", message.text.as_deref().unwrap_or(""));
    }

    fn notify(&mut self, note: &str) {
        output::note(note);
    }

    async fn acknowledge(&mut self) -> Result<()> {
        prompt_blocking(|| {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("This kind cannot be replied to; press Enter to continue")
                .allow_empty(true)
                .interact_text()
        })
        .await?;
        Ok(())
    }

    async fn read_reply(&mut self) -> Result<Option<String>> {
        prompt_blocking(|| {
            let outcome = Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("Reply (empty to skip, /exit to quit)")
                .allow_empty(true)
                .interact_text();
            match outcome {
                Ok(reply) => Ok(Some(reply)),
                // stdin closed under us: no more input, not a fault
                Err(dialoguer::Error::IO(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
    }
}

/// Run a dialoguer interaction on the blocking pool.
async fn prompt_blocking<T, F>(interact: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(interact).await {
        Ok(result) => result.map_err(Into::into),
        Err(join_error) => Err(Error::Io(std::io::Error::other(join_error.to_string()))),
    }
}

/// Render an epoch-milliseconds origin timestamp in local time, falling
/// back to "now" when the payload carried none.
fn format_timestamp(timestamp_ms: Option<i64>) -> String {
    let fallback = || Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    match timestamp_ms {
        Some(ms) => Local
            .timestamp_millis_opt(ms)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(fallback),
        None => fallback(),
    }
}
