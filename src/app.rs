//! Application wiring.
//!
//! One run: collect credentials, establish the session through three
//! gateway round-trips, then hold the chat stream and the dispatch loop
//! side by side until one of them decides the run is over.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::adapter::console::{self, output, CliConsole};
use crate::adapter::pinduoduo::{session, ChatStream, ReplySender, RequestClient};
use crate::config::Config;
use crate::domain::Account;
use crate::error::Result;
use crate::relay::{DispatchEnd, Dispatcher};
use crate::store::InMemoryStore;

pub struct App;

impl App {
    /// Run the relay until the stream closes, the operator exits, or a
    /// fatal setup error occurs.
    pub async fn run(config: Config) -> Result<()> {
        output::header(env!("CARGO_PKG_VERSION"));

        let now = chrono::Local::now().time();
        if !config.business_hours.contains(now) {
            output::warning(&format!(
                "outside configured business hours ({}-{})",
                config.business_hours.start, config.business_hours.end
            ));
        }

        output::section("Sign in");
        let credentials = console::collect_credentials().await?;

        let mut account = Account::new(credentials.username, credentials.password);
        account.update_cookies(credentials.cookies);

        let mut store = InMemoryStore::new();

        output::section("Session");

        let spinner = output::spinner("Fetching account profile...");
        let client = RequestClient::new(&config.platform, account.cookies().clone())?;
        let profile = match session::fetch_profile(&client, &config.platform.profile_url).await {
            Ok(profile) => profile,
            Err(error) => {
                output::spinner_fail(&spinner, "Account profile lookup failed");
                return Err(error);
            }
        };
        output::spinner_success(
            &spinner,
            &format!(
                "Signed in as {} (user {})",
                profile.username, profile.user_id
            ),
        );
        account.username = profile.username;
        account.user_id = Some(profile.user_id);
        account.shop_id = Some(profile.mall_id);

        let spinner = output::spinner("Fetching shop info...");
        let client = RequestClient::new(&config.platform, account.cookies().clone())?;
        let shop = match session::fetch_shop(&client, &config.platform.merchant_url).await {
            Ok(shop) => shop,
            Err(error) => {
                output::spinner_fail(&spinner, "Shop info lookup failed");
                return Err(error);
            }
        };
        output::spinner_success(
            &spinner,
            &format!("Shop {} ({})", shop.name, shop.shop_id),
        );
        account.shop_id = Some(shop.shop_id.clone());
        account.shop_name = Some(shop.name.clone());
        account.mall_logo = shop.logo.clone();
        store.save_shop(shop);
        store.upsert_account(account.clone());

        let spinner = output::spinner("Requesting chat token...");
        let client = RequestClient::new(&config.platform, account.cookies().clone())?;
        let token = match session::fetch_chat_token(&client, &config.platform.token_url).await {
            Ok(token) => token,
            Err(error) => {
                output::spinner_fail(&spinner, "Chat token request failed");
                return Err(error);
            }
        };
        output::spinner_success(&spinner, "Chat token issued");

        // The stream is the queue's only producer; the dispatcher its only
        // consumer. When the stream ends it drops the sender and the
        // dispatcher drains whatever is left.
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let shop_id = account.shop_id.clone().unwrap_or_default();
        let stream = ChatStream::new(&config.platform, shop_id);
        let stream_task = tokio::spawn(async move { stream.run(&token, events_tx).await });

        output::section("Relay");
        output::note("Waiting for buyer messages. Ctrl-C or /exit to quit.");

        let sender = ReplySender::new(config.platform.clone(), account.cookies().clone());
        let mut dispatcher = Dispatcher::new(CliConsole::new(), sender);
        let end = dispatcher.run(&mut events_rx).await?;

        stream_task.abort();
        let stream_outcome = match stream_task.await {
            Ok(outcome) => outcome,
            Err(join_error) if join_error.is_cancelled() => Ok(()),
            Err(join_error) => {
                warn!(error = %join_error, "chat stream task panicked");
                Ok(())
            }
        };

        match end {
            DispatchEnd::OperatorExit => {
                info!("operator exit");
                output::note("Goodbye.");
                Ok(())
            }
            DispatchEnd::Drained => {
                // A transport failure is what usually ends the stream;
                // surface it once the queue has been fully worked off.
                stream_outcome?;
                output::note("Chat stream closed.");
                Ok(())
            }
        }
    }
}
