/// Orbit Desk - small-business dashboard core
///
/// Syncs a business's external presence (listing, reviews, social media)
/// into a local store, manages a media library on object storage and drafts
/// replies and captions with a language model.
mod api;
mod config;
mod context;
mod credentials;
mod db;
mod error;
mod library;
mod normalize;
mod providers;
mod server;
mod store;
mod suggest;
mod sync;

use config::ServerConfig;
use context::AppContext;
use error::DeskResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> DeskResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orbit_desk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
   ____       __    _ __     ____            __
  / __ \_____/ /_  (_) /_   / __ \___  _____/ /__
 / / / / ___/ __ \/ / __/  / / / / _ \/ ___/ //_/
/ /_/ / /  / /_/ / / /_   / /_/ /  __(__  ) ,<
\____/_/  /_.___/_/\__/  /_____/\___/____/_/|_|

        Business Dashboard Core v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
