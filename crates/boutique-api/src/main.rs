//! # Card Boutique
//!
//! Storefront backend: product catalog, admin login and order relay.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables (or put them in .env)
//! export JWT_SECRET=...
//! export ADMIN_PASSWORD=...
//! export MAIL_HOST=smtp.example.com MAIL_PORT=465 MAIL_USER=... MAIL_PASS=... MAIL_SECURE=true
//!
//! # Run the server
//! card-boutique
//! ```

use boutique_api::{routes, state::AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;

    info!("Environment: {}", state.config.environment);
    info!("Products file: {}", state.config.products_file.display());
    info!("Static site: {}", state.config.static_dir.display());
    if state.mail_enabled() {
        info!("Order emails go to {}", state.config.admin_email);
    } else {
        warn!("Mail transport not configured, order requests will be rejected");
    }

    let app = routes::create_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filters, `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
