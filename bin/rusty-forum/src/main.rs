//! # Rusty-Forum Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod settings;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use rf_api::middleware::{cors_policy, standard_middleware};
use rf_api::{configure_routes, AppState};
use rf_core::{ForumService, Repos};
use secrecy::ExposeSecret;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(all(feature = "db-sqlite", not(feature = "db-memory")))]
use rf_db_sqlite::SqliteForumRepo;

#[cfg(feature = "db-memory")]
use rf_db_memory::MemoryForumRepo;

#[cfg(feature = "auth-simple")]
use rf_auth_simple::SimpleAuthProvider;

#[cfg(not(any(feature = "db-sqlite", feature = "db-memory")))]
compile_error!("enable one storage feature: `db-sqlite` or `db-memory`");

#[cfg(not(feature = "auth-simple"))]
compile_error!("enable an auth feature: `auth-simple`");

use crate::settings::{LogSettings, Settings};

fn init_tracing(log: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

// `db-memory` wins when both stores are compiled in.
#[cfg(feature = "db-memory")]
async fn build_repos(_settings: &Settings) -> anyhow::Result<Repos> {
    info!("using in-memory store; data is lost on exit");
    Ok(Repos::from_store(Arc::new(MemoryForumRepo::new())))
}

#[cfg(all(feature = "db-sqlite", not(feature = "db-memory")))]
async fn build_repos(settings: &Settings) -> anyhow::Result<Repos> {
    let repo = SqliteForumRepo::new(&settings.database.url)
        .await
        .with_context(|| format!("opening {}", settings.database.url))?;
    info!(url = %settings.database.url, "sqlite store ready");
    Ok(Repos::from_store(Arc::new(repo)))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    // 1. Storage
    let repos = build_repos(&settings).await?;

    // 2. Auth
    let auth = SimpleAuthProvider::new(settings.auth.token_secret.expose_secret())
        .with_ttl(chrono::Duration::seconds(settings.auth.token_ttl_secs));

    // 3. Shared state (dynamic dispatch keeps the plugins swappable)
    let state = web::Data::new(AppState {
        forum: ForumService::new(repos),
        auth: Box::new(auth),
    });

    let bind = (settings.server.host.clone(), settings.server.port);
    info!("Rusty-Forum starting on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(standard_middleware())
            .wrap(cors_policy())
            .configure(configure_routes)
    })
    .bind(bind)
    .context("binding listener")?
    .run()
    .await?;

    Ok(())
}
