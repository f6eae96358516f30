// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

mod api;
mod auth;
mod clients;
mod config;
mod error;
mod mailer;
mod models;
mod state;
mod store;

#[cfg(not(test))]
use std::{env, net::SocketAddr, process, sync::Arc};

#[cfg(not(test))]
use tracing::{error, info};
#[cfg(not(test))]
use tracing_subscriber::EnvFilter;

#[cfg(not(test))]
use api::router;
#[cfg(not(test))]
use clients::{HttpAuthClient, HttpPostClient};
#[cfg(not(test))]
use config::Config;
#[cfg(not(test))]
use mailer::Mailer;
#[cfg(not(test))]
use state::AppState;

#[cfg(not(test))]
#[tokio::main]
async fn main() {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error");
            process::exit(1);
        }
    };

    let mailer = match Mailer::new(&config) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            error!(error = %e, "SMTP transport setup failed");
            process::exit(1);
        }
    };

    let auth_client = match HttpAuthClient::new(&config.auth_service_url) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "auth service client setup failed");
            process::exit(1);
        }
    };
    let post_client = match HttpPostClient::new(&config.post_service_url) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "post service client setup failed");
            process::exit(1);
        }
    };

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, "invalid bind address");
            process::exit(1);
        }
    };

    let state = match AppState::new(config, mailer, auth_client, post_client) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "state initialization failed");
            process::exit(1);
        }
    };

    if let (Ok(username), Ok(password)) = (
        env::var("SEED_ADMIN_USERNAME"),
        env::var("SEED_ADMIN_PASSWORD"),
    ) {
        if let Err(e) = state.seed_admin(&username, &password).await {
            error!(error = %e, "admin seeding failed");
            process::exit(1);
        }
        info!(username = %username, "seeded admin account");
    }

    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "failed to bind");
            process::exit(1);
        }
    };

    info!("social gateway listening on http://{addr} (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        process::exit(1);
    }
}

#[cfg(not(test))]
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("social_gateway=info,tower_http=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(not(test))]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
