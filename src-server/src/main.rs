use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use todoissimus_server::config::{self, Config};
use todoissimus_server::{build_router, tls, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = config::load_env_file(None);
    let config = Config::parse();
    let _log = rolling_logger::init_logger(config.log_dir.clone(), "todoissimus-server")?;

    if let Some(path) = env_file {
        tracing::info!("loaded environment from {}", path.display());
    }
    if config.server_token().is_none() {
        tracing::warn!("TODOIST_TOKEN is not set; /api requests need an X-Auth-Token header");
    }

    let state = AppState::from_config(&config);
    let app = build_router(state, &config.static_dir);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let url = config.local_url();
    tracing::info!("Todoissimus running at {}", url);
    tracing::info!("proxying /api to {}", config.api_base);

    let https = match config.tls_files() {
        Some((cert, key)) => {
            let tls_config = tls::load_tls(cert, key)
                .await
                .with_context(|| format!("loading TLS files {} / {}", cert.display(), key.display()))?;
            let addr = tokio::net::lookup_host((config.host.as_str(), config.https_port))
                .await?
                .next()
                .with_context(|| format!("cannot resolve {}", config.host))?;
            tracing::info!("HTTPS enabled on port {}", config.https_port);
            Some(tls::serve_https(addr, tls_config, app.clone()))
        }
        None => None,
    };

    if config.should_open_browser() {
        if let Err(e) = open::that(&url) {
            tracing::warn!("could not open browser: {}", e);
        }
    }

    let http = async { axum::serve(listener, app).await };
    match https {
        Some(https) => {
            tokio::try_join!(http, https)?;
        }
        None => http.await?,
    }
    Ok(())
}
