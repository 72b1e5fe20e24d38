use anyhow::Context;
use axum::{extract::MatchedPath, http::Request};
use tower_http::trace::TraceLayer;
use tracing::info_span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ddragon_sketch::{
    app::{self, AppState},
    config::Config,
    ddragon::DataDragon,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().with_context(|| "invalid configuration")?;
    let bind_addr = config.bind_addr;
    let ddragon = DataDragon::new(config)?;
    let state = AppState::bootstrap(ddragon).await;

    let app = app::router(state).layer(TraceLayer::new_for_http().make_span_with(
        |request: &Request<_>| {
            let matched_path = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str);

            info_span!(
                "http_request",
                method = ?request.method(),
                matched_path,
            )
        },
    ));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to listen on {bind_addr}"))?;
    tracing::debug!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .await
        .with_context(|| "Failed to serve the app")?;
    Ok(())
}
