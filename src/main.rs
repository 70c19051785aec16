use std::env;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use shinypath_web::notify::{NoopMailer, ResendMailer};
use shinypath_web::{auth, cache, notify, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shinypath_web=info,tower_http=info")),
        )
        .init();

    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/shinypath".to_string());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    auth::seed_admin(&pool).await?;

    let mailer: Arc<dyn notify::Mailer> = match env::var("RESEND_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => Arc::new(ResendMailer::new(api_key)),
        _ => {
            tracing::warn!("RESEND_API_KEY not set; email delivery disabled");
            Arc::new(NoopMailer)
        }
    };

    let site_url = env::var("SITE_URL")
        .unwrap_or_else(|_| "https://app.shinypathcleaning.ca".to_string());

    let state = AppState {
        db: pool.clone(),
        cache: cache::AppCache::new(),
        mailer,
        site_url,
    };

    tokio::spawn(cache::start_cache_warmer(state.cache.clone(), pool.clone()));
    tokio::spawn(notify::run_outbox_dispatcher(state.clone()));

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Starting Shiny Path Cleaning backend on port {}", port);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
