//! In-memory caching using moka
//!
//! Application-level caching for the active pricing config and email
//! settings. Both are read on every quote, change rarely, and must never
//! block the public forms, so they get short TTLs plus explicit invalidation
//! from the write paths. A background warmer re-polls on an interval as a
//! fallback for changes made outside this process.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::db::queries;
use crate::models::EmailSettings;
use crate::pricing::config::PricingConfig;

/// Application cache holding the active rate table and email settings
#[derive(Clone)]
pub struct AppCache {
    /// Active pricing config (singleton)
    pub pricing: Cache<String, Arc<PricingConfig>>,
    /// Email settings (singleton)
    pub email_settings: Cache<String, Arc<EmailSettings>>,
}

impl AppCache {
    pub const PRICING_KEY: &'static str = "active";
    pub const EMAIL_SETTINGS_KEY: &'static str = "settings";

    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Pricing config: 1 entry, 5 min TTL
            pricing: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(5 * 60))
                .build(),

            // Email settings: 1 entry, 10 min TTL
            email_settings: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            pricing_cached: self.pricing.entry_count() > 0,
            email_settings_cached: self.email_settings.entry_count() > 0,
        }
    }

    /// Drop the cached rate table after a pricing save
    pub async fn invalidate_pricing(&self) {
        self.pricing.invalidate(Self::PRICING_KEY).await;
        info!("Pricing config cache invalidated");
    }

    /// Drop the cached email settings after a settings save
    pub async fn invalidate_email_settings(&self) {
        self.email_settings.invalidate(Self::EMAIL_SETTINGS_KEY).await;
        info!("Email settings cache invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub pricing_cached: bool,
    pub email_settings_cached: bool,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 5 minutes, picking up
/// config changes made by other writers.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    warm_cache(&cache, &db).await;

    let mut interval = interval(Duration::from_secs(5 * 60));
    interval.tick().await; // first tick fires immediately
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Refresh the cached singletons from the store
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    let config = crate::pricing::services::load_pricing(db).await;
    cache
        .pricing
        .insert(AppCache::PRICING_KEY.to_string(), Arc::new(config))
        .await;

    match queries::get_email_settings(db).await {
        Ok(settings) => {
            cache
                .email_settings
                .insert(
                    AppCache::EMAIL_SETTINGS_KEY.to_string(),
                    Arc::new(settings.unwrap_or_default()),
                )
                .await;
        }
        Err(e) => warn!("Failed to warm email settings cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
