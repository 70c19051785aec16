//! Pricing service functions with database and cache access.
//!
//! The active rate table is read-through cached: consumers always get a
//! config, falling back to the hardcoded defaults when no active record
//! exists, the stored record is malformed, or the database is unreachable.
//! Saves invalidate the cache so every screen picks up new rates on its next
//! read; the background warmer re-polls on an interval as well.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::warn;

use crate::cache::AppCache;
use crate::db::queries;
use crate::error::{AppError, Result};

use super::config::{default_pricing, PricingConfig};

/// Current rate table. Never fails and never blocks the quote flow.
pub async fn active_pricing(pool: &PgPool, cache: &AppCache) -> Arc<PricingConfig> {
    if let Some(cached) = cache.pricing.get(AppCache::PRICING_KEY).await {
        return cached;
    }

    let config = Arc::new(load_pricing(pool).await);
    cache
        .pricing
        .insert(AppCache::PRICING_KEY.to_string(), config.clone())
        .await;
    config
}

/// Fetch the active config from the store, degrading to defaults.
pub(crate) async fn load_pricing(pool: &PgPool) -> PricingConfig {
    match queries::get_active_pricing(pool).await {
        Ok(Some(value)) => match PricingConfig::from_stored(value) {
            Some(config) => config,
            None => {
                warn!("Active pricing config is malformed, using defaults");
                default_pricing()
            }
        },
        Ok(None) => default_pricing(),
        Err(e) => {
            warn!("Failed to load pricing config, using defaults: {}", e);
            default_pricing()
        }
    }
}

/// Replace the active rate table. Strictly validated, then cache-invalidated.
pub async fn save_pricing(
    pool: &PgPool,
    cache: &AppCache,
    config: PricingConfig,
) -> Result<PricingConfig> {
    config.validate().map_err(AppError::Validation)?;

    let value = serde_json::to_value(&config)
        .map_err(|e| AppError::Internal(format!("failed to serialize pricing config: {e}")))?;
    queries::upsert_active_pricing(pool, value).await?;

    cache.invalidate_pricing().await;
    Ok(config)
}

/// Restore the default rate card as the active config.
pub async fn reset_pricing(pool: &PgPool, cache: &AppCache) -> Result<PricingConfig> {
    save_pricing(pool, cache, default_pricing()).await
}
