// ABOUTME: External collaborator seams - recipe source, product resolver, delivery, tokens
// ABOUTME: The core only sees these traits; network-facing implementations live elsewhere
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! External collaborator interfaces.
//!
//! The pipeline is synchronous; collaborators are opaque blocking calls that
//! return a result or an error. Every failure here is degraded-non-fatal:
//! the orchestrator records a fallback and continues. Shipped
//! implementations are local/file-backed stand-ins for the real services.

/// File-backed recipe source and the fixed placeholder set
pub mod meal_buckets;

pub use meal_buckets::BucketRecipeSource;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};
use crate::models::{AttachedRecipe, PlanIntent, RolledGroceryItem, UserProfile};

/// Recipe attachment collaborator.
///
/// Receives the meal-identifier table (inside the plan intent) plus the
/// user's dietary constraints and macro targets; must return one recipe per
/// submitted meal identifier. The orchestrator treats malformed or missing
/// responses as degraded and fills gaps from the placeholder set.
pub trait RecipeSource {
    /// Attach one recipe per meal identifier in the plan
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot produce recipes at all; the
    /// caller falls back to placeholders.
    fn attach(&self, plan: &PlanIntent, profile: &UserProfile) -> AppResult<Vec<AttachedRecipe>>;
}

/// One product annotation from the retailer resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMatch {
    /// Normalized ingredient name the match applies to
    pub name_normalized: String,
    /// Store product name
    pub store_item_name: String,
    /// Price in USD, when the store returned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
    /// Store SKU
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Match quality (exact/approximate/best-effort)
    pub match_type: String,
}

/// Grocery-retailer product resolution collaborator.
///
/// The pipeline never blocks on this; its absence simply leaves price
/// fields empty.
pub trait ProductResolver {
    /// Resolve rolled grocery items to store products
    ///
    /// # Errors
    ///
    /// Returns an error when the retailer call fails; the caller logs and
    /// continues without annotations.
    fn resolve(&self, items: &[RolledGroceryItem]) -> AppResult<Vec<ProductMatch>>;
}

/// Resolver used when no retailer integration is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProductResolver;

impl ProductResolver for NoopProductResolver {
    fn resolve(&self, _items: &[RolledGroceryItem]) -> AppResult<Vec<ProductMatch>> {
        Ok(Vec::new())
    }
}

/// Digest delivery collaborator. Delivery failure is logged, never fatal to
/// the pipeline's own exit code.
pub trait DigestDelivery {
    /// Deliver the finished digest
    ///
    /// # Errors
    ///
    /// Returns an error when delivery fails; the caller logs and continues.
    fn deliver(&self, subject: &str, body: &str) -> AppResult<()>;
}

/// Delivery implementation that writes an RFC-5322-style draft file to the
/// output directory instead of sending anything.
#[derive(Debug, Clone)]
pub struct DraftFileDelivery {
    /// Directory the draft is written into
    pub out_dir: PathBuf,
    /// Recipient address written into the draft headers
    pub to: String,
}

impl DigestDelivery for DraftFileDelivery {
    fn deliver(&self, subject: &str, body: &str) -> AppResult<()> {
        let draft = format!("To: {}\nSubject: {}\n\n{}\n", self.to, subject, body);
        let path = self.out_dir.join("digest_draft.eml");
        fs::write(&path, draft)?;
        tracing::info!(path = %path.display(), "digest draft written");
        Ok(())
    }
}

/// An access token with an explicit expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Opaque token value
    pub value: String,
    /// Expiry instant
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token has expired as of `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Injected token capability for authenticated collaborators.
///
/// The core never touches token storage directly; collaborator handles
/// arrive pre-authenticated and use this only to refresh.
pub trait TokenProvider {
    /// Fetch a currently-valid token
    ///
    /// # Errors
    ///
    /// Returns an error when no unexpired token is available.
    fn get_token(&self) -> AppResult<AccessToken>;
}

/// File-backed token cache stand-in
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    /// Path of the cached token JSON
    pub path: PathBuf,
}

impl TokenProvider for FileTokenCache {
    fn get_token(&self) -> AppResult<AccessToken> {
        let raw = fs::read_to_string(&self.path)?;
        let token: AccessToken = serde_json::from_str(&raw)?;
        if token.is_expired(Utc::now()) {
            return Err(AppError::external_service(
                "token_cache",
                format!("token expired at {}", token.expires_at),
            ));
        }
        Ok(token)
    }
}
