//! Category Storage
//!
//! Professional categories: the slow-changing lookup data the cache fronts.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{StorageError, StorageResult};

// == Category ==
/// A professional category listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: u32,
    pub slug: String,
    pub name: String,
    pub description: String,
}

impl Category {
    pub fn new(id: u32, slug: &str, name: &str, description: &str) -> Self {
        Self {
            id,
            slug: slug.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

// == Category Source ==
/// Backing store for category lookups.
#[async_trait]
pub trait CategorySource: Send + Sync {
    /// Returns every category, ordered by id.
    async fn list_categories(&self) -> StorageResult<Vec<Category>>;

    /// Returns the category with the given slug.
    async fn get_category(&self, slug: &str) -> StorageResult<Category>;
}

// == In-Memory Source ==
/// Category source held in memory.
///
/// Counts every fetch, can be switched unavailable and can simulate a slow
/// store, which makes the effect of the cache in front of it observable.
#[derive(Debug, Default)]
pub struct InMemoryCategorySource {
    categories: Vec<Category>,
    fetches: AtomicUsize,
    unavailable: AtomicBool,
    /// Delay applied to every read
    latency: Option<Duration>,
}

impl InMemoryCategorySource {
    pub fn new(mut categories: Vec<Category>) -> Self {
        categories.sort_by_key(|c| c.id);
        Self {
            categories,
            fetches: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
            latency: None,
        }
    }

    /// Makes every read wait `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Source holding the directory's standard professional categories.
    pub fn seeded() -> Self {
        Self::new(default_categories())
    }

    /// Number of reads served so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Makes subsequent reads fail with [`StorageError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    async fn begin_fetch(&self) -> StorageResult<()> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "category store is unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CategorySource for InMemoryCategorySource {
    async fn list_categories(&self) -> StorageResult<Vec<Category>> {
        self.begin_fetch().await?;
        debug!("Loading {} categories from store", self.categories.len());
        Ok(self.categories.clone())
    }

    async fn get_category(&self, slug: &str) -> StorageResult<Category> {
        self.begin_fetch().await?;
        self.categories
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Category not found: {}", slug)))
    }
}

/// The twelve categories the directory launches with.
pub fn default_categories() -> Vec<Category> {
    [
        ("lawyers", "Lawyers", "Legal advice and representation"),
        ("accountants", "Accountants", "Bookkeeping, audits and financial statements"),
        ("architects", "Architects", "Building design and planning permits"),
        ("engineers", "Engineers", "Structural, civil and technical engineering"),
        ("financial-advisors", "Financial Advisors", "Investment and retirement planning"),
        ("tax-advisors", "Tax Advisors", "Tax returns and tax planning"),
        ("notaries", "Notaries", "Deeds, certifications and authentication"),
        ("real-estate-agents", "Real Estate Agents", "Property sales and rentals"),
        ("insurance-brokers", "Insurance Brokers", "Personal and business insurance"),
        ("consultants", "Consultants", "Business and management consulting"),
        ("interior-designers", "Interior Designers", "Interior layout and decoration"),
        ("surveyors", "Surveyors", "Land and building surveys"),
    ]
    .iter()
    .zip(1..)
    .map(|(&(slug, name, description), id)| Category::new(id, slug, name, description))
    .collect()
}
