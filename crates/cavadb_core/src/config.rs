//! Catalog configuration.

/// Collection names used by a catalog.
///
/// The defaults match the conventional layout; overriding them lets
/// several catalogs share one store, or an existing data set keep its
/// legacy names.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Name of the bottles collection.
    pub bottles: String,
    /// Name of the reviews collection.
    pub reviews: String,
    /// Name of the regions collection.
    pub regions: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            bottles: "bottles".to_string(),
            reviews: "reviews".to_string(),
            regions: "regions".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Creates a configuration with default collection names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bottles collection name.
    #[must_use]
    pub fn bottles(mut self, name: impl Into<String>) -> Self {
        self.bottles = name.into();
        self
    }

    /// Sets the reviews collection name.
    #[must_use]
    pub fn reviews(mut self, name: impl Into<String>) -> Self {
        self.reviews = name.into();
        self
    }

    /// Sets the regions collection name.
    #[must_use]
    pub fn regions(mut self, name: impl Into<String>) -> Self {
        self.regions = name.into();
        self
    }
}
