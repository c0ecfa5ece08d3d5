// crates/larder-core/src/paths.rs

use std::path::{Path, PathBuf};

/// Raw export filename for the per-menu-item ingredient table, as the POS
/// vendor ships it.
pub const INGREDIENT_EXPORT: &str = "MSY Data - Ingredient.csv";
/// Raw export filename for the shipment log.
pub const SHIPMENT_EXPORT: &str = "MSY Data - Shipment.csv";
/// Marker substring that identifies a monthly sales extract.
pub const SALES_MARKER: &str = "Data_Matrix";

pub const STAGED_INGREDIENTS: &str = "ingredients_staged.csv";
pub const STAGED_SHIPMENTS: &str = "shipments_staged.csv";
pub const STAGED_SALES: &str = "sales_staged.csv";
pub const STAGED_FORECAST: &str = "forecast_ingredients.csv";

/// Fixed relative layout of the data directory: `raw/` holds vendor exports,
/// `staged/` the pipeline outputs, `processed/` optional curated copies that
/// the serving layer prefers over staged ones.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the data root from `LARDER_DATA_DIR`, defaulting to `data`.
    pub fn from_env() -> Self {
        let root = std::env::var("LARDER_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    pub fn staged_dir(&self) -> PathBuf {
        self.root.join("staged")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }

    pub fn raw_ingredients(&self) -> PathBuf {
        self.raw_dir().join(INGREDIENT_EXPORT)
    }

    pub fn raw_shipments(&self) -> PathBuf {
        self.raw_dir().join(SHIPMENT_EXPORT)
    }

    pub fn staged_ingredients(&self) -> PathBuf {
        self.staged_dir().join(STAGED_INGREDIENTS)
    }

    pub fn staged_shipments(&self) -> PathBuf {
        self.staged_dir().join(STAGED_SHIPMENTS)
    }

    pub fn staged_sales(&self) -> PathBuf {
        self.staged_dir().join(STAGED_SALES)
    }

    pub fn staged_forecast(&self) -> PathBuf {
        self.staged_dir().join(STAGED_FORECAST)
    }

    /// Serving-layer lookup: the processed copy of a dataset wins over the
    /// staged one; `None` when neither exists.
    pub fn dataset(&self, filename: &str) -> Option<PathBuf> {
        let processed = self.processed_dir().join(filename);
        if processed.exists() {
            return Some(processed);
        }
        let staged = self.staged_dir().join(filename);
        if staged.exists() {
            return Some(staged);
        }
        None
    }
}
