//! Versioned rule tables backing both scorers.
//!
//! The built-in tables ship as CSV assets compiled into the crate. Deployments can point
//! the loader at replacement files; every replacement must carry its own rules version so
//! report output stays attributable to the dataset that produced it.

mod categories;
mod jurisdictions;

pub use categories::{BuildingCategory, CategoryKind, CategoryTable};
pub use jurisdictions::{JurisdictionRecord, JurisdictionTable};

use super::domain::Zone;
use crate::config::RulesConfig;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const BUILTIN_RULES_VERSION: &str = "2025.10-dd.1";

const BUILTIN_CATEGORIES: &str = include_str!("../../../data/categories.csv");
const BUILTIN_JURISDICTIONS: &str = include_str!("../../../data/jurisdictions.csv");

/// Load and validation failures. Raised only while constructing a [`Ruleset`].
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read rules table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {table} table data: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("{table} table row {row}: {reason}")]
    InvalidRow {
        table: &'static str,
        row: usize,
        reason: String,
    },
    #[error("duplicate {table} key '{key}'")]
    Duplicate { table: &'static str, key: String },
    #[error("{table} table has no rows")]
    Empty { table: &'static str },
    #[error("category table must define exactly one fallback category (found {found})")]
    FallbackCount { found: usize },
    #[error("jurisdiction {code} stores zone {stored} but score {score} derives {derived}")]
    ZoneMismatch {
        code: String,
        score: u8,
        stored: Zone,
        derived: Zone,
    },
    #[error("rules version must not be blank")]
    BlankVersion,
}

/// Immutable pair of tables plus the version label stamped on every result.
#[derive(Debug, Clone)]
pub struct Ruleset {
    version: String,
    categories: CategoryTable,
    jurisdictions: JurisdictionTable,
}

impl Ruleset {
    pub fn builtin() -> Result<Self, RulesError> {
        Self::from_readers(
            BUILTIN_RULES_VERSION,
            BUILTIN_CATEGORIES.as_bytes(),
            BUILTIN_JURISDICTIONS.as_bytes(),
        )
    }

    pub fn from_readers<C: Read, J: Read>(
        version: impl Into<String>,
        categories: C,
        jurisdictions: J,
    ) -> Result<Self, RulesError> {
        let categories = CategoryTable::from_reader(categories)?;
        let jurisdictions = JurisdictionTable::from_reader(jurisdictions)?;
        Self::new(version, categories, jurisdictions)
    }

    pub fn new(
        version: impl Into<String>,
        categories: CategoryTable,
        jurisdictions: JurisdictionTable,
    ) -> Result<Self, RulesError> {
        let version = version.into().trim().to_string();
        if version.is_empty() {
            return Err(RulesError::BlankVersion);
        }

        info!(
            rules_version = %version,
            categories = categories.len(),
            jurisdictions = jurisdictions.len(),
            "rule tables loaded"
        );

        Ok(Self {
            version,
            categories,
            jurisdictions,
        })
    }

    /// Build from configuration, substituting any table given by path.
    pub fn load(config: &RulesConfig) -> Result<Self, RulesError> {
        if config.category_table.is_none() && config.jurisdiction_table.is_none() {
            if let Some(version) = &config.version {
                warn!(
                    requested = %version,
                    builtin = BUILTIN_RULES_VERSION,
                    "rules version override ignored without replacement tables"
                );
            }
            return Self::builtin();
        }

        let version = config.version.clone().ok_or(RulesError::BlankVersion)?;
        let categories = match &config.category_table {
            Some(path) => CategoryTable::from_reader(open_table(path)?)?,
            None => CategoryTable::from_reader(BUILTIN_CATEGORIES.as_bytes())?,
        };
        let jurisdictions = match &config.jurisdiction_table {
            Some(path) => JurisdictionTable::from_reader(open_table(path)?)?,
            None => JurisdictionTable::from_reader(BUILTIN_JURISDICTIONS.as_bytes())?,
        };

        Self::new(version, categories, jurisdictions)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn jurisdictions(&self) -> &JurisdictionTable {
        &self.jurisdictions
    }
}

fn open_table(path: &Path) -> Result<File, RulesError> {
    File::open(path).map_err(|source| RulesError::Io {
        path: path.to_path_buf(),
        source,
    })
}
