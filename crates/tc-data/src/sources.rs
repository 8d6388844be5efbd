use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tc_types::{TcError, TcResult};

use crate::providers::{CsvPriceProvider, PriceHistoryProvider, SampleDataProvider};

/// Which price-history source to build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    #[default]
    Sample,
    Csv { directory: PathBuf, pattern: String },
}

impl ProviderConfig {
    pub fn csv(directory: &str) -> Self {
        Self::Csv {
            directory: PathBuf::from(directory),
            pattern: "{ticker}.csv".to_string(),
        }
    }

    /// Build from a provider kind name (`sample` | `csv`) plus CSV settings
    pub fn from_kind(kind: &str, directory: PathBuf, pattern: String) -> TcResult<Self> {
        match ProviderKind::from_str(kind)? {
            ProviderKind::Sample => Ok(Self::Sample),
            ProviderKind::Csv => Ok(Self::Csv { directory, pattern }),
        }
    }

    pub fn build(&self) -> Arc<dyn PriceHistoryProvider> {
        match self {
            Self::Sample => Arc::new(SampleDataProvider::new()),
            Self::Csv { directory, pattern } => {
                Arc::new(CsvPriceProvider::new(directory).with_pattern(pattern))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProviderKind {
    Sample,
    Csv,
}

impl FromStr for ProviderKind {
    type Err = TcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sample" => Ok(Self::Sample),
            "csv" => Ok(Self::Csv),
            other => Err(TcError::Config(format!("unknown price provider: {}", other))),
        }
    }
}
