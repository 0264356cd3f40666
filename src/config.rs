//! Engine defaults loaded from YAML.
//!
//! ```yaml
//! validation:
//!   require-all-strings: true
//! search:
//!   page-size: 50
//!   fuzzy: true
//!   fuzzy-threshold: 70
//! conversion:
//!   allow-capo: true
//!   max-capo-position: 5
//! ```
//!
//! Every key is optional; missing sections fall back to the defaults of the
//! matching options struct.

use std::path::Path;

use serde::Deserialize;

use crate::error::{FretworkError, Result};
use crate::search::{SearchCriteria, SearchOptions, DEFAULT_FUZZY_THRESHOLD, DEFAULT_PAGE_SIZE};
use crate::tuning::{ConversionOptions, CAPO_LIMIT};
use crate::validation::ValidationOptions;

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FretworkConfig {
    pub validation: ValidationSection,
    pub search: SearchSection,
    pub conversion: ConversionSection,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ValidationSection {
    pub require_all_strings: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SearchSection {
    pub page_size: usize,
    pub fuzzy: bool,
    /// Percent, 0-100.
    pub fuzzy_threshold: f64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fuzzy: false,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ConversionSection {
    pub allow_capo: bool,
    pub max_capo_position: u8,
}

impl Default for ConversionSection {
    fn default() -> Self {
        let defaults = ConversionOptions::default();
        Self {
            allow_capo: defaults.allow_capo,
            max_capo_position: defaults.max_capo_position,
        }
    }
}

impl FretworkConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: FretworkConfig = serde_yaml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    fn check(&self) -> Result<()> {
        if self.search.page_size == 0 {
            return Err(FretworkError::Config("search.page-size must be at least 1".to_string()));
        }
        if !(0.0..=100.0).contains(&self.search.fuzzy_threshold) {
            return Err(FretworkError::Config(format!(
                "search.fuzzy-threshold must be between 0 and 100, got {}",
                self.search.fuzzy_threshold
            )));
        }
        Ok(())
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            require_all_strings: self.validation.require_all_strings,
        }
    }

    /// Search options with the configured paging and fuzzy defaults and no filters.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            criteria: SearchCriteria {
                fuzzy: self.search.fuzzy,
                fuzzy_threshold: self.search.fuzzy_threshold,
                ..SearchCriteria::default()
            },
            page_size: self.search.page_size,
            ..SearchOptions::default()
        }
    }

    /// Conversion options; the capo limit is clamped to 12.
    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            allow_capo: self.conversion.allow_capo,
            max_capo_position: self.conversion.max_capo_position.min(CAPO_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FretworkConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, FretworkConfig::default());
        assert!(!config.validation_options().require_all_strings);
        assert_eq!(config.search_options().page_size, 20);
        assert_eq!(config.search_options().criteria.fuzzy_threshold, 60.0);
        assert_eq!(config.conversion_options(), ConversionOptions::default());
    }

    #[test]
    fn test_partial_sections() {
        let yaml = "search:\n  fuzzy: true\n  page-size: 5\nconversion:\n  max-capo-position: 30\n";
        let config = FretworkConfig::from_yaml_str(yaml).unwrap();

        let search = config.search_options();
        assert!(search.criteria.fuzzy);
        assert_eq!(search.page_size, 5);
        assert_eq!(search.criteria.fuzzy_threshold, 60.0);
        assert_eq!(config.conversion_options().max_capo_position, 12);
        assert!(config.conversion_options().allow_capo);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            FretworkConfig::from_yaml_str("search:\n  page-size: 0\n"),
            Err(FretworkError::Config(_))
        ));
        assert!(matches!(
            FretworkConfig::from_yaml_str("search:\n  fuzzy-threshold: 150\n"),
            Err(FretworkError::Config(_))
        ));
        assert!(matches!(
            FretworkConfig::from_yaml_str("serach:\n  fuzzy: true\n"),
            Err(FretworkError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "validation:\n  require-all-strings: true").unwrap();
        let config = FretworkConfig::load(file.path()).unwrap();
        assert!(config.validation_options().require_all_strings);

        let missing = FretworkConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(FretworkError::Io(_))));
    }
}
