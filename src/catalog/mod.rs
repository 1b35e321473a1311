//! Query Template Catalog
//!
//! Static mapping `geo-operator → pattern key → template`, loaded once at
//! startup and shared read-only (behind an `Arc`) by every request. The
//! packaged catalog is compiled into the binary; a file can replace it.
//!
//! ```yaml
//! Containment:
//!   CLASS__CONTAINED_IN__ENTITY:
//!     pattern: "{ __ENTITY__ geo:hasGeometry ?aGeom . ... }"
//!     variable: "?target"
//! ```

mod parser;

pub use parser::{parse_template, TemplateSyntaxError};

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use geoqa_types::{GeoOperator, PatternTemplate, TriplePatternKey};
use serde::Deserialize;
use tracing::info;

use crate::config::TemplateSettings;
use crate::error::CatalogError;

/// Catalog shipped with the crate
pub const BUILTIN_CATALOG: &str = include_str!("../../config/query_templates.yaml");

#[derive(Debug, Deserialize)]
struct RawTemplate {
    pattern: String,
    #[serde(default)]
    variable: Option<String>,
}

#[derive(Debug, Default)]
pub struct TemplateCatalog {
    templates: HashMap<GeoOperator, HashMap<String, PatternTemplate>>,
}

impl TemplateCatalog {
    /// The packaged catalog
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Catalog named by settings, falling back to the packaged one
    pub fn from_settings(settings: &TemplateSettings) -> Result<Self, CatalogError> {
        match &settings.path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        info!("Loading query templates from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, BTreeMap<String, RawTemplate>> = serde_yaml::from_str(content)?;

        let mut templates = HashMap::new();
        for (operator_label, entries) in raw {
            let operator: GeoOperator = operator_label
                .parse()
                .map_err(|_| CatalogError::UnknownOperator(operator_label.clone()))?;

            let mut by_key = HashMap::new();
            for (key, entry) in entries {
                let template = Self::compile(&key, entry)?;
                by_key.insert(key, template);
            }
            templates.insert(operator, by_key);
        }

        let catalog = Self { templates };
        info!("Loaded {} query templates", catalog.len());
        Ok(catalog)
    }

    fn compile(key: &str, entry: RawTemplate) -> Result<PatternTemplate, CatalogError> {
        let segments = parse_template(&entry.pattern).map_err(|e| match e {
            TemplateSyntaxError::UnknownPlaceholder(token) => CatalogError::UnknownPlaceholder {
                key: key.to_string(),
                token,
            },
            TemplateSyntaxError::Malformed(message) => CatalogError::Syntax {
                key: key.to_string(),
                message,
            },
        })?;

        let output_variable = match entry.variable.map(|v| v.trim().to_string()) {
            None => None,
            Some(v) if v.is_empty() => None,
            Some(v) => {
                let valid = v.len() > 1
                    && v.starts_with('?')
                    && v[1..].chars().all(|c| c.is_alphanumeric() || c == '_');
                if !valid {
                    return Err(CatalogError::InvalidVariable {
                        key: key.to_string(),
                        variable: v,
                    });
                }
                Some(v)
            }
        };

        Ok(PatternTemplate {
            segments,
            output_variable,
        })
    }

    /// Template for a raw lookup key such as `CLASS__CONTAINED_IN__ENTITY`
    pub fn get(&self, operator: GeoOperator, key: &str) -> Option<&PatternTemplate> {
        self.templates.get(&operator)?.get(key)
    }

    /// Template for a triple pattern key; `None` is the normal sparse case
    pub fn lookup(&self, operator: GeoOperator, key: &TriplePatternKey) -> Option<&PatternTemplate> {
        self.get(operator, &key.lookup_key(operator.pattern_infix()))
    }

    pub fn keys(&self, operator: GeoOperator) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .templates
            .get(&operator)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.templates.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
