//! Application configuration
//!
//! Collection descriptors, form vocabularies and the local sign-in profile.
//! Defaults are built in; JSON overrides are validated on load.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::auth::User;
use crate::domain::DocumentId;
use crate::store::CollectionSpec;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One entry of a recommended vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub key: String,
    pub label: String,
}

/// A category with the chip color it renders with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryChoice {
    pub key: String,
    pub label: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    pub inventory: CollectionSpec,
    pub tags: CollectionSpec,
}

/// Initial values of the item form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefaults {
    pub quantity: f64,
    pub unit: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub collections: Collections,
    pub units: Vec<Choice>,
    pub categories: Vec<CategoryChoice>,
    pub defaults: FormDefaults,
    /// Profile the local auth provider signs in as
    pub profile: User,
}

fn choice(key: &str, label: &str) -> Choice {
    Choice {
        key: key.to_string(),
        label: label.to_string(),
    }
}

fn category(key: &str, color: &str) -> CategoryChoice {
    CategoryChoice {
        key: key.to_string(),
        label: key.to_string(),
        color: color.to_string(),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collections: Collections {
                inventory: CollectionSpec::new("inventory", "name"),
                tags: CollectionSpec::new("tags", "label"),
            },
            units: vec![
                choice("pcs", "Pieces"),
                choice("kg", "Kilograms"),
                choice("g", "Grams"),
                choice("L", "Liters"),
                choice("ml", "Milliliters"),
                choice("oz", "Ounces"),
                choice("lb", "Pounds"),
                choice("gal", "Gallons"),
                choice("box", "Box"),
                choice("can", "Can"),
            ],
            categories: vec![
                category("Produce", "success"),
                category("Dairy", "primary"),
                category("Meat", "danger"),
                category("Pantry", "warning"),
                category("Frozen", "secondary"),
                category("Beverages", "default"),
                category("Snacks", "warning"),
                category("Household", "default"),
            ],
            defaults: FormDefaults {
                quantity: 1.0,
                unit: "pcs".to_string(),
                category: "Pantry".to_string(),
            },
            profile: User {
                uid: "local-user".to_string(),
                display_name: Some("Pantry User".to_string()),
                email: Some("user@pantry.local".to_string()),
                photo_url: None,
            },
        }
    }
}

impl AppConfig {
    /// Parse and validate a full configuration document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for spec in [&self.collections.inventory, &self.collections.tags] {
            if spec.name.trim().is_empty() || spec.order_by.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "collection name and order field must be non-empty".to_string(),
                ));
            }
        }
        if self.collections.inventory.name == self.collections.tags.name {
            return Err(ConfigError::Invalid(format!(
                "inventory and tags share collection {}",
                self.collections.tags.name
            )));
        }

        check_keys("unit", self.units.iter().map(|c| c.key.as_str()))?;
        check_keys("category", self.categories.iter().map(|c| c.key.as_str()))?;

        if !self.units.iter().any(|u| u.key == self.defaults.unit) {
            return Err(ConfigError::Invalid(format!(
                "default unit {} is not a listed unit",
                self.defaults.unit
            )));
        }
        if !self.categories.iter().any(|c| c.key == self.defaults.category) {
            return Err(ConfigError::Invalid(format!(
                "default category {} is not a listed category",
                self.defaults.category
            )));
        }
        Ok(())
    }

    /// Chip color for a category; unknown categories get "default"
    pub fn category_color(&self, category: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.key == category)
            .map_or("default", |c| c.color.as_str())
    }

    pub fn unit_label<'a>(&'a self, unit: &'a str) -> &'a str {
        self.units
            .iter()
            .find(|u| u.key == unit)
            .map_or(unit, |u| u.label.as_str())
    }
}

fn check_keys<'a>(kind: &str, keys: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    let mut any = false;
    for key in keys {
        any = true;
        if key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("empty {} key", kind)));
        }
        if !seen.insert(key) {
            return Err(ConfigError::Invalid(format!("duplicate {} key {}", kind, key)));
        }
    }
    if !any {
        return Err(ConfigError::Invalid(format!("no {} choices", kind)));
    }
    Ok(())
}

/// A document to preload, with a fixed identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedDocument {
    pub id: DocumentId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Initial data per collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(flatten)]
    pub collections: BTreeMap<String, Vec<SeedDocument>>,
}

impl Seed {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
