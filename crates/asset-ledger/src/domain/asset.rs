//! # Assets and the Asset Registry
//!
//! The inventory is a closed set handed to the ledger at construction.
//! Identifiers are never added or removed at runtime.

use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Separator reserved by the key layout; identifiers may not contain it.
const KEY_SEPARATOR: char = ':';

/// Identifier of a registered asset (e.g. `pc_a`, `wifi_b`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that an identifier can be used as a storage key.
    pub fn validate(id: &str) -> Result<(), &'static str> {
        if id.is_empty() {
            return Err("identifier must not be empty");
        }
        if id.contains(KEY_SEPARATOR) {
            return Err("identifier must not contain ':'");
        }
        if id.chars().any(char::is_whitespace) {
            return Err("identifier must not contain whitespace");
        }
        Ok(())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Asset category. Informational only; the ledger treats all categories alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Pc,
    MobileWifi,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Pc => "pc",
            AssetCategory::MobileWifi => "mobile_wifi",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pc" => Ok(AssetCategory::Pc),
            "wifi" | "mobile_wifi" | "mobile-wifi" => Ok(AssetCategory::MobileWifi),
            other => Err(ConfigError::InvalidCategory {
                value: other.to_string(),
            }),
        }
    }
}

/// A registered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub id: AssetId,
    pub category: AssetCategory,
}

impl AssetDescriptor {
    pub fn new(id: impl Into<String>, category: AssetCategory) -> Self {
        Self {
            id: AssetId::new(id),
            category,
        }
    }
}

/// Inventory used when no other is configured.
const DEFAULT_INVENTORY: &[(&str, AssetCategory)] = &[
    ("pc_a", AssetCategory::Pc),
    ("pc_b", AssetCategory::Pc),
    ("pc_c", AssetCategory::Pc),
    ("wifi_a", AssetCategory::MobileWifi),
    ("wifi_b", AssetCategory::MobileWifi),
    ("wifi_c", AssetCategory::MobileWifi),
    ("wifi_d", AssetCategory::MobileWifi),
];

/// The closed catalog of known assets, in registration order.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    assets: Vec<AssetDescriptor>,
    index: HashMap<AssetId, usize>,
}

impl AssetRegistry {
    /// Build a registry from descriptors.
    ///
    /// Rejects an empty inventory, malformed identifiers and duplicates.
    pub fn new(descriptors: Vec<AssetDescriptor>) -> Result<Self, ConfigError> {
        if descriptors.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        let mut index = HashMap::with_capacity(descriptors.len());
        for (position, descriptor) in descriptors.iter().enumerate() {
            AssetId::validate(descriptor.id.as_str()).map_err(|reason| {
                ConfigError::InvalidAssetId {
                    asset: descriptor.id.to_string(),
                    reason,
                }
            })?;
            if index.insert(descriptor.id.clone(), position).is_some() {
                return Err(ConfigError::DuplicateAsset {
                    asset: descriptor.id.to_string(),
                });
            }
        }

        Ok(Self {
            assets: descriptors,
            index,
        })
    }

    /// Three PCs (`pc_a`..`pc_c`) and four mobile Wi-Fi routers (`wifi_a`..`wifi_d`).
    pub fn default_inventory() -> Self {
        let assets: Vec<AssetDescriptor> = DEFAULT_INVENTORY
            .iter()
            .map(|(id, category)| AssetDescriptor::new(*id, *category))
            .collect();
        let index = assets
            .iter()
            .enumerate()
            .map(|(position, d)| (d.id.clone(), position))
            .collect();
        Self { assets, index }
    }

    /// Parse an inventory of the form `pc_a:pc,wifi_a:wifi`.
    pub fn from_inventory(inventory: &str) -> Result<Self, ConfigError> {
        let descriptors = inventory
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| -> Result<AssetDescriptor, ConfigError> {
                let (id, category) =
                    entry
                        .split_once(KEY_SEPARATOR)
                        .ok_or_else(|| ConfigError::MalformedInventory {
                            entry: entry.to_string(),
                        })?;
                Ok(AssetDescriptor::new(id.trim(), category.parse()?))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Self::new(descriptors)
    }

    pub fn is_known_asset(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&AssetDescriptor> {
        self.index.get(id).map(|&position| &self.assets[position])
    }

    pub fn category(&self, id: &str) -> Option<AssetCategory> {
        self.get(id).map(|d| d.category)
    }

    /// Registration order, used to take per-asset locks deterministically.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetDescriptor> {
        self.assets.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &AssetId> {
        self.assets.iter().map(|d| &d.id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::default_inventory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_inventory_membership() {
        let registry = AssetRegistry::default_inventory();

        assert_eq!(registry.len(), 7);
        for id in ["pc_a", "pc_b", "pc_c", "wifi_a", "wifi_b", "wifi_c", "wifi_d"] {
            assert!(registry.is_known_asset(id), "{id} should be registered");
        }
        assert!(!registry.is_known_asset("pc_d"));
        assert!(!registry.is_known_asset("unknown_x"));
        // Membership is exact, not substring based
        assert!(!registry.is_known_asset("my_pc_a"));
    }

    #[test]
    fn test_categories() {
        let registry = AssetRegistry::default_inventory();
        assert_eq!(registry.category("pc_b"), Some(AssetCategory::Pc));
        assert_eq!(registry.category("wifi_c"), Some(AssetCategory::MobileWifi));
        assert_eq!(registry.category("nope"), None);
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = AssetRegistry::new(vec![
            AssetDescriptor::new("laptop", AssetCategory::Pc),
            AssetDescriptor::new("laptop", AssetCategory::Pc),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicateAsset {
                asset: "laptop".into()
            }
        );
    }

    #[test]
    fn test_rejects_empty_and_malformed_ids() {
        assert_eq!(
            AssetRegistry::new(vec![]).unwrap_err(),
            ConfigError::EmptyRegistry
        );
        assert!(matches!(
            AssetRegistry::new(vec![AssetDescriptor::new("a:b", AssetCategory::Pc)]),
            Err(ConfigError::InvalidAssetId { .. })
        ));
        assert!(matches!(
            AssetRegistry::new(vec![AssetDescriptor::new("", AssetCategory::Pc)]),
            Err(ConfigError::InvalidAssetId { .. })
        ));
    }

    #[test]
    fn test_from_inventory() {
        let registry = AssetRegistry::from_inventory("lab_1:pc, router_9:wifi ,").unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.category("lab_1"), Some(AssetCategory::Pc));
        assert_eq!(registry.category("router_9"), Some(AssetCategory::MobileWifi));
        assert_eq!(registry.position("router_9"), Some(1));

        assert!(matches!(
            AssetRegistry::from_inventory("lab_1"),
            Err(ConfigError::MalformedInventory { .. })
        ));
        assert!(matches!(
            AssetRegistry::from_inventory("lab_1:tablet"),
            Err(ConfigError::InvalidCategory { .. })
        ));
    }
}
