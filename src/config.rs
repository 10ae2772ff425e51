//! Column role configuration.
//!
//! Binds the logical roles the engine works with (part family, vehicle model,
//! part number, supplier, price, plant and the cost metrics) to the physical
//! column names found in an upload. The defaults match the standard purchase
//! order export; a YAML file can override any subset of them.

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALL_MODELS: &str = "All Models";
pub const DEFAULT_ALL_PARTS: &str = "All Parts";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: String,
    /// Zero is "not a real quotation" for this metric and is dropped before min/max.
    #[serde(default)]
    pub exclude_zero: bool,
}

impl MetricSpec {
    pub fn new(name: &str, exclude_zero: bool) -> Self {
        Self {
            name: name.to_string(),
            exclude_zero,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sentinels {
    #[serde(default = "Sentinels::default_all_models")]
    pub all_models: String,
    #[serde(default = "Sentinels::default_all_parts")]
    pub all_parts: String,
}

impl Sentinels {
    fn default_all_models() -> String {
        DEFAULT_ALL_MODELS.to_string()
    }

    fn default_all_parts() -> String {
        DEFAULT_ALL_PARTS.to_string()
    }
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            all_models: Self::default_all_models(),
            all_parts: Self::default_all_parts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoleConfig {
    pub family: String,
    pub model: String,
    pub part: String,
    pub supplier: String,
    pub price: String,
    pub plant: String,
    pub metrics: Vec<MetricSpec>,
    pub sentinels: Sentinels,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            family: "Part Family".to_string(),
            model: "Vehicle Model".to_string(),
            part: "PartNo".to_string(),
            supplier: "Vendor".to_string(),
            price: "PO Price".to_string(),
            plant: "Plant".to_string(),
            metrics: default_metrics(),
            sentinels: Sentinels::default(),
        }
    }
}

fn default_metrics() -> Vec<MetricSpec> {
    vec![
        MetricSpec::new("PO Price", true),
        MetricSpec::new("RMRatePerKg", true),
        MetricSpec::new("GrossWeight", false),
        MetricSpec::new("Net RM Cost", false),
        MetricSpec::new("Net Conversion Cost", false),
        MetricSpec::new("Overhead Combined Cost", false),
        MetricSpec::new("Profit Cost", false),
        MetricSpec::new("Rejection Cost", false),
        MetricSpec::new("Packaging Cost", false),
        MetricSpec::new("Freight Cost", false),
    ]
}

impl RoleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening role config {path:?}"))?;
        let reader = BufReader::new(file);
        let config: RoleConfig =
            serde_yaml::from_reader(reader).context("Parsing role config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing role config to YAML")
    }

    pub fn validate(&self) -> Result<()> {
        let roles = self
            .required_roles()
            .into_iter()
            .chain([("Plant", self.plant.as_str())]);
        let mut bound = HashMap::new();
        for (role, column) in roles {
            let column = column.trim();
            ensure!(!column.is_empty(), "Role {role} must name a column");
            if let Some(other) = bound.insert(column, role) {
                bail!("Roles {other} and {role} are both bound to column '{column}'");
            }
        }
        let mut seen = HashSet::new();
        for metric in &self.metrics {
            let name = metric.name.trim();
            ensure!(!name.is_empty(), "Metric names cannot be empty");
            ensure!(seen.insert(name), "Metric '{name}' is listed more than once");
        }
        ensure!(
            self.sentinels.all_models != self.sentinels.all_parts,
            "Model and part sentinels must differ"
        );
        Ok(())
    }

    /// Required roles in resolution order, paired with their configured column.
    pub fn required_roles(&self) -> [(&'static str, &str); 5] {
        [
            ("PartFamily", self.family.as_str()),
            ("VehicleModel", self.model.as_str()),
            ("PartNumber", self.part.as_str()),
            ("Supplier", self.supplier.as_str()),
            ("Price", self.price.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_purchase_order_export() {
        let config = RoleConfig::default();
        assert_eq!(config.price, "PO Price");
        assert_eq!(config.metrics.len(), 10);
        let excluded = config
            .metrics
            .iter()
            .filter(|m| m.exclude_zero)
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(excluded, vec!["PO Price", "RMRatePerKg"]);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "supplier: Supplier Name").unwrap();
        writeln!(file, "metrics:").unwrap();
        writeln!(file, "  - name: Unit Cost").unwrap();
        writeln!(file, "    exclude_zero: true").unwrap();
        writeln!(file, "  - name: Weight").unwrap();

        let config = RoleConfig::load(file.path()).expect("load config");
        assert_eq!(config.supplier, "Supplier Name");
        assert_eq!(config.family, "Part Family");
        assert_eq!(
            config.metrics,
            vec![MetricSpec::new("Unit Cost", true), MetricSpec::new("Weight", false)]
        );
        assert_eq!(config.sentinels, Sentinels::default());
    }

    #[test]
    fn duplicate_metrics_are_rejected() {
        let config = RoleConfig {
            metrics: vec![MetricSpec::new("A", false), MetricSpec::new("A", true)],
            ..RoleConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn roles_sharing_a_column_are_rejected() {
        let config = RoleConfig {
            model: "Part Family".to_string(),
            ..RoleConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Roles PartFamily and VehicleModel are both bound to column 'Part Family'"
        );

        let config = RoleConfig {
            plant: " Vendor ".to_string(),
            ..RoleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_plant_column_is_rejected() {
        let config = RoleConfig {
            plant: "  ".to_string(),
            ..RoleConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Role Plant must name a column"));
    }

    #[test]
    fn load_validates_role_bindings() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "family: PartNo").unwrap();
        let err = RoleConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("both bound to column 'PartNo'"));
    }

    #[test]
    fn yaml_round_trips_defaults() {
        let yaml = RoleConfig::default().to_yaml_string().expect("yaml");
        let parsed: RoleConfig = serde_yaml::from_str(&yaml).expect("parse");
        assert_eq!(parsed, RoleConfig::default());
    }
}
