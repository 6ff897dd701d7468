//! Named chart types a host can offer for selection.
//!
//! The catalog deserializes from the same shape hosts keep on disk:
//!
//! ```json
//! { "types": [ { "name": "Sum", "description": "u + v = w",
//!                "variables": 3, "topology": "parallel" } ] }
//! ```
//!
//! Reading the file is the host's job; this module only models its content.

use serde::{Deserialize, Serialize};

use crate::chart::ChartVariant;
use crate::formula::Formula;
use crate::model::{NomographError, NomographModel};

/// One selectable chart type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartType {
    /// Display name, unique within a catalog.
    pub name: String,
    /// Short description of the relation the chart solves.
    #[serde(default)]
    pub description: String,
    /// Number of independent variables the user enters formulas for.
    pub variables: usize,
    /// Scale layout.
    pub topology: ChartVariant,
    /// Variable bound to each scale. Empty means scale `i` uses variable `i`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<usize>,
}

impl ChartType {
    /// Create a chart type with one variable per scale.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        topology: ChartVariant,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            variables: topology.scale_count(),
            topology,
            bindings: Vec::new(),
        }
    }

    /// Effective scale → variable binding.
    pub fn resolved_bindings(&self) -> Result<Vec<usize>, NomographError> {
        let scales = self.topology.scale_count();
        if self.bindings.is_empty() {
            if self.variables < scales {
                return Err(NomographError::VariableOutOfRange {
                    index: self.variables,
                    count: self.variables,
                });
            }
            return Ok((0..scales).collect());
        }
        if self.bindings.len() != scales {
            return Err(NomographError::BindingMismatch {
                expected: scales,
                found: self.bindings.len(),
            });
        }
        if let Some(&index) = self.bindings.iter().find(|&&v| v >= self.variables) {
            return Err(NomographError::VariableOutOfRange {
                index,
                count: self.variables,
            });
        }
        Ok(self.bindings.clone())
    }

    /// Build a model from one formula per scale.
    pub fn build(&self, formulas: Vec<Formula>) -> Result<NomographModel, NomographError> {
        let bindings = self.resolved_bindings()?;
        let mut model = NomographModel::with_bindings(self.topology, formulas, bindings)?;
        model.set_name(self.name.clone());
        Ok(model)
    }
}

/// An ordered list of chart types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartCatalog {
    types: Vec<ChartType>,
}

impl ChartCatalog {
    /// Create a catalog from chart types.
    pub fn new(types: Vec<ChartType>) -> Self {
        Self { types }
    }

    /// The three built-in topologies.
    pub fn builtin() -> Self {
        Self::new(vec![
            ChartType::new(
                "Parallel",
                "Parallel scales: f1(u) + f2(v) = f3(w)",
                ChartVariant::Parallel,
            ),
            ChartType::new(
                "Z-Chart",
                "Z chart: f1(u) = f2(v) f3(w)",
                ChartVariant::ZChart,
            ),
            ChartType::new(
                "Concurrent",
                "Concurrent scales: 1/f1(u) + 1/f3(w) = 1/f2(v)",
                ChartVariant::Concurrent,
            ),
        ])
    }

    /// All chart types in order.
    pub fn types(&self) -> &[ChartType] {
        &self.types
    }

    /// Look a chart type up by name.
    pub fn get(&self, name: &str) -> Option<&ChartType> {
        self.types.iter().find(|ty| ty.name == name)
    }

    /// Add a chart type, replacing any with the same name.
    pub fn insert(&mut self, chart: ChartType) {
        match self.types.iter_mut().find(|ty| ty.name == chart.name) {
            Some(slot) => *slot = chart,
            None => self.types.push(chart),
        }
    }

    /// Number of chart types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_topology() {
        let catalog = ChartCatalog::builtin();
        assert_eq!(catalog.len(), ChartVariant::ALL.len());
        for variant in ChartVariant::ALL {
            assert!(catalog.types().iter().any(|ty| ty.topology == variant));
        }
        assert_eq!(catalog.get("Z-Chart").unwrap().topology, ChartVariant::ZChart);
        assert!(catalog.get("Smith").is_none());
    }

    #[test]
    fn deserializes_host_file() {
        let json = r#"{
            "types": [
                { "name": "Sum", "description": "u + v", "variables": 3, "topology": "parallel" },
                { "name": "Square", "variables": 2, "topology": "concurrent", "bindings": [0, 1, 0] }
            ]
        }"#;
        let catalog: ChartCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        let square = catalog.get("Square").unwrap();
        assert_eq!(square.description, "");
        assert_eq!(square.resolved_bindings().unwrap(), vec![0, 1, 0]);

        let model = square.build(vec![Formula::identity(); 3]).unwrap();
        assert_eq!(model.name(), "Square");
        assert_eq!(model.variable_count(), 2);
    }

    #[test]
    fn bad_bindings_are_rejected() {
        let mut ty = ChartType::new("Bad", "", ChartVariant::Parallel);
        ty.variables = 2;
        assert_eq!(
            ty.resolved_bindings(),
            Err(NomographError::VariableOutOfRange { index: 2, count: 2 })
        );
        ty.bindings = vec![0, 1];
        assert_eq!(
            ty.resolved_bindings(),
            Err(NomographError::BindingMismatch { expected: 3, found: 2 })
        );
        ty.bindings = vec![0, 1, 5];
        assert_eq!(
            ty.resolved_bindings(),
            Err(NomographError::VariableOutOfRange { index: 5, count: 2 })
        );
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut catalog = ChartCatalog::builtin();
        let mut custom = ChartType::new("Parallel", "custom", ChartVariant::Parallel);
        custom.variables = 4;
        catalog.insert(custom);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("Parallel").unwrap().description, "custom");
    }
}
