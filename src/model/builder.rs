//! Builder for configuring a nomograph before construction.

use super::{NomographError, NomographModel};
use crate::chart::ChartVariant;
use crate::formula::Formula;
use crate::ticks::TickSet;

/// Builder for [`NomographModel`].
///
/// Scales without an explicit formula default to the identity `t`, and
/// scales without an explicit tick set use [`TickSet::default`].
#[derive(Debug, Clone)]
pub struct NomographBuilder {
    variant: ChartVariant,
    name: Option<String>,
    formulas: Vec<Option<Formula>>,
    ticks: Vec<Option<TickSet>>,
    bindings: Option<Vec<usize>>,
    out_of_range: Option<usize>,
}

impl NomographBuilder {
    /// Start a builder for a topology.
    pub fn new(variant: ChartVariant) -> Self {
        let count = variant.scale_count();
        Self {
            variant,
            name: None,
            formulas: vec![None; count],
            ticks: vec![None; count],
            bindings: None,
            out_of_range: None,
        }
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a scale's formula. Out-of-range scales are reported by
    /// [`build`](Self::build).
    pub fn formula(mut self, scale: usize, formula: Formula) -> Self {
        match self.formulas.get_mut(scale) {
            Some(slot) => *slot = Some(formula),
            None => self.reject(scale),
        }
        self
    }

    /// Set a scale's tick set.
    pub fn ticks(mut self, scale: usize, ticks: TickSet) -> Self {
        match self.ticks.get_mut(scale) {
            Some(slot) => *slot = Some(ticks),
            None => self.reject(scale),
        }
        self
    }

    fn reject(&mut self, scale: usize) {
        self.out_of_range.get_or_insert(scale);
    }

    /// Set the scale → variable binding.
    pub fn bindings(mut self, bindings: Vec<usize>) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Build the model.
    pub fn build(self) -> Result<NomographModel, NomographError> {
        let count = self.variant.scale_count();
        if let Some(index) = self.out_of_range {
            return Err(NomographError::ScaleOutOfRange { index, count });
        }

        let formulas = self
            .formulas
            .into_iter()
            .map(|formula| formula.unwrap_or_else(Formula::identity))
            .collect();
        let bindings = self.bindings.unwrap_or_else(|| (0..count).collect());
        let mut model = NomographModel::with_bindings(self.variant, formulas, bindings)?;
        if let Some(name) = self.name {
            model.set_name(name);
        }
        for (scale, ticks) in self.ticks.into_iter().enumerate() {
            if let Some(ticks) = ticks {
                model.set_ticks(scale, ticks)?;
            }
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    #[test]
    fn builder_fills_defaults() {
        let model = NomographModel::builder(ChartVariant::Parallel)
            .name("Sum")
            .formula(2, Formula::parse("2*t").unwrap())
            .ticks(0, TickSet::linear(0.0, 10.0, 1.0, 0.5))
            .build()
            .unwrap();
        assert_eq!(model.name(), "Sum");
        assert_eq!(model.formula(0).unwrap(), &Formula::identity());
        assert_eq!(model.ticks(0).unwrap().max(), 10.0);
        assert_eq!(model.ticks(1).unwrap(), &TickSet::default());
        assert_eq!(model.point_at(2, 1.0).unwrap(), Point::new(1.0, 0.5));
    }

    #[test]
    fn builder_rejects_extra_scales() {
        let err = NomographModel::builder(ChartVariant::ZChart)
            .formula(4, Formula::identity())
            .build()
            .unwrap_err();
        assert_eq!(err, NomographError::ScaleOutOfRange { index: 4, count: 3 });
    }

    #[test]
    fn builder_reports_first_bad_scale_without_growing() {
        let err = NomographModel::builder(ChartVariant::Parallel)
            .ticks(usize::MAX, TickSet::default())
            .formula(3, Formula::identity())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            NomographError::ScaleOutOfRange {
                index: usize::MAX,
                count: 3
            }
        );
    }
}
