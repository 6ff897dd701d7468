//! Sampling scales into polylines, ticks, and labels.

use serde::{Deserialize, Serialize};

use super::{DrawSink, TickKind};
use crate::geom::Point;
use crate::model::{NomographError, NomographModel, Row, sample_parameters};
use crate::ticks::TickFormatter;

/// Presentation constants for [`CurveRenderer`].
///
/// Tick extents and the label offset are multiples of `tick_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per scale polyline.
    pub samples: usize,
    /// Base tick length unit, in chart coordinates.
    pub tick_size: f64,
    /// Half-length of a major tick, in `tick_size` units.
    pub major_extent: f64,
    /// Half-length of a minor tick, in `tick_size` units.
    pub minor_extent: f64,
    /// Distance from the curve to a label anchor, in `tick_size` units.
    pub label_offset: f64,
    /// Decimal places for the default label formatter.
    pub label_precision: usize,
}

impl RenderConfig {
    /// Set the sample count.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set the tick size.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Set major and minor tick half-lengths.
    pub fn with_extents(mut self, major: f64, minor: f64) -> Self {
        self.major_extent = major;
        self.minor_extent = minor;
        self
    }

    /// Set the label offset.
    pub fn with_label_offset(mut self, offset: f64) -> Self {
        self.label_offset = offset;
        self
    }

    /// Set the label precision.
    pub fn with_label_precision(mut self, precision: usize) -> Self {
        self.label_precision = precision;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            tick_size: 1.0,
            major_extent: 2.0,
            minor_extent: 1.0,
            label_offset: 4.0,
            label_precision: 2,
        }
    }
}

/// Emits draw primitives for the scales of a model.
#[derive(Debug, Clone, Default)]
pub struct CurveRenderer {
    config: RenderConfig,
    formatter: Option<TickFormatter>,
}

impl CurveRenderer {
    /// Create a renderer. Labels use `config.label_precision` decimals.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            formatter: None,
        }
    }

    /// Replace the label formatter.
    pub fn with_formatter(mut self, formatter: TickFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Access the configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Tag under which a scale's primitives are emitted.
    pub fn tag(scale: usize) -> String {
        format!("scale-{scale}")
    }

    /// Draw the selected scales, or all of them when `scales` is `None`.
    ///
    /// Every index is validated before anything is emitted.
    pub fn draw(
        &self,
        model: &NomographModel,
        sink: &mut dyn DrawSink,
        scales: Option<&[usize]>,
    ) -> Result<(), NomographError> {
        let selected: Vec<usize> = match scales {
            Some(scales) => scales.to_vec(),
            None => (0..model.scale_count()).collect(),
        };
        let rows = selected
            .iter()
            .map(|&scale| model.current_row(scale))
            .collect::<Result<Vec<_>, _>>()?;

        for (&scale, row) in selected.iter().zip(rows) {
            let tag = Self::tag(scale);
            let ticks = model.ticks(scale)?;
            self.draw_curve(&tag, row, ticks.min(), ticks.max(), sink);

            let (major, minor) = ticks.all_ticks();
            let mut normals = NormalTracker::default();
            for t in major {
                self.draw_tick(&tag, row, t, TickKind::Major, &mut normals, sink);
            }
            for t in minor {
                self.draw_tick(&tag, row, t, TickKind::Minor, &mut normals, sink);
            }
        }
        Ok(())
    }

    /// Finite runs of samples along one scale.
    pub fn polylines(
        &self,
        model: &NomographModel,
        scale: usize,
    ) -> Result<Vec<Vec<Point>>, NomographError> {
        let row = model.current_row(scale)?;
        let ticks = model.ticks(scale)?;
        Ok(self.sample_runs(row, ticks.min(), ticks.max()))
    }

    fn sample_runs(&self, row: &Row, min: f64, max: f64) -> Vec<Vec<Point>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for t in sample_parameters(min, max, self.config.samples) {
            let point = row.point_at(t);
            if point.is_finite() {
                current.push(point);
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    fn draw_curve(&self, tag: &str, row: &Row, min: f64, max: f64, sink: &mut dyn DrawSink) {
        let runs = self.sample_runs(row, min, max);
        let drawn: usize = runs.iter().map(Vec::len).sum();
        if drawn < self.config.samples {
            tracing::debug!(
                tag,
                skipped = self.config.samples - drawn,
                "non-finite samples skipped"
            );
        }
        tracing::trace!(tag, runs = runs.len(), samples = drawn, "drawing scale");
        for run in &runs {
            sink.curve(tag, run);
        }
    }

    fn draw_tick(
        &self,
        tag: &str,
        row: &Row,
        t: f64,
        kind: TickKind,
        normals: &mut NormalTracker,
        sink: &mut dyn DrawSink,
    ) {
        let position = row.point_at(t);
        if !position.is_finite() {
            return;
        }
        let normal = normals.at(row.tangent_at(t));
        let extent = match kind {
            TickKind::Major => self.config.major_extent,
            TickKind::Minor => self.config.minor_extent,
        } * self.config.tick_size;
        sink.tick(
            tag,
            position.offset(normal, -extent),
            position.offset(normal, extent),
            kind,
        );

        if kind == TickKind::Major {
            let anchor = position.offset(normal, self.config.label_offset * self.config.tick_size);
            let text = match &self.formatter {
                Some(formatter) => formatter.format(t),
                None => TickFormatter::Fixed(self.config.label_precision).format(t),
            };
            sink.label(tag, anchor, &text);
        }
    }
}

/// Unit normals with fallback to the last valid one, then to `(0, 1)`.
#[derive(Debug, Default)]
struct NormalTracker {
    last: Option<Point>,
}

impl NormalTracker {
    fn at(&mut self, tangent: Point) -> Point {
        match tangent.perp().normalized() {
            Some(normal) => {
                self.last = Some(normal);
                normal
            }
            None => self.last.unwrap_or(Point::new(0.0, 1.0)),
        }
    }
}
