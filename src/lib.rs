//! nomoplot builds and renders nomographs: charts where a straight line
//! through known values on two scales crosses a third scale at the value
//! that satisfies a relation between them.
//!
//! Each scale is a parametric curve taken from a one-variable formula and
//! laid out by a [`ChartVariant`]. Interactive edits stack projective
//! transforms on the layout, and [`CurveRenderer`] samples the transformed
//! scales into polylines, ticks, and labels for a host-supplied [`DrawSink`].
//!
//! ```
//! use nomoplot::{ChartVariant, CurveRenderer, Formula, NomographModel, RenderList};
//!
//! let formulas = vec![Formula::identity(); 3];
//! let mut model = NomographModel::new(ChartVariant::Parallel, formulas)?;
//! model.translate(2.0, 0.0);
//! model.commit();
//!
//! let mut list = RenderList::new();
//! CurveRenderer::default().draw(&model, &mut list, None)?;
//! assert!(!list.is_empty());
//! # Ok::<(), nomoplot::NomographError>(())
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod chart;
pub mod formula;
pub mod geom;
pub mod interaction;
pub mod model;
pub mod render;
pub mod style;
pub mod ticks;
pub mod transform;
pub mod view;

pub use catalog::{ChartCatalog, ChartType};
pub use chart::ChartVariant;
pub use formula::{Expr, ExprParser, Formula, FormulaError, FormulaParser, Func, MAX_DEPTH};
pub use geom::Point;
pub use interaction::{PanGesture, zoom_at, zoom_factor_from_drag};
pub use model::{
    Cell, CellMatrix, NomographBuilder, NomographError, NomographModel, Row, TransformState,
};
pub use render::{
    Color, CurveRenderer, DrawSink, FnSink, LineStyle, RenderCommand, RenderConfig, RenderList,
    TextStyle, TickKind,
};
pub use style::Theme;
pub use ticks::{MAX_TICKS, TickFormatter, TickMode, TickSet};
pub use transform::TransformMatrix;
pub use view::{FitConfig, Range, Viewport, fit_transform};
