//! Rendering primitives and draw sinks.
//!
//! The renderer never touches a canvas. It hands polylines, tick segments,
//! and labels to a [`DrawSink`] in chart coordinates; hosts either implement
//! the trait on their own canvas adapter, wrap closures in an [`FnSink`], or
//! collect everything into a styled [`RenderList`].

mod curve;

pub use curve::{CurveRenderer, RenderConfig};

use crate::geom::Point;
use crate::style::Theme;

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Text styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 12.0,
        }
    }
}

/// Graduation level of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickKind {
    /// Labelled tick.
    Major,
    /// Shorter, unlabelled tick.
    Minor,
}

/// Receiver for draw primitives. `tag` identifies the scale being drawn.
pub trait DrawSink {
    /// A connected run of curve samples.
    fn curve(&mut self, tag: &str, points: &[Point]);
    /// A tick segment crossing the curve.
    fn tick(&mut self, tag: &str, start: Point, end: Point, kind: TickKind);
    /// A tick label anchored at `position`.
    fn label(&mut self, tag: &str, position: Point, text: &str);
}

/// A [`DrawSink`] backed by three closures.
pub struct FnSink<C, T, L> {
    curve: C,
    tick: T,
    label: L,
}

impl<C, T, L> FnSink<C, T, L>
where
    C: FnMut(&str, &[Point]),
    T: FnMut(&str, Point, Point, TickKind),
    L: FnMut(&str, Point, &str),
{
    /// Wrap the curve, tick, and label callbacks.
    pub fn new(curve: C, tick: T, label: L) -> Self {
        Self { curve, tick, label }
    }
}

impl<C, T, L> DrawSink for FnSink<C, T, L>
where
    C: FnMut(&str, &[Point]),
    T: FnMut(&str, Point, Point, TickKind),
    L: FnMut(&str, Point, &str),
{
    fn curve(&mut self, tag: &str, points: &[Point]) {
        (self.curve)(tag, points);
    }

    fn tick(&mut self, tag: &str, start: Point, end: Point, kind: TickKind) {
        (self.tick)(tag, start, end, kind);
    }

    fn label(&mut self, tag: &str, position: Point, text: &str) {
        (self.label)(tag, position, text);
    }
}

/// A styled draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Curve polyline.
    Polyline {
        /// Scale tag.
        tag: String,
        /// Points in chart coordinates.
        points: Vec<Point>,
        /// Stroke.
        style: LineStyle,
    },
    /// Tick segment.
    Tick {
        /// Scale tag.
        tag: String,
        /// Segment start.
        start: Point,
        /// Segment end.
        end: Point,
        /// Graduation level.
        kind: TickKind,
        /// Stroke.
        style: LineStyle,
    },
    /// Tick label.
    Label {
        /// Scale tag.
        tag: String,
        /// Anchor position.
        position: Point,
        /// Label text.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
}

impl RenderCommand {
    /// Tag of the scale that produced this command.
    pub fn tag(&self) -> &str {
        match self {
            Self::Polyline { tag, .. } | Self::Tick { tag, .. } | Self::Label { tag, .. } => tag,
        }
    }
}

/// Aggregated render commands, styled by a [`Theme`].
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    theme: Theme,
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list with the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty render list with a theme.
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            commands: Vec::new(),
        }
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Commands produced for one scale tag.
    pub fn commands_for<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a RenderCommand> {
        self.commands.iter().filter(move |command| command.tag() == tag)
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands were collected.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all commands, keeping the theme.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Access the theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

impl DrawSink for RenderList {
    fn curve(&mut self, tag: &str, points: &[Point]) {
        let style = self.theme.curve;
        self.push(RenderCommand::Polyline {
            tag: tag.to_string(),
            points: points.to_vec(),
            style,
        });
    }

    fn tick(&mut self, tag: &str, start: Point, end: Point, kind: TickKind) {
        let style = match kind {
            TickKind::Major => self.theme.major_tick,
            TickKind::Minor => self.theme.minor_tick,
        };
        self.push(RenderCommand::Tick {
            tag: tag.to_string(),
            start,
            end,
            kind,
            style,
        });
    }

    fn label(&mut self, tag: &str, position: Point, text: &str) {
        let style = self.theme.label;
        self.push(RenderCommand::Label {
            tag: tag.to_string(),
            position,
            text: text.to_string(),
            style,
        });
    }
}
