//! Style and theming.

use crate::render::{Color, LineStyle, TextStyle};

/// Visual theme applied when collecting draw commands into a
/// [`RenderList`](crate::render::RenderList).
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Scale curve stroke.
    pub curve: LineStyle,
    /// Major tick stroke.
    pub major_tick: LineStyle,
    /// Minor tick stroke.
    pub minor_tick: LineStyle,
    /// Tick label text.
    pub label: TextStyle,
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dark strokes on a light background.
    pub fn light() -> Self {
        Self {
            curve: LineStyle {
                color: Color::BLACK,
                width: 1.5,
            },
            major_tick: LineStyle {
                color: Color::BLACK,
                width: 1.0,
            },
            minor_tick: LineStyle {
                color: Color::new(0.35, 0.35, 0.35, 1.0),
                width: 0.75,
            },
            label: TextStyle {
                color: Color::BLACK,
                size: 12.0,
            },
        }
    }

    /// Light strokes on a dark background.
    pub fn dark() -> Self {
        Self {
            curve: LineStyle {
                color: Color::WHITE,
                width: 1.5,
            },
            major_tick: LineStyle {
                color: Color::WHITE,
                width: 1.0,
            },
            minor_tick: LineStyle {
                color: Color::new(0.7, 0.7, 0.7, 1.0),
                width: 0.75,
            },
            label: TextStyle {
                color: Color::WHITE,
                size: 12.0,
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
