//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Border of the focused form field and selected table row.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Success toast background.
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Info toast background.
pub const STEEL_BLUE: Color = Color::Rgb(54, 85, 131);
/// Closed tasks in the list.
pub const DIM_GREY: Color = Color::Rgb(110, 110, 110);
