//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, the login dialog and the help overlay
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod styles;
