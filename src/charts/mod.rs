//! Charts module - static infographic rendering

mod annotations;
mod layout;
mod renderer;

pub use annotations::AnnotationError;
pub use layout::InfographicStyle;
pub use renderer::{InfographicRenderer, RenderError};
