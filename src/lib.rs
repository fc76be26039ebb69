pub mod editor;
pub mod error;
pub mod input;
pub mod render;
pub mod scene;
pub mod settings;
pub mod tools;
pub mod util;

pub use editor::{Editor, EditorEvent, VertexHandle};
pub use error::EditError;
