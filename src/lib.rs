//! Core of a small interactive graph diagram editor.
//!
//! The host (see `main.rs`) normalises window events into [`input::InputEvent`]s
//! and feeds them to an [`editor::Editor`], which mutates a [`graph::GraphModel`]
//! according to the current [`editor::Mode`]. Diagrams persist through the
//! `.gph` text format in [`format`].

pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod geometry;
pub mod graph;
pub mod input;
pub mod view;

pub use config::EditorConfig;
pub use editor::{Editor, Mode};
pub use error::{FormatIssue, GraphFileError};
pub use graph::{Edge, GraphModel, Vertex, VertexIndex};
pub use view::ViewTransform;
