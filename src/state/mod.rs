//! Viewer state owned by the event loop.

mod line_store;

pub use line_store::LineStore;
