//! Verse dataset: record model, loading, selection and context windows.

pub mod loader;
pub mod record;
pub mod selector;
pub mod window;

pub use loader::{load_records, load_records_from_reader};
pub use record::{Record, RequiredField, ID_SEPARATOR};
pub use selector::{select, Rejection, Selected, Selection, SelectionConfig};
pub use window::ContextWindow;
