pub mod board;
pub mod error;
pub mod list;
pub mod types;

pub use board::{TaskBoard, TaskStatus};
pub use error::FilterError;
pub use list::{facet_values, ListFilter};
pub use types::{value_text, FileCategory, SortDirection, SortOrder};
