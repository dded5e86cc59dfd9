use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid filter '{0}' (expected field=value)")]
    InvalidAssignment(String),

    #[error("Cannot filter {kind} by '{field}' (expected one of: {expected})")]
    UnknownFacet {
        kind: String,
        field: String,
        expected: String,
    },

    #[error("Invalid sort '{0}' (expected field, -field or field:desc)")]
    InvalidSort(String),
}
