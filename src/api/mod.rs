pub mod client;
pub mod resource;

pub use client::ApiClient;
pub use resource::{id_of, id_value, is_addressable_id, ResourceKind, UnknownResource};
