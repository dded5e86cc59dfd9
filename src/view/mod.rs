pub mod controller;
pub mod page;
pub mod state;

pub use controller::{Completion, FetchTicket, ViewController};
pub use page::{PageTarget, ResourcePage};
pub use state::{Phase, ViewState, LOADING_TEXT};
