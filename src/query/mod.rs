//! Server-side filtered, sorted and paginated lists.

pub mod controller;
mod debounce;
pub mod descriptor;
pub mod product;
pub mod user;

pub use controller::{ControllerOptions, ListSource, ListView, LoadingState, QueryController};
pub use descriptor::{QueryDescriptor, SortDirection, SortKey};
