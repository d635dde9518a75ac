//! Retrieves the details of GitHub repositories, persists a snapshot of each lookup and serves
//! them over HTTP.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
