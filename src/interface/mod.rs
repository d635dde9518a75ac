mod fetcher;
mod persister;
mod service;

pub use fetcher::*;
pub use persister::*;
pub use service::*;
