mod fetcher_rest;
mod fetcher_retrier;
mod persister_memory;
mod persister_postgresql;
mod server_http;
mod service_orchestrator;

pub use fetcher_rest::*;
pub use fetcher_retrier::*;
pub use persister_memory::*;
pub use persister_postgresql::*;
pub use server_http::*;
pub use service_orchestrator::*;
