mod entities;
mod error;
mod mapper;
mod request;
mod response;

pub use entities::*;
pub use error::*;
pub use mapper::*;
pub use request::*;
pub use response::*;
