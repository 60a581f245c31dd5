pub mod client;
pub mod error;
pub mod graphql;
pub mod operations;
pub mod store;
pub mod transport;

pub use client::*;
pub use error::*;
pub use graphql::*;
pub use transport::*;
