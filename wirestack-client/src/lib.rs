//! wirestack-client: typed, batching access to wirestack procedures
//!
//! ```ignore
//! use wirestack_client::{Client, ClientConfig};
//! use wirestack_core::contract::hello::World;
//!
//! let client = Client::new(&ClientConfig::default())?;
//! let message = client.query::<World>(&()).await?;
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod link;
pub mod transport;

pub use cache::QueryCache;
pub use client::Client;
pub use config::ClientConfig;
pub use error::ClientError;
pub use link::BatchLink;
pub use transport::{Call, CallResult, HttpTransport, Transport};
