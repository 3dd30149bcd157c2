mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{PageQuery, Query};
pub use tokio_util::sync::CancellationToken;
