pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use config::AppConfig;
pub use error::{ResourceKind, TrellisError};
pub use result::TrellisResult;
pub use traits::{find_resource, Resource};
