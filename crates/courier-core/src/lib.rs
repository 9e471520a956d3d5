//! Courier Core Library
//!
//! Configuration, error taxonomy, data model, topic address resolution and
//! event normalization for the courier event relay. Nothing in this crate
//! performs network I/O.

pub mod config;
pub mod error;
pub mod normalizer;
pub mod resolver;
pub mod types;

pub use config::CourierConfig;
pub use error::{Error, Result};

/// Courier version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// ARN prefix shared by every SNS topic address
pub const ARN_SCHEME: &str = "arn:aws:sns";

/// Topic name used when none is configured
pub const DEFAULT_TOPIC_NAME: &str = "teste";

/// Region used when neither an override nor the platform region is set
pub const DEFAULT_REGION: &str = "us-west-1";

/// Account used when no override is set
pub const DEFAULT_ACCOUNT_ID: &str = "000000000000";

/// Topic address used in local mode (LocalStack default region and account)
pub const DEFAULT_LOCAL_TOPIC_ADDRESS: &str = "arn:aws:sns:us-east-1:000000000000:teste";

/// Top-level key that marks an inbound event as a batch of change records
pub const RECORDS_KEY: &str = "records";

/// Key of the relayed subset inside each change record
pub const KEYS_KEY: &str = "keys";

/// Response body returned after a batch has been fully relayed
pub const BATCH_SUCCESS_BODY: &str = "Records relayed successfully";
