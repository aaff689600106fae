mod harness_config;

pub use harness_config::{ConfigError, HarnessConfig};
