//! PhotoFunia client library
//!
//! Modules:
//! - `photofunia`: Session handling, request construction and the effect
//!   pipeline (upload, effect request, result scrape, image download).
//! - `logger`: Pluggable `Logger` capability with no-op and `tracing` backends.
//! - `config`: Env-driven configuration loader.
//! - `error`: Error taxonomy and result alias.
//!
//! Re-exports are provided for common types: `Config`, `PhotoFuniaClient`,
//! `PhotoFuniaClientBuilder`, `Effect`, `FuniaError`, `FuniaResult`,
//! `StepFailure`, the logging types (`Logger`, `Field`, `NoopLogger`,
//! `TracingLogger`) and the `extract_image_url` scanner.
pub mod config;
pub mod error;
pub mod logger;
pub mod photofunia;

pub use config::Config;
pub use error::{FuniaError, FuniaResult, StepFailure};
pub use logger::{Field, Logger, NoopLogger, TracingLogger};
pub use photofunia::client::{PhotoFuniaClient, PhotoFuniaClientBuilder};
pub use photofunia::effect::Effect;
pub use photofunia::scrape::extract_image_url;
