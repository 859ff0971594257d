//! Env-driven configuration for the client and the `funiactl` binary.
//!
//! Values are read from the process environment; `dotenv` is loaded on demand
//! by the binary. Defaults point at the public service.
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://photofunia.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    pub fn new() -> Self {
        Config {
            base_url: env::var("PHOTOFUNIA_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: parse_timeout(env::var("PHOTOFUNIA_TIMEOUT_SECS").ok().as_deref()),
        }
    }

    pub fn print_env_vars() {
        println!("PHOTOFUNIA_URL: {}", env::var("PHOTOFUNIA_URL").unwrap_or_else(|_| "<unset>".to_string()));
        println!("PHOTOFUNIA_TIMEOUT_SECS: {}", env::var("PHOTOFUNIA_TIMEOUT_SECS").unwrap_or_else(|_| "<unset>".to_string()));
    }
}

fn parse_timeout(raw: Option<&str>) -> Duration {
    match raw {
        None => DEFAULT_TIMEOUT,
        Some(s) => match s.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                tracing::warn!("Invalid PHOTOFUNIA_TIMEOUT_SECS '{}', falling back to {:?}", s, DEFAULT_TIMEOUT);
                DEFAULT_TIMEOUT
            }
        },
    }
}
