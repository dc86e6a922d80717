//! Logging Initialization
//!
//! The library logs through the `log` facade; binaries and tests call
//! [`init`] once to get an `env_logger` backend. Filtering follows the
//! standard `RUST_LOG` environment variable, defaulting to `info`.

use env_logger::Env;

/// Initialize the global logger. Safe to call more than once; subsequent
/// calls are no-ops.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        log::debug!("logger initialized twice without panicking");
    }
}
