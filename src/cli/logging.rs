//! Diagnostic logging setup

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,vocawork=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr so stdout only carries results. `RUST_LOG` wins over
/// `--verbose`.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_crate_debug() {
        assert_eq!(default_filter(false), "warn");
        assert!(default_filter(true).contains("vocawork=debug"));
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(false);
        init_logging(true);
    }
}
