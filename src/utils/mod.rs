//! Utilities: logging setup for binaries embedding the framework.
//!
//! Key items:
//!   derive_level  -v / -vv / -q  ->  tracing level
//!   init_logging  installs a stderr `tracing-subscriber`, `RUST_LOG` wins

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map CLI verbosity flags onto a log level. `quiet` overrides `verbose`.
pub fn derive_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
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
    fn quiet_beats_verbose() {
        assert_eq!(derive_level(2, true), Level::ERROR);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(derive_level(0, false), Level::INFO);
        assert_eq!(derive_level(1, false), Level::DEBUG);
        assert_eq!(derive_level(5, false), Level::TRACE);
    }

    #[test]
    fn init_twice_is_ok() {
        init_logging(Level::ERROR);
        init_logging(Level::DEBUG);
    }
}
