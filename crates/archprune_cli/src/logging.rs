//! Tracing subscriber setup.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::GlobalArgs;

static TRACING_INIT: Once = Once::new();

/// Installs the stderr subscriber. Safe to call more than once.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug`,
/// `--quiet` selects `error` and the default is `warn`.
pub fn init(global: &GlobalArgs) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(global)));
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(global.color)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}

fn default_directive(global: &GlobalArgs) -> &'static str {
    if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(quiet: bool, verbose: bool) -> GlobalArgs {
        GlobalArgs {
            quiet,
            verbose,
            color: false,
            config: None,
        }
    }

    #[test]
    fn directive_follows_flags() {
        assert_eq!(default_directive(&args(false, false)), "warn");
        assert_eq!(default_directive(&args(true, false)), "error");
        assert_eq!(default_directive(&args(false, true)), "debug");
    }

    #[test]
    fn init_is_idempotent() {
        init(&args(true, false));
        init(&args(false, true));
    }
}
