//! Console logging for the command line tool.
//!
//! Output goes to stderr so that stdin mode can write Lua to stdout.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `--verbose` wins over `--quiet`; with neither, `RUST_LOG` is honoured and
/// the default is `info`.
pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("lua_doc_extractor=debug")
    } else if quiet {
        EnvFilter::new("lua_doc_extractor=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lua_doc_extractor=info"))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
