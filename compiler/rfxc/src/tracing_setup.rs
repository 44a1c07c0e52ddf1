//! Subscriber setup for `rfx`.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Filter used by `--verbose` when `RUST_LOG` is not set.
const VERBOSE_FILTER: &str = "rfx_engine=debug,rfx_rules=debug,rfx_edit=debug";

/// Initialize tracing for diagnostic output on stderr.
///
/// Call this once at startup. Safe to call multiple times. Enabled by
/// `RUST_LOG` (e.g. `RUST_LOG=rfx_engine=trace`) or by `verbose`.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if verbose {
            EnvFilter::new(VERBOSE_FILTER)
        } else {
            return;
        };
        tracing_subscriber::registry()
            .with(filter)
            .with(
                HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true),
            )
            .init();
    });
}
