//! Brochure CLI library.
//!
//! The binary entry point lives in `main.rs`; this library exposes the
//! command implementations and the HTTP server so they can be tested.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, serve, hash-password)
//! - [`server`] - Auth, admin and resource handlers plus static serving

pub mod cmd;
pub mod server;

pub use brochure_core::Config;
pub use brochure_generator::{BuildStats, Builder};

/// Initialize tracing with the specified verbosity level.
///
/// `verbose` maps 0 to WARN, 1 to INFO, 2 to DEBUG and 3+ to TRACE.
/// `RUST_LOG` directives are honoured on top of that.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
