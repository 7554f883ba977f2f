//! Content Testing Configuration Module
//!
//! Loaded from TOML, read-only after startup.
//!
//! ## Loading Order
//!
//! 1. `CONTENT_TESTING_CONFIG` environment variable (path to TOML file)
//! 2. `content_testing.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(TestingConfig::load());
//!
//! // Anywhere in the codebase:
//! let enabled = config::get().testing.automatic_content_testing_enabled;
//! ```
//!
//! The warnings processor takes its config as a constructor argument; the
//! global is only a convenience for hosts that want one shared instance.

mod testing_config;
pub mod defaults;
pub mod validation;

pub use testing_config::*;

use std::sync::OnceLock;

/// Global content testing configuration, initialized once at startup.
static TESTING_CONFIG: OnceLock<TestingConfig> = OnceLock::new();

/// Install the switch and display texts shared by every warnings request.
///
/// Only the first call takes effect. A repeat is logged and dropped, so a
/// processor built earlier never sees its texts change underneath it.
pub fn init(config: TestingConfig) {
    if TESTING_CONFIG.set(config).is_err() {
        tracing::warn!("Content testing config already installed, keeping the first one");
    }
}

/// The installed content testing config.
///
/// The binary installs it before building `WarningsProcessor::with_global_config`;
/// reaching this without `init()` means the host skipped that step.
#[allow(clippy::expect_used)]
pub fn get() -> &'static TestingConfig {
    TESTING_CONFIG
        .get()
        .expect("content testing config read before config::init()")
}

/// Whether a host has installed the config yet.
pub fn is_initialized() -> bool {
    TESTING_CONFIG.get().is_some()
}
