//! Log output for hosts embedding the core.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs `env_logger` once per process.
///
/// The filter comes from `RUST_LOG`; without it, `info` and above are shown.
/// Later calls, or a logger installed by the host, are left alone.
pub fn init() {
    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("info");
        if env_logger::Builder::from_env(env).try_init().is_err() {
            log::debug!("logger already installed by host");
        }
    });
}
