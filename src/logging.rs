//! Logger initialization.
use std::sync::Once;

static INIT: Once = Once::new();

/// Install `env_logger` as the global logger.
///
/// The filter is `filter` if given, else `RUST_LOG`, else `info`.
/// Only the first call does anything.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.format_timestamp_millis();
        // another logger already installed (tests) is fine
        let _ = builder.try_init();

        log::debug!("logging initialized");
    });
}
