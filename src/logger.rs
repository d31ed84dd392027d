use log::LevelFilter;

/// Install `env_logger` as the global logger. `RUST_LOG` is read first, then `level` overrides
/// the default filter.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .init();
}
