use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

/// Growth events are rare enough to show by default.
pub const TABLE_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

static INIT: Once = Once::new();

/// Installs the global logger once. `RUST_LOG` overrides the defaults.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("chained_buckets::hash_table", TABLE_LOG_LEVEL)
            .format_timestamp_millis()
            .parse_default_env();

        // a test harness may have installed a logger already
        let _ = builder.try_init();
    });
}
