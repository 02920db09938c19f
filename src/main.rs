use std::{path::PathBuf, process};

use gl_shader_demo::{
    app,
    config::{DemoConfig, DEFAULT_CONFIG_PATH},
    logging::init_logging,
};

fn main() {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match DemoConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(err) => {
            init_logging(None);
            log::error!("{err}");
            process::exit(err.exit_code());
        }
    };
    init_logging(config.log_filter.as_deref());
    log::debug!("config: {config:?}");

    if let Err(err) = app::run(&config) {
        log::error!("{err}");
        process::exit(err.exit_code());
    }
}
