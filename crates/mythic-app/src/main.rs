//! Main application entry point.

use mythic_app::{App, AppConfig};

fn main() {
    env_logger::init();
    log::info!("Starting Mythic Machines");

    let config = AppConfig::from_env();
    if let Err(e) = pollster::block_on(App::new(config).run()) {
        log::error!("Shell terminated: {}", e);
        std::process::exit(1);
    }
}
