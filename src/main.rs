//! # minihttp - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, inicializa el logging, hace bind y corre el
//! loop de accept hasta recibir SIGINT/SIGTERM.

use minihttp::config::Config;
use minihttp::logging;
use minihttp::server::Server;

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }
    config.print_summary();

    let server = match Server::bind(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    };

    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("shutting down...");
        shutdown.shutdown();
    }) {
        tracing::warn!(error = %e, "failed to install signal handler");
    }

    if let Err(e) = server.run() {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
