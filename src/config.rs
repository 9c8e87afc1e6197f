//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./minihttp --directory /tmp/files --port 4221
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_DIRECTORY=/srv/files ./minihttp
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "minihttp")]
#[command(about = "Servidor HTTP/1.1 mínimo sobre sockets TCP")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Directorio raíz para /files/{name}
    #[arg(long, default_value = "tmp", env = "HTTP_DIRECTORY")]
    pub directory: PathBuf,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Nivel de log cuando RUST_LOG no está definido (error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info", env = "HTTP_LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Parsea argumentos CLI (y variables de entorno)
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use minihttp::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be >= 1".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.directory.as_os_str().is_empty() {
            return Err("Directory must not be empty".to_string());
        }
        if !matches!(
            self.log_level.as_str(),
            "error" | "warn" | "info" | "debug" | "trace"
        ) {
            return Err(format!("Unknown log level: {}", self.log_level));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        tracing::info!(
            address = %self.address(),
            directory = %self.directory.display(),
            log_level = %self.log_level,
            "configuration loaded"
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("tmp"),
            port: 4221,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
        }
    }
}
