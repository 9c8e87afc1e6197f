//! # Logging estructurado
//! src/logging.rs
//!
//! Inicializa `tracing-subscriber`. `RUST_LOG` tiene prioridad; si no está
//! definido se usa el nivel de la configuración para este crate.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filtro por defecto para un nivel dado
pub fn default_filter(level: &str) -> String {
    format!("minihttp={}", level)
}

/// Instala el subscriber global
///
/// Llamarlo más de una vez no hace panic: el segundo intento se ignora.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter("debug"), "minihttp=debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init("info");
        init("debug");
    }
}
