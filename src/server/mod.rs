//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (un thread por conexión)
//! 3. Lee y parsea un request por conexión
//! 4. Genera, comprime y envía la response, y cierra el socket

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{handle_connection, Server, ServerError, ShutdownHandle};
