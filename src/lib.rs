//! # minihttp
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo implementado desde cero sobre sockets TCP, sin
//! librerías HTTP. Un request por conexión, un thread por conexión.
//!
//! ## Arquitectura
//!
//! ```text
//! socket → http::Request → router::Router → http::Response (+gzip) → socket
//! ```
//!
//! - `http`: parsing de requests, construcción de responses, gzip, status codes
//! - `router`: cadena ordenada de matchers (`/`, `/echo`, `/user-agent`, `/files`)
//! - `storage`: acceso al directorio raíz de `/files/*`
//! - `server`: loop de accept y manejo de conexiones
//! - `config`: argumentos CLI y variables de entorno
//! - `logging`: inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use minihttp::config::Config;
//! use minihttp::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el loop de accept");
//! ```

pub mod config;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
pub mod storage;
