//! # Módulo HTTP
//!
//! Implementa el subconjunto de HTTP/1.1 que usa el servidor, desde cero y
//! sin librerías de alto nivel:
//!
//! - Parsing de requests (un único read por conexión)
//! - Construcción y serialización de responses
//! - Negociación de `Accept-Encoding` (gzip)
//! - Status codes
//!
//! No hay keep-alive, chunked encoding ni `Expect: 100-continue`: cada
//! conexión lleva exactamente un request y una response.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! Host: localhost\r\n
//! Accept-Encoding: gzip\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Length: 3\r\n
//! Content-Type: text/plain\r\n
//! \r\n
//! abc
//! ```

pub mod encoding;  // Codificaciones de contenido (gzip)
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales
pub use encoding::ContentEncoding;
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::{StatusCode, UnknownStatus};
