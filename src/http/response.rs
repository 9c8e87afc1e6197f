//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas HTTP/1.1, comprimirlas según
//! `Accept-Encoding` y convertirlas a bytes para el socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Length: 3\r\n
//! Content-Type: text/plain\r\n
//! \r\n
//! abc
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use minihttp::http::{Response, StatusCode};
//!
//! let mut response = Response::new(StatusCode::Ok, "hello");
//! response.compress("gzip");
//!
//! assert_eq!(response.header("Content-Encoding"), Some("gzip"));
//! let bytes = response.to_bytes();
//! ```

use super::encoding::{accepted_tokens, ContentEncoding};
use super::StatusCode;
use std::io::{self, Write};

pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_ENCODING: &str = "Content-Encoding";

/// Respuesta HTTP/1.1 completa
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    /// Headers en orden de inserción; un nombre repetido reemplaza el valor
    /// existente en su lugar, así la salida es determinista
    headers: Vec<(String, String)>,

    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta con su body
    ///
    /// `Content-Length` se calcula siempre; `Content-Type: text/plain` solo
    /// se agrega si el body no está vacío.
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok, "abc");
    /// assert_eq!(response.header("Content-Length"), Some("3"));
    /// assert_eq!(response.header("Content-Type"), Some("text/plain"));
    /// ```
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        let mut response = Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        };

        response.replace_body(body.into());
        if !response.body.is_empty() {
            response.add_header(CONTENT_TYPE, "text/plain");
        }

        response
    }

    /// Respuesta sin body (`Content-Length: 0`, sin `Content-Type`)
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, Vec::new())
    }

    /// Agrega o sobrescribe un header (versión builder)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega o sobrescribe un header
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    fn replace_body(&mut self, body: Vec<u8>) {
        self.body = body;
        let length = self.body.len().to_string();
        self.add_header(CONTENT_LENGTH, &length);
    }

    /// Comprime el body con la primera codificación soportada de `Accept-Encoding`
    ///
    /// Los tokens se prueban en el orden del cliente. Si el encoder falla se
    /// pasa al siguiente token. Si ninguno aplica la respuesta queda intacta.
    /// Retorna la codificación aplicada.
    pub fn compress(&mut self, accept_encoding: &str) -> Option<ContentEncoding> {
        for token in accepted_tokens(accept_encoding) {
            let Some(encoding) = ContentEncoding::from_token(token) else {
                continue;
            };

            match encoding.encode(&self.body) {
                Ok(compressed) => {
                    self.replace_body(compressed);
                    self.add_header(CONTENT_ENCODING, encoding.as_str());
                    return Some(encoding);
                }
                Err(e) => {
                    tracing::debug!(encoding = encoding.as_str(), error = %e, "encoding unavailable");
                }
            }
        }

        None
    }

    /// Convierte la respuesta a bytes listos para el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(64 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Escribe la respuesta completa y hace flush
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene un header específico (comparación exacta)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_new_empty_response() {
        let response = Response::empty(StatusCode::NotFound);

        assert_eq!(response.status(), StatusCode::NotFound);
        assert_eq!(response.header("Content-Length"), Some("0"));
        assert_eq!(response.header("Content-Type"), None);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_new_with_body() {
        let response = Response::new(StatusCode::Ok, "Hello World");

        assert_eq!(response.body(), b"Hello World");
        assert_eq!(response.header("Content-Length"), Some("11"));
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_with_header_overrides_in_place() {
        let response = Response::new(StatusCode::Ok, vec![0x00, 0x01, 0xff])
            .with_header("Content-Type", "application/octet-stream")
            .with_header("X-Custom", "value");

        assert_eq!(
            response.headers(),
            &[
                ("Content-Length".to_string(), "3".to_string()),
                ("Content-Type".to_string(), "application/octet-stream".to_string()),
                ("X-Custom".to_string(), "value".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_bytes() {
        let response = Response::new(StatusCode::Ok, "abc");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Length: 3\r\nContent-Type: text/plain\r\n\r\nabc"
        );
    }

    #[test]
    fn test_empty_body_to_bytes() {
        let response = Response::empty(StatusCode::Created);
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert_eq!(text, "HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn test_write_to() {
        let response = Response::new(StatusCode::BadRequest, "oops");
        let mut out = Vec::new();
        response.write_to(&mut out).unwrap();

        assert_eq!(out, response.to_bytes());
    }

    #[test]
    fn test_compress_gzip() {
        let mut response = Response::new(StatusCode::Ok, "abc");
        let applied = response.compress("gzip");

        assert_eq!(applied, Some(ContentEncoding::Gzip));
        assert_eq!(response.header("Content-Encoding"), Some("gzip"));
        assert_eq!(
            response.header("Content-Length"),
            Some(response.body().len().to_string().as_str())
        );

        let mut decoded = String::new();
        GzDecoder::new(response.body())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "abc");
    }

    #[test]
    fn test_compress_picks_first_supported_token() {
        let mut response = Response::new(StatusCode::Ok, "abc");
        let applied = response.compress("invalid-encoding-1, gzip, invalid-encoding-2");

        assert_eq!(applied, Some(ContentEncoding::Gzip));
        assert_eq!(response.header("Content-Encoding"), Some("gzip"));
    }

    #[test]
    fn test_compress_unsupported_leaves_response_untouched() {
        for header in ["identity", "deflate, br", "", " , "] {
            let original = Response::new(StatusCode::Ok, "abc");
            let mut response = original.clone();

            assert_eq!(response.compress(header), None);
            assert_eq!(response.to_bytes(), original.to_bytes());
        }
    }

    #[test]
    fn test_compress_keeps_content_type() {
        let mut response = Response::new(StatusCode::Ok, "abc")
            .with_header("Content-Type", "application/octet-stream");
        response.compress("gzip");

        assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
    }
}
