//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser HTTP/1.1 desde cero sobre un único read de 1024 bytes.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/notes.txt?mode=raw HTTP/1.1\r\n
//! Host: localhost\r\n
//! User-Agent: curl/7.68.0\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Pasadas
//!
//! El buffer se recorre tres veces, de forma independiente:
//!
//! 1. **Request Line**: `METHOD /path?query VERSION`, separada por espacios simples
//! 2. **Headers**: cualquier línea no vacía con exactamente un `:`
//! 3. **Body**: todo lo que sigue al primer `\r\n\r\n`
//!
//! ## Limitaciones conocidas
//!
//! - Un request que no cabe en el buffer se trunca (no hay reensamblado).
//! - `Content-Length` no acota el body.
//! - Un header con más de un `:` (ej: `Host: localhost:4221`) se descarta.

use std::collections::HashMap;
use std::io::{self, Read};

/// Tamaño del único read que se hace por conexión
pub const READ_BUFFER_SIZE: usize = 1024;

const CRLF: &str = "\r\n";
const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Método HTTP
///
/// Las rutas solo distinguen GET y POST; cualquier otro token se conserva tal cual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    Other(String),
}

impl Method {
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

/// Errores que pueden ocurrir al leer o parsear un request
///
/// El `Display` de cada variante se usa directamente como body de la respuesta 400.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// La request line no tiene exactamente tres tokens no vacíos
    #[error("invalid request, missing method, path and version")]
    InvalidRequestLine,

    /// Falló el read (o el peer cerró sin mandar nada)
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Request HTTP parseado. Inmutable una vez construido.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// Path sin query string y sin decodificar (ej: "/echo/abc%20d")
    path: String,

    query_params: HashMap<String, String>,

    version: String,

    /// Valor del header `Host`, que no se duplica en `headers`
    host: String,

    headers: HashMap<String, String>,

    body: Vec<u8>,
}

impl Request {
    /// Lee un request desde un socket (o cualquier `Read`) con un único read
    ///
    /// Un read de 0 bytes se trata como `UnexpectedEof`.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ParseError> {
        let mut buffer = [0u8; READ_BUFFER_SIZE];
        let bytes_read = reader.read(&mut buffer)?;

        if bytes_read == 0 {
            return Err(ParseError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "EOF")));
        }

        Self::parse(&buffer[..bytes_read])
    }

    /// Parsea un request desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use minihttp::http::Request;
    ///
    /// let raw = b"GET /echo/abc?lang=es HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.query_param("lang"), Some("es"));
    /// assert_eq!(request.host(), "localhost");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let text = String::from_utf8_lossy(buffer);

        // 1. Request line
        let (method, path, query_params, version) = Self::parse_request_line(&text)?;

        // 2. Headers (Host va aparte)
        let (host, headers) = Self::parse_headers(&text);

        // 3. Body, desde los bytes crudos
        let body = Self::parse_body(buffer);

        Ok(Request {
            method,
            path,
            query_params,
            version,
            host,
            headers,
            body,
        })
    }

    fn parse_request_line(
        text: &str,
    ) -> Result<(Method, String, HashMap<String, String>, String), ParseError> {
        let line = text.split(CRLF).next().unwrap_or_default();
        let parts: Vec<&str> = line.split(' ').collect();

        // Exactamente 3 partes: METHOD TARGET VERSION
        if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_token(parts[0]);
        let (path, query_params) = Self::parse_path_and_query(parts[1]);
        let version = parts[2].to_string();

        Ok((method, path, query_params, version))
    }

    /// "/files/a?x=1&y=2" -> ("/files/a", {"x": "1", "y": "2"})
    fn parse_path_and_query(target: &str) -> (String, HashMap<String, String>) {
        match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Self::parse_query_string(query)),
            None => (target.to_string(), HashMap::new()),
        }
    }

    /// Solo se conservan los pares `key=value` con exactamente un `=`
    fn parse_query_string(query: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();

        for pair in query.split('&') {
            let kv: Vec<&str> = pair.split('=').collect();
            if kv.len() == 2 {
                params.insert(kv[0].to_string(), kv[1].to_string());
            }
        }

        params
    }

    /// Recorre todas las líneas del buffer, no solo el bloque de headers
    fn parse_headers(text: &str) -> (String, HashMap<String, String>) {
        let mut host = String::new();
        let mut headers = HashMap::new();

        for line in text.split(CRLF) {
            if line.is_empty() {
                continue;
            }

            let kv: Vec<&str> = line.split(':').collect();
            if kv.len() != 2 {
                continue;
            }

            let name = kv[0].trim_matches(' ');
            let value = kv[1].trim_matches(' ');

            match name {
                "Host" => host = value.to_string(),
                _ => {
                    headers.insert(name.to_string(), value.to_string());
                }
            }
        }

        (host, headers)
    }

    fn parse_body(buffer: &[u8]) -> Vec<u8> {
        buffer
            .windows(HEAD_TERMINATOR.len())
            .position(|window| window == HEAD_TERMINATOR)
            .map(|pos| buffer[pos + HEAD_TERMINATOR.len()..].to_vec())
            .unwrap_or_default()
    }

    // === Accesores ===

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(|s| s.as_str())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico (comparación exacta, sensible a mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
