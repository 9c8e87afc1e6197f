//! # Codificaciones de contenido
//! src/http/encoding.rs
//!
//! Negociación de `Accept-Encoding`. La única codificación soportada es gzip,
//! comprimida en memoria con `flate2`.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

/// Codificaciones que el servidor sabe producir
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
}

impl ContentEncoding {
    /// Busca una codificación soportada para un token de `Accept-Encoding`
    ///
    /// La comparación es exacta: `gzip;q=1.0` o `GZIP` no se reconocen.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gzip" => Some(ContentEncoding::Gzip),
            _ => None,
        }
    }

    /// Valor que va en el header `Content-Encoding`
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
        }
    }

    /// Codifica el body completo
    pub fn encode(&self, body: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            ContentEncoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(body)?;
                encoder.finish()
            }
        }
    }
}

/// Tokens de `Accept-Encoding` en el orden en que los listó el cliente
///
/// Se separan por `,`, se recortan los espacios y se descartan los vacíos.
pub fn accepted_tokens(accept_encoding: &str) -> impl Iterator<Item = &str> {
    accept_encoding
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_from_token() {
        assert_eq!(ContentEncoding::from_token("gzip"), Some(ContentEncoding::Gzip));
        assert_eq!(ContentEncoding::from_token("identity"), None);
        assert_eq!(ContentEncoding::from_token("deflate"), None);
        assert_eq!(ContentEncoding::from_token("Gzip"), None);
    }

    #[test]
    fn test_accepted_tokens_order_and_trim() {
        let tokens: Vec<&str> = accepted_tokens(" invalid-1 ,gzip, , br").collect();
        assert_eq!(tokens, vec!["invalid-1", "gzip", "br"]);
    }

    #[test]
    fn test_accepted_tokens_empty_header() {
        assert_eq!(accepted_tokens("").count(), 0);
    }

    #[test]
    fn test_gzip_encode_decodes_back() {
        let body = b"blueberry grape apple mango";
        let compressed = ContentEncoding::Gzip.encode(body).unwrap();

        // Magic number de gzip
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut decoded = Vec::new();
        decoder.read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, body);
    }
}
