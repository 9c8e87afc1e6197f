//! # Rutas del servidor
//!
//! Cada ruta es un matcher: examina el request y retorna `Some(Response)`
//! si le corresponde, o `None` para que el router pruebe la siguiente.
//!
//! | Método | Path             | Éxito              | Fallos                      |
//! |--------|------------------|--------------------|-----------------------------|
//! | GET    | `/`              | 200                | -                           |
//! | *      | `/echo/{text}`   | 200, body=text     | -                           |
//! | GET    | `/user-agent`    | 200, body=UA       | -                           |
//! | GET    | `/files/{name}`  | 200, octet-stream  | 404 missing/dir, 500 stat   |
//! | POST   | `/files/{name}`  | 201                | 400 mkdir/dir/write         |

use crate::http::{Method, Request, Response, StatusCode};
use crate::storage::{FileRead, FileStore, StoreError};
use once_cell::sync::Lazy;
use regex::Regex;

static ECHO_ROUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/echo/([^/]+)$").unwrap());
static FILES_ROUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/files/([^/]+)$").unwrap());

/// Primer grupo capturado, si no está vacío
fn capture<'a>(pattern: &Regex, path: &'a str) -> Option<&'a str> {
    pattern
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}

/// `GET /`
pub fn index(req: &Request, _store: &FileStore) -> Option<Response> {
    if req.method() != &Method::GET || req.path() != "/" {
        return None;
    }

    Some(Response::empty(StatusCode::Ok))
}

/// `* /echo/{text}` - el método no importa
pub fn echo(req: &Request, _store: &FileStore) -> Option<Response> {
    let text = capture(&ECHO_ROUTE, req.path())?;

    Some(Response::new(StatusCode::Ok, text))
}

/// `GET /user-agent`
pub fn user_agent(req: &Request, _store: &FileStore) -> Option<Response> {
    if req.method() != &Method::GET || req.path() != "/user-agent" {
        return None;
    }

    let agent = req.header("User-Agent").unwrap_or_default();
    Some(Response::new(StatusCode::Ok, agent))
}

/// `GET /files/{name}`
pub fn read_file(req: &Request, store: &FileStore) -> Option<Response> {
    if req.method() != &Method::GET {
        return None;
    }

    let name = capture(&FILES_ROUTE, req.path())?;

    let response = match store.read(name) {
        Ok(FileRead::Found(contents)) => {
            let length = contents.len().to_string();
            Response::new(StatusCode::Ok, contents)
                .with_header("Content-Type", "application/octet-stream")
                .with_header("Content-Length", &length)
        }
        Ok(FileRead::Missing) | Ok(FileRead::Directory) => Response::empty(StatusCode::NotFound),
        Err(e) => {
            tracing::error!(file = name, error = %e, "failed to read file");
            Response::new(StatusCode::InternalServerError, e.to_string())
        }
    };

    Some(response)
}

/// `POST /files/{name}` - escribe el body del request
pub fn create_file(req: &Request, store: &FileStore) -> Option<Response> {
    if req.method() != &Method::POST {
        return None;
    }

    let name = capture(&FILES_ROUTE, req.path())?;

    let response = match store.write(name, req.body()) {
        Ok(()) => Response::empty(StatusCode::Created),
        Err(StoreError::IsDirectory) => Response::empty(StatusCode::BadRequest),
        Err(e) => {
            tracing::warn!(file = name, error = %e, "failed to write file");
            Response::new(StatusCode::BadRequest, e.to_string())
        }
    };

    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "minihttp_routes_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn parse(raw: &str) -> Request {
        Request::parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn test_index() {
        let store = FileStore::new("unused");

        let response = index(&parse("GET / HTTP/1.1\r\n\r\n"), &store).unwrap();
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());

        assert!(index(&parse("POST / HTTP/1.1\r\n\r\n"), &store).is_none());
        assert!(index(&parse("GET /index.html HTTP/1.1\r\n\r\n"), &store).is_none());
    }

    #[test]
    fn test_echo_returns_segment_verbatim() {
        let store = FileStore::new("unused");

        for text in ["abc", "hello%20world", "grape-mango_42", "ñandú"] {
            let raw = format!("GET /echo/{} HTTP/1.1\r\n\r\n", text);
            let response = echo(&parse(&raw), &store).unwrap();

            assert_eq!(response.status(), StatusCode::Ok);
            assert_eq!(response.body(), text.as_bytes());
        }
    }

    #[test]
    fn test_echo_ignores_method() {
        let store = FileStore::new("unused");
        let response = echo(&parse("PUT /echo/xyz HTTP/1.1\r\n\r\n"), &store).unwrap();

        assert_eq!(response.body(), b"xyz");
    }

    #[test]
    fn test_echo_declines() {
        let store = FileStore::new("unused");

        assert!(echo(&parse("GET /echo/ HTTP/1.1\r\n\r\n"), &store).is_none());
        assert!(echo(&parse("GET /echo/a/b HTTP/1.1\r\n\r\n"), &store).is_none());
        assert!(echo(&parse("GET /echo HTTP/1.1\r\n\r\n"), &store).is_none());
    }

    #[test]
    fn test_user_agent() {
        let store = FileStore::new("unused");

        let raw = "GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: foobar/1.2.3\r\n\r\n";
        let response = user_agent(&parse(raw), &store).unwrap();
        assert_eq!(response.body(), b"foobar/1.2.3");

        let response = user_agent(&parse("GET /user-agent HTTP/1.1\r\n\r\n"), &store).unwrap();
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());

        assert!(user_agent(&parse("POST /user-agent HTTP/1.1\r\n\r\n"), &store).is_none());
    }

    #[test]
    fn test_read_file_missing_and_directory() {
        let root = temp_root("read_missing");
        fs::create_dir_all(root.join("folder")).unwrap();
        let store = FileStore::new(&root);

        let response = read_file(&parse("GET /files/ghost.txt HTTP/1.1\r\n\r\n"), &store).unwrap();
        assert_eq!(response.status(), StatusCode::NotFound);
        assert!(response.body().is_empty());

        let response = read_file(&parse("GET /files/folder HTTP/1.1\r\n\r\n"), &store).unwrap();
        assert_eq!(response.status(), StatusCode::NotFound);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_read_file_found() {
        let root = temp_root("read_found");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("data.bin"), [0u8, 1, 2, 255]).unwrap();
        let store = FileStore::new(&root);

        let response = read_file(&parse("GET /files/data.bin HTTP/1.1\r\n\r\n"), &store).unwrap();
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), &[0u8, 1, 2, 255]);
        assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
        assert_eq!(response.header("Content-Length"), Some("4"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_read_file_stat_error_is_500() {
        let store = FileStore::new(temp_root("read_stat_error"));

        // metadata falla con InvalidInput por el byte NUL
        let response = read_file(&parse("GET /files/a\0b HTTP/1.1\r\n\r\n"), &store).unwrap();
        assert_eq!(response.status(), StatusCode::InternalServerError);
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert!(String::from_utf8_lossy(response.body()).contains("NUL"));
    }

    #[test]
    fn test_read_file_declines() {
        let store = FileStore::new("unused");

        assert!(read_file(&parse("POST /files/a HTTP/1.1\r\n\r\n"), &store).is_none());
        assert!(read_file(&parse("GET /files/ HTTP/1.1\r\n\r\n"), &store).is_none());
        assert!(read_file(&parse("GET /files/a/b HTTP/1.1\r\n\r\n"), &store).is_none());
    }

    #[test]
    fn test_create_file() {
        let root = temp_root("create");
        let store = FileStore::new(&root);

        let raw = "POST /files/new.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let response = create_file(&parse(raw), &store).unwrap();
        assert_eq!(response.status(), StatusCode::Created);
        assert!(response.body().is_empty());
        assert_eq!(fs::read(root.join("new.txt")).unwrap(), b"hello");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_create_file_on_directory() {
        let root = temp_root("create_dir");
        fs::create_dir_all(root.join("folder")).unwrap();
        let store = FileStore::new(&root);

        let response = create_file(&parse("POST /files/folder HTTP/1.1\r\n\r\nx"), &store).unwrap();
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert!(response.body().is_empty());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_create_file_root_failure() {
        let root = temp_root("create_root_fail");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("blocker"), b"file").unwrap();
        let store = FileStore::new(root.join("blocker"));

        let response = create_file(&parse("POST /files/a.txt HTTP/1.1\r\n\r\nx"), &store).unwrap();
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert!(!response.body().is_empty());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_create_file_declines_get() {
        let store = FileStore::new("unused");
        assert!(create_file(&parse("GET /files/a HTTP/1.1\r\n\r\n"), &store).is_none());
    }
}
