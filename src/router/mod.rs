//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Cadena ordenada de matchers. Cada uno examina el request y produce una
//! respuesta o declina; el primero que responde gana.
//!
//! ```text
//! Request → index → echo → user-agent → read-file → create-file → 404
//! ```
//!
//! La tabla se arma una vez al arrancar y no se modifica después, así que se
//! comparte entre threads sin locks.

pub mod routes;

use crate::http::{Request, Response, StatusCode};
use crate::storage::FileStore;

/// Un matcher recibe el request y el store; `None` significa "no es mío"
pub type Matcher = fn(&Request, &FileStore) -> Option<Response>;

/// Router con prioridad fija
pub struct Router {
    /// Nombre de la ruta → matcher, en orden de evaluación
    routes: Vec<(&'static str, Matcher)>,
    store: FileStore,
}

impl Router {
    /// Crea un router vacío sobre un store
    pub fn new(store: FileStore) -> Self {
        Self {
            routes: Vec::new(),
            store,
        }
    }

    /// Router con las rutas del servidor en su orden de prioridad
    pub fn with_default_routes(store: FileStore) -> Self {
        let mut router = Self::new(store);

        router.register("index", routes::index);
        router.register("echo", routes::echo);
        router.register("user-agent", routes::user_agent);
        router.register("read-file", routes::read_file);
        router.register("create-file", routes::create_file);

        router
    }

    /// Agrega un matcher al final de la cadena
    pub fn register(&mut self, name: &'static str, matcher: Matcher) {
        self.routes.push((name, matcher));
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Ejecuta la cadena y retorna la primera respuesta; 404 si nadie responde
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::router::Router;
    /// use minihttp::storage::FileStore;
    /// use minihttp::http::Request;
    ///
    /// let router = Router::with_default_routes(FileStore::new("tmp"));
    ///
    /// let request = Request::parse(b"GET /echo/abc HTTP/1.1\r\n\r\n").unwrap();
    /// let response = router.route(&request);
    /// assert_eq!(response.body(), b"abc");
    /// ```
    pub fn route(&self, request: &Request) -> Response {
        for (name, matcher) in &self.routes {
            if let Some(response) = matcher(request, &self.store) {
                tracing::debug!(route = *name, status = response.status().as_u16(), "route matched");
                return response;
            }
        }

        tracing::debug!(path = request.path(), "no route matched");
        Response::empty(StatusCode::NotFound)
    }
}
