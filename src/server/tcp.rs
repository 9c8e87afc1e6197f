//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones y procesa cada una en su propio thread. Cada conexión
//! lleva un único request: se lee, se enruta, se escribe la respuesta y el
//! socket se cierra al terminar el thread.
//!
//! El loop de accept se detiene con un `ShutdownHandle`. Los threads que ya
//! están procesando una conexión no se cancelan: `run` espera a que terminen
//! antes de retornar. No hay timeouts de lectura/escritura ni límite de
//! conexiones.

use crate::config::Config;
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use crate::storage::FileStore;
use std::io::{self, Read, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// Errores del loop de accept
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("error accepting connection: {0}")]
    Accept(#[source] io::Error),
}

/// Permite detener el loop de accept desde otro thread (ej: un handler de señales)
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,

    /// Dirección a la que se conecta para despertar el `accept` bloqueado
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    fn new(local_addr: SocketAddr) -> Self {
        let mut wake_addr = local_addr;
        if wake_addr.ip().is_unspecified() {
            let loopback = match wake_addr.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            wake_addr.set_ip(loopback);
        }

        Self {
            requested: Arc::new(AtomicBool::new(false)),
            wake_addr,
        }
    }

    /// Pide que el servidor deje de aceptar conexiones nuevas
    ///
    /// Idempotente: solo el primer llamado despierta al listener.
    pub fn shutdown(&self) {
        if self.requested.swap(true, Ordering::SeqCst) {
            return;
        }

        // Si el connect falla el listener ya no está aceptando
        if let Err(e) = TcpStream::connect(self.wake_addr) {
            debug!(error = %e, "wake-up connection failed");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Servidor HTTP/1.1, un thread por conexión
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Hace bind en `config.address()` con las rutas por defecto sobre `config.directory`
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        let address = config.address();
        let bind_error = |source| ServerError::Bind {
            address: address.clone(),
            source,
        };

        let listener = TcpListener::bind(&address).map_err(bind_error)?;
        let router = Router::with_default_routes(FileStore::new(config.directory.clone()));

        Self::from_listener(listener, router).map_err(bind_error)
    }

    /// Construye el servidor sobre un listener ya creado
    pub fn from_listener(listener: TcpListener, router: Router) -> io::Result<Self> {
        let shutdown = ShutdownHandle::new(listener.local_addr()?);

        Ok(Self {
            listener,
            router: Arc::new(router),
            shutdown,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Loop de accept; bloquea hasta que se pide shutdown o falla un accept
    ///
    /// Antes de retornar espera a los handlers que siguen en curso.
    pub fn run(&self) -> Result<(), ServerError> {
        if let Ok(addr) = self.local_addr() {
            info!(%addr, root = %self.router.store().root().display(), "listening");
        }

        let mut handlers: Vec<JoinHandle<()>> = Vec::new();

        loop {
            let (stream, peer) = match self.listener.accept() {
                Ok(conn) => conn,
                Err(_) if self.shutdown.is_shutdown() => break,
                Err(e) => {
                    error!(error = %e, "error accepting connection");
                    drain(handlers);
                    return Err(ServerError::Accept(e));
                }
            };

            // La conexión que despierta al listener no se procesa
            if self.shutdown.is_shutdown() {
                info!("stopped accepting connections");
                break;
            }

            debug!(%peer, "accepted connection");

            // Los handlers terminados se sueltan
            handlers.retain(|h| !h.is_finished());

            let router = Arc::clone(&self.router);
            handlers.push(thread::spawn(move || {
                let mut stream = stream;
                if let Err(e) = handle_connection(&mut stream, &router) {
                    warn!(%peer, error = %e, "failed to write response");
                }
            }));
        }

        drain(handlers);
        Ok(())
    }
}

/// Espera a que terminen los handlers en curso
fn drain(handlers: Vec<JoinHandle<()>>) {
    let pending: Vec<_> = handlers.into_iter().filter(|h| !h.is_finished()).collect();
    if !pending.is_empty() {
        info!(count = pending.len(), "waiting for in-flight connections");
    }

    for handle in pending {
        if handle.join().is_err() {
            error!("connection handler panicked");
        }
    }
}

/// Procesa un único request sobre `stream` y escribe la respuesta
///
/// Un error de lectura o parseo se responde con 400 y el texto del error.
/// Solo falla si no se puede escribir la respuesta.
pub fn handle_connection<S: Read + Write>(stream: &mut S, router: &Router) -> io::Result<StatusCode> {
    let response = match Request::read_from(stream) {
        Ok(request) => {
            let mut response = router.route(&request);
            let encoding = response.compress(request.header("Accept-Encoding").unwrap_or_default());

            log_request(&request, &response, encoding.map(|e| e.as_str()).unwrap_or("identity"));
            response
        }
        Err(e) => {
            warn!(error = %e, "invalid request");
            Response::new(StatusCode::BadRequest, e.to_string())
        }
    };

    response.write_to(stream)?;
    Ok(response.status())
}

/// Loguea un request atendido con el nivel según la clase del status
fn log_request(request: &Request, response: &Response, encoding: &str) {
    let method = request.method().as_str();
    let path = request.path();
    let status = response.status();
    let bytes = response.body().len();

    if status.is_server_error() {
        error!(method, path, status = status.as_u16(), encoding, bytes, "request failed");
    } else if status.is_client_error() {
        warn!(method, path, status = status.as_u16(), encoding, bytes, "request rejected");
    } else if status.is_success() {
        info!(method, path, status = status.as_u16(), encoding, bytes, "request handled");
    } else {
        debug!(method, path, status = status.as_u16(), encoding, bytes, "request handled");
    }
}
