//! # Almacenamiento de archivos
//! src/storage.rs
//!
//! Adaptador sobre el filesystem para las rutas `/files/*`. Todos los nombres
//! se resuelven directamente bajo el directorio raíz configurado.
//!
//! ## Limitaciones conocidas
//!
//! - No hay protección contra path traversal: el nombre capturado se une al
//!   root tal cual.
//! - Escrituras concurrentes al mismo archivo no se sincronizan; gana la
//!   última. Cada escritura va a un archivo temporal que después se renombra
//!   sobre el destino, así que el contenido final es siempre uno de los
//!   bodies completos.
//! - Un archivo existente se sobrescribe sin aviso.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Contador para nombres de archivos temporales únicos dentro del proceso
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Resultado de leer un archivo del store
#[derive(Debug, PartialEq, Eq)]
pub enum FileRead {
    /// Contenido completo del archivo
    Found(Vec<u8>),

    /// No existe nada con ese nombre
    Missing,

    /// El nombre apunta a un directorio
    Directory,
}

/// Errores al escribir un archivo
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No se pudo crear el directorio raíz
    #[error("{0}")]
    CreateRoot(#[source] io::Error),

    /// El destino existe y es un directorio
    #[error("target is a directory")]
    IsDirectory,

    /// Falló la escritura del archivo
    #[error("{0}")]
    Write(#[source] io::Error),
}

/// Store de archivos anclado a un directorio raíz
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<name>`, sin normalizar
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Lee un archivo completo
    ///
    /// `NotFound` y directorios no son errores; cualquier otro fallo de
    /// `metadata` o de lectura se propaga.
    pub fn read(&self, name: &str) -> io::Result<FileRead> {
        let path = self.resolve(name);

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FileRead::Missing),
            Err(e) => return Err(e),
        };

        if metadata.is_dir() {
            return Ok(FileRead::Directory);
        }

        Ok(FileRead::Found(fs::read(&path)?))
    }

    /// Escribe (crea o reemplaza) un archivo con `contents`
    ///
    /// Crea el directorio raíz si hace falta. El contenido se escribe en un
    /// temporal junto al destino y se renombra encima.
    pub fn write(&self, name: &str, contents: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(StoreError::CreateRoot)?;

        let path = self.resolve(name);
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_dir() => return Err(StoreError::IsDirectory),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::Write(e)),
        }

        let temp = self.temp_path(&path);
        if let Err(e) = fs::write(&temp, contents).and_then(|_| fs::rename(&temp, &path)) {
            let _ = fs::remove_file(&temp);
            return Err(StoreError::Write(e));
        }

        Ok(())
    }

    /// `<dir>/.<file>.<pid>.<n>.tmp` en el mismo directorio que `path`
    fn temp_path(&self, path: &Path) -> PathBuf {
        let dir = path.parent().unwrap_or(self.root.as_path());
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        dir.join(format!(".{}.{}.{}.tmp", file, std::process::id(), n))
    }
}
