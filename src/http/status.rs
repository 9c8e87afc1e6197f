//! # Códigos de Estado HTTP
//!
//! Conjunto cerrado de códigos que el servidor puede emitir. Cualquier
//! código fuera de esta lista es un error de programación: como el enum no
//! lo puede representar, la única vía de entrada es `StatusCode::try_from`.
//!
//! - **2xx**: 200, 201, 204
//! - **4xx**: 400, 404, 409
//! - **5xx**: 500

/// Código numérico que no pertenece al conjunto soportado
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid status code: {0}")]
pub struct UnknownStatus(pub u16);

/// Códigos de estado que soporta el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok = 200,

    /// 201 Created - archivo escrito con éxito
    Created = 201,

    /// 204 No Content
    NoContent = 204,

    /// 400 Bad Request - request malformado o error de escritura
    BadRequest = 400,

    /// 404 Not Found - ruta o archivo inexistente
    NotFound = 404,

    /// 409 Conflict - el recurso ya existe
    Conflict = 409,

    /// 500 Internal Server Error
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::StatusCode;
    /// assert_eq!(StatusCode::Created.as_u16(), 201);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Texto de razón que acompaña al código en la status line
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::Conflict => "Conflict",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = UnknownStatus;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            200 => Ok(StatusCode::Ok),
            201 => Ok(StatusCode::Created),
            204 => Ok(StatusCode::NoContent),
            400 => Ok(StatusCode::BadRequest),
            404 => Ok(StatusCode::NotFound),
            409 => Ok(StatusCode::Conflict),
            500 => Ok(StatusCode::InternalServerError),
            other => Err(UnknownStatus(other)),
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
