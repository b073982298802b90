//! Error types for routeguide

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Request Errors ===
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Call cancelled: {0}")]
    Cancelled(String),

    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feature database error: {0}")]
    Json(#[from] serde_json::Error),

    // === Network Errors ===
    #[error("gRPC error: {0}")]
    Grpc(tonic::Status),

    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Is this the caller's fault?
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidArgument(_) | Error::Cancelled(_))
    }

    /// Convert to gRPC status for RPC responses
    pub fn to_grpc_status(&self) -> tonic::Status {
        use tonic::Code;
        match self {
            Error::InvalidArgument(_) => tonic::Status::new(Code::InvalidArgument, self.to_string()),
            Error::Cancelled(_) => tonic::Status::new(Code::Cancelled, self.to_string()),
            Error::Grpc(status) => status.clone(),
            _ => tonic::Status::new(Code::Internal, self.to_string()),
        }
    }
}

impl From<Error> for tonic::Status {
    fn from(e: Error) -> Self {
        e.to_grpc_status()
    }
}

impl From<::config::ConfigError> for Error {
    fn from(e: ::config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

/// A `Cancelled` status from the peer keeps its meaning on this side.
impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Cancelled => Error::Cancelled(status.message().to_string()),
            _ => Error::Grpc(status),
        }
    }
}
