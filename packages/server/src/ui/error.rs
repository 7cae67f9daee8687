//! Server lifecycle errors.

use std::{io, net::SocketAddr};

use thiserror::Error;

/// Errors that end the server process
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] io::Error),

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
