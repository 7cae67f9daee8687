//! Server state shared by all handlers.

use std::{path::PathBuf, sync::Arc};

use crate::domain::ConnectionRegistry;

/// Shared application state
pub struct AppState {
    /// Registry（データアクセス層の抽象化）
    pub registry: Arc<dyn ConnectionRegistry>,
    /// Directory the static client files are read from
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            public_dir: public_dir.into(),
        }
    }
}
