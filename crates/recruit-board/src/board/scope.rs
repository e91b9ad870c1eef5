use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::pipeline::{JobFilter, LifecycleScope, PortalMode};

/// Dashboard view scope remembered between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewScope {
    #[serde(default)]
    pub mode: PortalMode,
    #[serde(default)]
    pub selected_company: Option<String>,
}

impl ViewScope {
    pub fn vendor(company: impl Into<String>) -> Self {
        Self {
            mode: PortalMode::Vendor,
            selected_company: Some(company.into()),
        }
    }

    /// Blank company names are stored as "no company selected".
    pub fn normalized(self) -> Self {
        let selected_company = self
            .selected_company
            .map(|company| company.trim().to_string())
            .filter(|company| !company.is_empty());
        Self {
            mode: self.mode,
            selected_company,
        }
    }

    pub fn job_filter(&self, lifecycle: LifecycleScope) -> JobFilter {
        JobFilter {
            mode: self.mode,
            selected_company: self.selected_company.clone(),
            lifecycle,
        }
    }
}

/// Narrow load/save contract for the persisted view scope.
pub trait ScopeStore: Send + Sync {
    fn load(&self) -> Result<ViewScope, ScopeError>;
    fn save(&self, scope: &ViewScope) -> Result<(), ScopeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("failed to access scope file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("scope file {path} is not valid JSON: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Scope persisted as a small JSON document on disk.
#[derive(Debug)]
pub struct JsonFileScopeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileScopeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> ScopeError {
        ScopeError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScopeStore for JsonFileScopeStore {
    fn load(&self) -> Result<ViewScope, ScopeError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(ViewScope::default()),
            Err(err) => return Err(self.io_error(err)),
        };
        if raw.trim().is_empty() {
            return Ok(ViewScope::default());
        }
        let scope: ViewScope = serde_json::from_str(&raw).map_err(|source| ScopeError::Format {
            path: self.path.clone(),
            source,
        })?;
        Ok(scope.normalized())
    }

    fn save(&self, scope: &ViewScope) -> Result<(), ScopeError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let body = serde_json::to_vec_pretty(scope).map_err(|source| ScopeError::Format {
            path: self.path.clone(),
            source,
        })?;

        // Write then rename so readers never see a half-written file.
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, body).map_err(|err| self.io_error(err))?;
        std::fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;
        Ok(())
    }
}

/// Process-local scope, used by tests and the demo.
#[derive(Debug, Default)]
pub struct MemoryScopeStore {
    scope: Mutex<ViewScope>,
}

impl MemoryScopeStore {
    pub fn with_scope(scope: ViewScope) -> Self {
        Self {
            scope: Mutex::new(scope),
        }
    }
}

impl ScopeStore for MemoryScopeStore {
    fn load(&self) -> Result<ViewScope, ScopeError> {
        Ok(self
            .scope
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, scope: &ViewScope) -> Result<(), ScopeError> {
        *self.scope.lock().unwrap_or_else(PoisonError::into_inner) = scope.clone();
        Ok(())
    }
}
