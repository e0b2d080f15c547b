use forge_model::SafeDisplay;

/// Raised by [`crate::registry::PluginRegistry`] lookups and registrations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no plug-in registered for type {tag}")]
    NotFound { tag: String },
    #[error("type {name} has no version and no default version is registered")]
    NoDefaultVersion { name: String },
    #[error("cannot register a different plug-in under type {tag}: one is already registered")]
    Conflict { tag: String },
}

impl SafeDisplay for RegistryError {
    fn to_safe_string(&self) -> String {
        self.to_string()
    }
}

/// Raised by [`crate::contracts::TargetRepository`], [`crate::contracts::ResourceRepository`],
/// and [`crate::contracts::ExternalComponentRepository`] implementations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("component version {name}:{version} already exists")]
    AlreadyExists { name: String, version: String },
    #[error("component version {name}:{version} was not found")]
    NotFound { name: String, version: String },
    #[error("repository backend error: {message}")]
    Backend { message: String },
    #[error("repository call was cancelled")]
    Cancelled,
}

impl SafeDisplay for RepositoryError {
    fn to_safe_string(&self) -> String {
        match self {
            RepositoryError::AlreadyExists { name, version } => {
                format!("component version {name}:{version} already exists")
            }
            RepositoryError::NotFound { name, version } => {
                format!("component version {name}:{version} was not found")
            }
            RepositoryError::Backend { .. } => "repository backend error".to_string(),
            RepositoryError::Cancelled => "repository call was cancelled".to_string(),
        }
    }
}

/// Raised by [`crate::contracts::ResourceInputMethod`]/[`crate::contracts::SourceInputMethod`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("input method {input_type} failed for {identity}: {message}")]
pub struct InputMethodError {
    pub identity: String,
    pub input_type: String,
    pub message: String,
}

impl SafeDisplay for InputMethodError {
    fn to_safe_string(&self) -> String {
        format!("input method {} failed for {}", self.input_type, self.identity)
    }
}

/// Raised by [`crate::contracts::ResourceDigestProcessor`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("digest processing failed for {identity}: {message}")]
pub struct DigestError {
    pub identity: String,
    pub message: String,
}

impl SafeDisplay for DigestError {
    fn to_safe_string(&self) -> String {
        format!("digest processing failed for {}", self.identity)
    }
}

/// Raised by [`crate::contracts::CredentialResolver`]. `NotFound` is best-effort recoverable —
/// callers proceed with an empty credential map — every other variant is fatal.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("no credentials found for consumer identity {identity}")]
    NotFound { identity: String },
    #[error("credential resolution failed for {identity}: {message}")]
    Resolution { identity: String, message: String },
    #[error("credential resolution was cancelled")]
    Cancelled,
}

impl SafeDisplay for CredentialError {
    fn to_safe_string(&self) -> String {
        match self {
            CredentialError::NotFound { identity } => {
                format!("no credentials found for {identity}")
            }
            CredentialError::Resolution { identity, .. } => {
                format!("credential resolution failed for {identity}")
            }
            CredentialError::Cancelled => "credential resolution was cancelled".to_string(),
        }
    }
}
