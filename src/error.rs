//! Error taxonomy for user-visible failures.
//!
//! Startup and file IO keep using `anyhow`; everything that can surface as a
//! notification while a session is running goes through `PrompterError` so the
//! reducer can react per category (e.g. permission failures force voice
//! control off, inference failures skip one tracking cycle).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrompterError {
    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("Voice control is not configured: {0}")]
    Configuration(String),

    #[error("Voice input could not be processed: {0}")]
    Inference(String),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Invalid value: {0}")]
    Validation(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("the access credential has expired; sign in again")]
    ExpiredCredential,

    #[error("no access credential configured")]
    MissingCredential,

    #[error("{0}")]
    Failed(String),
}

impl PrompterError {
    /// Short title used for the notification line.
    pub fn title(&self) -> &'static str {
        match self {
            PrompterError::PermissionDenied(_) => "Microphone Access Denied",
            PrompterError::Configuration(_) => "Configuration Error",
            PrompterError::Inference(_) => "AI Error",
            PrompterError::Import(_) => "Import Error",
            PrompterError::Validation(_) => "Invalid Input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_errors_convert_and_keep_expiry_message() {
        let err: PrompterError = ImportError::ExpiredCredential.into();
        assert_eq!(err.title(), "Import Error");
        assert!(err.to_string().contains("expired"));
    }
}
