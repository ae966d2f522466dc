use crate::Config;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Failed to create storage directory: {0}")]
    StorageDirectoryCreationFailed(#[source] std::io::Error),

    #[error("Storage directory is not writable: {0}")]
    StorageDirectoryNotWritable(#[source] std::io::Error),

    #[error("Contact form has no recipient configured")]
    ContactRecipientMissing,
}

impl StartupCheckError {
    /// Whether the server should refuse to start.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            StartupCheckError::StorageDirectoryCreationFailed(_)
                | StartupCheckError::StorageDirectoryNotWritable(_)
        )
    }
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    let storage_dir = Path::new(&config.storage.directory);
    if !storage_dir.exists() {
        info!("Storage directory does not exist, creating: {:?}", storage_dir);
        if let Err(e) = tokio::fs::create_dir_all(storage_dir).await {
            error!("Failed to create storage directory: {}", e);
            errors.push(StartupCheckError::StorageDirectoryCreationFailed(e));
        }
    } else {
        info!("Storage directory exists: {:?}", storage_dir);
    }

    if errors.is_empty() {
        let probe = storage_dir.join(".write-probe");
        match tokio::fs::write(&probe, b"ok").await {
            Ok(()) => {
                let _ = tokio::fs::remove_file(&probe).await;
                info!("Storage directory is writable");
            }
            Err(e) => {
                error!("Storage directory is not writable: {}", e);
                errors.push(StartupCheckError::StorageDirectoryNotWritable(e));
            }
        }
    }

    match &config.contact {
        Some(contact) if contact.recipient.trim().is_empty() => {
            warn!("Contact recipient is empty, enquiries will be rejected");
            errors.push(StartupCheckError::ContactRecipientMissing);
        }
        Some(contact) => info!("Contact enquiries will be sent to {}", contact.recipient),
        None => warn!("No [contact] section configured, the contact form is disabled"),
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContactConfig;
    use crate::email::{EmailConfig, EmailProviderConfig, LogConfig};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_missing_storage_directory() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.directory = temp.path().join("nested").join("data");

        assert!(perform_startup_checks(&config).await.is_ok());
        assert!(config.storage.directory.is_dir());
    }

    #[tokio::test]
    async fn test_empty_recipient_is_not_critical() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.directory = temp.path().to_path_buf();
        config.contact = Some(ContactConfig {
            recipient: "  ".to_string(),
            email: EmailConfig {
                from_address: "noreply@example.com".to_string(),
                from_name: None,
                provider: EmailProviderConfig::Log(LogConfig::default()),
            },
        });

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], StartupCheckError::ContactRecipientMissing));
        assert!(!errors[0].is_critical());
    }

    #[tokio::test]
    async fn test_storage_path_that_is_a_file_is_critical() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        std::fs::write(&file, "x").unwrap();

        let mut config = Config::default();
        config.storage.directory = file;

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert!(errors.iter().any(StartupCheckError::is_critical));
    }
}
