//! Error types for the `domain` layer.
use crate::encryption::EncryptionError;
use ai_auth::error::{Error as AiAuthError, ErrorKind as AiAuthErrorKind};
use ai_provider::AttemptErrorKind;
use entity_api::ai_provider::AiProvider;
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use entity_api::Id;
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries. Ex. `domain` is dependent on `entity_api`, and the CLI is dependent on
/// `domain`, but the CLI should not be dependent, directly, on `entity_api`.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    Encryption,
    Invalid(String),
    Other(String),
}

/// Enum representing the various kinds of entity errors that can bubble up from the "Entity" layer (`entity_api` and `entity`).
/// These errors are translated from the `entity_api` layer to the `domain` layer and reduced to a subset of error kinds
/// that are relevant to the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    DbTransaction,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Ai(AiErrorKind),
    Other(String),
}

/// Failures of a routed generation request.
#[derive(Debug, PartialEq)]
pub enum AiErrorKind {
    /// The provider has no active credentials; no provider call was made.
    NoCredentialsAvailable { provider: AiProvider },
    /// Every candidate credential was tried once and failed.
    AllCredentialsExhausted {
        provider: AiProvider,
        tried: Vec<Id>,
        last: AttemptErrorKind,
    },
    /// The provider answered, but not with the document shape the caller asked for.
    ContentShape,
}

impl Error {
    pub(crate) fn ai(kind: AiErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Ai(kind)),
        }
    }

    pub(crate) fn invalid(message: &str) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Invalid(message.to_string())),
        }
    }

    /// Short, secret-free description suitable for showing to an operator.
    pub fn user_message(&self) -> String {
        match &self.error_kind {
            DomainErrorKind::External(ExternalErrorKind::Ai(kind)) => match kind {
                AiErrorKind::NoCredentialsAvailable { provider } => format!(
                    "No active {} API keys found. Please add keys first.",
                    provider.display_name()
                ),
                AiErrorKind::AllCredentialsExhausted {
                    provider, tried, ..
                } => format!(
                    "All {} API keys failed ({} tried). Please check your keys or quota.",
                    provider.display_name(),
                    tried.len()
                ),
                AiErrorKind::ContentShape => {
                    "The AI response was not in the expected format.".to_string()
                }
            },
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)) => {
                "Record not found.".to_string()
            }
            DomainErrorKind::Internal(InternalErrorKind::Invalid(message)) => message.clone(),
            DomainErrorKind::Internal(InternalErrorKind::Config) => match &self.source {
                Some(source) => format!("Configuration error: {source}"),
                None => "Configuration error.".to_string(),
            },
            DomainErrorKind::External(ExternalErrorKind::Network) => {
                "Could not reach the provider.".to_string()
            }
            _ => "Internal error.".to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {:?}", self.error_kind)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::RecordNotUpdated => EntityErrorKind::DbTransaction,
            EntityApiErrorKind::SystemError => EntityErrorKind::Other("SystemError".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<AiAuthError> for Error {
    fn from(err: AiAuthError) -> Self {
        let error_kind = match &err.error_kind {
            AiAuthErrorKind::Http(_) => {
                DomainErrorKind::Internal(InternalErrorKind::Other(err.to_string()))
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<EncryptionError> for Error {
    fn from(err: EncryptionError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Encryption),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_not_found_maps_to_domain_not_found() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
        .into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
        assert_eq!(err.user_message(), "Record not found.");
    }

    #[test]
    fn exhausted_message_names_provider_and_attempts() {
        let err = Error::ai(AiErrorKind::AllCredentialsExhausted {
            provider: AiProvider::Groq,
            tried: vec![Id::new_v4(), Id::new_v4()],
            last: AttemptErrorKind::RateLimited,
        });

        assert_eq!(
            err.user_message(),
            "All Groq API keys failed (2 tried). Please check your keys or quota."
        );
    }

    #[test]
    fn no_credentials_message_names_provider() {
        let err = Error::ai(AiErrorKind::NoCredentialsAvailable {
            provider: AiProvider::Gemini,
        });
        assert!(err.user_message().starts_with("No active Gemini API keys"));
    }
}
