use thiserror::Error;

/// Reasons a signup or unregister request is rejected by the registry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Please log in as a teacher to register students")]
    Unauthorized,
    #[error("Activity not found")]
    NotFound,
    #[error("Student is already signed up")]
    AlreadyRegistered,
    #[error("Student is not signed up for this activity")]
    NotRegistered,
}
