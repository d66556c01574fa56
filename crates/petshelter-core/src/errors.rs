use thiserror::Error;

/// Result type alias using PetShelterError
pub type Result<T> = std::result::Result<T, PetShelterError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// programmatically and that shows up in structured log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    InvalidWeight,
    InvalidGender,
    NotFound,
    ConstraintViolation,

    // Integration/IO
    Io,
    Persistence,
    StorageUnavailable,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidWeight => "ERR_INVALID_WEIGHT",
            ExErrorKind::InvalidGender => "ERR_INVALID_GENDER",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::StorageUnavailable => "ERR_STORAGE_UNAVAILABLE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation name, pet id, message, wrapped source) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (the pet id, rendered as text)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (pet_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for PetShelter operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PetShelterError {
    /// Pet not found in store
    #[error("Pet not found: {pet_id}")]
    PetNotFound { pet_id: i64 },

    /// Weight text that is not a non-negative integer
    #[error("Invalid weight {value:?}: must be a non-negative whole number")]
    InvalidWeight { value: String },

    /// Gender code or label outside UNKNOWN/MALE/FEMALE
    #[error("Invalid gender: {value}")]
    InvalidGender { value: String },

    /// Editor delete requested for a pet that was never saved
    #[error("Cannot delete a pet that has not been saved")]
    UnsavedPet,
}

/// Conversion from PetShelterError to ExError
impl From<PetShelterError> for ExError {
    fn from(err: PetShelterError) -> Self {
        match err {
            PetShelterError::PetNotFound { pet_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(pet_id.to_string())
                .with_message("Pet not found"),

            PetShelterError::InvalidWeight { value } => ExError::new(ExErrorKind::InvalidWeight)
                .with_message(format!("Invalid weight: {:?}", value)),

            PetShelterError::InvalidGender { value } => ExError::new(ExErrorKind::InvalidGender)
                .with_message(format!("Invalid gender: {}", value)),

            PetShelterError::UnsavedPet => ExError::new(ExErrorKind::InvalidInput)
                .with_op("delete_pet")
                .with_message("Pet has not been saved"),
        }
    }
}
