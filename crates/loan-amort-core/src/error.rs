use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Irregular schedule for loan {loan_number}, period {period}: {reason}")]
    IrregularSchedule {
        loan_number: String,
        period: u32,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AmortError {
    fn from(e: serde_json::Error) -> Self {
        AmortError::SerializationError(e.to_string())
    }
}
