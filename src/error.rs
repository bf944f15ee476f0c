use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Line item references unknown rubrique type {type_id}")]
    UnknownType { type_id: u32 },

    #[error("Unknown sub-category {id} referenced by {referenced_by}")]
    UnknownSubCategory { id: u32, referenced_by: String },

    #[error("Unknown category {id} referenced by {referenced_by}")]
    UnknownCategory { id: u32, referenced_by: String },

    #[error("Unknown chart account {0}")]
    UnknownAccount(u32),

    #[error("Duplicate id {id} in {table}")]
    DuplicateId { table: &'static str, id: u32 },

    #[error("Negative amount {amount} for '{label}': amounts must be positive")]
    NegativeAmount { label: String, amount: f64 },

    #[error("Submission is unbalanced: assets ({assets}) != liabilities ({liabilities})")]
    UnbalancedSubmission { assets: f64, liabilities: f64 },

    #[error("Invalid entry field '{field}': {details}")]
    InvalidEntry { field: &'static str, details: String },

    #[error("Invalid ratio thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Unknown company {0}")]
    UnknownCompany(u32),

    #[error("No financial data for company {company} in {year}")]
    NoDataForYear { company: u32, year: i32 },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnalysisError {
    /// True for the dangling-reference family that aborts aggregation.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownType { .. }
                | Self::UnknownSubCategory { .. }
                | Self::UnknownCategory { .. }
                | Self::UnknownAccount(_)
                | Self::DuplicateId { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
