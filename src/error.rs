use thiserror::Error;

#[derive(Error, Debug)]
pub enum VancoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid dosing configuration: {0}")]
    InvalidDosing(String),

    /// A quantity left the domain of a closed-form expression (log of a
    /// non-positive ratio, division by a vanishing k * t_inf).
    #[error("Arithmetic domain error: {quantity} = {value}")]
    Domain { quantity: &'static str, value: f64 },

    #[error("CrCl {crcl:.1} mL/min is below the critical threshold of {threshold} mL/min; consider alternative therapy")]
    RenalFunction { crcl: f64, threshold: f64 },
}

pub type VancoResult<T> = Result<T, VancoError>;
