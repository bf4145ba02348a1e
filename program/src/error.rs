use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

/// Errors that may be returned by the raffle program.
///
/// Every variant is a validation failure: the runtime rolls back the whole
/// instruction, so none of them leave partial state behind.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// Every slot has already been sold
    #[error("No slots available")]
    NoSlotsAvailable,

    /// Reveal attempted before the last slot was sold
    #[error("Sale is still ongoing")]
    SaleOngoing,

    /// The administrator must use the privileged purchase path
    #[error("Owner cannot buy through the unprivileged path")]
    OwnerCannotBuyUnprivileged,

    /// A raffle needs at least two slots
    #[error("Too few slots")]
    TooFewSlots,

    /// Payment offered is below the slot price
    #[error("Insufficient payment")]
    InsufficientPayment,

    /// Slot price is zero, only the administrator may take slots
    #[error("Only privileged purchase is enabled")]
    PrivilegedOnlyPurchase,

    /// Revealed sequence length differs from the slot count
    #[error("Array length mismatch")]
    ArrayLengthMismatch,

    /// Commitment is zero, or the revealed data does not hash to it
    #[error("Invalid commitment")]
    InvalidCommitment,

    /// A winner has already been selected
    #[error("Winner already picked")]
    WinnerAlreadyPicked,

    /// Selected winning index lies outside the slot range
    #[error("Index out of bounds")]
    IndexOutOfBounds,

    /// Caller is not the administrator
    #[error("Unauthorized")]
    Unauthorized,

    /// Slot count exceeds what a single reveal transaction can carry
    #[error("Too many slots")]
    TooManySlots,
}

// Logs the error on conversion
impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        msg!("Error: {}", e);
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
