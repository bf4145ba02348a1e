// Execution-time entropy used to pick the winning slot
use solana_program::{
    clock::Clock,
    program_error::ProgramError,
    sysvar::Sysvar,
};

/// Supplies a value that is unknown before the calling instruction executes.
///
/// Implementations must read the value fresh on every call; it must never
/// be cached across instructions.
pub trait EntropySource {
    fn current_value(&self) -> Result<u64, ProgramError>;
}

/// Uses the slot (chain height) the instruction executes in.
///
/// Whoever chooses when to submit the reveal transaction has some influence
/// over which slot is sampled.
pub struct ClockSlotEntropy;

impl EntropySource for ClockSlotEntropy {
    fn current_value(&self) -> Result<u64, ProgramError> {
        Ok(Clock::get()?.slot)
    }
}

/// Fixed value, for driving the state machine off-chain
pub struct FixedEntropy(pub u64);

impl EntropySource for FixedEntropy {
    fn current_value(&self) -> Result<u64, ProgramError> {
        Ok(self.0)
    }
}
