// Events published to the transaction's data log
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, program_error::ProgramError, pubkey::Pubkey};

/// Observable raffle events, in emission order within a transaction.
///
/// Each event is borsh-encoded and written with `sol_log_data`, so an
/// indexer reads them back from the `Program data:` log lines.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleEvent {
    /// A slot was sold (or taken by the administrator)
    SlotPurchased {
        raffle: Pubkey,
        buyer: Pubkey,
        slot_index: u64,
    },
    /// The reveal picked the winning slot
    WinnerSelected {
        raffle: Pubkey,
        winner: Pubkey,
        slot_index: u64,
    },
    /// The registry created a raffle
    RaffleCreated { raffle: Pubkey },
    /// Administrator role of a raffle or the registry changed hands
    AdministratorTransferred {
        account: Pubkey,
        previous: Pubkey,
        new: Pubkey,
    },
    /// Held balance paid out to the administrator
    Withdrawn { raffle: Pubkey, amount: u64 },
}

impl RaffleEvent {
    pub fn emit(&self) -> Result<(), ProgramError> {
        let data = self
            .try_to_vec()
            .map_err(|_| ProgramError::InvalidArgument)?;
        sol_log_data(&[&data]);
        Ok(())
    }
}
