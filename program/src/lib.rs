// Commit-reveal raffle program
// Slots are sold at a fixed price; once every slot is sold the administrator
// reveals a pre-committed index sequence, and the execution slot picks the winner.

pub mod entropy;
pub mod error;
pub mod event;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod utils;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
