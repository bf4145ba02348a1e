// Raffle program instructions and client-side builders
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::utils;

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Create the registry and make the signer its administrator
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The registry administrator, pays for the registry account
    /// 1. `[writable]` The registry account (PDA `["registry"]`)
    /// 2. `[]` The system program
    CreateRegistry,

    /// Create a raffle through the registry
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The registry administrator, pays for the new accounts
    /// 1. `[writable]` The registry account
    /// 2. `[writable]` The raffle account (PDA `["raffle", registry, count]`)
    /// 3. `[]` The system program
    CreateRaffle {
        slot_count: u64,
        slot_price: u64,
        provenance_commitment: [u8; 32],
    },

    /// Create a raffle without the registry
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The raffle administrator, pays for the raffle account
    /// 1. `[signer, writable]` The raffle account, a fresh keypair
    /// 2. `[]` The system program
    InitializeRaffle {
        slot_count: u64,
        slot_price: u64,
        provenance_commitment: [u8; 32],
    },

    /// Buy the next slot by paying at least the slot price
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The buyer
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The system program
    Purchase {
        /// Lamports moved to the raffle; any excess over the price is kept
        paid_amount: u64,
    },

    /// Take the next slot as the administrator
    ///
    /// Accounts expected:
    /// 0. `[signer]` The raffle administrator
    /// 1. `[writable]` The raffle account
    PurchasePrivileged,

    /// Reveal the committed sequence and select the winner
    ///
    /// Accounts expected:
    /// 0. `[signer]` The raffle administrator
    /// 1. `[writable]` The raffle account
    Reveal {
        revealed_indices: Vec<u64>,
        revealed_salt: [u8; 32],
    },

    /// Pay the raffle's held balance out to the administrator
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The raffle administrator
    /// 1. `[writable]` The raffle account
    Withdraw,

    /// Hand the raffle administrator role to another key
    ///
    /// Accounts expected:
    /// 0. `[signer]` The current raffle administrator
    /// 1. `[writable]` The raffle account
    TransferRaffleAdministrator { new_administrator: Pubkey },

    /// Hand the registry administrator role to another key
    ///
    /// Accounts expected:
    /// 0. `[signer]` The current registry administrator
    /// 1. `[writable]` The registry account
    TransferRegistryAdministrator { new_administrator: Pubkey },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|_| ProgramError::InvalidInstructionData)
    }
}

/// Create create_registry instruction
pub fn create_registry(
    program_id: &Pubkey,
    administrator: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let (registry, _) = utils::find_registry_address(program_id);
    let data = RaffleInstruction::CreateRegistry.pack()?;

    let accounts = vec![
        AccountMeta::new(*administrator, true),
        AccountMeta::new(registry, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create create_raffle instruction for the raffle at position `index` of the registry
pub fn create_raffle(
    program_id: &Pubkey,
    administrator: &Pubkey,
    index: u64,
    slot_count: u64,
    slot_price: u64,
    provenance_commitment: [u8; 32],
) -> Result<Instruction, ProgramError> {
    let (registry, _) = utils::find_registry_address(program_id);
    let (raffle, _) = utils::find_raffle_address(program_id, &registry, index);
    let data = RaffleInstruction::CreateRaffle {
        slot_count,
        slot_price,
        provenance_commitment,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new(*administrator, true),
        AccountMeta::new(registry, false),
        AccountMeta::new(raffle, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create initialize_raffle instruction
pub fn initialize_raffle(
    program_id: &Pubkey,
    administrator: &Pubkey,
    raffle_account: &Pubkey,
    slot_count: u64,
    slot_price: u64,
    provenance_commitment: [u8; 32],
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::InitializeRaffle {
        slot_count,
        slot_price,
        provenance_commitment,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new(*administrator, true),
        AccountMeta::new(*raffle_account, true),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create purchase instruction
pub fn purchase(
    program_id: &Pubkey,
    buyer: &Pubkey,
    raffle_account: &Pubkey,
    paid_amount: u64,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::Purchase { paid_amount }.pack()?;

    let accounts = vec![
        AccountMeta::new(*buyer, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create purchase_privileged instruction
pub fn purchase_privileged(
    program_id: &Pubkey,
    administrator: &Pubkey,
    raffle_account: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::PurchasePrivileged.pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*administrator, true),
        AccountMeta::new(*raffle_account, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create reveal instruction
pub fn reveal(
    program_id: &Pubkey,
    administrator: &Pubkey,
    raffle_account: &Pubkey,
    revealed_indices: Vec<u64>,
    revealed_salt: [u8; 32],
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::Reveal {
        revealed_indices,
        revealed_salt,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*administrator, true),
        AccountMeta::new(*raffle_account, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create withdraw instruction
pub fn withdraw(
    program_id: &Pubkey,
    administrator: &Pubkey,
    raffle_account: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::Withdraw.pack()?;

    let accounts = vec![
        AccountMeta::new(*administrator, true),
        AccountMeta::new(*raffle_account, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create transfer_raffle_administrator instruction
pub fn transfer_raffle_administrator(
    program_id: &Pubkey,
    administrator: &Pubkey,
    raffle_account: &Pubkey,
    new_administrator: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::TransferRaffleAdministrator {
        new_administrator: *new_administrator,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*administrator, true),
        AccountMeta::new(*raffle_account, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create transfer_registry_administrator instruction
pub fn transfer_registry_administrator(
    program_id: &Pubkey,
    administrator: &Pubkey,
    new_administrator: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let (registry, _) = utils::find_registry_address(program_id);
    let data = RaffleInstruction::TransferRegistryAdministrator {
        new_administrator: *new_administrator,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*administrator, true),
        AccountMeta::new(registry, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
