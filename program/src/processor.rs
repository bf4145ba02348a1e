// Raffle program instruction processor
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    entropy::ClockSlotEntropy,
    event::RaffleEvent,
    instruction::RaffleInstruction,
    state::{Raffle, RaffleRegistry},
    utils::{self, RAFFLE_SEED, REGISTRY_SEED},
};

/// Program state handler.
pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::CreateRegistry => {
                msg!("Instruction: Create Registry");
                Self::process_create_registry(accounts, program_id)
            }
            RaffleInstruction::CreateRaffle {
                slot_count,
                slot_price,
                provenance_commitment,
            } => {
                msg!("Instruction: Create Raffle");
                Self::process_create_raffle(
                    accounts,
                    slot_count,
                    slot_price,
                    provenance_commitment,
                    program_id,
                )
            }
            RaffleInstruction::InitializeRaffle {
                slot_count,
                slot_price,
                provenance_commitment,
            } => {
                msg!("Instruction: Initialize Raffle");
                Self::process_initialize_raffle(
                    accounts,
                    slot_count,
                    slot_price,
                    provenance_commitment,
                    program_id,
                )
            }
            RaffleInstruction::Purchase { paid_amount } => {
                msg!("Instruction: Purchase");
                Self::process_purchase(accounts, paid_amount, program_id)
            }
            RaffleInstruction::PurchasePrivileged => {
                msg!("Instruction: Purchase Privileged");
                Self::process_purchase_privileged(accounts, program_id)
            }
            RaffleInstruction::Reveal {
                revealed_indices,
                revealed_salt,
            } => {
                msg!("Instruction: Reveal");
                Self::process_reveal(accounts, revealed_indices, revealed_salt, program_id)
            }
            RaffleInstruction::Withdraw => {
                msg!("Instruction: Withdraw");
                Self::process_withdraw(accounts, program_id)
            }
            RaffleInstruction::TransferRaffleAdministrator { new_administrator } => {
                msg!("Instruction: Transfer Raffle Administrator");
                Self::process_transfer_raffle_administrator(accounts, new_administrator, program_id)
            }
            RaffleInstruction::TransferRegistryAdministrator { new_administrator } => {
                msg!("Instruction: Transfer Registry Administrator");
                Self::process_transfer_registry_administrator(
                    accounts,
                    new_administrator,
                    program_id,
                )
            }
        }
    }

    fn process_create_registry(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let administrator_info = next_account_info(account_info_iter)?;
        let registry_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        check_signer(administrator_info, "Registry administrator")?;

        let (expected_registry, bump_seed) = utils::find_registry_address(program_id);
        if *registry_info.key != expected_registry {
            msg!("Invalid registry account address");
            return Err(ProgramError::InvalidSeeds);
        }
        if registry_info.owner == program_id {
            msg!("Registry account is already initialized");
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        let space = RaffleRegistry::space(0);
        let rent_lamports = Rent::get()?.minimum_balance(space);
        invoke_signed(
            &system_instruction::create_account(
                administrator_info.key,
                registry_info.key,
                rent_lamports,
                space as u64,
                program_id,
            ),
            &[
                administrator_info.clone(),
                registry_info.clone(),
                system_program_info.clone(),
            ],
            &[&[REGISTRY_SEED, &[bump_seed]]],
        )?;

        let registry = RaffleRegistry::new(*administrator_info.key);
        registry.pack_into_slice(&mut registry_info.data.borrow_mut())?;

        msg!("Registry created: Administrator={}", administrator_info.key);
        Ok(())
    }

    fn process_create_raffle(
        accounts: &[AccountInfo],
        slot_count: u64,
        slot_price: u64,
        provenance_commitment: [u8; 32],
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let administrator_info = next_account_info(account_info_iter)?;
        let registry_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        check_signer(administrator_info, "Registry administrator")?;

        let mut registry = load_registry(registry_info, program_id)?;
        registry.ensure_administrator(administrator_info.key)?;

        let index = registry.count();
        let (expected_raffle, bump_seed) =
            utils::find_raffle_address(program_id, registry_info.key, index);
        if *raffle_info.key != expected_raffle {
            msg!("Raffle account must be the registry's next raffle address");
            return Err(ProgramError::InvalidSeeds);
        }

        // The registry is the creating administrator until the role is handed on
        let mut raffle = Raffle::new(
            slot_count,
            slot_price,
            provenance_commitment,
            *registry_info.key,
        )?;

        let rent = Rent::get()?;
        let space = Raffle::space(slot_count);
        let index_bytes = index.to_le_bytes();
        invoke_signed(
            &system_instruction::create_account(
                administrator_info.key,
                raffle_info.key,
                rent.minimum_balance(space),
                space as u64,
                program_id,
            ),
            &[
                administrator_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
            &[&[
                RAFFLE_SEED,
                registry_info.key.as_ref(),
                &index_bytes,
                &[bump_seed],
            ]],
        )?;

        let previous =
            raffle.transfer_administrator(registry_info.key, *administrator_info.key)?;
        raffle.save(&mut raffle_info.data.borrow_mut())?;

        // Grow the registry by one entry, topping up its rent reserve first
        let new_len = RaffleRegistry::space(index + 1);
        let top_up = rent
            .minimum_balance(new_len)
            .saturating_sub(registry_info.lamports());
        if top_up > 0 {
            invoke(
                &system_instruction::transfer(administrator_info.key, registry_info.key, top_up),
                &[
                    administrator_info.clone(),
                    registry_info.clone(),
                    system_program_info.clone(),
                ],
            )?;
        }
        registry_info.realloc(new_len, false)?;
        registry.append(*raffle_info.key);
        registry.pack_into_slice(&mut registry_info.data.borrow_mut())?;

        RaffleEvent::AdministratorTransferred {
            account: *raffle_info.key,
            previous,
            new: *administrator_info.key,
        }
        .emit()?;
        RaffleEvent::RaffleCreated {
            raffle: *raffle_info.key,
        }
        .emit()?;

        msg!(
            "Raffle {} created: Slots={}, Price={}, Index={}",
            raffle_info.key,
            slot_count,
            slot_price,
            index
        );
        Ok(())
    }

    fn process_initialize_raffle(
        accounts: &[AccountInfo],
        slot_count: u64,
        slot_price: u64,
        provenance_commitment: [u8; 32],
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let administrator_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        check_signer(administrator_info, "Raffle administrator")?;
        check_signer(raffle_info, "Raffle account")?;

        let raffle = Raffle::new(
            slot_count,
            slot_price,
            provenance_commitment,
            *administrator_info.key,
        )?;

        let space = Raffle::space(slot_count);
        invoke(
            &system_instruction::create_account(
                administrator_info.key,
                raffle_info.key,
                Rent::get()?.minimum_balance(space),
                space as u64,
                program_id,
            ),
            &[
                administrator_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;
        raffle.save(&mut raffle_info.data.borrow_mut())?;

        msg!(
            "Raffle {} initialized: Slots={}, Price={}",
            raffle_info.key,
            slot_count,
            slot_price
        );
        Ok(())
    }

    fn process_purchase(
        accounts: &[AccountInfo],
        paid_amount: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let buyer_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        check_signer(buyer_info, "Buyer")?;

        let mut raffle = load_raffle(raffle_info, program_id)?;
        let slot_index = raffle.purchase(buyer_info.key, paid_amount)?;

        invoke(
            &system_instruction::transfer(buyer_info.key, raffle_info.key, paid_amount),
            &[
                buyer_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;
        raffle.save(&mut raffle_info.data.borrow_mut())?;

        RaffleEvent::SlotPurchased {
            raffle: *raffle_info.key,
            buyer: *buyer_info.key,
            slot_index,
        }
        .emit()?;

        msg!(
            "Slot {} purchased by {} for {} lamports",
            slot_index,
            buyer_info.key,
            paid_amount
        );
        Ok(())
    }

    fn process_purchase_privileged(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let administrator_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        check_signer(administrator_info, "Raffle administrator")?;

        let mut raffle = load_raffle(raffle_info, program_id)?;
        let slot_index = raffle.purchase_privileged(administrator_info.key)?;
        raffle.save(&mut raffle_info.data.borrow_mut())?;

        RaffleEvent::SlotPurchased {
            raffle: *raffle_info.key,
            buyer: *administrator_info.key,
            slot_index,
        }
        .emit()?;

        msg!("Slot {} taken by the administrator", slot_index);
        Ok(())
    }

    fn process_reveal(
        accounts: &[AccountInfo],
        revealed_indices: Vec<u64>,
        revealed_salt: [u8; 32],
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let administrator_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        check_signer(administrator_info, "Raffle administrator")?;

        let mut raffle = load_raffle(raffle_info, program_id)?;
        let slot_index = raffle.reveal(
            administrator_info.key,
            revealed_indices,
            revealed_salt,
            &ClockSlotEntropy,
        )?;
        raffle.save(&mut raffle_info.data.borrow_mut())?;

        let winner = raffle.winner.ok_or(ProgramError::InvalidAccountData)?;
        RaffleEvent::WinnerSelected {
            raffle: *raffle_info.key,
            winner,
            slot_index,
        }
        .emit()?;

        msg!("Winner selected: Slot={}, Winner={}", slot_index, winner);
        Ok(())
    }

    fn process_withdraw(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let administrator_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        check_signer(administrator_info, "Raffle administrator")?;

        let raffle = load_raffle(raffle_info, program_id)?;
        raffle.ensure_administrator(administrator_info.key)?;

        // The rent reserve keeps the raffle record alive and is never paid out
        let reserve = Rent::get()?.minimum_balance(raffle_info.data_len());
        let amount = raffle_info.lamports().saturating_sub(reserve);

        let raffle_balance = raffle_info
            .lamports()
            .checked_sub(amount)
            .ok_or(ProgramError::InsufficientFunds)?;
        let administrator_balance = administrator_info
            .lamports()
            .checked_add(amount)
            .ok_or(ProgramError::InvalidArgument)?;
        **raffle_info.try_borrow_mut_lamports()? = raffle_balance;
        **administrator_info.try_borrow_mut_lamports()? = administrator_balance;

        RaffleEvent::Withdrawn {
            raffle: *raffle_info.key,
            amount,
        }
        .emit()?;

        msg!("Withdrew {} lamports to {}", amount, administrator_info.key);
        Ok(())
    }

    fn process_transfer_raffle_administrator(
        accounts: &[AccountInfo],
        new_administrator: Pubkey,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let administrator_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        check_signer(administrator_info, "Raffle administrator")?;

        let mut raffle = load_raffle(raffle_info, program_id)?;
        let previous = raffle.transfer_administrator(administrator_info.key, new_administrator)?;
        raffle.save(&mut raffle_info.data.borrow_mut())?;

        RaffleEvent::AdministratorTransferred {
            account: *raffle_info.key,
            previous,
            new: new_administrator,
        }
        .emit()?;

        msg!("Raffle administrator updated to: {}", new_administrator);
        Ok(())
    }

    fn process_transfer_registry_administrator(
        accounts: &[AccountInfo],
        new_administrator: Pubkey,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let administrator_info = next_account_info(account_info_iter)?;
        let registry_info = next_account_info(account_info_iter)?;

        check_signer(administrator_info, "Registry administrator")?;

        let mut registry = load_registry(registry_info, program_id)?;
        let previous =
            registry.transfer_administrator(administrator_info.key, new_administrator)?;
        registry.pack_into_slice(&mut registry_info.data.borrow_mut())?;

        RaffleEvent::AdministratorTransferred {
            account: *registry_info.key,
            previous,
            new: new_administrator,
        }
        .emit()?;

        msg!("Registry administrator updated to: {}", new_administrator);
        Ok(())
    }
}

fn check_signer(account_info: &AccountInfo, role: &str) -> ProgramResult {
    if !account_info.is_signer {
        msg!("{} must sign the transaction", role);
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

fn load_raffle(raffle_info: &AccountInfo, program_id: &Pubkey) -> Result<Raffle, ProgramError> {
    if raffle_info.owner != program_id {
        msg!("Raffle account must be owned by this program");
        return Err(ProgramError::IncorrectProgramId);
    }
    if *raffle_info.key == utils::find_registry_address(program_id).0 {
        msg!("Registry account cannot be used as a raffle");
        return Err(ProgramError::InvalidAccountData);
    }
    let raffle = Raffle::load(&raffle_info.data.borrow())?;
    if !raffle.is_initialized {
        msg!("Raffle account is not initialized");
        return Err(ProgramError::UninitializedAccount);
    }
    Ok(raffle)
}

fn load_registry(
    registry_info: &AccountInfo,
    program_id: &Pubkey,
) -> Result<RaffleRegistry, ProgramError> {
    if registry_info.owner != program_id {
        msg!("Registry account must be owned by this program");
        return Err(ProgramError::IncorrectProgramId);
    }
    if *registry_info.key != utils::find_registry_address(program_id).0 {
        msg!("Invalid registry account address");
        return Err(ProgramError::InvalidSeeds);
    }
    let registry = RaffleRegistry::unpack_from_slice(&registry_info.data.borrow())?;
    if !registry.is_initialized {
        msg!("Registry account is not initialized");
        return Err(ProgramError::UninitializedAccount);
    }
    Ok(registry)
}
