// Raffle and registry account state
use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    program_error::ProgramError,
    program_pack::IsInitialized,
    pubkey::{Pubkey, PUBKEY_BYTES},
};

use crate::{entropy::EntropySource, error::RaffleError, utils};

/// Smallest number of slots a raffle can be created with
pub const MIN_SLOT_COUNT: u64 = 2;
/// Largest number of slots; the reveal instruction has to carry every
/// committed index inside a single transaction
pub const MAX_SLOT_COUNT: u64 = 100;

/// Phase of a raffle, derived from the sold slots and the winner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RafflePhase {
    /// Slots are still for sale
    Selling,
    /// Every slot is sold, waiting for the reveal
    Full,
    /// The reveal succeeded; terminal
    WinnerSelected,
}

/// Raffle account data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct Raffle {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Holder of privileged purchase, reveal and withdrawal rights
    pub administrator: Pubkey,
    /// Number of slots, fixed at creation
    pub slot_count: u64,
    /// Price of one slot in lamports; zero disables unprivileged purchase
    pub slot_price: u64,
    /// keccak256(salt ++ indices), published before any sale
    pub provenance_commitment: [u8; 32],
    /// Buyers in purchase order; the position is the slot index
    pub slots: Vec<Pubkey>,
    /// Committed index sequence, set by the reveal
    pub revealed_indices: Vec<u64>,
    /// Committed salt, set by the reveal
    pub revealed_salt: Option<[u8; 32]>,
    /// Slot chosen by the reveal
    pub winning_slot_index: Option<u64>,
    /// Buyer of the winning slot
    pub winner: Option<Pubkey>,
}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Raffle {
    /// Validate creation parameters and build a raffle in the `Selling` phase
    pub fn new(
        slot_count: u64,
        slot_price: u64,
        provenance_commitment: [u8; 32],
        administrator: Pubkey,
    ) -> Result<Self, RaffleError> {
        if provenance_commitment == [0u8; 32] {
            return Err(RaffleError::InvalidCommitment);
        }
        if slot_count < MIN_SLOT_COUNT {
            return Err(RaffleError::TooFewSlots);
        }
        if slot_count > MAX_SLOT_COUNT {
            return Err(RaffleError::TooManySlots);
        }

        Ok(Self {
            is_initialized: true,
            administrator,
            slot_count,
            slot_price,
            provenance_commitment,
            slots: Vec::with_capacity(slot_count as usize),
            revealed_indices: Vec::new(),
            revealed_salt: None,
            winning_slot_index: None,
            winner: None,
        })
    }

    /// Account size needed to hold a fully revealed raffle of `slot_count` slots
    pub fn space(slot_count: u64) -> usize {
        let n = slot_count as usize;
        1 + PUBKEY_BYTES
            + 8
            + 8
            + 32
            + (4 + n * PUBKEY_BYTES)
            + (4 + n * 8)
            + (1 + 32)
            + (1 + 8)
            + (1 + PUBKEY_BYTES)
    }

    /// Decode from account data; trailing unused bytes are ignored
    pub fn load(data: &[u8]) -> Result<Self, ProgramError> {
        let mut buf = data;
        Self::deserialize(&mut buf).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Encode into account data
    pub fn save(&self, data: &mut [u8]) -> Result<(), ProgramError> {
        let mut buf = data;
        self.serialize(&mut buf)
            .map_err(|_| ProgramError::AccountDataTooSmall)
    }

    pub fn phase(&self) -> RafflePhase {
        if self.winner.is_some() {
            RafflePhase::WinnerSelected
        } else if self.has_available_slots() {
            RafflePhase::Selling
        } else {
            RafflePhase::Full
        }
    }

    pub fn has_available_slots(&self) -> bool {
        (self.slots.len() as u64) < self.slot_count
    }

    pub fn ensure_administrator(&self, caller: &Pubkey) -> Result<(), RaffleError> {
        if self.administrator != *caller {
            return Err(RaffleError::Unauthorized);
        }
        Ok(())
    }

    /// Hand the administrator role to `new_administrator`, returning the previous holder
    pub fn transfer_administrator(
        &mut self,
        caller: &Pubkey,
        new_administrator: Pubkey,
    ) -> Result<Pubkey, RaffleError> {
        self.ensure_administrator(caller)?;
        Ok(std::mem::replace(&mut self.administrator, new_administrator))
    }

    /// Unprivileged purchase. Overpayment is kept by the raffle, not refunded.
    pub fn purchase(&mut self, buyer: &Pubkey, paid_amount: u64) -> Result<u64, RaffleError> {
        if self.slot_price == 0 {
            return Err(RaffleError::PrivilegedOnlyPurchase);
        }
        if self.administrator == *buyer {
            return Err(RaffleError::OwnerCannotBuyUnprivileged);
        }
        if paid_amount < self.slot_price {
            return Err(RaffleError::InsufficientPayment);
        }
        self.append_slot(buyer)
    }

    /// Administrator purchase, free of charge
    pub fn purchase_privileged(&mut self, caller: &Pubkey) -> Result<u64, RaffleError> {
        self.ensure_administrator(caller)?;
        self.append_slot(caller)
    }

    fn append_slot(&mut self, buyer: &Pubkey) -> Result<u64, RaffleError> {
        if !self.has_available_slots() {
            return Err(RaffleError::NoSlotsAvailable);
        }
        let slot_index = self.slots.len() as u64;
        self.slots.push(*buyer);
        Ok(slot_index)
    }

    /// Verify the revealed sequence against the commitment and select the
    /// winning slot as `revealed_indices[entropy % slot_count]`.
    ///
    /// Checks run in a fixed order: caller, sale complete, no prior winner,
    /// sequence length, commitment. Returns the winning slot index.
    pub fn reveal<E: EntropySource>(
        &mut self,
        caller: &Pubkey,
        revealed_indices: Vec<u64>,
        revealed_salt: [u8; 32],
        entropy: &E,
    ) -> Result<u64, ProgramError> {
        self.ensure_administrator(caller)?;
        if self.has_available_slots() {
            return Err(RaffleError::SaleOngoing.into());
        }
        if self.winner.is_some() {
            return Err(RaffleError::WinnerAlreadyPicked.into());
        }
        if revealed_indices.len() as u64 != self.slot_count {
            return Err(RaffleError::ArrayLengthMismatch.into());
        }
        if utils::compute_commitment(&revealed_salt, &revealed_indices)
            != self.provenance_commitment
        {
            return Err(RaffleError::InvalidCommitment.into());
        }

        let value = entropy.current_value()?;
        let pick = (value % self.slot_count) as usize;
        let winning_slot_index = *revealed_indices
            .get(pick)
            .ok_or(RaffleError::IndexOutOfBounds)?;
        // Only reachable when the committed sequence itself holds an index >= slot_count
        if winning_slot_index >= self.slot_count {
            return Err(RaffleError::IndexOutOfBounds.into());
        }
        let winner = *self
            .slots
            .get(winning_slot_index as usize)
            .ok_or(RaffleError::IndexOutOfBounds)?;

        self.revealed_indices = revealed_indices;
        self.revealed_salt = Some(revealed_salt);
        self.winning_slot_index = Some(winning_slot_index);
        self.winner = Some(winner);

        Ok(winning_slot_index)
    }
}

/// Registry account data: a fixed header followed by an append-only list
/// of raffle addresses
#[derive(Clone, Debug, PartialEq)]
pub struct RaffleRegistry {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Only this key may create raffles through the registry
    pub administrator: Pubkey,
    /// Created raffles in creation order
    pub raffles: Vec<Pubkey>,
}

impl IsInitialized for RaffleRegistry {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl RaffleRegistry {
    pub const HEADER_LEN: usize = 1 + 32 + 8;

    pub fn new(administrator: Pubkey) -> Self {
        Self {
            is_initialized: true,
            administrator,
            raffles: Vec::new(),
        }
    }

    /// Account size for a registry listing `count` raffles
    pub fn space(count: u64) -> usize {
        Self::HEADER_LEN + count as usize * PUBKEY_BYTES
    }

    pub fn count(&self) -> u64 {
        self.raffles.len() as u64
    }

    pub fn ensure_administrator(&self, caller: &Pubkey) -> Result<(), RaffleError> {
        if self.administrator != *caller {
            return Err(RaffleError::Unauthorized);
        }
        Ok(())
    }

    pub fn transfer_administrator(
        &mut self,
        caller: &Pubkey,
        new_administrator: Pubkey,
    ) -> Result<Pubkey, RaffleError> {
        self.ensure_administrator(caller)?;
        Ok(std::mem::replace(&mut self.administrator, new_administrator))
    }

    /// Record a created raffle, returning its position in the registry
    pub fn append(&mut self, raffle: Pubkey) -> u64 {
        self.raffles.push(raffle);
        self.count() - 1
    }

    pub fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        if src.len() < Self::HEADER_LEN {
            return Err(ProgramError::AccountDataTooSmall);
        }
        let header = array_ref![src, 0, RaffleRegistry::HEADER_LEN];
        let (is_initialized, administrator, count) = array_refs![header, 1, 32, 8];

        let count = u64::from_le_bytes(*count);
        let is_initialized = match is_initialized[0] {
            0 => false,
            1 => true,
            _ => return Err(ProgramError::InvalidAccountData),
        };
        if src.len() < Self::space(count) {
            return Err(ProgramError::InvalidAccountData);
        }

        let raffles = src[Self::HEADER_LEN..Self::space(count)]
            .chunks_exact(PUBKEY_BYTES)
            .map(|chunk| Pubkey::new_from_array(*array_ref![chunk, 0, 32]))
            .collect();

        Ok(Self {
            is_initialized,
            administrator: Pubkey::new_from_array(*administrator),
            raffles,
        })
    }

    pub fn pack_into_slice(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        if dst.len() < Self::space(self.count()) {
            return Err(ProgramError::AccountDataTooSmall);
        }
        let (header, tail) = dst.split_at_mut(Self::HEADER_LEN);
        let header = array_mut_ref![header, 0, RaffleRegistry::HEADER_LEN];
        let (is_initialized_dst, administrator_dst, count_dst) =
            mut_array_refs![header, 1, 32, 8];

        is_initialized_dst[0] = self.is_initialized as u8;
        administrator_dst.copy_from_slice(self.administrator.as_ref());
        *count_dst = self.count().to_le_bytes();
        for (chunk, raffle) in tail.chunks_exact_mut(PUBKEY_BYTES).zip(&self.raffles) {
            chunk.copy_from_slice(raffle.as_ref());
        }
        Ok(())
    }
}
