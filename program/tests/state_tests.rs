use solana_program::{
    decode_error::DecodeError,
    program_error::{PrintProgramError, ProgramError},
    pubkey::Pubkey,
};

use fair_raffle::{
    entropy::FixedEntropy,
    error::RaffleError,
    state::{Raffle, RafflePhase, RaffleRegistry, MAX_SLOT_COUNT},
    utils::{commitment_preimage, compute_commitment},
};

const INDICES: [u64; 10] = [2, 1, 8, 5, 3, 7, 0, 4, 6, 9];
const SLOT_PRICE: u64 = 100_000_000; // 0.1 SOL

fn deadbeef_salt() -> [u8; 32] {
    let mut salt = [0u8; 32];
    salt[28..].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    salt
}

// Ten-slot raffle with the committed sequence above
fn committed_raffle(administrator: Pubkey) -> Raffle {
    let commitment = compute_commitment(&deadbeef_salt(), &INDICES);
    Raffle::new(10, SLOT_PRICE, commitment, administrator).unwrap()
}

fn filled_raffle(administrator: Pubkey, buyer: Pubkey) -> Raffle {
    let mut raffle = committed_raffle(administrator);
    for _ in 0..10 {
        raffle.purchase(&buyer, SLOT_PRICE).unwrap();
    }
    raffle
}

#[test]
fn test_commitment_preimage_layout() {
    let preimage = commitment_preimage(&deadbeef_salt(), &[1, 258]);

    assert_eq!(preimage.len(), 32 + 2 * 32);
    assert_eq!(&preimage[..32], &deadbeef_salt());
    assert!(preimage[32..63].iter().all(|b| *b == 0));
    assert_eq!(preimage[63], 1);
    assert!(preimage[64..94].iter().all(|b| *b == 0));
    assert_eq!(&preimage[94..], &[1, 2]);
}

#[test]
fn test_commitment_depends_on_order_and_salt() {
    let salt = deadbeef_salt();
    let base = compute_commitment(&salt, &INDICES);

    let mut swapped = INDICES;
    swapped.swap(0, 1);
    assert_ne!(base, compute_commitment(&salt, &swapped));

    let mut other_salt = salt;
    other_salt[0] = 1;
    assert_ne!(base, compute_commitment(&other_salt, &INDICES));
}

#[test]
fn test_create_rejects_invalid_parameters() {
    let administrator = Pubkey::new_unique();
    let commitment = compute_commitment(&deadbeef_salt(), &INDICES);

    assert_eq!(
        Raffle::new(1, SLOT_PRICE, commitment, administrator),
        Err(RaffleError::TooFewSlots)
    );
    assert_eq!(
        Raffle::new(0, SLOT_PRICE, commitment, administrator),
        Err(RaffleError::TooFewSlots)
    );
    assert_eq!(
        Raffle::new(10, SLOT_PRICE, [0u8; 32], administrator),
        Err(RaffleError::InvalidCommitment)
    );
    // The commitment is checked before the slot count
    assert_eq!(
        Raffle::new(1, SLOT_PRICE, [0u8; 32], administrator),
        Err(RaffleError::InvalidCommitment)
    );
    assert_eq!(
        Raffle::new(MAX_SLOT_COUNT + 1, SLOT_PRICE, commitment, administrator),
        Err(RaffleError::TooManySlots)
    );
}

#[test]
fn test_create_initial_state() {
    let administrator = Pubkey::new_unique();
    let raffle = committed_raffle(administrator);

    assert!(raffle.is_initialized);
    assert_eq!(raffle.administrator, administrator);
    assert_eq!(raffle.slot_count, 10);
    assert_eq!(raffle.slot_price, SLOT_PRICE);
    assert!(raffle.slots.is_empty());
    assert_eq!(raffle.phase(), RafflePhase::Selling);
    assert!(raffle.has_available_slots());
    assert_eq!(raffle.winner, None);
    assert_eq!(raffle.winning_slot_index, None);
}

#[test]
fn test_purchase_assigns_slots_in_order() {
    let administrator = Pubkey::new_unique();
    let mut raffle = committed_raffle(administrator);
    let buyers: Vec<Pubkey> = (0..10).map(|_| Pubkey::new_unique()).collect();

    for (n, buyer) in buyers.iter().enumerate() {
        assert_eq!(raffle.purchase(buyer, SLOT_PRICE), Ok(n as u64));
        assert_eq!(raffle.slots[n], *buyer);
    }

    assert!(!raffle.has_available_slots());
    assert_eq!(raffle.phase(), RafflePhase::Full);
    assert_eq!(
        raffle.purchase(&Pubkey::new_unique(), SLOT_PRICE),
        Err(RaffleError::NoSlotsAvailable)
    );
    assert_eq!(
        raffle.purchase_privileged(&administrator),
        Err(RaffleError::NoSlotsAvailable)
    );
    assert_eq!(raffle.slots, buyers);
}

#[test]
fn test_purchase_preconditions() {
    let administrator = Pubkey::new_unique();
    let buyer = Pubkey::new_unique();
    let mut raffle = committed_raffle(administrator);

    assert_eq!(
        raffle.purchase(&administrator, SLOT_PRICE),
        Err(RaffleError::OwnerCannotBuyUnprivileged)
    );
    assert_eq!(
        raffle.purchase(&buyer, SLOT_PRICE - 1),
        Err(RaffleError::InsufficientPayment)
    );
    // Overpayment is accepted
    assert_eq!(raffle.purchase(&buyer, SLOT_PRICE * 3), Ok(0));
    assert_eq!(raffle.slots.len(), 1);
}

#[test]
fn test_zero_price_is_privileged_only() {
    let administrator = Pubkey::new_unique();
    let buyer = Pubkey::new_unique();
    let commitment = compute_commitment(&deadbeef_salt(), &INDICES);
    let mut raffle = Raffle::new(10, 0, commitment, administrator).unwrap();

    assert_eq!(
        raffle.purchase(&buyer, 0),
        Err(RaffleError::PrivilegedOnlyPurchase)
    );
    assert_eq!(
        raffle.purchase(&buyer, 1_000_000_000),
        Err(RaffleError::PrivilegedOnlyPurchase)
    );
    assert_eq!(
        raffle.purchase(&administrator, 0),
        Err(RaffleError::PrivilegedOnlyPurchase)
    );
    assert_eq!(raffle.purchase_privileged(&administrator), Ok(0));
    assert_eq!(raffle.slots, vec![administrator]);
}

#[test]
fn test_purchase_privileged_requires_administrator() {
    let administrator = Pubkey::new_unique();
    let mut raffle = committed_raffle(administrator);

    assert_eq!(
        raffle.purchase_privileged(&Pubkey::new_unique()),
        Err(RaffleError::Unauthorized)
    );
    assert_eq!(raffle.purchase_privileged(&administrator), Ok(0));
    assert_eq!(raffle.purchase_privileged(&administrator), Ok(1));
}

#[test]
fn test_reveal_selects_committed_index() {
    let administrator = Pubkey::new_unique();
    let buyer = Pubkey::new_unique();

    for value in [0u64, 10, 1_000, 123_456_789_010] {
        let mut raffle = filled_raffle(administrator, buyer);
        let winning = raffle
            .reveal(
                &administrator,
                INDICES.to_vec(),
                deadbeef_salt(),
                &FixedEntropy(value),
            )
            .unwrap();

        assert_eq!(winning, 2);
        assert_eq!(raffle.winning_slot_index, Some(2));
        assert_eq!(raffle.winner, Some(raffle.slots[2]));
        assert_eq!(raffle.revealed_indices, INDICES.to_vec());
        assert_eq!(raffle.revealed_salt, Some(deadbeef_salt()));
        assert_eq!(raffle.phase(), RafflePhase::WinnerSelected);
    }

    for value in 0..10u64 {
        let mut raffle = filled_raffle(administrator, buyer);
        let winning = raffle
            .reveal(
                &administrator,
                INDICES.to_vec(),
                deadbeef_salt(),
                &FixedEntropy(value),
            )
            .unwrap();
        assert_eq!(winning, INDICES[value as usize]);
    }
}

#[test]
fn test_reveal_winner_is_slot_owner() {
    let administrator = Pubkey::new_unique();
    let mut raffle = committed_raffle(administrator);
    let buyers: Vec<Pubkey> = (0..10).map(|_| Pubkey::new_unique()).collect();
    for buyer in &buyers {
        raffle.purchase(buyer, SLOT_PRICE).unwrap();
    }

    raffle
        .reveal(&administrator, INDICES.to_vec(), deadbeef_salt(), &FixedEntropy(3))
        .unwrap();

    // INDICES[3] == 5
    assert_eq!(raffle.winning_slot_index, Some(5));
    assert_eq!(raffle.winner, Some(buyers[5]));
}

#[test]
fn test_reveal_precondition_order() {
    let administrator = Pubkey::new_unique();
    let buyer = Pubkey::new_unique();
    let salt = deadbeef_salt();
    let entropy = FixedEntropy(0);

    let mut selling = committed_raffle(administrator);
    selling.purchase(&buyer, SLOT_PRICE).unwrap();
    assert_eq!(
        selling.reveal(&buyer, INDICES.to_vec(), salt, &entropy),
        Err(RaffleError::Unauthorized.into())
    );
    assert_eq!(
        selling.reveal(&administrator, INDICES.to_vec(), salt, &entropy),
        Err(RaffleError::SaleOngoing.into())
    );

    let mut full = filled_raffle(administrator, buyer);
    assert_eq!(
        full.reveal(&administrator, INDICES[..9].to_vec(), salt, &entropy),
        Err(RaffleError::ArrayLengthMismatch.into())
    );
    let mut wrong_order = INDICES;
    wrong_order.swap(0, 9);
    assert_eq!(
        full.reveal(&administrator, wrong_order.to_vec(), salt, &entropy),
        Err(RaffleError::InvalidCommitment.into())
    );
    let mut wrong_salt = salt;
    wrong_salt[31] ^= 1;
    assert_eq!(
        full.reveal(&administrator, INDICES.to_vec(), wrong_salt, &entropy),
        Err(RaffleError::InvalidCommitment.into())
    );

    // Failed reveals leave the raffle untouched
    assert_eq!(full, filled_raffle(administrator, buyer));
}

#[test]
fn test_reveal_is_one_shot() {
    let administrator = Pubkey::new_unique();
    let buyer = Pubkey::new_unique();
    let mut raffle = filled_raffle(administrator, buyer);

    raffle
        .reveal(&administrator, INDICES.to_vec(), deadbeef_salt(), &FixedEntropy(4))
        .unwrap();
    let revealed = raffle.clone();

    assert_eq!(
        raffle.reveal(&administrator, INDICES.to_vec(), deadbeef_salt(), &FixedEntropy(5)),
        Err(RaffleError::WinnerAlreadyPicked.into())
    );
    assert_eq!(raffle, revealed);
}

#[test]
fn test_reveal_rejects_out_of_range_committed_index() {
    let administrator = Pubkey::new_unique();
    let buyer = Pubkey::new_unique();
    let salt = deadbeef_salt();
    let indices = vec![0, 7];
    let commitment = compute_commitment(&salt, &indices);
    let mut raffle = Raffle::new(2, SLOT_PRICE, commitment, administrator).unwrap();
    raffle.purchase(&buyer, SLOT_PRICE).unwrap();
    raffle.purchase(&buyer, SLOT_PRICE).unwrap();

    assert_eq!(
        raffle.reveal(&administrator, indices.clone(), salt, &FixedEntropy(1)),
        Err(RaffleError::IndexOutOfBounds.into())
    );
    assert_eq!(raffle.winner, None);

    assert_eq!(
        raffle.reveal(&administrator, indices, salt, &FixedEntropy(2)),
        Ok(0)
    );
}

#[test]
fn test_transfer_administrator() {
    let administrator = Pubkey::new_unique();
    let successor = Pubkey::new_unique();
    let mut raffle = committed_raffle(administrator);

    assert_eq!(
        raffle.transfer_administrator(&successor, successor),
        Err(RaffleError::Unauthorized)
    );
    assert_eq!(
        raffle.transfer_administrator(&administrator, successor),
        Ok(administrator)
    );
    assert_eq!(raffle.administrator, successor);
    assert_eq!(
        raffle.purchase_privileged(&administrator),
        Err(RaffleError::Unauthorized)
    );
    // The former administrator may now buy like anyone else
    assert_eq!(raffle.purchase(&administrator, SLOT_PRICE), Ok(0));
}

#[test]
fn test_raffle_account_round_trip_at_full_size() {
    let administrator = Pubkey::new_unique();
    let buyer = Pubkey::new_unique();
    let mut raffle = filled_raffle(administrator, buyer);
    raffle
        .reveal(&administrator, INDICES.to_vec(), deadbeef_salt(), &FixedEntropy(7))
        .unwrap();

    let mut data = vec![0u8; Raffle::space(10)];
    raffle.save(&mut data).unwrap();
    assert_eq!(Raffle::load(&data).unwrap(), raffle);

    let mut too_small = vec![0u8; Raffle::space(10) - 1];
    assert_eq!(
        raffle.save(&mut too_small),
        Err(ProgramError::AccountDataTooSmall)
    );
}

#[test]
fn test_registry_pack_and_append() {
    let administrator = Pubkey::new_unique();
    let mut registry = RaffleRegistry::new(administrator);
    assert_eq!(registry.count(), 0);

    let first = Pubkey::new_unique();
    let second = Pubkey::new_unique();
    assert_eq!(registry.append(first), 0);
    assert_eq!(registry.append(second), 1);
    assert_eq!(registry.count(), 2);

    let mut data = vec![0u8; RaffleRegistry::space(2)];
    registry.pack_into_slice(&mut data).unwrap();
    let unpacked = RaffleRegistry::unpack_from_slice(&data).unwrap();
    assert_eq!(unpacked, registry);
    assert_eq!(unpacked.raffles, vec![first, second]);

    assert_eq!(
        registry.pack_into_slice(&mut vec![0u8; RaffleRegistry::space(1)]),
        Err(ProgramError::AccountDataTooSmall)
    );
}

#[test]
fn test_registry_administrator() {
    let administrator = Pubkey::new_unique();
    let outsider = Pubkey::new_unique();
    let mut registry = RaffleRegistry::new(administrator);

    assert_eq!(
        registry.ensure_administrator(&outsider),
        Err(RaffleError::Unauthorized)
    );
    assert_eq!(
        registry.transfer_administrator(&outsider, outsider),
        Err(RaffleError::Unauthorized)
    );
    assert_eq!(
        registry.transfer_administrator(&administrator, outsider),
        Ok(administrator)
    );
    assert!(registry.ensure_administrator(&outsider).is_ok());
}

fn assert_printable<E: PrintProgramError>(_error: &E) {}

#[test]
fn test_error_codes_and_printing() {
    assert_eq!(
        ProgramError::from(RaffleError::NoSlotsAvailable),
        ProgramError::Custom(0)
    );
    assert_eq!(
        ProgramError::from(RaffleError::Unauthorized),
        ProgramError::Custom(10)
    );
    assert_eq!(
        ProgramError::from(RaffleError::TooManySlots),
        ProgramError::Custom(11)
    );

    assert_printable(&RaffleError::SaleOngoing);
    assert_eq!(RaffleError::SaleOngoing.to_string(), "Sale is still ongoing");
    assert_eq!(
        <RaffleError as DecodeError<RaffleError>>::type_of(),
        "Raffle Error"
    );
}
