// Commitment hashing and address derivation helpers
use solana_program::{keccak, pubkey::Pubkey};

/// Seed of the registry PDA
pub const REGISTRY_SEED: &[u8] = b"registry";
/// Seed prefix of registry-created raffle PDAs
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Width of one packed index in the commitment preimage
pub const PACKED_INDEX_LEN: usize = 32;

/// Build the commitment preimage: the salt followed by every index as a
/// 32-byte big-endian unsigned integer (EVM `abi.encodePacked(bytes32, uint256[])`).
pub fn commitment_preimage(salt: &[u8; 32], indices: &[u64]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(salt.len() + indices.len() * PACKED_INDEX_LEN);
    buf.extend_from_slice(salt);
    for index in indices {
        let mut word = [0u8; PACKED_INDEX_LEN];
        word[PACKED_INDEX_LEN - 8..].copy_from_slice(&index.to_be_bytes());
        buf.extend_from_slice(&word);
    }
    buf
}

/// Keccak-256 of the commitment preimage
pub fn compute_commitment(salt: &[u8; 32], indices: &[u64]) -> [u8; 32] {
    keccak::hash(&commitment_preimage(salt, indices)).to_bytes()
}

/// Find the program derived address of the registry
pub fn find_registry_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REGISTRY_SEED], program_id)
}

/// Find the program derived address of the raffle created at `index` by a registry
pub fn find_raffle_address(program_id: &Pubkey, registry: &Pubkey, index: u64) -> (Pubkey, u8) {
    let index_bytes = index.to_le_bytes();
    Pubkey::find_program_address(&[RAFFLE_SEED, registry.as_ref(), &index_bytes], program_id)
}
