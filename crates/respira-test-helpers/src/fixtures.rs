//! Firmware image fixtures

use respira_firmware_update::{FirmwareUpdateError, Slot, SlotStore};

/// Deterministic pseudo-random image content
///
/// Same `len` and `seed` always produce the same bytes, so digests are
/// stable across test runs; different seeds diverge within a few bytes.
pub fn patterned_image(len: usize, seed: u8) -> Vec<u8> {
    let mut state = seed.wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(31).wrapping_add(7);
            state
        })
        .collect()
}

/// Write raw bytes into a slot through the normal atomic path
///
/// # Errors
///
/// Propagates store write failures.
pub async fn seed_slot(
    store: &SlotStore,
    slot: Slot,
    image: &[u8],
) -> Result<u64, FirmwareUpdateError> {
    store.write(slot, &mut &*image).await
}
