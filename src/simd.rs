// Vector-lane helpers shared by the line analyzer and the escape writer.

use std::arch::aarch64::{uint8x16_t, vget_lane_u64, vreinterpret_u64_u8, vreinterpretq_u16_u8, vshrn_n_u16};

/// Narrowing-shift movemask substitute: each lane's boolean result becomes
/// one nibble of the returned 64-bit mask, so counts derived from it are
/// divided by 4.
#[inline]
pub(crate) unsafe fn fat_mask(v: uint8x16_t) -> u64 {
    let shifted = vshrn_n_u16::<4>(vreinterpretq_u16_u8(v));
    vget_lane_u64::<0>(vreinterpret_u64_u8(shifted))
}
