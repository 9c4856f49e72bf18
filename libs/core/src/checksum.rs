/// Computes the additive checksum of the first `count` bytes of `bytes`.
///
/// The result is the sum of `bytes[..count]` truncated to 8 bits (wrapping, not saturating).
/// Every frame carries this value in the byte that follows the summed range, so it has to be
/// recomputed whenever any byte in that range changes.
///
/// # Panics
///
/// Panics if `count` is greater than `bytes.len()`.
///
/// # Examples
///
/// ```
/// use charmatrix_core::checksum;
///
/// assert_eq!(0x06, checksum(&[0x01, 0x02, 0x03, 0xFF], 3));
/// assert_eq!(0x05, checksum(&[0x01, 0x02, 0x03, 0xFF], 4));
/// ```
pub const fn checksum(bytes: &[u8], count: usize) -> u8 {
    assert!(count <= bytes.len(), "checksum range exceeds buffer");

    // Written as a loop rather than a fold so templates can be checked at compile time.
    let mut sum = 0u8;
    let mut i = 0;
    while i < count {
        sum = sum.wrapping_add(bytes[i]);
        i += 1;
    }
    sum
}
