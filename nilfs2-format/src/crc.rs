//! CRC-32 checksumming, seeded per-filesystem.
//!
//! Uses the same polynomial (CRC-32/ISO-HDLC, the variant the Linux kernel's
//! `crc32_le()` implements) as the on-disk format this toolkit writes.

use crc::{Crc, CRC_32_ISO_HDLC};

const ALGO: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Compute the seeded CRC32 over `data`, the way every on-disk checksum
/// field in this format is computed: a running digest continued from
/// `seed` rather than the algorithm's default initial value. Chaining a
/// checksum across several buffers (the segment data checksum in
/// particular) is just calling this again with the previous result as the
/// new seed.
pub fn crc32_seeded(seed: u32, data: &[u8]) -> u32 {
	let mut digest = ALGO.digest_with_initial(seed);
	digest.update(data);
	digest.finalize()
}

#[cfg(test)]
mod t {
	use super::*;

	#[test]
	fn seed_changes_digest() {
		let data = b"segment summary payload";
		let a = crc32_seeded(0, data);
		let b = crc32_seeded(0x1234_5678, data);
		assert_ne!(a, b);
	}

	#[test]
	fn deterministic() {
		let data = b"some block of bytes";
		assert_eq!(crc32_seeded(42, data), crc32_seeded(42, data));
	}
}
