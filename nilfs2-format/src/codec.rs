//! Fixed little-endian encoding shared by every on-disk record.
//!
//! Every multi-byte field of this format is little-endian regardless of
//! host byte order, and every record has a byte-exact, non-padded layout —
//! the same discipline the `bincode`-based encode/decode-at-offset pattern
//! in this codebase's ancestry uses, generalized here to a write path as
//! well as a read path.

use bincode::config::{Configuration, Fixint, LittleEndian, NoLimit};

pub const CONFIG: Configuration<LittleEndian, Fixint, NoLimit> = bincode::config::standard()
	.with_fixed_int_encoding()
	.with_little_endian();

/// The on-disk size of a fixed-layout record, computed once from a
/// concrete value rather than hand-counted field by field.
pub fn encoded_len<T: bincode::Encode>(value: &T) -> usize {
	bincode::encode_to_vec(value, CONFIG)
		.expect("fixed-size on-disk record must always encode")
		.len()
}
