use bincode::{Decode, Encode};

/// One group descriptor of a block-grouped file (the inode file and the
/// DAT): the number of free entries in that group's bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct GroupDesc {
	pub nfrees: u32,
}
