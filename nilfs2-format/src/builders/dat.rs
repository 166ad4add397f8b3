//! DAT builder: group descriptor and bitmap, reserving VBN 0. The entry
//! blocks themselves are filled in by the assembler as it hands out VBNs.

use crate::{image::InitialImage, Result};

use super::grouped;

pub fn build(image: &mut InitialImage) -> Result<()> {
	let dat = image.layout.dat;
	grouped::write_group_and_bitmap(&mut image.pool, &dat, 1)
}
