//! Top-level orchestration: layout → block pool → metadata builders →
//! segment assembler → commit/checksum pass → device writer.

use std::path::PathBuf;

use rand::Rng;

use crate::{
	assembler, builders, commit,
	consts::LABEL_LEN,
	device,
	image::InitialImage,
	layout::{Layout, Options as LayoutOptions},
	Result,
};

/// Parameters for one formatting run, already shape-validated by the CLI
/// layer (power-of-two sizes, percentage range) before reaching here.
#[derive(Debug, Clone)]
pub struct FormatRequest {
	pub device: PathBuf,
	pub block_size: u32,
	pub blocks_per_segment: u64,
	pub reservation_percent: u32,
	pub volume_label: [u8; LABEL_LEN],
	pub ctime: i64,
	/// `-n`: compute and validate everything, but never write to the
	/// device.
	pub dry_run: bool,
}

/// Summary of a successful (or dry-run) format, for the CLI to report.
#[derive(Debug, Clone)]
pub struct FormatReport {
	pub nsegments: u64,
	pub blocks_per_segment: u64,
	pub total_blocks_written: u64,
	pub uuid: [u8; 16],
}

/// Run the full formatting pipeline against `req`.
pub fn format(req: &FormatRequest) -> Result<FormatReport> {
	if !req.dry_run {
		device::check_not_mounted(&req.device)?;
	}

	let device_size = device::query_size(&req.device)?;

	let layout_options = LayoutOptions {
		block_size: req.block_size,
		blocks_per_segment: req.blocks_per_segment,
		reservation_percent: req.reservation_percent,
		ctime: req.ctime,
		volume_label: req.volume_label,
	};
	let layout = Layout::compute(&layout_options, device_size)?;

	let uuid = new_uuid();
	let crc_seed = rand::thread_rng().gen::<u32>();

	let mut image = InitialImage::new(layout, uuid, crc_seed);
	builders::build_all(&mut image)?;
	assembler::assemble(&mut image)?;
	commit::commit(&mut image)?;

	let report = FormatReport {
		nsegments: image.layout.nsegments,
		blocks_per_segment: image.layout.blocks_per_segment,
		total_blocks_written: image.layout.total_blocks,
		uuid: image.uuid,
	};

	device::write_image(&req.device, &image, req.dry_run)?;

	log::info!(
		"formatted {}: {} segments of {} blocks, {} blocks written for the initial image",
		req.device.display(),
		report.nsegments,
		report.blocks_per_segment,
		report.total_blocks_written,
	);

	Ok(report)
}

fn new_uuid() -> [u8; 16] {
	*uuid::Uuid::new_v4().as_bytes()
}

/// Whether `ctime` lies in the future relative to `now`; the CLI layer
/// downgrades this to a warning rather than a fatal error.
pub fn is_future_ctime(ctime: i64, now: i64) -> bool {
	ctime > now
}
