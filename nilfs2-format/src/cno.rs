//! Checkpoint-number and checkpoint-number-range parsing.
//!
//! Grounded in the original `nilfs_parse_cno`/`nilfs_parse_cno_range`
//! grammar: a bound is either a plain unsigned integer or, if it starts
//! with `-`, the sentinel [`CNO_MAX`] — that sentinel is a *successful*
//! parse, distinguishable from [`CnoParseError`], not a failure. See
//! DESIGN.md for why this diverges from the literal C implementation,
//! which happens to treat a sentinel-producing bound as unparseable.

use std::fmt;

use crate::{
	consts::{CNO_MAX, CNO_MIN},
	CheckpointNumber,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnoParseError(String);

impl fmt::Display for CnoParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: invalid checkpoint number", self.0)
	}
}

impl std::error::Error for CnoParseError {}

/// Parse the longest unsigned-integer prefix of `s`, after skipping
/// leading whitespace. A prefix beginning with `-` never parses as a
/// negative number; it parses as the sentinel [`CNO_MAX`] instead,
/// consuming the sign and any digits that follow it.
///
/// Returns `(value, bytes_consumed)`, where `bytes_consumed` counts from
/// the start of `s` (including skipped whitespace), mirroring `strtoull`'s
/// `endptr` convention.
fn parse_uint_prefix(s: &str) -> Option<(CheckpointNumber, usize)> {
	let trimmed = s.trim_start();
	let ws = s.len() - trimmed.len();

	if let Some(rest) = trimmed.strip_prefix('-') {
		let digits: usize = rest.chars().take_while(char::is_ascii_digit).count();
		if digits == 0 {
			return None;
		}
		Some((CNO_MAX, ws + 1 + digits))
	} else {
		let digits: usize = trimmed.chars().take_while(char::is_ascii_digit).count();
		if digits == 0 {
			return None;
		}
		let value: CheckpointNumber = trimmed[..digits].parse().unwrap_or(CNO_MAX);
		Some((value, ws + digits))
	}
}

fn parse_bound(s: &str) -> Result<CheckpointNumber, CnoParseError> {
	match parse_uint_prefix(s) {
		Some((value, consumed)) if consumed == s.len() => Ok(value),
		_ => Err(CnoParseError(s.to_owned())),
	}
}

/// Parse a single checkpoint number, exactly as [`parse_cno_range`] would
/// parse the bare-`N` form.
pub fn parse_cno(s: &str) -> Result<CheckpointNumber, CnoParseError> {
	parse_bound(s)
}

/// Parse a checkpoint-number range: `N`, `..N`, `N..`, or `N..M`.
pub fn parse_cno_range(
	s: &str,
) -> Result<(CheckpointNumber, CheckpointNumber), CnoParseError> {
	if s.is_empty() {
		return Err(CnoParseError(s.to_owned()));
	}

	if let Some(rest) = s.strip_prefix("..") {
		if rest.is_empty() {
			return Err(CnoParseError(s.to_owned()));
		}
		let end = parse_bound(rest)?;
		return Ok((CNO_MIN, end));
	}

	if let Some(dot) = s.find("..") {
		let (head, tail) = (&s[..dot], &s[dot + 2..]);
		let start = parse_bound(head)?;
		if tail.is_empty() {
			return Ok((start, CNO_MAX));
		}
		let end = parse_bound(tail)?;
		return Ok((start, end));
	}

	let cno = parse_bound(s)?;
	Ok((cno, cno))
}

#[cfg(test)]
mod t {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("5", (5, 5))]
	#[case("..9", (CNO_MIN, 9))]
	#[case("3..", (3, CNO_MAX))]
	#[case("3..7", (3, 7))]
	#[case("7..3", (7, 3))]
	fn laws(#[case] input: &str, #[case] expect: (CheckpointNumber, CheckpointNumber)) {
		assert_eq!(parse_cno_range(input).unwrap(), expect);
	}

	#[test]
	fn negative_is_a_sentinel_not_an_error() {
		assert_eq!(parse_cno_range("-5").unwrap(), (CNO_MAX, CNO_MAX));
		assert_eq!(parse_cno("-5").unwrap(), CNO_MAX);
	}

	#[test]
	fn malformed_is_distinguishable_from_max() {
		assert!(parse_cno_range("abc").is_err());
		assert!(parse_cno_range("..").is_err());
		assert!(parse_cno_range("").is_err());
		assert!(parse_cno_range("3..x").is_err());
	}
}
