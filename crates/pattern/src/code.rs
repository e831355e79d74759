//! Wire encoding for compiled format programs.
//!
//! A compiled program is a flat sequence of `u16` units. Each opcode starts with a header unit
//! holding an eight bit tag in the high byte and an eight bit length in the low byte. A length
//! byte of 255 is an escape: the real length follows in the next two units, high half first.
//!
//! Three kinds of opcode exist:
//! - Field opcodes (tags [0, 22]): the length is the pattern letter's repeat count. See
//!   [`Field`](crate::field::Field) for the tag assignments.
//! - [`TAG_LITERAL_CHAR`] (tag 100): a single literal character whose code point is stored in the
//!   length slot. Always a single unit for ASCII, but the escape form can carry any code point.
//! - [`TAG_LITERAL_RUN`] (tag 101): the length counts UTF-16 code units that follow the header
//!   verbatim.
//!
//! # Examples
//!
//! ```
//! # use pattern::code::{decode_at, Op};
//! # use pattern::field::Field;
//! // Header unit for `yyyy`: tag 1, length 4
//! let code = [(1 << 8) | 4];
//! assert_eq!(decode_at(&code, 0), Ok((Op::Field { field: Field::Year, count: 4 }, 1)));
//! ```

use core::{error, fmt};
use alloc::vec::Vec;
use crate::field::Field;

/// Tag for a single literal character, stored in the length slot.
pub const TAG_LITERAL_CHAR: u8 = 100;
/// Tag for a run of literal UTF-16 code units following the header.
pub const TAG_LITERAL_RUN: u8 = 101;
/// Length byte value that escapes to a two-unit length.
const LENGTH_ESCAPE: u16 = 255;

/// Error type for malformed program streams.
#[derive(Debug, PartialEq)]
pub enum CodeError {
	/// The stream ended in the middle of an opcode.
	Truncated,
	/// An opcode's tag is not a field tag or literal tag.
	BadOpcode(u8),
	/// A field opcode's repeat count is invalid for that field.
	BadCount(char, usize)
}

impl fmt::Display for CodeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CodeError::Truncated => write!(f, "Program stream is truncated"),
			CodeError::BadOpcode(tag) => write!(f, "Unknown opcode tag {}", tag),
			CodeError::BadCount(letter, count) => {
				write!(f, "Invalid repeat count {} for pattern field '{}'", count, letter)
			}
		}
	}
}

impl error::Error for CodeError {}

/// A single decoded opcode.
///
/// Runs borrow their code units from the program they were decoded from.
#[derive(Debug, PartialEq)]
pub enum Op<'a> {
	/// A date time field with its repeat count
	Field { field: Field, count: usize },
	/// A single literal character
	Char(char),
	/// A run of literal UTF-16 code units
	Run(&'a [u16])
}

/// Append one opcode header (and escaped length, if needed) to `out`.
pub(crate) fn encode(tag: u8, length: usize, out: &mut Vec<u16>) {
	let header = (tag as u16) << 8;
	if length < LENGTH_ESCAPE as usize {
		out.push(header | length as u16);
	} else {
		out.push(header | LENGTH_ESCAPE);
		out.push((length >> 16) as u16);
		out.push(length as u16);
	}
}

/// Decode the opcode starting at `pos`, returning it and the number of units consumed.
///
/// `pos` must be less than `code.len()`.
///
/// # Errors
///
/// Returns [`CodeError`] if the stream ends mid-opcode, the tag is unknown, or a literal
/// character's code point is not a valid `char`.
pub fn decode_at(code: &[u16], pos: usize) -> Result<(Op<'_>, usize), CodeError> {
	let header = *code.get(pos).ok_or(CodeError::Truncated)?;
	let tag = (header >> 8) as u8;
	let mut consumed = 1;
	let length = if header & 0xff == LENGTH_ESCAPE {
		let hi = *code.get(pos + 1).ok_or(CodeError::Truncated)? as usize;
		let lo = *code.get(pos + 2).ok_or(CodeError::Truncated)? as usize;
		consumed = 3;
		(hi << 16) | lo
	} else {
		(header & 0xff) as usize
	};

	match tag {
		TAG_LITERAL_CHAR => {
			let c = u32::try_from(length).ok()
				.and_then(char::from_u32)
				.ok_or(CodeError::BadOpcode(tag))?;
			Ok((Op::Char(c), consumed))
		},
		TAG_LITERAL_RUN => {
			let start = pos + consumed;
			let units = code.get(start..start + length).ok_or(CodeError::Truncated)?;
			Ok((Op::Run(units), consumed + length))
		},
		_ => match Field::from_tag(tag) {
			Some(field) => Ok((Op::Field { field, count: length }, consumed)),
			None => Err(CodeError::BadOpcode(tag))
		}
	}
}

/// A compiled format program: the opcode stream plus the standalone month flag.
///
/// Programs are produced by [`compile`](crate::compile::compile), or reconstituted from raw
/// units with [`Program::from_units`]. The raw units are accessible for storage and transport;
/// [`Program::from_units`] revalidates them and recomputes the flag, so a program in hand is
/// always well formed.
#[derive(Debug, PartialEq)]
pub struct Program {
	code: Vec<u16>,
	standalone_month: bool
}

impl Program {
	/// Construct a program from already-validated parts.
	pub(crate) fn new(code: Vec<u16>, standalone_month: bool) -> Program {
		Program { code, standalone_month }
	}

	/// The raw opcode stream.
	#[inline(always)]
	pub fn units(&self) -> &[u16] {
		&self.code
	}

	/// Consume the program, returning the raw opcode stream.
	pub fn into_units(self) -> Vec<u16> {
		self.code
	}

	/// Whether the program consists of exactly one opcode and that opcode is the month field.
	///
	/// Locales that distinguish a nominative month form use it when the month is rendered on
	/// its own rather than as part of a date.
	#[inline(always)]
	pub fn standalone_month(&self) -> bool {
		self.standalone_month
	}

	/// Reconstitute a program from raw units, validating the stream and recomputing the
	/// standalone month flag.
	///
	/// # Errors
	///
	/// Returns [`CodeError`] if the stream is truncated, contains an unknown tag, or carries a
	/// field with an impossible repeat count: 0 for any field, or over 3 for the ISO zone field.
	///
	/// # Examples
	///
	/// ```
	/// # use pattern::code::{CodeError, Program};
	/// # use pattern::compile::compile;
	/// let p = compile("yyyy-MM-dd").unwrap();
	/// let units = p.into_units();
	/// assert!(Program::from_units(units).is_ok());
	/// assert_eq!(Program::from_units(vec![0xff01]), Err(CodeError::BadOpcode(0xff)));
	/// ```
	pub fn from_units(code: Vec<u16>) -> Result<Program, CodeError> {
		let mut pos = 0;
		let mut ops = 0;
		let mut month_only = false;
		while pos < code.len() {
			let (op, consumed) = decode_at(&code, pos)?;
			if let Op::Field { field, count } = op {
				// A field's repeat count comes from its pattern letter run, so it is at least 1
				if count == 0 || (field == Field::IsoZone && count > 3) {
					return Err(CodeError::BadCount(field.letter(), count));
				}
				month_only = field == Field::Month;
			} else {
				month_only = false;
			}
			ops += 1;
			pos += consumed;
		}
		Ok(Program {
			code,
			standalone_month: ops == 1 && month_only
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::vec;

	#[test]
	fn encode_test() {
		let mut out = Vec::new();
		encode(1, 4, &mut out);
		assert_eq!(out, [(1 << 8) | 4]);

		out.clear();
		encode(TAG_LITERAL_RUN, 300, &mut out);
		assert_eq!(out, [(101 << 8) | 255, 0, 300]);

		out.clear();
		encode(TAG_LITERAL_RUN, 0x12345, &mut out);
		assert_eq!(out, [(101 << 8) | 255, 1, 0x2345]);
	}

	#[test]
	fn decode_test() {
		let code = [(2u16 << 8) | 3, (100 << 8) | b'-' as u16, (101 << 8) | 2, 0x44, 0x45];
		assert_eq!(decode_at(&code, 0), Ok((Op::Field { field: Field::Month, count: 3 }, 1)));
		assert_eq!(decode_at(&code, 1), Ok((Op::Char('-'), 1)));
		assert_eq!(decode_at(&code, 2), Ok((Op::Run(&[0x44, 0x45]), 3)));

		// Escaped length
		let code = [(1u16 << 8) | 255, 0, 300];
		assert_eq!(decode_at(&code, 0), Ok((Op::Field { field: Field::Year, count: 300 }, 3)));

		// Truncated streams
		assert_eq!(decode_at(&[], 0), Err(CodeError::Truncated));
		assert_eq!(decode_at(&[(1u16 << 8) | 255, 0], 0), Err(CodeError::Truncated));
		assert_eq!(decode_at(&[(101u16 << 8) | 2, 0x44], 0), Err(CodeError::Truncated));

		// Unknown tags
		assert_eq!(decode_at(&[23 << 8], 0), Err(CodeError::BadOpcode(23)));
		assert_eq!(decode_at(&[0xff00], 0), Err(CodeError::BadOpcode(0xff)));

		// A literal char carrying a surrogate code point is invalid
		let code = [(100u16 << 8) | 255, 0, 0xd800];
		assert_eq!(decode_at(&code, 0), Err(CodeError::BadOpcode(100)));
	}

	#[test]
	fn from_units_test() {
		// A lone month opcode sets the standalone flag
		let p = Program::from_units(vec![(2 << 8) | 4]).unwrap();
		assert!(p.standalone_month());

		// Anything else does not
		let p = Program::from_units(vec![(2 << 8) | 4, (100 << 8) | b' ' as u16]).unwrap();
		assert!(!p.standalone_month());
		let p = Program::from_units(vec![(1 << 8) | 4]).unwrap();
		assert!(!p.standalone_month());
		let p = Program::from_units(vec![]).unwrap();
		assert!(!p.standalone_month());

		// Corrupt streams are rejected
		assert_eq!(Program::from_units(vec![(1 << 8) | 255]), Err(CodeError::Truncated));
		assert_eq!(Program::from_units(vec![(101 << 8) | 5, 1, 2]), Err(CodeError::Truncated));
		assert_eq!(Program::from_units(vec![(50 << 8) | 1]), Err(CodeError::BadOpcode(50)));
		assert_eq!(
			Program::from_units(vec![(21 << 8) | 4]),
			Err(CodeError::BadCount('X', 4))
		);
	}

	#[test]
	fn from_units_zero_count_test() {
		// A field with repeat count 0 cannot come from a pattern letter run; in particular a
		// lone zero-count month must not select the standalone name path
		assert_eq!(Program::from_units(vec![2 << 8]), Err(CodeError::BadCount('M', 0)));
		assert_eq!(Program::from_units(vec![1 << 8]), Err(CodeError::BadCount('y', 0)));
		assert_eq!(
			Program::from_units(vec![(3 << 8) | 2, 21 << 8]),
			Err(CodeError::BadCount('X', 0))
		);

		// Zero-length literals are still fine
		assert!(Program::from_units(vec![(101 << 8) | 0]).is_ok());
	}
}
