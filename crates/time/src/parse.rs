//! Parse date time strings like `YYYY-MM-DD HH:mm:ss.sss`.
//!
//! This module provides a single function, [`parse_timestamp`], which can be used to parse a date
//! time string into a Unix timestamp, represented by [`TimeSpec`].
//!
//! # Examples
//! ```
//! # use time::{parse::parse_timestamp, time::TimeSpec};
//! assert_eq!(
//! 	parse_timestamp(b"2025-02-18T12:30:45Z"),
//! 	Ok(TimeSpec { sec: 1739881845, nsec: 0 })
//! );
//! assert_eq!(
//! 	parse_timestamp(b"2025-02-18T12:30:45+01:00"),
//! 	Ok(TimeSpec { sec: 1739878245, nsec: 0 })
//! );
//! assert_eq!(
//! 	parse_timestamp(b"2025-02-18 12:30:45 -01:00"),
//! 	Ok(TimeSpec { sec: 1739885445, nsec: 0 })
//! );
//! ```
//!
//! See [`parse_timestamp`] for more details on the supported input formats.

use core::{error, fmt};
use crate::time::{days_per_month, timestamp_from_ymd, TimeSpec};

/// Error type for parsing date time strings.
#[derive(Debug, PartialEq)]
pub enum ParseError {
	/// Expected a year, but it was missing or malformed.
	MissingYear,
	/// Expected a month, but it was missing or malformed.
	MissingMonth,
	/// The supplied month was outside of [1, 12].
	MonthOutOfRange,
	/// Expected a day, but it was missing or malformed.
	MissingDay,
	/// The supplied day was outside of [1, 28|29|30|31] depending on the month & year.
	DayOutOfRange,
	/// Expected hours, but it was missing or malformed.
	MissingHours,
	/// The supplied hour was outside of [0, 23].
	HoursOutOfRange,
	/// Hour was supplied but minutes were missing.
	MissingMinutes,
	/// The supplied minutes were outside of [0, 59].
	MinutesOutOfRange,
	/// Expected seconds, but it was missing or malformed.
	MissingSeconds,
	/// The supplied seconds were outside of [0, 59].
	SecondsOutOfRange,
	/// Expected milliseconds, but it was missing or malformed.
	MissingMilliseconds,
	/// Found unexpected bytes after a valid date time string.
	UnexpectedInput
}

impl fmt::Display for ParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let msg = match self {
			ParseError::MissingYear => "Year missing or malformed",
			ParseError::MissingMonth => "Month missing or malformed",
			ParseError::MonthOutOfRange => "Month out of range",
			ParseError::MissingDay => "Day missing or malformed",
			ParseError::DayOutOfRange => "Day out of range",
			ParseError::MissingHours => "Hours missing or malformed",
			ParseError::HoursOutOfRange => "Hours out of range",
			ParseError::MissingMinutes => "Minutes missing or malformed",
			ParseError::MinutesOutOfRange => "Minutes out of range",
			ParseError::MissingSeconds => "Seconds missing or malformed",
			ParseError::SecondsOutOfRange => "Seconds out of range",
			ParseError::MissingMilliseconds => "Milliseconds missing or malformed",
			ParseError::UnexpectedInput => "Unexpected input at end of date time string",
		};
		f.write_str(msg)
	}
}

impl error::Error for ParseError {}

/// Byte cursor over the input string.
///
/// All methods advance past whatever they consume; nothing is consumed on error.
struct Cursor<'a>(&'a [u8]);

impl<'a> Cursor<'a> {
	/// Whether all input has been consumed.
	fn done(&self) -> bool {
		self.0.is_empty()
	}

	/// Consume `sep` if it is the next byte.
	fn accept(&mut self, sep: u8) -> bool {
		match self.0.split_first() {
			Some((&b, rest)) if b == sep => {
				self.0 = rest;
				true
			},
			_ => false
		}
	}

	/// Parse a fixed-length, unsigned integer.
	///
	/// `N` must be less than 5 to ensure the parsed value fits into a u16 with no possible
	/// overflow.
	fn num<const N: usize>(&mut self, e: ParseError) -> Result<u16, ParseError> {
		// Only allow numbers that can safely fit in u16
		const { assert!(N < 5); }

		if self.0.len() < N {
			return Err(e);
		}

		let mut r: u16 = 0;
		for i in 0..N {
			// Indexing won't panic because we checked self.0.len() above
			r = match self.0[i] {
				// Don't need checked math because we can't overflow
				v @ b'0'..=b'9' => r * 10 + (v - b'0') as u16,
				_ => return Err(e)
			};
		}

		self.0 = &self.0[N..];
		Ok(r)
	}

	/// Parse a fixed-length, range-checked integer after a required separator.
	fn field<const N: usize>(
		&mut self,
		sep: u8,
		max: u16,
		missing: ParseError,
		range: ParseError
	) -> Result<u16, ParseError> {
		if !self.accept(sep) {
			return Err(if self.done() { missing } else { ParseError::UnexpectedInput });
		}
		let v = self.num::<N>(missing)?;
		if v > max {
			return Err(range);
		}
		Ok(v)
	}
}

/// Parse the `YYYY[-MM[-DD]]` portion and return the timestamp for midnight UTC of that date.
///
/// Omitted fields default to 1.
fn parse_date(c: &mut Cursor) -> Result<i64, ParseError> {
	let year = c.num::<4>(ParseError::MissingYear)?;
	if c.done() {
		return Ok(timestamp_from_ymd(year, 1, 1));
	}

	let month = c.field::<2>(b'-', 12, ParseError::MissingMonth, ParseError::MonthOutOfRange)?;
	if month == 0 {
		return Err(ParseError::MonthOutOfRange);
	}
	if c.done() {
		return Ok(timestamp_from_ymd(year, month as u8, 1));
	}

	let day = c.field::<2>(
		b'-',
		days_per_month(year, month as u8) as u16,
		ParseError::MissingDay,
		ParseError::DayOutOfRange
	)?;
	if day == 0 {
		return Err(ParseError::DayOutOfRange);
	}
	Ok(timestamp_from_ymd(year, month as u8, day as u8))
}

/// Parse the `HH:mm[:ss[.sss]]` portion, including the leading `T` or space, into a [`TimeSpec`]
/// offset from midnight.
fn parse_time(c: &mut Cursor) -> Result<TimeSpec, ParseError> {
	if !c.accept(b'T') && !c.accept(b' ') {
		return Err(ParseError::UnexpectedInput);
	}
	let hours = c.num::<2>(ParseError::MissingHours)?;
	if hours > 23 {
		return Err(ParseError::HoursOutOfRange);
	}
	let minutes = c.field::<2>(b':', 59, ParseError::MissingMinutes, ParseError::MinutesOutOfRange)?;
	let mut time = TimeSpec {
		sec: hours as i64 * 3600 + minutes as i64 * 60,
		nsec: 0
	};
	if c.done() || !c.accept(b':') {
		return Ok(time);
	}

	let seconds = c.num::<2>(ParseError::MissingSeconds)?;
	if seconds > 59 {
		return Err(ParseError::SecondsOutOfRange);
	}
	time.sec += seconds as i64;
	if c.accept(b'.') {
		time.nsec = c.num::<3>(ParseError::MissingMilliseconds)? as i64 * 1000000;
	}
	Ok(time)
}

/// Parse the trailing timezone designator, `Z` or `±HH:mm`, with an optional leading space.
///
/// Returns the number of seconds to subtract from the timestamp to reach UTC.
fn parse_zone(c: &mut Cursor) -> Result<i64, ParseError> {
	c.accept(b' ');
	if c.accept(b'Z') {
		return if c.done() { Ok(0) } else { Err(ParseError::UnexpectedInput) };
	}

	let neg = if c.accept(b'+') {
		false
	} else if c.accept(b'-') {
		true
	} else {
		return Err(ParseError::UnexpectedInput);
	};
	let hours = c.num::<2>(ParseError::MissingHours)?;
	if hours > 23 {
		return Err(ParseError::HoursOutOfRange);
	}
	if !c.accept(b':') {
		return Err(ParseError::MissingMinutes);
	}
	let minutes = c.num::<2>(ParseError::MissingMinutes)?;
	if minutes > 59 {
		return Err(ParseError::MinutesOutOfRange);
	}

	let offset = hours as i64 * 3600 + minutes as i64 * 60;
	Ok(if neg { -offset } else { offset })
}

/// Parse a date time string into a Unix timestamp.
///
/// This functions parses strings in a format similar to the Javascript date time string format
/// described [here]. The key differences to the Javascript date time string format are:
/// - Extended years are not supported.
/// - When a timezone is omitted, all dates/times are assumed to be UTC.
/// - The special case of 24:00:00 time is not allowed.
/// - The literal `T` may be a space to separate date and time.
/// - A space between the time and timezone is allowed.
///
/// Examples of valid formats:
/// - `YYYY`
/// - `YYYY-MM`
/// - `YYYY-MM-DD`
/// - `YYYY-MM-DDTHH:mm` or `YYYY-MM-DD HH:mm`
/// - `YYYY-MM-DDTHH:mm:ss` or `YYYY-MM-DD HH:mm:ss`
/// - `YYYY-MM-DDTHH:mm:ss.sss` or `YYYY-MM-DD HH:mm:ss.sss`
/// - Each of the prior three bullets followed by `Z`, ` Z`, `+HH:mm`, `-HH:mm`, ` +HH:mm`, or
///   ` -HH:mm`
///
/// [here]: https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Date#date_time_string_format
///
/// # Errors
///
/// Returns [`ParseError`] if the input was malformed or invalid in any way. This includes cases
/// where a valid timestamp was read but additional characters remain in `bytes`.
///
/// # Examples
/// ```
/// # use time::{parse::parse_timestamp, time::TimeSpec};
/// assert_eq!(
/// 	parse_timestamp(b"2025"),
/// 	Ok(TimeSpec { sec: 1735689600, nsec: 0 })
/// );
/// assert_eq!(
/// 	parse_timestamp(b"2025-02-18"),
/// 	Ok(TimeSpec { sec: 1739836800, nsec: 0 })
/// );
/// assert_eq!(
/// 	parse_timestamp(b"2025-02-18 12:30"),
/// 	Ok(TimeSpec { sec: 1739881800, nsec: 0 })
/// );
/// assert_eq!(
/// 	parse_timestamp(b"2025-02-18T12:30:45.123"),
/// 	Ok(TimeSpec { sec: 1739881845, nsec: 123000000 })
/// );
/// ```
pub fn parse_timestamp(bytes: &[u8]) -> Result<TimeSpec, ParseError> {
	let mut c = Cursor(bytes);
	let date = parse_date(&mut c)?;
	if c.done() {
		return Ok(TimeSpec { sec: date, nsec: 0 });
	}

	let time = parse_time(&mut c)?;
	let mut timestamp = TimeSpec {
		sec: date + time.sec,
		nsec: time.nsec
	};
	if c.done() {
		return Ok(timestamp);
	}

	timestamp.sec -= parse_zone(&mut c)?;
	if c.done() {
		Ok(timestamp)
	} else {
		Err(ParseError::UnexpectedInput)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_timestamp_test() {
		// Year only
		assert_eq!(parse_timestamp(b"2025"), Ok(TimeSpec { sec: 1735689600, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025 "), Err(ParseError::UnexpectedInput));

		// Year-Month
		assert_eq!(parse_timestamp(b"2025-"), Err(ParseError::MissingMonth));
		assert_eq!(parse_timestamp(b"2025-2"), Err(ParseError::MissingMonth));
		assert_eq!(parse_timestamp(b"2025-02"), Ok(TimeSpec { sec: 1738368000, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-25"), Err(ParseError::MonthOutOfRange));
		assert_eq!(parse_timestamp(b"2025-00"), Err(ParseError::MonthOutOfRange));

		// Year-Month-Day
		assert_eq!(parse_timestamp(b"2025-02-"), Err(ParseError::MissingDay));
		assert_eq!(parse_timestamp(b"2025-02-1"), Err(ParseError::MissingDay));
		assert_eq!(parse_timestamp(b"2025-02-18"), Ok(TimeSpec { sec: 1739836800, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-29"), Err(ParseError::DayOutOfRange));

		// Date + Hours:Minutes
		assert_eq!(parse_timestamp(b"2025-02-18T"), Err(ParseError::MissingHours));
		assert_eq!(parse_timestamp(b"2025-02-18T12"), Err(ParseError::MissingMinutes));
		assert_eq!(parse_timestamp(b"2025-02-18T12:"), Err(ParseError::MissingMinutes));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30"), Ok(TimeSpec { sec: 1739881800, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18 12:30"), Ok(TimeSpec { sec: 1739881800, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18T24:00"), Err(ParseError::HoursOutOfRange));
		assert_eq!(parse_timestamp(b"2025-02-18T12:60"), Err(ParseError::MinutesOutOfRange));

		// Date + Hours:Minutes:Seconds
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:"), Err(ParseError::MissingSeconds));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45"), Ok(TimeSpec { sec: 1739881845, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18 12:30:45"), Ok(TimeSpec { sec: 1739881845, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:60"), Err(ParseError::SecondsOutOfRange));

		// With milliseconds
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45."), Err(ParseError::MissingMilliseconds));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45.123"), Ok(TimeSpec { sec: 1739881845, nsec: 123000000 }));

		// With timezone
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45Z"), Ok(TimeSpec { sec: 1739881845, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45+01:00"), Ok(TimeSpec { sec: 1739878245, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45-01:00"), Ok(TimeSpec { sec: 1739885445, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18 12:30:45 Z"), Ok(TimeSpec { sec: 1739881845, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18 12:30:45 +01:00"), Ok(TimeSpec { sec: 1739878245, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18 12:30:45 -01:00"), Ok(TimeSpec { sec: 1739885445, nsec: 0 }));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45+24:00"), Err(ParseError::HoursOutOfRange));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45+01:60"), Err(ParseError::MinutesOutOfRange));

		// Invalid formats
		assert_eq!(parse_timestamp(b""), Err(ParseError::MissingYear));
		assert_eq!(parse_timestamp(b"202X-01-01"), Err(ParseError::MissingYear));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45+"), Err(ParseError::MissingHours));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45+01"), Err(ParseError::MissingMinutes));
		assert_eq!(parse_timestamp(b"2025-02-18T12:30:45Zinvalid"), Err(ParseError::UnexpectedInput));
	}
}
