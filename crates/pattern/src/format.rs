//! Interpret compiled programs against a calendar time.
//!
//! [`format`] walks a [`Program`]'s opcode stream once, copying literals through and rendering
//! each field opcode from a borrowed [`Tm`] snapshot plus a [`Context`] describing the locale
//! and time zone. Neither input is mutated, so a single compiled program can be shared freely
//! across threads.
//!
//! # Examples
//!
//! ```
//! # use pattern::compile::compile;
//! # use pattern::format::{format, Context};
//! # use pattern::names::EN;
//! # use time::time::Tm;
//! let program = compile("EEE, d MMM yyyy HH:mm:ss").unwrap();
//! let tm = Tm::new(1718617807).unwrap();
//! let ctx = Context { locale: &EN, offset: 0, zone: "UTC" };
//! assert_eq!(format(&program, &tm, &ctx).unwrap(), "Mon, 17 Jun 2024 09:50:07");
//! ```

use core::{error, fmt};
use core::char::decode_utf16;
use alloc::string::{String, ToString};
use time::time::Tm;
use crate::code::{decode_at, CodeError, Op, Program};
use crate::field::Field;
use crate::names::Locale;

/// Formatting context: everything the interpreter needs beyond the calendar time itself.
pub struct Context<'a> {
	/// Locale for month, weekday, day period, and era names
	pub locale: &'a Locale,
	/// Raw UTC offset in minutes, excluding any daylight savings adjustment
	pub offset: i32,
	/// Time zone name rendered by the `z` field; may be empty
	pub zone: &'a str
}

/// Error type for formatting.
#[derive(Debug, PartialEq)]
pub enum FormatError {
	/// The program uses a field the calendar time cannot supply.
	UnsupportedField(&'static str),
	/// The program stream is malformed.
	Code(CodeError),
	/// A literal run contains an unpaired UTF-16 surrogate.
	InvalidLiteral
}

impl fmt::Display for FormatError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FormatError::UnsupportedField(name) => {
				write!(f, "Unsupported field: {}", name)
			},
			FormatError::Code(e) => write!(f, "Malformed program: {}", e),
			FormatError::InvalidLiteral => write!(f, "Invalid literal in program")
		}
	}
}

impl error::Error for FormatError {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			FormatError::Code(e) => Some(e),
			_ => None
		}
	}
}

impl From<CodeError> for FormatError {
	fn from(value: CodeError) -> Self {
		FormatError::Code(value)
	}
}

/// Render a compiled program against a calendar time.
///
/// # Errors
///
/// Returns [`FormatError`] if the program asks for sub-second resolution the time does not
/// carry, or if the program stream is malformed. Streams from
/// [`compile`](crate::compile::compile) or [`Program::from_units`] are always well formed.
///
/// # Examples
///
/// ```
/// # use pattern::compile::compile;
/// # use pattern::format::{format, Context};
/// # use pattern::names::EN;
/// # use time::time::Tm;
/// let program = compile("yyyy-MM-dd").unwrap();
/// let tm = Tm::new(1718617807).unwrap();
/// let ctx = Context { locale: &EN, offset: 0, zone: "" };
/// assert_eq!(format(&program, &tm, &ctx).unwrap(), "2024-06-17");
/// ```
pub fn format(program: &Program, tm: &Tm, ctx: &Context) -> Result<String, FormatError> {
	let code = program.units();
	let mut out = String::with_capacity(code.len() * 2);
	let mut pos = 0;
	while pos < code.len() {
		let (op, consumed) = decode_at(code, pos)?;
		match op {
			Op::Char(c) => out.push(c),
			Op::Run(units) => {
				for r in decode_utf16(units.iter().copied()) {
					out.push(r.map_err(|_| FormatError::InvalidLiteral)?);
				}
			},
			Op::Field { field, count } => {
				subformat(&mut out, field, count, tm, ctx, program.standalone_month())?;
			}
		}
		pos += consumed;
	}
	Ok(out)
}

/// Render a single field into `out`.
fn subformat(
	out: &mut String,
	field: Field,
	count: usize,
	tm: &Tm,
	ctx: &Context,
	standalone: bool
) -> Result<(), FormatError> {
	let locale = ctx.locale;
	match field {
		Field::Era => out.push_str(locale.era(tm.year >= 0)),
		Field::Year | Field::WeekYear => {
			// Week 1 of the week-based year always contains January 1 here, so the two year
			// fields coincide
			if count == 2 {
				zero_pad(out, tm.year as i64, 2, 2);
			} else {
				zero_pad(out, tm.year as i64, count, NO_CLIP);
			}
		},
		Field::Month | Field::MonthStandalone => {
			let standalone = standalone || field == Field::MonthStandalone;
			match count {
				4.. => out.push_str(locale.month(tm.mon as usize, true, standalone)),
				3 => out.push_str(locale.month(tm.mon as usize, false, standalone)),
				_ => zero_pad(out, tm.mon as i64 + 1, count, NO_CLIP)
			}
		},
		Field::DayOfMonth => zero_pad(out, tm.day as i64, count, NO_CLIP),
		Field::HourOfDay1 => {
			// Midnight is hour 24, one past the zero-based field's maximum
			let hour = match tm.hour {
				0 => Field::HourOfDay0.info().range.max as i64 + 1,
				h => h as i64
			};
			zero_pad(out, hour, count, NO_CLIP);
		},
		Field::HourOfDay0 => zero_pad(out, tm.hour as i64, count, NO_CLIP),
		Field::Minute => zero_pad(out, tm.min as i64, count, NO_CLIP),
		Field::Second => zero_pad(out, tm.sec as i64, count, NO_CLIP),
		Field::Millisecond => match tm.millis {
			Some(ms) => zero_pad(out, ms as i64, count, NO_CLIP),
			None => return Err(FormatError::UnsupportedField(field.info().name))
		},
		Field::DayOfWeek => out.push_str(locale.weekday(tm.wday as usize, count >= 4)),
		Field::DayOfYear => zero_pad(out, tm.yday as i64, count, NO_CLIP),
		Field::DayOfWeekInMonth => zero_pad(out, tm.day_of_week_in_month() as i64, count, NO_CLIP),
		Field::WeekOfYear => zero_pad(out, tm.week_of_year() as i64, count, NO_CLIP),
		Field::WeekOfMonth => zero_pad(out, tm.week_of_month() as i64, count, NO_CLIP),
		Field::AmPm => out.push_str(locale.ampm(tm.hour >= 12)),
		Field::Hour1 => {
			// Noon and midnight are hour 12, one past the zero-based field's maximum
			let hour = match tm.hour % 12 {
				0 => Field::Hour0.info().range.max as i64 + 1,
				h => h as i64
			};
			zero_pad(out, hour, count, NO_CLIP);
		},
		Field::Hour0 => zero_pad(out, (tm.hour % 12) as i64, count, NO_CLIP),
		Field::ZoneName => {
			if ctx.zone.is_empty() {
				rfc822_offset(out, total_offset(tm, ctx));
			} else {
				out.push_str(ctx.zone);
			}
		},
		Field::ZoneOffset => rfc822_offset(out, total_offset(tm, ctx)),
		Field::IsoDayOfWeek => {
			// Monday is 1, Sunday is 7
			let wday = match tm.wday {
				0 => 7,
				w => w as i64
			};
			zero_pad(out, wday, count, NO_CLIP);
		},
		Field::IsoZone => iso_offset(out, total_offset(tm, ctx), count)
	}
	Ok(())
}

/// The effective UTC offset in minutes, including the daylight savings hour.
fn total_offset(tm: &Tm, ctx: &Context) -> i32 {
	ctx.offset + if tm.isdst { 60 } else { 0 }
}

/// Render an offset in RFC 822 style: sign, two hour digits, two minute digits.
fn rfc822_offset(out: &mut String, offset: i32) {
	out.push(if offset < 0 { '-' } else { '+' });
	let minutes = offset.unsigned_abs();
	zero_pad(out, (minutes / 60) as i64, 2, 2);
	zero_pad(out, (minutes % 60) as i64, 2, 2);
}

/// Render an offset in ISO 8601 style.
///
/// A zero offset is the single letter `Z`. Otherwise `count` selects the width: 1 renders
/// hours only, 2 hours and minutes, and 3 hours and minutes with a colon between them.
fn iso_offset(out: &mut String, offset: i32, count: usize) {
	if offset == 0 {
		out.push('Z');
		return;
	}
	out.push(if offset < 0 { '-' } else { '+' });
	let minutes = offset.unsigned_abs();
	zero_pad(out, (minutes / 60) as i64, 2, 2);
	if count >= 2 {
		if count >= 3 {
			out.push(':');
		}
		zero_pad(out, (minutes % 60) as i64, 2, 2);
	}
}

/// Sentinel for [`zero_pad`]'s `max` meaning no clipping.
const NO_CLIP: usize = 20;

/// Render `value` zero-padded to at least `min` digits, clipped to at most `max` digits.
///
/// A negative value gets a leading minus sign that does not count toward the padding. `max`
/// values of [`NO_CLIP`] and above disable clipping.
fn zero_pad(out: &mut String, value: i64, min: usize, max: usize) {
	if value < 0 {
		out.push('-');
	}
	let mut v = value.unsigned_abs();
	if max < NO_CLIP {
		v %= 10u64.pow(max as u32);
	}

	// Fast path for the common one- and two-digit fields
	if min <= 2 && v < 100 {
		if v >= 10 {
			out.push((b'0' + (v / 10) as u8) as char);
		} else if min == 2 {
			out.push('0');
		}
		out.push((b'0' + (v % 10) as u8) as char);
		return;
	}

	let digits = v.to_string();
	for _ in digits.len()..min {
		out.push('0');
	}
	out.push_str(&digits);
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::vec::Vec;
	use time::time::{timestamp_from_ymd, TimeSpec};
	use crate::compile::compile;
	use crate::names::{DE, EN, RU};

	fn utc() -> Context<'static> {
		Context { locale: &EN, offset: 0, zone: "" }
	}

	fn run(pattern: &str, tm: &Tm, ctx: &Context) -> String {
		format(&compile(pattern).unwrap(), tm, ctx).unwrap()
	}

	// Monday, June 17, 2024. 09:50:07 UTC.
	fn monday() -> Tm {
		Tm::new(1718617807).unwrap()
	}

	fn at_hour(hour: u8) -> Tm {
		Tm::new(timestamp_from_ymd(2024, 6, 17) + hour as i64 * 3600).unwrap()
	}

	#[test]
	fn date_test() {
		let tm = monday();
		assert_eq!(run("yyyy-MM-dd HH:mm:ss", &tm, &utc()), "2024-06-17 09:50:07");
		assert_eq!(run("d/M/y", &tm, &utc()), "17/6/2024");
		assert_eq!(run("EEE, d MMM yyyy", &tm, &utc()), "Mon, 17 Jun 2024");
		assert_eq!(run("EEEE, MMMM d", &tm, &utc()), "Monday, June 17");
		assert_eq!(run("G y", &tm, &utc()), "AD 2024");
	}

	#[test]
	fn two_digit_year_test() {
		let tm = monday();
		assert_eq!(run("yy", &tm, &utc()), "24");
		assert_eq!(run("YY", &tm, &utc()), "24");
		let tm = Tm::new(timestamp_from_ymd(1996, 3, 1)).unwrap();
		assert_eq!(run("yy", &tm, &utc()), "96");
		let tm = Tm::new(timestamp_from_ymd(2007, 3, 1)).unwrap();
		assert_eq!(run("yy", &tm, &utc()), "07");
		assert_eq!(run("yyyy", &tm, &utc()), "2007");
	}

	#[test]
	fn hour_fields_test() {
		// Midnight: H is 0, k is 24, K is 0, h is 12
		let tm = at_hour(0);
		assert_eq!(run("H k K h a", &tm, &utc()), "0 24 0 12 AM");
		assert_eq!(run("HH kk KK hh", &tm, &utc()), "00 24 00 12");

		// Noon: H is 12, k is 12, K is 0, h is 12
		let tm = at_hour(12);
		assert_eq!(run("H k K h a", &tm, &utc()), "12 12 0 12 PM");

		let tm = at_hour(15);
		assert_eq!(run("H k K h a", &tm, &utc()), "15 15 3 3 PM");
		assert_eq!(run("hh:mm a", &tm, &utc()), "03:00 PM");
	}

	#[test]
	fn millisecond_test() {
		let mut tm = monday();
		assert_eq!(
			format(&compile("ss.SSS").unwrap(), &tm, &utc()),
			Err(FormatError::UnsupportedField("millisecond"))
		);
		tm.millis = Some(7);
		assert_eq!(run("ss.SSS", &tm, &utc()), "07.007");
		assert_eq!(run("S", &tm, &utc()), "7");
	}

	#[test]
	fn calendar_fields_test() {
		let tm = monday();
		assert_eq!(run("D", &tm, &utc()), "169");
		assert_eq!(run("DDD", &tm, &utc()), "169");
		assert_eq!(run("w", &tm, &utc()), "25");
		assert_eq!(run("W", &tm, &utc()), "4");
		assert_eq!(run("F", &tm, &utc()), "3");
		assert_eq!(run("u", &tm, &utc()), "1");

		// Sunday maps to 7 for the ISO day of week
		let tm = Tm::new(timestamp_from_ymd(2024, 6, 16)).unwrap();
		assert_eq!(run("u", &tm, &utc()), "7");
		assert_eq!(run("E", &tm, &utc()), "Sun");
	}

	#[test]
	fn zone_offset_test() {
		let ts = TimeSpec { sec: 1718617807, nsec: 0 };
		// UTC+9:30
		let tm = Tm::localized(ts, 570, false).unwrap();
		let ctx = Context { locale: &EN, offset: 570, zone: "ACST" };
		assert_eq!(run("X", &tm, &ctx), "+09");
		assert_eq!(run("XX", &tm, &ctx), "+0930");
		assert_eq!(run("XXX", &tm, &ctx), "+09:30");
		assert_eq!(run("Z", &tm, &ctx), "+0930");
		assert_eq!(run("z", &tm, &ctx), "ACST");

		// UTC-5:30
		let tm = Tm::localized(ts, -330, false).unwrap();
		let ctx = Context { locale: &EN, offset: -330, zone: "" };
		assert_eq!(run("X", &tm, &ctx), "-05");
		assert_eq!(run("XX", &tm, &ctx), "-0530");
		assert_eq!(run("XXX", &tm, &ctx), "-05:30");
		assert_eq!(run("Z", &tm, &ctx), "-0530");
		// Empty zone name falls back to the numeric offset
		assert_eq!(run("z", &tm, &ctx), "-0530");

		// The daylight savings hour is part of the total offset
		let tm = Tm::localized(ts, -300, true).unwrap();
		let ctx = Context { locale: &EN, offset: -300, zone: "" };
		assert_eq!(run("Z", &tm, &ctx), "-0400");
		assert_eq!(run("XXX", &tm, &ctx), "-04:00");

		// Zero offset
		let tm = monday();
		assert_eq!(run("X", &tm, &utc()), "Z");
		assert_eq!(run("XX", &tm, &utc()), "Z");
		assert_eq!(run("XXX", &tm, &utc()), "Z");
		assert_eq!(run("Z", &tm, &utc()), "+0000");
	}

	#[test]
	fn locale_test() {
		let tm = monday();
		let de = Context { locale: &DE, offset: 0, zone: "" };
		assert_eq!(run("EEEE, d. MMMM yyyy", &tm, &de), "Montag, 17. Juni 2024");
		let ru = Context { locale: &RU, offset: 0, zone: "" };
		assert_eq!(run("d MMMM yyyy", &tm, &ru), "17 июня 2024");
	}

	#[test]
	fn standalone_month_test() {
		let tm = monday();
		let ru = Context { locale: &RU, offset: 0, zone: "" };
		// A lone MMMM uses the nominative form
		assert_eq!(run("MMMM", &tm, &ru), "июнь");
		// Inside a date it takes the genitive
		assert_eq!(run("d MMMM", &tm, &ru), "17 июня");
		// L is always standalone
		assert_eq!(run("d LLLL", &tm, &ru), "17 июнь");
		assert_eq!(run("LL", &tm, &ru), "06");
		// English has no distinct forms
		assert_eq!(run("MMMM", &tm, &utc()), "June");
		assert_eq!(run("LLLL", &tm, &utc()), "June");
	}

	#[test]
	fn literal_test() {
		let tm = monday();
		assert_eq!(run("yyyy-MM-dd'T'HH:mm:ss", &tm, &utc()), "2024-06-17T09:50:07");
		assert_eq!(run("h 'o''clock' a", &at_hour(9), &utc()), "9 o'clock AM");
		let ru = Context { locale: &RU, offset: 0, zone: "" };
		assert_eq!(run("d MMMM yyyy 'г'.", &tm, &ru), "17 июня 2024 г.");
		assert_eq!(run("[HH:mm]", &tm, &utc()), "[09:50]");
	}

	#[test]
	fn zero_pad_test() {
		let mut out = String::new();
		zero_pad(&mut out, 7, 1, NO_CLIP);
		zero_pad(&mut out, 7, 2, NO_CLIP);
		zero_pad(&mut out, 42, 1, NO_CLIP);
		zero_pad(&mut out, 42, 4, NO_CLIP);
		zero_pad(&mut out, 2024, 2, 2);
		zero_pad(&mut out, -5, 2, NO_CLIP);
		assert_eq!(out, "70742004224-05");

		// Make sure extreme inputs cannot panic
		let mut out = String::new();
		zero_pad(&mut out, i64::MIN, 30, NO_CLIP);
		zero_pad(&mut out, i64::MAX, 0, 0);
	}

	#[test]
	fn shared_program_test() {
		use std::sync::Arc;
		use std::thread;

		// A compiled program is immutable and can be formatted from many threads at once
		let program = Arc::new(compile("yyyy-MM-dd HH:mm:ss").unwrap());
		let handles: Vec<_> = (0..4).map(|i| {
			let program = Arc::clone(&program);
			thread::spawn(move || {
				let tm = Tm::new(1718617807 + i * 86400).unwrap();
				let ctx = Context { locale: &EN, offset: 0, zone: "" };
				format(&program, &tm, &ctx).unwrap()
			})
		}).collect();
		let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
		assert_eq!(results[0], "2024-06-17 09:50:07");
		assert_eq!(results[1], "2024-06-18 09:50:07");

		// Compiling independent patterns concurrently must match compiling them sequentially
		let patterns = ["EEE, d MMM yyyy", "h:mm a", "'week' w 'of' yyyy", "HH:mm:ssXXX"];
		let tm = Tm::new(1718617807).unwrap();
		let ctx = Context { locale: &EN, offset: 0, zone: "" };
		let expected: Vec<String> = patterns
			.iter()
			.map(|p| format(&compile(p).unwrap(), &tm, &ctx).unwrap())
			.collect();
		let handles: Vec<_> = patterns
			.iter()
			.copied()
			.map(|p| {
				thread::spawn(move || {
					let tm = Tm::new(1718617807).unwrap();
					let ctx = Context { locale: &EN, offset: 0, zone: "" };
					format(&compile(p).unwrap(), &tm, &ctx).unwrap()
				})
			})
			.collect();
		let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
		assert_eq!(results, expected);
		assert_eq!(results[0], "Mon, 17 Jun 2024");
	}
}
