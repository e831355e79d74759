//! Date time fields addressable from a format pattern.
//!
//! Each pattern letter in `GyMdkHmsSEDFwWahKzZYuXL` maps to one [`Field`]. Fields carry a small
//! amount of static metadata ([`FieldInfo`]): a human readable name, the units they measure and
//! range over, and the range of values they can take. The metadata drives both error reporting
//! and the one-based hour substitutions (`k` and `h`).
//!
//! # Examples
//!
//! ```
//! # use pattern::field::Field;
//! assert_eq!(Field::from_letter('M'), Some(Field::Month));
//! assert_eq!(Field::Month.tag(), 2);
//! assert_eq!(Field::from_tag(2), Some(Field::Month));
//! assert_eq!(Field::from_letter('b'), None);
//! ```

/// All pattern letters, in tag order.
pub const PATTERN_LETTERS: &str = "GyMdkHmsSEDFwWahKzZYuXL";

/// A date time field addressable from a format pattern.
///
/// The discriminant of each variant is the field's wire tag, stored in the high byte of a
/// compiled opcode's header unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Field {
	/// `G`: era designator (AD/BC)
	Era = 0,
	/// `y`: calendar year
	Year = 1,
	/// `M`: month in year, formatting context
	Month = 2,
	/// `d`: day of month
	DayOfMonth = 3,
	/// `k`: hour of day, one-based [1, 24]
	HourOfDay1 = 4,
	/// `H`: hour of day, zero-based [0, 23]
	HourOfDay0 = 5,
	/// `m`: minute of hour
	Minute = 6,
	/// `s`: second of minute
	Second = 7,
	/// `S`: millisecond of second
	Millisecond = 8,
	/// `E`: day of week name
	DayOfWeek = 9,
	/// `D`: day of year
	DayOfYear = 10,
	/// `F`: ordinal of this weekday within the month
	DayOfWeekInMonth = 11,
	/// `w`: week of year
	WeekOfYear = 12,
	/// `W`: week of month
	WeekOfMonth = 13,
	/// `a`: AM/PM marker
	AmPm = 14,
	/// `h`: hour within half-day, one-based [1, 12]
	Hour1 = 15,
	/// `K`: hour within half-day, zero-based [0, 11]
	Hour0 = 16,
	/// `z`: time zone name
	ZoneName = 17,
	/// `Z`: time zone offset, RFC 822 style (`+0930`)
	ZoneOffset = 18,
	/// `Y`: week-based year
	WeekYear = 19,
	/// `u`: day of week number, [1 (Monday), 7 (Sunday)]
	IsoDayOfWeek = 20,
	/// `X`: time zone offset, ISO 8601 style (`Z`, `+09`, `+0930`, `+09:30`)
	IsoZone = 21,
	/// `L`: month in year, standalone context
	MonthStandalone = 22
}

/// All fields, indexed by tag.
pub const ALL: [Field; 23] = [
	Field::Era, Field::Year, Field::Month, Field::DayOfMonth, Field::HourOfDay1,
	Field::HourOfDay0, Field::Minute, Field::Second, Field::Millisecond, Field::DayOfWeek,
	Field::DayOfYear, Field::DayOfWeekInMonth, Field::WeekOfYear, Field::WeekOfMonth,
	Field::AmPm, Field::Hour1, Field::Hour0, Field::ZoneName, Field::ZoneOffset,
	Field::WeekYear, Field::IsoDayOfWeek, Field::IsoZone, Field::MonthStandalone
];

impl Field {
	/// Get the field for a pattern letter, or `None` if the letter is not a pattern letter.
	pub fn from_letter(c: char) -> Option<Field> {
		PATTERN_LETTERS.find(c).map(|i| ALL[i])
	}

	/// Get the field for a wire tag, or `None` if the tag is out of range.
	pub fn from_tag(tag: u8) -> Option<Field> {
		ALL.get(tag as usize).copied()
	}

	/// The field's wire tag.
	#[inline(always)]
	pub fn tag(self) -> u8 {
		self as u8
	}

	/// The field's pattern letter.
	pub fn letter(self) -> char {
		// Indexing won't panic because every tag has a letter
		PATTERN_LETTERS.as_bytes()[self as usize] as char
	}

	/// The field's static metadata.
	#[inline(always)]
	pub fn info(self) -> &'static FieldInfo {
		&FIELD_INFO[self as usize]
	}
}

/// Units of time measured by a field, ordered from smallest to largest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
	Millis,
	Seconds,
	Minutes,
	Hours,
	HalfDays,
	Days,
	Weeks,
	Months,
	Years,
	Eras,
	Forever
}

/// The inclusive range of values a field can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueRange {
	pub min: i32,
	pub max: i32
}

impl ValueRange {
	/// Construct a range. `min` must not exceed `max`.
	pub const fn of(min: i32, max: i32) -> ValueRange {
		assert!(min <= max);
		ValueRange { min, max }
	}
}

/// Static metadata for a field.
#[derive(Debug)]
pub struct FieldInfo {
	/// Human readable field name, used in error messages
	pub name: &'static str,
	/// The unit the field measures
	pub base_unit: Unit,
	/// The unit the field repeats over
	pub range_unit: Unit,
	/// The range of values the field can take
	pub range: ValueRange
}

/// Metadata for every field, indexed by tag.
pub static FIELD_INFO: [FieldInfo; 23] = [
	FieldInfo {
		name: "era",
		base_unit: Unit::Eras,
		range_unit: Unit::Forever,
		range: ValueRange::of(0, 1)
	},
	FieldInfo {
		name: "year",
		base_unit: Unit::Years,
		range_unit: Unit::Forever,
		range: ValueRange::of(1, 9999)
	},
	FieldInfo {
		name: "month",
		base_unit: Unit::Months,
		range_unit: Unit::Years,
		range: ValueRange::of(1, 12)
	},
	FieldInfo {
		name: "day of month",
		base_unit: Unit::Days,
		range_unit: Unit::Months,
		range: ValueRange::of(1, 31)
	},
	FieldInfo {
		name: "hour of day (1-24)",
		base_unit: Unit::Hours,
		range_unit: Unit::Days,
		range: ValueRange::of(1, 24)
	},
	FieldInfo {
		name: "hour of day",
		base_unit: Unit::Hours,
		range_unit: Unit::Days,
		range: ValueRange::of(0, 23)
	},
	FieldInfo {
		name: "minute",
		base_unit: Unit::Minutes,
		range_unit: Unit::Hours,
		range: ValueRange::of(0, 59)
	},
	FieldInfo {
		name: "second",
		base_unit: Unit::Seconds,
		range_unit: Unit::Minutes,
		range: ValueRange::of(0, 59)
	},
	FieldInfo {
		name: "millisecond",
		base_unit: Unit::Millis,
		range_unit: Unit::Seconds,
		range: ValueRange::of(0, 999)
	},
	FieldInfo {
		name: "day of week",
		base_unit: Unit::Days,
		range_unit: Unit::Weeks,
		range: ValueRange::of(1, 7)
	},
	FieldInfo {
		name: "day of year",
		base_unit: Unit::Days,
		range_unit: Unit::Years,
		range: ValueRange::of(1, 366)
	},
	FieldInfo {
		name: "day of week in month",
		base_unit: Unit::Weeks,
		range_unit: Unit::Months,
		range: ValueRange::of(1, 5)
	},
	FieldInfo {
		name: "week of year",
		base_unit: Unit::Weeks,
		range_unit: Unit::Years,
		range: ValueRange::of(1, 54)
	},
	FieldInfo {
		name: "week of month",
		base_unit: Unit::Weeks,
		range_unit: Unit::Months,
		range: ValueRange::of(1, 6)
	},
	FieldInfo {
		name: "am/pm",
		base_unit: Unit::HalfDays,
		range_unit: Unit::Days,
		range: ValueRange::of(0, 1)
	},
	FieldInfo {
		name: "hour (1-12)",
		base_unit: Unit::Hours,
		range_unit: Unit::HalfDays,
		range: ValueRange::of(1, 12)
	},
	FieldInfo {
		name: "hour",
		base_unit: Unit::Hours,
		range_unit: Unit::HalfDays,
		range: ValueRange::of(0, 11)
	},
	FieldInfo {
		name: "time zone name",
		base_unit: Unit::Forever,
		range_unit: Unit::Forever,
		range: ValueRange::of(0, 0)
	},
	FieldInfo {
		name: "time zone offset",
		base_unit: Unit::Forever,
		range_unit: Unit::Forever,
		range: ValueRange::of(-1080, 1080)
	},
	FieldInfo {
		name: "week-based year",
		base_unit: Unit::Years,
		range_unit: Unit::Forever,
		range: ValueRange::of(1, 9999)
	},
	FieldInfo {
		name: "day of week number",
		base_unit: Unit::Days,
		range_unit: Unit::Weeks,
		range: ValueRange::of(1, 7)
	},
	FieldInfo {
		name: "ISO time zone offset",
		base_unit: Unit::Forever,
		range_unit: Unit::Forever,
		range: ValueRange::of(-1080, 1080)
	},
	FieldInfo {
		name: "standalone month",
		base_unit: Unit::Months,
		range_unit: Unit::Years,
		range: ValueRange::of(1, 12)
	}
];

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn letter_tag_roundtrip_test() {
		for (i, c) in PATTERN_LETTERS.chars().enumerate() {
			let field = Field::from_letter(c).unwrap();
			assert_eq!(field.tag(), i as u8);
			assert_eq!(field.letter(), c);
			assert_eq!(Field::from_tag(i as u8), Some(field));
		}
		assert_eq!(Field::from_letter('b'), None);
		assert_eq!(Field::from_letter('Q'), None);
		assert_eq!(Field::from_tag(23), None);
		assert_eq!(Field::from_tag(u8::MAX), None);
	}

	#[test]
	fn info_test() {
		assert_eq!(Field::HourOfDay0.info().range, ValueRange::of(0, 23));
		assert_eq!(Field::Hour0.info().range, ValueRange::of(0, 11));
		assert_eq!(Field::Millisecond.info().name, "millisecond");
		assert_eq!(Field::Month.info().base_unit, Unit::Months);
		assert_eq!(Field::Month.info().range_unit, Unit::Years);
	}
}
