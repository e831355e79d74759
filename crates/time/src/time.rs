//! Utilities for dealing with time (UTC and Unix timestamps).
//!
//! This module provides utilities to get the current Unix time with nanosecond granularity
//! and calendar utilities to convert Unix time into broken-down calendar fields. Since the
//! calendar functions do not rely on libc's mktime and gmtime functions, they are completely
//! thread safe.
//!
//! # Examples
//!
//! ```
//! # use time::time::Tm;
//! let date = Tm::new(1718617807).unwrap();
//! assert_eq!(date, Tm {
//! 	sec: 7,
//! 	min: 50,
//! 	hour: 9,
//! 	day: 17,
//! 	mon: 5,
//! 	year: 2024,
//! 	wday: 1,
//! 	yday: 169,
//! 	isdst: false,
//! 	millis: None
//! });
//! ```

use core::ops::Add;
#[cfg(feature = "now")]
use core::mem::MaybeUninit;
#[cfg(feature = "now")]
use libc::{timespec, clock_gettime, CLOCK_REALTIME};

/// Helper type to support math on [`TimeSpec`]s. Represents seconds.
///
/// # Examples
///
/// ```
/// # use time::time::{Seconds, TimeSpec};
/// // Jan 1, 2025. 12:00:00.123456789 UTC.
/// let c = TimeSpec { sec: 1735732800, nsec: 123456789 };
/// assert_eq!(c + Seconds(10), TimeSpec { sec: c.sec + 10, nsec: c.nsec });
/// ```
#[repr(transparent)]
pub struct Seconds(pub i64);

/// Unix time with nanosecond granularity.
///
/// Supports simple addition with [`Seconds`]. Subtraction is supported by adding negative
/// values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSpec {
	/// Seconds since the Unix epoch
	pub sec: i64,
	/// Nanoseconds since the beginning of `sec`, ranging [0-999999999]
	pub nsec: i64
}

#[cfg_attr(docsrs, doc(cfg(feature = "now")))]
#[cfg(feature = "now")]
impl From<timespec> for TimeSpec {
	/// Convert from `libc::timespec` to [`TimeSpec`] for better math ergonomics
	fn from(value: timespec) -> Self {
		TimeSpec {
			sec: value.tv_sec,
			nsec: value.tv_nsec
		}
	}
}

impl Add<Seconds> for TimeSpec {
	type Output = Self;

	/// Add `rhs` seconds to `self`.
	fn add(mut self, rhs: Seconds) -> Self::Output {
		self.sec += rhs.0;
		self
	}
}

/// Get the current time as a Unix timestamp with nanosecond granularity.
///
/// This function will return `None` if `libc::clock_gettime` fails.
///
/// This function is thread safe.
///
/// # Examples
///
/// ```
/// # use time::time::now;
/// let c = now().expect("Failed to get current time");
/// assert!(c.sec > 0);
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "now")))]
#[cfg(feature = "now")]
pub fn now() -> Option<TimeSpec> {
	let mut time = MaybeUninit::<timespec>::uninit();
	// Safety:
	// - clock_gettime does not read time, only writes
	// - if clock_gettime returns zero, time is successfully initialized
	unsafe {
		match clock_gettime(CLOCK_REALTIME, time.as_mut_ptr()) {
			0 => Some(time.assume_init().into()),
			_ => None
		}
	}
}

/// Check whether a given `year` is a leap year.
///
/// Year must be the absolute Gregorian calendar year (i.e. 2024).
///
/// # Examples
///
/// ```
/// # use time::time::isleapyear;
/// assert_eq!(isleapyear(1900), false);
/// assert_eq!(isleapyear(2000), true);
/// assert_eq!(isleapyear(2020), true);
/// assert_eq!(isleapyear(2023), false);
/// assert_eq!(isleapyear(2024), true);
/// ```
#[inline(always)]
pub fn isleapyear(year: u16) -> bool {
	let l = if year%100 != 0 { 3 } else { 15 };
	(year & l) == 0
}

/// Seconds per minute.
const SECONDS_PER_MINUTE: i64 = 60;
/// Seconds per hour.
const SECONDS_PER_HOUR: i64 = SECONDS_PER_MINUTE * 60;
/// Seconds per day.
const SECONDS_PER_DAY: i64 = SECONDS_PER_HOUR * 24;
/// Days per non-leap year.
const DAYS_PER_NON_LEAP_YEAR: i64 = 365;
/// Days per leap year.
const DAYS_PER_LEAP_YEAR: i64 = DAYS_PER_NON_LEAP_YEAR + 1;
/// Leap years occur every 4 years...
const YEARS_PER_LEAP_YEAR_1: i64 = 4;
/// ... except every 100, unless it's the end of the era.
const YEARS_PER_LEAP_YEAR_2: i64 = 100;
/// Number of years per era.
const YEARS_PER_ERA: i64 = 400;
/// Number of days every 4 years.
const DAYS_PER_LEAP_YEAR_1: i64 = YEARS_PER_LEAP_YEAR_1 * DAYS_PER_NON_LEAP_YEAR;
/// Number of days every 100 years.
const DAYS_PER_LEAP_YEAR_2: i64 = YEARS_PER_LEAP_YEAR_2 * DAYS_PER_NON_LEAP_YEAR
                                + YEARS_PER_LEAP_YEAR_2 / YEARS_PER_LEAP_YEAR_1 - 1;
/// Number of days every era (400 years), excluding the last leap day.
const DAYS_PER_LEAP_YEAR_3: i64 = YEARS_PER_ERA * DAYS_PER_NON_LEAP_YEAR
                                + (YEARS_PER_ERA / YEARS_PER_LEAP_YEAR_2)
                                * (YEARS_PER_LEAP_YEAR_2 / YEARS_PER_LEAP_YEAR_1 - 1);
/// Number of days every era (400 years).
const DAYS_PER_ERA: i64 = DAYS_PER_LEAP_YEAR_3 + 1;
/// Days from January 1 to February 28, inclusive.
const DAYS_FROM_JAN_TO_FEB: i64 = 31 + 28;
/// Days per week.
const DAYS_PER_WEEK: i64 = 7;
/// Days from March 1, 0000 to January 1, 1970.
const DAYS_FROM_JAN_1970_TO_MARCH_0000: i64 = (1970 / YEARS_PER_ERA) * DAYS_PER_ERA
                                            + (1970 % YEARS_PER_ERA) * DAYS_PER_NON_LEAP_YEAR
                                            + (1970 % YEARS_PER_ERA) / YEARS_PER_LEAP_YEAR_1
                                            - (1970 % YEARS_PER_ERA) / YEARS_PER_LEAP_YEAR_2
                                            - DAYS_FROM_JAN_TO_FEB;

/// Broken-down Gregorian calendar time, similar to [`libc::tm`] with some small incompatibilities.
///
/// Key differences:
/// - `year` is the absolute Gregorian calendar year (i.e. 2024), not years since 1900.
/// - `yday` is [0, 365] in `libc::tm` but [1, 366] in [`Tm`].
/// - `isdst` is a plain flag, and `millis` carries optional sub-second resolution.
///
/// `mon` is zero-based ([0, 11]) and `wday` runs [0, 6] with 0 = Sunday, both matching
/// `libc::tm`.
///
/// The formatter in the `pattern` crate borrows a `Tm` for the duration of one format call and
/// never mutates or retains it.
///
/// # Examples
///
/// ```
/// # use time::time::Tm;
/// let date = Tm::new(1718617807).unwrap();
/// assert_eq!(date.year, 2024);
/// assert_eq!(date.mon, 5);       // June
/// assert_eq!(date.day, 17);
/// assert_eq!(date.wday, 1);      // Monday
/// assert_eq!(date.millis, None); // no sub-second resolution
/// ```
#[derive(Clone, Copy)]
#[derive(Debug, PartialEq)]
pub struct Tm {
	/// Seconds, ranged [0, 59]
	pub sec: u8,
	/// Minutes, ranged [0, 59]
	pub min: u8,
	/// Hours, ranged [0, 23]
	pub hour: u8,
	/// Day of the month, ranged [1, 31]
	pub day: u8,
	/// Month of the year, ranged [0, 11]
	pub mon: u8,
	/// Absolute Gregorian calendar year
	pub year: i32,
	/// Day of the week, ranged [0, 6] => [Sunday, Saturday]
	pub wday: u8,
	/// Day of the year, ranged [1, 366]
	pub yday: u16,
	/// Whether daylight savings time is in effect
	pub isdst: bool,
	/// Milliseconds, ranged [0, 999], if the source time carried sub-second resolution
	pub millis: Option<u16>
}

impl Tm {
	/// Convert a Unix timestamp into a UTC calendar date.
	///
	/// This function only supports timestamps on or after the Unix epoch (Jan 1, 1970), i.e.
	/// `unixtimestamp >= 0`. Negative inputs result in `None`. The result has `isdst == false`
	/// and no sub-second resolution.
	pub fn new(unixtimestamp: i64) -> Option<Tm> {
		// The short explanation of this algorithm is that the Gregorian calendar repeats every 400
		// years, with internal repetition every 100 years and again every 4 years (this is how leap
		// years work). Since leap days get added at the end of February if it's a leap year, we rotate
		// the calendar to be Mar-Feb instead of Jan-Dec, which puts the leap day as the last day of the
		// rotated year. With this rotation and working in 400-year chunks, it's fairly straightforward
		// to convert a timestamp to a given date. Finally, you need to "un-rotate" the year back to the
		// real Jan-Dec year. The advantage of this algorithm is that it's branchless on modern CPUs.
		//
		// More details at the links below:
		// http://howardhinnant.github.io/date_algorithms.html#civil_from_days
		// https://github.com/lattera/glibc/blob/master/time/offtime.c#L29
		if unixtimestamp < 0 { return None }
		let days = unixtimestamp / SECONDS_PER_DAY;
		let rem = unixtimestamp % SECONDS_PER_DAY;
		let hr = rem / SECONDS_PER_HOUR;
		let remrem = rem % SECONDS_PER_HOUR;
		let z = days + DAYS_FROM_JAN_1970_TO_MARCH_0000;
		let era = z / DAYS_PER_ERA;
		let doe = z % DAYS_PER_ERA;
		let yoe = (doe
		           - doe / DAYS_PER_LEAP_YEAR_1
		           + doe / DAYS_PER_LEAP_YEAR_2
		           - doe / DAYS_PER_LEAP_YEAR_3
		          ) / DAYS_PER_NON_LEAP_YEAR;
		let y = yoe + era * YEARS_PER_ERA;
		let leap = yoe / YEARS_PER_LEAP_YEAR_1 - yoe / YEARS_PER_LEAP_YEAR_2;
		let pyoe = if yoe == 0 { -4 } else { yoe-1 };
		let leapadj = leap - pyoe / YEARS_PER_LEAP_YEAR_1 + pyoe / YEARS_PER_LEAP_YEAR_2;
		let doy = doe - (DAYS_PER_NON_LEAP_YEAR * yoe + leap);
		// Linear equation that calculates the month from a set day of year
		let mp = (5 * doy + 2) / 153;
		// Linear equation that calculates the day of month from a day of year and month number
		let d = doy - (153 * mp + 2) / 5 + 1;
		// Convert from Mar-Feb year to Jan-Dec year; months come out zero-based
		let rotate = |l, r| if mp < 10 { l } else { r };
		let m = rotate(mp + 2, mp - 10);
		let y = rotate(y, y + 1);
		let yadj = rotate(0, if leapadj == 0 { DAYS_PER_NON_LEAP_YEAR } else { DAYS_PER_LEAP_YEAR });

		Some(Tm {
			sec: (remrem % SECONDS_PER_MINUTE) as u8,
			min: (remrem / SECONDS_PER_MINUTE) as u8,
			hour: hr as u8,
			day: d as u8,
			mon: m as u8,
			year: y as i32,
			wday: ((days + 4) % DAYS_PER_WEEK) as u8, // Jan 1, 1970 was a Thursday
			yday: (doy + leapadj + DAYS_FROM_JAN_TO_FEB - yadj + 1) as u16,
			isdst: false,
			millis: None
		})
	}

	/// Convert a [`TimeSpec`] into a UTC calendar date, carrying sub-second resolution.
	///
	/// Same restrictions as [`Tm::new`], but `millis` is populated from the nanosecond part.
	///
	/// # Examples
	///
	/// ```
	/// # use time::time::{Tm, TimeSpec};
	/// let date = Tm::from_timespec(TimeSpec { sec: 1718617807, nsec: 123456789 }).unwrap();
	/// assert_eq!(date.millis, Some(123));
	/// ```
	pub fn from_timespec(ts: TimeSpec) -> Option<Tm> {
		let mut tm = Tm::new(ts.sec)?;
		tm.millis = Some((ts.nsec / 1000000) as u16);
		Some(tm)
	}

	/// Convert a [`TimeSpec`] into a calendar date at a fixed UTC offset.
	///
	/// `offset` is the raw UTC offset in minutes, excluding any daylight savings adjustment. If
	/// `dst` is set, one further hour is added and the resulting date has `isdst == true`. The
	/// shifted timestamp must still be on or after the Unix epoch, otherwise `None` is returned.
	///
	/// # Examples
	///
	/// ```
	/// # use time::time::{Tm, TimeSpec};
	/// // 09:50 UTC at UTC+9:30 is 19:20 local
	/// let ts = TimeSpec { sec: 1718617807, nsec: 0 };
	/// let date = Tm::localized(ts, 570, false).unwrap();
	/// assert_eq!((date.hour, date.min), (19, 20));
	/// ```
	pub fn localized(ts: TimeSpec, offset: i32, dst: bool) -> Option<Tm> {
		let total = offset + if dst { 60 } else { 0 };
		let shifted = ts + Seconds(total as i64 * 60);
		let mut tm = Tm::from_timespec(shifted)?;
		tm.isdst = dst;
		Some(tm)
	}

	/// Check whether `self` is a leap year.
	#[inline(always)]
	pub fn isleapyear(&self) -> bool {
		isleapyear(self.year as u16)
	}

	/// Get the week of the year, ranged [1, 54].
	///
	/// Weeks start on Sunday and the week containing January 1 is week 1, however few days it has.
	///
	/// # Examples
	///
	/// ```
	/// # use time::time::Tm;
	/// let date = Tm::new(1718617807).unwrap(); // Monday, June 17, 2024
	/// assert_eq!(date.week_of_year(), 25);
	/// ```
	pub fn week_of_year(&self) -> u8 {
		let jan1 = (self.wday as i64 - (self.yday as i64 - 1) % 7).rem_euclid(DAYS_PER_WEEK);
		((self.yday as i64 - 1 + jan1) / DAYS_PER_WEEK + 1) as u8
	}

	/// Get the week of the month, ranged [1, 6].
	///
	/// Weeks start on Sunday and the week containing the first of the month is week 1.
	///
	/// # Examples
	///
	/// ```
	/// # use time::time::Tm;
	/// let date = Tm::new(1718617807).unwrap(); // Monday, June 17, 2024
	/// assert_eq!(date.week_of_month(), 4);
	/// ```
	pub fn week_of_month(&self) -> u8 {
		let first = (self.wday as i64 - (self.day as i64 - 1) % 7).rem_euclid(DAYS_PER_WEEK);
		((self.day as i64 - 1 + first) / DAYS_PER_WEEK + 1) as u8
	}

	/// Get the ordinal of this weekday within the month, ranged [1, 5].
	///
	/// Days 1-7 are ordinal 1, days 8-14 are ordinal 2, and so on, independent of which day the
	/// week starts on.
	///
	/// # Examples
	///
	/// ```
	/// # use time::time::Tm;
	/// let date = Tm::new(1718617807).unwrap(); // the third Monday of June 2024
	/// assert_eq!(date.day_of_week_in_month(), 3);
	/// ```
	pub fn day_of_week_in_month(&self) -> u8 {
		(self.day.saturating_sub(1)) / 7 + 1
	}
}

/// The number of days in a given month.
///
/// `y` must be the absolute Gregorian calendar year, and `m` the 1-indexed month starting at
/// January.
pub fn days_per_month(y: u16, m: u8) -> u8 {
	// Details: https://www.youtube.com/watch?v=J9KijLyP-yg&t=1470s
	if m == 2 {
		if isleapyear(y) { 29 } else { 28 }
	} else {
		30 | (m ^ (m >> 3))
	}
}

/// Get the Unix timestamp for 00:00:00 UTC on a given year, month, and day.
///
/// `y` must be the absolute Gregorian calendar year, `m` the 1-indexed month starting at January,
/// and `d` the day of the month.
///
/// # Examples
///
/// ```
/// # use time::time::timestamp_from_ymd;
/// assert_eq!(timestamp_from_ymd(2024, 2, 28), 1709078400);
/// assert_eq!(timestamp_from_ymd(2024, 2, 29), 1709164800);
/// assert_eq!(timestamp_from_ymd(2024, 3, 1), 1709251200);
/// ```
pub fn timestamp_from_ymd(y: u16, m: u8, d: u8) -> i64 {
	// Algorithm is the inverse of Tm::new, more details:
	// http://howardhinnant.github.io/date_algorithms.html#days_from_civil
	let y = if m < 3 { y as i64 - 1 } else { y as i64 };
	let era = y / YEARS_PER_ERA;
	let yoe = y - era * YEARS_PER_ERA;
	let m2 = if m > 2 { m as i64 - 3 } else { m as i64 + 9 };
	let doy = (153 * m2 + 2) / 5 + d as i64 - 1;
	let doe = yoe * DAYS_PER_NON_LEAP_YEAR
	        + yoe / YEARS_PER_LEAP_YEAR_1
	        - yoe / YEARS_PER_LEAP_YEAR_2
	        + doy;
	SECONDS_PER_DAY * (era * DAYS_PER_ERA + doe - DAYS_FROM_JAN_1970_TO_MARCH_0000)
}
