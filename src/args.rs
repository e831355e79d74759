//! Support for command line argument parsing.
//!
//! See [crate] documentation for details on command line arguments and examples.

use std::error::Error;
use std::ffi::OsString;
use std::fmt::{Display, Debug};
use pattern::names::{self, Locale};
use time::{parse_timestamp, ParseError, TimeSpec};

/// The error type for parsing command line arguments.
#[cfg_attr(test, derive(PartialEq))]
pub enum ArgumentsError {
	/// The option was unrecognized. The option is returned as the payload of this variant.
	UnrecognizedOption(String),
	/// Error converting an option or parameter to UTF-8. The argument index and original
	/// [`OsString`] that could not be converted are returned as the payload of this variant.
	InvalidUTF8(usize, OsString),
	/// The required format pattern was missing.
	MissingPattern,
	/// More than one format pattern was supplied. The extra argument is returned as the payload
	/// of this variant.
	UnexpectedArgument(String),
	/// The parameter for an option was not supplied. The option is returned as the payload for
	/// this variant.
	MissingParameter(String),
	/// The provided locale is not known. The supplied locale tag is returned as the payload of
	/// this variant.
	UnknownLocale(String),
	/// The provided UTC offset was malformed or out of range. The supplied offset argument is
	/// returned as the payload of this variant.
	InvalidOffset(String),
	/// An error occured while parsing the provided date time string. The underlying parse error
	/// is returned as the payload for this variant.
	DateTimeParseError(ParseError),
	/// Help option (-h) was included, so print help details and exit.
	Help
}

impl Display for ArgumentsError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ArgumentsError::UnrecognizedOption(s) => write!(f, "Unrecognized option: {}", s),
			ArgumentsError::InvalidUTF8(i, v) => write!(f, "Invalid UTF-8 in argument {}: {:?}", i, v),
			ArgumentsError::MissingPattern => write!(f, "Missing format pattern"),
			ArgumentsError::UnexpectedArgument(s) => write!(f, "Unexpected argument: {}", s),
			ArgumentsError::MissingParameter(s) => write!(f, "Missing parameter for option {}", s),
			ArgumentsError::UnknownLocale(s) => write!(f, "Unknown locale: {}", s),
			ArgumentsError::InvalidOffset(s) => write!(f, "Invalid UTC offset: {}", s),
			ArgumentsError::DateTimeParseError(e) => write!(f, "Datetime parsing error: {}", e),
			ArgumentsError::Help => write!(f, "Help requested")
		}
	}
}

impl Debug for ArgumentsError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		Display::fmt(self, f)
	}
}

impl Error for ArgumentsError {}

/// Convert an argument to [`&str`].
///
/// The function takes the argument index `i`, optional argument name `a`, and the argument `s`.
///
/// # Errors
///
/// Returns [`ArgumentsError::InvalidUTF8`] if the argument could not be converted to UTF-8 or
/// [`ArgumentsError::MissingParameter`] if the argument is `None`.
fn arg_to_str<'a, 'b>(i: usize, a: Option<&'a str>, s: Option<&'b OsString>)
	-> Result<&'b str, ArgumentsError>
{
	match s {
		Some(v) => v.to_str().ok_or_else(|| ArgumentsError::InvalidUTF8(i, v.clone())),
		None => Err(ArgumentsError::MissingParameter(a.map(String::from).unwrap_or_default()))
	}
}

/// Parse a UTC offset: `±HH:MM`, `HH:MM`, or a plain signed number of minutes.
///
/// Offsets beyond ±18:00 are rejected.
fn parse_offset(s: &str) -> Result<i32, ArgumentsError> {
	let err = || ArgumentsError::InvalidOffset(s.to_string());
	let (neg, rest) = match s.strip_prefix('-') {
		Some(r) => (true, r),
		None => (false, s.strip_prefix('+').unwrap_or(s))
	};
	let minutes = match rest.split_once(':') {
		Some((h, m)) => {
			let h: i32 = h.parse().map_err(|_| err())?;
			let m: i32 = m.parse().map_err(|_| err())?;
			if h < 0 || m < 0 || m > 59 {
				return Err(err());
			}
			h * 60 + m
		},
		None => rest.parse().map_err(|_| err())?
	};
	let minutes = if neg { -minutes } else { minutes };
	if !(-18 * 60..=18 * 60).contains(&minutes) {
		return Err(err());
	}
	Ok(minutes)
}

/// Parse a start time: a date time string, or `@` followed by a Unix timestamp in seconds.
fn parse_time(s: &str) -> Result<TimeSpec, ArgumentsError> {
	if let Some(unix) = s.strip_prefix('@') {
		let sec = unix.parse().map_err(|_| {
			ArgumentsError::DateTimeParseError(ParseError::UnexpectedInput)
		})?;
		return Ok(TimeSpec { sec, nsec: 0 });
	}
	parse_timestamp(s.as_bytes()).map_err(ArgumentsError::DateTimeParseError)
}

/// Parsed command line arguments.
#[cfg_attr(test, derive(Debug))]
pub struct Arguments {
	/// The format pattern.
	pub pattern: String,
	/// The configured time to format (if provided).
	pub time: Option<TimeSpec>,
	/// The locale for names in the output.
	pub locale: &'static Locale,
	/// The UTC offset in minutes, excluding daylight savings.
	pub offset: i32,
	/// The time zone name, rendered by the `z` pattern field.
	pub zone: String,
	/// Whether daylight savings time is in effect.
	pub dst: bool,
	/// Whether to format in UTC, ignoring the offset and daylight savings options.
	pub utc: bool
}

impl Arguments {
	/// Parse command line arguments.
	///
	/// The input can be any type that implements [`Iterator`] that yields [`OsString`], though
	/// typically this would be [`std::env::args_os`]. This function assumes that the application
	/// name is **not** supplied as the first item yielded by `args`.
	///
	/// # Errors
	///
	/// This function can return any of the variants in [`ArgumentsError`]. See that documentation
	/// for more details.
	///
	/// # Examples
	///
	/// ```
	/// let args = match Arguments::parse(std::env::args_os().skip(1)) {
	/// 	Ok(a) => a,
	/// 	Err(e) => {
	/// 		// Handle error
	/// 		panic!("{}", e);
	/// 	}
	/// };
	/// ```
	pub fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Arguments, ArgumentsError>
	{
		let mut pattern: Option<String> = None;
		let mut time: Option<TimeSpec> = None;
		let mut locale: &'static Locale = &names::EN;
		let mut offset = 0;
		let mut zone = String::new();
		let mut dst = false;
		let mut utc = false;
		let mut arg = args.next();
		let mut i = 0;
		loop {
			if arg.is_none() { break; }
			match arg_to_str(i, None, arg.as_ref())? {
				t @ ("-t" | "--time") => {
					time = Some(parse_time(arg_to_str(i+1, Some(t), args.next().as_ref())?)?);
					// Increment because we called args.next()
					i += 1;
				},
				l @ ("-l" | "--locale") => {
					let next = args.next();
					let tag = arg_to_str(i+1, Some(l), next.as_ref())?;
					locale = names::lookup(tag)
						.ok_or_else(|| ArgumentsError::UnknownLocale(tag.to_string()))?;
					i += 1;
				},
				o @ ("-o" | "--offset") => {
					offset = parse_offset(arg_to_str(i+1, Some(o), args.next().as_ref())?)?;
					i += 1;
				},
				z @ ("-z" | "--zone") => {
					zone = String::from(arg_to_str(i+1, Some(z), args.next().as_ref())?);
					i += 1;
				},
				"-d" | "--dst" => dst = true,
				"-u" | "--utc" => utc = true,
				"-h" | "--help" => return Err(ArgumentsError::Help),
				v => {
					if v.starts_with('-') && v.len() > 1 {
						return Err(ArgumentsError::UnrecognizedOption(v.to_string()));
					}
					if pattern.is_some() {
						return Err(ArgumentsError::UnexpectedArgument(v.to_string()));
					}
					pattern = Some(v.to_string());
				}
			}
			arg = args.next();
			// Increment because we called args.next()
			i += 1;
		}

		Ok(Arguments {
			pattern: pattern.ok_or(ArgumentsError::MissingPattern)?,
			time,
			locale,
			offset,
			zone,
			dst,
			utc
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	fn parse(args: &[&str]) -> Result<Arguments, ArgumentsError> {
		Arguments::parse(args.iter().map(OsString::from))
	}

	#[test]
	fn parse_offset_test() {
		assert_eq!(parse_offset("+09:30"), Ok(570));
		assert_eq!(parse_offset("-05:30"), Ok(-330));
		assert_eq!(parse_offset("09:30"), Ok(570));
		assert_eq!(parse_offset("570"), Ok(570));
		assert_eq!(parse_offset("-330"), Ok(-330));
		assert_eq!(parse_offset("0"), Ok(0));
		assert_eq!(parse_offset("+18:00"), Ok(1080));
		assert_eq!(parse_offset("-18:00"), Ok(-1080));

		assert_eq!(parse_offset("+18:01"), Err(ArgumentsError::InvalidOffset("+18:01".into())));
		assert_eq!(parse_offset("1081"), Err(ArgumentsError::InvalidOffset("1081".into())));
		assert_eq!(parse_offset("09:60"), Err(ArgumentsError::InvalidOffset("09:60".into())));
		assert_eq!(parse_offset("abc"), Err(ArgumentsError::InvalidOffset("abc".into())));
		assert_eq!(parse_offset(""), Err(ArgumentsError::InvalidOffset("".into())));
		assert_eq!(parse_offset("+"), Err(ArgumentsError::InvalidOffset("+".into())));
	}

	#[test]
	fn parse_time_test() {
		assert_eq!(parse_time("@1718617807"), Ok(TimeSpec { sec: 1718617807, nsec: 0 }));
		assert_eq!(parse_time("2024-06-17"), Ok(TimeSpec { sec: 1718582400, nsec: 0 }));
		assert_eq!(
			parse_time("2024-13-01"),
			Err(ArgumentsError::DateTimeParseError(ParseError::MonthOutOfRange))
		);
		assert!(parse_time("@abc").is_err());
	}

	#[test]
	fn arg_to_str_test() {
		let valid = OsString::from_str("test").unwrap();
		assert_eq!(
			arg_to_str(1, Some("arg"), Some(&valid)),
			Ok("test")
		);
		assert_eq!(
			arg_to_str(1, Some("arg"), None),
			Err(ArgumentsError::MissingParameter(String::from("arg")))
		);

		let invalid = unsafe { OsString::from_encoded_bytes_unchecked(vec![b't', 0xff, b's', b't']) };
		assert_eq!(
			arg_to_str(1, Some("arg"), Some(&invalid)),
			Err(ArgumentsError::InvalidUTF8(1, invalid.clone()))
		);
	}

	#[test]
	fn arguments_parse_test() {
		let args = parse(&["yyyy-MM-dd"]).unwrap();
		assert_eq!(args.pattern, "yyyy-MM-dd");
		assert_eq!(args.time, None);
		assert_eq!(args.locale.tag, "en");
		assert_eq!(args.offset, 0);
		assert_eq!(args.zone, "");
		assert!(!args.dst);
		assert!(!args.utc);

		let args = parse(&[
			"-t", "2024-06-17 09:50:07",
			"-l", "de_AT",
			"-o", "+01:00",
			"-z", "MEZ",
			"-d",
			"EEEE, d. MMMM yyyy"
		]).unwrap();
		assert_eq!(args.pattern, "EEEE, d. MMMM yyyy");
		assert_eq!(args.time, Some(TimeSpec { sec: 1718617807, nsec: 0 }));
		assert_eq!(args.locale.tag, "de");
		assert_eq!(args.offset, 60);
		assert_eq!(args.zone, "MEZ");
		assert!(args.dst);
		assert!(!args.utc);

		let args = parse(&["-u", "-t", "@0", "HH:mm"]).unwrap();
		assert!(args.utc);
		assert_eq!(args.time, Some(TimeSpec { sec: 0, nsec: 0 }));

		// Errors
		assert_eq!(parse(&[]).unwrap_err(), ArgumentsError::MissingPattern);
		assert_eq!(parse(&["-d"]).unwrap_err(), ArgumentsError::MissingPattern);
		assert_eq!(
			parse(&["yyyy", "MM"]).unwrap_err(),
			ArgumentsError::UnexpectedArgument(String::from("MM"))
		);
		assert_eq!(
			parse(&["--frequency", "60", "yyyy"]).unwrap_err(),
			ArgumentsError::UnrecognizedOption(String::from("--frequency"))
		);
		assert_eq!(
			parse(&["-l"]).unwrap_err(),
			ArgumentsError::MissingParameter(String::from("-l"))
		);
		assert_eq!(
			parse(&["-l", "fr", "yyyy"]).unwrap_err(),
			ArgumentsError::UnknownLocale(String::from("fr"))
		);
		assert_eq!(
			parse(&["-o", "19:00", "yyyy"]).unwrap_err(),
			ArgumentsError::InvalidOffset(String::from("19:00"))
		);
		assert_eq!(
			parse(&["-t", "2024-13-01", "yyyy"]).unwrap_err(),
			ArgumentsError::DateTimeParseError(ParseError::MonthOutOfRange)
		);
		assert_eq!(parse(&["-h"]).unwrap_err(), ArgumentsError::Help);
		assert_eq!(parse(&["yyyy", "-h"]).unwrap_err(), ArgumentsError::Help);
	}
}
