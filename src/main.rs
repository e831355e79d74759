//! Format dates and times from the command line using format patterns.
//!
//! This crate compiles a date format pattern like `yyyy-MM-dd HH:mm:ss` into a compact program
//! and renders a calendar time with it, with localized month, weekday, and era names. The
//! heavy lifting lives in the [`pattern`] crate; this binary layers argument handling and time
//! acquisition on top.
//!
//! # Command Line Arguments
//!
//! General form: `datefmt [options...] pattern`
//!
//! In addition to one required argument (the format pattern), this application supports several
//! optional command line arguments for configuration:
//!
//! | Short form | Long form  | Argument                     | Default      | Description                        |
//! | ---------- | ---------- | ---------------------------- | ------------ | ---------------------------------- |
//! | `-t`       | `--time`   | [Date time string] or `@sec` | Current time | The time to format                 |
//! | `-l`       | `--locale` | Locale tag (e.g. `de`)       | `en`         | The locale for names in the output |
//! | `-o`       | `--offset` | `±HH:MM` or minutes          | `+00:00`     | The UTC offset to format at        |
//! | `-z`       | `--zone`   | Name (e.g. `CET`)            | None         | The zone name for the `z` field    |
//! | `-d`       | `--dst`    |                              | Off          | Apply the daylight savings hour    |
//! | `-u`       | `--utc`    |                              | Off          | Format in UTC, ignoring `-o`/`-d`  |
//!
//! The pattern letters are `GyMdkHmsSEDFwWahKzZYuXL`, with the usual meanings: runs of a letter
//! select a field and control its width, single quotes delimit literal text, and `''` is a
//! literal quote. See the [`pattern`] crate documentation for the full syntax.
//!
//! [date time string]: time::parse::parse_timestamp
//!
//! # Examples
//!
//! Format the current time as an ISO 8601 date
//! ```sh
//! datefmt -u "yyyy-MM-dd'T'HH:mm:ssXXX"
//! ```
//!
//! Format a fixed time in German at UTC+1
//! ```sh
//! datefmt -l de -o +01:00 -z MEZ -t "2024-06-17 09:50:07" "EEEE, d. MMMM yyyy HH:mm z"
//! ```
//!
//! Render a month name on its own (nominative case in Russian)
//! ```sh
//! datefmt -l ru -t 2024-06-17 MMMM
//! ```

use std::error::Error;
use std::process::ExitCode;

use args::{Arguments, ArgumentsError};
use pattern::{compile, format, Context};
use time::time::{now, Tm};

mod args;

/// Compile the pattern and format the configured time with it, printing the result.
///
/// # Errors
///
/// This function can generate a variety of errors, all wrapped in `Box<dyn Error>`:
/// - [`pattern::CompileError`] if the pattern is malformed.
/// - [`pattern::FormatError`] if the pattern needs data the time cannot supply, such as
///   sub-second resolution when formatting the current time was not requested.
/// - `&str` for several untyped errors (failed to get system time, time before the Unix epoch).
fn run(args: Arguments) -> Result<ExitCode, Box<dyn Error>> {
	let program = compile(&args.pattern)?;

	let ts = match args.time {
		Some(t) => t,
		None => now().ok_or("Failed to get current system time")?
	};

	let (tm, offset) = if args.utc {
		(Tm::from_timespec(ts), 0)
	} else {
		(Tm::localized(ts, args.offset, args.dst), args.offset)
	};
	let tm = tm.ok_or("Times before the Unix epoch are not supported")?;

	let zone = match (args.utc, args.zone.is_empty()) {
		(true, true) => "UTC",
		_ => args.zone.as_str()
	};
	let ctx = Context {
		locale: args.locale,
		offset,
		zone
	};

	println!("{}", format(&program, &tm, &ctx)?);
	Ok(ExitCode::SUCCESS)
}

/// Main program entry point.
///
/// Parses input arguments and prints the formatted time. See [`crate`] documentation for
/// details.
fn main() -> ExitCode {
	let args = match Arguments::parse(std::env::args_os().skip(1)) {
		Ok(a) => a,
		Err(e) => {
			return if let ArgumentsError::Help = e {
				println!("\
Format dates and times using format patterns.

Usage: datefmt [OPTIONS] <PATTERN>

Options:
  -t, --time <DATETIME>   the time to format, as a date time string or @<unix seconds>,
                          defaults to now
  -l, --locale <LOCALE>   the locale for names in the output, default en
  -o, --offset <OFFSET>   the UTC offset as [+-]HH:MM or minutes, default +00:00
  -z, --zone <NAME>       the zone name rendered by the z pattern field
  -d, --dst               apply the daylight savings hour on top of the offset
  -u, --utc               format in UTC, ignoring -o and -d

Pattern letters: GyMdkHmsSEDFwWahKzZYuXL. Runs of a letter widen the field, single
quotes delimit literal text, and '' is a literal quote.

Examples:
  datefmt -u \"yyyy-MM-dd'T'HH:mm:ssXXX\"
  datefmt -t \"2024-06-17 09:50:07\" \"EEE, d MMM yyyy HH:mm:ss Z\"
  datefmt -l de -o +01:00 -z MEZ \"EEEE, d. MMMM yyyy HH:mm z\"
  datefmt -l ru -t 2024-06-17 MMMM\n");
				ExitCode::SUCCESS
			} else {
				eprintln!("{}", e);
				ExitCode::FAILURE
			}
		}
	};

	if args.utc && (args.offset != 0 || args.dst) {
		println!("Warning: -o and -d do nothing when formatting in UTC with -u or --utc");
	}

	run(args)
		.inspect_err(|e| eprintln!("{}", e))
		.unwrap_or(ExitCode::FAILURE)
}
