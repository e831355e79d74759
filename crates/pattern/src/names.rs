//! Localized names for formatted output.
//!
//! A [`Locale`] holds the month, weekday, day period, and era names a formatter needs.
//! Locales are looked up by BCP 47-style tag with [`lookup`], which falls back to a bare
//! language match when the full tag is unknown (`en_US` finds `en`).
//!
//! Some languages inflect month names by context: `ru` writes "января" inside a date but
//! "январь" when the month stands alone. Locales carry the standalone forms separately and
//! the formatter picks between them based on the program's standalone month flag.

/// Month, weekday, day period, and era names for one language.
#[derive(Debug)]
pub struct Locale {
	/// BCP 47-style language tag
	pub tag: &'static str,
	/// Full month names, formatting context
	months: [&'static str; 12],
	/// Abbreviated month names
	months_abbr: [&'static str; 12],
	/// Full month names, standalone context, for languages that distinguish them
	months_standalone: Option<&'static [&'static str; 12]>,
	/// Full weekday names, Sunday first
	weekdays: [&'static str; 7],
	/// Abbreviated weekday names, Sunday first
	weekdays_abbr: [&'static str; 7],
	/// Day period markers, AM first
	ampm: [&'static str; 2],
	/// Era designators, BC first
	eras: [&'static str; 2]
}

impl Locale {
	/// Get a month name. `mon` is zero-based. Standalone forms only exist at full width; the
	/// abbreviated and formatting forms are shared.
	pub fn month(&self, mon: usize, long: bool, standalone: bool) -> &'static str {
		let mon = mon % 12;
		if long {
			match (standalone, self.months_standalone) {
				(true, Some(named)) => named[mon],
				_ => self.months[mon]
			}
		} else {
			self.months_abbr[mon]
		}
	}

	/// Get a weekday name. `wday` is zero-based with 0 = Sunday.
	pub fn weekday(&self, wday: usize, long: bool) -> &'static str {
		let wday = wday % 7;
		if long { self.weekdays[wday] } else { self.weekdays_abbr[wday] }
	}

	/// Get the AM or PM marker.
	pub fn ampm(&self, pm: bool) -> &'static str {
		self.ampm[pm as usize]
	}

	/// Get the era designator. `ce` selects the common era (AD).
	pub fn era(&self, ce: bool) -> &'static str {
		self.eras[ce as usize]
	}
}

/// English.
pub static EN: Locale = Locale {
	tag: "en",
	months: [
		"January", "February", "March", "April", "May", "June",
		"July", "August", "September", "October", "November", "December"
	],
	months_abbr: [
		"Jan", "Feb", "Mar", "Apr", "May", "Jun",
		"Jul", "Aug", "Sep", "Oct", "Nov", "Dec"
	],
	months_standalone: None,
	weekdays: [
		"Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"
	],
	weekdays_abbr: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
	ampm: ["AM", "PM"],
	eras: ["BC", "AD"]
};

/// German.
pub static DE: Locale = Locale {
	tag: "de",
	months: [
		"Januar", "Februar", "März", "April", "Mai", "Juni",
		"Juli", "August", "September", "Oktober", "November", "Dezember"
	],
	months_abbr: [
		"Jan.", "Feb.", "März", "Apr.", "Mai", "Juni",
		"Juli", "Aug.", "Sept.", "Okt.", "Nov.", "Dez."
	],
	months_standalone: None,
	weekdays: [
		"Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag"
	],
	weekdays_abbr: ["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."],
	ampm: ["AM", "PM"],
	eras: ["v. Chr.", "n. Chr."]
};

/// Russian. Month names inflect: the formatting context uses the genitive case, standalone
/// use the nominative.
pub static RU: Locale = Locale {
	tag: "ru",
	months: [
		"января", "февраля", "марта", "апреля", "мая", "июня",
		"июля", "августа", "сентября", "октября", "ноября", "декабря"
	],
	months_abbr: [
		"янв.", "февр.", "мар.", "апр.", "мая", "июн.",
		"июл.", "авг.", "сент.", "окт.", "нояб.", "дек."
	],
	months_standalone: Some(&[
		"январь", "февраль", "март", "апрель", "май", "июнь",
		"июль", "август", "сентябрь", "октябрь", "ноябрь", "декабрь"
	]),
	weekdays: [
		"воскресенье", "понедельник", "вторник", "среда", "четверг", "пятница", "суббота"
	],
	weekdays_abbr: ["вс", "пн", "вт", "ср", "чт", "пт", "сб"],
	ampm: ["AM", "PM"],
	eras: ["до н. э.", "н. э."]
};

/// All known locales.
static LOCALES: [&Locale; 3] = [&EN, &DE, &RU];

/// Look up a locale by tag, case insensitively.
///
/// An unknown tag falls back to its bare language: `en_US` and `en-GB` both find `en`.
/// Returns `None` if the language is unknown too.
///
/// # Examples
///
/// ```
/// # use pattern::names::lookup;
/// assert_eq!(lookup("de").map(|l| l.tag), Some("de"));
/// assert_eq!(lookup("de_AT").map(|l| l.tag), Some("de"));
/// assert!(lookup("fr").is_none());
/// ```
pub fn lookup(tag: &str) -> Option<&'static Locale> {
	let exact = LOCALES.iter().find(|l| l.tag.eq_ignore_ascii_case(tag));
	exact.or_else(|| {
		let language = tag.split(['_', '-']).next()?;
		LOCALES.iter().find(|l| l.tag.eq_ignore_ascii_case(language))
	}).copied()
}
