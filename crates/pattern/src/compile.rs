//! Compile format patterns into opcode streams.
//!
//! Patterns follow the common date format pattern syntax: runs of the letters in
//! [`PATTERN_LETTERS`](crate::field::PATTERN_LETTERS) select fields, with the run length
//! controlling the output width; everything else passes through as literal text. Single quotes
//! delimit literal text that may contain pattern letters, and two consecutive quotes produce one
//! literal quote, inside or outside quoted text. Square brackets pass through literally but must
//! balance.
//!
//! # Examples
//!
//! ```
//! # use pattern::compile::compile;
//! let program = compile("yyyy-MM-dd'T'HH:mm:ss").unwrap();
//! assert!(!program.standalone_month());
//! ```

use core::{error, fmt};
use alloc::string::String;
use alloc::vec::Vec;
use crate::code::{encode, Program, TAG_LITERAL_CHAR, TAG_LITERAL_RUN};
use crate::field::Field;

/// Error type for pattern compilation.
#[derive(Debug, PartialEq)]
pub enum CompileError {
	/// An ASCII letter outside quotes is not a pattern letter.
	IllegalPatternCharacter(char),
	/// A quoted section was opened but never closed.
	UnterminatedQuote,
	/// A `]` without a matching `[`, or a `[` without a matching `]`.
	UnbalancedBracket,
	/// The ISO zone field (`X`) was repeated more than three times.
	IsoOffsetTooLong(usize)
}

impl fmt::Display for CompileError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CompileError::IllegalPatternCharacter(c) => {
				write!(f, "Illegal pattern character '{}'", c)
			},
			CompileError::UnterminatedQuote => write!(f, "Unterminated quote in pattern"),
			CompileError::UnbalancedBracket => write!(f, "Unbalanced bracket in pattern"),
			CompileError::IsoOffsetTooLong(n) => {
				write!(f, "Invalid ISO 8601 offset field of length {}", n)
			}
		}
	}
}

impl error::Error for CompileError {}

/// Compilation state: the output stream, the pending field run, and the opcode census that
/// determines the standalone month flag.
struct Compiler {
	out: Vec<u16>,
	run: Option<(Field, usize)>,
	depth: usize,
	ops: usize,
	month_only: bool
}

impl Compiler {
	fn new() -> Compiler {
		Compiler {
			out: Vec::new(),
			run: None,
			depth: 0,
			ops: 0,
			month_only: false
		}
	}

	/// Extend the pending field run, or start a new one.
	fn field(&mut self, field: Field) -> Result<(), CompileError> {
		match &mut self.run {
			Some((f, count)) if *f == field => *count += 1,
			_ => {
				self.flush()?;
				self.run = Some((field, 1));
			}
		}
		Ok(())
	}

	/// Emit the pending field run, if any.
	fn flush(&mut self) -> Result<(), CompileError> {
		if let Some((field, count)) = self.run.take() {
			if field == Field::IsoZone && count > 3 {
				return Err(CompileError::IsoOffsetTooLong(count));
			}
			encode(field.tag(), count, &mut self.out);
			self.ops += 1;
			self.month_only = field == Field::Month;
		}
		Ok(())
	}

	/// Emit a single literal ASCII character.
	fn literal_char(&mut self, c: char) {
		encode(TAG_LITERAL_CHAR, c as usize, &mut self.out);
		self.ops += 1;
		self.month_only = false;
	}

	/// Emit a run of literal text as UTF-16 code units.
	fn literal_run(&mut self, text: &str) {
		let units: Vec<u16> = text.encode_utf16().collect();
		encode(TAG_LITERAL_RUN, units.len(), &mut self.out);
		self.out.extend(units);
		self.ops += 1;
		self.month_only = false;
	}

	/// Emit quoted text, collapsed to a single-character opcode when possible.
	fn quoted(&mut self, text: &str) {
		let mut chars = text.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) if c.is_ascii() => self.literal_char(c),
			_ => self.literal_run(text)
		}
	}

	/// Track bracket balance for a literal character.
	fn bracket(&mut self, c: char) -> Result<(), CompileError> {
		match c {
			'[' => self.depth += 1,
			']' => self.depth = self.depth.checked_sub(1).ok_or(CompileError::UnbalancedBracket)?,
			_ => ()
		}
		Ok(())
	}

	fn finish(mut self) -> Result<Program, CompileError> {
		self.flush()?;
		if self.depth != 0 {
			return Err(CompileError::UnbalancedBracket);
		}
		Ok(Program::new(self.out, self.ops == 1 && self.month_only))
	}
}

/// Compile a format pattern into a [`Program`].
///
/// # Errors
///
/// Returns [`CompileError`] if the pattern uses an ASCII letter that is not a pattern letter,
/// leaves a quote or bracket unclosed, or repeats the ISO zone field more than three times.
///
/// # Examples
///
/// ```
/// # use pattern::compile::{compile, CompileError};
/// assert!(compile("yyyy-MM-dd").is_ok());
/// assert!(compile("EEEE, d. MMMM y").is_ok());
/// assert_eq!(compile("yyyy-bb"), Err(CompileError::IllegalPatternCharacter('b')));
/// assert_eq!(compile("'midnight"), Err(CompileError::UnterminatedQuote));
/// ```
pub fn compile(pattern: &str) -> Result<Program, CompileError> {
	let chars: Vec<char> = pattern.chars().collect();
	let mut c = Compiler::new();
	let mut quote: Option<String> = None;
	let mut i = 0;

	while i < chars.len() {
		let ch = chars[i];

		if ch == '\'' {
			// Two consecutive quotes are one literal quote, inside or outside quoted text
			if chars.get(i + 1) == Some(&'\'') {
				match &mut quote {
					Some(buffer) => buffer.push('\''),
					None => {
						c.flush()?;
						c.literal_char('\'');
					}
				}
				i += 2;
				continue;
			}
			match quote.take() {
				Some(buffer) => c.quoted(&buffer),
				None => {
					c.flush()?;
					quote = Some(String::new());
				}
			}
			i += 1;
			continue;
		}

		if let Some(buffer) = &mut quote {
			buffer.push(ch);
			i += 1;
			continue;
		}

		if ch.is_ascii_alphabetic() {
			let field = Field::from_letter(ch)
				.ok_or(CompileError::IllegalPatternCharacter(ch))?;
			c.field(field)?;
			i += 1;
			continue;
		}

		c.flush()?;
		if ch.is_ascii() {
			c.bracket(ch)?;
			c.literal_char(ch);
			i += 1;
		} else {
			// Non-ASCII text swallows everything up to the next quote or ASCII letter, so
			// surrounding punctuation lands in the same run
			let start = i;
			while i < chars.len() && chars[i] != '\'' && !chars[i].is_ascii_alphabetic() {
				c.bracket(chars[i])?;
				i += 1;
			}
			let text: String = chars[start..i].iter().collect();
			c.literal_run(&text);
		}
	}

	if quote.is_some() {
		return Err(CompileError::UnterminatedQuote);
	}
	c.finish()
}
