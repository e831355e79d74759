//! Compile date format patterns and render calendar times with them.
//!
//! This crate is split along the two halves of the job: [`compile`] turns a pattern string like
//! `yyyy-MM-dd` into a compact [`Program`](code::Program) of `u16` opcodes, and [`format`]
//! interprets a program against a broken-down calendar time. Compiling once and formatting many
//! times is the intended shape; programs are immutable and freely shared across threads, and
//! their raw units can be stored and reconstituted with
//! [`Program::from_units`](code::Program::from_units).
//!
//! The supporting modules fill in the pieces: [`field`] defines the 23 pattern letters and their
//! metadata, [`code`] the opcode wire encoding, and [`names`] the locale name tables.
//!
//! This crate supports `no_std` (with [`alloc`]).
//!
//! # Examples
//!
//! ```
//! # use pattern::{compile, format, Context};
//! # use pattern::names::lookup;
//! # use time::time::Tm;
//! let program = compile("EEEE, MMMM d, yyyy 'at' h:mm a").unwrap();
//! let tm = Tm::new(1718617807).unwrap();
//! let ctx = Context {
//! 	locale: lookup("en").unwrap(),
//! 	offset: 0,
//! 	zone: "UTC"
//! };
//! assert_eq!(
//! 	format(&program, &tm, &ctx).unwrap(),
//! 	"Monday, June 17, 2024 at 9:50 AM"
//! );
//! ```

#![no_std]
// only enables the `doc_cfg` feature when
// the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod code;
pub mod compile;
pub mod field;
pub mod format;
pub mod names;

pub use code::Program;
pub use compile::{compile, CompileError};
pub use format::{format, Context, FormatError};
