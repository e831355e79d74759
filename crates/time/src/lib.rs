//! Utilities for dealing with time.
//!
//! This crate is divided into two halves: [`time`] deals with converting between Unix timestamps
//! and broken-down calendar time, either in UTC or at a fixed UTC offset; [`parse`] deals with
//! parsing date time strings into Unix timestamps.
//!
//! By default, this crate supports `no_std`. If the `now` feature is enabled, the [`time`] module
//! enables a helper function to get the current time ([`time::now`]).
//!
//! See the documentation for [`time`] and [`parse`] for more details.
//!
//! # Examples
//!
//! Basic conversion from Unix time to UTC calendar time.
//! ```
//! # use time::time::Tm;
//! let date = Tm::new(1718617807).unwrap();
//!	assert_eq!(date, Tm {
//!		sec: 7,
//!		min: 50,
//!		hour: 9,
//!		day: 17,
//!		mon: 5,
//!		year: 2024,
//!		wday: 1,
//!		yday: 169,
//!		isdst: false,
//!		millis: None
//!	});
//! ```
//!
//! Conversion from Unix time to calendar time at UTC+9:30.
//! ```
//! # use time::time::{Tm, TimeSpec};
//! let date = Tm::localized(TimeSpec { sec: 1718617807, nsec: 0 }, 570, false).unwrap();
//! assert_eq!((date.hour, date.min), (19, 20));
//! ```

#![no_std]
// only enables the `doc_cfg` feature when
// the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod time;
pub mod parse;

pub use time::*;
pub use parse::*;
