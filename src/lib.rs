//! Rust library for turning the text files of the [zoneinfo database][w]
//! into iCalendar `VTIMEZONE` components.
//!
//! The database itself is maintained by IANA. For more information, see
//! [IANA’s page on the time zone database][iana]. You can also find the text
//! files themselves in [the tz repository][tz].
//!
//! [iana]: https://www.iana.org/time-zones
//! [tz]: https://github.com/eggert/tz
//! [w]: https://en.wikipedia.org/wiki/Tz_database
//!
//! ## Outline
//!
//! Going from a zoneinfo text file to a `VTIMEZONE` is split into stages:
//!
//! - **Parsing** individual lines of text into `Lines` is done by the `line`
//!   module, which also holds the calendar arithmetic everything else uses;
//! - **Interpreting** these lines into a complete `Table` is done by the
//!   `table` module, with the daylight saving rule evaluation in the `rule`
//!   module;
//! - **Calculating the periods** of constant UTC offset for one zone is done
//!   by the `timeline` module;
//! - **Rendering** those periods as iCalendar text is done by the
//!   `vtimezone` module.
//!
//! ## Example
//!
//! ```
//! use zoneinfo_vtimezone::table::parse;
//! use zoneinfo_vtimezone::timeline::ZoneTimeline;
//! use zoneinfo_vtimezone::vtimezone::vtimezone;
//!
//! let text = "\
//! Rule  EU  1981  max  -  Mar  lastSun  1:00u  1:00  S
//! Rule  EU  1996  max  -  Oct  lastSun  1:00u  0     -
//! Zone  Europe/Oslo  1:00  EU  CE%sT\n";
//!
//! let (table, malformed) = parse(text);
//! assert!(malformed.is_empty());
//!
//! let periods = table.timeline("Europe/Oslo").unwrap();
//! let ical = vtimezone("Europe/Oslo", &periods);
//! assert!(ical.starts_with("BEGIN:VTIMEZONE\r\nTZID:Europe/Oslo\r\n"));
//! ```

#![warn(missing_copy_implementations)]
//#![warn(missing_docs)]
#![warn(nonstandard_style)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]

pub mod line;
pub mod rule;
pub mod table;
pub mod timeline;
pub mod vtimezone;
