//! Parsing zoneinfo data files, line-by-line.
//!
//! This module takes one physical line of a zoneinfo data file and attempts
//! to classify and parse it as a `Rule`, `Zone`, `Link`, or zone
//! continuation line. It also holds the calendar arithmetic the rest of the
//! crate is built on: leap years, weekday-of-date, day-rule resolution, and
//! conversion between civil dates and Unix timestamps.
//!
//! ## Examples
//!
//! Parsing a `Rule` line:
//!
//! ```
//! use zoneinfo_vtimezone::line::*;
//!
//! let parser = LineParser::default();
//! let line = parser.parse_str("Rule  EU  1977    1980    -   Apr Sun>=1   1:00u  1:00    S");
//!
//! assert_eq!(line, Ok(Line::Rule(Rule {
//!     name:      "EU",
//!     from_year: 1977,
//!     to_year:   RuleEnd::Year(1980),
//!     month:     Month::April,
//!     day:       DayRule::FirstOnOrAfter(Weekday::Sunday, 1),
//!     time:      3600,
//!     time_type: TimeType::Utc,
//!     save:      3600,
//!     letter:    Some("S"),
//! })));
//! ```
//!
//! Parsing a `Zone` line:
//!
//! ```
//! use zoneinfo_vtimezone::line::*;
//!
//! let parser = LineParser::default();
//! let line = parser.parse_str("Zone  Australia/Adelaide  9:30  Aus  AC%sT  1971 Oct 31  2:00");
//!
//! assert_eq!(line, Ok(Line::Zone(Zone {
//!     name: "Australia/Adelaide",
//!     era: EraLine {
//!         offset: 9 * 3600 + 30 * 60,
//!         saving: SavingLine::Rules("Aus"),
//!         format: "AC%sT",
//!         until:  Some(EraEnd {
//!             year: 1971,
//!             month: Month::October,
//!             day: DayRule::Ordinal(31),
//!             time: 2 * 3600,
//!             time_type: TimeType::Wall,
//!         }),
//!     },
//! })));
//! ```

use std::fmt;
use std::str::FromStr;

use regex::{Captures, Regex};

pub struct LineParser {
    rule_line: Regex,
    time_field: Regex,
    zone_line: Regex,
    continuation_line: Regex,
    link_line: Regex,
    empty_line: Regex,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Error {
    FailedYearParse(String),
    FailedMonthParse(String),
    FailedWeekdayParse(String),
    InvalidLineType(String),
    TypeColumnContainedNonHyphen(String),
    CouldNotParseSaving(String),
    InvalidDayRule(String),
    InvalidTimeOfDay(String),
    NonWallClockOffset(String),
    NotParsedAsRuleLine,
    NotParsedAsZoneLine,
    NotParsedAsLinkLine,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FailedYearParse(s) => write!(f, "failed to parse as a year value: \"{}\"", s),
            Error::FailedMonthParse(s) => write!(f, "failed to parse as a month value: \"{}\"", s),
            Error::FailedWeekdayParse(s) => {
                write!(f, "failed to parse as a weekday value: \"{}\"", s)
            }
            Error::InvalidLineType(s) => write!(f, "line with invalid format: \"{}\"", s),
            Error::TypeColumnContainedNonHyphen(s) => {
                write!(
                    f,
                    "'type' column is not a hyphen but has the value: \"{}\"",
                    s
                )
            }
            Error::CouldNotParseSaving(s) => write!(f, "failed to parse RULES column: \"{}\"", s),
            Error::InvalidDayRule(s) => write!(f, "invalid day specification ('ON'): \"{}\"", s),
            Error::InvalidTimeOfDay(s) => write!(f, "invalid time: \"{}\"", s),
            Error::NonWallClockOffset(s) => {
                write!(f, "offset value not given as wall time: \"{}\"", s)
            }
            Error::NotParsedAsRuleLine => write!(f, "failed to parse line as a rule"),
            Error::NotParsedAsZoneLine => write!(f, "failed to parse line as a zone"),
            Error::NotParsedAsLinkLine => write!(f, "failed to parse line as a link"),
        }
    }
}

impl std::error::Error for Error {}

impl Default for LineParser {
    fn default() -> Self {
        LineParser {
            rule_line: Regex::new(
                r##"(?x) ^
                Rule \s+
                ( ?P<name>    \S+)  \s+
                ( ?P<from>    \S+)  \s+
                ( ?P<to>      \S+)  \s+
                ( ?P<type>    \S+)  \s+
                ( ?P<in>      \S+)  \s+
                ( ?P<on>      \S+)  \s+
                ( ?P<at>      \S+)  \s+
                ( ?P<save>    \S+)  \s+
                ( ?P<letters> \S+)  \s*
                (\#.*)?
            $ "##,
            )
            .unwrap(),

            time_field: Regex::new(
                r##"(?x) ^
                ( ?P<sign> -? )
                ( ?P<hour> \d{1,3} )
                ( : ( ?P<minute> \d{2} )
                    ( : ( ?P<second> \d{2} ) )?
                )?
                ( ?P<flag> [wsugz] )?
            $ "##,
            )
            .unwrap(),

            zone_line: Regex::new(
                r##"(?x) ^
                Zone \s+
                ( ?P<name> [A-Za-z0-9/_+-]+ )  \s+
                ( ?P<gmtoff>     \S+ )  \s+
                ( ?P<rulessave>  \S+ )  \s+
                ( ?P<format>     \S+ )  \s*
                ( ?P<year>       [0-9]+)? \s*
                ( ?P<month>      [A-Za-z]+)? \s*
                ( ?P<day>        [A-Za-z0-9><=]+ )? \s*
                ( ?P<time>       -?[0-9:]+[suwz]? )? \s*
                (\#.*)?
            $ "##,
            )
            .unwrap(),

            continuation_line: Regex::new(
                r##"(?x) ^
                \s+
                ( ?P<gmtoff>     \S+ )  \s+
                ( ?P<rulessave>  \S+ )  \s+
                ( ?P<format>     \S+ )  \s*
                ( ?P<year>       [0-9]+)? \s*
                ( ?P<month>      [A-Za-z]+)? \s*
                ( ?P<day>        [A-Za-z0-9><=]+ )? \s*
                ( ?P<time>       -?[0-9:]+[suwz]? )? \s*
                (\#.*)?
            $ "##,
            )
            .unwrap(),

            link_line: Regex::new(
                r##"(?x) ^
                Link  \s+
                ( ?P<target>  \S+ )  \s+
                ( ?P<name>    \S+ )  \s*
                (\#.*)?
            $ "##,
            )
            .unwrap(),

            empty_line: Regex::new(
                r##"(?x) ^
                \s*
                (\#.*)?
            $"##,
            )
            .unwrap(),
        }
    }
}

/// The last year a rule applies to.
///
/// The `TO` column of a rule line is either a year number, the keyword
/// `only` (the rule fires exactly once, in its `FROM` year), or the keyword
/// `max` (the rule applies indefinitely).
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum RuleEnd {
    /// A specific final year, inclusive.
    Year(i64),
    /// The rule applies in its starting year only.
    Only,
    /// The rule applies forever.
    Max,
}

impl FromStr for RuleEnd {
    type Err = Error;

    fn from_str(input: &str) -> Result<RuleEnd, Self::Err> {
        Ok(match &*input.to_ascii_lowercase() {
            "only" => RuleEnd::Only,
            "max" | "maximum" => RuleEnd::Max,
            year => match year.parse() {
                Ok(year) => RuleEnd::Year(year),
                Err(_) => return Err(Error::FailedYearParse(input.to_string())),
            },
        })
    }
}

/// A **month** field.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    pub(crate) const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    fn length(self, is_leap: bool) -> i8 {
        match self {
            Month::February if is_leap => 29,
            Month::February => 28,
            Month::April | Month::June | Month::September | Month::November => 30,
            _ => 31,
        }
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(input: &str) -> Result<Month, Self::Err> {
        Ok(match &*input.to_ascii_lowercase() {
            "jan" | "january" => Month::January,
            "feb" | "february" => Month::February,
            "mar" | "march" => Month::March,
            "apr" | "april" => Month::April,
            "may" => Month::May,
            "jun" | "june" => Month::June,
            "jul" | "july" => Month::July,
            "aug" | "august" => Month::August,
            "sep" | "september" => Month::September,
            "oct" | "october" => Month::October,
            "nov" | "november" => Month::November,
            "dec" | "december" => Month::December,
            other => return Err(Error::FailedMonthParse(other.to_string())),
        })
    }
}

/// A **weekday** field.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl FromStr for Weekday {
    type Err = Error;

    fn from_str(input: &str) -> Result<Weekday, Self::Err> {
        Ok(match &*input.to_ascii_lowercase() {
            "mon" | "monday" => Weekday::Monday,
            "tue" | "tuesday" => Weekday::Tuesday,
            "wed" | "wednesday" => Weekday::Wednesday,
            "thu" | "thursday" => Weekday::Thursday,
            "fri" | "friday" => Weekday::Friday,
            "sat" | "saturday" => Weekday::Saturday,
            "sun" | "sunday" => Weekday::Sunday,
            other => return Err(Error::FailedWeekdayParse(other.to_string())),
        })
    }
}

impl Weekday {
    /// The weekday of the given calendar date, derived from the number of
    /// days since the epoch (1970-01-01 was a Thursday).
    pub fn of(year: i64, month: Month, day: i8) -> Weekday {
        match days_from_epoch(year, month, day).rem_euclid(7) {
            0 => Weekday::Thursday,
            1 => Weekday::Friday,
            2 => Weekday::Saturday,
            3 => Weekday::Sunday,
            4 => Weekday::Monday,
            5 => Weekday::Tuesday,
            6 => Weekday::Wednesday,
            _ => unreachable!(),
        }
    }
}

/// A **day** definition field: the `ON` column of a rule line, or the day
/// part of a zone line's `UNTIL` columns.
///
/// Three grammar forms are recognized: a plain day-of-month number, the
/// last occurrence of a weekday in the month (`lastSun`), and the first
/// occurrence of a weekday on or after a given day (`Sun>=15`).
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum DayRule {
    /// A specific day of the month, given by its number.
    Ordinal(i8),
    /// The first day with the given weekday on or after a day with a
    /// specific number.
    FirstOnOrAfter(Weekday, i8),
    /// The last day of the month with a specific weekday.
    Last(Weekday),
}

impl DayRule {
    /// Resolves this day rule against a year and month, producing a
    /// concrete calendar date.
    ///
    /// The result carries its own year and month because an on-or-after
    /// rule anchored near the end of a month can roll over into the next
    /// one (`Sun>=25` in a month whose final Sunday is before the 25th).
    pub fn resolve(self, year: i64, month: Month) -> (i64, Month, i8) {
        let leap = is_leap(year);

        match self {
            DayRule::Ordinal(day) => (year, month, day),

            DayRule::Last(weekday) => {
                let mut day = month.length(leap);
                while Weekday::of(year, month, day) != weekday {
                    day -= 1;
                }
                (year, month, day)
            }

            DayRule::FirstOnOrAfter(weekday, from) => {
                let (mut year, mut month, mut day) = (year, month, from);
                loop {
                    if day > month.length(is_leap(year)) {
                        day = 1;
                        month = match month {
                            Month::December => {
                                year += 1;
                                Month::January
                            }
                            other => Month::ALL[other as usize],
                        };
                    }
                    if Weekday::of(year, month, day) == weekday {
                        return (year, month, day);
                    }
                    day += 1;
                }
            }
        }
    }
}

/// Whether the given year is a leap year.
pub fn is_leap(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_year(year: i64) -> i64 {
    if is_leap(year) {
        366
    } else {
        365
    }
}

fn days_from_epoch(year: i64, month: Month, day: i8) -> i64 {
    let mut days = 0;
    if year >= 1970 {
        for y in 1970..year {
            days += days_in_year(y);
        }
    } else {
        for y in year..1970 {
            days -= days_in_year(y);
        }
    }
    let leap = is_leap(year);
    for m in Month::ALL {
        if (m as i8) < (month as i8) {
            days += m.length(leap) as i64;
        }
    }
    days + day as i64 - 1
}

/// The Unix timestamp of the given civil date plus a number of seconds past
/// its midnight, with no offset applied.
pub fn unix_time(year: i64, month: Month, day: i8, seconds: i64) -> i64 {
    days_from_epoch(year, month, day) * 86400 + seconds
}

/// The inverse of `unix_time`: the civil date containing the given Unix
/// timestamp, along with the number of seconds past its midnight.
pub fn civil_from_timestamp(timestamp: i64) -> (i64, Month, i8, i64) {
    let mut days = timestamp.div_euclid(86400);
    let seconds = timestamp.rem_euclid(86400);

    let mut year = 1970;
    while days < 0 {
        year -= 1;
        days += days_in_year(year);
    }
    while days >= days_in_year(year) {
        days -= days_in_year(year);
        year += 1;
    }

    let leap = is_leap(year);
    for month in Month::ALL {
        let length = month.length(leap) as i64;
        if days < length {
            return (year, month, (days + 1) as i8, seconds);
        }
        days -= length;
    }
    unreachable!("day index exceeded the length of the year");
}

/// The reference frame of a time-of-day value: local wall clock (including
/// any daylight saving in force), local standard time, or UTC.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum TimeType {
    Wall,
    Standard,
    Utc,
}

/// The `UNTIL` columns of a zone line, merged into one record.
///
/// Everything after the year is optional in the file and defaults to the
/// earliest possible point: January 1st, midnight wall time.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct EraEnd {
    pub year: i64,
    pub month: Month,
    pub day: DayRule,
    pub time: i64,
    pub time_type: TimeType,
}

impl EraEnd {
    /// Converts this end instant to UTC, honoring its own reference frame:
    /// a wall time subtracts the base offset and the saving in force, a
    /// standard time only the base offset, and a UTC time nothing.
    pub fn to_utc(&self, base_offset: i64, dst_offset: i64) -> i64 {
        let correction = match self.time_type {
            TimeType::Utc => 0,
            TimeType::Standard => base_offset,
            TimeType::Wall => base_offset + dst_offset,
        };
        let (year, month, day) = self.day.resolve(self.year, self.month);
        unix_time(year, month, day, self.time) - correction
    }
}

/// A **rule** definition line.
///
/// According to the `zic(8)` man page, a rule line has this form, along with
/// an example:
///
/// ```text
///     Rule  NAME  FROM  TO    TYPE  IN   ON       AT    SAVE  LETTER/S
///     Rule  US    1967  1973  ‐     Apr  lastSun  2:00  1:00  D
/// ```
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rule<'a> {
    /// The name of the set of rules that this rule is part of.
    pub name: &'a str,
    /// The first year in which the rule applies.
    pub from_year: i64,
    /// The final year, `only`, or `max`.
    pub to_year: RuleEnd,
    /// The month in which the rule takes effect.
    pub month: Month,
    /// The day on which the rule takes effect.
    pub day: DayRule,
    /// The time of day at which the rule takes effect, in seconds.
    pub time: i64,
    /// The reference frame of that time of day.
    pub time_type: TimeType,
    /// The number of seconds to be added while the rule is in effect.
    pub save: i64,
    /// The variable part of time zone abbreviations to be used when this
    /// rule is in effect, if any.
    pub letter: Option<&'a str>,
}

/// The amount of daylight saving to apply during an era: either none, a
/// one-off fixed amount, or whatever the named set of rules says.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum SavingLine<'a> {
    NoSaving,
    OneOff(i64),
    Rules(&'a str),
}

/// The information contained in both zone lines *and* zone continuation
/// lines: one era of a zone's definition.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct EraLine<'a> {
    /// The number of seconds that need to be added to UTC to get the
    /// standard time in this era.
    pub offset: i64,
    /// The rules in force during this era, or the amount of time to add.
    pub saving: SavingLine<'a>,
    /// The format for time zone abbreviations, with `%s` as the marker.
    pub format: &'a str,
    /// When this era ends, in the era's own local time, or `None` if it is
    /// in effect until the end of time.
    pub until: Option<EraEnd>,
}

/// A **zone** definition line: the name plus the first era.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Zone<'a> {
    pub name: &'a str,
    pub era: EraLine<'a>,
}

/// A **link** definition line. Links are recognized so files tokenize
/// cleanly, but alias resolution is out of scope and they are discarded by
/// the table loader.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Link<'a> {
    pub existing: &'a str,
    pub new: &'a str,
}

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Line<'a> {
    /// This line is empty or a comment.
    Space,
    /// This line contains a **zone** definition.
    Zone(Zone<'a>),
    /// This line contains a **continuation** of a zone definition.
    Continuation(EraLine<'a>),
    /// This line contains a **rule** definition.
    Rule(Rule<'a>),
    /// This line contains a **link** definition.
    Link(Link<'a>),
}

fn parse_time_type(c: &str) -> Option<TimeType> {
    Some(match c {
        "w" => TimeType::Wall,
        "s" => TimeType::Standard,
        "u" | "g" | "z" => TimeType::Utc,
        _ => return None,
    })
}

impl LineParser {
    fn parse_time_of_day(&self, input: &str) -> Result<(i64, TimeType), Error> {
        if input == "-" {
            return Ok((0, TimeType::Wall));
        }

        let caps = match self.time_field.captures(input) {
            Some(caps) => caps,
            None => return Err(Error::InvalidTimeOfDay(input.to_string())),
        };

        let field = |name: &str| -> i64 {
            caps.name(name)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };

        let mut seconds = field("hour") * 3600 + field("minute") * 60 + field("second");
        if caps.name("sign").unwrap().as_str() == "-" {
            seconds = -seconds;
        }

        let time_type = caps
            .name("flag")
            .and_then(|c| parse_time_type(c.as_str()))
            .unwrap_or(TimeType::Wall);

        Ok((seconds, time_type))
    }

    /// Parses a plain offset field (`GMTOFF` or `SAVE` columns), which must
    /// not carry a wall/standard/UTC suffix.
    fn parse_offset(&self, input: &str) -> Result<i64, Error> {
        match self.parse_time_of_day(input)? {
            (seconds, TimeType::Wall) => Ok(seconds),
            _ => Err(Error::NonWallClockOffset(input.to_string())),
        }
    }

    fn parse_dayrule(&self, input: &str) -> Result<DayRule, Error> {
        // A plain number is an ordinal day of the month.
        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
            return Ok(DayRule::Ordinal(
                input
                    .parse()
                    .map_err(|_| Error::InvalidDayRule(input.to_string()))?,
            ));
        }

        // `lastSun` and friends.
        if let Some(remainder) = input.strip_prefix("last") {
            return Ok(DayRule::Last(remainder.parse()?));
        }

        // `Sun>=15`. The `<=` form used by a handful of historical zones is
        // not part of the recognized grammar and is rejected here.
        if let Some(pos) = input.find(">=") {
            let weekday = input[..pos].parse()?;
            let day = input[pos + 2..]
                .parse()
                .map_err(|_| Error::InvalidDayRule(input.to_string()))?;
            return Ok(DayRule::FirstOnOrAfter(weekday, day));
        }

        Err(Error::InvalidDayRule(input.to_string()))
    }

    fn parse_rule<'a>(&self, input: &'a str) -> Result<Rule<'a>, Error> {
        let caps = match self.rule_line.captures(input) {
            Some(caps) => caps,
            None => return Err(Error::NotParsedAsRuleLine),
        };

        let name = caps.name("name").unwrap().as_str();

        let from = caps.name("from").unwrap().as_str();
        let from_year: i64 = from
            .parse()
            .map_err(|_| Error::FailedYearParse(from.to_string()))?;
        let to_year = caps.name("to").unwrap().as_str().parse()?;

        // The only accepted value in the `TYPE` column is a hyphen; it
        // exists for compatibility with old databases that used year types.
        // Sometimes "‐", a Unicode hyphen, is used as well.
        let t = caps.name("type").unwrap().as_str();
        if t != "-" && t != "\u{2010}" {
            return Err(Error::TypeColumnContainedNonHyphen(t.to_string()));
        }

        let month = caps.name("in").unwrap().as_str().parse()?;
        let day = self.parse_dayrule(caps.name("on").unwrap().as_str())?;
        let (time, time_type) = self.parse_time_of_day(caps.name("at").unwrap().as_str())?;
        let save = self.parse_offset(caps.name("save").unwrap().as_str())?;
        let letter = match caps.name("letters").unwrap().as_str() {
            "-" => None,
            l => Some(l),
        };

        Ok(Rule {
            name,
            from_year,
            to_year,
            month,
            day,
            time,
            time_type,
            save,
            letter,
        })
    }

    fn parse_saving<'a>(&self, input: &'a str) -> Result<SavingLine<'a>, Error> {
        if input == "-" {
            Ok(SavingLine::NoSaving)
        } else if input
            .chars()
            .all(|c| c == '-' || c == '_' || c.is_alphabetic())
        {
            Ok(SavingLine::Rules(input))
        } else {
            match self.parse_offset(input) {
                Ok(seconds) => Ok(SavingLine::OneOff(seconds)),
                Err(_) => Err(Error::CouldNotParseSaving(input.to_string())),
            }
        }
    }

    fn era_from_captures<'a>(&self, caps: Captures<'a>) -> Result<EraLine<'a>, Error> {
        let offset = self.parse_offset(caps.name("gmtoff").unwrap().as_str())?;
        let saving = self.parse_saving(caps.name("rulessave").unwrap().as_str())?;
        let format = caps.name("format").unwrap().as_str();

        // The UNTIL columns are optional left-to-right: a present day
        // implies a present month and year. Omitted columns default to the
        // earliest point within the enclosing one.
        let until = match caps.name("year") {
            None => None,
            Some(year) => {
                let year = year
                    .as_str()
                    .parse()
                    .map_err(|_| Error::FailedYearParse(year.as_str().to_string()))?;
                let month = match caps.name("month") {
                    Some(m) => m.as_str().parse()?,
                    None => Month::January,
                };
                let day = match caps.name("day") {
                    Some(d) => self.parse_dayrule(d.as_str())?,
                    None => DayRule::Ordinal(1),
                };
                let (time, time_type) = match caps.name("time") {
                    Some(t) => self.parse_time_of_day(t.as_str())?,
                    None => (0, TimeType::Wall),
                };
                Some(EraEnd {
                    year,
                    month,
                    day,
                    time,
                    time_type,
                })
            }
        };

        Ok(EraLine {
            offset,
            saving,
            format,
            until,
        })
    }

    fn parse_zone<'a>(&self, input: &'a str) -> Result<Zone<'a>, Error> {
        let caps = match self.zone_line.captures(input) {
            Some(caps) => caps,
            None => return Err(Error::NotParsedAsZoneLine),
        };
        let name = caps.name("name").unwrap().as_str();
        let era = self.era_from_captures(caps)?;
        Ok(Zone { name, era })
    }

    fn parse_link<'a>(&self, input: &'a str) -> Result<Link<'a>, Error> {
        match self.link_line.captures(input) {
            Some(caps) => Ok(Link {
                existing: caps.name("target").unwrap().as_str(),
                new: caps.name("name").unwrap().as_str(),
            }),
            None => Err(Error::NotParsedAsLinkLine),
        }
    }

    /// Attempt to parse this line, returning a `Line` depending on what
    /// type of line it was, or an `Error` if it couldn't be parsed.
    pub fn parse_str<'a>(&self, input: &'a str) -> Result<Line<'a>, Error> {
        if self.empty_line.is_match(input) {
            return Ok(Line::Space);
        }

        match self.parse_zone(input) {
            Err(Error::NotParsedAsZoneLine) => {}
            result => return result.map(Line::Zone),
        }

        if let Some(caps) = self.continuation_line.captures(input) {
            return self.era_from_captures(caps).map(Line::Continuation);
        }

        match self.parse_rule(input) {
            Err(Error::NotParsedAsRuleLine) => {}
            result => return result.map(Line::Rule),
        }

        match self.parse_link(input) {
            Err(Error::NotParsedAsLinkLine) => {}
            result => return result.map(Line::Link),
        }

        Err(Error::InvalidLineType(input.to_string()))
    }
}
