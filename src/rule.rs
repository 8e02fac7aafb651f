//! Daylight saving rules and the operations that evaluate them.
//!
//! A `RuleRecord` is the owned form of a parsed `Rule` line, detached from
//! the ruleset name (which becomes the key of the ruleset map). All of its
//! evaluation operations take the governing era's base offset as an explicit
//! parameter, because the same ruleset can be shared by eras with different
//! standard offsets.

use std::fmt;

use crate::line::{self, civil_from_timestamp, unix_time, DayRule, Month, RuleEnd, TimeType};

/// A single daylight saving rule: "switch the clocks by `save` at this
/// time of day on this day, every year from `from_year` through `to_year`".
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct RuleRecord {
    pub from_year: i64,
    pub to_year: RuleEnd,
    pub month: Month,
    pub day: DayRule,
    /// Time of day at which the rule takes effect, in seconds.
    pub time: i64,
    /// The reference frame of `time`.
    pub time_type: TimeType,
    /// Seconds of daylight saving in force while this rule is active.
    pub save: i64,
    /// Variable part of the zone abbreviation while this rule is active.
    pub letter: Option<String>,
}

impl<'a> From<line::Rule<'a>> for RuleRecord {
    fn from(info: line::Rule<'a>) -> RuleRecord {
        RuleRecord {
            from_year: info.from_year,
            to_year: info.to_year,
            month: info.month,
            day: info.day,
            time: info.time,
            time_type: info.time_type,
            save: info.save,
            letter: info.letter.map(str::to_owned),
        }
    }
}

/// Error returned when an occurrence is requested for a year outside a
/// rule's validity range.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct OutsideValidity {
    pub year: i64,
}

impl fmt::Display for OutsideValidity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "rule does not apply to the year {}", self.year)
    }
}

impl std::error::Error for OutsideValidity {}

impl RuleRecord {
    /// The last year this rule applies to, or `None` for a `max` rule.
    fn last_year(&self) -> Option<i64> {
        match self.to_year {
            RuleEnd::Year(year) => Some(year),
            RuleEnd::Only => Some(self.from_year),
            RuleEnd::Max => None,
        }
    }

    /// Whether this rule is in effect during the given year.
    pub fn applies_to_year(&self, year: i64) -> bool {
        year >= self.from_year && self.last_year().map_or(true, |last| year <= last)
    }

    /// The UTC instant at which the rule fires in the given year, without
    /// checking the validity range.
    ///
    /// The correction applied to the local time of day depends on its
    /// reference frame: a wall clock reading includes both the era's base
    /// offset and this rule's own saving, a standard reading only the base
    /// offset, and a UTC reading neither.
    fn occurrence(&self, year: i64, base_offset: i64) -> i64 {
        let correction = match self.time_type {
            TimeType::Utc => 0,
            TimeType::Standard => base_offset,
            TimeType::Wall => base_offset + self.save,
        };
        let (year, month, day) = self.day.resolve(year, self.month);
        unix_time(year, month, day, self.time) - correction
    }

    /// The UTC instant at which the rule fires in the given year, or an
    /// error if the year is outside the rule's validity range.
    pub fn occurrence_in_year(&self, year: i64, base_offset: i64) -> Result<i64, OutsideValidity> {
        if self.applies_to_year(year) {
            Ok(self.occurrence(year, base_offset))
        } else {
            Err(OutsideValidity { year })
        }
    }

    /// The first UTC instant at which the rule ever fires.
    pub fn start_time(&self, base_offset: i64) -> i64 {
        self.occurrence(self.from_year, base_offset)
    }

    /// The UTC instant of the rule's final firing, or `None` for a `max`
    /// rule, which never stops recurring.
    pub fn end_time(&self, base_offset: i64) -> Option<i64> {
        self.last_year().map(|year| self.occurrence(year, base_offset))
    }

    /// The latest firing of this rule strictly before the given instant,
    /// or `None` if the rule first fires at or after it.
    pub fn most_recent_occurrence_before(&self, instant: i64, base_offset: i64) -> Option<i64> {
        let mut year = civil_from_timestamp(instant).0;
        if let Some(last) = self.last_year() {
            year = year.min(last);
        }
        while year >= self.from_year {
            let occurrence = self.occurrence(year, base_offset);
            if occurrence < instant {
                return Some(occurrence);
            }
            year -= 1;
        }
        None
    }

    /// The earliest firing of this rule strictly after the given instant,
    /// or `None` if the rule's validity range ends before then.
    ///
    /// For a `max` rule the year scan is unbounded but still terminates:
    /// every year in range has exactly one occurrence, so at most two
    /// iterations happen past the year containing `instant`.
    pub fn next_occurrence_after(&self, instant: i64, base_offset: i64) -> Option<i64> {
        // Start one year early: the base and save corrections can push an
        // occurrence near the year boundary into the neighboring year.
        let mut year = self.from_year.max(civil_from_timestamp(instant).0 - 1);
        loop {
            if let Some(last) = self.last_year() {
                if year > last {
                    return None;
                }
            }
            let occurrence = self.occurrence(year, base_offset);
            if occurrence > instant {
                return Some(occurrence);
            }
            year += 1;
        }
    }

    /// The total UTC offset while this rule is in force.
    pub fn effective_offset(&self, base_offset: i64) -> i64 {
        base_offset + self.save
    }

    /// Whether this rule puts the zone in daylight saving.
    pub fn is_dst(&self) -> bool {
        self.save != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Weekday;

    // Rule  US  1967  1973  -  Apr  lastSun  2:00  1:00  D
    fn us_spring() -> RuleRecord {
        RuleRecord {
            from_year: 1967,
            to_year: RuleEnd::Year(1973),
            month: Month::April,
            day: DayRule::Last(Weekday::Sunday),
            time: 2 * 3600,
            time_type: TimeType::Wall,
            save: 3600,
            letter: Some("D".to_owned()),
        }
    }

    #[test]
    fn validity_range() {
        let rule = us_spring();
        assert!(!rule.applies_to_year(1966));
        assert!(rule.applies_to_year(1967));
        assert!(rule.applies_to_year(1973));
        assert!(!rule.applies_to_year(1974));

        let only = RuleRecord {
            to_year: RuleEnd::Only,
            ..rule.clone()
        };
        assert!(only.applies_to_year(1967));
        assert!(!only.applies_to_year(1968));

        let max = RuleRecord {
            to_year: RuleEnd::Max,
            ..rule
        };
        assert!(max.applies_to_year(3000));
        assert!(!max.applies_to_year(1966));
    }

    #[test]
    fn wall_time_subtracts_base_and_save() {
        // At 2:00 wall in a zone six hours west, with the rule's own hour
        // of saving in force, the firing is at 07:00 UTC.
        let rule = us_spring();
        let occurrence = rule.occurrence_in_year(1967, -21600).unwrap();
        // Last Sunday of April 1967 is the 30th.
        assert_eq!(
            occurrence,
            unix_time(1967, Month::April, 30, 2 * 3600) + 21600 - 3600
        );
    }

    #[test]
    fn wall_time_with_zero_save() {
        // A rule at 2:00 wall with no saving in a base of -6:00 fires at
        // 08:00 UTC.
        let rule = RuleRecord {
            from_year: 2000,
            to_year: RuleEnd::Only,
            month: Month::June,
            day: DayRule::Ordinal(1),
            time: 2 * 3600,
            time_type: TimeType::Wall,
            save: 0,
            letter: None,
        };
        let occurrence = rule.occurrence_in_year(2000, -21600).unwrap();
        assert_eq!(
            civil_from_timestamp(occurrence),
            (2000, Month::June, 1, 8 * 3600)
        );
    }

    #[test]
    fn standard_and_utc_references() {
        let standard = RuleRecord {
            time_type: TimeType::Standard,
            ..us_spring()
        };
        assert_eq!(
            standard.occurrence_in_year(1967, -21600).unwrap(),
            unix_time(1967, Month::April, 30, 2 * 3600) + 21600
        );

        let utc = RuleRecord {
            time_type: TimeType::Utc,
            ..us_spring()
        };
        assert_eq!(
            utc.occurrence_in_year(1967, -21600).unwrap(),
            unix_time(1967, Month::April, 30, 2 * 3600)
        );
    }

    #[test]
    fn out_of_range_year() {
        assert_eq!(
            us_spring().occurrence_in_year(1980, 0),
            Err(OutsideValidity { year: 1980 })
        );
    }

    #[test]
    fn start_and_end_times() {
        // The rule is wall-referenced with an hour of saving, so even at a
        // base offset of zero its firings are an hour before 2:00.
        let rule = us_spring();
        assert_eq!(rule.start_time(0), unix_time(1967, Month::April, 30, 3600));
        assert_eq!(
            rule.end_time(0),
            Some(unix_time(1973, Month::April, 29, 3600))
        );

        let max = RuleRecord {
            to_year: RuleEnd::Max,
            ..rule.clone()
        };
        assert_eq!(max.end_time(0), None);

        let only = RuleRecord {
            to_year: RuleEnd::Only,
            ..rule
        };
        assert_eq!(only.end_time(0), Some(only.start_time(0)));
    }

    #[test]
    fn scanning_backward() {
        let rule = us_spring();
        let t = unix_time(1970, Month::January, 1, 0);
        assert_eq!(
            rule.most_recent_occurrence_before(t, 0),
            Some(unix_time(1969, Month::April, 27, 3600))
        );

        // Before the rule ever fires.
        let early = unix_time(1960, Month::January, 1, 0);
        assert_eq!(rule.most_recent_occurrence_before(early, 0), None);

        // Long after the final year: the scan clamps to it.
        let late = unix_time(1990, Month::January, 1, 0);
        assert_eq!(
            rule.most_recent_occurrence_before(late, 0),
            Some(unix_time(1973, Month::April, 29, 3600))
        );

        // An occurrence exactly at the instant does not count.
        let at = unix_time(1970, Month::April, 26, 3600);
        assert_eq!(
            rule.most_recent_occurrence_before(at, 0),
            Some(unix_time(1969, Month::April, 27, 3600))
        );
    }

    #[test]
    fn scanning_forward() {
        let rule = us_spring();
        let t = unix_time(1970, Month::January, 1, 0);
        assert_eq!(
            rule.next_occurrence_after(t, 0),
            Some(unix_time(1970, Month::April, 26, 3600))
        );

        // After the final year there is nothing left.
        let late = unix_time(1980, Month::January, 1, 0);
        assert_eq!(rule.next_occurrence_after(late, 0), None);

        // Before the first year, the answer is the first firing.
        let early = unix_time(1950, Month::January, 1, 0);
        assert_eq!(rule.next_occurrence_after(early, 0), Some(rule.start_time(0)));

        // A `max` rule always has a next occurrence.
        let max = RuleRecord {
            to_year: RuleEnd::Max,
            ..rule
        };
        let far = unix_time(2400, Month::January, 1, 0);
        assert_eq!(
            max.next_occurrence_after(far, 0),
            Some(unix_time(2400, Month::April, 30, 3600))
        );
    }

    #[test]
    fn offsets_and_dst() {
        let rule = us_spring();
        assert_eq!(rule.effective_offset(-21600), -18000);
        assert!(rule.is_dst());

        let fall = RuleRecord { save: 0, ..rule };
        assert_eq!(fall.effective_offset(-21600), -21600);
        assert!(!fall.is_dst());
    }
}
