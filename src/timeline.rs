//! Turning a zone's eras and rules into a chronological list of periods.
//!
//! A `TransitionPeriod` is one stretch of time during which a zone keeps a
//! single UTC offset. The list for a zone is sorted by start, contiguous
//! (each period ends exactly where the next begins), and finite even when
//! the final era carries `max` rules: each participating rule contributes
//! one period, opened at its first firing within the era, and the last
//! period of the final era is left open-ended.

use std::fmt;

use crate::rule::RuleRecord;
use crate::table::{Saving, Table, ZoneEra};

/// One stretch of a zone's history with a constant UTC offset.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TransitionPeriod {
    /// When the period begins, as a UTC timestamp. `None` for the first
    /// period of a zone, which extends indefinitely into the past.
    pub start_utc: Option<i64>,
    /// When the period ends, which is exactly where the next one starts.
    /// `None` for the final period.
    pub end_utc: Option<i64>,
    /// The total offset in force just before this period began.
    pub offset_from: i64,
    /// The total offset in force throughout this period.
    pub offset_to: i64,
    /// Whether daylight saving is in effect during this period.
    pub is_dst: bool,
    /// The zone abbreviation for this period, such as "CEST".
    pub abbreviation: String,
    /// Where the period came from: the name of the ruleset that fired, or
    /// a description of the era for fixed and leading periods.
    pub label: String,
}

/// Things that can go wrong while generating a timeline.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Error {
    /// The requested zone is not defined in the table.
    UnknownZone(String),
    /// An era of the zone names a ruleset that is not defined.
    UnknownRuleSet { zone: String, rule_set: String },
    /// A ruleset or era the zone depends on had lines whose fields failed
    /// the grammar at load time.
    InvalidRuleFormat {
        zone: String,
        source: String,
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownZone(name) => write!(f, "unknown zone: \"{}\"", name),
            Error::UnknownRuleSet { zone, rule_set } => {
                write!(
                    f,
                    "zone \"{}\" refers to a ruleset that is not defined: \"{}\"",
                    zone, rule_set
                )
            }
            Error::InvalidRuleFormat {
                zone,
                source,
                detail,
            } => {
                write!(
                    f,
                    "zone \"{}\" depends on \"{}\", which failed to parse: {}",
                    zone, source, detail
                )
            }
        }
    }
}

impl std::error::Error for Error {}

/// Generating the transition timeline for one named zone.
pub trait ZoneTimeline {
    /// Every period of constant UTC offset in the zone's history, in
    /// chronological order, or an error if the zone or the rulesets it
    /// refers to are missing or unusable.
    fn timeline(&self, zone_name: &str) -> Result<Vec<TransitionPeriod>, Error>;
}

impl ZoneTimeline for Table {
    fn timeline(&self, zone_name: &str) -> Result<Vec<TransitionPeriod>, Error> {
        let eras = self
            .get_zoneset(zone_name)
            .ok_or_else(|| Error::UnknownZone(zone_name.to_owned()))?;

        if let Some(detail) = self.poisoned_zones.get(zone_name) {
            return Err(Error::InvalidRuleFormat {
                zone: zone_name.to_owned(),
                source: zone_name.to_owned(),
                detail: detail.clone(),
            });
        }

        let mut builder = TimelineBuilder::default();
        for (index, era) in eras.iter().enumerate() {
            match &era.saving {
                Saving::NoSaving => builder.fixed_era(index, era, 0),
                Saving::OneOff(amount) => builder.fixed_era(index, era, *amount),
                Saving::Rules(name) => {
                    if let Some(detail) = self.poisoned_rulesets.get(name) {
                        return Err(Error::InvalidRuleFormat {
                            zone: zone_name.to_owned(),
                            source: name.clone(),
                            detail: detail.clone(),
                        });
                    }
                    let rules = self.rulesets.get(name).ok_or_else(|| Error::UnknownRuleSet {
                        zone: zone_name.to_owned(),
                        rule_set: name.clone(),
                    })?;
                    builder.ruled_era(index, era, name, rules);
                }
            }

            // A missing end means the era runs forever; anything written
            // after it in the file could never take effect.
            if era.until.is_none() {
                break;
            }
        }
        Ok(builder.periods)
    }
}

/// Walks the eras of one zone in file order, carrying the offset and the
/// end instant of whatever came before across era boundaries.
#[derive(Default)]
struct TimelineBuilder {
    periods: Vec<TransitionPeriod>,
    /// UTC start of the era being processed; `None` only for the first.
    era_start: Option<i64>,
    /// The total offset in force when the previous era ended.
    previous_offset: Option<i64>,
}

impl TimelineBuilder {
    fn push(
        &mut self,
        start_utc: Option<i64>,
        end_utc: Option<i64>,
        offset_to: i64,
        is_dst: bool,
        abbreviation: String,
        label: String,
    ) {
        let offset_from = self.previous_offset.unwrap_or(offset_to);
        self.periods.push(TransitionPeriod {
            start_utc,
            end_utc,
            offset_from,
            offset_to,
            is_dst,
            abbreviation,
            label,
        });
        self.previous_offset = Some(offset_to);
    }

    /// An era with no rules: a single period covering the whole era.
    fn fixed_era(&mut self, index: usize, era: &ZoneEra, amount: i64) {
        let until = era.until.map(|end| end.to_utc(era.offset, amount));
        self.push(
            self.era_start,
            until,
            era.offset + amount,
            amount != 0,
            era.format.format(amount, None),
            format!("era {}", index),
        );
        self.era_start = until;
    }

    /// An era governed by a ruleset: a leading period carrying whatever
    /// saving is in force when the era opens, then one period per rule,
    /// opened at the rule's first firing inside the era.
    fn ruled_era(&mut self, index: usize, era: &ZoneEra, name: &str, rules: &[RuleRecord]) {
        // The rule already in force at the era start: the one with the
        // latest firing strictly before it. Ties go to declaration order.
        let active = self.era_start.and_then(|start| {
            rules
                .iter()
                .enumerate()
                .filter_map(|(i, rule)| {
                    rule.most_recent_occurrence_before(start, era.offset)
                        .map(|occurrence| (i, occurrence))
                })
                .max_by_key(|&(i, occurrence)| (occurrence, std::cmp::Reverse(i)))
                .map(|(i, _)| &rules[i])
        });

        // Each rule's first firing within the era, in order. When two
        // rules fire at the same instant the earlier declaration wins and
        // the later one contributes nothing there.
        let mut firings: Vec<(i64, usize)> = rules
            .iter()
            .enumerate()
            .filter_map(|(i, rule)| {
                let firing = match self.era_start {
                    Some(start) => rule.next_occurrence_after(start, era.offset),
                    None => Some(rule.start_time(era.offset)),
                };
                firing.map(|f| (f, i))
            })
            .collect();
        firings.sort_unstable();
        firings.dedup_by_key(|&mut (firing, _)| firing);

        let mut save = active.map_or(0, |rule| rule.save);
        let mut start = self.era_start;
        let mut abbreviation = era.format.format(save, active.and_then(|r| r.letter.as_deref()));
        let mut label = match active {
            Some(_) => name.to_owned(),
            None => format!("era {}", index),
        };

        for (firing, i) in firings {
            let rule = &rules[i];
            // The era boundary is expressed in local time, so where it
            // falls in UTC depends on the saving in force. A firing only
            // takes effect if the era is still running both under the
            // saving before it and under the saving it establishes;
            // otherwise the boundary wins and the era is over.
            if let Some(end) = era.until {
                let outgoing = end.to_utc(era.offset, save);
                let incoming = end.to_utc(era.offset, rule.save);
                if firing >= outgoing || firing >= incoming {
                    break;
                }
            }
            self.push(
                start,
                Some(firing),
                era.offset + save,
                save != 0,
                abbreviation,
                label,
            );
            save = rule.save;
            start = Some(firing);
            abbreviation = era.format.format(save, rule.letter.as_deref());
            label = name.to_owned();
        }

        let until = era.until.map(|e| e.to_utc(era.offset, save));
        self.push(start, until, era.offset + save, save != 0, abbreviation, label);
        self.era_start = until;
    }
}
