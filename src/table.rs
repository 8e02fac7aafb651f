//! Collecting parsed zoneinfo lines into an in-memory table.
//!
//! The `TableBuilder` accepts `Rule`, `Zone`, and continuation lines one at
//! a time, attaching continuation lines to the zone opened by the most
//! recent `Zone` line. The `parse` function drives it across a whole file,
//! collecting lines it cannot classify instead of aborting.

use std::collections::hash_map::{Entry, HashMap};
use std::fmt;

use crate::line::{self, EraEnd, Line, LineParser, SavingLine};
use crate::rule::RuleRecord;

/// A table of all the data in one or more zoneinfo files.
#[derive(PartialEq, Debug, Default)]
pub struct Table {
    /// Mapping of ruleset names to the rules that make them up.
    pub rulesets: HashMap<String, Vec<RuleRecord>>,
    /// Mapping of zone names to the eras that make up their definitions,
    /// in file order.
    pub zonesets: HashMap<String, Vec<ZoneEra>>,
    /// Rulesets whose lines matched the rule shape but failed the field
    /// grammar, mapped to a description of the first failure.
    pub(crate) poisoned_rulesets: HashMap<String, String>,
    /// Zones with a grammar failure in one of their own lines.
    pub(crate) poisoned_zones: HashMap<String, String>,
}

impl Table {
    /// The eras for the zone with the given name, if it is defined.
    pub fn get_zoneset(&self, zone_name: &str) -> Option<&[ZoneEra]> {
        self.zonesets.get(zone_name).map(|eras| &**eras)
    }
}

/// The amount of daylight saving in force during an era.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Saving {
    /// Just stick to the base offset.
    NoSaving,
    /// This amount of time is saved while the era is in effect, with no
    /// transitions of its own.
    OneOff(i64),
    /// The named ruleset determines how much time is saved, and when.
    Rules(String),
}

/// One era of a zone's definition: a base offset, a source of daylight
/// saving, an abbreviation format, and an optional end.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct ZoneEra {
    /// Seconds added to UTC to get this era's standard time.
    pub offset: i64,
    /// Where the daylight saving comes from.
    pub saving: Saving,
    /// The pattern zone abbreviations are generated from.
    pub format: Format,
    /// The instant this era ends, in its own local reference frame, or
    /// `None` for the final era.
    pub until: Option<EraEnd>,
}

impl<'a> From<line::EraLine<'a>> for ZoneEra {
    fn from(info: line::EraLine<'a>) -> ZoneEra {
        ZoneEra {
            offset: info.offset,
            saving: match info.saving {
                SavingLine::NoSaving => Saving::NoSaving,
                SavingLine::OneOff(seconds) => Saving::OneOff(seconds),
                SavingLine::Rules(name) => Saving::Rules(name.to_owned()),
            },
            format: Format::new(info.format),
            until: info.until,
        }
    }
}

/// The format string to generate a time zone abbreviation from.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Format {
    /// A constant format, which remains the same throughout the era.
    Constant(String),
    /// An alternate format, such as "PST/PDT", which changes depending on
    /// whether daylight saving is in effect.
    Alternate { standard: String, dst: String },
    /// A format with a placeholder `%s`, which uses the letter of the rule
    /// in force.
    Placeholder(String),
}

impl Format {
    pub(crate) fn new(template: &str) -> Format {
        if let Some(pos) = template.find('/') {
            Format::Alternate {
                standard: template[..pos].to_owned(),
                dst: template[pos + 1..].to_owned(),
            }
        } else if template.contains("%s") {
            Format::Placeholder(template.to_owned())
        } else {
            Format::Constant(template.to_owned())
        }
    }

    /// Renders the abbreviation for a period with the given amount of
    /// saving in force and the letter of the rule that put it there.
    ///
    /// A rule with no letter leaves nothing in place of the `%s`, which is
    /// how "CE%sT" produces "CET" in winter and "CEST" in summer.
    pub fn format(&self, dst_offset: i64, letter: Option<&str>) -> String {
        match self {
            Format::Constant(name) => name.clone(),
            Format::Alternate { standard, .. } if dst_offset == 0 => standard.clone(),
            Format::Alternate { dst, .. } => dst.clone(),
            Format::Placeholder(template) => template.replace("%s", letter.unwrap_or("")),
        }
    }
}

/// Errors that can occur while puzzling the lines of a file together.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Error {
    /// A continuation line was passed in, but the previous line wasn't a
    /// zone definition line.
    SurpriseContinuationLine,
    /// A zone definition referred to a zone that has already been defined.
    DuplicateZone(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::SurpriseContinuationLine => {
                write!(f, "continuation line with no zone line preceding it")
            }
            Error::DuplicateZone(name) => write!(f, "zone defined twice: \"{}\"", name),
        }
    }
}

impl std::error::Error for Error {}

/// Assembles a `Table` from parsed lines, fed to it one at a time.
#[derive(PartialEq, Debug, Default)]
pub struct TableBuilder {
    /// The table that lines are added to.
    table: Table,
    /// The name of the zone currently being built, if any. Used to match
    /// up which zone continuation lines belong to.
    current_zone: Option<String>,
}

impl TableBuilder {
    pub fn new() -> TableBuilder {
        TableBuilder::default()
    }

    /// Adds a rule line to the table, creating its ruleset if this is the
    /// first rule with its name.
    pub fn add_rule_line(&mut self, rule: line::Rule<'_>) {
        self.table
            .rulesets
            .entry(rule.name.to_owned())
            .or_default()
            .push(rule.into());
        self.current_zone = None;
    }

    /// Adds a zone line to the table, opening it for continuation lines.
    ///
    /// A duplicate definition is rejected, and also *closes* the open
    /// zone: the duplicate's continuation lines must not end up appended
    /// to whatever zone came before.
    pub fn add_zone_line(&mut self, zone: line::Zone<'_>) -> Result<(), Error> {
        match self.table.zonesets.entry(zone.name.to_owned()) {
            Entry::Occupied(_) => {
                self.current_zone = None;
                return Err(Error::DuplicateZone(zone.name.to_owned()));
            }
            Entry::Vacant(entry) => {
                entry.insert(vec![zone.era.into()]);
            }
        }
        self.current_zone = Some(zone.name.to_owned());
        Ok(())
    }

    /// Adds a continuation line to the zone most recently opened.
    pub fn add_continuation_line(&mut self, era: line::EraLine<'_>) -> Result<(), Error> {
        let name = self
            .current_zone
            .as_ref()
            .ok_or(Error::SurpriseContinuationLine)?;
        self.table
            .zonesets
            .get_mut(name)
            .ok_or(Error::SurpriseContinuationLine)?
            .push(era.into());
        Ok(())
    }

    /// Marks a ruleset as unusable because one of its lines failed the
    /// field grammar. The failure surfaces later, for the zones that
    /// actually refer to the set.
    pub fn poison_ruleset(&mut self, name: &str, detail: String) {
        self.table
            .poisoned_rulesets
            .entry(name.to_owned())
            .or_insert(detail);
    }

    /// Marks a zone as unusable because one of its own lines failed the
    /// field grammar.
    pub fn poison_zone(&mut self, name: &str, detail: String) {
        self.table
            .poisoned_zones
            .entry(name.to_owned())
            .or_insert(detail);
    }

    /// Marks a zone whose opening `Zone` line itself failed, and makes it
    /// the open zone so that its continuation lines attach to it rather
    /// than to whichever zone came before.
    pub fn poison_zone_line(&mut self, name: &str, detail: String) {
        self.poison_zone(name, detail);
        self.table.zonesets.entry(name.to_owned()).or_default();
        self.current_zone = Some(name.to_owned());
    }

    /// The zone a failing continuation line should be charged to, if one
    /// is open.
    pub fn current_zone(&self) -> Option<&str> {
        self.current_zone.as_deref()
    }

    /// Returns the table built from all the lines added so far.
    pub fn build(self) -> Table {
        self.table
    }
}

/// A line that did not match any record shape and was skipped.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Malformed {
    /// One-based line number within the input.
    pub line: usize,
    /// The text of the line, as found.
    pub text: String,
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: unrecognized record: \"{}\"", self.line, self.text)
    }
}

/// Parses the text of one or more concatenated zoneinfo files into a
/// `Table`, along with the lines that had to be skipped.
///
/// The loader is lenient about *shape*: lines that do not look like any
/// record are reported as `Malformed` and skipped. It is strict about
/// *fields*: a line that is recognizably a rule or a zone but has an
/// unparseable day, time, or offset poisons the named ruleset or zone, so
/// the failure is raised for the zones that depend on it rather than
/// silently dropped.
pub fn parse(input: &str) -> (Table, Vec<Malformed>) {
    let parser = LineParser::default();
    let mut builder = TableBuilder::new();
    let mut malformed = Vec::new();

    for (index, text) in input.lines().enumerate() {
        let number = index + 1;
        let skip = |malformed: &mut Vec<Malformed>| {
            malformed.push(Malformed {
                line: number,
                text: text.to_owned(),
            });
        };

        match parser.parse_str(text) {
            Ok(Line::Space) => {}

            // Link resolution is out of scope; the lines themselves are
            // still recognized so they don't show up as malformed.
            Ok(Line::Link(_)) => {}

            Ok(Line::Rule(rule)) => builder.add_rule_line(rule),

            Ok(Line::Zone(zone)) => {
                if builder.add_zone_line(zone).is_err() {
                    skip(&mut malformed);
                }
            }

            Ok(Line::Continuation(era)) => {
                if builder.add_continuation_line(era).is_err() {
                    skip(&mut malformed);
                }
            }

            Err(line::Error::InvalidLineType(_)) => skip(&mut malformed),

            Err(error) => {
                // The line matched a record shape but a field failed. Work
                // out which name to poison from the leading token.
                let mut fields = text.split_whitespace();
                match (fields.next(), fields.next()) {
                    (Some("Rule"), Some(name)) => {
                        builder.poison_ruleset(name, error.to_string());
                    }
                    (Some("Zone"), Some(name)) => {
                        builder.poison_zone_line(name, error.to_string());
                    }
                    _ => {
                        // A continuation line, if a zone is open to charge
                        // it to; otherwise nothing to poison.
                        match builder.current_zone().map(str::to_owned) {
                            Some(zone) => builder.poison_zone(&zone, error.to_string()),
                            None => skip(&mut malformed),
                        }
                    }
                }
            }
        }
    }

    (builder.build(), malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::{DayRule, Month, TimeType};

    #[test]
    fn continuation_lines_merge_into_one_zoneset() {
        let text = "\
Zone Europe/Madrid -0:14:44 -   LMT 1900 Dec 31 23:45:16
                   0:00    Spain   WE%sT   1940 Mar 16 23:00
                   1:00    Spain   CE%sT   1979
                   1:00    EU  CE%sT\n";
        let (table, malformed) = parse(text);
        assert!(malformed.is_empty());

        let eras = table.get_zoneset("Europe/Madrid").unwrap();
        assert_eq!(eras.len(), 4);
        assert_eq!(eras[0].offset, -(14 * 60 + 44));
        assert_eq!(eras[0].saving, Saving::NoSaving);
        assert_eq!(eras[1].saving, Saving::Rules("Spain".to_owned()));
        assert_eq!(eras[3].until, None);
        assert_eq!(
            eras[2].until,
            Some(EraEnd {
                year: 1979,
                month: Month::January,
                day: DayRule::Ordinal(1),
                time: 0,
                time_type: TimeType::Wall,
            })
        );
    }

    #[test]
    fn rules_group_by_name_in_declaration_order() {
        let text = "\
Rule  EU  1981  max   -  Mar  lastSun  1:00u  1:00  S
Rule  EU  1996  max   -  Oct  lastSun  1:00u  0     -
Rule  US  1967  1973  -  Apr  lastSun  2:00   1:00  D\n";
        let (table, malformed) = parse(text);
        assert!(malformed.is_empty());

        let eu = &table.rulesets["EU"];
        assert_eq!(eu.len(), 2);
        assert_eq!(eu[0].month, Month::March);
        assert_eq!(eu[1].month, Month::October);
        assert_eq!(table.rulesets["US"].len(), 1);
    }

    #[test]
    fn unrecognizable_lines_are_skipped_not_fatal() {
        let text = "\
this is not a record
Zone Etc/GMT 0:00 - GMT\n";
        let (table, malformed) = parse(text);
        assert_eq!(malformed.len(), 1);
        assert_eq!(malformed[0].line, 1);
        assert!(table.get_zoneset("Etc/GMT").is_some());
    }

    #[test]
    fn continuation_without_zone_is_malformed() {
        let text = "\
Rule  EU  1981  max  -  Mar  lastSun  1:00u  1:00  S
    1:00  EU  CE%sT\n";
        let (table, malformed) = parse(text);
        assert_eq!(malformed.len(), 1);
        assert_eq!(malformed[0].line, 2);
        assert_eq!(table.rulesets["EU"].len(), 1);
    }

    #[test]
    fn bad_rule_field_poisons_the_ruleset() {
        let text = "\
Rule  Broken  1990  only  -  Mar  Blah>=3  2:00  1:00  D
Zone Etc/GMT 0:00 - GMT\n";
        let (table, malformed) = parse(text);
        assert!(malformed.is_empty());
        assert!(table.poisoned_rulesets.contains_key("Broken"));
        assert!(table.get_zoneset("Etc/GMT").is_some());
    }

    #[test]
    fn bad_continuation_field_poisons_the_open_zone() {
        let text = "\
Zone Test/Bad 1:00 - CET 1980
    1:00 - CET 1990 Febtober
Zone Etc/GMT 0:00 - GMT\n";
        let (table, malformed) = parse(text);
        assert!(malformed.is_empty());
        assert!(table.poisoned_zones.contains_key("Test/Bad"));
        assert!(!table.poisoned_zones.contains_key("Etc/GMT"));
    }

    #[test]
    fn duplicate_zone_is_skipped() {
        let text = "\
Zone Etc/GMT 0:00 - GMT
Zone Etc/GMT 1:00 - CET\n";
        let (table, malformed) = parse(text);
        assert_eq!(malformed.len(), 1);
        assert_eq!(table.get_zoneset("Etc/GMT").unwrap()[0].offset, 0);
    }

    #[test]
    fn continuation_after_duplicate_zone_does_not_touch_the_original() {
        let text = "\
Zone Test/A 0:00 - GMT 1980
    1:00 - CET
Zone Test/A 2:00 - EET 1990
    3:00 - FET\n";
        let (table, malformed) = parse(text);
        // The duplicate line is skipped and closes the open zone, so its
        // continuation has nowhere to go and is reported too.
        assert_eq!(malformed.len(), 2);
        assert_eq!(malformed[0].line, 3);
        assert_eq!(malformed[1].line, 4);
        assert_eq!(table.get_zoneset("Test/A").unwrap().len(), 2);
    }

    #[test]
    fn continuation_after_poisoned_zone_line_stays_with_it() {
        let text = "\
Zone Test/A 0:00 - GMT 1980
    1:00 - CET
Zone Test/B 0:00 - GMT 1990 Febtober
    2:00 - EET\n";
        let (table, malformed) = parse(text);
        assert!(malformed.is_empty());
        // The earlier zone keeps exactly its own eras.
        assert_eq!(table.get_zoneset("Test/A").unwrap().len(), 2);
        assert!(!table.poisoned_zones.contains_key("Test/A"));
        assert!(table.poisoned_zones.contains_key("Test/B"));
    }

    #[test]
    fn format_rendering() {
        let constant = Format::new("LMT");
        assert_eq!(constant.format(0, None), "LMT");
        assert_eq!(constant.format(3600, Some("S")), "LMT");

        let placeholder = Format::new("CE%sT");
        assert_eq!(placeholder.format(3600, Some("S")), "CEST");
        assert_eq!(placeholder.format(0, None), "CET");

        let alternate = Format::new("PST/PDT");
        assert_eq!(alternate.format(0, Some("S")), "PST");
        assert_eq!(alternate.format(3600, None), "PDT");
    }
}
