//! Tests that run the whole pipeline, from zoneinfo text to periods.

use zoneinfo_vtimezone::table::parse;
use zoneinfo_vtimezone::timeline::{Error, ZoneTimeline};

// A lightly trimmed version of the real Europe/Amsterdam definition,
// covering a local-mean-time era, wartime rule changes, and the open-ended
// EU era.
static AMSTERDAM: &str = "
Rule    Neth    1916    only    -   May  1     0:00    1:00    NST
Rule    Neth    1916    only    -   Oct  1     0:00    0       AMT
Rule    Neth    1917    only    -   Apr 16     2:00s   1:00    NST
Rule    Neth    1917    only    -   Sep 17     2:00s   0       AMT
Rule    Neth    1918    1921    -   Apr Mon>=1 2:00s   1:00    NST
Rule    Neth    1918    1921    -   Sep lastMon 2:00s  0       AMT
Rule    Neth    1922    only    -   Mar lastSun 2:00s  1:00    NST
Rule    Neth    1922    1936    -   Oct Sun>=2 2:00s   0       AMT
Rule    Neth    1923    only    -   Jun Fri>=1 2:00s   1:00    NST
Rule    Neth    1924    only    -   Mar lastSun 2:00s  1:00    NST
Rule    Neth    1925    only    -   Jun Fri>=1 2:00s   1:00    NST
Rule    Neth    1926    1931    -   May 15     2:00s   1:00    NST
Rule    Neth    1932    only    -   May 22     2:00s   1:00    NST
Rule    Neth    1933    1936    -   May 15     2:00s   1:00    NST
Rule    Neth    1937    only    -   May 22     2:00s   1:00    NST
Rule    Neth    1937    only    -   Jul  1     0:00    1:00    S
Rule    Neth    1937    1939    -   Oct Sun>=2 2:00s   0       -
Rule    Neth    1938    1939    -   May 15     2:00s   1:00    S
Rule    Neth    1945    only    -   Apr  2     2:00s   1:00    S
Rule    Neth    1945    only    -   Sep 16     2:00s   0       -
Rule    C-Eur   1916    only    -   Apr 30     23:00   1:00    S
Rule    C-Eur   1916    only    -   Oct  1     1:00    0       -
Rule    C-Eur   1917    1918    -   Apr Mon>=15 2:00s  1:00    S
Rule    C-Eur   1917    1918    -   Sep Mon>=15 2:00s  0       -
Rule    C-Eur   1940    only    -   Apr  1     2:00s   1:00    S
Rule    C-Eur   1942    only    -   Nov  2     2:00s   0       -
Rule    C-Eur   1943    only    -   Mar 29     2:00s   1:00    S
Rule    C-Eur   1943    only    -   Oct  4     2:00s   0       -
Rule    C-Eur   1944    1945    -   Apr Mon>=1 2:00s   1:00    S
Rule    C-Eur   1944    only    -   Oct  2     2:00s   0       -
Rule    EU      1977    1980    -   Apr Sun>=1 1:00u   1:00    S
Rule    EU      1977    only    -   Sep lastSun 1:00u  0       -
Rule    EU      1978    only    -   Oct  1     1:00u   0       -
Rule    EU      1979    1995    -   Sep lastSun 1:00u  0       -
Rule    EU      1981    max     -   Mar lastSun 1:00u  1:00    S
Rule    EU      1996    max     -   Oct lastSun 1:00u  0       -

Zone Europe/Amsterdam   0:19:32 -       LMT     1835
                        0:19:32 Neth    AMT/NST 1937 Jul  1
                        0:20    Neth    +0020/+0120 1940 May 16  0:00
                        1:00    C-Eur   CE%sT   1945 Apr  2  2:00
                        1:00    Neth    CE%sT   1977
                        1:00    EU      CE%sT
";

#[test]
fn amsterdam_history() {
    let (table, malformed) = parse(AMSTERDAM);
    assert_eq!(malformed, vec![]);

    let periods = table.timeline("Europe/Amsterdam").unwrap();
    assert!(periods.len() > 10);

    // The zone opens with its local-mean-time era, reaching indefinitely
    // into the past.
    let first = &periods[0];
    assert_eq!(first.start_utc, None);
    assert_eq!(first.offset_to, 19 * 60 + 32);
    assert!(!first.is_dst);
    assert_eq!(first.abbreviation, "LMT");

    // Since 1996 the zone sits at +01:00 outside of summer, forever.
    let last = periods.last().unwrap();
    assert_eq!(last.end_utc, None);
    assert_eq!(last.offset_to, 3600);
    assert!(!last.is_dst);
    assert_eq!(last.abbreviation, "CET");
    assert_eq!(last.label, "EU");

    // Summers under the EU rules are +02:00.
    assert!(periods
        .iter()
        .any(|p| p.is_dst && p.offset_to == 7200 && p.abbreviation == "CEST"));
}

#[test]
fn amsterdam_periods_are_sorted_and_contiguous() {
    let (table, _) = parse(AMSTERDAM);
    let periods = table.timeline("Europe/Amsterdam").unwrap();

    assert_eq!(
        periods.iter().filter(|p| p.start_utc.is_none()).count(),
        1
    );
    assert_eq!(periods.iter().filter(|p| p.end_utc.is_none()).count(), 1);

    for pair in periods.windows(2) {
        // Contiguous: each period ends exactly where the next begins, and
        // hands its offset over.
        assert_eq!(pair[0].end_utc, pair[1].start_utc);
        assert_eq!(pair[0].offset_to, pair[1].offset_from);

        // Sorted, with no zero-length periods.
        if let (Some(start), Some(end)) = (pair[0].start_utc, pair[0].end_utc) {
            assert!(start < end);
        }
    }
}

#[test]
fn unknown_zone_is_an_error() {
    let (table, _) = parse(AMSTERDAM);
    assert_eq!(
        table.timeline("Europe/Rotterdam"),
        Err(Error::UnknownZone("Europe/Rotterdam".to_owned()))
    );
}

#[test]
fn missing_ruleset_is_an_error() {
    let (table, malformed) = parse("Zone Test/NoRules 1:00 Ghost X%sT\n");
    assert!(malformed.is_empty());
    assert_eq!(
        table.timeline("Test/NoRules"),
        Err(Error::UnknownRuleSet {
            zone: "Test/NoRules".to_owned(),
            rule_set: "Ghost".to_owned(),
        })
    );
}

#[test]
fn poisoned_ruleset_fails_only_dependent_zones() {
    let text = "
Rule Broken 1990 only - Mar Blah>=3 2:00 1:00 D
Zone Test/Broken 1:00 Broken X%sT
Zone Test/Fine 0:00 - GMT
";
    let (table, malformed) = parse(text);
    assert!(malformed.is_empty());

    match table.timeline("Test/Broken") {
        Err(Error::InvalidRuleFormat { zone, source, .. }) => {
            assert_eq!(zone, "Test/Broken");
            assert_eq!(source, "Broken");
        }
        other => panic!("expected InvalidRuleFormat, got {:?}", other),
    }

    assert!(table.timeline("Test/Fine").is_ok());
}
