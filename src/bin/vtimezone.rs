//! Command-line tool that reads zoneinfo text files and prints the
//! `VTIMEZONE` component for one zone.
//!
//! ```text
//! vtimezone -z Europe/Amsterdam tzdata/europe
//! ```

use std::env::args_os;
use std::error::Error;
use std::fs;
use std::process::exit;

use zoneinfo_vtimezone::table::parse;
use zoneinfo_vtimezone::timeline::ZoneTimeline;
use zoneinfo_vtimezone::vtimezone::vtimezone;

fn main() {
    if let Err(e) = generate() {
        eprintln!("{}", e);
        exit(1);
    }
}

fn generate() -> Result<(), Box<dyn Error>> {
    let mut opts = getopts::Options::new();
    opts.reqopt("z", "zone", "name of the time zone to render", "ZONE");

    let matches = opts.parse(args_os().skip(1))?;
    let zone = matches.opt_str("zone").unwrap();
    if matches.free.is_empty() {
        return Err("no input files given".into());
    }

    let mut input = String::new();
    for path in &matches.free {
        input.push_str(&fs::read_to_string(path)?);
        input.push('\n');
    }

    let (table, malformed) = parse(&input);
    for skipped in &malformed {
        eprintln!("{}", skipped);
    }

    let periods = table.timeline(&zone)?;
    print!("{}", vtimezone(&zone, &periods));
    Ok(())
}
