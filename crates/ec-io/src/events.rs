//! Emission-event CSV loader.
//!
//! # CSV format
//!
//! One row per emission event.  The first three columns are fixed; every
//! further column is a pollutant, named by its header.
//!
//! ```csv
//! time,link_id,person_id,PM,NOx,CO2(total)
//! 28800.0,12,7,0.25,3.0,1520.5
//! 28860.0,13,7,,2.5,1380.0
//! ```
//!
//! Empty pollutant cells are omitted from the event (mass treated as absent,
//! not zero).  Rows are returned in file order.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::{StringRecord, Trim};

use ec_core::{Emissions, Externality, LinkId, PersonId};

use crate::{IoError, IoResult};

const FIXED: [&str; 3] = ["time", "link_id", "person_id"];

/// Load emission events from a CSV file.
pub fn load_events_csv(path: &Path) -> IoResult<Vec<Externality>> {
    let file = std::fs::File::open(path)?;
    let events = load_events_reader(file)?;
    tracing::info!(path = %path.display(), events = events.len(), "loaded emission events");
    Ok(events)
}

/// Like [`load_events_csv`] but accepts any `Read` source.
pub fn load_events_reader<R: Read>(reader: R) -> IoResult<Vec<Externality>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for (i, name) in FIXED.iter().enumerate() {
        if headers.get(i) != Some(*name) {
            return Err(IoError::Parse {
                line: 1,
                msg: format!("expected column {i} to be {name:?}, found {:?}", headers.get(i)),
            });
        }
    }
    let pollutants: Vec<String> = headers.iter().skip(FIXED.len()).map(str::to_owned).collect();

    let mut events: Vec<Externality> = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        events.push(parse_row(&record, &pollutants)?.into());
    }
    Ok(events)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_row(record: &StringRecord, pollutants: &[String]) -> IoResult<Emissions> {
    let line = record.position().map_or(0, |p| p.line());

    let time: f64 = field(record, 0, line)?;
    let link_id: u32 = field(record, 1, line)?;
    let person_id: u32 = field(record, 2, line)?;

    let mut masses = BTreeMap::new();
    for (name, raw) in pollutants.iter().zip(record.iter().skip(FIXED.len())) {
        if raw.is_empty() {
            continue;
        }
        let mass: f64 = raw.parse().map_err(|e| IoError::Parse {
            line,
            msg: format!("{name}: {e}"),
        })?;
        masses.insert(name.clone(), mass);
    }

    Ok(Emissions {
        time,
        link_id: LinkId(link_id),
        person_id: PersonId(person_id),
        pollutants: masses,
    })
}

fn field<T>(record: &StringRecord, idx: usize, line: u64) -> IoResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = record.get(idx).unwrap_or_default();
    raw.parse().map_err(|e| IoError::Parse {
        line,
        msg: format!("{}: {e} ({raw:?})", FIXED[idx]),
    })
}
