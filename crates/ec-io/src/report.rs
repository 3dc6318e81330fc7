//! Delimited report writers.
//!
//! Both reports are `;`-separated, unquoted, one row per line, with rows in
//! ascending person-id order.  Numbers are written with `f64`'s `Debug`
//! formatting, so whole values keep their fractional part (`0.0`).
//!
//! ```text
//! id;CO2(total);CH4;N2O;PM;NOx;SO2;NO2;HC;CO;NMHC;FC
//! 7;1520.5;0.0;0.0;0.25;3.0;0.0;0.0;0.0;0.0;0.0;0.0
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Writer, WriterBuilder};

use ec_core::{PersonId, REPORT_POLLUTANTS};

use crate::{EmissionsSummary, IoResult};

fn report_writer<W: Write>(sink: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Never)
        .from_writer(sink)
}

/// Writes an [`EmissionsSummary`] with one column per report pollutant.
/// Pollutants outside [`REPORT_POLLUTANTS`] are not written.
pub struct EmissionsPerPersonWriter<'a> {
    summary: &'a EmissionsSummary,
}

impl<'a> EmissionsPerPersonWriter<'a> {
    pub fn new(summary: &'a EmissionsSummary) -> Self {
        Self { summary }
    }

    /// Create (or truncate) `path` and write the report.
    pub fn write(&self, path: &Path) -> IoResult<()> {
        self.write_to(File::create(path)?)?;
        tracing::info!(
            path = %path.display(),
            persons = self.summary.person_count(),
            "wrote emissions report"
        );
        Ok(())
    }

    /// Write the report to any sink.
    pub fn write_to<W: Write>(&self, sink: W) -> IoResult<()> {
        let mut w = report_writer(sink);

        let mut header = Vec::with_capacity(REPORT_POLLUTANTS.len() + 1);
        header.push("id");
        header.extend(REPORT_POLLUTANTS);
        w.write_record(&header)?;

        for (person, _) in self.summary.iter() {
            let mut row = Vec::with_capacity(REPORT_POLLUTANTS.len() + 1);
            row.push(person.0.to_string());
            row.extend(
                REPORT_POLLUTANTS
                    .iter()
                    .map(|p| format!("{:?}", self.summary.get(person, p))),
            );
            w.write_record(&row)?;
        }
        w.flush()?;
        Ok(())
    }
}

/// Write `id;cost` rows for every person in `costs`.
pub fn write_person_costs<W: Write>(sink: W, costs: &BTreeMap<PersonId, f64>) -> IoResult<()> {
    let mut w = report_writer(sink);
    w.write_record(["id", "cost"])?;
    for (person, cost) in costs {
        w.write_record([person.0.to_string(), format!("{cost:?}")])?;
    }
    w.flush()?;
    Ok(())
}
