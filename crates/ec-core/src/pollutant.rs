//! Pollutant names as they appear in emission events.

/// Particulate matter — the dose pollutant of the health-cost model.
pub const PM: &str = "PM";

/// Column order of the per-person emissions report.
pub const REPORT_POLLUTANTS: [&str; 11] = [
    "CO2(total)", "CH4", "N2O",
    "PM", "NOx", "SO2",
    "NO2", "HC", "CO", "NMHC", "FC",
];
