//! xsmall — smallest end-to-end run of the external-cost framework.
//!
//! Generates synthetic emission events for a few hundred persons on a 6 × 6
//! street grid, accumulates particulate exposure, prices every event with
//! the health-cost model and writes two reports:
//!
//! - `emissions_per_person.csv` — pollutant totals per person
//! - `costs_per_person.csv`     — health cost per person
//!
//! Usage: `xsmall [config.json]`.  Every config field is optional; see
//! [`RunConfig`].  Set `RUST_LOG=debug` for phase-level logging.

mod network;

use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use ec_core::{Congestion, Emissions, Externality, LinkId, PersonId};
use ec_costs::{CalculatorRegistry, EmissionHealthCostCalculator, HealthCostCoefficients};
use ec_exposure::{ExposureAggregator, ExposureConfig, ExposureSample, GaussianDispersion};
use ec_io::{EmissionsPerPersonWriter, EmissionsSummary, write_person_costs};
use ec_spatial::Topology;

use network::build_network;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunConfig {
    exposure:         ExposureConfig,
    health:           HealthCostCoefficients,
    /// Spread of the Gaussian kernel; `None` sums neighbours unweighted.
    dispersion_sigma: Option<f64>,
    persons:          u32,
    trips_per_person: usize,
    links_per_trip:   usize,
    seed:             u64,
    output_dir:       PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            exposure:         ExposureConfig::default(),
            health:           HealthCostCoefficients::default(),
            dispersion_sigma: None,
            persons:          400,
            trips_per_person: 3,
            links_per_trip:   6,
            seed:             42,
            output_dir:       PathBuf::from("output/xsmall"),
        }
    }
}

fn load_config() -> Result<RunConfig> {
    match std::env::args().nth(1) {
        None => Ok(RunConfig::default()),
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening config {path}"))?;
            serde_json::from_reader(file).with_context(|| format!("parsing config {path}"))
        }
    }
}

// ── Synthetic events ──────────────────────────────────────────────────────────

/// Grams per link traversal, drawn uniformly from these ranges.
const POLLUTANT_RANGES: [(&str, f64, f64); 5] = [
    ("CO2(total)", 150.0, 450.0),
    ("PM",         0.002, 0.030),
    ("NOx",        0.050, 0.600),
    ("CO",         0.100, 1.200),
    ("FC",         50.0,  140.0),
];

fn synthesize_events(cfg: &RunConfig, links: &[LinkId]) -> Vec<Externality> {
    let mut rng = SmallRng::seed_from_u64(cfg.seed);
    let mut events: Vec<Externality> = Vec::new();

    for p in 0..cfg.persons {
        let person_id = PersonId(p);
        for _ in 0..cfg.trips_per_person {
            // Departures between 06:00 and 22:00.
            let mut time = rng.gen_range(6.0 * 3_600.0..22.0 * 3_600.0);
            for _ in 0..cfg.links_per_trip {
                let Some(&link_id) = links.choose(&mut rng) else {
                    return events;
                };
                let pollutants: BTreeMap<String, f64> = POLLUTANT_RANGES
                    .iter()
                    .map(|&(name, lo, hi)| (name.to_owned(), rng.gen_range(lo..hi)))
                    .collect();
                events.push(Emissions { time, link_id, person_id, pollutants }.into());

                // One traversal in ten is congested.
                if rng.gen_bool(0.1) {
                    let delay_secs = rng.gen_range(5.0..120.0);
                    events.push(Congestion { time, link_id, person_id, delay_secs }.into());
                }
                time += rng.gen_range(20.0..90.0);
            }
        }
    }
    events
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = load_config()?;
    cfg.health.validate()?;

    println!("=== xsmall — external-cost framework ===");
    println!(
        "Persons: {}  |  Trips/person: {}  |  Seed: {}",
        cfg.persons, cfg.trips_per_person, cfg.seed
    );
    println!();

    // 1. Network and events.
    let (network, links) = build_network()?;
    println!(
        "Network: {} nodes, {} links ({} × {} grid, {} m spacing)",
        network.node_count(),
        network.link_count(),
        network::SIDE,
        network::SIDE,
        network::SPACING
    );
    let events = synthesize_events(&cfg, &links);
    println!("Events:  {}", events.len());

    // 2. Register: one exposure cell per link position.
    let t0 = Instant::now();
    let mut aggregator = ExposureAggregator::for_network(&network, &cfg.exposure)?;
    let registered = aggregator.register_network(&network);
    println!(
        "Grid:    {} × {} nominal cells, {} registered",
        aggregator.grid().cols(),
        aggregator.grid().rows(),
        registered
    );

    // 3. Accumulate the dose pollutant of every emissions event.
    let bins = aggregator.bins();
    let mut samples = Vec::with_capacity(events.len());
    for event in &events {
        if let Externality::Emissions(e) = event {
            samples.push(ExposureSample::new(
                network.link_coord(e.link_id)?,
                bins.bin_of(e.time)?,
                e.mass(&cfg.health.dose_pollutant),
            ));
        }
    }
    aggregator.accumulate_batch(&samples)?;
    tracing::info!(samples = samples.len(), "accumulation phase complete");

    // 4. Price every event against the completed grid.
    let kernel = cfg.dispersion_sigma.map(GaussianDispersion::new).transpose()?;
    let mut health = EmissionHealthCostCalculator::new(&aggregator, &network, cfg.health.clone())?;
    if let Some(k) = &kernel {
        health = health.with_kernel(k);
    }
    let mut registry = CalculatorRegistry::new();
    registry.register(health)?;

    let per_person = registry.costs_per_person(&events)?;
    let per_type = registry.costs_per_type(&events)?;
    let elapsed = t0.elapsed();

    // 5. Reports.
    std::fs::create_dir_all(&cfg.output_dir)?;
    let summary = EmissionsSummary::from_events(&events);
    EmissionsPerPersonWriter::new(&summary).write(&cfg.output_dir.join("emissions_per_person.csv"))?;
    write_person_costs(
        File::create(cfg.output_dir.join("costs_per_person.csv"))?,
        &per_person,
    )?;

    // 6. Summary.
    println!("Exposure + costs computed in {:.3} s", elapsed.as_secs_f64());
    for (tag, total) in &per_type {
        println!("  {tag:<24} {total:>12.4}");
    }
    println!();

    let mut ranked: Vec<(PersonId, f64)> = per_person.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    println!("{:<10} {:>12}", "Person", "Cost");
    println!("{}", "-".repeat(23));
    for (person, cost) in ranked.iter().take(5) {
        println!("{:<10} {:>12.4}", person.0, cost);
    }
    println!();
    println!("Reports written to {}", cfg.output_dir.display());

    Ok(())
}
