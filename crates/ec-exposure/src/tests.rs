//! Unit tests for ec-exposure.

#[cfg(test)]
mod helpers {
    use ec_core::BoundingBox;

    use crate::{ExposureAggregator, ExposureConfig, RegistrationPolicy};

    pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    pub fn config(no_time_bins: usize, registration: RegistrationPolicy) -> ExposureConfig {
        ExposureConfig {
            cell_size: 10.0,
            time_bin_size: 3_600,
            no_time_bins,
            exposure_distance: 15.0,
            registration,
        }
    }

    /// `[0,0]–[100,100]` box with 10-unit cells: an 11 × 11 grid.
    pub fn aggregator(no_time_bins: usize, registration: RegistrationPolicy) -> ExposureAggregator {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        ExposureAggregator::new(bbox, &config(no_time_bins, registration)).unwrap()
    }

    /// Per-bin sums over all registered cells.
    pub fn cell_sums(agg: &ExposureAggregator) -> Vec<f64> {
        let mut sums = vec![0.0; agg.bins().count()];
        for (_, cell) in agg.index().cells() {
            for (s, e) in sums.iter_mut().zip(cell.exposure()) {
                *s += e;
            }
        }
        sums
    }
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use ec_core::{BoundingBox, Coord};
    use ec_spatial::{GridGeometry, GridKey};

    use crate::{CellId, SpatialIndex};

    fn index() -> SpatialIndex {
        let grid = GridGeometry::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0), 10.0).unwrap();
        SpatialIndex::new(grid, 4)
    }

    #[test]
    fn register_snaps_and_zeroes() {
        let mut idx = index();
        let id = idx.register(Coord::new(14.0, 26.0));
        let cell = idx.cell(id);
        assert_eq!(cell.key(), GridKey::new(1, 3));
        assert_eq!(cell.coord(), Coord::new(10.0, 30.0));
        assert_eq!(cell.exposure(), &[0.0; 4]);
    }

    #[test]
    fn register_same_cell_twice_returns_same_id() {
        let mut idx = index();
        let a = idx.register(Coord::new(10.0, 10.0));
        let b = idx.register(Coord::new(12.0, 8.0));
        assert_eq!(a, b);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.cell_at(Coord::new(11.0, 11.0)), Some(a));
        assert_eq!(idx.cell_at(Coord::new(30.0, 30.0)), None);
    }

    #[test]
    fn nearest_on_empty_index() {
        assert!(index().nearest(Coord::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_picks_closest_cell() {
        let mut idx = index();
        let a = idx.register(Coord::new(0.0, 0.0));
        let b = idx.register(Coord::new(50.0, 50.0));
        assert_eq!(idx.nearest(Coord::new(20.0, 20.0)), Some(a));
        assert_eq!(idx.nearest(Coord::new(40.0, 35.0)), Some(b));
        // Far outside the grid still resolves.
        assert_eq!(idx.nearest(Coord::new(1.0e6, 1.0e6)), Some(b));
    }

    #[test]
    fn nearest_tie_goes_to_earliest_registered() {
        let mut idx = index();
        let right = idx.register(Coord::new(20.0, 0.0));
        let left = idx.register(Coord::new(0.0, 0.0));
        assert_eq!(right, CellId(0));
        assert_eq!(left, CellId(1));
        assert_eq!(idx.nearest(Coord::new(10.0, 0.0)), Some(right));
    }

    #[test]
    fn disk_is_inclusive() {
        let mut idx = index();
        let a = idx.register(Coord::new(10.0, 10.0));
        let b = idx.register(Coord::new(20.0, 10.0));
        let _far = idx.register(Coord::new(90.0, 90.0));
        assert_eq!(idx.disk(Coord::new(10.0, 10.0), 10.0), vec![a, b]);
        assert_eq!(idx.disk(Coord::new(10.0, 10.0), 9.99), vec![a]);
        assert!(idx.disk(Coord::new(10.0, 10.0), -1.0).is_empty());
        assert!(idx.disk(Coord::new(10.0, 10.0), f64::NAN).is_empty());
    }

    #[test]
    fn disk_with_huge_radius_scans_all_cells() {
        let mut idx = index();
        for k in 0..5 {
            idx.register(Coord::new(k as f64 * 20.0, 0.0));
        }
        let hits = idx.disk(Coord::new(50.0, 50.0), 1.0e9);
        assert_eq!(hits, (0..5).map(CellId).collect::<Vec<_>>());
    }

    #[test]
    fn unbounded_queries_do_not_overflow() {
        let mut idx = index();
        let a = idx.register(Coord::new(10.0, 10.0));
        let b = idx.register(Coord::new(-500.0, 900.0));
        let all = vec![a, b];
        assert_eq!(idx.disk(Coord::new(0.0, 0.0), f64::MAX), all);
        assert_eq!(idx.disk(Coord::new(0.0, 0.0), f64::INFINITY), all);
        assert_eq!(
            idx.rectangle(Coord::new(-f64::MAX, -f64::MAX), Coord::new(f64::MAX, f64::MAX)),
            all
        );
        assert!(idx.contains_any(Coord::new(0.0, 0.0), f64::MAX));
    }

    #[test]
    fn rectangle_and_contains_any() {
        let mut idx = index();
        let a = idx.register(Coord::new(10.0, 10.0));
        assert_eq!(idx.rectangle(Coord::new(10.0, 10.0), Coord::new(10.0, 10.0)), vec![a]);
        assert!(idx.contains_any(Coord::new(14.0, 14.0), 10.0));
        assert!(idx.contains_any(Coord::new(15.0, 5.0), 10.0)); // edge inclusive
        assert!(!idx.contains_any(Coord::new(16.0, 16.0), 10.0));
        assert!(!index().contains_any(Coord::new(0.0, 0.0), 10.0));
    }
}

// ── ExposureAggregator ────────────────────────────────────────────────────────

#[cfg(test)]
mod aggregator {
    use std::collections::{BTreeMap, HashMap};

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use ec_core::{Congestion, Coord, CoreError, Emissions, Externality, LinkId, NodeId, PersonId, PM};
    use ec_spatial::{NetworkBuilder, SpatialError};

    use super::helpers::{aggregator, approx_eq, cell_sums, config};
    use crate::{
        ExposureAggregator, ExposureConfig, ExposureError, GaussianDispersion, RegistrationPolicy,
    };

    #[test]
    fn end_to_end_scenario() {
        let mut agg = aggregator(1, RegistrationPolicy::NearestExisting);
        assert_eq!(agg.no_cells(), 121);

        let a = agg.register(Coord::new(5.0, 5.0));
        let b = agg.register(Coord::new(15.0, 5.0));
        assert_eq!(agg.index().cell(b).coord(), Coord::new(20.0, 10.0));
        let hit = agg.accumulate(Coord::new(5.0, 5.0), 0, 10.0).unwrap();
        assert_eq!(hit, a);

        assert_eq!(agg.total(0), 10.0);
        assert!(approx_eq(agg.average_exposure(0), 10.0 / 121.0, 1e-12));
        // Half-up snapping puts the second cell at (20,10), about 15.8 away.
        assert_eq!(agg.index().disk(Coord::new(5.0, 5.0), 15.0), vec![a]);
        let factor = agg.exposure_factor(Coord::new(5.0, 5.0), 0);
        assert!(approx_eq(factor, 121.0, 1e-9), "got {factor}");
    }

    #[test]
    fn factor_sums_neighbours_without_averaging() {
        let mut agg = aggregator(1, RegistrationPolicy::AutoRegister);
        agg.accumulate(Coord::new(50.0, 50.0), 0, 4.0).unwrap();
        agg.accumulate(Coord::new(60.0, 50.0), 0, 6.0).unwrap();
        agg.accumulate(Coord::new(0.0, 0.0), 0, 10.0).unwrap();
        // Both (50,50) and (60,50) are within 15 of (55,50): sum 10, avg 20/121.
        let factor = agg.exposure_factor(Coord::new(55.0, 50.0), 0);
        assert!(approx_eq(factor, 10.0 / (20.0 / 121.0), 1e-9), "got {factor}");
    }

    #[test]
    fn zero_average_guard() {
        let mut agg = aggregator(2, RegistrationPolicy::AutoRegister);
        assert_eq!(agg.exposure_factor(Coord::new(5.0, 5.0), 0), 0.0);
        agg.accumulate(Coord::new(5.0, 5.0), 1, 3.0).unwrap();
        // Bin 0 is still empty everywhere.
        assert_eq!(agg.exposure_factor(Coord::new(5.0, 5.0), 0), 0.0);
        assert!(agg.exposure_factor(Coord::new(5.0, 5.0), 1) > 0.0);
        // Out-of-range bins read as empty.
        assert_eq!(agg.exposure_factor(Coord::new(5.0, 5.0), 7), 0.0);
    }

    #[test]
    fn factor_is_zero_far_from_any_exposure() {
        let mut agg = aggregator(1, RegistrationPolicy::AutoRegister);
        agg.accumulate(Coord::new(0.0, 0.0), 0, 1.0).unwrap();
        assert_eq!(agg.exposure_factor(Coord::new(100.0, 100.0), 0), 0.0);
    }

    #[test]
    fn reregistration_preserves_histogram() {
        let mut agg = aggregator(3, RegistrationPolicy::Strict);
        let id = agg.register(Coord::new(30.0, 30.0));
        agg.accumulate(Coord::new(31.0, 29.0), 2, 5.0).unwrap();
        let before = agg.index().cell(id).exposure().to_vec();

        assert_eq!(agg.register(Coord::new(30.0, 30.0)), id);
        assert_eq!(agg.index().cell(id).exposure(), before.as_slice());
        assert_eq!(before, vec![0.0, 0.0, 5.0]);
    }

    #[test]
    fn accumulator_consistency() {
        let mut agg = aggregator(6, RegistrationPolicy::AutoRegister);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let pos = Coord::new(rng.gen_range(-20.0..120.0), rng.gen_range(-20.0..120.0));
            let bin = rng.gen_range(0..6);
            let amount = rng.gen_range(0.0..5.0);
            agg.accumulate(pos, bin, amount).unwrap();
        }
        let sums = cell_sums(&agg);
        for (bin, (sum, total)) in sums.iter().zip(agg.totals()).enumerate() {
            assert!(approx_eq(*sum, *total, 1e-9), "bin {bin}: {sum} vs {total}");
        }
    }

    #[test]
    fn auto_register_does_not_misattribute() {
        let mut agg = aggregator(1, RegistrationPolicy::AutoRegister);
        let near = agg.register(Coord::new(0.0, 0.0));
        let far = agg.accumulate(Coord::new(90.0, 90.0), 0, 2.0).unwrap();
        assert_ne!(near, far);
        assert_eq!(agg.index().cell(near).exposure_at(0), 0.0);
        assert_eq!(agg.index().cell(far).exposure_at(0), 2.0);
        assert_eq!(agg.index().cell(far).coord(), Coord::new(90.0, 90.0));
    }

    #[test]
    fn strict_policy_rejects_unregistered() {
        let mut agg = aggregator(1, RegistrationPolicy::Strict);
        let err = agg.accumulate(Coord::new(40.0, 40.0), 0, 1.0).unwrap_err();
        assert!(matches!(err, ExposureError::Unregistered(_)));
        assert_eq!(agg.total(0), 0.0);

        agg.register(Coord::new(40.0, 40.0));
        agg.accumulate(Coord::new(40.0, 40.0), 0, 1.0).unwrap();
        assert_eq!(agg.total(0), 1.0);
    }

    #[test]
    fn nearest_policy_attributes_to_existing_cell() {
        let mut agg = aggregator(1, RegistrationPolicy::NearestExisting);
        assert!(matches!(
            agg.accumulate(Coord::new(0.0, 0.0), 0, 1.0),
            Err(ExposureError::NoCells)
        ));
        let only = agg.register(Coord::new(0.0, 0.0));
        assert_eq!(agg.accumulate(Coord::new(100.0, 100.0), 0, 1.0).unwrap(), only);
        assert_eq!(agg.index().len(), 1);
    }

    #[test]
    fn invalid_samples_are_rejected() {
        let mut agg = aggregator(2, RegistrationPolicy::AutoRegister);
        assert!(matches!(
            agg.accumulate(Coord::new(0.0, 0.0), 2, 1.0),
            Err(ExposureError::BinOutOfRange { bin: 2, count: 2 })
        ));
        assert!(matches!(
            agg.accumulate(Coord::new(0.0, 0.0), 0, f64::NAN),
            Err(ExposureError::NonFiniteAmount(_))
        ));
        assert!(agg.index().is_empty());
    }

    #[test]
    fn ingest_emissions_events() {
        let mut agg = aggregator(24, RegistrationPolicy::AutoRegister);
        let mut topo = HashMap::new();
        topo.insert(LinkId(1), Coord::new(50.0, 50.0));

        let mut pollutants = BTreeMap::new();
        pollutants.insert(PM.to_owned(), 2.5);
        pollutants.insert("NOx".to_owned(), 9.0);
        let event = Emissions { time: 7_300.0, link_id: LinkId(1), person_id: PersonId(1), pollutants };

        assert!(agg.ingest(&Externality::from(event.clone()), &topo, PM).unwrap());
        assert_eq!(agg.total(2), 2.5);

        let congestion = Congestion {
            time: 0.0,
            link_id: LinkId(1),
            person_id: PersonId(1),
            delay_secs: 12.0,
        };
        assert!(!agg.ingest(&Externality::from(congestion), &topo, PM).unwrap());

        let mut unknown = event.clone();
        unknown.link_id = LinkId(2);
        assert!(matches!(
            agg.ingest(&Externality::from(unknown), &topo, PM),
            Err(ExposureError::Spatial(SpatialError::LinkNotFound(LinkId(2))))
        ));

        let mut early = event;
        early.time = -1.0;
        assert!(matches!(
            agg.ingest(&Externality::from(early), &topo, PM),
            Err(ExposureError::Core(CoreError::InvalidTime(_)))
        ));
    }

    #[test]
    fn weighted_factor_with_unit_kernel_matches_plain() {
        let mut agg = aggregator(1, RegistrationPolicy::AutoRegister);
        agg.accumulate(Coord::new(50.0, 50.0), 0, 4.0).unwrap();
        agg.accumulate(Coord::new(60.0, 50.0), 0, 6.0).unwrap();
        let pos = Coord::new(52.0, 50.0);
        let unit = |_d: f64| 1.0;
        assert_eq!(agg.exposure_factor_weighted(pos, 0, &unit), agg.exposure_factor(pos, 0));

        let gauss = GaussianDispersion::new(5.0).unwrap();
        let weighted = agg.exposure_factor_weighted(pos, 0, &gauss);
        assert!(weighted > 0.0 && weighted < agg.exposure_factor(pos, 0));
    }

    #[test]
    fn network_layout_and_prepopulation() {
        let mut b = NetworkBuilder::new();
        b.add_node(NodeId(1), Coord::new(0.0, 0.0)).unwrap();
        b.add_node(NodeId(2), Coord::new(100.0, 0.0)).unwrap();
        b.add_node(NodeId(3), Coord::new(100.0, 100.0)).unwrap();
        b.add_link(LinkId(1), NodeId(1), NodeId(2)).unwrap();
        b.add_link(LinkId(2), NodeId(2), NodeId(3)).unwrap();
        b.add_link(LinkId(3), NodeId(2), NodeId(1)).unwrap(); // same midpoint as link 1
        let net = b.build();

        let mut agg = ExposureAggregator::for_network(&net, &config(1, RegistrationPolicy::Strict)).unwrap();
        assert_eq!(agg.no_cells(), 121);
        assert_eq!(agg.register_network(&net), 2);
        assert!(agg.is_covered(Coord::new(52.0, 3.0)));
        assert!(!agg.is_covered(Coord::new(20.0, 80.0)));
    }

    #[test]
    fn empty_network_is_a_config_error() {
        let net = NetworkBuilder::new().build();
        let res = ExposureAggregator::for_network(&net, &ExposureConfig::default());
        assert!(matches!(res, Err(ExposureError::Config(_))));
    }

    #[test]
    fn huge_exposure_distance_covers_every_cell() {
        let bbox = ec_core::BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let config = ExposureConfig {
            exposure_distance: 1.0e300,
            ..config(1, RegistrationPolicy::AutoRegister)
        };
        let mut agg = ExposureAggregator::new(bbox, &config).unwrap();
        agg.accumulate(Coord::new(5.0, 5.0), 0, 10.0).unwrap();
        agg.accumulate(Coord::new(95.0, 95.0), 0, 10.0).unwrap();
        let factor = agg.exposure_factor(Coord::new(5.0, 5.0), 0);
        assert!(approx_eq(factor, 121.0, 1e-9), "got {factor}");
    }

    #[test]
    fn too_fine_grid_rejected() {
        let bbox = ec_core::BoundingBox::new(0.0, 0.0, 1.0e6, 1.0e6);
        let config = ExposureConfig { cell_size: 1.0e-12, ..ExposureConfig::default() };
        assert!(matches!(
            ExposureAggregator::new(bbox, &config),
            Err(ExposureError::Spatial(SpatialError::Grid(_)))
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        let bbox = ec_core::BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let bad = [
            ExposureConfig { no_time_bins: 0, ..ExposureConfig::default() },
            ExposureConfig { time_bin_size: 0, ..ExposureConfig::default() },
            ExposureConfig { exposure_distance: -5.0, ..ExposureConfig::default() },
            ExposureConfig { cell_size: 0.0, ..ExposureConfig::default() },
        ];
        for cfg in &bad {
            assert!(ExposureAggregator::new(bbox, cfg).is_err(), "{cfg:?} accepted");
        }
    }
}

// ── Batched accumulation ──────────────────────────────────────────────────────

#[cfg(test)]
mod batch {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use ec_core::Coord;

    use super::helpers::{aggregator, approx_eq, cell_sums};
    use crate::{ExposureError, ExposureSample, RegistrationPolicy};

    fn samples(n: usize, bins: usize, seed: u64) -> Vec<ExposureSample> {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                ExposureSample::new(
                    Coord::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)),
                    rng.gen_range(0..bins),
                    rng.gen_range(0.0..3.0),
                )
            })
            .collect()
    }

    #[test]
    fn batch_matches_sequential() {
        let batch = samples(5_000, 4, 11);

        let mut seq = aggregator(4, RegistrationPolicy::AutoRegister);
        for s in &batch {
            seq.accumulate(s.coord, s.bin, s.amount).unwrap();
        }
        let mut bat = aggregator(4, RegistrationPolicy::AutoRegister);
        bat.accumulate_batch(&batch).unwrap();

        assert_eq!(seq.index().len(), bat.index().len());
        for ((id_a, a), (id_b, b)) in seq.index().cells().zip(bat.index().cells()) {
            assert_eq!(id_a, id_b);
            assert_eq!(a, b, "cell {id_a:?} differs");
        }
        for (x, y) in seq.totals().iter().zip(bat.totals()) {
            assert!(approx_eq(*x, *y, 1e-9));
        }
    }

    #[test]
    fn batch_keeps_totals_consistent() {
        let mut agg = aggregator(3, RegistrationPolicy::AutoRegister);
        agg.accumulate_batch(&samples(1_000, 3, 1)).unwrap();
        agg.accumulate_batch(&samples(1_000, 3, 2)).unwrap();
        for (sum, total) in cell_sums(&agg).iter().zip(agg.totals()) {
            assert!(approx_eq(*sum, *total, 1e-9));
        }
    }

    #[test]
    fn invalid_sample_adds_nothing() {
        let mut agg = aggregator(2, RegistrationPolicy::AutoRegister);
        let bad = vec![
            ExposureSample::new(Coord::new(10.0, 10.0), 0, 1.0),
            ExposureSample::new(Coord::new(20.0, 20.0), 5, 1.0),
        ];
        assert!(matches!(
            agg.accumulate_batch(&bad),
            Err(ExposureError::BinOutOfRange { bin: 5, .. })
        ));
        assert_eq!(agg.totals(), &[0.0, 0.0]);
        assert!(agg.index().cells().all(|(_, c)| c.total() == 0.0));
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut agg = aggregator(1, RegistrationPolicy::Strict);
        agg.accumulate_batch(&[]).unwrap();
        assert_eq!(agg.total(0), 0.0);
    }
}

// ── Dispersion ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispersion {
    use std::f64::consts::PI;

    use super::helpers::approx_eq;
    use crate::{DispersionModel, GaussianDispersion};

    #[test]
    fn peak_at_zero() {
        let g = GaussianDispersion::new(3.0).unwrap();
        assert!(approx_eq(g.calculate(0.0), 1.0 / (2.0 * PI * 9.0), 1e-15));
        assert_eq!(g.calculate(0.0), g.peak());
    }

    #[test]
    fn strictly_decreasing() {
        let g = GaussianDispersion::new(10.0).unwrap();
        let mut prev = g.calculate(0.0);
        for k in 1..200 {
            let w = g.calculate(k as f64 * 0.25);
            assert!(w < prev, "not decreasing at r = {}", k as f64 * 0.25);
            prev = w;
        }
    }

    #[test]
    fn integrates_to_one_over_the_plane() {
        // ∫∫ w dA = ∫₀^∞ w(r) · 2πr dr, midpoint rule out to 12σ.
        let sigma = 10.0;
        let g = GaussianDispersion::new(sigma).unwrap();
        let dr = 0.01;
        let steps = (12.0 * sigma / dr) as usize;
        let integral: f64 = (0..steps)
            .map(|k| {
                let r = (k as f64 + 0.5) * dr;
                g.calculate(r) * 2.0 * PI * r * dr
            })
            .sum();
        assert!((integral - 1.0).abs() < 1e-6, "integral = {integral}");
    }

    #[test]
    fn rejects_non_positive_sigma() {
        assert!(GaussianDispersion::new(0.0).is_err());
        assert!(GaussianDispersion::new(-1.0).is_err());
        assert!(GaussianDispersion::new(f64::INFINITY).is_err());
    }
}
