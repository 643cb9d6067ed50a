use crate::{
    config::Config,
    constants::PROGRESS_EVERY,
    error::Result,
    geometry::{Placement, PlacementPair, Size},
    sampler::{Neighbor, Sampler},
    store::PairSink,
};
use chrono::Local;
use log::{debug, info};
use rand::Rng;

/// Builds a set of mutually distinct cup/block configurations
#[derive(Debug, Clone)]
pub struct SetBuilder {
    sampler: Sampler,
    cup: Size,
    block: Size,
    min_pair_separation: f64,
    attempt_multiplier: u64,
}

/// What a build run produced
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub requested: usize,
    pub pairs: Vec<PlacementPair>,
    pub attempts: u64,
    /// sampler calls that ran out of attempts
    pub fallbacks: u64,
}

impl BuildReport {
    pub fn is_complete(&self) -> bool {
        self.pairs.len() == self.requested
    }
}

impl SetBuilder {
    pub fn new(
        sampler: Sampler,
        cup: Size,
        block: Size,
        min_pair_separation: f64,
        attempt_multiplier: u64,
    ) -> Self {
        Self {
            sampler,
            cup,
            block,
            min_pair_separation,
            attempt_multiplier,
        }
    }

    pub fn from_config(config: &Config, cup: Size, block: Size) -> Self {
        Self::new(
            Sampler::from_config(&config.placement),
            cup,
            block,
            config.generation.min_config_separation,
            config.generation.attempt_multiplier,
        )
    }

    /// Samples a cup, then a block kept apart from it.
    /// Returns the pair and how many of the two samples fell back.
    pub fn sample_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> (Placement, Placement, u64) {
        let cup = self.sampler.sample(rng, self.cup, None);
        let block = self.sampler.sample(
            rng,
            self.block,
            Some(Neighbor {
                placement: cup.placement(),
                size: self.cup,
            }),
        );
        let fallbacks = u64::from(cup.is_fallback()) + u64::from(block.is_fallback());
        (cup.placement(), block.placement(), fallbacks)
    }

    /// Runs until `target` pairs are accepted or `target * attempt_multiplier`
    /// attempts are spent. Each accepted pair goes to `sink` immediately.
    pub fn build<R, S>(&self, rng: &mut R, target: usize, sink: &mut S) -> Result<BuildReport>
    where
        R: Rng + ?Sized,
        S: PairSink + ?Sized,
    {
        let budget = (target as u64).saturating_mul(self.attempt_multiplier);
        let mut report = BuildReport {
            requested: target,
            pairs: Vec::with_capacity(target),
            attempts: 0,
            fallbacks: 0,
        };

        while report.pairs.len() < target && report.attempts < budget {
            report.attempts += 1;

            let (cup, block, fallbacks) = self.sample_pair(rng);
            report.fallbacks += fallbacks;

            if !self.is_far_enough(cup, block, &report.pairs) {
                continue;
            }

            let pair = PlacementPair::new(Local::now().naive_local(), cup, block);
            sink.accept(&pair)?;
            report.pairs.push(pair);

            if report.pairs.len() % PROGRESS_EVERY == 0 {
                info!("Generated {}/{} positions...", report.pairs.len(), target);
            }
        }

        debug!(
            "build finished: {} pairs, {} attempts, {} fallbacks",
            report.pairs.len(),
            report.attempts,
            report.fallbacks
        );
        Ok(report)
    }

    fn is_far_enough(&self, cup: Placement, block: Placement, accepted: &[PlacementPair]) -> bool {
        accepted.iter().all(|saved| {
            cup.distance(&saved.cup) >= self.min_pair_separation
                && block.distance(&saved.block) >= self.min_pair_separation
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlacementConfig;
    use crate::geometry::Rect;
    use crate::store::{PositionsWriter, read_positions};
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::TempDir;

    fn bench_builder() -> SetBuilder {
        SetBuilder::from_config(&Config::default(), Size::new(90, 110), Size::new(50, 50))
    }

    #[test]
    fn test_accepted_pairs_are_distinct() {
        let builder = bench_builder();
        let mut rng = StdRng::seed_from_u64(2025);
        let mut sink: Vec<PlacementPair> = Vec::new();

        let report = builder.build(&mut rng, 40, &mut sink).unwrap();
        assert!(report.is_complete());
        assert_eq!(sink, report.pairs);

        for (i, p) in report.pairs.iter().enumerate() {
            for q in &report.pairs[i + 1..] {
                assert!(p.cup.distance(&q.cup) >= 23.5);
                assert!(p.block.distance(&q.block) >= 23.5);
            }
        }
    }

    #[test]
    fn test_objects_in_pair_keep_axis_separation() {
        let builder = bench_builder();
        let mut rng = StdRng::seed_from_u64(11);
        let mut sink: Vec<PlacementPair> = Vec::new();

        let report = builder.build(&mut rng, 25, &mut sink).unwrap();
        assert_eq!(report.fallbacks, 0);

        let cup = Size::new(90, 110);
        let block = Size::new(50, 50);
        let exclusion = Rect::new(280, 0, 388, 120);
        for pair in &report.pairs {
            let (cx, cy) = pair.cup.center(cup);
            let (bx, by) = pair.block.center(block);
            assert!((cx - bx).abs() >= 110, "{pair:?}");
            assert!((cy - by).abs() >= 110, "{pair:?}");
            assert!(!pair.cup.rect(cup).overlaps(&exclusion));
            assert!(!pair.block.rect(block).overlaps(&exclusion));
        }
    }

    #[test]
    fn test_short_result_when_budget_exhausted() {
        // separation larger than the boundary diagonal: only the first pair fits
        let sampler = Sampler::new(
            Rect::new(0, 0, 200, 200),
            Rect::new(-50, -50, -40, -40),
            0,
            100,
        );
        let builder = SetBuilder::new(sampler, Size::new(10, 10), Size::new(10, 10), 1000.0, 5);
        let mut rng = StdRng::seed_from_u64(0);
        let mut sink: Vec<PlacementPair> = Vec::new();

        let report = builder.build(&mut rng, 3, &mut sink).unwrap();
        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.attempts, 15);
        assert!(!report.is_complete());
    }

    fn builder_with_separation(min_pair_separation: f64) -> SetBuilder {
        SetBuilder::new(
            Sampler::from_config(&PlacementConfig::default()),
            Size::new(10, 10),
            Size::new(10, 10),
            min_pair_separation,
            1,
        )
    }

    #[test]
    fn test_distance_equal_to_minimum_is_accepted() {
        let ts = Local::now().naive_local();
        let saved = vec![PlacementPair::new(
            ts,
            Placement::new(0, 0),
            Placement::new(100, 100),
        )];
        // both objects exactly 5 px away from the saved pair
        let cup = Placement::new(3, 4);
        let block = Placement::new(104, 97);

        assert!(builder_with_separation(5.0).is_far_enough(cup, block, &saved));
        assert!(!builder_with_separation(5.01).is_far_enough(cup, block, &saved));
        // one object too close is enough to reject
        assert!(!builder_with_separation(5.0).is_far_enough(cup, Placement::new(101, 101), &saved));
        assert!(builder_with_separation(5.0).is_far_enough(cup, block, &[]));
    }

    #[test]
    fn test_zero_target() {
        let builder = bench_builder();
        let mut rng = StdRng::seed_from_u64(0);
        let mut sink: Vec<PlacementPair> = Vec::new();
        let report = builder.build(&mut rng, 0, &mut sink).unwrap();
        assert!(report.pairs.is_empty());
        assert_eq!(report.attempts, 0);
    }

    #[test]
    fn test_build_writes_csv_incrementally() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object_positions.csv");
        let builder = bench_builder();
        let mut rng = StdRng::seed_from_u64(8);

        let mut writer = PositionsWriter::create(&path).unwrap();
        let report = builder.build(&mut rng, 15, &mut writer).unwrap();
        assert_eq!(writer.rows_written(), 15);

        let stored = read_positions(&path).unwrap();
        assert_eq!(stored.len(), report.pairs.len());
        for (a, b) in stored.iter().zip(&report.pairs) {
            assert_eq!(a.cup, b.cup);
            assert_eq!(a.block, b.block);
        }
    }
}
