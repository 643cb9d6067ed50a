use crate::config::PlacementConfig;
use crate::geometry::{Placement, Rect, Size};
use rand::Rng;

/// Object the sampled placement has to keep away from
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub placement: Placement,
    pub size: Size,
}

/// Outcome of one sampling run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Found(Placement),
    /// Attempts exhausted; boundary top-left, not checked against any constraint
    Fallback(Placement),
}

impl Sample {
    pub fn placement(&self) -> Placement {
        match *self {
            Sample::Found(p) | Sample::Fallback(p) => p,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Sample::Fallback(_))
    }
}

/// Rejection sampler for sprite positions inside the boundary
#[derive(Debug, Clone)]
pub struct Sampler {
    boundary: Rect,
    exclusion: Rect,
    min_separation: i32,
    max_attempts: u32,
}

impl Sampler {
    pub fn new(boundary: Rect, exclusion: Rect, min_separation: i32, max_attempts: u32) -> Self {
        Self {
            boundary,
            exclusion,
            min_separation,
            max_attempts,
        }
    }

    pub fn from_config(cfg: &PlacementConfig) -> Self {
        Self::new(
            cfg.boundary,
            cfg.exclusion,
            cfg.min_object_separation,
            cfg.max_attempts,
        )
    }

    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    pub fn exclusion(&self) -> Rect {
        self.exclusion
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        size: Size,
        other: Option<Neighbor>,
    ) -> Sample {
        let fallback = Sample::Fallback(self.boundary.top_left());

        let max_x = self.boundary.x_max - size.width;
        let max_y = self.boundary.y_max - size.height;
        if max_x < self.boundary.x_min || max_y < self.boundary.y_min {
            return fallback;
        }

        for _ in 0..self.max_attempts {
            let candidate = Placement::new(
                rng.gen_range(self.boundary.x_min..=max_x),
                rng.gen_range(self.boundary.y_min..=max_y),
            );

            if candidate.rect(size).overlaps(&self.exclusion) {
                continue;
            }

            if let Some(other) = other
                && !self.separated(candidate, size, other)
            {
                continue;
            }

            return Sample::Found(candidate);
        }

        fallback
    }

    /// Both axes must clear the threshold independently.
    fn separated(&self, candidate: Placement, size: Size, other: Neighbor) -> bool {
        let (cx, cy) = candidate.center(size);
        let (ox, oy) = other.placement.center(other.size);
        let min = i64::from(self.min_separation);
        (i64::from(cx) - i64::from(ox)).abs() >= min && (i64::from(cy) - i64::from(oy)).abs() >= min
    }
}
