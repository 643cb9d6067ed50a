use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Object placed on the bench
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ObjectKind {
    Cup,
    Block,
}

/// Axis-aligned rectangle in frame pixels, edges inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rect {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Rect {
    pub const fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub const fn from_tuple(t: (i32, i32, i32, i32)) -> Self {
        Self::new(t.0, t.1, t.2, t.3)
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    /// Touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x_max < other.x_min
            || self.x_min > other.x_max
            || self.y_max < other.y_min
            || self.y_min > other.y_max)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x_min >= self.x_min
            && other.y_min >= self.y_min
            && other.x_max <= self.x_max
            && other.y_max <= self.y_max
    }

    pub fn top_left(&self) -> Placement {
        Placement::new(self.x_min, self.y_min)
    }
}

/// Sprite size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn rect(&self, size: Size) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.x.saturating_add(size.width),
            self.y.saturating_add(size.height),
        )
    }

    /// Center with integer halving, matching the pixel grid
    pub fn center(&self, size: Size) -> (i32, i32) {
        (
            self.x.saturating_add(size.width / 2),
            self.y.saturating_add(size.height / 2),
        )
    }

    pub fn distance(&self, other: &Placement) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

/// One bench configuration: where the cup and the block go
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPair {
    pub timestamp: NaiveDateTime,
    pub cup: Placement,
    pub block: Placement,
}

impl PlacementPair {
    pub fn new(timestamp: NaiveDateTime, cup: Placement, block: Placement) -> Self {
        Self {
            timestamp,
            cup,
            block,
        }
    }

    /// True when every coordinate is within `tolerance` of `other`'s.
    /// A negative tolerance matches nothing.
    pub fn is_near(&self, other: &PlacementPair, tolerance: i32) -> bool {
        let Ok(tolerance) = u32::try_from(tolerance) else {
            return false;
        };
        self.cup.x.abs_diff(other.cup.x) <= tolerance
            && self.cup.y.abs_diff(other.cup.y) <= tolerance
            && self.block.x.abs_diff(other.block.x) <= tolerance
            && self.block.y.abs_diff(other.block.y) <= tolerance
    }
}
