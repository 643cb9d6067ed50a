use crate::{
    constants::{
        DEFAULT_ATTEMPT_MULTIPLIER, DEFAULT_BOUNDARY, DEFAULT_EXCLUSION, DEFAULT_MAX_ATTEMPTS,
        DEFAULT_MIN_CONFIG_SEPARATION, DEFAULT_MIN_OBJECT_SEPARATION, DEFAULT_NUM_POSITIONS,
        DEFAULT_OVERLAY_TRANSPARENCY, DEFAULT_POSITIONS_CSV, DEFAULT_PRUNE_TOLERANCE, ENV_POSITIONS_CSV, FRAME_HEIGHT,
        FRAME_WIDTH,
    },
    error::{PlacementError, Result},
    geometry::{ObjectKind, Rect, Size},
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub placement: PlacementConfig,
    pub objects: ObjectsConfig,
    pub generation: GenerationConfig,
    pub prune: PruneConfig,
    pub render: RenderConfig,
}

/// Where objects may go
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub boundary: Rect,
    pub exclusion: Rect,
    /// center-to-center, per axis, between cup and block of one pair
    pub min_object_separation: i32,
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            boundary: Rect::from_tuple(DEFAULT_BOUNDARY),
            exclusion: Rect::from_tuple(DEFAULT_EXCLUSION),
            min_object_separation: DEFAULT_MIN_OBJECT_SEPARATION,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectsConfig {
    pub cup: ObjectConfig,
    pub block: ObjectConfig,
}

impl Default for ObjectsConfig {
    fn default() -> Self {
        Self {
            cup: ObjectConfig::with_size(90, 110),
            block: ObjectConfig::with_size(50, 50),
        }
    }
}

impl ObjectsConfig {
    pub fn get(&self, kind: ObjectKind) -> &ObjectConfig {
        match kind {
            ObjectKind::Cup => &self.cup,
            ObjectKind::Block => &self.block,
        }
    }
}

/// Sprite size, either explicit or read from the sprite image and scaled
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectConfig {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub image: Option<PathBuf>,
    pub scale: f64,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            image: None,
            scale: 1.0,
        }
    }
}

impl ObjectConfig {
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Sprite image path; relative paths are taken from `base_dir`.
    pub fn image_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.image.as_ref().map(|image| {
            if image.is_absolute() {
                image.clone()
            } else {
                base_dir.join(image)
            }
        })
    }

    /// Resolves the sprite size. Relative image paths are taken from `base_dir`.
    pub fn resolve_size(&self, kind: ObjectKind, base_dir: &Path) -> Result<Size> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(PlacementError::Config(format!(
                "{kind}: scale must be positive, got {}",
                self.scale
            )));
        }

        let (w, h) = match (self.image_path(base_dir), self.width, self.height) {
            (Some(path), _, _) => {
                let (w, h) = image::image_dimensions(&path)?;
                debug!("{kind} sprite {}: {w}x{h}", path.display());
                (f64::from(w), f64::from(h))
            }
            (None, Some(w), Some(h)) => (f64::from(w), f64::from(h)),
            _ => {
                return Err(PlacementError::Config(format!(
                    "{kind}: either 'image' or both 'width' and 'height' must be set"
                )));
            }
        };

        let size = Size::new(
            (w * self.scale).round() as i32,
            (h * self.scale).round() as i32,
        );
        if size.width <= 0 || size.height <= 0 {
            return Err(PlacementError::Config(format!(
                "{kind}: resolved size {}x{} is empty",
                size.width, size.height
            )));
        }
        Ok(size)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub count: usize,
    /// Euclidean, cup-to-cup and block-to-block, between accepted pairs
    pub min_config_separation: f64,
    /// attempt budget = count * attempt_multiplier
    pub attempt_multiplier: u64,
    pub output: PathBuf,
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_NUM_POSITIONS,
            min_config_separation: DEFAULT_MIN_CONFIG_SEPARATION,
            attempt_multiplier: DEFAULT_ATTEMPT_MULTIPLIER,
            output: PathBuf::from(DEFAULT_POSITIONS_CSV),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PruneConfig {
    pub tolerance: i32,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_PRUNE_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub point_radius: i32,
    /// 0.0 draws sprites at their own opacity, 1.0 hides them
    pub overlay_transparency: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            point_radius: 5,
            overlay_transparency: DEFAULT_OVERLAY_TRANSPARENCY,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlacementError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise the built-in bench defaults.
    /// Environment overrides are applied in both cases.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            warn!(
                "Config file not found: {}, using default settings",
                path.display()
            );
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(output) = env::var(ENV_POSITIONS_CSV)
            && !output.trim().is_empty()
        {
            debug!("{ENV_POSITIONS_CSV} overrides output: {output}");
            self.generation.output = PathBuf::from(output);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.placement;
        if p.boundary.width() <= 0 || p.boundary.height() <= 0 {
            return Err(PlacementError::Config(format!(
                "boundary is empty: {:?}",
                p.boundary
            )));
        }
        if p.exclusion.width() < 0 || p.exclusion.height() < 0 {
            return Err(PlacementError::Config(format!(
                "exclusion zone is inverted: {:?}",
                p.exclusion
            )));
        }
        if p.max_attempts == 0 {
            return Err(PlacementError::Config(
                "max_attempts must be positive".to_string(),
            ));
        }
        if p.min_object_separation < 0 {
            return Err(PlacementError::Config(format!(
                "min_object_separation must not be negative, got {}",
                p.min_object_separation
            )));
        }

        let g = &self.generation;
        if g.count == 0 {
            return Err(PlacementError::Config("count must be positive".to_string()));
        }
        if g.attempt_multiplier == 0 {
            return Err(PlacementError::Config(
                "attempt_multiplier must be positive".to_string(),
            ));
        }
        if !(g.min_config_separation.is_finite() && g.min_config_separation >= 0.0) {
            return Err(PlacementError::Config(format!(
                "min_config_separation must be a non-negative number, got {}",
                g.min_config_separation
            )));
        }

        if self.prune.tolerance < 0 {
            return Err(PlacementError::Config(format!(
                "prune tolerance must not be negative, got {}",
                self.prune.tolerance
            )));
        }

        if self.render.width == 0 || self.render.height == 0 {
            return Err(PlacementError::Config(
                "render size must be positive".to_string(),
            ));
        }
        let t = self.render.overlay_transparency;
        if !(0.0..=1.0).contains(&t) {
            return Err(PlacementError::Config(format!(
                "overlay_transparency must be within [0, 1], got {t}"
            )));
        }

        Ok(())
    }

    /// Resolves one sprite size and checks it fits in the boundary.
    pub fn object_size(&self, kind: ObjectKind, base_dir: &Path) -> Result<Size> {
        let size = self.objects.get(kind).resolve_size(kind, base_dir)?;
        let boundary = self.placement.boundary;
        if size.width > boundary.width() || size.height > boundary.height() {
            return Err(PlacementError::Config(format!(
                "{kind} ({}x{}) does not fit in boundary {}x{}",
                size.width,
                size.height,
                boundary.width(),
                boundary.height()
            )));
        }
        Ok(size)
    }

    /// `(cup, block)` sizes
    pub fn object_sizes(&self, base_dir: &Path) -> Result<(Size, Size)> {
        Ok((
            self.object_size(ObjectKind::Cup, base_dir)?,
            self.object_size(ObjectKind::Block, base_dir)?,
        ))
    }
}
