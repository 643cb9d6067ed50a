//! Sprite overlays: shows one saved placement on a camera frame

use crate::{
    config::Config,
    error::{PlacementError, Result},
    geometry::{ObjectKind, Placement, PlacementPair},
};
use image::{
    Rgba, RgbImage, RgbaImage,
    imageops::{self, FilterType},
};
use log::debug;
use std::path::Path;

/// Cup and block sprites, scaled to their configured sizes
pub struct Sprites {
    pub cup: RgbaImage,
    pub block: RgbaImage,
}

impl Sprites {
    pub fn new(cup: RgbaImage, block: RgbaImage) -> Self {
        Self { cup, block }
    }

    /// Loads both sprite images named in `config`. Relative paths are taken
    /// from `base_dir`.
    pub fn load(config: &Config, base_dir: &Path) -> Result<Self> {
        Ok(Self::new(
            load_sprite(config, ObjectKind::Cup, base_dir)?,
            load_sprite(config, ObjectKind::Block, base_dir)?,
        ))
    }

    pub fn get(&self, kind: ObjectKind) -> &RgbaImage {
        match kind {
            ObjectKind::Cup => &self.cup,
            ObjectKind::Block => &self.block,
        }
    }
}

fn load_sprite(config: &Config, kind: ObjectKind, base_dir: &Path) -> Result<RgbaImage> {
    let path = config
        .objects
        .get(kind)
        .image_path(base_dir)
        .ok_or_else(|| PlacementError::Config(format!("{kind}: no sprite 'image' configured")))?;
    let size = config.object_size(kind, base_dir)?;
    let (width, height) = (size.width as u32, size.height as u32);

    let sprite = image::open(&path)?.to_rgba8();
    if sprite.dimensions() == (width, height) {
        return Ok(sprite);
    }
    debug!(
        "{kind} sprite {} resized {:?} -> {width}x{height}",
        path.display(),
        sprite.dimensions()
    );
    Ok(imageops::resize(&sprite, width, height, FilterType::Triangle))
}

/// Blends `sprite` onto `frame` with its top-left corner at `at`.
/// Sprite alpha is scaled by `1 - transparency`; whatever falls outside the
/// frame is dropped.
pub fn overlay_transparent(frame: &mut RgbImage, sprite: &RgbaImage, at: Placement, transparency: f64) {
    let (bg_w, bg_h) = frame.dimensions();
    let (ol_w, ol_h) = sprite.dimensions();
    let (ox, oy) = (i64::from(at.x), i64::from(at.y));

    let x1 = ox.max(0);
    let y1 = oy.max(0);
    let x2 = (ox + i64::from(ol_w)).min(i64::from(bg_w));
    let y2 = (oy + i64::from(ol_h)).min(i64::from(bg_h));
    if x2 <= x1 || y2 <= y1 {
        return;
    }

    let opacity = 1.0 - transparency.clamp(0.0, 1.0);
    for y in y1..y2 {
        for x in x1..x2 {
            let Rgba([r, g, b, a]) = *sprite.get_pixel((x - ox) as u32, (y - oy) as u32);
            let alpha = f64::from(a) / 255.0 * opacity;
            let pixel = frame.get_pixel_mut(x as u32, y as u32);
            for (dst, src) in pixel.0.iter_mut().zip([r, g, b]) {
                *dst = (alpha * f64::from(src) + (1.0 - alpha) * f64::from(*dst)) as u8;
            }
        }
    }
}

/// Draws the cup, then the block, of `pair` onto `frame`.
pub fn overlay_pair(frame: &mut RgbImage, pair: &PlacementPair, sprites: &Sprites, transparency: f64) {
    overlay_transparent(frame, sprites.get(ObjectKind::Cup), pair.cup, transparency);
    overlay_transparent(frame, sprites.get(ObjectKind::Block), pair.block, transparency);
}
