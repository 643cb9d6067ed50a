use crate::{
    config::{Config, RenderConfig},
    error::{PlacementError, Result},
    geometry::{PlacementPair, Rect, Size},
    results::Outcome,
};
use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut},
    rect::Rect as PixelRect,
};
use std::path::Path;

pub struct Colors;

impl Colors {
    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BOUNDARY: Rgb<u8> = Rgb([0, 200, 0]);
    pub const EXCLUSION: Rgb<u8> = Rgb([220, 0, 0]);
    pub const CUP: Rgb<u8> = Rgb([0, 100, 255]);
    pub const BLOCK: Rgb<u8> = Rgb([230, 40, 40]);
    pub const SUCCESS: Rgb<u8> = Rgb([0, 170, 0]);
    pub const FAILURE: Rgb<u8> = Rgb([220, 0, 0]);
}

/// Frame-sized canvas with the bench zones drawn on it
pub struct Renderer {
    pub image: RgbImage,
    point_radius: i32,
}

impl Renderer {
    pub fn new(cfg: &RenderConfig) -> Self {
        Self {
            image: ImageBuffer::from_pixel(cfg.width, cfg.height, Colors::WHITE),
            point_radius: cfg.point_radius.max(1),
        }
    }

    pub fn draw_zone(&mut self, rect: Rect, color: Rgb<u8>) {
        // 2 px outline
        for inset in 0..2 {
            let w = rect.width() - 2 * inset;
            let h = rect.height() - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let r = PixelRect::at(rect.x_min + inset, rect.y_min + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut self.image, r, color);
        }
    }

    pub fn draw_point(&mut self, center: (i32, i32), color: Rgb<u8>, filled: bool) {
        if filled {
            draw_filled_circle_mut(&mut self.image, center, self.point_radius, color);
        } else {
            draw_hollow_circle_mut(&mut self.image, center, self.point_radius, color);
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| PlacementError::CreateDir {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        self.image.save(path)?;
        Ok(())
    }
}

/// Blank frame with the boundary and exclusion outlines
pub fn base_canvas(config: &Config) -> Renderer {
    let mut renderer = Renderer::new(&config.render);
    renderer.draw_zone(config.placement.boundary, Colors::BOUNDARY);
    renderer.draw_zone(config.placement.exclusion, Colors::EXCLUSION);
    renderer
}

/// Cup centers in blue, block centers in red.
pub fn render_positions(
    config: &Config,
    pairs: &[PlacementPair],
    cup: Size,
    block: Size,
) -> Renderer {
    let mut renderer = base_canvas(config);
    for pair in pairs {
        renderer.draw_point(pair.cup.center(cup), Colors::CUP, true);
        renderer.draw_point(pair.block.center(block), Colors::BLOCK, true);
    }
    renderer
}

/// Green for success, red for failure; cups hollow, blocks filled.
pub fn render_outcomes(config: &Config, outcomes: &[Outcome], cup: Size, block: Size) -> Renderer {
    let mut renderer = base_canvas(config);
    for outcome in outcomes {
        let color = if outcome.success {
            Colors::SUCCESS
        } else {
            Colors::FAILURE
        };
        renderer.draw_point(outcome.pair.cup.center(cup), color, false);
        renderer.draw_point(outcome.pair.block.center(block), color, true);
    }
    renderer
}
