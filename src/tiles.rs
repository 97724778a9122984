use crate::config::AppConfig;
use crate::scene::{MapScene, ScenePoint};
use anyhow::{anyhow, Context, Result};
use image::{ImageBuffer, Rgba, RgbaImage};
use rayon::prelude::*;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

// Constants for Web Mercator
const TILE_SIZE: u32 = 256;
const MAX_LATITUDE: f64 = 85.051_128_78;
const METERS_PER_PIXEL_Z0: f64 = 156_543.033_92;

/// Rasterize the scene's points into `{tile_dir}/{z}/{x}/{y}.png` for every
/// configured zoom level. Returns the number of tiles written.
pub fn generate_tiles(config: &AppConfig, scene: &MapScene) -> Result<usize> {
    let output = &config.output;
    info!(
        "Generating tiles from min_zoom {} to max_zoom {}...",
        output.min_zoom, output.max_zoom
    );

    let written = (output.min_zoom..=output.max_zoom)
        .into_par_iter()
        .map(|z| render_zoom_level(&output.tile_dir, z, scene))
        .collect::<Result<Vec<usize>>>()?
        .into_iter()
        .sum();

    info!("Wrote {} tiles to {:?}", written, output.tile_dir);
    Ok(written)
}

fn render_zoom_level(tile_dir: &Path, zoom: u8, scene: &MapScene) -> Result<usize> {
    let tiles = rasterize_zoom(scene, zoom);
    debug!("z{}: {} tiles", zoom, tiles.len());

    let z_dir = tile_dir.join(zoom.to_string());
    fs::create_dir_all(&z_dir).context("Failed to create zoom directory")?;

    let failures: Vec<String> = tiles
        .par_iter()
        .filter_map(|((x, y), img)| {
            let x_dir = z_dir.join(x.to_string());
            let path = x_dir.join(format!("{}.png", y));
            let saved = fs::create_dir_all(&x_dir)
                .map_err(|e| e.to_string())
                .and_then(|_| img.save(&path).map_err(|e| e.to_string()));
            match saved {
                Ok(()) => None,
                Err(e) => {
                    warn!("Failed to save tile {:?}: {}", path, e);
                    Some(e)
                }
            }
        })
        .collect();

    if let Some(first) = failures.first() {
        return Err(anyhow!(
            "{} tiles failed to save at z{}: {}",
            failures.len(),
            zoom,
            first
        ));
    }
    Ok(tiles.len())
}

/// Draw every point as a filled disc. Discs that straddle a tile edge are
/// split between the neighbouring tiles.
pub fn rasterize_zoom(scene: &MapScene, zoom: u8) -> HashMap<(u32, u32), RgbaImage> {
    let mut local_tiles: HashMap<(u32, u32), RgbaImage> = HashMap::new();
    let world_px = world_size(zoom) as i64;
    let alpha = (scene.circle.fill_opacity * 255.0).round() as u8;

    for point in &scene.points {
        let (cx, cy) = lat_lon_to_world_pixel(point.lat, point.lon, zoom);
        let r = radius_px(point, scene.circle.radius_m, zoom);
        let color = point.color.to_rgba(alpha);

        let x0 = (cx - r).floor().max(0.0) as i64;
        let x1 = ((cx + r).ceil() as i64).min(world_px - 1);
        let y0 = (cy - r).floor().max(0.0) as i64;
        let y1 = ((cy + r).ceil() as i64).min(world_px - 1);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let (tx, ty) = (px as u32 / TILE_SIZE, py as u32 / TILE_SIZE);
                let tile_img = local_tiles
                    .entry((tx, ty))
                    .or_insert_with(|| ImageBuffer::new(TILE_SIZE, TILE_SIZE));
                blend(
                    tile_img.get_pixel_mut(px as u32 % TILE_SIZE, py as u32 % TILE_SIZE),
                    color,
                );
            }
        }
    }

    local_tiles
}

// Source-over compositing on straight (non-premultiplied) alpha
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let a = src[3] as f64 / 255.0;
    let dst_a = dst[3] as f64 / 255.0;
    let out_a = a + dst_a * (1.0 - a);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let mixed = src[c] as f64 * a + dst[c] as f64 * dst_a * (1.0 - a);
        dst[c] = (mixed / out_a).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

fn world_size(zoom: u8) -> u32 {
    TILE_SIZE << zoom
}

fn radius_px(point: &ScenePoint, radius_m: f64, zoom: u8) -> f64 {
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let meters_per_px = METERS_PER_PIXEL_Z0 * lat.cos() / 2.0_f64.powi(zoom as i32);
    (radius_m / meters_per_px).max(1.0)
}

// Coordinate conversions
pub fn lat_lon_to_world_pixel(lat: f64, lon: f64, zoom: u8) -> (f64, f64) {
    let n = 2.0_f64.powi(zoom as i32);
    let x_t = (lon + 180.0) / 360.0 * n;
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let y_t = (1.0 - (lat_rad.tan() + (1.0 / lat_rad.cos())).ln() / PI) / 2.0 * n;
    (x_t * TILE_SIZE as f64, y_t * TILE_SIZE as f64)
}
