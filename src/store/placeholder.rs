//! Deterministic placeholder map
//!
//! Substituted when the live map renderer fails, so a place with known
//! coordinates never ends up without a map image. The output depends only
//! on the place name and coordinates: the same inputs always produce the
//! same pixels.

use crate::store::record::Coordinates;
use image::{Rgb, RgbImage};

const BACKGROUND: Rgb<u8> = Rgb([226, 232, 240]);
const BAND: Rgb<u8> = Rgb([203, 213, 225]);
const BORDER: Rgb<u8> = Rgb([100, 116, 139]);
const MARKER: Rgb<u8> = Rgb([190, 18, 60]);
const TICK: Rgb<u8> = Rgb([51, 65, 85]);

const BAND_WIDTH: u32 = 24;
const MARKER_HALF: u32 = 5;

/// Render the placeholder for a place.
///
/// Vertical banding is seeded from the name bytes so different places are
/// visually distinct; edge ticks mark the latitude and longitude position,
/// and a crosshair marks the nominal map center.
pub fn placeholder_map(display_name: &str, coords: Coordinates, width: u32, height: u32) -> RgbImage {
    let seed: u32 = display_name.bytes().map(u32::from).sum();
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    for x in 0..width {
        if (x / BAND_WIDTH + seed) % 2 == 0 {
            for y in 0..height {
                img.put_pixel(x, y, BAND);
            }
        }
    }

    // 2px border
    for x in 0..width {
        for y in [0, 1, height - 2, height - 1] {
            img.put_pixel(x, y, BORDER);
        }
    }
    for y in 0..height {
        for x in [0, 1, width - 2, width - 1] {
            img.put_pixel(x, y, BORDER);
        }
    }

    // crosshair through the center
    let (cx, cy) = (width / 2, height / 2);
    for x in 0..width {
        img.put_pixel(x, cy, BORDER);
    }
    for y in 0..height {
        img.put_pixel(cx, y, BORDER);
    }

    // center marker square
    for x in cx.saturating_sub(MARKER_HALF)..(cx + MARKER_HALF).min(width - 1) {
        for y in cy.saturating_sub(MARKER_HALF)..(cy + MARKER_HALF).min(height - 1) {
            img.put_pixel(x, y, MARKER);
        }
    }

    // longitude tick along the bottom edge, latitude tick along the left edge
    let tx = (((coords.lon + 180.0) / 360.0).clamp(0.0, 1.0) * f64::from(width - 1)) as u32;
    let ty = (((90.0 - coords.lat) / 180.0).clamp(0.0, 1.0) * f64::from(height - 1)) as u32;
    for dy in 0..8u32 {
        let y = height.saturating_sub(3 + dy);
        img.put_pixel(tx.min(width - 1), y, TICK);
    }
    for dx in 0..8u32 {
        img.put_pixel((3 + dx).min(width - 1), ty.min(height - 1), TICK);
    }

    img
}
