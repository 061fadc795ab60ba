use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::terrain::MAX_ELEVATION;
use crate::world::World;

/// Render the world one pixel per cell, shading terrain colors by elevation.
///
/// The shade factor is `(el + MAX_ELEVATION) / (2 * MAX_ELEVATION)`; with
/// `depth` set, `el` is the floor under any liquid. Image rows are flipped so
/// that y grows upward.
pub fn render_image(world: &World, depth: bool) -> RgbImage {
    let (width, height) = (world.width(), world.height());
    let mut img: RgbImage = ImageBuffer::new(width as u32, height as u32);

    for (x, y, cell) in world.cells.iter() {
        let el = if depth { cell.floor() } else { cell.elevation };
        let f = shade_factor(el);
        let (r, g, b) = cell.terrain.color;
        let px = Rgb([shade(r, f), shade(g, f), shade(b, f)]);
        img.put_pixel(x as u32, (height - 1 - y) as u32, px);
    }

    img
}

/// Render and save as PNG.
pub fn save_png(world: &World, path: impl AsRef<Path>, depth: bool) -> Result<(), image::ImageError> {
    render_image(world, depth).save(path)
}

fn shade_factor(el: i32) -> f64 {
    let f = (el + MAX_ELEVATION) as f64 / (2 * MAX_ELEVATION) as f64;
    assert!(f <= 1.0, "shade factor {} > 1 for elevation {}", f, el);
    f
}

fn shade(c: u8, f: f64) -> u8 {
    (c as f64 * f.max(0.0)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{GRASS, WATER};

    #[test]
    fn test_shading_and_flip() {
        let mut world = World::new(2, 3);
        world.at_mut(0, 0).elevation = MAX_ELEVATION;
        world.at_mut(1, 2).terrain = WATER;

        let img = render_image(&world, false);
        assert_eq!(img.dimensions(), (2, 3));

        // (0, 0) is the bottom-left pixel at full brightness.
        let (r, g, b) = GRASS.color;
        assert_eq!(img.get_pixel(0, 2), &Rgb([r, g, b]));
        // Elevation 0 is half brightness.
        let (r, g, b) = WATER.color;
        assert_eq!(
            img.get_pixel(1, 0),
            &Rgb([(r as f64 * 0.5) as u8, (g as f64 * 0.5) as u8, (b as f64 * 0.5) as u8])
        );
    }

    #[test]
    fn test_depth_darkens_liquid() {
        let mut world = World::new(1, 1);
        let cell = world.at_mut(0, 0);
        cell.terrain = WATER;
        cell.elevation = 4;
        cell.depth = 3;

        let plain = render_image(&world, false);
        let deep = render_image(&world, true);
        assert!(deep.get_pixel(0, 0).0[2] < plain.get_pixel(0, 0).0[2]);
    }

    #[test]
    #[should_panic(expected = "shade factor")]
    fn test_unclamped_elevation_panics() {
        let mut world = World::new(1, 1);
        world.at_mut(0, 0).elevation = MAX_ELEVATION + 1;
        render_image(&world, false);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.png");
        save_png(&World::new(8, 4), &path, true).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (8, 4));
    }
}
