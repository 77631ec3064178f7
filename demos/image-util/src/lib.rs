use anyhow::Context;
use cgmath::Vector2;
use image::{Rgb, RgbImage};
use ndarray::Array2;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Write a scalar field as a grayscale PNG, values mapped from `[0, 1]`.
pub fn save_monochrome(prefix: &str, index: usize, x: &Array2<f64>) -> anyhow::Result<()> {
    let shape = x.dim();

    std::fs::create_dir_all("out")?;

    let mut img = RgbImage::new(shape.0 as u32, shape.1 as u32);

    for i in 0..shape.0 {
        for j in 0..shape.1 {
            let l = (x[[i, j]] * 256.0).max(0.0).min(255.0) as u8;
            img.put_pixel(i as u32, j as u32, Rgb([l, l, l]));
        }
    }

    img.save(format!("out/{}_{:06}.png", prefix, index))?;

    Ok(())
}

/// Write a velocity field as white strokes on black, one stroke every
/// `stride` cells, `scale` pixels per unit velocity.
pub fn save_uv(
    prefix: &str,
    index: usize,
    uv: &Array2<Vector2<f64>>,
    stride: usize,
    scale: f64,
) -> anyhow::Result<()> {
    let (w, h) = uv.dim();

    std::fs::create_dir_all("out")?;

    let mut pixmap = Pixmap::new(w as u32, h as u32).context("zero-sized pixmap")?;
    pixmap.fill(Color::from_rgba8(0, 0, 0, 255));

    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(255, 255, 255, 255));
    paint.anti_alias = true;

    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };

    for i in (0..w).step_by(stride) {
        for j in (0..h).step_by(stride) {
            let v = uv[[i, j]];

            let mut pb = PathBuilder::new();
            pb.move_to(i as f32, j as f32);
            pb.line_to(
                (i as f64 + scale * v.x) as f32,
                (j as f64 + scale * v.y) as f32,
            );

            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    pixmap.save_png(format!("out/{}_{:06}.png", prefix, index))?;

    Ok(())
}
