use cgmath::{vec2, InnerSpace};
use image_util::{save_monochrome, save_uv};
use ndarray::Array;
use noise::{NoiseFn, Perlin};
use stable_fluids::d2::Fluid;

fn main() {
    const N: usize = 200;
    const N_FRAME: usize = 90;

    let perlin = Perlin::new();
    let freq = 3.0;

    let mut fluid = Fluid::new(N, 0.0, 0.00005, 0.002);

    for f in 1..=N_FRAME {
        let t = f as f64 / N_FRAME as f64;

        // wander the stir point and its direction through the noise field
        let nx = perlin.get([t * freq, 0.0, 0.0]);
        let ny = perlin.get([t * freq, 0.5, 0.0]);
        let ci = ((0.5 + 0.4 * nx) * N as f64) as i32;
        let cj = ((0.5 + 0.4 * ny) * N as f64) as i32;

        let dir = vec2(
            perlin.get([t * freq, 0.25, 1.0]),
            perlin.get([t * freq, 0.75, 1.0]),
        );

        fluid.add_density(ci, cj, 3, 6.0);
        if dir.magnitude() > 1e-6 {
            fluid.add_velocity(ci, cj, 2, dir.normalize() * 800.0);
        }

        fluid.step();

        let max = fluid.max_density().max(f64::MIN_POSITIVE);
        let shade = Array::from_shape_fn((N, N), |(i, j)| {
            fluid.density(i as i32 + 1, j as i32 + 1) / max
        });
        save_monochrome("swirl", f, &shade).unwrap();

        let uv = Array::from_shape_fn((N, N), |(i, j)| {
            fluid.velocity(i as i32 + 1, j as i32 + 1)
        });
        save_uv("swirl_uv", f, &uv, 10, 20.0).unwrap();

        eprint!("\r {} / {}", f, N_FRAME);
    }
}
