use cgmath::vec2;
use image_util::save_monochrome;
use ndarray::Array;
use stable_fluids::d2::Fluid;

const VISC: f64 = 0.01;
const DIFF: f64 = 0.0001;
const DT: f64 = 0.001;

const DYE_AMOUNT: f64 = 9.0;
const DYE_RADIUS: i32 = 5;
const IMPULSE: f64 = 1000.0;
const IMPULSE_RADIUS: i32 = 1;

fn main() {
    const N: usize = 200;
    const N_FRAME: usize = 120;

    let mut fluid = Fluid::new(N, VISC, DIFF, DT);
    let mid = (N / 2) as i32;

    for f in 1..=N_FRAME {
        // dye at the centre, impulse direction circling over time
        let angle = f as f64 * std::f64::consts::TAU / 60.0;
        fluid.add_density(mid, mid, DYE_RADIUS, DYE_AMOUNT);
        fluid.add_velocity(
            mid,
            mid,
            IMPULSE_RADIUS,
            vec2(IMPULSE * angle.cos(), IMPULSE * angle.sin()),
        );

        fluid.step();

        // drop the density floor and normalise for on-screen contrast
        let min = fluid.min_density();
        fluid.level(min);
        let max = fluid.max_density().max(f64::MIN_POSITIVE);

        let shade = Array::from_shape_fn((N, N), |(i, j)| {
            fluid.density(i as i32 + 1, j as i32 + 1) / max
        });
        save_monochrome("dye", f, &shade).unwrap();

        eprint!("\r {} / {}", f, N_FRAME);
    }
}
