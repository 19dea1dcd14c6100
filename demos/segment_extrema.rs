use std::error::Error;

use segment_polynomial::{CompanionMatrixSolver, ExtremumSettings, Polynomial};

fn main() -> Result<(), Box<dyn Error>> {
    // -----------------------
    // 1. Set up parameters
    // -----------------------
    let distance = 50.0; // Travel from 0 to 50
    let duration = 4.0; // Seconds

    // Motion limits the segment has to respect
    let v_lim = 20.0;
    let a_lim = 10.0;

    // -------------------------------------------
    // 2. Build a rest-to-rest minimum-jerk segment
    // -------------------------------------------
    // On normalized time s in [0, 1]: x(s) = D * (10 s^3 - 15 s^4 + 6 s^5)
    let mut segment = Polynomial::from_coefficients(
        6,
        &[
            0.0,
            0.0,
            0.0,
            10.0 * distance,
            -15.0 * distance,
            6.0 * distance,
        ],
    )?;
    // Stretch it over the real duration, x(t) = x_norm(t / T)
    segment.scale_in_time(1.0 / duration);
    println!("Segment: {segment}");

    // ----------------------------------
    // 3. Sample position, velocity, acc
    // ----------------------------------
    let samples = 8;
    let mut state = [0.0; 3];
    println!("{:>8} {:>10} {:>10} {:>10}", "t", "pos", "vel", "acc");
    for i in 0..=samples {
        let t = duration * i as f64 / samples as f64;
        segment.evaluate_into(t, &mut state);
        println!(
            "{:>8.3} {:>10.4} {:>10.4} {:>10.4}",
            t, state[0], state[1], state[2]
        );
    }

    // ------------------------------
    // 4. Check against motion limits
    // ------------------------------
    let settings = ExtremumSettings::default();
    for (derivative, name, limit) in [(1, "velocity", v_lim), (2, "acceleration", a_lim)] {
        // Roots of the next derivative are the critical points
        let roots = segment.derivative_roots(derivative + 1, &CompanionMatrixSolver);
        let mm = segment.find_min_max_with_roots(0.0, duration, derivative, &roots, &settings)?;
        let peak = mm.max.value.abs().max(mm.min.value.abs());
        println!(
            "{name}: min {:.4} at t = {:.4}, max {:.4} at t = {:.4} (limit {limit})",
            mm.min.value, mm.min.time, mm.max.value, mm.max.time
        );
        if peak > limit {
            eprintln!("Warning: {name} limit exceeded by {:.4}.", peak - limit);
        }
    }

    Ok(())
}
