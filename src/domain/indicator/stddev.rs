//! Population standard deviation (divides by N, not N-1).

pub fn population_stddev(window: &[f64], mean: f64) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let variance: f64 = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;

    variance.sqrt()
}
