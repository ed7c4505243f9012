pub const DEFAULT_TICK_COUNT: usize = 5;

pub fn axis_ticks(max_value: f64, tick_count: usize) -> Vec<f64> {
    if tick_count < 2 || !max_value.is_finite() || max_value <= 0.0 {
        return vec![0.0; tick_count];
    }

    let rough_step = max_value / (tick_count - 1) as f64;
    let magnitude = 10f64.powf(rough_step.log10().floor());
    let step = (rough_step / magnitude).ceil() * magnitude;
    (0..tick_count).map(|i| i as f64 * step).collect()
}
