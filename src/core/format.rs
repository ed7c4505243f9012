pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn format_compact(value: f64) -> String {
    if value >= 1e6 {
        format!("${:.1}M", round_tenths(value / 1e6))
    } else if value >= 1e3 {
        format!("${:.1}K", round_tenths(value / 1e3))
    } else {
        format!("${value}")
    }
}

// Ties round up, so 1_250 reads `$1.3K`.
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
