use sensorgraph_schemas::reading::Field;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// Rounds to `decimals` places with halves going away from zero.
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Converts a stored value to its display unit (°C becomes °F, everything else passes through).
pub fn to_display(field: Field, value: f64) -> f64 {
    if field.is_temperature() {
        celsius_to_fahrenheit(value)
    } else {
        value
    }
}
