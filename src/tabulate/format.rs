//! C `printf` style `%g` formatting, as the simulator's table reader expects it.

/// Format `value` like C's `%.{precision}g`.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // The exponent after rounding to `precision` significant digits decides the style
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let mantissa = trim_fraction(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Drop trailing zeros of the fraction and a dangling decimal point.
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `%- 22.15g`: left-justified in 22 columns, a space where a minus sign would go.
fn format_column(value: f64) -> String {
    let g = format_g(value, 15);
    let signed = if g.starts_with('-') { g } else { format!(" {}", g) };
    format!("{:<22}", signed)
}

/// One table line: `%8d %- 22.15g %- 22.15g %- 22.15g`.
pub fn format_row(index: usize, angle: f64, energy: f64, force: f64) -> String {
    format!(
        "{:8} {} {} {}",
        index,
        format_column(angle),
        format_column(energy),
        format_column(force)
    )
}
