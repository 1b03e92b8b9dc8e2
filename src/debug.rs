use nalgebra::DMatrix;
use num_complex::Complex64;
use pretty_dtoa::{dtoa, FmtFloatConfig};

const FLOAT_CONFIG: FmtFloatConfig = FmtFloatConfig::default()
    .add_point_zero(false)
    .max_significant_digits(9);

pub fn format_f64_vec(v: &[f64]) -> String {
    let a: Vec<String> = v.iter().map(|f| dtoa(*f, FLOAT_CONFIG)).collect();
    format!("[{}]", a.join(", "))
}

fn format_complex(z: &Complex64) -> String {
    format!(
        "{}{}j{}",
        dtoa(z.re, FLOAT_CONFIG),
        if z.im.signum() < 0.0 { "-" } else { "+" },
        dtoa(z.im.abs(), FLOAT_CONFIG)
    )
}

pub fn format_rect_vec(v: &[Complex64]) -> String {
    let a: Vec<String> = v.iter().map(format_complex).collect();
    format!("[{}]", a.join(", "))
}

/// Formats magnitudes and angles (radians) as `vm∠deg°` pairs.
pub fn format_polar_vec(vm: &[f64], va: &[f64]) -> String {
    let a: Vec<String> = vm
        .iter()
        .zip(va)
        .map(|(m, a)| {
            format!(
                "{}\u{2220}{}\u{00B0}",
                dtoa(*m, FLOAT_CONFIG),
                dtoa(a.to_degrees(), FLOAT_CONFIG)
            )
        })
        .collect();
    format!("[{}]", a.join(", "))
}

/// One row per line.
pub fn format_f64_mat(m: &DMatrix<f64>) -> String {
    let rows: Vec<String> = m
        .row_iter()
        .map(|row| {
            let v: Vec<f64> = row.iter().copied().collect();
            format_f64_vec(&v)
        })
        .collect();
    rows.join("\n")
}

/// Y-bus rows with zero entries elided as `0`.
pub fn format_ybus(y_bus: &DMatrix<Complex64>) -> String {
    let rows: Vec<String> = y_bus
        .row_iter()
        .map(|row| {
            let v: Vec<String> = row
                .iter()
                .map(|z| {
                    if z.re == 0.0 && z.im == 0.0 {
                        "0".to_string()
                    } else {
                        format_complex(z)
                    }
                })
                .collect();
            format!("[{}]", v.join(", "))
        })
        .collect();
    rows.join("\n")
}
