use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// Power flow options.
///
/// Build with [`PFOptionsBuilder`] to override individual defaults:
///
/// ```
/// use loadflow::PFOptionsBuilder;
///
/// let opt = PFOptionsBuilder::default()
///     .slack_bus(2)
///     .max_mismatch_mw(0.01)
///     .build()
///     .unwrap();
/// assert_eq!(opt.base_mva, 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct PFOptions {
    /// External number of the slack bus. Default value is 1.
    pub slack_bus: usize,

    /// System MVA base used for converting power into per-unit quantities.
    /// Default value is 100.
    pub base_mva: f64,

    /// Starting voltage magnitude of load buses (p.u.). Default value is 1.0.
    pub vm_start: f64,

    /// Starting voltage angle of all buses (degrees). Default value is 0.
    pub va_start: f64,

    /// Termination tolerance on active power mismatch (MW).
    /// Default value is 0.1.
    pub max_mismatch_mw: f64,

    /// Termination tolerance on reactive power mismatch (Mvar).
    /// Default value is 0.1.
    pub max_mismatch_mvar: f64,

    /// Maximum number of Newton iterations. Default value is 50.
    pub max_it: usize,

    /// Minimum operating voltage magnitude (p.u.). Default value is 0.95.
    pub vmin: f64,

    /// Maximum operating voltage magnitude (p.u.). Default value is 1.05.
    pub vmax: f64,
}

impl Default for PFOptions {
    fn default() -> Self {
        Self {
            slack_bus: 1,
            base_mva: 100.0,
            vm_start: 1.0,
            va_start: 0.0,
            max_mismatch_mw: 0.1,
            max_mismatch_mvar: 0.1,
            max_it: 50,
            vmin: 0.95,
            vmax: 1.05,
        }
    }
}

impl PFOptions {
    /// Checks the options for values the solver cannot work with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check(
            Some(self.base_mva),
            Some(self.vm_start),
            Some(self.va_start),
            Some(self.max_mismatch_mw),
            Some(self.max_mismatch_mvar),
            Some(self.max_it),
            Some(self.vmin),
            Some(self.vmax),
        )
        .map_err(ConfigurationError::InvalidOption)
    }

    /// Starting voltage angle in radians.
    pub(crate) fn va_start_rad(&self) -> f64 {
        self.va_start.to_radians()
    }
}

impl PFOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        check(
            self.base_mva,
            self.vm_start,
            self.va_start,
            self.max_mismatch_mw,
            self.max_mismatch_mvar,
            self.max_it,
            self.vmin,
            self.vmax,
        )
    }
}

// Fields left unset fall back to defaults and are not checked here.
#[allow(clippy::too_many_arguments)]
fn check(
    base_mva: Option<f64>,
    vm_start: Option<f64>,
    va_start: Option<f64>,
    max_mismatch_mw: Option<f64>,
    max_mismatch_mvar: Option<f64>,
    max_it: Option<usize>,
    vmin: Option<f64>,
    vmax: Option<f64>,
) -> Result<(), String> {
    positive("base_mva", base_mva)?;
    positive("vm_start", vm_start)?;
    positive("max_mismatch_mw", max_mismatch_mw)?;
    positive("max_mismatch_mvar", max_mismatch_mvar)?;
    if let Some(va) = va_start {
        if !va.is_finite() {
            return Err(format!("va_start must be finite (got {})", va));
        }
    }
    if max_it == Some(0) {
        return Err("max_it must be at least 1".to_string());
    }
    let vmin = vmin.unwrap_or(PFOptions::default().vmin);
    let vmax = vmax.unwrap_or(PFOptions::default().vmax);
    if !(vmin.is_finite() && vmax.is_finite() && vmin < vmax) {
        return Err(format!(
            "vmin ({}) must be less than vmax ({})",
            vmin, vmax
        ));
    }
    Ok(())
}

fn positive(name: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => {
            Err(format!("{} must be positive and finite (got {})", name, v))
        }
        _ => Ok(()),
    }
}
