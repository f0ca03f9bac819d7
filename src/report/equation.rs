//! Equation rendering.
//!
//! Templates (without the leading `y = `):
//!
//! | model       | template                          |
//! |-------------|-----------------------------------|
//! | linear      | `a + b·x`                         |
//! | exponential | `a·e^(b·x)`                       |
//! | logarithmic | `a + b·ln(x)`                     |
//! | power       | `a·x^b`                           |
//! | polynomial  | `a0 + a1·x + a2·x² + … + ak·xᵏ`   |
//!
//! Numbers carry `significant_digits` significant digits (default 4), in fixed
//! notation for magnitudes in `[1e-3, 1e5)` and scientific notation otherwise,
//! with trailing zeros trimmed.
//!
//! Suppression policy: in the additive templates term `i` contributes at most
//! `|cᵢ|·Xⁱ` over the data, where `X` is the largest `|x|` (`|ln(x)|` for the
//! logarithmic model). A term is dropped when that contribution is below
//! `1e-9` times the largest contribution, so a fitted intercept of `3e-16`
//! does not show up as noise while tiny coefficients on large x (or tiny y
//! overall) are kept. The multiplicative templates always show both
//! coefficients. Negative terms are joined with ` - `, never ` + -`.

use serde::{Deserialize, Serialize};

use crate::domain::ModelKind;

/// Shown instead of an equation when the fit is degenerate.
pub const CANNOT_COMPUTE: &str = "Cannot compute a fit for this data.";

pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 4;

/// Upper bound on significant digits; f64 carries no more than 17.
pub const MAX_SIGNIFICANT_DIGITS: usize = 15;

const SUPPRESS_RTOL: f64 = 1e-9;

/// Number formatting for rendered equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationStyle {
    pub significant_digits: usize,
}

impl EquationStyle {
    /// Digits are clamped to `1..=MAX_SIGNIFICANT_DIGITS`.
    pub fn new(significant_digits: usize) -> Self {
        Self {
            significant_digits: significant_digits.clamp(1, MAX_SIGNIFICANT_DIGITS),
        }
    }
}

impl Default for EquationStyle {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNIFICANT_DIGITS)
    }
}

/// Render the fitted equation for `model`, judging term size on `|x| <= 1`.
///
/// Returns [`CANNOT_COMPUTE`] when the coefficients are missing or not finite.
pub fn format_equation(model: ModelKind, coefficients: &[f64], style: &EquationStyle) -> String {
    format_equation_scaled(model, coefficients, 1.0, style)
}

/// Render the fitted equation for `model`.
///
/// `extent` is the largest `|x|` of the data (`|ln(x)|` for logarithmic
/// fits) and decides which additive terms are negligible.
pub fn format_equation_scaled(model: ModelKind, coefficients: &[f64], extent: f64, style: &EquationStyle) -> String {
    if coefficients.len() != model.coefficient_count() || coefficients.iter().any(|c| !c.is_finite()) {
        return CANNOT_COMPUTE.to_string();
    }
    let digits = style.significant_digits;
    let extent = if extent.is_finite() { extent.abs() } else { 1.0 };

    match model {
        ModelKind::Linear => join_terms(
            &[(coefficients[0], String::new()), (coefficients[1], "x".to_string())],
            extent,
            digits,
        ),
        ModelKind::Logarithmic => join_terms(
            &[(coefficients[0], String::new()), (coefficients[1], "ln(x)".to_string())],
            extent,
            digits,
        ),
        ModelKind::Polynomial(_) => {
            let terms: Vec<(f64, String)> = coefficients
                .iter()
                .enumerate()
                .map(|(power, &c)| (c, power_of_x(power)))
                .collect();
            join_terms(&terms, extent, digits)
        }
        ModelKind::Exponential => format!(
            "{}·e^({}·x)",
            format_number(coefficients[0], digits),
            format_number(coefficients[1], digits)
        ),
        ModelKind::Power => format!(
            "{}·x^{}",
            format_number(coefficients[0], digits),
            format_number(coefficients[1], digits)
        ),
    }
}

/// Format `value` with `significant_digits` significant digits.
pub fn format_number(value: f64, significant_digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = significant_digits.max(1);
    let precision = digits - 1;
    // Rounding can carry into the next decade (99999.7 -> 1.000e5), so the
    // notation is chosen from the rounded exponent.
    let sci = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return value.to_string();
    };
    let magnitude = exponent
        .parse::<i32>()
        .unwrap_or_else(|_| value.abs().log10().floor() as i32);

    if (-3..5).contains(&magnitude) {
        let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}"))
    } else {
        format!("{}e{exponent}", trim_fraction(mantissa))
    }
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

fn power_of_x(power: usize) -> String {
    match power {
        0 => String::new(),
        1 => "x".to_string(),
        p => format!("x{}", superscript(&p.to_string())),
    }
}

fn superscript(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}

/// Join `(coefficient, variable part)` terms into `c0 + c1·v1 - c2·v2 …`.
///
/// Term `i` is weighted by `extentⁱ` when deciding whether it is negligible.
fn join_terms(terms: &[(f64, String)], extent: f64, digits: usize) -> String {
    let contributions: Vec<f64> = terms
        .iter()
        .enumerate()
        .map(|(power, (c, _))| c.abs() * extent.powi(power as i32))
        .collect();
    let largest = contributions.iter().copied().fold(0.0_f64, f64::max);
    let threshold = SUPPRESS_RTOL * largest;

    let mut out = String::new();
    for ((c, variable), _) in terms
        .iter()
        .zip(&contributions)
        .filter(|(_, contribution)| **contribution > threshold)
    {
        let magnitude = format_number(c.abs(), digits);
        let body = if variable.is_empty() {
            magnitude
        } else {
            format!("{magnitude}·{variable}")
        };

        let negative = *c < 0.0;
        match (out.is_empty(), negative) {
            (true, false) => {}
            (true, true) => out.push('-'),
            (false, false) => out.push_str(" + "),
            (false, true) => out.push_str(" - "),
        }
        out.push_str(&body);
    }

    if out.is_empty() {
        out.push('0');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(model: ModelKind, coefficients: &[f64]) -> String {
        format_equation(model, coefficients, &EquationStyle::default())
    }

    #[test]
    fn numbers_use_four_significant_digits() {
        assert_eq!(format_number(2.0, 4), "2");
        assert_eq!(format_number(3.14159, 4), "3.142");
        assert_eq!(format_number(-12.5, 4), "-12.5");
        assert_eq!(format_number(1234.56, 4), "1235");
        assert_eq!(format_number(0.0012346, 4), "0.001235");
        assert_eq!(format_number(9.99996, 4), "10");
        assert_eq!(format_number(0.000012346, 4), "1.235e-5");
        assert_eq!(format_number(123456.0, 4), "1.235e5");
        assert_eq!(format_number(100000.0, 4), "1e5");
    }

    #[test]
    fn notation_follows_the_rounded_value() {
        assert_eq!(format_number(99999.7, 4), "1e5");
        assert_eq!(format_number(-99999.7, 4), "-1e5");
        assert_eq!(format_number(0.00099996, 4), "0.001");
        assert_eq!(format_number(99994.0, 5), "99994");
    }

    #[test]
    fn small_coefficients_on_large_x_are_kept() {
        let eq = format_equation_scaled(ModelKind::Linear, &[1.0e6, 1.0e-4], 2.0e6, &EquationStyle::default());
        assert_eq!(eq, "1e6 + 1e-4·x");
        let cubic = ModelKind::polynomial(3).unwrap();
        let eq = format_equation_scaled(cubic, &[-8.0e9, 1.2e7, -6000.0, 1.0], 2006.0, &EquationStyle::default());
        assert_eq!(eq, "-8e9 + 1.2e7·x - 6000·x² + 1·x³");
    }

    #[test]
    fn tiny_scale_fits_are_not_zeroed() {
        assert_eq!(render(ModelKind::Linear, &[0.0, 1.0e-10]), "1e-10·x");
        assert_eq!(render(ModelKind::Linear, &[2.0e-10, 1.0e-10]), "2e-10 + 1e-10·x");
        // Noise far below the real terms still goes.
        assert_eq!(render(ModelKind::Linear, &[1.0e-27, 1.0e-10]), "1e-10·x");
    }

    #[test]
    fn linear_drops_negligible_intercept() {
        assert_eq!(render(ModelKind::Linear, &[3.0e-16, 2.0]), "2·x");
        assert_eq!(render(ModelKind::Linear, &[0.0, 0.0]), "0");
    }

    #[test]
    fn negative_terms_never_render_as_plus_minus() {
        let eq = render(ModelKind::Linear, &[1.5, -2.25]);
        assert_eq!(eq, "1.5 - 2.25·x");
        let eq = render(ModelKind::Logarithmic, &[-1.0, -0.5]);
        assert_eq!(eq, "-1 - 0.5·ln(x)");
        let cubic = ModelKind::polynomial(3).unwrap();
        let eq = render(cubic, &[-4.0, 3.0, -2.0, 1.0]);
        assert_eq!(eq, "-4 + 3·x - 2·x² + 1·x³");
        assert!(!eq.contains("+ -"));
    }

    #[test]
    fn polynomial_uses_superscript_powers() {
        let quintic = ModelKind::polynomial(5).unwrap();
        assert_eq!(
            render(quintic, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
            "1 + 1·x + 1·x² + 1·x³ + 1·x⁴ + 1·x⁵"
        );
    }

    #[test]
    fn multiplicative_forms_keep_both_coefficients() {
        assert_eq!(render(ModelKind::Exponential, &[1.0, 1.0]), "1·e^(1·x)");
        assert_eq!(render(ModelKind::Exponential, &[2.5, -0.3]), "2.5·e^(-0.3·x)");
        assert_eq!(render(ModelKind::Power, &[1.0, 2.0]), "1·x^2");
        assert_eq!(render(ModelKind::Power, &[3.0, 0.0]), "3·x^0");
    }

    #[test]
    fn non_finite_coefficients_cannot_be_rendered() {
        assert_eq!(render(ModelKind::Linear, &[f64::NAN, 1.0]), CANNOT_COMPUTE);
        assert_eq!(render(ModelKind::Power, &[f64::INFINITY, 1.0]), CANNOT_COMPUTE);
        assert_eq!(render(ModelKind::Linear, &[]), CANNOT_COMPUTE);
    }

    #[test]
    fn style_controls_precision() {
        let style = EquationStyle::new(2);
        assert_eq!(format_equation(ModelKind::Linear, &[1.2345, 6.789], &style), "1.2 + 6.8·x");
        assert_eq!(EquationStyle::new(0).significant_digits, 1);
        assert_eq!(EquationStyle::new(99).significant_digits, MAX_SIGNIFICANT_DIGITS);
    }
}
