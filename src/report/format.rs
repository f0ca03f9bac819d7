//! Formatted terminal output: run summary, fitted-value table, model catalogue.

use crate::domain::{FitResult, ModelKind, PolynomialOrder};
use crate::io::ingest::IngestedData;
use crate::report::{Residual, format_number};

/// Format the run summary (dataset stats + chosen model + equation + quality).
pub fn format_run_summary(ingest: &IngestedData, result: &FitResult) -> String {
    let mut out = String::new();

    out.push_str("=== regress - curve fit ===\n");
    out.push_str(&format!("Model: {} ({})\n", result.model.label(), result.model));
    if let Some((x_name, y_name)) = &ingest.header {
        out.push_str(&format!("Columns: x={x_name} | y={y_name}\n"));
    }
    out.push_str(&format!(
        "Points: n={} | x=[{:.4}, {:.4}] | y=[{:.4}, {:.4}]\n",
        ingest.stats.n_points, ingest.stats.x_min, ingest.stats.x_max, ingest.stats.y_min, ingest.stats.y_max
    ));

    out.push('\n');
    if result.valid {
        out.push_str(&format!("Best fit: y = {}\n", result.equation));
        out.push_str(&format!("- coefficients: {}\n", fmt_vec(&result.coefficients)));
        if let Some(q) = &result.quality {
            out.push_str(&format!(
                "- quality: SSE={:.6} RMSE={:.6} R²={:.6}\n",
                q.sse, q.rmse, q.r_squared
            ));
        }
    } else {
        out.push_str(&format!("{}\n", result.equation));
    }

    out
}

/// Format observed and fitted values side by side.
pub fn format_table(rows: &[Residual]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:>14} {:>14} {:>14} {:>14}\n", "x", "y_original", "y_fitted", "residual").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<14} {:-<14} {:-<14} {:-<14}\n", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:>14} {:>14} {:>14} {:>14}\n",
                format_number(r.x, 6),
                format_number(r.y_obs, 6),
                r.y_fit.map(|v| format_number(v, 6)).unwrap_or_default(),
                r.residual().map(|v| format_number(v, 6)).unwrap_or_default(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the selectable models in display order.
pub fn format_catalogue() -> String {
    let mut out = String::new();
    out.push_str("Available models:\n");
    for model in ModelKind::catalogue() {
        match model {
            ModelKind::Polynomial(order) if order.get() != PolynomialOrder::MIN => {}
            ModelKind::Polynomial(_) => out.push_str(&format!(
                "  {:<12} {} (--order {}..{})\n",
                model.key(),
                model.label(),
                PolynomialOrder::MIN,
                PolynomialOrder::MAX
            )),
            _ => out.push_str(&format!("  {:<12} {}\n", model.key(), model.label())),
        }
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
