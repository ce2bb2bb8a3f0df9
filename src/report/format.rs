//! Formatted terminal output.
//!
//! Formatting lives in one place so the numeric code stays free of
//! presentation concerns and output changes stay localized.

use crate::app::pipeline::ConversionRun;
use crate::domain::Telescope;
use crate::registry::{ElementOrder, ParameterOrder};
use crate::report::GridSummary;
use crate::stats::{DeviationStats, RepeatSummary};

/// Parameter order as a table.
pub fn format_parameter_table(order: &ParameterOrder) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>2}  {:<16} {:<10} {:<8}\n",
        "#", "FERRE", "TAG", "FLAG"
    ));
    for (i, slot) in order.slots().enumerate() {
        out.push_str(&format!(
            "{:>2}  {:<16} {:<10} {:<8}\n",
            i, slot.ferre_name, slot.tag, slot.flag
        ));
    }
    out
}

/// Element order as a table.
pub fn format_element_table(order: &ElementOrder) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>2}  {:<5} {:<4} {:<8} {:<9}\n",
        "#", "ELEM", "REF", "TAG", "LABEL"
    ));
    for i in 0..order.len() {
        let reference = if order.relative_to_fe[i] { "Fe" } else { "M" };
        out.push_str(&format!(
            "{:>2}  {:<5} {:<4} {:<8} {:<9}\n",
            i, order.symbols[i], reference, order.tags[i], order.labels[i]
        ));
    }
    out
}

/// Grid constants, chip ranges and detector gaps.
pub fn format_grid_summary(summary: &GridSummary) -> String {
    let c = &summary.constants;
    let mut out = String::new();

    out.push_str("=== aspcap - wavelength grids ===\n");
    out.push_str(&format!(
        "apStar: logw0={} dlogw={:e} n={}  ({:.3}..{:.3} A)\n",
        c.logw0, c.dlogw, c.nw_apstar, summary.apstar_wave_min, summary.apstar_wave_max
    ));
    out.push_str(&format!("ASPCAP: n={} (chips concatenated)\n\n", c.nw_aspcap()));

    out.push_str(&format!(
        "{:<6} {:>10} {:>6} {:>14} {:>14} {:>20}\n",
        "chip", "logw0", "n", "apStar", "chip", "wavelength (A)"
    ));
    for s in &summary.chips {
        let cc = c.chip(s.chip);
        out.push_str(&format!(
            "{:<6} {:>10} {:>6} {:>14} {:>14} {:>9.3}..{:<9.3}\n",
            s.chip.name(),
            cc.logw0,
            cc.nw,
            s.apstar.to_string(),
            s.local.to_string(),
            s.wave_min,
            s.wave_max
        ));
    }

    out.push_str("\nGaps (apStar pixels with no chip coverage):\n");
    let total: usize = summary.gaps.iter().map(|g| g.len()).sum();
    for g in &summary.gaps {
        out.push_str(&format!("  {} ({} px)\n", g, g.len()));
    }
    out.push_str(&format!("  total: {total} px"));
    out
}

/// Result of a table conversion.
pub fn format_conversion_summary(run: &ConversionRun) -> String {
    format!(
        "Converted {} column(s) [{}]: {} -> {} rows, written to {}",
        run.columns.len(),
        run.columns.join(", "),
        run.rows_in,
        run.rows_out,
        run.output.display()
    )
}

/// Repeat-observation scatter per quantity and telescope.
pub fn format_repeat_summary(summary: &RepeatSummary) -> String {
    let mut out = String::new();
    out.push_str("=== aspcap - repeat observations ===\n");
    out.push_str(&format!(
        "Stars: {}  with repeats: {}  repeat observations: {}\n\n",
        summary.n_stars, summary.n_repeat_stars, summary.n_repeat_observations
    ));

    if summary.n_repeat_observations == 0 {
        out.push_str("No star was observed more than once.");
        return out;
    }

    out.push_str(&format!("{:<10} {:<8} {:>6} {:>12} {:>12}\n", "quantity", "group", "n", "mean", "rms"));
    for q in &summary.quantities {
        out.push_str(&stats_row(&q.quantity.label, "all", &q.all));
        for t in Telescope::ALL {
            if let Some(stats) = q.by_telescope.get(&t) {
                out.push_str(&stats_row("", t.name(), stats));
            }
        }
    }
    out.pop();
    out
}

fn stats_row(label: &str, group: &str, stats: &DeviationStats) -> String {
    format!(
        "{:<10} {:<8} {:>6} {:>12} {:>12}\n",
        label,
        group,
        stats.n,
        fmt_num(stats.mean),
        fmt_num(stats.rms)
    )
}

fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value.abs() >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridGeometry;
    use crate::registry::{element_order, parameter_order};
    use crate::stats::{Observation, Quantity, summarize_repeats};

    #[test]
    fn parameter_table_lists_all_slots() {
        let txt = format_parameter_table(parameter_order());
        assert_eq!(txt.lines().count(), 10);
        assert!(txt.lines().nth(1).unwrap().contains("TEFF"));
        assert!(txt.contains("LOG10VDOP"));
    }

    #[test]
    fn element_table_shows_reference() {
        let txt = format_element_table(element_order());
        assert_eq!(txt.lines().count(), 27);
        let na = txt.lines().find(|l| l.contains("Na_Fe")).unwrap();
        assert!(na.contains("[Na/Fe]"));
    }

    #[test]
    fn grid_summary_lists_chips_and_gaps() {
        let summary = GridSummary::from_geometry(GridGeometry::apogee().unwrap());
        let txt = format_grid_summary(&summary);
        assert!(txt.contains("[246, 3274)"));
        assert!(txt.contains("[5523, 7514)"));
        assert!(txt.contains("[3274, 3585) (311 px)"));
        assert!(txt.ends_with("total: 1061 px"));
    }

    #[test]
    fn repeat_summary_without_repeats() {
        let summary = summarize_repeats(
            &[Quantity::parameter(0)],
            &[Observation {
                star: "A".to_string(),
                telescope: None,
                values: vec![4500.0],
            }],
        );
        let txt = format_repeat_summary(&summary);
        assert!(txt.ends_with("No star was observed more than once."));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(f64::NAN), "-");
        assert_eq!(fmt_num(25.04), "25.0");
        assert_eq!(fmt_num(0.01234), "0.0123");
    }
}
