//! Repeat-observation statistics.
//!
//! Stars observed more than once give a direct estimate of measurement
//! scatter: each observation's deviation from that star's mean, per quantity,
//! aggregated per telescope.
//!
//! Missing values (NaN) are skipped when forming the star mean and when
//! aggregating; a missing value yields a NaN deviation.

use std::collections::BTreeMap;

use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::domain::Telescope;
use crate::registry::{ELEMENTS, PARAMETERS};

/// Number of leading parameter slots compared between repeats.
pub const N_REPEAT_PARAMS: usize = 7;

/// What a measured quantity refers to in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "index")]
pub enum QuantityKind {
    Parameter(usize),
    Element(usize),
}

/// One measured quantity (a table column).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    /// Column name: parameter tag or element symbol.
    pub name: String,
    /// Display label.
    pub label: String,
    pub kind: QuantityKind,
}

impl Quantity {
    pub fn parameter(index: usize) -> Self {
        let slot = PARAMETERS[index];
        Self {
            name: slot.tag.to_string(),
            label: slot.tag.to_string(),
            kind: QuantityKind::Parameter(index),
        }
    }

    pub fn element(index: usize) -> Self {
        let spec = ELEMENTS[index];
        Self {
            name: spec.symbol.to_string(),
            label: spec.label(),
            kind: QuantityKind::Element(index),
        }
    }

    /// Histogram bins for deviations of this quantity.
    ///
    /// Bins span the closed interval `[lo, hi]`, so there are 40 of them for
    /// every quantity. Last-edge-exclusive `arange(lo, hi, width)` edges would
    /// stop one bin short of `hi` (39 bins, last edge `hi - width`).
    pub fn histogram_spec(&self) -> HistogramSpec {
        match self.kind {
            QuantityKind::Parameter(0) => HistogramSpec::new(-200.0, 200.0, 10.0),
            QuantityKind::Parameter(1) => HistogramSpec::new(-0.5, 0.5, 0.025),
            _ => HistogramSpec::new(-0.2, 0.2, 0.01),
        }
    }
}

/// Quantities compared between repeats, in registry order: the leading
/// parameters, then every element.
pub fn repeat_quantities() -> Vec<Quantity> {
    (0..N_REPEAT_PARAMS)
        .map(Quantity::parameter)
        .chain((0..ELEMENTS.len()).map(Quantity::element))
        .collect()
}

/// One observation of one star.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub star: String,
    pub telescope: Option<Telescope>,
    /// Values parallel to the quantity list (NaN when missing).
    pub values: Vec<f64>,
}

/// Deviations of one observation from its star's mean.
#[derive(Debug, Clone, PartialEq)]
pub struct StarDeviation {
    pub star: String,
    pub telescope: Option<Telescope>,
    /// Number of observations of this star.
    pub n_obs: usize,
    pub deviations: Vec<f64>,
}

/// Equal-width histogram bins over `[lo, hi]`.
/// Distance from a bin edge, in bin widths, below which a value is on the edge.
const EDGE_TOL: f64 = 1e-9;

/// Equal-width bins covering `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramSpec {
    pub lo: f64,
    pub hi: f64,
    pub width: f64,
}

impl HistogramSpec {
    pub fn new(lo: f64, hi: f64, width: f64) -> Self {
        Self { lo, hi, width }
    }

    pub fn n_bins(&self) -> usize {
        ((self.hi - self.lo) / self.width).round().max(1.0) as usize
    }

    /// Left edge of bin `i` (`i == n_bins()` gives the right edge of the last bin).
    pub fn edge(&self, i: usize) -> f64 {
        self.lo + i as f64 * self.width
    }

    /// Bin of `v`; bins are `[edge(i), edge(i + 1))`, the last one closed.
    ///
    /// A value within `EDGE_TOL` bin widths of an edge counts as on that edge,
    /// so `0.1` lands in the bin starting at `0.1` even though
    /// `-0.5 + 24 * 0.025` rounds to a slightly larger float.
    pub fn bin(&self, v: f64) -> Option<usize> {
        if !(v >= self.lo && v <= self.hi) {
            return None;
        }
        let t = (v - self.lo) / self.width;
        let nearest = t.round();
        let idx = if (t - nearest).abs() <= EDGE_TOL { nearest } else { t.floor() };
        Some((idx.max(0.0) as usize).min(self.n_bins() - 1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub spec: HistogramSpec,
    pub counts: Vec<usize>,
    /// Finite deviations outside `[lo, hi]`.
    pub outside: usize,
}

impl Histogram {
    pub fn new(spec: HistogramSpec) -> Self {
        Self {
            spec,
            counts: vec![0; spec.n_bins()],
            outside: 0,
        }
    }

    pub fn add(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        match self.spec.bin(v) {
            Some(i) => self.counts[i] += 1,
            None => self.outside += 1,
        }
    }
}

/// Aggregate of deviations for one quantity and one group of observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationStats {
    pub n: usize,
    pub mean: f64,
    /// Root-mean-square deviation.
    pub rms: f64,
    pub histogram: Histogram,
}

impl DeviationStats {
    fn from_values(spec: HistogramSpec, values: impl Iterator<Item = f64>) -> Self {
        let mut histogram = Histogram::new(spec);
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for v in values.filter(|v| v.is_finite()) {
            n += 1;
            sum += v;
            sum_sq += v * v;
            histogram.add(v);
        }
        let (mean, rms) = if n > 0 {
            (sum / n as f64, (sum_sq / n as f64).sqrt())
        } else {
            (f64::NAN, f64::NAN)
        };
        Self {
            n,
            mean,
            rms,
            histogram,
        }
    }
}

/// Repeat statistics of one quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityStats {
    pub quantity: Quantity,
    pub all: DeviationStats,
    pub by_telescope: BTreeMap<Telescope, DeviationStats>,
}

/// Repeat statistics of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatSummary {
    pub n_stars: usize,
    pub n_repeat_stars: usize,
    pub n_repeat_observations: usize,
    pub quantities: Vec<QuantityStats>,
}

/// Deviation of every repeat observation from its star's mean.
///
/// Stars are visited in name order; observations keep their input order
/// within a star.
pub fn deviations_from_mean(observations: &[Observation]) -> Vec<StarDeviation> {
    let mut by_star: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for obs in observations {
        by_star.entry(obs.star.as_str()).or_default().push(obs);
    }

    let groups: Vec<Vec<&Observation>> = by_star
        .into_values()
        .filter(|group| group.len() > 1)
        .collect();

    groups
        .par_iter()
        .flat_map_iter(|group| star_deviations(group))
        .collect()
}

fn star_deviations(group: &[&Observation]) -> Vec<StarDeviation> {
    let n_obs = group.len();
    let n_q = group.iter().map(|o| o.values.len()).max().unwrap_or(0);
    let values = DMatrix::from_fn(n_obs, n_q, |r, c| {
        group[r].values.get(c).copied().unwrap_or(f64::NAN)
    });

    let means: Vec<f64> = values.column_iter().map(|col| finite_mean(col.iter().copied())).collect();
    let deviations = DMatrix::from_fn(n_obs, n_q, |r, c| values[(r, c)] - means[c]);

    group
        .iter()
        .enumerate()
        .map(|(r, obs)| StarDeviation {
            star: obs.star.clone(),
            telescope: obs.telescope,
            n_obs,
            deviations: deviations.row(r).iter().copied().collect(),
        })
        .collect()
}

fn finite_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (n, sum) = values
        .filter(|v| v.is_finite())
        .fold((0usize, 0.0), |(n, s), v| (n + 1, s + v));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Aggregate repeat deviations per quantity and telescope.
pub fn summarize_repeats(quantities: &[Quantity], observations: &[Observation]) -> RepeatSummary {
    let deviations = deviations_from_mean(observations);

    let mut stars: Vec<&str> = observations.iter().map(|o| o.star.as_str()).collect();
    stars.sort_unstable();
    stars.dedup();
    let mut repeat_stars: Vec<&str> = deviations.iter().map(|d| d.star.as_str()).collect();
    repeat_stars.dedup();

    debug!(
        stars = stars.len(),
        repeat_stars = repeat_stars.len(),
        repeat_observations = deviations.len(),
        "repeat observations"
    );

    let stats = quantities
        .iter()
        .enumerate()
        .map(|(q, quantity)| {
            let spec = quantity.histogram_spec();
            let column = |tel: Option<Telescope>| {
                deviations
                    .iter()
                    .filter(move |d| tel.is_none() || d.telescope == tel)
                    .map(move |d| d.deviations.get(q).copied().unwrap_or(f64::NAN))
            };

            let by_telescope = Telescope::ALL
                .into_iter()
                .filter(|t| deviations.iter().any(|d| d.telescope == Some(*t)))
                .map(|t| (t, DeviationStats::from_values(spec, column(Some(t)))))
                .collect();

            QuantityStats {
                quantity: quantity.clone(),
                all: DeviationStats::from_values(spec, column(None)),
                by_telescope,
            }
        })
        .collect();

    RepeatSummary {
        n_stars: stars.len(),
        n_repeat_stars: repeat_stars.len(),
        n_repeat_observations: deviations.len(),
        quantities: stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(star: &str, telescope: Option<Telescope>, values: &[f64]) -> Observation {
        Observation {
            star: star.to_string(),
            telescope,
            values: values.to_vec(),
        }
    }

    #[test]
    fn singletons_are_ignored() {
        let devs = deviations_from_mean(&[obs("A", None, &[4500.0]), obs("B", None, &[4600.0])]);
        assert!(devs.is_empty());
    }

    #[test]
    fn deviations_are_relative_to_star_mean() {
        let observations = vec![
            obs("A", Some(Telescope::Apo25m), &[4500.0, 2.0]),
            obs("B", Some(Telescope::Apo25m), &[5000.0, 3.0]),
            obs("A", Some(Telescope::Lco25m), &[4520.0, f64::NAN]),
            obs("A", Some(Telescope::Apo1m), &[4540.0, 2.3]),
        ];
        let devs = deviations_from_mean(&observations);
        assert_eq!(devs.len(), 3);
        assert!(devs.iter().all(|d| d.star == "A" && d.n_obs == 3));

        assert_eq!(devs[0].deviations[0], -20.0);
        assert_eq!(devs[1].deviations[0], 0.0);
        assert_eq!(devs[2].deviations[0], 20.0);

        // Mean over finite values only: (2.0 + 2.3) / 2.
        assert!((devs[0].deviations[1] + 0.15).abs() < 1e-12);
        assert!(devs[1].deviations[1].is_nan());
        assert!((devs[2].deviations[1] - 0.15).abs() < 1e-12);
    }

    #[test]
    fn summary_groups_by_telescope() {
        let quantities = vec![Quantity::parameter(0)];
        let observations = vec![
            obs("A", Some(Telescope::Apo25m), &[4500.0]),
            obs("A", Some(Telescope::Apo25m), &[4540.0]),
            obs("B", Some(Telescope::Lco25m), &[5000.0]),
            obs("B", None, &[5100.0]),
            obs("C", Some(Telescope::Apo1m), &[6000.0]),
        ];
        let summary = summarize_repeats(&quantities, &observations);
        assert_eq!(summary.n_stars, 3);
        assert_eq!(summary.n_repeat_stars, 2);
        assert_eq!(summary.n_repeat_observations, 4);

        let teff = &summary.quantities[0];
        assert_eq!(teff.all.n, 4);
        // Deviations are -20, +20 (A) and -50, +50 (B).
        assert!((teff.all.rms - 1450f64.sqrt()).abs() < 1e-9);
        assert_eq!(teff.all.histogram.outside, 0);
        assert_eq!(teff.all.histogram.counts.iter().sum::<usize>(), 4);

        let apo25m = &teff.by_telescope[&Telescope::Apo25m];
        assert_eq!(apo25m.n, 2);
        assert_eq!(apo25m.mean, 0.0);
        assert!(!teff.by_telescope.contains_key(&Telescope::Apo1m));
        assert_eq!(teff.by_telescope[&Telescope::Lco25m].n, 1);
    }

    #[test]
    fn histogram_bins_are_half_open_with_closed_last_bin() {
        let spec = HistogramSpec::new(-0.2, 0.2, 0.01);
        assert_eq!(spec.n_bins(), 40);
        assert_eq!(spec.bin(-0.2), Some(0));
        assert_eq!(spec.bin(0.2), Some(39));
        assert_eq!(spec.bin(0.25), None);
        assert_eq!(spec.bin(f64::NAN), None);

        let mut h = Histogram::new(HistogramSpec::new(-200.0, 200.0, 10.0));
        h.add(-200.0);
        h.add(5.0);
        h.add(500.0);
        h.add(f64::NAN);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[20], 1);
        assert_eq!(h.outside, 1);
    }

    fn quantity_specs() -> [HistogramSpec; 3] {
        [
            Quantity::parameter(0).histogram_spec(),
            Quantity::parameter(1).histogram_spec(),
            Quantity::element(0).histogram_spec(),
        ]
    }

    #[test]
    fn every_edge_starts_its_own_bin() {
        for spec in quantity_specs() {
            let n = spec.n_bins();
            assert_eq!(n, 40);
            for i in 0..n {
                // Both the computed edge and the decimal value it stands for.
                let computed = spec.edge(i);
                let decimal: f64 = format!("{computed:.6}").parse().unwrap();
                assert_eq!(spec.bin(computed), Some(i), "{spec:?} edge {i} = {computed}");
                assert_eq!(spec.bin(decimal), Some(i), "{spec:?} edge {i} = {decimal}");

                let mid = computed + 0.5 * spec.width;
                assert_eq!(spec.bin(mid), Some(i), "{spec:?} middle of bin {i}");
                if i > 0 {
                    let below = computed - 1e-6 * spec.width;
                    assert_eq!(spec.bin(below), Some(i - 1), "{spec:?} just below edge {i}");
                }
            }
            assert_eq!(spec.bin(spec.hi), Some(n - 1));
        }
    }

    #[test]
    fn decimal_edges_of_logg_bins() {
        let spec = HistogramSpec::new(-0.5, 0.5, 0.025);
        assert_eq!(spec.bin(0.1), Some(24));
        assert_eq!(spec.bin(-0.2), Some(12));
        assert_eq!(spec.bin(-0.45), Some(2));
        assert_eq!(spec.bin(0.2), Some(28));
    }

    #[test]
    fn quantity_list_follows_registry() {
        let q = repeat_quantities();
        assert_eq!(q.len(), 7 + 26);
        assert_eq!(q[0].name, "TEFF");
        assert_eq!(q[6].name, "ALPHA_M");
        assert_eq!(q[7].name, "C");
        assert_eq!(q[7].label, "[C/M]");
        assert_eq!(q[1].histogram_spec().width, 0.025);
    }
}
