use serde::{Deserialize, Serialize};

/// A single bin in the distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Lower bound of the bin (inclusive)
    pub lower: f64,
    /// Upper bound of the bin (exclusive, except for the last bin)
    pub upper: f64,
    /// Number of values in this bin
    pub count: usize,
}

/// Equal-width histogram over a set of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
}

/// Sturges' rule: `ceil(log2 n) + 1` bins.
pub fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

impl Histogram {
    /// Bin `values` between their minimum and maximum.
    ///
    /// # Arguments
    /// * `values` - Observations; NaN entries are ignored
    /// * `bins` - Bin count, or `None` for Sturges' rule
    pub fn from_values(values: &[f64], bins: Option<usize>) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Histogram {
                bin_width: 0.0,
                bins: Vec::new(),
            };
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // A single distinct value gets one unit-wide bin centred on it.
        if max - min <= f64::EPSILON * max.abs().max(1.0) {
            return Histogram {
                bin_width: 1.0,
                bins: vec![HistogramBin {
                    lower: min - 0.5,
                    upper: min + 0.5,
                    count: finite.len(),
                }],
            };
        }

        let num_bins = bins.unwrap_or_else(|| sturges_bins(finite.len())).max(1);
        let width = (max - min) / num_bins as f64;

        let mut counts = vec![0usize; num_bins];
        for v in &finite {
            let idx = (((v - min) / width).floor() as usize).min(num_bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + i as f64 * width,
                upper: if i + 1 == num_bins {
                    max
                } else {
                    min + (i + 1) as f64 * width
                },
                count,
            })
            .collect();

        Histogram {
            bin_width: width,
            bins,
        }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_sturges() {
        assert_eq!(sturges_bins(0), 1);
        assert_eq!(sturges_bins(1), 1);
        assert_eq!(sturges_bins(3), 3);
        assert_eq!(sturges_bins(8), 4);
        assert_eq!(sturges_bins(1000), 11);
    }

    #[test]
    fn test_empty_values() {
        let h = Histogram::from_values(&[], None);
        assert!(h.bins.is_empty());
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn test_fixed_bins_cover_range() {
        let h = Histogram::from_values(&[10.0, 20.0, 30.0, 40.0], Some(3));
        assert_eq!(h.bins.len(), 3);
        assert_approx_eq!(h.bin_width, 10.0);
        assert_approx_eq!(h.bins[0].lower, 10.0);
        assert_approx_eq!(h.bins[2].upper, 40.0);
        assert_eq!(h.total(), 4);
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let h = Histogram::from_values(&[0.0, 1.0, 2.0, 3.0, 4.0], Some(2));
        assert_eq!(h.bins[0].count, 2);
        assert_eq!(h.bins[1].count, 3);
    }

    #[test]
    fn test_single_distinct_value() {
        let h = Histogram::from_values(&[7.0, 7.0, 7.0], None);
        assert_eq!(h.bins.len(), 1);
        assert_eq!(h.bins[0].count, 3);
        assert_approx_eq!(h.bins[0].lower, 6.5);
    }

    #[test]
    fn test_nan_ignored() {
        let h = Histogram::from_values(&[1.0, f64::NAN, 3.0], Some(2));
        assert_eq!(h.total(), 2);
    }
}
