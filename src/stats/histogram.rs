use serde::Serialize;

/// Equal-width bin counts over `[start, start + width * counts.len()]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub start: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning min..max.
    /// The maximum falls into the last bin. A constant column gets a unit-wide
    /// range centred on its value. `None` when there is nothing to bin.
    pub fn compute(values: &[f64], bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return None;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (start, end) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let width = (end - start) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = ((v - start) / width).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Some(Histogram {
            start,
            width,
            counts,
        })
    }

    /// Centre of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + self.width * (i as f64 + 0.5)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_bin_count() {
        let values: Vec<f64> = (0..100).map(|x| x as f64).collect();
        let h = Histogram::compute(&values, 30).unwrap();
        assert_eq!(h.counts.len(), 30);
        assert_eq!(h.total(), 100);
        assert!((h.width - 3.3).abs() < 1e-9);
        // max lands in the last bin
        assert!(h.counts[29] > 0);
    }

    #[test]
    fn test_constant_values() {
        let h = Histogram::compute(&[2.0, 2.0, 2.0], 10).unwrap();
        assert_eq!(h.total(), 3);
        assert!((h.start - 1.5).abs() < 1e-12);
        assert_eq!(h.counts.iter().filter(|&&c| c == 3).count(), 1);
    }

    #[test]
    fn test_tiny_spread_is_not_constant() {
        let h = Histogram::compute(&[1e-17, 2e-17, 3e-17], 2).unwrap();
        assert_eq!(h.start, 1e-17);
        assert!((h.width - 1e-17).abs() < 1e-30);
        assert!(h.counts[0] >= 1);
        assert!(h.counts[1] >= 1);
    }

    #[test]
    fn test_empty_values() {
        assert!(Histogram::compute(&[], 30).is_none());
    }
}
