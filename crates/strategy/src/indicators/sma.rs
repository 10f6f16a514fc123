use common::{Bar, Error, PriceField, Result};

/// Simple moving average over a fixed window of bars.
///
/// `compute` emits one value per fully covered window, oldest first: output
/// index `k` is the unweighted mean of the selected price field over input
/// bars `[k, k + period)`. The first `period - 1` input bars have no
/// corresponding output. A NaN price poisons every window containing it;
/// callers treat a NaN mean as "no defined value".
#[derive(Debug, Clone)]
pub struct SmaIndicator {
    pub period: usize,
    pub field: PriceField,
}

impl SmaIndicator {
    pub fn new(period: usize, field: PriceField) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self { period, field }
    }

    /// Compute the SMA series from chronologically ordered bars.
    ///
    /// Errors with `InsufficientHistory` when fewer than `period` bars are
    /// available — the caller skips the watch and retries next tick.
    pub fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>> {
        if bars.len() < self.period {
            return Err(Error::InsufficientHistory {
                have: bars.len(),
                need: self.period,
            });
        }

        Ok(bars
            .windows(self.period)
            .map(|w| w.iter().map(|b| b.field(self.field)).sum::<f64>() / self.period as f64)
            .collect())
    }

    /// SMA of the most recent window only.
    pub fn latest(&self, bars: &[Bar]) -> Result<f64> {
        let series = self.compute(bars)?;
        // compute() never returns an empty series on success
        Ok(series[series.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: Utc.timestamp_opt(1_700_000_000 + 60 * i as i64, 0).unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: None,
            })
            .collect()
    }

    #[test]
    fn sma_errors_when_insufficient_history() {
        let sma = SmaIndicator::new(3, PriceField::Close);
        let err = sma.compute(&bars(&[10.0, 10.0])).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientHistory { have: 2, need: 3 }
        ));
    }

    #[test]
    fn sma_emits_one_value_per_window() {
        let sma = SmaIndicator::new(3, PriceField::Close);
        let series = sma.compute(&bars(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        // n - period + 1 values
        assert_eq!(series.len(), 3);
        assert_eq!(series, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn sma_latest_matches_reference_example() {
        // Close = [10, 10, 10, 12], period 3: last window mean = 32 / 3
        let sma = SmaIndicator::new(3, PriceField::Close);
        let latest = sma.latest(&bars(&[10.0, 10.0, 10.0, 12.0])).unwrap();
        assert!((latest - 32.0 / 3.0).abs() < 1e-9, "got {latest}");
    }

    #[test]
    fn sma_period_one_is_identity() {
        let sma = SmaIndicator::new(1, PriceField::Close);
        let series = sma.compute(&bars(&[4.0, 8.0, 15.0])).unwrap();
        assert_eq!(series, vec![4.0, 8.0, 15.0]);
    }

    #[test]
    fn sma_uses_selected_price_field() {
        let sma = SmaIndicator::new(2, PriceField::High);
        // highs are close + 1.0 in the fixture
        let series = sma.compute(&bars(&[1.0, 3.0])).unwrap();
        assert_eq!(series, vec![3.0]);
    }

    #[test]
    fn nan_price_poisons_containing_windows() {
        let sma = SmaIndicator::new(2, PriceField::Close);
        let mut input = bars(&[1.0, 2.0, 3.0, 4.0]);
        input[1].close = f64::NAN;

        let series = sma.compute(&input).unwrap();
        assert_eq!(series.len(), 3);
        assert!(series[0].is_nan()); // window [0, 1]
        assert!(series[1].is_nan()); // window [1, 2]
        assert_eq!(series[2], 3.5); // window [2, 3] is clean
    }
}
