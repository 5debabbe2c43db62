//! Trailing window aggregates.
//!
//! A window of size N at row i covers rows `[i-N+1, i]`. The aggregate is null
//! until N rows have been seen, and also while any value inside the window is
//! null: every aggregate here needs N valid observations.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Fixed-size sliding accumulator over an ordered series.
#[derive(Debug, Clone)]
pub struct TrailingWindow {
    size: NonZeroUsize,
    values: VecDeque<Option<f64>>,
    sum: f64,
    valid: usize,
}

impl TrailingWindow {
    /// Create an empty window holding at most `size` values.
    pub fn new(size: NonZeroUsize) -> Self {
        Self {
            size,
            values: VecDeque::with_capacity(size.get()),
            sum: 0.0,
            valid: 0,
        }
    }

    /// Slide the window forward by one row.
    pub fn push(&mut self, value: Option<f64>) {
        if self.values.len() == self.size.get() {
            if let Some(Some(evicted)) = self.values.pop_front() {
                self.sum -= evicted;
                self.valid -= 1;
            }
        }
        if let Some(v) = value {
            self.sum += v;
            self.valid += 1;
        }
        self.values.push_back(value);
    }

    /// Whether the window spans `size` rows.
    pub fn is_full(&self) -> bool {
        self.values.len() == self.size.get()
    }

    /// Sum over the window, null unless full and free of nulls.
    pub fn sum(&self) -> Option<f64> {
        (self.is_full() && self.valid == self.size.get()).then_some(self.sum)
    }

    /// Mean over the window, null unless full and free of nulls.
    pub fn mean(&self) -> Option<f64> {
        self.sum().map(|sum| sum / self.size.get() as f64)
    }
}

/// Trailing sum at every row.
pub fn rolling_sum(values: &[Option<f64>], size: NonZeroUsize) -> Vec<Option<f64>> {
    let mut window = TrailingWindow::new(size);
    values
        .iter()
        .map(|value| {
            window.push(*value);
            window.sum()
        })
        .collect()
}

/// Trailing mean at every row.
pub fn rolling_mean(values: &[Option<f64>], size: NonZeroUsize) -> Vec<Option<f64>> {
    let mut window = TrailingWindow::new(size);
    values
        .iter()
        .map(|value| {
            window.push(*value);
            window.mean()
        })
        .collect()
}

/// Trailing fraction of non-null values at every row.
///
/// Nulls in the input are counted rather than propagated, so the result is
/// only null while the window is still short.
pub fn rolling_non_null_rate<T>(values: &[Option<T>], size: NonZeroUsize) -> Vec<Option<f64>> {
    let present: Vec<Option<f64>> = values
        .iter()
        .map(|value| Some(if value.is_some() { 1.0 } else { 0.0 }))
        .collect();
    rolling_mean(&present, size)
}
