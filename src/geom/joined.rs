//! Arc-length lookup over a chain of joined segments.

use super::core::Tolerance;

/// Position inside a piecewise parameterisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLocation {
    pub segment: usize,
    /// Local fraction in `[0, 1]`.
    pub fraction: f64,
}

/// Cumulative arc-length table for a sequence of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedSegments {
    lengths: Vec<f64>,
    cumulative: Vec<f64>,
}

impl JoinedSegments {
    #[must_use]
    pub fn new(lengths: Vec<f64>) -> Self {
        let mut cumulative = Vec::with_capacity(lengths.len() + 1);
        let mut sum = 0.0;
        cumulative.push(sum);
        for len in &lengths {
            sum += len;
            cumulative.push(sum);
        }
        Self {
            lengths,
            cumulative,
        }
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.lengths.len()
    }

    #[must_use]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Maps a normalized arc-length parameter to a segment and local fraction.
    ///
    /// Returns `None` outside `[0, 1]` or when the chain has no length.
    /// `t == 1` maps to the end of the last segment with non-zero length.
    #[must_use]
    pub fn locate(&self, t: f64) -> Option<SegmentLocation> {
        let total = self.total_length();
        if !(0.0..=1.0).contains(&t) || total <= Tolerance::ZERO_LENGTH.eps {
            return None;
        }

        for (k, len) in self.lengths.iter().enumerate() {
            let t1 = self.cumulative[k] / total;
            let t2 = self.cumulative[k + 1] / total;
            if t1 <= t && t < t2 {
                return Some(SegmentLocation {
                    segment: k,
                    fraction: ((t - t1) * total / len).clamp(0.0, 1.0),
                });
            }
        }

        self.lengths
            .iter()
            .rposition(|len| !Tolerance::ZERO_LENGTH.approx_zero_f64(*len))
            .map(|segment| SegmentLocation {
                segment,
                fraction: 1.0,
            })
    }
}
