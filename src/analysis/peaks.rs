//! Crisis-period detection over a yearly count series.
//!
//! A crisis (peak) starts when the series jumps by more than
//! `crisis_increment` relative to the previous year, provided the previous
//! year was already above `min_consideration` — small series jump around too
//! much in relative terms to be meaningful. The peak runs until the first
//! year that falls below its predecessor.
//!
//! The detector is a two-state machine driven left to right over the series,
//! exposed as a lazy `Iterator<Item = Peak>`. It never looks ahead, holds no
//! state between runs, and is O(n) in series length: calling `peak_finder`
//! twice on the same series yields identical output.

use crate::model::{Peak, TimePoint, TimeSeries};

/// Baseline a year must exceed before a jump can open a peak.
pub const MIN_CONSIDERATION_VALUE: f64 = 1_000.0;

/// Year-over-year relative increase that signals a crisis.
pub const CRISIS_INCREMENT_ALERT: f64 = 0.5;

/// Detector state: outside any peak, or inside one opened at `pending_start`.
#[derive(Debug, Clone, Copy)]
enum DetectorState {
    Idle,
    InsidePeak { pending_start: i32 },
}

/// Lazy peak iterator over a borrowed series. Construct with `peak_finder`
/// for the default thresholds or `PeakDetector::with_thresholds` to tune
/// them (tests use scaled-down series).
pub struct PeakDetector<'a> {
    points: &'a [TimePoint],
    index: usize,
    previous: Option<TimePoint>,
    state: DetectorState,
    min_consideration: f64,
    crisis_increment: f64,
}

/// Detects crisis periods in `series` using the default thresholds.
pub fn peak_finder(series: &TimeSeries) -> PeakDetector<'_> {
    PeakDetector::with_thresholds(series, MIN_CONSIDERATION_VALUE, CRISIS_INCREMENT_ALERT)
}

impl<'a> PeakDetector<'a> {
    pub fn with_thresholds(
        series: &'a TimeSeries,
        min_consideration: f64,
        crisis_increment: f64,
    ) -> Self {
        PeakDetector {
            points: series.points(),
            index: 0,
            previous: None,
            state: DetectorState::Idle,
            min_consideration,
            crisis_increment,
        }
    }
}

impl Iterator for PeakDetector<'_> {
    type Item = Peak;

    fn next(&mut self) -> Option<Peak> {
        while self.index < self.points.len() {
            let current = self.points[self.index];
            self.index += 1;

            // The first point only seeds `previous`; comparisons start at
            // the second point.
            let Some(previous) = self.previous.replace(current) else {
                continue;
            };

            match self.state {
                DetectorState::Idle => {
                    if previous.value > self.min_consideration
                        && (current.value - previous.value)
                            > previous.value * self.crisis_increment
                    {
                        self.state = DetectorState::InsidePeak { pending_start: previous.year };
                    }
                }
                DetectorState::InsidePeak { pending_start } => {
                    // Strict comparison: a plateau exactly equal to the
                    // previous value stays inside the peak.
                    if current.value < previous.value {
                        self.state = DetectorState::Idle;
                        return Some(Peak { start: pending_start, end: current.year });
                    }
                }
            }
        }
        // A peak still open at the final point is dropped, not emitted.
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i32, f64)]) -> TimeSeries {
        TimeSeries::new(
            points
                .iter()
                .map(|&(year, value)| TimePoint { year, value })
                .collect(),
        )
    }

    #[test]
    fn test_single_sharp_peak_is_detected() {
        // 5k -> 150k is a 29x jump from a baseline above 1000; 60k closes it.
        let s = series(&[(1990, 5_000.0), (1991, 150_000.0), (1992, 60_000.0)]);
        let peaks: Vec<Peak> = peak_finder(&s).collect();
        assert_eq!(peaks, vec![Peak { start: 1990, end: 1992 }]);
    }

    #[test]
    fn test_gentle_monotonic_rise_yields_no_peaks() {
        // Each step is well under a 50% increase.
        let s = series(&[(1993, 60_000.0), (1994, 65_000.0), (1995, 70_000.0)]);
        let peaks: Vec<Peak> = peak_finder(&s).collect();
        assert!(peaks.is_empty(), "gentle rise should not trigger, got {:?}", peaks);
    }

    #[test]
    fn test_plateau_stays_inside_peak() {
        // The comparison that closes a peak is strict: the 110k plateau at
        // 1998 does not close it, the decline at 1999 does.
        let s = series(&[
            (1996, 70_000.0),
            (1997, 110_000.0),
            (1998, 110_000.0),
            (1999, 90_000.0),
        ]);
        let peaks: Vec<Peak> = peak_finder(&s).collect();
        assert_eq!(peaks, vec![Peak { start: 1996, end: 1999 }]);
    }

    #[test]
    fn test_empty_series_yields_no_peaks() {
        let s = series(&[]);
        assert_eq!(peak_finder(&s).count(), 0);
    }

    #[test]
    fn test_single_point_series_yields_no_peaks() {
        let s = series(&[(1990, 500_000.0)]);
        assert_eq!(peak_finder(&s).count(), 0);
    }

    #[test]
    fn test_peak_open_at_end_of_series_is_dropped() {
        // The jump at 1991 opens a peak that never closes — no peak emitted.
        let s = series(&[(1990, 5_000.0), (1991, 150_000.0), (1992, 200_000.0)]);
        let peaks: Vec<Peak> = peak_finder(&s).collect();
        assert!(peaks.is_empty(), "open-ended peak must be dropped, got {:?}", peaks);
    }

    #[test]
    fn test_baseline_below_minimum_consideration_never_opens_a_peak() {
        // 500 -> 5000 is a 10x jump, but the baseline is under 1000.
        let s = series(&[(1990, 500.0), (1991, 5_000.0), (1992, 1_500.0)]);
        let peaks: Vec<Peak> = peak_finder(&s).collect();
        assert!(peaks.is_empty(), "sub-threshold baseline must not open, got {:?}", peaks);
    }

    #[test]
    fn test_multiple_peaks_with_custom_thresholds() {
        // Scaled-down fixture: a sharp peak, quiet years, then an elongated
        // peak with a plateau, then a big decrease.
        let s = series(&[
            (1990, 5.0),
            (1991, 150.0),
            (1992, 60.0),
            (1993, 60.0),
            (1994, 180.0),
            (1995, 180.0),
            (1996, 190.0),
            (1997, 80.0),
        ]);
        let peaks: Vec<Peak> = PeakDetector::with_thresholds(&s, 1.0, 0.5).collect();
        assert_eq!(
            peaks,
            vec![Peak { start: 1990, end: 1992 }, Peak { start: 1993, end: 1997 }]
        );
    }

    #[test]
    fn test_detection_is_restartable_and_identical() {
        let s = series(&[
            (1990, 5_000.0),
            (1991, 150_000.0),
            (1992, 60_000.0),
            (1993, 200_000.0),
            (1994, 90_000.0),
        ]);
        let first: Vec<Peak> = peak_finder(&s).collect();
        let second: Vec<Peak> = peak_finder(&s).collect();
        assert_eq!(first, second, "re-running the detector must be idempotent");
    }

    #[test]
    fn test_peaks_are_ordered_and_non_overlapping() {
        let s = series(&[
            (1990, 2_000.0),
            (1991, 10_000.0),
            (1992, 3_000.0),
            (1993, 20_000.0),
            (1994, 5_000.0),
            (1995, 40_000.0),
            (1996, 1_000.0),
        ]);
        let peaks: Vec<Peak> = peak_finder(&s).collect();
        assert!(!peaks.is_empty());
        for peak in &peaks {
            assert!(peak.start < peak.end, "peak {:?} must have start < end", peak);
        }
        for pair in peaks.windows(2) {
            assert!(
                pair[0].end <= pair[1].start,
                "peaks {:?} and {:?} must not overlap",
                pair[0],
                pair[1]
            );
        }
    }
}
