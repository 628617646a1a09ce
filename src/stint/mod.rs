// Stint segmentation over one driver's lap sequence
//
// A stint is a maximal run of consecutive laps on one compound. The
// segmenter is a small state machine with a single piece of state, the
// currently open stint, driven lap by lap:
//
// 1. no open stint            -> open one on this lap
// 2. compound changed         -> close the open stint, open a new one here
// 3. otherwise                -> extend the open stint to this lap
// 4. lap has a pit-entry flag -> close the open stint and clear the state
//
// Rule 4 is applied after rules 1-3, so a pit-entry lap always ends the
// stint it belongs to. Whatever is still open after the last lap is closed.
//
// Each closed stint carries the clean laps (timed, no pit entry/exit)
// collected while it was open; these feed the degradation estimator.

use crate::records::{Compound, LapRecord};
use serde::{Deserialize, Serialize};

/// Maximal run of consecutive laps on one compound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stint {
    pub compound: Compound,
    /// First lap number of the stint
    pub start: u32,
    /// Last lap number of the stint (inclusive)
    pub end: u32,
}

impl Stint {
    pub fn lap_count(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn contains(&self, lap_number: u32) -> bool {
        (self.start..=self.end).contains(&lap_number)
    }
}

/// A timed lap without pit activity, used for trend fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanLap {
    pub lap_number: u32,
    /// Lap time in seconds
    pub lap_time: f64,
}

/// A stint together with the clean laps observed while it was open
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedStint {
    pub stint: Stint,
    pub clean_laps: Vec<CleanLap>,
}

/// Lap-by-lap stint state machine for one driver
///
/// # Example
/// ```
/// use apexline::records::LapRecord;
/// use apexline::stint::StintSegmenter;
///
/// let lap = |n: u32, compound: &str, pit_in: bool| LapRecord {
///     lap_number: n,
///     lap_time: Some(90.0),
///     compound: Some(compound.to_string()),
///     sector_times: [None; 3],
///     pit_in,
///     pit_out: false,
///     tyre_age: None,
/// };
///
/// let mut segmenter = StintSegmenter::new();
/// segmenter.feed(&lap(1, "soft", false));
/// segmenter.feed(&lap(2, "soft", true));
/// segmenter.feed(&lap(3, "soft", false));
/// let stints = segmenter.finish();
///
/// assert_eq!(stints.len(), 2);
/// assert_eq!((stints[0].stint.start, stints[0].stint.end), (1, 2));
/// assert_eq!((stints[1].stint.start, stints[1].stint.end), (3, 3));
/// ```
#[derive(Debug, Default)]
pub struct StintSegmenter {
    current: Option<SegmentedStint>,
    closed: Vec<SegmentedStint>,
}

impl StintSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stint currently open, if any
    pub fn current(&self) -> Option<&Stint> {
        self.current.as_ref().map(|open| &open.stint)
    }

    /// Advance the state machine by one lap
    ///
    /// Laps are expected in lap-number order; a late lap on the open
    /// compound widens the stint instead of moving its end backwards.
    pub fn feed(&mut self, lap: &LapRecord) {
        let compound = lap.compound();
        let lap_number = lap.lap_number;

        match self.current.take() {
            Some(mut open) if open.stint.compound == compound => {
                open.stint.start = open.stint.start.min(lap_number);
                open.stint.end = open.stint.end.max(lap_number);
                self.current = Some(open);
            }
            Some(open) => {
                self.closed.push(open);
                self.open(compound, lap_number);
            }
            None => self.open(compound, lap_number),
        }

        if lap.is_clean() {
            if let (Some(lap_time), Some(open)) = (lap.valid_lap_time(), self.current.as_mut()) {
                open.clean_laps.push(CleanLap {
                    lap_number,
                    lap_time,
                });
            }
        }

        if lap.pit_in {
            self.close();
        }
    }

    /// Close whatever is still open and return every stint in order
    pub fn finish(mut self) -> Vec<SegmentedStint> {
        self.close();
        self.closed
    }

    fn open(&mut self, compound: Compound, lap_number: u32) {
        self.current = Some(SegmentedStint {
            stint: Stint {
                compound,
                start: lap_number,
                end: lap_number,
            },
            clean_laps: Vec::new(),
        });
    }

    fn close(&mut self) {
        if let Some(open) = self.current.take() {
            self.closed.push(open);
        }
    }
}

/// Segment one driver's laps into stints
///
/// Laps are processed in lap-number order regardless of input order.
pub fn segment_stints(laps: &[LapRecord]) -> Vec<SegmentedStint> {
    let mut ordered: Vec<&LapRecord> = laps.iter().collect();
    ordered.sort_by_key(|lap| lap.lap_number);

    let mut segmenter = StintSegmenter::new();
    for lap in ordered {
        segmenter.feed(lap);
    }
    segmenter.finish()
}
