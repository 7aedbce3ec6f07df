//! Mapping of a sample stream onto a row of bars.
//!
//! A plan walks the bars left to right with an integer fractional accumulator: each bar
//! advances the sample cursor by `sample_count / bar_count`, carrying the remainder, so
//! bar `k` covers exactly `[floor(k * S / B), floor((k + 1) * S / B))`. No floating point
//! is involved, which keeps the sequence identical across runs and free of drift.

/// Bar count assumed by the sizing pass when no usable width is offered.
pub const FALLBACK_BAR_COUNT: f32 = 100.0;

/// Logical width reported when there is nothing to measure.
pub const MIN_CONTENT_WIDTH: f32 = 100.0;

/// Bar counts at or below this are treated as "no room".
const DEGENERATE_BAR_COUNT: f32 = 0.1;

/// One bar slot of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSlot {
    pub bar_index: usize,
    /// Sample whose amplitude represents the bar (first of its range).
    pub sample_index: usize,
    /// Exclusive end of the sample range owned by the bar.
    pub sample_end: usize,
}

impl BarSlot {
    pub fn samples(&self) -> std::ops::Range<usize> {
        self.sample_index..self.sample_end
    }
}

/// Lazy, restartable sequence of [`BarSlot`]s.
#[derive(Debug, Clone)]
pub struct BarPlan {
    sample_count: usize,
    bar_count: usize,
    step: usize,
    remainder: usize,
    next_bar: usize,
    cursor: usize,
    carry: usize,
}

/// Plans `target_bar_count` bars over `sample_count` samples.
///
/// When there are fewer samples than bars, every sample gets its own bar and the plan
/// holds `sample_count` bars instead. Zero samples or zero bars give an empty plan.
pub fn plan(sample_count: usize, target_bar_count: usize) -> BarPlan {
    let bar_count = if target_bar_count == 0 {
        0
    } else {
        target_bar_count.min(sample_count)
    };

    let (step, remainder) = if bar_count == 0 {
        (0, 0)
    } else {
        (sample_count / bar_count, sample_count % bar_count)
    };

    BarPlan {
        sample_count,
        bar_count,
        step,
        remainder,
        next_bar: 0,
        cursor: 0,
        carry: 0,
    }
}

impl BarPlan {
    /// Number of bars this plan emits, after clamping.
    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    /// Real-valued samples per bar, never below one.
    pub fn samples_per_bar(&self) -> f32 {
        if self.bar_count == 0 {
            0.0
        } else {
            self.sample_count as f32 / self.bar_count as f32
        }
    }

    /// Advances the accumulator by one bar and returns the next bar's start.
    fn advance(&mut self) -> usize {
        self.cursor += self.step;
        self.carry += self.remainder;
        if self.carry >= self.bar_count {
            self.carry -= self.bar_count;
            self.cursor += 1;
        }
        self.cursor
    }
}

impl Iterator for BarPlan {
    type Item = BarSlot;

    fn next(&mut self) -> Option<BarSlot> {
        if self.next_bar >= self.bar_count {
            return None;
        }

        let bar_index = self.next_bar;
        let sample_index = self.cursor;
        let sample_end = self.advance();
        self.next_bar += 1;

        Some(BarSlot {
            bar_index,
            sample_index,
            sample_end,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.bar_count - self.next_bar;
        (left, Some(left))
    }
}

impl ExactSizeIterator for BarPlan {}

/// Bars that fit in `view_width` at one bar per `pitch`.
pub fn bars_for_width(view_width: f32, pitch: f32) -> usize {
    if pitch <= 0.0 || !view_width.is_finite() || view_width <= 0.0 {
        return 0;
    }
    (view_width / pitch).floor() as usize
}

/// Content-driven width for a stream of `sample_count` samples.
///
/// `available` is the width layout would like to give, if any. The result always covers
/// every sample at one or more samples per bar, and falls back to `min_width` rather than
/// zero when there is nothing to size against.
pub fn content_width(sample_count: usize, pitch: f32, available: Option<f32>, min_width: f32) -> f32 {
    if sample_count == 0 || pitch <= 0.0 {
        return min_width;
    }

    let target_bars = available
        .filter(|w| w.is_finite())
        .map(|w| w / pitch)
        .filter(|bars| *bars > DEGENERATE_BAR_COUNT)
        .unwrap_or(FALLBACK_BAR_COUNT);

    // ceil(S / samples_per_bar) without the round trip through a division.
    let samples_per_bar = sample_count as f32 / target_bars;
    let bars = if samples_per_bar < 1.0 {
        sample_count as f32
    } else {
        target_bars.ceil()
    };

    if bars <= DEGENERATE_BAR_COUNT {
        return min_width;
    }
    bars * pitch
}
