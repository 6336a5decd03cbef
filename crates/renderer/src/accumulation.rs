//! Progressive sample accumulation.
//!
//! Each frame either continues the current accumulation epoch or starts a
//! new one, then takes as many samples as the per-frame setting allows
//! without exceeding the total budget. Once the budget is spent the image
//! has converged and no further samples are taken until the next reset.

use tracing::trace;

use crate::settings::RenderSettings;

/// Sample counts of the current accumulation epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccumulationCounters {
    /// Samples per pixel accumulated since the last reset
    pub total_samples: u32,
    /// Samples per pixel taken by the current frame
    pub samples_this_frame: u32,
}

/// Why an accumulation epoch ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetReason {
    /// A scene load, swapchain rebuild or camera motion invalidated the image.
    Forced,
    /// An image-affecting setting changed since the previous frame.
    SettingsChanged,
    /// Accumulation is disabled; every frame starts from scratch.
    AccumulationDisabled,
}

/// Decide whether the accumulated samples are still valid.
///
/// Pure function of the current settings, the previous frame's snapshot and
/// the explicit reset request.
pub fn reset_reason(
    current: &RenderSettings,
    previous: &RenderSettings,
    force_reset: bool,
) -> Option<ResetReason> {
    if force_reset {
        Some(ResetReason::Forced)
    } else if current.requires_accumulation_reset(previous) {
        Some(ResetReason::SettingsChanged)
    } else if !current.accumulate_rays {
        Some(ResetReason::AccumulationDisabled)
    } else {
        None
    }
}

/// Reset requests gathered between two frames.
///
/// Input handlers, scene loads and swapchain rebuilds OR into it; the frame
/// driver takes it exactly once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingInvalidation {
    pending: bool,
}

impl PendingInvalidation {
    /// Request a reset.
    pub fn invalidate(&mut self) {
        self.pending = true;
    }

    /// Request a reset if `changed` is set.
    pub fn merge(&mut self, changed: bool) {
        self.pending |= changed;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Return the pending request and clear it.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// The accumulation state machine.
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    counters: AccumulationCounters,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame of the state machine.
    ///
    /// Resets the epoch if needed, then takes
    /// `min(max_number_of_samples - total_samples, number_of_samples)` samples.
    pub fn advance(
        &mut self,
        current: &RenderSettings,
        previous: &RenderSettings,
        force_reset: bool,
    ) -> AccumulationCounters {
        if let Some(reason) = reset_reason(current, previous, force_reset) {
            trace!("Accumulation reset: {:?}", reason);
            self.counters.total_samples = 0;
        }
        // A budget lowered mid-epoch caps the samples already taken
        self.counters.total_samples = self
            .counters
            .total_samples
            .min(current.max_number_of_samples);

        let remaining = current
            .max_number_of_samples
            .saturating_sub(self.counters.total_samples);
        let samples = remaining.min(current.number_of_samples);

        self.counters.samples_this_frame = samples;
        self.counters.total_samples += samples;
        self.counters
    }

    pub fn counters(&self) -> AccumulationCounters {
        self.counters
    }

    /// Whether the sample budget of the current epoch is spent.
    pub fn is_converged(&self, settings: &RenderSettings) -> bool {
        self.counters.total_samples >= settings.max_number_of_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(max_samples: u32, samples_per_frame: u32) -> RenderSettings {
        RenderSettings {
            max_number_of_samples: max_samples,
            number_of_samples: samples_per_frame,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_converges_after_budget() {
        let settings = settings(100, 10);
        let mut accumulator = Accumulator::new();

        for frame in 1..=10 {
            let counters = accumulator.advance(&settings, &settings, false);
            assert_eq!(counters.samples_this_frame, 10);
            assert_eq!(counters.total_samples, frame * 10);
        }
        assert!(accumulator.is_converged(&settings));

        for _ in 0..5 {
            let counters = accumulator.advance(&settings, &settings, false);
            assert_eq!(counters.samples_this_frame, 0);
            assert_eq!(counters.total_samples, 100);
        }
    }

    #[test]
    fn test_last_frame_is_clamped() {
        let settings = settings(25, 10);
        let mut accumulator = Accumulator::new();

        let taken: Vec<u32> = (0..4)
            .map(|_| accumulator.advance(&settings, &settings, false).samples_this_frame)
            .collect();

        assert_eq!(taken, vec![10, 10, 5, 0]);
        assert_eq!(accumulator.counters().total_samples, 25);
    }

    #[test]
    fn test_forced_reset_restarts_epoch() {
        let settings = settings(100, 10);
        let mut accumulator = Accumulator::new();
        for _ in 0..10 {
            accumulator.advance(&settings, &settings, false);
        }

        let counters = accumulator.advance(&settings, &settings, true);
        assert_eq!(counters.samples_this_frame, 10);
        assert_eq!(counters.total_samples, 10);
    }

    #[test]
    fn test_settings_change_restarts_epoch() {
        let previous = settings(100, 10);
        let mut accumulator = Accumulator::new();
        for _ in 0..4 {
            accumulator.advance(&previous, &previous, false);
        }

        let mut current = previous.clone();
        current.aperture += 0.5;

        let counters = accumulator.advance(&current, &previous, false);
        assert_eq!(counters.total_samples, 10);
        assert!(counters.samples_this_frame > 0);
    }

    #[test]
    fn test_disabled_accumulation_never_grows() {
        let mut settings = settings(100, 10);
        settings.accumulate_rays = false;
        let mut accumulator = Accumulator::new();

        for _ in 0..20 {
            let counters = accumulator.advance(&settings, &settings, false);
            assert_eq!(counters.total_samples, 10);
            assert_eq!(counters.samples_this_frame, 10);
        }
    }

    #[test]
    fn test_lowering_budget_caps_total() {
        let mut settings = settings(100, 10);
        let mut accumulator = Accumulator::new();
        for _ in 0..5 {
            accumulator.advance(&settings, &settings, false);
        }

        let previous = settings.clone();
        settings.max_number_of_samples = 30;
        let counters = accumulator.advance(&settings, &previous, false);
        assert_eq!(counters.samples_this_frame, 0);
        assert_eq!(counters.total_samples, 30);
        assert!(counters.total_samples <= settings.max_number_of_samples);

        // Raising it again resumes from the capped total
        let previous = settings.clone();
        settings.max_number_of_samples = 45;
        let counters = accumulator.advance(&settings, &previous, false);
        assert_eq!(counters.samples_this_frame, 10);
        assert_eq!(counters.total_samples, 40);
    }

    #[test]
    fn test_reset_reason_priority() {
        let previous = RenderSettings::default();
        let mut current = previous.clone();
        assert_eq!(reset_reason(&current, &previous, false), None);

        current.accumulate_rays = false;
        assert_eq!(
            reset_reason(&current, &current.clone(), false),
            Some(ResetReason::AccumulationDisabled)
        );
        assert_eq!(
            reset_reason(&current, &previous, false),
            Some(ResetReason::SettingsChanged)
        );
        assert_eq!(
            reset_reason(&current, &previous, true),
            Some(ResetReason::Forced)
        );
    }

    #[test]
    fn test_pending_invalidation_is_taken_once() {
        let mut pending = PendingInvalidation::default();
        pending.merge(false);
        assert!(!pending.is_pending());

        pending.merge(true);
        pending.merge(false);
        assert!(pending.is_pending());
        assert!(pending.take());
        assert!(!pending.take());
    }

    #[test]
    fn test_monotonic_without_visual_changes() {
        let mut settings = settings(1000, 7);
        let mut accumulator = Accumulator::new();
        let mut last_total = 0;

        for frame in 0..300 {
            let previous = settings.clone();
            // Non-visual edits every few frames
            if frame % 3 == 0 {
                settings.show_overlay = !settings.show_overlay;
            }
            if frame % 5 == 0 {
                settings.number_of_samples = 1 + (frame % 11);
            }

            let counters = accumulator.advance(&settings, &previous, false);
            assert!(counters.total_samples >= last_total);
            assert!(counters.total_samples <= settings.max_number_of_samples);
            last_total = counters.total_samples;
        }
        assert_eq!(last_total, 1000);
    }
}
