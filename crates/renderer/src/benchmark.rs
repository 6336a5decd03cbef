//! Timed benchmark mode.
//!
//! While benchmarking, every frame feeds [`BenchmarkController::update`],
//! which logs the average frame rate of each fixed-length period and decides
//! when the current scene is done. A scene ends when its time budget runs out
//! or the accumulator stops taking samples.

use tracing::info;

use crate::settings::RenderSettings;

/// Length of one frame-rate reporting window, in seconds.
pub const BENCHMARK_PERIOD: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchmarkPhase {
    /// Benchmark mode is off
    Idle,
    /// The next frame is the first of a scene
    SceneWarmup,
    Measuring,
    /// The scene finished and the next one was requested
    SceneAdvance,
    /// Benchmarking finished and the window was asked to close
    Terminated,
}

/// Timers and counters of the scene being measured.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BenchmarkState {
    pub scene_start_time: f64,
    pub period_start_time: f64,
    pub frames_in_period: u64,
    pub scene_index: usize,
}

/// What the frame driver must do after a benchmark update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchmarkStep {
    Continue,
    /// `scene_index` was advanced; the next frame loads it
    AdvanceScene,
    /// Close the window; emitted once
    Terminate,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchmarkFrame {
    /// Average frame rate of a period that ended on this frame
    pub report: Option<f64>,
    pub step: BenchmarkStep,
}

impl BenchmarkFrame {
    const CONTINUE: Self = Self {
        report: None,
        step: BenchmarkStep::Continue,
    };
}

#[derive(Clone, Debug)]
pub struct BenchmarkController {
    phase: BenchmarkPhase,
    state: BenchmarkState,
    period: f64,
}

impl Default for BenchmarkController {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkController {
    pub fn new() -> Self {
        Self::with_period(BENCHMARK_PERIOD)
    }

    pub fn with_period(period: f64) -> Self {
        Self {
            phase: BenchmarkPhase::Idle,
            state: BenchmarkState::default(),
            period,
        }
    }

    pub fn phase(&self) -> BenchmarkPhase {
        self.phase
    }

    pub fn state(&self) -> &BenchmarkState {
        &self.state
    }

    /// Clear the per-scene timers; called on every scene load.
    pub fn reset_scene(&mut self) {
        if self.phase == BenchmarkPhase::Terminated {
            return;
        }
        self.state = BenchmarkState::default();
        self.phase = BenchmarkPhase::SceneWarmup;
    }

    /// Run one frame of benchmark bookkeeping.
    ///
    /// `time` and `previous_time` are the host clock at this frame and the
    /// previous one. On scene completion `settings.scene_index` is incremented
    /// even when benchmarking terminates, so the final index reflects the
    /// number of scenes measured.
    pub fn update(
        &mut self,
        settings: &mut RenderSettings,
        scene_count: usize,
        scene_name: &str,
        time: f64,
        previous_time: f64,
        samples_this_frame: u32,
    ) -> BenchmarkFrame {
        if !settings.benchmark {
            if self.phase != BenchmarkPhase::Terminated {
                self.phase = BenchmarkPhase::Idle;
            }
            return BenchmarkFrame::CONTINUE;
        }

        match self.phase {
            BenchmarkPhase::Terminated | BenchmarkPhase::SceneAdvance => {
                return BenchmarkFrame::CONTINUE;
            }
            BenchmarkPhase::Idle | BenchmarkPhase::SceneWarmup => {
                info!(
                    "Benchmark: start scene #{} '{}'",
                    settings.scene_index, scene_name
                );
                self.state = BenchmarkState {
                    scene_start_time: time,
                    period_start_time: time,
                    frames_in_period: 0,
                    scene_index: settings.scene_index,
                };
                self.phase = BenchmarkPhase::Measuring;
            }
            BenchmarkPhase::Measuring => {}
        }

        let report = self.measure(time, previous_time);

        let time_limit_reached =
            time - self.state.scene_start_time > f64::from(settings.benchmark_max_time);
        let sample_limit_reached = samples_this_frame == 0;
        if !(time_limit_reached || sample_limit_reached) {
            return BenchmarkFrame {
                report,
                step: BenchmarkStep::Continue,
            };
        }

        info!(
            "Benchmark: scene #{} complete after {:.2}s",
            self.state.scene_index,
            time - self.state.scene_start_time
        );

        let is_last_scene = settings.scene_index + 1 >= scene_count;
        let terminate = !settings.benchmark_next_scenes || is_last_scene;
        settings.scene_index += 1;

        let step = if terminate {
            info!("Benchmark: finished");
            self.phase = BenchmarkPhase::Terminated;
            BenchmarkStep::Terminate
        } else {
            self.phase = BenchmarkPhase::SceneAdvance;
            BenchmarkStep::AdvanceScene
        };

        BenchmarkFrame { report, step }
    }

    /// Count the frame and report when it crosses a period boundary.
    ///
    /// Boundaries come from integer division of the elapsed period time, so
    /// one long frame spanning a boundary is reported exactly once.
    fn measure(&mut self, time: f64, previous_time: f64) -> Option<f64> {
        let start = self.state.period_start_time;
        let previous_period = ((previous_time - start) / self.period).floor() as i64;
        let current_period = ((time - start) / self.period).floor() as i64;

        let mut report = None;
        if self.state.frames_in_period != 0 && previous_period != current_period {
            let fps = self.state.frames_in_period as f64 / (time - start);
            info!("Benchmark: {:.1} fps", fps);
            report = Some(fps);
            self.state.period_start_time = time;
            self.state.frames_in_period = 0;
        }

        self.state.frames_in_period += 1;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benchmark_settings(max_time: u32, next_scenes: bool, scene_index: usize) -> RenderSettings {
        RenderSettings {
            benchmark: true,
            benchmark_next_scenes: next_scenes,
            benchmark_max_time: max_time,
            scene_index,
            ..RenderSettings::default()
        }
    }

    /// Drive frames with the given durations; returns (reports, steps).
    fn run(
        controller: &mut BenchmarkController,
        settings: &mut RenderSettings,
        scene_count: usize,
        frame_times: impl IntoIterator<Item = f64>,
    ) -> (Vec<f64>, Vec<BenchmarkStep>) {
        let mut reports = Vec::new();
        let mut steps = Vec::new();
        let mut previous = 0.0;
        let mut now = 0.0;
        for dt in frame_times {
            now += dt;
            let frame = controller.update(settings, scene_count, "test", now, previous, 8);
            reports.extend(frame.report);
            steps.push(frame.step);
            previous = now;
        }
        (reports, steps)
    }

    #[test]
    fn test_idle_when_disabled() {
        let mut controller = BenchmarkController::new();
        let mut settings = RenderSettings::default();

        let frame = controller.update(&mut settings, 3, "test", 100.0, 99.0, 0);

        assert_eq!(frame, BenchmarkFrame::CONTINUE);
        assert_eq!(controller.phase(), BenchmarkPhase::Idle);
        assert_eq!(settings.scene_index, 1);
    }

    #[test]
    fn test_warmup_records_start_times() {
        let mut controller = BenchmarkController::new();
        let mut settings = benchmark_settings(600, false, 2);

        controller.update(&mut settings, 3, "test", 12.5, 12.4, 8);

        assert_eq!(controller.phase(), BenchmarkPhase::Measuring);
        let state = controller.state();
        assert_eq!(state.scene_start_time, 12.5);
        assert_eq!(state.period_start_time, 12.5);
        assert_eq!(state.frames_in_period, 1);
        assert_eq!(state.scene_index, 2);
    }

    #[test]
    fn test_report_count_with_jittered_frames() {
        let mut controller = BenchmarkController::new();
        let mut settings = benchmark_settings(10_000, false, 0);

        // Deterministic jitter between 1ms and 97ms per frame
        let frame_times: Vec<f64> = (0..4000u64)
            .map(|i| 0.001 + ((i * 7919) % 97) as f64 / 1000.0)
            .collect();
        let total: f64 = frame_times.iter().sum();

        let (reports, steps) = run(&mut controller, &mut settings, 1, frame_times);

        let expected = (total / BENCHMARK_PERIOD).floor() as i64;
        let actual = reports.len() as i64;
        assert!(
            (actual - expected).abs() <= 1,
            "expected about {} reports, got {}",
            expected,
            actual
        );
        assert!(reports.iter().all(|fps| *fps > 0.0));
        assert!(steps.iter().all(|s| *s == BenchmarkStep::Continue));
    }

    #[test]
    fn test_long_frame_reports_once() {
        let mut controller = BenchmarkController::new();
        let mut settings = benchmark_settings(10_000, false, 0);

        // One frame spanning two whole periods
        let (reports, _) = run(&mut controller, &mut settings, 1, [1.0, 1.0, 12.0, 1.0]);

        assert_eq!(reports.len(), 1);
    }

    #[test]
    fn test_single_scene_time_limit_closes_once() {
        let mut controller = BenchmarkController::new();
        let mut settings = benchmark_settings(5, false, 0);

        let (_, steps) = run(&mut controller, &mut settings, 1, std::iter::repeat_n(0.25, 60));

        let terminations = steps
            .iter()
            .filter(|s| **s == BenchmarkStep::Terminate)
            .count();
        assert_eq!(terminations, 1);
        assert_eq!(settings.scene_index, 1);
        assert_eq!(controller.phase(), BenchmarkPhase::Terminated);
    }

    #[test]
    fn test_next_scenes_advances_then_terminates_on_last() {
        let mut controller = BenchmarkController::new();
        let mut settings = benchmark_settings(5, true, 0);

        // Scene 0: converged on the second frame
        controller.update(&mut settings, 2, "first", 0.1, 0.0, 8);
        let frame = controller.update(&mut settings, 2, "first", 0.2, 0.1, 0);
        assert_eq!(frame.step, BenchmarkStep::AdvanceScene);
        assert_eq!(settings.scene_index, 1);

        // Frames before the scene reload are ignored
        let frame = controller.update(&mut settings, 2, "first", 0.3, 0.2, 0);
        assert_eq!(frame.step, BenchmarkStep::Continue);
        assert_eq!(settings.scene_index, 1);

        // Scene 1 is the last one
        controller.reset_scene();
        controller.update(&mut settings, 2, "second", 0.4, 0.3, 8);
        let frame = controller.update(&mut settings, 2, "second", 0.5, 0.4, 0);
        assert_eq!(frame.step, BenchmarkStep::Terminate);
        assert_eq!(settings.scene_index, 2);

        // Terminated stays terminated
        controller.reset_scene();
        let frame = controller.update(&mut settings, 2, "second", 0.6, 0.5, 0);
        assert_eq!(frame.step, BenchmarkStep::Continue);
        assert_eq!(settings.scene_index, 2);
    }

    #[test]
    fn test_reset_scene_restarts_timers() {
        let mut controller = BenchmarkController::new();
        let mut settings = benchmark_settings(600, true, 0);
        controller.update(&mut settings, 3, "test", 1.0, 0.9, 8);
        controller.update(&mut settings, 3, "test", 2.0, 1.0, 8);

        controller.reset_scene();
        assert_eq!(controller.phase(), BenchmarkPhase::SceneWarmup);

        controller.update(&mut settings, 3, "test", 30.0, 2.0, 8);
        assert_eq!(controller.state().scene_start_time, 30.0);
        assert_eq!(controller.state().frames_in_period, 1);
    }
}
