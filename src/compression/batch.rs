//! Batch compression controller
//!
//! Sequences the per-file work on a background thread, reports progress
//! over a channel, and honors cooperative cancellation between files.
//! One file is transcoded at a time; a cancel request never interrupts
//! the in-flight ffmpeg process.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use chrono::Local;
use uuid::Uuid;

use super::events::{BatchEvent, BatchReport, RunState};
use super::ffmpeg::compress_file;
use crate::core::{
    select_candidates, CompressError, RunConfiguration, VideoCandidate, VIDEO_EXTENSIONS,
};

/// Lifecycle of the controller
///
/// `Failed` is only reached for configuration problems caught before any
/// file is processed; per-file failures end in `Completed` with the
/// failures listed in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// State shared between the control path and the batch thread
struct ControllerState {
    phase: Mutex<BatchPhase>,
    /// The only field both paths write; checked between files
    cancel_requested: AtomicBool,
    running: AtomicBool,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            phase: Mutex::new(BatchPhase::Idle),
            cancel_requested: AtomicBool::new(false),
            running: AtomicBool::new(false),
        }
    }

    fn set_phase(&self, phase: BatchPhase) {
        *self.phase.lock().unwrap() = phase;
    }
}

/// Drives one batch run at a time
///
/// `start` validates the configuration, builds the work list, and spawns
/// the sequential run on a background thread; progress comes back on the
/// returned channel.
pub struct BatchController {
    ffmpeg_path: PathBuf,
    state: Arc<ControllerState>,
}

impl BatchController {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            state: Arc::new(ControllerState::new()),
        }
    }

    pub fn phase(&self) -> BatchPhase {
        *self.state.phase.lock().unwrap()
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    /// Request cooperative cancellation of the active run
    ///
    /// Takes effect between files; the file currently being transcoded is
    /// allowed to finish or fail on its own.
    pub fn request_cancel(&self) {
        self.state.cancel_requested.store(true, Ordering::SeqCst);
    }

    /// Start a batch run
    ///
    /// Fatal configuration problems (bad directories, malformed bitrate,
    /// negative threshold) are returned here, before any file is
    /// processed. On success the receiver carries the run's events,
    /// ending with exactly one `BatchEvent::Finished`.
    pub fn start(
        &self,
        config: RunConfiguration,
    ) -> Result<mpsc::Receiver<BatchEvent>, CompressError> {
        if self
            .state
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CompressError::AlreadyRunning);
        }

        let candidates = match self.prepare(&config) {
            Ok(candidates) => candidates,
            Err(e) => {
                self.state.set_phase(BatchPhase::Failed);
                self.state.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        // A fresh run starts with a clear flag; a cancel request only
        // applies to the run that is active when it is made.
        self.state.cancel_requested.store(false, Ordering::SeqCst);
        self.state.set_phase(BatchPhase::Running);

        let (events_tx, events_rx) = mpsc::channel();
        let state = self.state.clone();
        let ffmpeg_path = self.ffmpeg_path.clone();

        thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            let report = rt.block_on(run_batch(
                &ffmpeg_path,
                &config,
                candidates,
                &state.cancel_requested,
                &events_tx,
            ));

            let terminal = if report.cancelled {
                BatchPhase::Cancelled
            } else {
                BatchPhase::Completed
            };
            state.set_phase(terminal);
            state.running.store(false, Ordering::SeqCst);

            log::info!("Run {}: {}", report.run_id, report.summary());
            let _ = events_tx.send(BatchEvent::Finished(report));
        });

        Ok(events_rx)
    }

    /// Validate, ensure the output directory, and build the work list
    fn prepare(&self, config: &RunConfiguration) -> Result<Vec<VideoCandidate>, CompressError> {
        config.validate()?;

        std::fs::create_dir_all(&config.output_dir).map_err(|e| {
            CompressError::InvalidConfig(format!(
                "failed to create output directory {}: {}",
                config.output_dir.display(),
                e
            ))
        })?;

        select_candidates(&config.input_dir, VIDEO_EXTENSIONS, config.min_size_mb)
    }
}

/// Destination path for a processed input file
fn destination_for(output_dir: &Path, filename: &str) -> PathBuf {
    output_dir.join(format!("compressed_{}", filename))
}

/// The sequential per-file loop
///
/// Owns the `RunState` and emits events as files finish. The cancel flag
/// is checked once per iteration, before each new file starts.
async fn run_batch(
    ffmpeg_path: &Path,
    config: &RunConfiguration,
    candidates: Vec<VideoCandidate>,
    cancel: &AtomicBool,
    events: &mpsc::Sender<BatchEvent>,
) -> BatchReport {
    let run_id = Uuid::new_v4();
    let started_at = Local::now();
    let bitrate_spec = config.bitrate_spec();
    let mut state = RunState::new(candidates.len());

    log::info!(
        "Run {}: {} candidate(s) at {}",
        run_id,
        state.total_jobs(),
        bitrate_spec
    );
    let _ = events.send(BatchEvent::Started {
        total: state.total_jobs(),
    });

    for (index, candidate) in candidates.iter().enumerate() {
        if cancel.load(Ordering::SeqCst) {
            log::info!(
                "Run {}: cancelled before file {} of {}",
                run_id,
                index + 1,
                state.total_jobs()
            );
            state.mark_cancelled();
            break;
        }

        let filename = candidate.file_name();
        let output_path = destination_for(&config.output_dir, &filename);
        let _ = events.send(BatchEvent::FileStarted {
            index,
            filename: filename.clone(),
        });

        match compress_file(ffmpeg_path, &candidate.path, &output_path, &bitrate_spec).await {
            Ok(()) => {
                state.record_success();
                log::info!("Processed {}", filename);
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("Run {}: {}", run_id, message);
                let _ = events.send(BatchEvent::FileFailed {
                    filename: filename.clone(),
                    message: message.clone(),
                });
                state.record_failure(filename, message);
            }
        }

        let _ = events.send(BatchEvent::Progress {
            completed: state.completed(),
            total: state.total_jobs(),
        });
    }

    state.into_report(run_id, started_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BitrateUnit;
    use crate::test_fixtures::create_video_mb;
    use tempfile::TempDir;

    const MISSING_FFMPEG: &str = "/nonexistent/ffmpeg";

    fn test_config(input_dir: &Path, output_dir: &Path, min_size_mb: f64) -> RunConfiguration {
        RunConfiguration {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            bitrate_value: 2000,
            bitrate_unit: BitrateUnit::K,
            min_size_mb,
        }
    }

    fn collect_events(rx: mpsc::Receiver<BatchEvent>) -> Vec<BatchEvent> {
        rx.iter().collect()
    }

    fn final_report(events: &[BatchEvent]) -> &BatchReport {
        match events.last() {
            Some(BatchEvent::Finished(report)) => report,
            other => panic!("expected Finished as the last event, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_directory_completes_immediately() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let controller = BatchController::new(PathBuf::from(MISSING_FFMPEG));

        let rx = controller
            .start(test_config(input.path(), output.path(), 50.0))
            .unwrap();
        let events = collect_events(rx);

        assert!(matches!(events[0], BatchEvent::Started { total: 0 }));
        let report = final_report(&events);
        assert_eq!(report.total_jobs, 0);
        assert_eq!(report.completed(), 0);
        assert!(!report.cancelled);
        assert_eq!(controller.phase(), BatchPhase::Completed);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_size_threshold_limits_the_work_list() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        create_video_mb(input.path(), "small.mp4", 10);
        create_video_mb(input.path(), "medium.mp4", 60);
        create_video_mb(input.path(), "large.mp4", 80);

        let controller = BatchController::new(PathBuf::from(MISSING_FFMPEG));
        let rx = controller
            .start(test_config(input.path(), output.path(), 50.0))
            .unwrap();
        let events = collect_events(rx);

        assert!(matches!(events[0], BatchEvent::Started { total: 2 }));
        assert_eq!(final_report(&events).total_jobs, 2);
    }

    #[test]
    fn test_per_file_failures_do_not_abort_the_batch() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        create_video_mb(input.path(), "a.mp4", 1);
        create_video_mb(input.path(), "b.mp4", 1);
        create_video_mb(input.path(), "c.mov", 1);

        let controller = BatchController::new(PathBuf::from(MISSING_FFMPEG));
        let rx = controller
            .start(test_config(input.path(), output.path(), 0.0))
            .unwrap();
        let events = collect_events(rx);

        let started = events
            .iter()
            .filter(|e| matches!(e, BatchEvent::FileStarted { .. }))
            .count();
        assert_eq!(started, 3);

        // The counter invariant holds at every progress event
        for event in &events {
            if let BatchEvent::Progress { completed, total } = event {
                assert!(completed <= total);
            }
        }

        let report = final_report(&events);
        assert_eq!(report.total_jobs, 3);
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 3);
        assert_eq!(report.completed(), 3);
        assert_eq!(report.errors.len(), 3);
        assert!(!report.cancelled);
        assert_eq!(controller.phase(), BatchPhase::Completed);

        // No destination artifacts for failed files
        let leftovers: Vec<_> = std::fs::read_dir(output.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let controller = BatchController::new(PathBuf::from(MISSING_FFMPEG));

        controller.state.running.store(true, Ordering::SeqCst);
        let err = controller
            .start(test_config(input.path(), output.path(), 50.0))
            .unwrap_err();
        assert!(matches!(err, CompressError::AlreadyRunning));
        controller.state.running.store(false, Ordering::SeqCst);
    }

    #[test]
    fn test_missing_input_directory_is_fatal() {
        let output = TempDir::new().unwrap();
        let controller = BatchController::new(PathBuf::from(MISSING_FFMPEG));

        let err = controller
            .start(test_config(
                Path::new("/nonexistent/input"),
                output.path(),
                50.0,
            ))
            .unwrap_err();
        assert!(matches!(err, CompressError::DirectoryNotFound(_)));
        assert_eq!(controller.phase(), BatchPhase::Failed);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_invalid_bitrate_is_fatal_before_selection() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let controller = BatchController::new(PathBuf::from(MISSING_FFMPEG));

        let mut config = test_config(input.path(), output.path(), 50.0);
        config.bitrate_value = 0;
        let err = controller.start(config).unwrap_err();
        assert!(matches!(err, CompressError::InvalidBitrate(_)));
        assert_eq!(controller.phase(), BatchPhase::Failed);
    }

    #[test]
    fn test_negative_threshold_is_fatal() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let controller = BatchController::new(PathBuf::from(MISSING_FFMPEG));

        let err = controller
            .start(test_config(input.path(), output.path(), -5.0))
            .unwrap_err();
        assert!(matches!(err, CompressError::InvalidConfig(_)));
    }

    #[test]
    fn test_failed_start_can_be_retried() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let controller = BatchController::new(PathBuf::from(MISSING_FFMPEG));

        let mut bad = test_config(input.path(), output.path(), 50.0);
        bad.bitrate_value = 0;
        assert!(controller.start(bad).is_err());

        // The guard is released after a fatal error
        let rx = controller
            .start(test_config(input.path(), output.path(), 50.0))
            .unwrap();
        let events = collect_events(rx);
        assert!(!final_report(&events).cancelled);
    }

    #[test]
    fn test_output_directory_is_created() {
        let input = TempDir::new().unwrap();
        let output_root = TempDir::new().unwrap();
        let output = output_root.path().join("nested").join("out");
        let controller = BatchController::new(PathBuf::from(MISSING_FFMPEG));

        let rx = controller
            .start(test_config(input.path(), &output, 50.0))
            .unwrap();
        collect_events(rx);
        assert!(output.is_dir());
    }

    #[tokio::test]
    async fn test_precancelled_run_processes_nothing() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        create_video_mb(input.path(), "a.mp4", 1);
        create_video_mb(input.path(), "b.mp4", 1);

        let config = test_config(input.path(), output.path(), 0.0);
        let candidates =
            select_candidates(&config.input_dir, VIDEO_EXTENSIONS, config.min_size_mb).unwrap();
        assert_eq!(candidates.len(), 2);

        let cancel = AtomicBool::new(true);
        let (tx, rx) = mpsc::channel();
        let report = run_batch(
            Path::new(MISSING_FFMPEG),
            &config,
            candidates,
            &cancel,
            &tx,
        )
        .await;
        drop(tx);

        assert!(report.cancelled);
        assert_eq!(report.completed(), 0);
        assert_eq!(report.total_jobs, 2);

        // No file was started after the cancel request
        let events: Vec<BatchEvent> = rx.iter().collect();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, BatchEvent::FileStarted { .. }))
        );
    }

    #[tokio::test]
    async fn test_run_ignores_a_dropped_receiver() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        create_video_mb(input.path(), "a.mp4", 1);

        let config = test_config(input.path(), output.path(), 0.0);
        let candidates =
            select_candidates(&config.input_dir, VIDEO_EXTENSIONS, config.min_size_mb).unwrap();

        let cancel = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel();
        drop(rx);

        let report = run_batch(
            Path::new(MISSING_FFMPEG),
            &config,
            candidates,
            &cancel,
            &tx,
        )
        .await;
        assert_eq!(report.completed(), 1);
    }

    #[test]
    fn test_destination_naming() {
        assert_eq!(
            destination_for(Path::new("/out"), "clip.mp4"),
            PathBuf::from("/out/compressed_clip.mp4")
        );
    }
}
