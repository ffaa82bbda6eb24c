//! Pipeline progress reporting.
//!
//! Steps report what they are doing through a [`ProgressReporter`]. The
//! console reporter prints colored step banners; the JSON reporter emits one
//! object per line for editor integrations and CI logs.

use crate::build::{Step, StepStatus};
use serde_json::json;
use std::io::Write;
use std::sync::Mutex;

/// Events that can be reported during a pipeline run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Pipeline started
    PipelineStarted {
        /// Build configuration label
        configuration: String,
        /// Steps about to run, in order
        steps: Vec<Step>,
    },
    /// A step started
    StepStarted { step: Step },
    /// A step finished
    StepCompleted {
        step: Step,
        status: StepStatus,
        /// Duration in milliseconds
        duration_ms: u64,
    },
    /// Advisory problem, the pipeline keeps going
    Warning { step: Option<Step>, message: String },
    /// Pipeline finished
    PipelineCompleted {
        success: bool,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Number of steps that ran
        completed: usize,
    },
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    use_colors: bool,
    verbose: bool,
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a console reporter on stderr, colored when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            verbose: false,
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { use_colors: false, verbose: false, output: Mutex::new(Box::new(output)) }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn prefixed(step: Option<Step>, message: &str) -> String {
    match step {
        Some(step) => format!("{}: {}", step, message),
        None => message.to_string(),
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::PipelineStarted { configuration, steps } => {
                let plan = steps.iter().map(Step::name).collect::<Vec<_>>().join(" -> ");
                self.writeln(&format!("{} {} [{}]", self.cyan("[sprout]"), plan, configuration));
            }
            ProgressEvent::StepStarted { step } => {
                self.writeln(&self.cyan(&format!("----- {} -----", step.title())));
            }
            ProgressEvent::StepCompleted { step, status, duration_ms } => {
                let status_str = match &status {
                    StepStatus::Success => self.green("ok"),
                    StepStatus::Warned => self.yellow("ok (warnings)"),
                    StepStatus::Failed(_) => self.red("FAILED"),
                };
                if self.verbose || status.is_failure() {
                    self.writeln(&format!(
                        "{} {} {} ({})",
                        self.cyan(&format!("[{}]", step)),
                        status_str,
                        step,
                        format_duration(duration_ms)
                    ));
                }
            }
            ProgressEvent::Warning { step, message } => {
                self.writeln(&format!("{} {}", self.yellow("[warn]"), prefixed(step, &message)));
            }
            ProgressEvent::PipelineCompleted { success, duration_ms, completed } => {
                let steps = if completed == 1 { "step" } else { "steps" };
                if success {
                    self.writeln(&format!(
                        "{} {} {} in {}",
                        self.green("[done]"),
                        completed,
                        steps,
                        format_duration(duration_ms)
                    ));
                } else {
                    self.writeln(&format!(
                        "{} pipeline stopped after {} {} in {}",
                        self.red("[error]"),
                        completed,
                        steps,
                        format_duration(duration_ms)
                    ));
                }
            }
        }
    }
}

/// JSON-lines progress reporter.
pub struct JsonProgress {
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonProgress").finish()
    }
}

impl JsonProgress {
    /// Create a new JSON progress reporter writing to stderr.
    pub fn new() -> Self {
        Self { output: Mutex::new(Box::new(std::io::stderr())) }
    }

    /// Create a JSON progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { output: Mutex::new(Box::new(output)) }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        let value = match event {
            ProgressEvent::PipelineStarted { configuration, steps } => json!({
                "event": "pipeline_started",
                "configuration": configuration,
                "steps": steps.iter().map(Step::name).collect::<Vec<_>>(),
            }),
            ProgressEvent::StepStarted { step } => json!({
                "event": "step_started",
                "step": step.name(),
            }),
            ProgressEvent::StepCompleted { step, status, duration_ms } => {
                let mut value = json!({
                    "event": "step_completed",
                    "step": step.name(),
                    "status": match &status {
                        StepStatus::Success => "success",
                        StepStatus::Warned => "warnings",
                        StepStatus::Failed(_) => "failed",
                    },
                    "duration_ms": duration_ms,
                });
                if let StepStatus::Failed(err) = status {
                    value["error"] = json!(err);
                }
                value
            }
            ProgressEvent::Warning { step, message } => json!({
                "event": "warning",
                "step": step.map(|s| s.name()),
                "message": message,
            }),
            ProgressEvent::PipelineCompleted { success, duration_ms, completed } => json!({
                "event": "pipeline_completed",
                "success": success,
                "duration_ms": duration_ms,
                "completed": completed,
            }),
        };

        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", value);
        }
    }
}

/// Format a duration in milliseconds for display.
fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn capture() -> (Arc<Mutex<Vec<u8>>>, TestWriter) {
        let output = Arc::new(Mutex::new(Vec::new()));
        let writer = TestWriter(Arc::clone(&output));
        (output, writer)
    }

    fn text(output: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8_lossy(&output.lock().unwrap()).into_owned()
    }

    #[test]
    fn test_console_pipeline_started() {
        let (output, writer) = capture();
        let reporter = ConsoleProgress::with_output(writer);
        reporter.report(ProgressEvent::PipelineStarted {
            configuration: "debug".to_string(),
            steps: vec![Step::Shaders, Step::Build],
        });

        let text = text(&output);
        assert!(text.contains("shaders -> build"));
        assert!(text.contains("[debug]"));
    }

    #[test]
    fn test_console_step_banner() {
        let (output, writer) = capture();
        let reporter = ConsoleProgress::with_output(writer);
        reporter.report(ProgressEvent::StepStarted { step: Step::Shaders });
        assert!(text(&output).contains("----- Compiling shaders -----"));
    }

    #[test]
    fn test_console_step_failed() {
        let (output, writer) = capture();
        let reporter = ConsoleProgress::with_output(writer);
        reporter.report(ProgressEvent::StepCompleted {
            step: Step::Build,
            status: StepStatus::Failed("make returned exit code 2".to_string()),
            duration_ms: 1500,
        });

        let text = text(&output);
        assert!(text.contains("FAILED"));
        assert!(text.contains("1.5s"));
        // the error itself is printed once by the caller
        assert!(!text.contains("make returned exit code 2"));
    }

    #[test]
    fn test_console_success_quiet_unless_verbose() {
        let (output, writer) = capture();
        let reporter = ConsoleProgress::with_output(writer);
        reporter.report(ProgressEvent::StepCompleted {
            step: Step::Lint,
            status: StepStatus::Success,
            duration_ms: 10,
        });
        assert!(text(&output).is_empty());

        let (output, writer) = capture();
        let reporter = ConsoleProgress::with_output(writer).with_verbose(true);
        reporter.report(ProgressEvent::StepCompleted {
            step: Step::Lint,
            status: StepStatus::Success,
            duration_ms: 10,
        });
        assert!(text(&output).contains("ok lint (10ms)"));
    }

    #[test]
    fn test_console_warning() {
        let (output, writer) = capture();
        let reporter = ConsoleProgress::with_output(writer);
        reporter.report(ProgressEvent::Warning {
            step: Some(Step::Format),
            message: "clang-format not found".to_string(),
        });
        assert!(text(&output).contains("[warn] format: clang-format not found"));
    }

    #[test]
    fn test_console_colors() {
        let (output, writer) = capture();
        let reporter = ConsoleProgress::with_output(writer).with_colors(true);
        reporter.report(ProgressEvent::PipelineCompleted { success: true, duration_ms: 5, completed: 1 });
        assert!(text(&output).contains("\x1b[32m[done]\x1b[0m"));
    }

    #[test]
    fn test_json_step_completed() {
        let (output, writer) = capture();
        let reporter = JsonProgress::with_output(writer);
        reporter.report(ProgressEvent::StepCompleted {
            step: Step::Run,
            status: StepStatus::Failed("exit code 3".to_string()),
            duration_ms: 42,
        });

        let value: serde_json::Value = serde_json::from_str(text(&output).trim()).unwrap();
        assert_eq!(value["event"], "step_completed");
        assert_eq!(value["step"], "run");
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "exit code 3");
        assert_eq!(value["duration_ms"], 42);
    }

    #[test]
    fn test_json_one_object_per_line() {
        let (output, writer) = capture();
        let reporter = JsonProgress::with_output(writer);
        reporter.report(ProgressEvent::StepStarted { step: Step::Lint });
        reporter.report(ProgressEvent::Warning { step: None, message: "a \"quoted\" msg".into() });

        let text = text(&output);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let warning: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(warning["message"], "a \"quoted\" msg");
        assert!(warning["step"].is_null());
    }

    #[test]
    fn test_null_progress() {
        NullProgress::new().report(ProgressEvent::StepStarted { step: Step::Clean });
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(150), "150ms");
        assert_eq!(format_duration(2500), "2.5s");
        assert_eq!(format_duration(125_000), "2m 5s");
    }

    struct TestWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
