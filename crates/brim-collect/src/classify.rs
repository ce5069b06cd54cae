//! Content-type classification capability.
//!
//! The production classifier shells out to `file --mime --brief`; tests use
//! [`Fixed`] or [`Unavailable`]. The contract is "returns a label or
//! nothing" — callers substitute the sentinel, output parsing stays here.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Resolves a MIME-like label for a file.
pub trait Classify: Send + Sync {
    /// Classify the file at `path`. `None` means the classifier is
    /// unavailable or could not resolve a type; it is never an error.
    fn classify(&self, path: &Path) -> Option<String>;
}

/// Production classifier: invokes the external `file` command.
#[derive(Clone, Debug)]
pub struct FileCommand {
    program: PathBuf,
    timeout: Duration,
}

const POLL_INTERVAL: Duration = Duration::from_millis(20);

impl FileCommand {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(5))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            program: PathBuf::from("file"),
            timeout,
        }
    }

    /// Substitute the invoked program; tests point this at a script.
    pub fn with_program(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl Default for FileCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Classify for FileCommand {
    fn classify(&self, path: &Path) -> Option<String> {
        let mut child = Command::new(&self.program)
            .arg("--mime")
            .arg("--brief")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .ok()?;

        // Drain stdout on its own thread so the child cannot stall on a
        // full pipe while we poll for exit.
        let mut stdout = child.stdout.take()?;
        let reader = std::thread::spawn(move || {
            let mut output = String::new();
            stdout.read_to_string(&mut output).ok().map(|_| output)
        });

        // Bounded wait: the classifier must never hang the pipeline.
        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        tracing::warn!(path = %path.display(), "classifier timed out");
                        // The reader thread is left to drain on its own: a
                        // grandchild may still hold the pipe open after the
                        // kill, and joining would wait for it.
                        let _ = child.kill();
                        let _ = child.wait();
                        return None;
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(_) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
            }
        };

        let output = reader.join().ok().flatten()?;
        if !status.success() {
            return None;
        }

        let label = output.trim();
        // `file` exits zero for a vanished path but reports the miss inline.
        if label.is_empty() || label.ends_with("(No such file or directory)") {
            return None;
        }
        Some(label.to_string())
    }
}

/// Test classifier returning a fixed label for every path.
#[derive(Clone, Debug)]
pub struct Fixed(pub String);

impl Fixed {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

impl Classify for Fixed {
    fn classify(&self, _path: &Path) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Test classifier that always fails to resolve a type.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unavailable;

impl Classify for Unavailable {
    fn classify(&self, _path: &Path) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_returns_its_label() {
        let classifier = Fixed::new("text/plain; charset=us-ascii");
        let label = classifier.classify(Path::new("whatever"));
        assert_eq!(label.as_deref(), Some("text/plain; charset=us-ascii"));
    }

    #[test]
    fn unavailable_returns_none() {
        assert!(Unavailable.classify(Path::new("whatever")).is_none());
    }

    #[cfg(unix)]
    mod external_command {
        use super::super::*;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        fn fake_classifier(dir: &Path, body: &str) -> PathBuf {
            let script = dir.join("classifier.sh");
            let mut file = std::fs::File::create(&script).unwrap();
            writeln!(file, "#!/bin/sh").unwrap();
            writeln!(file, "{body}").unwrap();
            drop(file);
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
            script
        }

        #[test]
        fn output_larger_than_the_pipe_buffer_is_drained() {
            let dir = tempfile::tempdir().unwrap();
            // Well past the 64 KiB pipe capacity on Linux.
            let script = fake_classifier(
                dir.path(),
                "awk 'BEGIN { for (i = 0; i < 200000; i++) printf \"x\" }'",
            );
            let classifier = FileCommand::with_program(script, Duration::from_secs(5));
            let label = classifier.classify(dir.path()).unwrap();
            assert_eq!(label.len(), 200_000);
        }

        #[test]
        fn slow_command_is_killed_at_the_deadline() {
            let dir = tempfile::tempdir().unwrap();
            let script = fake_classifier(dir.path(), "sleep 10\necho text/plain");
            let classifier = FileCommand::with_program(script, Duration::from_millis(100));
            let started = Instant::now();
            assert!(classifier.classify(dir.path()).is_none());
            assert!(started.elapsed() < Duration::from_secs(5));
        }
    }
}
