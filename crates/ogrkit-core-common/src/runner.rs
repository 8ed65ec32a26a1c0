//! The seam between command construction and process execution.
//!
//! Builders produce a [`CommandLine`]; a [`ProcessRunner`] decides how to run
//! it. The runner owns spawning, output capture and failure reporting, so a
//! builder can be tested without ever launching a process.

use std::ffi::{OsStr, OsString};
use std::fmt;

/// A fully assembled external-tool invocation in two parallel renderings.
///
/// `args` is what gets executed. `display_args` mirrors it token for token
/// but renders data sources in their human-readable, secret-masked form, and
/// must only be used for logging and error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    args: Vec<OsString>,
    display_args: Vec<String>,
}

impl CommandLine {
    /// Starts a command line with the executable as its first token.
    #[must_use]
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        let program = program.as_ref();
        Self {
            args: vec![program.to_os_string()],
            display_args: vec![program.to_string_lossy().into_owned()],
        }
    }

    /// Appends a token that renders identically in both forms.
    pub fn push(&mut self, token: impl Into<String>) -> &mut Self {
        let token = token.into();
        self.args.push(OsString::from(&token));
        self.display_args.push(token);
        self
    }

    /// Appends a token whose executed and displayed forms differ.
    pub fn push_split(
        &mut self,
        encoded: impl Into<OsString>,
        shown: impl Into<String>,
    ) -> &mut Self {
        self.args.push(encoded.into());
        self.display_args.push(shown.into());
        self
    }

    /// The executable, i.e. the first token.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.args[0]
    }

    /// Every token after the executable, in execution form.
    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        &self.args[1..]
    }

    /// All tokens, executable included, in execution form.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// All tokens in logging form.
    #[must_use]
    pub fn display_args(&self) -> &[String] {
        &self.display_args
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_args.join(" "))
    }
}

/// Exit status and captured streams of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Returns `true` if the process exited with code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs an assembled [`CommandLine`].
///
/// The output type is up to the implementation; builders hand it back to the
/// caller unchanged.
pub trait ProcessRunner {
    /// What a run produces, typically a `Result` around [`ProcessOutput`].
    type Output;

    /// Runs the command and reports its result.
    fn run(&self, command: &CommandLine) -> Self::Output;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    type Output = R::Output;

    fn run(&self, command: &CommandLine) -> Self::Output {
        (**self).run(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_with_program() {
        let cmd = CommandLine::new("/usr/bin/ogr2ogr");
        assert_eq!(cmd.program(), OsStr::new("/usr/bin/ogr2ogr"));
        assert!(cmd.arguments().is_empty());
        assert_eq!(cmd.len(), 1);
        assert_eq!(cmd.to_string(), "/usr/bin/ogr2ogr");
    }

    #[test]
    fn test_push_keeps_representations_aligned() {
        let mut cmd = CommandLine::new("ogr2ogr");
        cmd.push("-f").push("GeoJSON");
        cmd.push_split("PG:password='real'", "PG:password='xxxxxx'");

        assert_eq!(cmd.args().len(), cmd.display_args().len());
        assert_eq!(cmd.args()[3], OsString::from("PG:password='real'"));
        assert_eq!(cmd.display_args()[3], "PG:password='xxxxxx'");
        assert_eq!(
            cmd.to_string(),
            "ogr2ogr -f GeoJSON PG:password='xxxxxx'"
        );
    }

    #[test]
    fn test_process_output_success() {
        let ok = ProcessOutput {
            status: Some(0),
            ..ProcessOutput::default()
        };
        assert!(ok.success());
        assert!(!ProcessOutput::default().success());
        assert!(
            !ProcessOutput {
                status: Some(1),
                ..ProcessOutput::default()
            }
            .success()
        );
    }

    struct Recorder;

    impl ProcessRunner for Recorder {
        type Output = usize;

        fn run(&self, command: &CommandLine) -> usize {
            command.len()
        }
    }

    #[test]
    fn test_runner_by_reference() {
        let mut cmd = CommandLine::new("ogr2ogr");
        cmd.push("-update");
        let runner = Recorder;
        assert_eq!((&runner).run(&cmd), 2);
    }
}
