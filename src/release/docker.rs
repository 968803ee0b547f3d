//! Container build and push through the docker CLI.

use std::cell::RefCell;
use std::path::Path;
use std::process::Command;

use crate::error::{MdqpError, Result};

use super::image::ImageTags;

/// Executes external commands on behalf of the release flow.
///
/// The seam between orchestration and the container tooling; tests swap in
/// [RecordingRunner] to assert on invocations without a docker daemon.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()>;
}

/// Runs commands for real, with stdio inherited so build and push output
/// streams straight into the CI log.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| MdqpError::command(format!("Failed to execute {program}: {e}")))?;

        if !status.success() {
            return Err(MdqpError::command(format!(
                "{program} {} failed with exit code {}",
                args.first().map(String::as_str).unwrap_or(""),
                status.code().unwrap_or(-1)
            )));
        }

        Ok(())
    }
}

/// Records invocations instead of executing them
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Vec<String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Every recorded invocation, program first, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().cloned());
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

/// The docker invocations one release performs.
pub struct Docker<'a, R: CommandRunner> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> Docker<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Docker { runner }
    }

    /// `docker build` with both release tags and the version build argument.
    pub fn build(&self, context: &Path, tags: &ImageTags, version: &str) -> Result<()> {
        let args = vec![
            "build".to_string(),
            "--build-arg".to_string(),
            format!("VERSION={version}"),
            "-t".to_string(),
            tags.versioned.clone(),
            "-t".to_string(),
            tags.latest.clone(),
            context.display().to_string(),
        ];
        self.runner.run("docker", &args)
    }

    /// `docker push` for a single reference. The CLI pushes one tag per
    /// call, so a release invokes this once per tag.
    pub fn push(&self, tag: &str) -> Result<()> {
        self.runner
            .run("docker", &["push".to_string(), tag.to_string()])
    }
}
