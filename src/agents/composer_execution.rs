use crate::error::{Result, UpdaterError};
use std::ffi::OsString;
use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;

/// Composer subcommands the updater issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerCommand {
    Require,
    Update,
    Outdated,
}

impl fmt::Display for ComposerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComposerCommand::Require => "require",
            ComposerCommand::Update => "update",
            ComposerCommand::Outdated => "outdated",
        };
        f.write_str(name)
    }
}

/// One structured package-manager call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: ComposerCommand,
    /// `name` or `name:constraint` for require/update, bare name for outdated
    pub package: String,
    pub working_dir: PathBuf,
    pub format: Option<String>,
}

impl Invocation {
    pub fn require(package: &str, constraint: Option<&str>, working_dir: &Path) -> Self {
        let package = match constraint {
            Some(constraint) => format!("{package}:{constraint}"),
            None => package.to_string(),
        };

        Self {
            command: ComposerCommand::Require,
            package,
            working_dir: working_dir.to_path_buf(),
            format: None,
        }
    }

    pub fn update(package: &str, working_dir: &Path) -> Self {
        Self {
            command: ComposerCommand::Update,
            package: package.to_string(),
            working_dir: working_dir.to_path_buf(),
            format: None,
        }
    }

    /// Composer is asked for JSON, but only its `label : value` lines are read back
    pub fn outdated(package: &str, working_dir: &Path) -> Self {
        Self {
            command: ComposerCommand::Outdated,
            package: package.to_string(),
            working_dir: working_dir.to_path_buf(),
            format: Some("json".to_string()),
        }
    }

    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.command.to_string().into(),
            self.package.clone().into(),
            "--working-dir".into(),
            self.working_dir.clone().into_os_string(),
        ];

        if let Some(format) = &self.format {
            args.push(format!("--format={format}").into());
        }

        args
    }
}

/// Runs package-manager invocations and reports their exit status
pub trait PackageManager {
    /// Forwards all process output to `sink` and returns the exit status verbatim.
    /// Only a failure to start or wait on the process is an error.
    fn run(&self, invocation: &Invocation, sink: &mut dyn Write) -> Result<i32>;
}

/// Drives the `composer` executable as a subprocess
pub struct ComposerClient {
    binary: PathBuf,
}

impl ComposerClient {
    pub fn new<P: AsRef<Path>>(binary: P) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
        }
    }
}

impl PackageManager for ComposerClient {
    fn run(&self, invocation: &Invocation, sink: &mut dyn Write) -> Result<i32> {
        let args = invocation.to_args();
        tracing::debug!(
            "Executing: {} {}",
            self.binary.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                UpdaterError::Execution(format!(
                    "Failed to spawn '{}': {}",
                    self.binary.display(),
                    e
                ))
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are drained concurrently so neither can fill up and stall the child;
        // the sink itself is only written from this thread.
        let forwarded = thread::scope(|scope| -> std::io::Result<()> {
            let (tx, rx) = mpsc::channel::<Vec<u8>>();

            if let Some(stdout) = stdout {
                let tx = tx.clone();
                scope.spawn(move || forward_lines(stdout, tx));
            }
            if let Some(stderr) = stderr {
                let tx = tx.clone();
                scope.spawn(move || forward_lines(stderr, tx));
            }
            drop(tx);

            for line in rx {
                sink.write_all(&line)?;
            }
            sink.flush()
        });

        let status = child.wait().map_err(|e| {
            UpdaterError::Execution(format!("Failed to wait for process: {}", e))
        })?;
        forwarded?;

        let code = status.code().unwrap_or(-1);
        tracing::debug!("{} exited with status {}", invocation.command, code);
        Ok(code)
    }
}

fn forward_lines<R: Read>(pipe: R, tx: mpsc::Sender<Vec<u8>>) {
    let mut reader = BufReader::new(pipe);
    loop {
        let mut line = Vec::new();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Stopped reading package manager output: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_with_constraint_builds_package_spec() {
        let invocation =
            Invocation::require("pantheon-systems/terminus", Some("^2.0.0"), Path::new("/opt/t"));
        let args: Vec<String> = invocation
            .to_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "require",
                "pantheon-systems/terminus:^2.0.0",
                "--working-dir",
                "/opt/t"
            ]
        );
    }

    #[test]
    fn outdated_requests_json_format() {
        let invocation = Invocation::outdated("pantheon-systems/terminus", Path::new("/opt/t"));
        let args: Vec<String> = invocation
            .to_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "outdated",
                "pantheon-systems/terminus",
                "--working-dir",
                "/opt/t",
                "--format=json"
            ]
        );
    }

    #[test]
    fn update_never_pins_a_version() {
        let invocation = Invocation::update("pantheon-systems/terminus", Path::new("/opt/t"));
        assert_eq!(invocation.command, ComposerCommand::Update);
        assert_eq!(invocation.package, "pantheon-systems/terminus");
        assert!(invocation.format.is_none());
    }

    #[test]
    fn missing_binary_is_an_execution_error() {
        let client = ComposerClient::new("/nonexistent/composer-binary");
        let invocation = Invocation::update("vendor/pkg", Path::new("/tmp"));
        let mut sink = Vec::new();
        let err = client.run(&invocation, &mut sink).unwrap_err();
        assert!(matches!(err, UpdaterError::Execution(_)));
    }

    #[cfg(unix)]
    #[test]
    fn forwards_output_and_returns_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-composer");
        std::fs::write(
            &script,
            "#!/bin/sh\necho \"ran $1 $2\"\necho \"warning\" >&2\nexit 3\n",
        )
        .unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let client = ComposerClient::new(&script);
        let invocation = Invocation::update("vendor/pkg", dir.path());
        let mut sink = Vec::new();
        let status = client.run(&invocation, &mut sink).unwrap();

        assert_eq!(status, 3);
        let output = String::from_utf8(sink).unwrap();
        assert!(output.contains("ran update vendor/pkg"));
        assert!(output.contains("warning"));
    }
}
