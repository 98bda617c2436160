//! External assistant subprocess invocation.
//!
//! The fetch tool can forward page text to a local AI command line tool.
//! The command is a fixed argument vector; the prompt goes in on stdin and
//! the answer comes back on stdout.

use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// A configured assistant command (program + arguments).
#[derive(Debug, Clone)]
pub struct AssistantCommand {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl AssistantCommand {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Build from an argument vector; the first element is the program.
    pub fn from_argv(argv: &[String], timeout: Duration) -> Result<Self, AssistError> {
        let (program, args) = argv
            .split_first()
            .ok_or(AssistError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }

    /// Run the assistant with the given prompt on stdin and return its
    /// stdout on success.
    pub async fn run(&self, prompt: &str) -> Result<String, AssistError> {
        debug!(program = %self.program, "invoking assistant");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AssistError::Spawn(self.program.clone(), e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AssistError::Pipe("stdin".to_string()))?;
        stdin
            .write_all(prompt.as_bytes())
            .await
            .map_err(AssistError::Io)?;
        drop(stdin);

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(AssistError::Io(e)),
            Err(_) => {
                warn!(program = %self.program, timeout = ?self.timeout, "assistant timed out");
                return Err(AssistError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AssistError::NonZeroExit { code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("assistant command is empty")]
    EmptyCommand,

    #[error("failed to start assistant '{0}': {1}")]
    Spawn(String, std::io::Error),

    #[error("failed to capture assistant {0}")]
    Pipe(String),

    #[error("assistant I/O error: {0}")]
    Io(std::io::Error),

    #[error("assistant timed out after {0:?}")]
    Timeout(Duration),

    #[error("assistant exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(argv: &[&str]) -> AssistantCommand {
        let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        AssistantCommand::from_argv(&argv, Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_empty_argv_rejected() {
        let err = AssistantCommand::from_argv(&[], Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, AssistError::EmptyCommand));
    }

    #[tokio::test]
    async fn test_prompt_reaches_stdin() {
        let answer = command(&["cat"]).run("hello assistant").await.unwrap();
        assert_eq!(answer, "hello assistant");
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let err = command(&["sh", "-c", "echo oops >&2; exit 3"])
            .run("ignored")
            .await
            .unwrap_err();
        match err {
            AssistError::NonZeroExit { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = command(&["definitely-not-a-real-binary-xyz"])
            .run("hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AssistError::Spawn(_, _)));
    }
}
