//! External program execution.

use std::future::Future;
use std::pin::Pin;

use tokio::process::Command;

use crate::error::{Error, Result};

/// Trait for running external programs and capturing their output.
pub trait Shell: Send + Sync {
    /// Runs `program` with `args` and returns its standard output.
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [&'a str],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Runs programs on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [&'a str],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            tracing::trace!("running {} {:?}", program, args);

            let output = Command::new(program)
                .args(args)
                .output()
                .await
                .map_err(|e| Error::Shell {
                    program: program.to_owned(),
                    reason: e.to_string(),
                })?;

            if !output.status.success() {
                return Err(Error::Shell {
                    program: program.to_owned(),
                    reason: format!(
                        "{}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    ),
                });
            }

            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        })
    }
}
