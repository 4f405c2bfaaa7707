//! Render DOT to an image with the Graphviz `dot` executable

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Graphviz rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Graphviz '{executable}' command not found. Install Graphviz or print DOT with `schemaview dot` instead.")]
    ExecutableNotFound { executable: String },

    #[error("Graphviz exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Failed to run Graphviz: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs `dot -T<format> -o <path>` with the DOT text on stdin
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    executable: String,
    format: String,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new("png")
    }
}

impl GraphvizRenderer {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            executable: "dot".to_string(),
            format: format.into(),
        }
    }

    /// Use another Graphviz layout program, or an absolute path to `dot`
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// File actually written for an output name
    ///
    /// The format is appended as an extension unless the name already ends
    /// with it, so `table_diagram` becomes `table_diagram.png`.
    pub fn output_path(&self, output: &Path) -> PathBuf {
        match output.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(&self.format) => output.to_path_buf(),
            _ => {
                let mut name = output.as_os_str().to_owned();
                name.push(".");
                name.push(&self.format);
                PathBuf::from(name)
            }
        }
    }

    /// Render and return the path of the written file
    pub fn render(&self, dot_source: &str, output: &Path) -> Result<PathBuf, RenderError> {
        let path = self.output_path(output);
        tracing::debug!(executable = %self.executable, format = %self.format, path = %path.display(), "running graphviz");

        let mut child = Command::new(&self.executable)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RenderError::ExecutableNotFound {
                        executable: self.executable.clone(),
                    }
                } else {
                    RenderError::Io(e)
                }
            })?;

        // A process that dies early closes the pipe; its exit status explains more.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(dot_source.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        tracing::info!(path = %path.display(), "diagram rendered");
        Ok(path)
    }
}
