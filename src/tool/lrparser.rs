//! Subprocess adapter for the `lrparser` executable

use super::{AnalysisRequest, AnalysisTool, GrammarSource, ToolInvocationError};
use crate::script::StepScript;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// File name inline grammar text is written to
const GRAMMAR_FILE: &str = "grammar.txt";
/// How often a running child is checked for exit
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Where the tool lives and how it is run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub executable: PathBuf,
    /// Directory the tool writes its output into
    pub out_dir: PathBuf,
    /// Name of the step script inside `out_dir`
    pub script_file: String,
    pub timeout: Duration,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            executable: PathBuf::from("./build/lrparser"),
            out_dir: std::env::temp_dir().join(format!("lrstep-{}", std::process::id())),
            script_file: "steps.py".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LrParserTool {
    config: ToolConfig,
}

fn io_error(context: &str, err: io::Error) -> ToolInvocationError {
    ToolInvocationError::Io(format!("{}: {}", context, err))
}

impl LrParserTool {
    pub fn new(config: ToolConfig) -> Self {
        LrParserTool { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Path of the grammar file to pass, writing inline text out first
    fn grammar_path(&self, grammar: &GrammarSource) -> Result<PathBuf, ToolInvocationError> {
        match grammar {
            GrammarSource::File(path) => Ok(path.clone()),
            GrammarSource::Text(text) => {
                let path = self.config.out_dir.join(GRAMMAR_FILE);
                fs::write(&path, text).map_err(|e| io_error("writing grammar", e))?;
                Ok(path)
            }
        }
    }

    fn spawn(
        &self,
        request: &AnalysisRequest,
        grammar: &Path,
    ) -> Result<Child, ToolInvocationError> {
        let mut command = Command::new(&self.config.executable);
        command
            .arg(request.mode.arg())
            .arg("-o")
            .arg(&self.config.out_dir);
        if request.input.is_none() {
            command.arg("--no-test");
        }
        command
            .arg(grammar)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        command.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                ToolInvocationError::NotFound(self.config.executable.clone())
            }
            _ => ToolInvocationError::Spawn(e.to_string()),
        })
    }

    /// Poll until the child exits, killing it once the timeout passes
    fn wait(&self, child: &mut Child) -> Result<ExitStatus, ToolInvocationError> {
        let started = Instant::now();
        loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| io_error("waiting for tool", e))?
            {
                return Ok(status);
            }
            if started.elapsed() >= self.config.timeout {
                log::warn!(
                    "killing analysis tool after {:?}",
                    self.config.timeout
                );
                // Already exited between the poll and the kill is fine
                let _ = child.kill();
                let _ = child.wait();
                return Err(ToolInvocationError::TimedOut(self.config.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Read a pipe to the end on its own thread, so the child never blocks on a
/// full pipe while it is being polled.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_string(&mut text)?;
        }
        Ok(text)
    })
}

impl AnalysisTool for LrParserTool {
    fn analyze(&self, request: &AnalysisRequest) -> Result<StepScript, ToolInvocationError> {
        fs::create_dir_all(&self.config.out_dir)
            .map_err(|e| io_error("creating output directory", e))?;
        let grammar = self.grammar_path(&request.grammar)?;

        let mut child = self.spawn(request, &grammar)?;
        log::debug!(
            "spawned {} (pid {})",
            self.config.executable.display(),
            child.id()
        );

        let stderr = drain(child.stderr.take());

        if let Some(mut stdin) = child.stdin.take() {
            if let Some(line) = request.input_line() {
                // A tool that exits early closes its end; the exit status
                // reports the real problem.
                if let Err(e) = writeln!(stdin, "{}", line) {
                    log::debug!("tool stdin closed early: {}", e);
                }
            }
        }

        // On timeout the reader is left to see EOF on its own
        let status = self.wait(&mut child)?;
        let stderr = stderr
            .join()
            .map_err(|_| ToolInvocationError::Io("stderr reader panicked".to_string()))?
            .map_err(|e| io_error("reading tool stderr", e))?;

        if !status.success() {
            return Err(ToolInvocationError::Exited {
                status: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        let path = self.config.out_dir.join(&self.config.script_file);
        let text = fs::read_to_string(&path)
            .map_err(|e| io_error(&format!("reading {}", path.display()), e))?;
        Ok(StepScript::parse(&text))
    }
}
