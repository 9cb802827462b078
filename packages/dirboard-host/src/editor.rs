/// Opens card files for editing, either with a configured command or the
/// platform's default handler.
use dirboard_core::EditorOpener;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct SystemEditor {
    command: Option<String>,
}

impl SystemEditor {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Split an editor command line into program and leading arguments.
fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Start `program` on `path` and reap it in the background. Returns the pid.
fn launch(program: &str, args: &[&str], path: &Path) -> io::Result<u32> {
    let mut child = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();
    let program = program.to_string();
    thread::Builder::new()
        .name("dirboard-editor-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                log::warn!("[dirboard.editor] {} exited with {}", program, status)
            }
            Ok(_) => {}
            Err(e) => log::warn!("[dirboard.editor] Failed to wait for {}: {}", program, e),
        })?;
    Ok(pid)
}

impl EditorOpener for SystemEditor {
    fn open(&self, path: &Path) -> io::Result<()> {
        let Some((program, args)) = self.command.as_deref().and_then(split_command) else {
            log::info!("[dirboard.editor] Opening {:?} with system handler", path);
            return opener::open(path).map_err(io::Error::other);
        };

        log::info!("[dirboard.editor] Opening {:?} with {}", path, program);
        launch(program, &args, path).map(|_| ())
    }
}
