//! `Launcher`: the collaborator capability the `exec` IPC command and the
//! `Terminal` default key command dispatch through to start an external
//! process (SPEC_FULL.md §2 NEW). Process supervision/auto-restart itself
//! stays out of scope (spec §1 Non-goals); this is only the seam the
//! command layer calls through, grounded in the same shape as
//! `WindowController`.

pub trait Launcher: Send {
    /// Starts `shell_command` via the user's shell. Fire-and-forget: the
    /// core does not track the child's lifetime or exit status.
    fn spawn(&mut self, shell_command: &str);
}

/// Production launcher: `sh -c <command>`, matching how i3/sway's `exec`
/// hands commands to the shell.
#[derive(Debug, Default)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn spawn(&mut self, shell_command: &str) {
        let result = std::process::Command::new("sh")
            .arg("-c")
            .arg(shell_command)
            .spawn();
        if let Err(err) = result {
            tracing::warn!(%shell_command, %err, "failed to spawn command");
        }
    }
}

/// Test double recording every spawn request instead of touching the OS.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    pub spawned: Vec<String>,
}

impl Launcher for RecordingLauncher {
    fn spawn(&mut self, shell_command: &str) {
        self.spawned.push(shell_command.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_launcher_records_without_spawning() {
        let mut launcher = RecordingLauncher::default();
        launcher.spawn("notify-send hi");
        assert_eq!(launcher.spawned, vec!["notify-send hi".to_string()]);
    }
}
