//! Log/terminal panel: bounded scrollback plus a small built-in command
//! line. Real process execution is out of scope; the panel exists to show
//! tracing output, preview errors and command echoes.

const DEFAULT_SCROLLBACK_LINES: usize = 2000;

#[derive(Debug)]
pub struct TerminalState {
    lines: Vec<String>,
    scrollback_lines: usize,
}

impl Default for TerminalState {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            scrollback_lines: DEFAULT_SCROLLBACK_LINES,
        }
    }
}

impl TerminalState {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        if self.lines.len() > self.scrollback_lines {
            let overflow = self.lines.len() - self.scrollback_lines;
            self.lines.drain(..overflow);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Runs a panel command. Commands the panel does not handle itself (for
    /// example a project listing) are forwarded to the caller as `false`.
    pub fn run_builtin(&mut self, input: &str) -> bool {
        let cmd = input.trim();
        if cmd.is_empty() {
            return true;
        }
        self.push_line(format!("> {cmd}"));
        match cmd {
            "clear" => {
                self.clear();
                true
            }
            "help" => {
                self.push_line("Available commands: help, clear, ls");
                true
            }
            "ls" => false,
            _ => {
                self.push_line(format!("Command not found: {cmd}"));
                true
            }
        }
    }
}
