//! Per-session message sink and debug transcript

/// Ordered record of the messages logged during one translation session.
///
/// Every message is forwarded to `tracing` as well; the captured copy backs
/// the `-debug.txt` transcript.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    /// Messages in logging order
    lines: Vec<String>,
}

impl SessionLog {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.lines.push(message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.lines.push(message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{message}");
        self.lines.push(message);
    }

    /// Captured messages.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Render the debug transcript for the captured messages.
    #[must_use]
    pub fn transcript(&self) -> String {
        render_transcript(&self.lines)
    }
}

/// One line per message, ANSI escape sequences removed.
#[must_use]
pub fn render_transcript<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().fold(String::new(), |mut out, line| {
        out.push_str(&strip_ansi_escapes::strip_str(line.as_ref()));
        out.push('\n');
        out
    })
}
