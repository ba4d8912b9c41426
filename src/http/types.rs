//! Transport type definitions

/// Outcome of a HEAD existence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// No response at all (DNS, connect, timeout).
    Unreachable,
    /// The server answered with this status code.
    Status(u16),
}

impl ProbeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeStatus::Status(code) if is_success(*code))
    }
}

/// A fully read textual response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub status: u16,
    pub body: String,
}

impl TextResponse {
    pub fn is_success(&self) -> bool {
        is_success(self.status)
    }
}

/// Notifications emitted while a file body streams in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadEvent {
    /// Headers confirmed success; `total` is the advertised size when known.
    Started { total: Option<u64> },
    /// Emitted after every chunk, and once for an empty body.
    Progress { received: u64, total: Option<u64> },
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
