//! SPE session scanner.
//!
//! `perf script -D` interleaves SPE data with every other perf record. An SPE
//! session starts at the "ARM SPE data" line and ends at the next blank line.
//! The CPU of a session comes from the `PERF_RECORD_AUXTRACE` header that
//! precedes it.
//!
//! Inside a session only lines whose first packet is `PC` are handed on, as
//! the start of a new record. Anything else seen between records is dropped.

use super::tokenizer::tokenize;
use crate::utils::config::{AUXTRACE_TAG, CPU_ID_PATTERN, SESSION_MARKER};
use log::{debug, warn};

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    OutOfSession,
    InSession,
}

/// What the scanner made of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Line carries nothing the decoder needs
    Skipped,
    /// Line was too short to hold a packet
    Malformed,
    SessionStarted,
    SessionEnded,
    /// A `PC` packet opened a record; holds the tokens after the label
    RecordStart(Vec<String>),
}

/// Line-level state machine tracking the current session and CPU
#[derive(Debug, Clone)]
pub struct SessionScanner {
    state: SessionState,
    cpu: Option<i32>,
    prefix_width: usize,
    sessions: u64,
}

impl SessionScanner {
    pub fn new(prefix_width: usize) -> Self {
        Self {
            state: SessionState::OutOfSession,
            cpu: None,
            prefix_width,
            sessions: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn in_session(&self) -> bool {
        self.state == SessionState::InSession
    }

    /// CPU announced by the last auxtrace header, if any
    pub fn current_cpu(&self) -> Option<i32> {
        self.cpu
    }

    /// Number of sessions entered so far
    pub fn sessions(&self) -> u64 {
        self.sessions
    }

    /// Feed one raw line (terminator included)
    pub fn observe(&mut self, line: &str) -> ScanEvent {
        if let Some(caps) = CPU_ID_PATTERN.captures(line) {
            // cpu ids of other record types are not ours
            if !line.contains(AUXTRACE_TAG) {
                return ScanEvent::Skipped;
            }
            match caps[1].parse::<i32>() {
                Ok(cpu) => self.cpu = Some(cpu),
                Err(e) => {
                    warn!("Failed to parse cpu id {:?}: {}", &caps[0], e);
                    return ScanEvent::Skipped;
                }
            }
        }

        match self.state {
            SessionState::OutOfSession => {
                if !line.contains(SESSION_MARKER) {
                    return ScanEvent::Skipped;
                }
                self.state = SessionState::InSession;
                self.sessions += 1;
                debug!("Begin of SPE session (cpu {:?})", self.cpu);
                ScanEvent::SessionStarted
            }
            SessionState::InSession => {
                // a bare terminator, or a stray single character at end of input
                let blank = line.trim_end_matches(['\n', '\r']).is_empty();
                if blank || line.chars().count() <= 1 {
                    self.state = SessionState::OutOfSession;
                    self.cpu = None;
                    debug!("End of SPE session");
                    return ScanEvent::SessionEnded;
                }

                let tokens = match tokenize(line, self.prefix_width) {
                    Ok(tokens) => tokens,
                    Err(e) => {
                        warn!("{}: {}", e, line.trim_end());
                        return ScanEvent::Malformed;
                    }
                };

                match tokens.split_first() {
                    Some((&"PC", rest)) => {
                        ScanEvent::RecordStart(rest.iter().map(|t| t.to_string()).collect())
                    }
                    _ => ScanEvent::Skipped,
                }
            }
        }
    }
}
