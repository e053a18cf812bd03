//! Narration logger
//!
//! Commit/branch/merge/revert/combat events emit short flavor lines in the
//! voice of a shell session ("you$ git commit -m 'move a piece'"). The lines
//! themselves are not part of the correctness contract, but whether an event
//! narrates (success vs rejection, silent commits) is.
//!
//! Entries use owned Strings behind a RefCell so read access works while the
//! engine holds the logger immutably; a bump allocator backs the transient
//! prompt+message formatting.

use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// How much narration reaches stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum VerbosityLevel {
    Silent,
    Minimal,
    #[default]
    Normal,
    Verbose,
}

/// Output destination for narration lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Print to stdout only (default).
    #[default]
    Stdout,
    /// Capture to the in-memory buffer only (tests).
    Memory,
    /// Both stdout and buffer.
    Both,
}

/// One captured narration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    /// Shell-style prompt prefix ("you$ "), empty for bare lines.
    pub prompt: String,
    pub message: String,
}

/// Read guard over captured entries; derefs to `[LogEntry]`.
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized narration sink.
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,

    /// Scratch space for prompt+message joins; reset on clear.
    format_bump: RefCell<Bump>,

    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Capture to memory without stdout noise (tests).
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Access captured entries.
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard { guard: self.log_buffer.borrow() }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
        self.format_bump.borrow_mut().reset();
    }

    /// Narrate at Normal level with a shell prompt prefix.
    pub fn narrate(&self, prompt: &str, message: &str) {
        self.log(VerbosityLevel::Normal, prompt, message);
    }

    /// Bare line at Normal level (no prompt).
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, "", message);
    }

    /// Always-shown line (game over, fatal UI messages).
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, "", message);
    }

    /// Detail line shown only at Verbose.
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, "", message);
    }

    fn log(&self, level: VerbosityLevel, prompt: &str, message: &str) {
        let should_capture = matches!(self.output_mode, OutputMode::Memory | OutputMode::Both);
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both)
            && level <= self.verbosity;

        if !should_capture && !should_output {
            return;
        }

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                prompt: prompt.to_string(),
                message: message.to_string(),
            });
        }

        if should_output {
            let bump = self.format_bump.borrow();
            let line = bumpalo::format!(in &bump, "{}{}", prompt, message);
            println!("{}", line.as_str());
        }
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("captured", &self.log_buffer.borrow().len())
            .finish()
    }
}
