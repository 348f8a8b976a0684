
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Local;
use strum_macros::Display;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Debug and info go to stdout, the rest to stderr.
    fn echo(self, line: &str) {
        match self {
            LogLevel::Debug | LogLevel::Info => println!("{line}"),
            LogLevel::Warn | LogLevel::Error => eprintln!("{line}"),
        }
    }
}

/// Where a message goes. Engine chatter is `FileOnly`; user-facing
/// notices from the binary go to the console as well.
#[derive(Debug, Copy, Clone, Default)]
pub enum LogTarget {
    ConsoleOnly,
    #[default]
    ConsoleAndFile,
    FileOnly,
}

impl LogTarget {
    fn console(self) -> bool {
        matches!(self, LogTarget::ConsoleOnly | LogTarget::ConsoleAndFile)
    }

    fn file(self) -> bool {
        matches!(self, LogTarget::ConsoleAndFile | LogTarget::FileOnly)
    }
}

/// The session file, opened on the first file-bound message.
struct SessionFile {
    file: Option<File>,
    path: Option<PathBuf>,
    opened: bool,
    dir: PathBuf,
}

impl SessionFile {
    fn open(&mut self) -> Option<&mut File> {
        if !self.opened {
            self.opened = true;
            match Self::create(&self.dir) {
                Ok((file, path)) => {
                    self.file = Some(file);
                    self.path = Some(path);
                }
                Err(err) => {
                    eprintln!("WARN: No session log in '{}'; continuing without one. ({err})", self.dir.display());
                }
            }
        }
        self.file.as_mut()
    }

    fn create(dir: &Path) -> std::io::Result<(File, PathBuf)> {
        fs::create_dir_all(dir)?;
        let stamp = Local::now().format("%Y%m%d-%H%M%S%.3f");
        let path = dir.join(format!("ganttview-{stamp}.log"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok((file, path))
    }
}

/// Cloneable handle shared by the chart and the binary. Clones write to
/// the same session file.
#[derive(Clone)]
pub struct Logger {
    session: Arc<Mutex<SessionFile>>,
    file_enabled: Arc<AtomicBool>,
    console_min: Arc<AtomicU8>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(SessionFile {
                file: None,
                path: None,
                opened: false,
                dir: PathBuf::from("logs"),
            })),
            file_enabled: Arc::new(AtomicBool::new(true)),
            console_min: Arc::new(AtomicU8::new(LogLevel::Info as u8)),
        }
    }

    /// A logger that never touches the filesystem; used by library callers
    /// that do not care about session logs.
    pub fn console_only() -> Self {
        let logger = Self::new();
        logger.set_file_logging_enabled(false);
        logger
    }

    fn log(&self, level: LogLevel, message: &str, target: LogTarget) {
        if target.console() && level as u8 >= self.console_min.load(Ordering::SeqCst) {
            level.echo(message);
        }

        if target.file() && self.file_enabled.load(Ordering::SeqCst) {
            let Ok(mut session) = self.session.lock() else {
                return;
            };
            if let Some(file) = session.open() {
                let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "[{timestamp}] {:<5} {message}", level.to_string());
            }
        }
    }

    pub fn debug(&self, message: impl AsRef<str>, target: LogTarget) {
        self.log(LogLevel::Debug, message.as_ref(), target);
    }

    pub fn info(&self, message: impl AsRef<str>, target: LogTarget) {
        self.log(LogLevel::Info, message.as_ref(), target);
    }

    pub fn warn(&self, message: impl AsRef<str>, target: LogTarget) {
        self.log(LogLevel::Warn, message.as_ref(), target);
    }

    /// Lowest level echoed to the console. File output is unfiltered.
    pub fn set_console_level(&self, level: LogLevel) {
        self.console_min.store(level as u8, Ordering::SeqCst);
    }

    pub fn set_file_logging_enabled(&self, enabled: bool) {
        self.file_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Ignored once the session file has been opened.
    pub fn set_log_dir(&self, dir: impl AsRef<Path>) {
        if let Ok(mut session) = self.session.lock() {
            if !session.opened {
                session.dir = dir.as_ref().to_path_buf();
            }
        }
    }

    pub fn file_logging_enabled(&self) -> bool {
        self.file_enabled.load(Ordering::SeqCst)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.session.lock().ok().and_then(|s| s.path.clone())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.log_path();
        f.debug_struct("Logger").field("log_path", &path).finish()
    }
}
