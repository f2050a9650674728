use anyhow::Result;
use std::io::{self, Write};
use std::process;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use std::thread;

// Cross-platform signal handling
#[cfg(unix)]
use signal_hook::{consts::SIGINT, consts::SIGTERM, iterator::Signals};

#[cfg(windows)]
use signal_hook::{consts::SIGINT, flag};

/// Standard Unix exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
    SignalInt = 130,  // 128 + SIGINT (2)
    SignalPipe = 141, // 128 + SIGPIPE (13)
    SignalTerm = 143, // 128 + SIGTERM (15)
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

/// Shared, cooperative stop request. Cloning yields a handle to the same
/// flag; once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Signal handler that turns the first SIGINT/SIGTERM into a cancellation
/// request and exits immediately on the second.
pub struct SignalHandler {
    last_signal: Arc<AtomicI32>,
    _handle: thread::JoinHandle<()>,
}

impl SignalHandler {
    pub fn new(cancel: CancellationToken) -> Result<Self> {
        let last_signal = Arc::new(AtomicI32::new(0));

        #[cfg(unix)]
        {
            let mut signals = Signals::new([SIGINT, SIGTERM])?;
            let seen = Arc::clone(&last_signal);

            let handle = thread::spawn(move || {
                let mut shutdown_count = 0;
                for sig in signals.forever() {
                    seen.store(sig, Ordering::SeqCst);
                    shutdown_count += 1;
                    let exit_code = if sig == SIGTERM {
                        ExitCode::SignalTerm
                    } else {
                        ExitCode::SignalInt
                    };
                    if shutdown_count > 1 {
                        exit_code.exit();
                    }
                    tracing::warn!(signal = sig, "received signal, stopping after the current record");
                    cancel.cancel();
                }
            });

            Ok(SignalHandler {
                last_signal,
                _handle: handle,
            })
        }

        #[cfg(windows)]
        {
            let term_flag = Arc::new(AtomicBool::new(false));
            flag::register(SIGINT, Arc::clone(&term_flag))?;
            let seen = Arc::clone(&last_signal);

            let handle = thread::spawn(move || {
                let mut shutdown_count = 0;
                loop {
                    thread::sleep(std::time::Duration::from_millis(100));
                    if term_flag.swap(false, Ordering::SeqCst) {
                        seen.store(SIGINT, Ordering::SeqCst);
                        shutdown_count += 1;
                        if shutdown_count > 1 {
                            ExitCode::SignalInt.exit();
                        }
                        cancel.cancel();
                    }
                }
            });

            Ok(SignalHandler {
                last_signal,
                _handle: handle,
            })
        }
    }

    /// Exit code matching the signal that requested cancellation.
    pub fn exit_code(&self) -> ExitCode {
        match self.last_signal.load(Ordering::SeqCst) {
            #[cfg(unix)]
            SIGTERM => ExitCode::SignalTerm,
            _ => ExitCode::SignalInt,
        }
    }
}

/// Safe wrapper for writing to stdout that handles broken pipes and other I/O errors
pub struct SafeStdout {
    stdout: io::Stdout,
}

impl Default for SafeStdout {
    fn default() -> Self {
        Self::new()
    }
}

impl SafeStdout {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }

    /// Write text to stdout, exiting quietly when the reader went away.
    pub fn write_str(&mut self, data: &str) -> Result<()> {
        let mut lock = self.stdout.lock();
        match lock.write_all(data.as_bytes()).and_then(|_| lock.flush()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SignalPipe.exit(),
            Err(e) => Err(anyhow::anyhow!("Failed to write to stdout: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success as i32, 0);
        assert_eq!(ExitCode::SignalInt as i32, 130);
        assert_eq!(ExitCode::SignalTerm as i32, 143);
    }
}
