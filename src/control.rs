//! Remote control
//!
//! Commands mirror the viewer's keyboard and mouse actions. They arrive as
//! text lines on a Unix socket or as MQTT payloads; both sources share the
//! same parser.

use serde::Deserialize;

/// Actions that can be requested remotely
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Move the solid by a screen delta
    Drag { dx: i32, dy: i32 },
    /// Grow (`steps > 0`) or shrink the solid by size steps
    Size { steps: i32 },
    /// Bring the solid nearer (`steps > 0`) or push it away
    Closeness { steps: i32 },
    ToggleMode,
    /// Replace the hull point set; `count` defaults to the configured size
    Regenerate {
        #[serde(default)]
        count: Option<usize>,
    },
    AddPoint { x: i32, y: i32 },
    Clear,
    Quit,
}

/// Parse one plain-text command line.
///
/// Accepted forms (case-insensitive):
/// `drag DX DY`, `size [N]`, `+`, `-`, `closer [N]`, `farther [N]`,
/// `tab`/`mode`, `regenerate [N]`/`r`, `point X Y`, `clear`/`c`, `quit`/`q`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();
    let head = words.next()?;
    let args: Vec<&str> = words.collect();

    let int = |i: usize| args.get(i).and_then(|v| v.parse::<i32>().ok());
    // Optional step count: absent means one step, garbage means no command
    let steps = || match args.first() {
        None => Some(1),
        Some(v) => v.parse::<i32>().ok(),
    };

    match head {
        "drag" | "move" => Some(Command::Drag {
            dx: int(0)?,
            dy: int(1)?,
        }),
        "size" => steps().map(|steps| Command::Size { steps }),
        "+" | "=" | "grow" | "bigger" => Some(Command::Size { steps: 1 }),
        "-" | "shrink" | "smaller" => Some(Command::Size { steps: -1 }),
        "closer" | "]" => steps().map(|steps| Command::Closeness { steps }),
        "farther" | "further" | "[" => steps().map(|steps| Command::Closeness { steps: -steps }),
        "tab" | "mode" | "toggle" => Some(Command::ToggleMode),
        "r" | "regenerate" | "random" => match args.first() {
            None => Some(Command::Regenerate { count: None }),
            Some(v) => v.parse().ok().map(|n| Command::Regenerate { count: Some(n) }),
        },
        "point" | "add" => Some(Command::AddPoint {
            x: int(0)?,
            y: int(1)?,
        }),
        "c" | "clear" => Some(Command::Clear),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

/// Parse a message payload: JSON (`{"cmd": "drag", "dx": 5, "dy": 0}`) first,
/// falling back to a plain-text command.
pub fn parse_message(payload: &str) -> Option<Command> {
    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }
    if payload.starts_with('{') {
        if let Ok(cmd) = serde_json::from_str::<Command>(payload) {
            return Some(cmd);
        }
    }
    parse_command(payload)
}

#[cfg(unix)]
pub use socket::Controller;

#[cfg(unix)]
mod socket {
    use std::io::{BufRead, BufReader};
    use std::os::unix::net::{UnixListener, UnixStream};
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::{parse_message, Command};
    use crate::error::{Error, Result};

    /// Listens for command lines on a Unix socket
    pub struct Controller {
        receiver: Receiver<Command>,
        path: PathBuf,
        shutdown: Arc<AtomicBool>,
        listener_thread: Option<thread::JoinHandle<()>>,
    }

    impl Controller {
        /// Bind the socket at `path`, replacing a stale socket file
        pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref().to_path_buf();
            let _ = std::fs::remove_file(&path);

            let listener = UnixListener::bind(&path).map_err(|e| {
                Error::Socket(format!("failed to bind {}: {}", path.display(), e))
            })?;
            listener
                .set_nonblocking(true)
                .map_err(|e| Error::Socket(format!("failed to set non-blocking: {}", e)))?;

            let (sender, receiver) = mpsc::channel();
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            let handle = thread::spawn(move || {
                Self::listener_loop(listener, sender, &flag);
            });

            Ok(Self {
                receiver,
                path,
                shutdown,
                listener_thread: Some(handle),
            })
        }

        fn listener_loop(listener: UnixListener, sender: Sender<Command>, shutdown: &AtomicBool) {
            while !shutdown.load(Ordering::Relaxed) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let sender = sender.clone();
                        thread::spawn(move || {
                            Self::handle_client(stream, sender);
                        });
                    },
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(50));
                    },
                    Err(_) => break,
                }
            }
        }

        fn handle_client(stream: UnixStream, sender: Sender<Command>) {
            // Accepted streams inherit non-blocking mode on some platforms
            let _ = stream.set_nonblocking(false);
            let reader = BufReader::new(stream);
            for line in reader.lines().map_while(|l| l.ok()) {
                if let Some(cmd) = parse_message(&line) {
                    if sender.send(cmd).is_err() {
                        break;
                    }
                }
            }
        }

        /// Drain pending commands without blocking
        pub fn poll(&self) -> Vec<Command> {
            self.receiver.try_iter().collect()
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Whether the accept loop is still running
        pub fn is_listening(&self) -> bool {
            self.listener_thread
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
        }
    }

    impl Drop for Controller {
        fn drop(&mut self) {
            self.shutdown.store(true, Ordering::Relaxed);
            if let Some(handle) = self.listener_thread.take() {
                let _ = handle.join();
            }
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
