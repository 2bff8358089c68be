/*
 * input.rs
 *
 * Single-key commands. One byte in, maybe one command out.
 *
 *   p      pause
 *   r      resume
 *   s / q  stop
 *   d      print remaining time once
 *
 * Everything else is dropped on the floor, including the tail of escape
 * sequences from arrow keys. Case sensitive on purpose: 'P' does nothing.
 *
 * KeySource is the seam between the loop and the fd so tests can script
 * keystrokes without a tty.
 */

use std::io;
use std::ops::ControlFlow;
use std::os::fd::RawFd;

use crate::terminal::STDIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    Stop,
    ShowRemaining,
}

impl Command {
    /// Map a raw byte to its command, `None` for everything unbound.
    #[must_use]
    pub const fn from_key(key: u8) -> Option<Self> {
        match key {
            b'p' => Some(Self::Pause),
            b'r' => Some(Self::Resume),
            b's' | b'q' => Some(Self::Stop),
            b'd' => Some(Self::ShowRemaining),
            _ => None,
        }
    }
}

/// Where keystrokes come from.
pub trait KeySource {
    /// Block until the next byte. `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Any read error other than EINTR, which implementations retry.
    fn next_key(&mut self) -> io::Result<Option<u8>>;
}

/// Blocking one-byte reads straight off a descriptor.
///
/// Works the same on a raw tty and on a pipe; raw mode is the caller's job.
#[derive(Debug, Clone, Copy)]
pub struct TtyKeys {
    fd: RawFd,
}

impl TtyKeys {
    #[must_use]
    pub const fn stdin() -> Self {
        Self { fd: STDIN }
    }

    #[cfg(test)]
    pub(crate) const fn from_fd(fd: RawFd) -> Self {
        Self { fd }
    }
}

impl KeySource for TtyKeys {
    fn next_key(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        loop {
            // SAFETY: byte is a valid, writable 1-byte buffer
            let n = unsafe { libc::read(self.fd, (&raw mut byte).cast(), 1) };
            match n {
                1 => return Ok(Some(byte)),
                0 => return Ok(None),
                _ => {
                    let err = io::Error::last_os_error();
                    if err.kind() != io::ErrorKind::Interrupted {
                        return Err(err);
                    }
                }
            }
        }
    }
}

/// Read keys until EOF or until `on_command` breaks.
///
/// Unbound keys never reach `on_command`.
///
/// # Errors
///
/// Whatever the key source reports.
pub fn read_commands<K, F>(keys: &mut K, mut on_command: F) -> io::Result<()>
where
    K: KeySource + ?Sized,
    F: FnMut(Command) -> ControlFlow<()>,
{
    while let Some(key) = keys.next_key()? {
        let Some(command) = Command::from_key(key) else {
            continue;
        };
        if on_command(command).is_break() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Bytes(VecDeque<u8>);

    impl KeySource for Bytes {
        fn next_key(&mut self) -> io::Result<Option<u8>> {
            Ok(self.0.pop_front())
        }
    }

    struct Broken;

    impl KeySource for Broken {
        fn next_key(&mut self) -> io::Result<Option<u8>> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    fn commands_for(input: &[u8]) -> Vec<Command> {
        let mut keys = Bytes(input.iter().copied().collect());
        let mut seen = Vec::new();
        read_commands(&mut keys, |c| {
            seen.push(c);
            ControlFlow::Continue(())
        })
        .unwrap();
        seen
    }

    #[test]
    fn test_key_map() {
        assert_eq!(Command::from_key(b'p'), Some(Command::Pause));
        assert_eq!(Command::from_key(b'r'), Some(Command::Resume));
        assert_eq!(Command::from_key(b's'), Some(Command::Stop));
        assert_eq!(Command::from_key(b'q'), Some(Command::Stop));
        assert_eq!(Command::from_key(b'd'), Some(Command::ShowRemaining));
    }

    #[test]
    fn test_unbound_keys_ignored() {
        for key in [b'P', b'x', b' ', b'\n', 0x1b, b'[', b'A', 0x03] {
            assert_eq!(Command::from_key(key), None, "key {key:#x}");
        }
        /* an up-arrow between two commands changes nothing */
        assert_eq!(
            commands_for(b"p\x1b[Ar"),
            vec![Command::Pause, Command::Resume]
        );
    }

    #[test]
    fn test_stops_at_eof() {
        assert!(commands_for(b"").is_empty());
        assert_eq!(commands_for(b"d"), vec![Command::ShowRemaining]);
    }

    #[test]
    fn test_break_stops_reading() {
        let mut keys = Bytes(b"pqd".iter().copied().collect());
        let mut seen = Vec::new();
        read_commands(&mut keys, |c| {
            seen.push(c);
            if c == Command::Stop {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

        assert_eq!(seen, vec![Command::Pause, Command::Stop]);
        /* 'd' still unread */
        assert_eq!(keys.0.len(), 1);
    }

    #[test]
    fn test_read_error_propagates() {
        let result = read_commands(&mut Broken, |_| ControlFlow::Continue(()));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_tty_keys_reads_pipe_bytes() {
        let mut fds = [0 as RawFd; 2];
        // SAFETY: fds has room for the two descriptors pipe() writes
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);

        // SAFETY: writing 2 bytes from a static buffer to our own pipe
        let written = unsafe { libc::write(fds[1], b"pd".as_ptr().cast(), 2) };
        assert_eq!(written, 2);
        // SAFETY: write end closed once, reader then sees EOF
        unsafe { libc::close(fds[1]) };

        let mut keys = TtyKeys::from_fd(fds[0]);
        assert_eq!(keys.next_key().unwrap(), Some(b'p'));
        assert_eq!(keys.next_key().unwrap(), Some(b'd'));
        assert_eq!(keys.next_key().unwrap(), None);

        // SAFETY: read end closed exactly once
        unsafe { libc::close(fds[0]) };
    }
}
