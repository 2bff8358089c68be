/*
 * terminal.rs
 *
 * tty plumbing: raw mode on stdin and unbuffered writes to stdout.
 *
 * Raw here means ICANON and ECHO off, one byte per read. ISIG stays on so
 * ctrl-c still arrives as SIGINT. The guard puts the old termios back on
 * drop; main keeps it alive until right before process::exit.
 *
 * Writes go straight to write(2). std's stdout is line buffered and the
 * live display never ends a line, so it would sit in the buffer. One
 * frame = one syscall also keeps the clear sequence and the text together.
 */

use std::io::{self, Write};
use std::mem::MaybeUninit;
use std::os::fd::RawFd;

use crate::error::{Result, TimerError};

pub const STDIN: RawFd = libc::STDIN_FILENO;
pub(crate) const STDOUT: RawFd = libc::STDOUT_FILENO;

/// Erase the whole current line, then return the cursor to column 0.
pub const CLEAR_LINE: &str = "\x1b[2K\r";

#[inline]
#[must_use]
pub fn is_tty(fd: RawFd) -> bool {
    // SAFETY: isatty only inspects the descriptor, any value is fine
    unsafe { libc::isatty(fd) == 1 }
}

/// Restores the saved terminal settings on drop.
pub struct RawMode {
    fd: RawFd,
    saved: libc::termios,
}

impl std::fmt::Debug for RawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawMode").field("fd", &self.fd).finish_non_exhaustive()
    }
}

impl RawMode {
    /// Switch `fd` to non-canonical, no-echo input.
    ///
    /// Returns `Ok(None)` when `fd` is not a terminal; there is nothing to
    /// switch and keys are read from the pipe as-is.
    ///
    /// # Errors
    ///
    /// `Terminal` if tcgetattr/tcsetattr fail on an actual tty.
    pub fn enable(fd: RawFd) -> Result<Option<Self>> {
        if !is_tty(fd) {
            return Ok(None);
        }

        let mut saved = MaybeUninit::<libc::termios>::uninit();
        // SAFETY: saved points to writable storage sized for a termios
        if unsafe { libc::tcgetattr(fd, saved.as_mut_ptr()) } != 0 {
            return Err(TimerError::Terminal(io::Error::last_os_error()));
        }
        // SAFETY: tcgetattr returned 0, so it filled in every field
        let saved = unsafe { saved.assume_init() };

        let mut keys = saved;
        keys.c_lflag &= !(libc::ICANON | libc::ECHO);
        keys.c_cc[libc::VMIN] = 1;
        keys.c_cc[libc::VTIME] = 0;

        // SAFETY: keys is a fully initialized termios copied from tcgetattr
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw const keys) } != 0 {
            return Err(TimerError::Terminal(io::Error::last_os_error()));
        }

        Ok(Some(Self { fd, saved }))
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        /* nothing useful to do on failure, we are on the way out */
        // SAFETY: saved came from tcgetattr on the same fd
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSANOW, &raw const self.saved);
        }
    }
}

/// Unbuffered writer for a raw file descriptor.
#[derive(Debug, Clone, Copy)]
pub struct TtyWriter {
    fd: RawFd,
}

impl TtyWriter {
    #[must_use]
    pub const fn stdout() -> Self {
        Self { fd: STDOUT }
    }
}

impl Write for TtyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        loop {
            // SAFETY: buf is a valid byte slice for buf.len() bytes
            let n = unsafe { libc::write(self.fd, buf.as_ptr().cast(), buf.len()) };
            /* negative means -1 and errno is set */
            if let Ok(written) = usize::try_from(n) {
                return Ok(written);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    /* master and slave ends of a fresh pseudo terminal */
    fn open_pty() -> (RawFd, RawFd) {
        // SAFETY: posix_openpt only takes flags
        let master = unsafe { libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY) };
        assert!(master >= 0, "posix_openpt: {}", io::Error::last_os_error());
        // SAFETY: master is an open pty master
        assert_eq!(unsafe { libc::grantpt(master) }, 0);
        // SAFETY: master is an open pty master
        assert_eq!(unsafe { libc::unlockpt(master) }, 0);

        // SAFETY: master is an unlocked pty master
        let name = unsafe { libc::ptsname(master) };
        assert!(!name.is_null());
        // SAFETY: ptsname returned a NUL-terminated path, copied before any other call
        let name = unsafe { CStr::from_ptr(name) }.to_owned();

        // SAFETY: name is a valid C string
        let slave = unsafe { libc::open(name.as_ptr(), libc::O_RDWR | libc::O_NOCTTY) };
        assert!(slave >= 0, "open slave: {}", io::Error::last_os_error());
        (master, slave)
    }

    fn termios_of(fd: RawFd) -> libc::termios {
        let mut t = MaybeUninit::<libc::termios>::uninit();
        // SAFETY: t is writable storage for one termios
        assert_eq!(unsafe { libc::tcgetattr(fd, t.as_mut_ptr()) }, 0);
        // SAFETY: tcgetattr succeeded and filled it in
        unsafe { t.assume_init() }
    }

    #[test]
    fn test_raw_mode_round_trip_on_pty() {
        let (master, slave) = open_pty();
        assert!(is_tty(slave));

        let before = termios_of(slave);
        assert_ne!(before.c_lflag & libc::ECHO, 0, "pty should start with echo");
        assert_ne!(before.c_lflag & libc::ICANON, 0, "pty should start canonical");

        let guard = RawMode::enable(slave).unwrap().expect("pty is a tty");
        let during = termios_of(slave);
        assert_eq!(during.c_lflag & (libc::ICANON | libc::ECHO), 0);
        /* ctrl-c must keep working */
        assert_ne!(during.c_lflag & libc::ISIG, 0);
        assert_eq!(during.c_cc[libc::VMIN], 1);
        assert_eq!(during.c_cc[libc::VTIME], 0);

        drop(guard);
        let after = termios_of(slave);
        assert_eq!(after.c_lflag, before.c_lflag);
        assert_eq!(after.c_cc[libc::VMIN], before.c_cc[libc::VMIN]);

        for fd in [slave, master] {
            // SAFETY: fd was opened above and is closed exactly once
            unsafe { libc::close(fd) };
        }
    }

    #[test]
    fn test_raw_mode_skips_non_tty() {
        /* a pipe is never a terminal */
        let mut fds = [0 as RawFd; 2];
        // SAFETY: fds has room for the two descriptors pipe() writes
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);

        assert!(!is_tty(fds[0]));
        assert!(RawMode::enable(fds[0]).unwrap().is_none());

        for fd in fds {
            // SAFETY: fd came from pipe() above and is closed exactly once
            unsafe { libc::close(fd) };
        }
    }

    #[test]
    fn test_tty_writer_writes_through() {
        let mut fds = [0 as RawFd; 2];
        // SAFETY: fds has room for the two descriptors pipe() writes
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);

        let mut w = TtyWriter { fd: fds[1] };
        w.write_all(b"0\xe6\x97\xa5 00:00:05").unwrap();

        let mut buf = [0u8; 32];
        // SAFETY: buf is writable for buf.len() bytes
        let n = unsafe { libc::read(fds[0], buf.as_mut_ptr().cast(), buf.len()) };
        assert_eq!(&buf[..usize::try_from(n).unwrap()], "0日 00:00:05".as_bytes());

        for fd in fds {
            // SAFETY: fd came from pipe() above and is closed exactly once
            unsafe { libc::close(fd) };
        }
    }

    #[test]
    fn test_writer_reports_bad_fd() {
        let mut w = TtyWriter { fd: -1 };
        assert!(w.write(b"x").is_err());
    }
}
