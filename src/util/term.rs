use std::io::{self, Read};
use std::process::Command;

/// Restores the saved terminal attributes when dropped, so raw mode is
/// unwound on every exit path, including errors.
#[cfg(unix)]
struct RawModeGuard {
    original: libc::termios,
}

#[cfg(unix)]
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &self.original);
        }
    }
}

/// Reads one byte from the controlling terminal in raw (uncooked,
/// unechoed) mode.
///
/// The terminal attributes are restored before returning. A received
/// Ctrl-C (byte 3) re-raises `SIGINT` on the host, after restoration.
///
/// # Errors
/// Any `io::Error` from querying or switching terminal attributes, or
/// from the read itself.
#[cfg(unix)]
pub fn read_key() -> io::Result<u8> {
    let mut original = unsafe { std::mem::zeroed::<libc::termios>() };
    if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &mut original) } != 0 {
        return Err(io::Error::last_os_error());
    }

    let guard = RawModeGuard { original };

    let mut uncooked = guard.original;
    uncooked.c_lflag &= !(libc::ICANON | libc::ECHO);
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &uncooked) } != 0 {
        return Err(io::Error::last_os_error());
    }

    let mut buffer = [0u8; 1];
    io::stdin().read_exact(&mut buffer)?;
    drop(guard);

    if buffer[0] == 3 {
        unsafe {
            libc::raise(libc::SIGINT);
        }
    }

    Ok(buffer[0])
}

/// Cooked-mode fallback for hosts without termios.
#[cfg(not(unix))]
pub fn read_key() -> io::Result<u8> {
    let mut buffer = [0u8; 1];
    io::stdin().read_exact(&mut buffer)?;
    Ok(buffer[0])
}

/// Invokes the host terminal-clear command.
///
/// # Errors
/// Any `io::Error` from spawning the command.
pub fn clear_screen() -> io::Result<()> {
    #[cfg(unix)]
    Command::new("clear").status()?;
    #[cfg(not(unix))]
    Command::new("cmd").args(["/C", "cls"]).status()?;
    Ok(())
}
