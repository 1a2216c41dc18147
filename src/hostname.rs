use std::io;

use derive_more::Display;

/// `_POSIX_HOST_NAME_MAX`, used when `sysconf` reports no definite limit.
const FALLBACK_HOST_NAME_MAX: usize = 255;

#[derive(Debug, Display)]
pub enum HostnameError {
    #[display("invalid address")]
    InvalidAddress,

    #[display("hostname too long")]
    TooLong,

    #[display("hostname is not valid UTF-8")]
    NotUtf8,

    #[display("{_0}")]
    Os(io::Error),
}

impl From<io::Error> for HostnameError {
    fn from(err: io::Error) -> Self {
        match err.raw_os_error() {
            Some(libc::EFAULT) => HostnameError::InvalidAddress,
            Some(libc::ENAMETOOLONG) => HostnameError::TooLong,
            _ => HostnameError::Os(err),
        }
    }
}

/// Maximum host name length of this platform, without the NUL terminator.
fn host_name_max() -> usize {
    // SAFETY: sysconf has no safety requirements.
    let limit = unsafe { libc::sysconf(libc::_SC_HOST_NAME_MAX) };

    // -1 means either an error or no definite limit.
    usize::try_from(limit)
        .ok()
        .filter(|max| *max > 0)
        .unwrap_or(FALLBACK_HOST_NAME_MAX)
}

/// Returns the configured name of the machine we are running on.
pub fn local_hostname() -> Result<String, HostnameError> {
    let max_len = host_name_max() + 1;
    let mut buf = vec![0u8; max_len];

    // SAFETY: the pointer is derived from a Vec of exactly `max_len` bytes,
    // all of which are writable.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), max_len) };
    if rc == -1 {
        return Err(io::Error::last_os_error().into());
    }

    // POSIX allows a truncated name without a terminator when it does not
    // fit the buffer.
    let Some(nul) = buf.iter().position(|&b| b == 0) else {
        return Err(HostnameError::TooLong);
    };
    buf.truncate(nul);

    String::from_utf8(buf).map_err(|_| HostnameError::NotUtf8)
}
