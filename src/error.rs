use derive_more::{Display, From};

use crate::addrinfo::{Family, LookupError};
use crate::hostname::HostnameError;

/// Exit status for a failure to read the local host name (`EX_OSERR`).
pub const EXIT_OS_ERROR: i32 = 71;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    #[display("gethostname: {_0}")]
    Hostname(HostnameError),

    #[display("getaddrinfo: {_0}")]
    Lookup(LookupError),

    #[display("{_0}")]
    Io(std::io::Error),

    #[from(ignore)]
    #[display("expected an {wanted} address for `{host}', got {got}")]
    FamilyMismatch {
        host: String,
        wanted: Family,
        got: Family,
    },

    #[from(ignore)]
    #[display("no address returned for `{_0}'")]
    NoAddress(String),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Hostname(_) => EXIT_OS_ERROR,
            _ => 1,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}
