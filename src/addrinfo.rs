use std::ffi::{CStr, CString};
use std::io;
use std::marker::PhantomData;
use std::mem;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::ptr;

use derive_more::Display;

/// Address family a lookup is restricted to.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, clap::ValueEnum)]
pub enum Family {
    /// Both IPv4 and IPv6
    #[default]
    #[display("any")]
    Any,
    #[display("IPv4")]
    Ipv4,
    #[display("IPv6")]
    Ipv6,
}

impl Family {
    fn as_raw(self) -> libc::c_int {
        match self {
            Family::Any => libc::AF_UNSPEC,
            Family::Ipv4 => libc::AF_INET,
            Family::Ipv6 => libc::AF_INET6,
        }
    }
}

/// Constraints passed along with a lookup. Socket type and protocol are
/// fixed to TCP streams, so each address shows up once.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hints {
    pub family: Family,
}

impl Hints {
    pub fn new(family: Family) -> Self {
        Self { family }
    }

    fn to_raw(self) -> libc::addrinfo {
        // SAFETY: addrinfo is a plain C struct, all zeroes is its documented
        // "no constraints" state.
        let mut raw: libc::addrinfo = unsafe { mem::zeroed() };
        raw.ai_family = self.family.as_raw();
        raw.ai_socktype = libc::SOCK_STREAM;
        raw.ai_protocol = libc::IPPROTO_TCP;
        raw.ai_flags = 0;
        raw
    }
}

/// A single resolved address, tagged by family.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Address {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl Address {
    pub fn family(&self) -> Family {
        match self {
            Address::V4(_) => Family::Ipv4,
            Address::V6(_) => Family::Ipv6,
        }
    }

    /// # Safety
    ///
    /// `sa` must be null or point to at least `len` readable bytes.
    unsafe fn from_sockaddr(sa: *const libc::sockaddr, len: libc::socklen_t) -> Option<Self> {
        if sa.is_null() {
            return None;
        }

        let len = len as usize;
        match unsafe { (*sa).sa_family } as libc::c_int {
            libc::AF_INET if len >= mem::size_of::<libc::sockaddr_in>() => {
                let sin = unsafe { ptr::read_unaligned(sa.cast::<libc::sockaddr_in>()) };
                // s_addr is in network byte order
                Some(Address::V4(Ipv4Addr::from(sin.sin_addr.s_addr.to_ne_bytes())))
            }
            libc::AF_INET6 if len >= mem::size_of::<libc::sockaddr_in6>() => {
                let sin6 = unsafe { ptr::read_unaligned(sa.cast::<libc::sockaddr_in6>()) };
                Some(Address::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr)))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::V4(addr) => write!(f, "IPv4 {addr}"),
            Address::V6(addr) => write!(f, "IPv6 {addr}"),
        }
    }
}

#[derive(Debug, Display)]
pub enum LookupError {
    /// Resolver failure, rendered with `gai_strerror`.
    #[display("{}", gai_strerror(*_0))]
    Resolver(libc::c_int),

    /// `EAI_SYSTEM`, the cause lives in errno.
    #[display("{_0}")]
    System(io::Error),

    #[display("host name contains a NUL byte")]
    InvalidHost,
}

impl LookupError {
    fn from_code(code: libc::c_int) -> Self {
        if code == libc::EAI_SYSTEM {
            LookupError::System(io::Error::last_os_error())
        } else {
            LookupError::Resolver(code)
        }
    }
}

fn gai_strerror(code: libc::c_int) -> String {
    // SAFETY: gai_strerror returns a pointer to a static, NUL terminated
    // string for any input.
    let msg = unsafe { libc::gai_strerror(code) };
    if msg.is_null() {
        return format!("unknown error {code}");
    }

    unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}

/// Result chain allocated by `getaddrinfo`.
///
/// The whole chain is released with a single `freeaddrinfo` when the list
/// is dropped, so every exit path after a successful lookup frees it exactly
/// once and no entry can be reached afterwards.
#[derive(Debug)]
pub struct AddrInfoList {
    head: *mut libc::addrinfo,
}

impl AddrInfoList {
    /// Blocks until the system resolver answers. Timeouts and retries are
    /// whatever the platform resolver does.
    pub fn lookup(host: &str, hints: &Hints) -> Result<Self, LookupError> {
        let host = CString::new(host).map_err(|_| LookupError::InvalidHost)?;
        let hints = hints.to_raw();
        let mut head = ptr::null_mut();

        // SAFETY: host and hints outlive the call, head is a valid out
        // pointer and is only written on success.
        let rc = unsafe { libc::getaddrinfo(host.as_ptr(), ptr::null(), &hints, &mut head) };
        if rc != 0 {
            return Err(LookupError::from_code(rc));
        }

        Ok(Self { head })
    }

    /// Addresses in the order the resolver returned them. Entries of other
    /// families are skipped.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head,
            _list: PhantomData,
        }
    }
}

impl Drop for AddrInfoList {
    fn drop(&mut self) {
        if !self.head.is_null() {
            // SAFETY: head came from a successful getaddrinfo and is freed
            // only here.
            unsafe { libc::freeaddrinfo(self.head) };
        }
    }
}

impl<'a> IntoIterator for &'a AddrInfoList {
    type Item = Address;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a> {
    next: *const libc::addrinfo,
    _list: PhantomData<&'a AddrInfoList>,
}

impl Iterator for Iter<'_> {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        // SAFETY: every node of the chain stays alive as long as the list
        // this iterator borrows.
        while let Some(node) = unsafe { self.next.as_ref() } {
            self.next = node.ai_next;

            if let Some(addr) = unsafe { Address::from_sockaddr(node.ai_addr, node.ai_addrlen) } {
                return Some(addr);
            }
        }

        None
    }
}
