use std::io::Write;

use tracing::{debug, warn};

use crate::addrinfo::{AddrInfoList, Address, Family, Hints};
use crate::{Error, Result};

/// Upper bound on printed entries, guards against runaway result chains.
/// Hitting it truncates the output, it is not an error.
pub const MAX_ENTRIES: usize = 100;

/// Writes the lookup result for `target` in the style selected by `family`.
///
/// `Family::Any` lists every address tagged with its family. A single
/// family prints only the first address, which must be of that family.
pub fn report<W, I>(out: &mut W, target: &str, addrs: I, family: Family) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = Address>,
{
    let mut addrs = addrs.into_iter();

    match family {
        Family::Any => {
            let mut printed = 0;
            for addr in addrs {
                if printed == MAX_ENTRIES {
                    warn!(
                        message = "Result list truncated",
                        host = target,
                        limit = MAX_ENTRIES
                    );
                    break;
                }

                debug!(message = "Resolved", %addr);
                writeln!(out, "{addr}")?;
                printed += 1;
            }
        }
        Family::Ipv4 | Family::Ipv6 => {
            let addr = addrs
                .next()
                .ok_or_else(|| Error::NoAddress(target.to_string()))?;
            if addr.family() != family {
                return Err(Error::FamilyMismatch {
                    host: target.to_string(),
                    wanted: family,
                    got: addr.family(),
                });
            }

            debug!(message = "Resolved", %addr);
            match addr {
                Address::V4(ip) => writeln!(out, "{target} has address {ip}")?,
                Address::V6(ip) => writeln!(out, "{target} has IPv6 address {ip}")?,
            }
        }
    }

    Ok(())
}

/// Looks `target` up with the system resolver and reports the result.
pub fn resolve<W: Write>(out: &mut W, target: &str, family: Family) -> Result<()> {
    let hints = Hints::new(family);
    debug!(message = "Looking up", host = target, ?hints);

    let list = AddrInfoList::lookup(target, &hints)?;
    report(out, target, &list, family)
}
