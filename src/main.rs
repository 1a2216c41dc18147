use std::env;
use std::io::{self, Write};
use std::process;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::addrinfo::Family;
use crate::hostname::local_hostname;
use crate::resolver::resolve;

mod addrinfo;
mod error;
mod hostname;
mod resolver;

pub use self::error::{Error, Result};

/// Resolve a host name with the system resolver.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address family to resolve, `any` lists every address found
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = Family::Any,
        env = "RESOLVE_FAMILY"
    )]
    family: Family,

    /// Same as `--family ipv4`
    #[arg(short = '4', conflicts_with = "ipv6")]
    ipv4: bool,

    /// Same as `--family ipv6`
    #[arg(short = '6')]
    ipv6: bool,

    /// Log more details to stderr, may be repeated
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Host name to resolve
    hostname: String,
}

impl Cli {
    fn family(&self) -> Family {
        if self.ipv4 {
            Family::Ipv4
        } else if self.ipv6 {
            Family::Ipv6
        } else {
            self.family
        }
    }
}

fn usage() -> ! {
    let program = env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    eprintln!("Usage: {program} <hostname>");
    process::exit(1);
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let local = local_hostname()?;
    let family = cli.family();
    debug!(message = "Local host name", %local, %family);

    let mut out = io::stdout().lock();
    writeln!(out, "Resolving `{}' from `{}':", cli.hostname, local)?;
    resolve(&mut out, &cli.hostname, family)?;
    out.flush()?;

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => usage(),
        },
    };

    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("{err}");
        process::exit(err.exit_code());
    }
}
