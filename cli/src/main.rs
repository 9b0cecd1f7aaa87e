use std::time::Duration;

use labctl_cmdline::{CmdlineError, CommandLine, OptionSpec, OptionTable, ProgramInfo, Validator};
use labctl_transport::{Instrument, SocketInstrument, TransportError};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const PROGRAM_NAME: &str = "scpi-query";
const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_RESOURCE: &str = "TCPIP0::127.0.0.1::5025::SOCKET";
const DEFAULT_COMMAND: &str = "*IDN?";

/// Failure of a host run, reported once in `main`.
#[derive(Debug, thiserror::Error)]
enum HostError {
    #[error("Command line error: {0}")]
    Cmdline(#[from] CmdlineError),

    #[error("error: {0}")]
    Transport(#[from] TransportError),
}

/// Settings read from the command line.
#[derive(Debug)]
struct Settings {
    resource: String,
    timeout: Duration,
    buffer_size: usize,
    debug: bool,
    commands: Vec<String>,
}

fn option_table() -> OptionTable {
    OptionTable::new(
        ProgramInfo::new(PROGRAM_NAME, PACKAGE_VERSION)
            .with_description("Send SCPI commands to an instrument and print the responses"),
    )
    .with_option(
        OptionSpec::new("Instrument resource descriptor", "resource", "r")
            .with_default(DEFAULT_RESOURCE),
    )
    .with_option(OptionSpec::new("Read timeout in ms", "timeout", "t").with_default("2000"))
    .with_option(OptionSpec::new("Read buffer size in bytes", "buffer", "b").with_default("1024"))
    .with_option(OptionSpec::new("Log protocol traffic", "debug", "d"))
}

fn settings(cl: &CommandLine) -> Result<Settings, CmdlineError> {
    let timeout = cl.get_uint("--timeout", &Validator::range(1, 600_000))?;
    let buffer_size = cl.get_uint("--buffer", &Validator::range(1, 1_048_576))?;
    let mut commands = cl.free_arguments().to_vec();
    if commands.is_empty() {
        commands.push(DEFAULT_COMMAND.to_string());
    }
    Ok(Settings {
        resource: cl.get("--resource", &Validator::default())?.to_string(),
        timeout: Duration::from_millis(timeout),
        buffer_size: usize::try_from(buffer_size).unwrap_or(usize::MAX),
        debug: cl.is_defined("--debug")?,
        commands,
    })
}

/// Installs the stderr subscriber, filtered by `RUST_LOG` (default `warn`).
///
/// The returned closure replaces the filter once `--debug` is known.
fn init_logging() -> impl Fn(&str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_filter_reloading();
    let handle = builder.reload_handle();
    builder.init();

    move |directives: &str| {
        if let Err(err) = handle.reload(EnvFilter::new(directives)) {
            warn!(error = %err, "Cannot change log filter");
        }
    }
}

fn run() -> Result<(), HostError> {
    let set_log_filter = init_logging();

    let mut cl = CommandLine::from_env();
    cl.define_and_parse(&option_table())?;

    if cl.is_defined("--help")? {
        println!("Command line options:");
        print!("{}", cl.help_text());
        return Ok(());
    }
    if cl.is_defined("--version")? {
        println!("{}", cl.version_text());
        return Ok(());
    }

    let settings = settings(&cl)?;
    if settings.debug {
        set_log_filter("debug");
    }
    debug!(?settings, "Starting session");

    let mut instrument = SocketInstrument::new();
    instrument.open(&settings.resource)?;
    for command in &settings.commands {
        if command.contains('?') {
            let response = instrument.query_with(command, settings.buffer_size, settings.timeout)?;
            println!("{response}");
        } else {
            instrument.write(command)?;
        }
    }
    instrument.close()?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
