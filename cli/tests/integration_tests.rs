use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::process::{Command, Output};
use std::sync::mpsc::{self, Receiver};
use std::thread;

fn scpi_query(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scpi-query"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run scpi-query")
}

fn scpi_query_with_log(args: &[&str], directives: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scpi-query"))
        .args(args)
        .env("RUST_LOG", directives)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run scpi-query")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Fake instrument answering `*IDN?` and `MEAS?`, forwarding every received
/// line on the returned channel.
fn fake_instrument() -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept failed");
        let mut writer = stream.try_clone().expect("clone failed");
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            let reply = match line.as_str() {
                "*IDN?" => Some("ACME Instruments,DMM-9000,SN0042,1.07\n"),
                "MEAS?" => Some("+4.200E-01\n"),
                _ => None,
            };
            if let Some(reply) = reply {
                writer.write_all(reply.as_bytes()).expect("write failed");
            }
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    (format!("TCPIP0::127.0.0.1::{port}::SOCKET"), rx)
}

#[test]
fn help_lists_options_and_exits_zero() {
    for flag in ["--help", "-h"] {
        let output = scpi_query(&[flag]);
        assert!(output.status.success(), "{flag} should succeed");

        let text = stdout(&output);
        assert!(text.starts_with("Command line options:\n"), "{text}");
        assert!(text.contains("--help, -h : Print this text\n"), "{text}");
        assert!(text.contains("--resource, -r : Instrument resource descriptor\n"), "{text}");
        assert!(text.contains("--debug, -d : Log protocol traffic\n"), "{text}");
    }
}

#[test]
fn version_prints_program_metadata() {
    let output = scpi_query(&["-v"]);
    assert!(output.status.success());
    assert!(
        stdout(&output).starts_with(&format!("scpi-query version {}\n", env!("CARGO_PKG_VERSION"))),
        "{}",
        stdout(&output)
    );
}

#[test]
fn rust_log_shows_engine_events() {
    let output = scpi_query_with_log(&["-v"], "labctl_cmdline=debug");
    assert!(output.status.success());

    let log = stderr(&output);
    assert!(log.contains("Registered flag"), "{log}");
    assert!(log.contains("Parsed command line"), "{log}");
}

#[test]
fn default_log_level_is_quiet() {
    let output = scpi_query(&["-v"]);
    assert!(output.status.success());
    assert_eq!(stderr(&output), "");
}

#[test]
fn debug_flag_logs_protocol_traffic() {
    let (resource, _received) = fake_instrument();

    let output = scpi_query(&["-d", "-r", &resource, "MEAS?"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "+4.200E-01\n");

    let log = stderr(&output);
    assert!(log.contains("Opened socket session"), "{log}");
    assert!(log.contains("MEAS?"), "{log}");
}

#[test]
fn bare_dash_is_a_command_line_error() {
    let output = scpi_query(&["*IDN?", "-"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output).trim_end(),
        "Command line error: Invalid short option \"-\"."
    );
}

#[test]
fn unknown_flag_is_a_command_line_error() {
    let output = scpi_query(&["--frequency", "10"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output).trim_end(),
        "Command line error: Unknown command line flag \"--frequency\"."
    );
}

#[test]
fn missing_flag_argument_is_reported() {
    let output = scpi_query(&["-r"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("Flag \"-r\" requires one argument. None given."),
        "{}",
        stderr(&output)
    );
}

#[test]
fn timeout_out_of_range_is_rejected() {
    let output = scpi_query(&["--timeout", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output).trim_end(),
        "Command line error: Argument of flag \"--timeout\": 0 out of range [1, 600000]"
    );
}

#[test]
fn unsupported_resource_exits_one() {
    let output = scpi_query(&["-r", "GPIB0::12::INSTR"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: "), "{}", stderr(&output));
}

#[test]
fn default_command_queries_identity() {
    let (resource, received) = fake_instrument();

    let output = scpi_query(&["-r", &resource]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "ACME Instruments,DMM-9000,SN0042,1.07\n");

    let lines: Vec<String> = received.iter().collect();
    assert_eq!(lines, ["*IDN?"]);
}

#[test]
fn commands_are_written_and_queried_in_order() {
    let (resource, received) = fake_instrument();

    let output = scpi_query(&["--resource", &resource, "-t", "5000", "*RST", "CONF:VOLT", "MEAS?"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "+4.200E-01\n");

    let lines: Vec<String> = received.iter().collect();
    assert_eq!(lines, ["*RST", "CONF:VOLT", "MEAS?"]);
}
