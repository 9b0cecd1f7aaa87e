use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use labctl_transport::{
    Instrument, SocketInstrument, TransportError, VI_ERROR_TMO, open_by_identity,
};

// ---- helpers ----

/// Fake SCPI instrument answering one connection.
///
/// Every received line is forwarded on the returned channel. Queries listed
/// in `answers` get the paired reply; everything else gets no reply.
fn fake_instrument(answers: &'static [(&'static str, &'static str)]) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            if let Some((_, reply)) = answers.iter().find(|(query, _)| *query == line) {
                writer.write_all(reply.as_bytes()).unwrap();
                writer.flush().unwrap();
            }
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    (format!("TCPIP0::127.0.0.1::{port}::SOCKET"), rx)
}

const IDN: &str = "ACME Instruments,DMM-9000,SN0042,1.07\n";

// ---- sessions ----

#[test]
fn query_returns_trimmed_response() {
    let (resource, received) = fake_instrument(&[("*IDN?", IDN), ("MEAS:VOLT?", "+1.234E+00\r\n")]);

    let mut dmm = SocketInstrument::new();
    dmm.open(&resource).unwrap();
    assert!(dmm.is_open());
    assert_eq!(dmm.descriptor().unwrap().to_string(), resource);

    assert_eq!(dmm.query("*IDN?").unwrap(), IDN.trim());
    dmm.write("CONF:VOLT:DC 10").unwrap();
    assert_eq!(dmm.query("MEAS:VOLT?").unwrap(), "+1.234E+00");
    dmm.close().unwrap();
    assert!(!dmm.is_open());

    let lines: Vec<String> = received.iter().collect();
    assert_eq!(lines, ["*IDN?", "CONF:VOLT:DC 10", "MEAS:VOLT?"]);
}

#[test]
fn read_stops_at_buffer_size_and_keeps_rest() {
    let (resource, _received) = fake_instrument(&[("DATA?", "ABCDEFGH\n")]);

    let mut dmm = SocketInstrument::new();
    dmm.open(&resource).unwrap();
    dmm.write("DATA?").unwrap();

    let timeout = Duration::from_secs(2);
    let mut first = dmm.read(4, timeout).unwrap();
    while first.len() < 4 {
        first.push_str(&dmm.read(4 - first.len(), timeout).unwrap());
    }
    assert_eq!(first, "ABCD");
    assert_eq!(dmm.read(1024, timeout).unwrap(), "EFGH\n");
}

#[test]
fn leftover_bytes_respect_buffer_size() {
    let (resource, _received) = fake_instrument(&[("BURST?", "A\nBCDEFGHIJ\n")]);

    let mut dmm = SocketInstrument::new();
    dmm.open(&resource).unwrap();
    dmm.write("BURST?").unwrap();

    let timeout = Duration::from_secs(2);
    assert_eq!(dmm.read(1024, timeout).unwrap(), "A\n");

    let mut rest = String::new();
    while !rest.ends_with('\n') {
        let chunk = dmm.read(4, timeout).unwrap();
        assert!(chunk.len() <= 4, "read returned {chunk:?} with buffer size 4");
        rest.push_str(&chunk);
    }
    assert_eq!(rest, "BCDEFGHIJ\n");
}

#[test]
fn read_without_response_times_out() {
    let (resource, _received) = fake_instrument(&[]);

    let mut dmm = SocketInstrument::new();
    dmm.open(&resource).unwrap();
    dmm.write("*RST").unwrap();

    let err = dmm.read(64, Duration::from_millis(50)).unwrap_err();
    assert_eq!(err.code(), Some(VI_ERROR_TMO));
    assert!(matches!(err, TransportError::Status { .. }));
    assert!(dmm.is_open());
}

#[test]
fn open_unreachable_port_fails() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut dmm = SocketInstrument::new().with_connect_timeout(Duration::from_millis(500));
    let err = dmm
        .open(&format!("TCPIP0::127.0.0.1::{port}::SOCKET"))
        .unwrap_err();
    assert!(matches!(err, TransportError::Status { .. }));
    assert!(!dmm.is_open());
}

// ---- identity search ----

#[test]
fn open_by_identity_skips_bad_resources() {
    let (other, _other_rx) = fake_instrument(&[("*IDN?", "OtherCo,PSU-1,SN1,2.0\n")]);
    let (wanted, _wanted_rx) = fake_instrument(&[("*IDN?", IDN), ("MEAS:VOLT?", "+2.5\n")]);

    let descriptors = ["GPIB0::12::INSTR", "nonsense", other.as_str(), wanted.as_str()];
    let mut dmm = SocketInstrument::new();
    let found = open_by_identity(&mut dmm, &descriptors, "DMM-9000").unwrap();

    assert_eq!(found.as_deref(), Some(wanted.as_str()));
    assert!(dmm.is_open());
    assert_eq!(dmm.query("MEAS:VOLT?").unwrap(), "+2.5");
}

#[test]
fn open_by_identity_without_match() {
    let mut dmm = SocketInstrument::new();
    let found = open_by_identity(&mut dmm, &["GPIB0::1::INSTR"], "DMM").unwrap();
    assert_eq!(found, None);
    assert!(!dmm.is_open());
}
