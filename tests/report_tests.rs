use cabin_interlock::report::*;
use cabin_interlock::safety::{InhibitReason, InhibitReasons};
use std::io::{self, Write};

fn all_reasons() -> InhibitReasons {
    InhibitReason::ALL.into_iter().collect()
}

#[test]
fn test_render_welcome() {
    let text = render_report(&ReportEvent::Welcome).unwrap();
    assert_eq!(text.as_str(), "\nWelcome to enhanced alarm system model 218-W24");
}

#[test]
fn test_render_engine_started() {
    let text = render_report(&ReportEvent::EngineStarted).unwrap();
    assert_eq!(text.as_str(), "\nEngine started.");
}

#[test]
fn test_render_inhibited_lists_reasons_in_fixed_order() {
    let text = render_report(&ReportEvent::Inhibited {
        reasons: all_reasons(),
    })
    .unwrap();

    assert_eq!(
        text.as_str(),
        "\nIgnition inhibited\nReasons:\nDriver not present.\nPassenger not present.\
         \nDriver Seatbelt not fastened.\nPassenger Seatbelt not fastened."
    );
}

#[test]
fn test_render_single_reason() {
    let reasons: InhibitReasons = [InhibitReason::PassengerSeatbeltOff].into_iter().collect();
    let text = render_report(&ReportEvent::Inhibited { reasons }).unwrap();
    assert!(text.ends_with("\nReasons:\nPassenger Seatbelt not fastened."));
    assert!(!text.contains("Driver"));
}

#[test]
fn test_serial_sink_writes_text_lines() {
    let mut sink = SerialReportSink::new(Vec::new(), ReportFormat::Text);
    sink.report(&ReportEvent::Welcome).unwrap();
    sink.report(&ReportEvent::EngineStarted).unwrap();
    assert_eq!(sink.reports_sent(), 2);

    let bytes = sink.into_inner();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(
        text,
        "\nWelcome to enhanced alarm system model 218-W24\nEngine started."
    );
}

#[test]
fn test_serial_sink_json_lines() {
    let mut sink = SerialReportSink::new(Vec::new(), ReportFormat::Json);
    let reasons: InhibitReasons = [InhibitReason::DriverAbsent].into_iter().collect();
    sink.report(&ReportEvent::Inhibited { reasons: reasons.clone() }).unwrap();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let line = text.lines().next().unwrap();
    let parsed: ReportEvent = serde_json::from_str(line).unwrap();
    assert_eq!(parsed, ReportEvent::Inhibited { reasons });
    assert!(line.contains("DriverAbsent"));
}

struct BrokenTransport;

impl Write for BrokenTransport {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "uart detached"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_transport_failure_surfaces_as_error() {
    let mut sink = SerialReportSink::new(BrokenTransport, ReportFormat::Text);
    let result = sink.report(&ReportEvent::EngineStarted);
    assert!(matches!(result, Err(ReportError::Io(_))));
    assert_eq!(sink.reports_sent(), 0);
}

#[test]
fn test_vec_sink_collects_events() {
    let mut sink: Vec<ReportEvent> = Vec::new();
    sink.report(&ReportEvent::Welcome).unwrap();
    sink.report(&ReportEvent::EngineStarted).unwrap();
    assert_eq!(sink, vec![ReportEvent::Welcome, ReportEvent::EngineStarted]);
}
