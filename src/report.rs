use crate::safety::{InhibitReason, InhibitReasons};
use arrayvec::ArrayString;
use core::fmt::Write as _;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

pub const MAX_REPORT_SIZE: usize = 256;

pub type ReportBuffer = ArrayString<MAX_REPORT_SIZE>;

pub const WELCOME_MESSAGE: &str = "Welcome to enhanced alarm system model 218-W24";
pub const ENGINE_STARTED_MESSAGE: &str = "Engine started.";
pub const INHIBITED_MESSAGE: &str = "Ignition inhibited";
pub const REASONS_HEADER: &str = "Reasons:";

/// Status events emitted by the controller. Rendering is left to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportEvent {
    Welcome,
    EngineStarted,
    Inhibited { reasons: InhibitReasons },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report transport error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rendered report exceeds {} bytes", MAX_REPORT_SIZE)]
    MessageTooLong,
    #[error("Report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Collaborator that puts report events on a transport.
pub trait ReportSink {
    fn report(&mut self, event: &ReportEvent) -> Result<(), ReportError>;
}

/// Collects events in memory.
impl ReportSink for alloc::vec::Vec<ReportEvent> {
    fn report(&mut self, event: &ReportEvent) -> Result<(), ReportError> {
        self.push(event.clone());
        Ok(())
    }
}

pub fn reason_message(reason: InhibitReason) -> &'static str {
    match reason {
        InhibitReason::DriverAbsent => "Driver not present.",
        InhibitReason::PassengerAbsent => "Passenger not present.",
        InhibitReason::DriverSeatbeltOff => "Driver Seatbelt not fastened.",
        InhibitReason::PassengerSeatbeltOff => "Passenger Seatbelt not fastened.",
    }
}

/// Render an event as operator text, one `\n`-prefixed line per message.
pub fn render_report(event: &ReportEvent) -> Result<ReportBuffer, ReportError> {
    let mut buffer = ReportBuffer::new();

    match event {
        ReportEvent::Welcome => push_line(&mut buffer, WELCOME_MESSAGE)?,
        ReportEvent::EngineStarted => push_line(&mut buffer, ENGINE_STARTED_MESSAGE)?,
        ReportEvent::Inhibited { reasons } => {
            push_line(&mut buffer, INHIBITED_MESSAGE)?;
            push_line(&mut buffer, REASONS_HEADER)?;
            for reason in reasons.iter() {
                push_line(&mut buffer, reason_message(reason))?;
            }
        }
    }

    Ok(buffer)
}

fn push_line(buffer: &mut ReportBuffer, line: &str) -> Result<(), ReportError> {
    write!(buffer, "\n{}", line).map_err(|_| ReportError::MessageTooLong)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Line-oriented sink over any byte transport (UART, stdout, socket).
pub struct SerialReportSink<W: Write> {
    writer: W,
    format: ReportFormat,
    reports_sent: u32,
}

impl<W: Write> SerialReportSink<W> {
    pub fn new(writer: W, format: ReportFormat) -> Self {
        Self {
            writer,
            format,
            reports_sent: 0,
        }
    }

    pub fn reports_sent(&self) -> u32 {
        self.reports_sent
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for SerialReportSink<W> {
    fn report(&mut self, event: &ReportEvent) -> Result<(), ReportError> {
        match self.format {
            ReportFormat::Text => {
                let rendered = render_report(event)?;
                self.writer.write_all(rendered.as_bytes())?;
            }
            ReportFormat::Json => {
                serde_json::to_writer(&mut self.writer, event)?;
                self.writer.write_all(b"\n")?;
            }
        }
        self.writer.flush()?;
        self.reports_sent = self.reports_sent.saturating_add(1);
        Ok(())
    }
}
