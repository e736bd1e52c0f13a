use actor_runtime::{actor_error, actor_info, actor_warn, Actor, LinkMessage, PortMessage};
use framing::LineScanner;
use futures_channel::mpsc;
use protocol::{ActorError, FlowControl, ParityMode, PortInfo, SerialSettings, UiEvent};
use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-read timeout on the reader thread. Bounds how long a close has to
/// wait for the thread to notice the stop flag.
const READ_TIMEOUT: Duration = Duration::from_millis(20);
const READ_BUF_SIZE: usize = 256;

/// Some platforms report a removed tty as endless zero-byte reads rather
/// than an I/O error. After this many consecutive empty reads the device
/// is treated as lost.
const ZERO_READ_LIMIT: u32 = 64;

/// PortActor owns the serial port handle and its reader thread
///
/// `Open` configures and opens the port, writes the optional greeting, and
/// starts a reader thread doing short-timeout blocking reads into a
/// `LineScanner`; each completed line goes to the UI as `LineReceived`.
/// `Close` stops the thread, drops the handle, and confirms with `Closed`.
/// Outcomes are reported to the LinkActor, never decided here.
pub struct PortActor {
    link_tx: mpsc::Sender<LinkMessage>,
    event_tx: mpsc::Sender<UiEvent>,

    port: Option<Box<dyn SerialPort>>,
    stop_flag: Option<Arc<AtomicBool>>,
    reader: Option<std::thread::JoinHandle<()>>,
}

impl PortActor {
    pub fn new(link_tx: mpsc::Sender<LinkMessage>, event_tx: mpsc::Sender<UiEvent>) -> Self {
        Self {
            link_tx,
            event_tx,
            port: None,
            stop_flag: None,
            reader: None,
        }
    }

    /// Send a CRITICAL message to the LinkActor; if this fails, the state
    /// machine is gone and the error propagates.
    fn send_critical_link(&self, msg: LinkMessage) -> Result<(), ActorError> {
        self.link_tx.clone().try_send(msg).map_err(|e| {
            if e.is_disconnected() {
                ActorError::ChannelClosed("LinkActor has shut down".into())
            } else {
                ActorError::Other("LinkActor channel overloaded".into())
            }
        })
    }

    async fn handle_open(
        &mut self,
        port: PortInfo,
        settings: SerialSettings,
        greeting: Option<Vec<u8>>,
    ) -> Result<(), ActorError> {
        if self.port.is_some() {
            // A stale session is still around; release it first.
            actor_warn!("PortActor: Open with port already held, closing previous session");
            self.close_port();
        }

        let mut handle = match open_port(&port, &settings) {
            Ok(handle) => handle,
            Err(e) => {
                actor_error!("PortActor: failed to open {}: {}", port.name, e);
                self.send_critical_link(LinkMessage::OpenFailed {
                    reason: format!("Failed to open {}: {}", port.name, e),
                })?;
                return Ok(());
            }
        };

        let reader_port = match handle.try_clone() {
            Ok(clone) => clone,
            Err(e) => {
                self.send_critical_link(LinkMessage::OpenFailed {
                    reason: format!("Failed to clone {} for reading: {}", port.name, e),
                })?;
                return Ok(());
            }
        };

        actor_info!(
            "PortActor: opened {} at {} baud",
            port.name,
            settings.baud_rate
        );

        // Greeting goes out before the first read, once per session.
        if let Some(bytes) = greeting {
            if let Err(e) = handle.write_all(&bytes) {
                actor_warn!("PortActor: greeting write failed: {}", e);
            }
        }

        self.spawn_reader(reader_port);
        self.port = Some(handle);
        self.send_critical_link(LinkMessage::Opened)?;

        Ok(())
    }

    /// Reader thread: short-timeout blocking reads feeding a LineScanner.
    /// Timestamps are microseconds since the session opened.
    fn spawn_reader(&mut self, port: Box<dyn SerialPort>) {
        let stop = Arc::new(AtomicBool::new(false));
        self.stop_flag = Some(stop.clone());

        let link_tx = self.link_tx.clone();
        let event_tx = self.event_tx.clone();

        self.reader = Some(std::thread::spawn(move || {
            run_reader(port, &stop, link_tx, event_tx);
        }));
    }

    async fn handle_close(&mut self) -> Result<(), ActorError> {
        self.close_port();
        self.send_critical_link(LinkMessage::Closed)?;
        Ok(())
    }

    /// Stop the reader thread and release the OS handle. Idempotent.
    fn close_port(&mut self) {
        if let Some(stop) = self.stop_flag.take() {
            stop.store(true, Ordering::Release);
        }
        self.port = None;
        if let Some(reader) = self.reader.take() {
            // The thread exits within one READ_TIMEOUT of the flag.
            if reader.join().is_err() {
                actor_warn!("PortActor: reader thread panicked");
            }
        }
    }

    async fn handle_write(&mut self, data: Vec<u8>) -> Result<(), ActorError> {
        let Some(port) = self.port.as_mut() else {
            return Err(ActorError::Transport(
                "Write requested but no port is open".into(),
            ));
        };
        port.write_all(&data)
            .map_err(|e| ActorError::Transport(format!("Write failed: {}", e)))?;
        Ok(())
    }
}

/// Body of the reader thread, generic over the byte source so the read and
/// loss-detection behavior is testable without hardware.
///
/// Exits on the stop flag, on a resource-level read error, or after
/// `ZERO_READ_LIMIT` consecutive empty reads (a removed tty on some
/// platforms). The latter two report `LinkMessage::Lost` unless the stop
/// flag was set, i.e. the close was deliberate.
fn run_reader<R: Read>(
    mut port: R,
    stop: &AtomicBool,
    mut link_tx: mpsc::Sender<LinkMessage>,
    mut event_tx: mpsc::Sender<UiEvent>,
) {
    let opened_at = Instant::now();
    let mut scanner = LineScanner::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    let mut zero_reads = 0u32;

    loop {
        if stop.load(Ordering::Acquire) {
            return;
        }
        match port.read(&mut buf) {
            Ok(0) => {
                zero_reads += 1;
                if zero_reads >= ZERO_READ_LIMIT {
                    if !stop.load(Ordering::Acquire) {
                        actor_warn!("PortActor: device returns only empty reads, treating as lost");
                        let _ = link_tx.try_send(LinkMessage::Lost);
                    }
                    return;
                }
            }
            Ok(n) => {
                zero_reads = 0;
                let timestamp_us = opened_at.elapsed().as_micros() as u64;
                let Some(chunk) = buf.get(..n) else { continue };
                for line in scanner.push(chunk, timestamp_us) {
                    // UI gone or saturated: drop the line.
                    let _ = event_tx.try_send(UiEvent::LineReceived { line });
                }
            }
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::Interrupted | ErrorKind::WouldBlock
                ) =>
            {
                continue
            }
            Err(e) => {
                // Resource-level failure (unplug, revoked handle).
                if !stop.load(Ordering::Acquire) {
                    actor_warn!("PortActor: read failed: {}", e);
                    let _ = link_tx.try_send(LinkMessage::Lost);
                }
                return;
            }
        }
    }
}

/// Map the protocol-level settings onto the serial backend and open.
fn open_port(port: &PortInfo, settings: &SerialSettings) -> serialport::Result<Box<dyn SerialPort>> {
    let data_bits = match settings.data_bits {
        5 => serialport::DataBits::Five,
        6 => serialport::DataBits::Six,
        7 => serialport::DataBits::Seven,
        _ => serialport::DataBits::Eight,
    };
    let stop_bits = match settings.stop_bits {
        2 => serialport::StopBits::Two,
        _ => serialport::StopBits::One,
    };
    let parity = match settings.parity {
        ParityMode::None => serialport::Parity::None,
        ParityMode::Even => serialport::Parity::Even,
        ParityMode::Odd => serialport::Parity::Odd,
    };
    let flow_control = match settings.flow_control {
        FlowControl::None => serialport::FlowControl::None,
        FlowControl::Hardware => serialport::FlowControl::Hardware,
        FlowControl::Software => serialport::FlowControl::Software,
    };

    serialport::new(port.name.clone(), settings.baud_rate)
        .data_bits(data_bits)
        .stop_bits(stop_bits)
        .parity(parity)
        .flow_control(flow_control)
        .timeout(READ_TIMEOUT)
        .open()
}

impl Actor for PortActor {
    type Message = PortMessage;

    fn name(&self) -> &'static str {
        "PortActor"
    }

    async fn handle(&mut self, msg: PortMessage) -> Result<(), ActorError> {
        match msg {
            PortMessage::Open {
                port,
                settings,
                greeting,
            } => self.handle_open(port, settings, greeting).await?,
            PortMessage::Close => self.handle_close().await?,
            PortMessage::Write { data } => self.handle_write(data).await?,
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        // App teardown: make sure the OS handle is released.
        self.close_port();
    }
}
