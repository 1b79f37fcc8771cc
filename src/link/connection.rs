use std::io::{Read, Write};

use bytes::BytesMut;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_util::codec::Encoder;
use tracing::{debug, info, warn};

use crate::core::{Error, InboundSample, LinkConfig, Result, OUTBOUND_FRAME_LEN};
use crate::protocol::{LinkCodec, OutboundCommand, ReceiveReassembler};
use crate::util;

/// Cloneable handle for submitting commands to a running link
#[derive(Clone)]
pub struct LinkHandle {
    command_tx: mpsc::Sender<OutboundCommand>,
}

impl LinkHandle {
    /// Queues a command for transmission
    pub async fn send(&self, command: OutboundCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| Error::link("link is closed"))
    }
}

/// Owns the serial port and drives framed traffic in both directions.
///
/// Commands arrive on an mpsc channel and are written as 16-byte frames;
/// inbound bytes are polled off the port, pushed through the reassembler,
/// and forwarded as decoded samples. The receive buffer lives and dies with
/// the connection.
pub struct LinkManager {
    config: LinkConfig,
    port: Box<dyn SerialPort>,
    codec: LinkCodec,
    send_buffer: BytesMut,
    reassembler: ReceiveReassembler,
    command_rx: mpsc::Receiver<OutboundCommand>,
    sample_tx: mpsc::Sender<InboundSample>,
}

impl LinkManager {
    /// Opens the configured serial port and sets up the channel pair.
    ///
    /// Returns the manager together with a command handle and the receiver
    /// for decoded samples. The port is configured 8-N-1 with no flow
    /// control, matching the firmware.
    pub fn open(
        config: LinkConfig,
    ) -> Result<(Self, LinkHandle, mpsc::Receiver<InboundSample>)> {
        if config.port_name.is_empty() {
            return Err(Error::config("port name is empty"));
        }

        let port = serialport::new(&config.port_name, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| Error::serial(format!("Failed to open {}: {}", config.port_name, e)))?;

        info!(port = %config.port_name, baud = config.baud_rate, "link opened");

        let (command_tx, command_rx) = mpsc::channel(config.channel_capacity);
        let (sample_tx, sample_rx) = mpsc::channel(config.channel_capacity);

        let manager = LinkManager {
            config,
            port,
            codec: LinkCodec::new(),
            send_buffer: BytesMut::with_capacity(OUTBOUND_FRAME_LEN),
            reassembler: ReceiveReassembler::new(),
            command_rx,
            sample_tx,
        };

        Ok((manager, LinkHandle { command_tx }, sample_rx))
    }

    /// Runs the link until every command handle is dropped.
    ///
    /// Alternates between draining the command channel and polling the port
    /// for inbound bytes. On shutdown the receive buffer is discarded, so a
    /// partial frame never leaks into a later connection.
    pub async fn run(&mut self) -> Result<()> {
        let mut poll = interval(self.config.poll_interval);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(command) => self.write_command(command)?,
                        None => break,
                    }
                }

                _ = poll.tick() => {
                    self.poll_incoming()?;
                }
            }
        }

        self.reassembler.reset();
        info!(port = %self.config.port_name, "link closed");
        Ok(())
    }

    /// Encodes one command and writes its frame to the port
    fn write_command(&mut self, command: OutboundCommand) -> Result<()> {
        self.send_buffer.clear();
        self.codec.encode(command, &mut self.send_buffer)?;
        self.port.write_all(&self.send_buffer)?;
        self.port.flush()?;
        debug!(bytes = %util::hex_dump(&self.send_buffer), "wrote frame");
        Ok(())
    }

    /// Reads whatever the port has buffered and forwards decoded samples.
    ///
    /// A lagging or dropped consumer loses samples rather than stalling the
    /// drain loop; they are best-effort telemetry.
    fn poll_incoming(&mut self) -> Result<()> {
        let available = self
            .port
            .bytes_to_read()
            .map_err(|e| Error::serial(format!("Failed to query port: {}", e)))?
            as usize;
        if available == 0 {
            return Ok(());
        }

        let mut chunk = vec![0u8; available];
        self.port.read_exact(&mut chunk)?;
        debug!(bytes = %util::hex_dump(&chunk), "read chunk");

        for sample in self.reassembler.on_bytes_received(&chunk) {
            if self.sample_tx.try_send(sample).is_err() {
                warn!(value = sample.value, "dropped sample");
            }
        }
        Ok(())
    }
}
