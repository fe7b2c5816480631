//! Driver for the BM25S3221-1 dust sensor module
//!
//! The module talks over a 9600 baud UART. It answers 9 byte commands with
//! 9 byte replies and, in auto upload mode, streams 32 byte telemetry frames on
//! its own. A PWM status pin additionally reports a coarse PM2.5 value, see
//! [`pwm`].
#![cfg_attr(not(test), no_std)]

mod command;
mod config;
mod error;
pub mod pwm;
mod sync_fsm;
mod telemetry;
mod transport;

pub use command::{DustReading, UploadMode, CMD_FRAME_SIZE, RESPONSE_FRAME_SIZE};
pub use config::Config;
pub use error::Error;
pub use telemetry::{TelemetryFrame, TELEMETRY_FRAME_SIZE, TELEMETRY_HEADER};
pub use transport::{BufferedSerial, SerialError, SplitSerial, Transport, RX_BUFFER_SIZE};

use command::{
    create_command, verify_response, CMD_QUERY_DUST, CMD_SLEEP, CMD_UPLOAD_MODE, MODE_ACCEPTED,
};
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial::{Read, Write};
use log::{debug, info, warn};
use scroll::{Pread, BE};
use sync_fsm::{SyncStateMachine, SyncStatus};

pub struct Bm25s3221<T, D>
where
    T: Transport,
    D: DelayMs<u32>,
{
    transport: T,
    delay: D,
    config: Config,
    received: Option<[u8; TELEMETRY_FRAME_SIZE]>,
}

impl<T, D> Bm25s3221<T, D>
where
    T: Transport,
    D: DelayMs<u32>,
{
    ///
    /// Creates a new sensor instance on top of any [`Transport`]
    ///
    pub fn new(transport: T, delay: D) -> Self {
        Self::with_config(transport, delay, Config::default())
    }

    pub fn with_config(transport: T, delay: D, config: Config) -> Self {
        Self {
            transport,
            delay,
            config,
            received: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    ///
    /// Gives back the transport and delay
    ///
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    ///
    /// Blocks for the module's warm-up time (about 30 seconds by default)
    ///
    pub fn preheat(&mut self) {
        for remaining in (1..=self.config.preheat_seconds).rev() {
            info!("preheating, {} s left", remaining);
            self.delay.delay_ms(self.config.preheat_tick_ms);
        }
    }

    ///
    /// Queries PM1.0, PM2.5 and PM10 concentration
    ///
    pub fn query_dust_values(&mut self) -> Result<DustReading, Error<T::Error>> {
        self.send_command(CMD_QUERY_DUST, [0; 5])?;
        self.delay.delay_ms(self.config.query_settle_ms);

        let mut response = [0u8; RESPONSE_FRAME_SIZE];
        self.read_response(&mut response, self.config.response_timeout_ms)?;

        if response[1] != CMD_QUERY_DUST {
            warn!("reply to dust query answers command {:#04x}", response[1]);
            return Err(Error::UnexpectedReply);
        }

        response
            .pread_with::<DustReading>(0, BE)
            .map_err(|_| Error::UnexpectedReply)
    }

    pub fn sleep(&mut self) -> Result<(), Error<T::Error>> {
        self.set_sleep(0x01, self.config.sleep_settle_ms)
    }

    ///
    /// Leaves sleep mode. The module needs longer to answer than when going to sleep.
    ///
    pub fn wake_up(&mut self) -> Result<(), Error<T::Error>> {
        self.set_sleep(0x00, self.config.wake_settle_ms)
    }

    ///
    /// Auto mode - module uploads telemetry frames continuously
    /// Command mode - module reports only when queried
    ///
    pub fn set_upload_mode(&mut self, mode: UploadMode) -> Result<(), Error<T::Error>> {
        self.send_command(CMD_UPLOAD_MODE, [mode as u8, 0, 0, 0, 0])
    }

    ///
    /// Checks whether a complete, valid telemetry frame has been received. Never blocks.
    ///
    /// On success the frame is kept until [`read_info_packet`](Self::read_info_packet).
    /// A frame kept from an earlier call is dropped.
    ///
    pub fn is_info_available(&mut self) -> Result<bool, Error<T::Error>> {
        self.received = None;

        let available = self.transport.available().map_err(Error::Serial)?;
        if available < TELEMETRY_FRAME_SIZE {
            return Ok(false);
        }

        let mut fsm = SyncStateMachine::new(
            available - TELEMETRY_FRAME_SIZE,
            self.config.max_sync_failures,
        );

        while let Some(byte) = self.transport.read().map_err(Error::Serial)? {
            match fsm.update(byte) {
                SyncStatus::InProgress => {}
                SyncStatus::Finished(frame) => {
                    self.received = Some(frame);
                    return Ok(true);
                }
                SyncStatus::Failed => return Ok(false),
            }
        }

        debug!("stream ran dry while looking for a telemetry frame");
        Ok(false)
    }

    ///
    /// Takes the frame found by [`is_info_available`](Self::is_info_available).
    /// Returns zeros if there is none.
    ///
    pub fn read_info_packet(&mut self) -> [u8; TELEMETRY_FRAME_SIZE] {
        self.received.take().unwrap_or([0u8; TELEMETRY_FRAME_SIZE])
    }

    ///
    /// Sends a command frame, dropping whatever was received before it
    ///
    pub fn send_command(&mut self, cmd: u8, params: [u8; 5]) -> Result<(), Error<T::Error>> {
        let frame = create_command(cmd, params);

        while self.transport.available().map_err(Error::Serial)? > 0 {
            self.transport.read().map_err(Error::Serial)?;
        }

        debug!("sending {:02x?}", frame);
        self.transport.write_all(&frame).map_err(Error::Serial)?;
        self.transport.flush().map_err(Error::Serial)
    }

    ///
    /// Fills `buffer` with a response and verifies its checksum.
    ///
    /// Each byte may take up to `timeout_ms`. Partially received responses are lost on timeout.
    ///
    pub fn read_response(
        &mut self,
        buffer: &mut [u8],
        timeout_ms: u32,
    ) -> Result<(), Error<T::Error>> {
        for byte in buffer.iter_mut() {
            *byte = self.read_byte(timeout_ms)?;
        }
        debug!("received {:02x?}", buffer);

        if verify_response(buffer) {
            Ok(())
        } else {
            warn!("response checksum mismatch: {:02x?}", buffer);
            Err(Error::Checksum)
        }
    }

    fn set_sleep(&mut self, param: u8, settle_ms: u32) -> Result<(), Error<T::Error>> {
        self.send_command(CMD_SLEEP, [param, 0, 0, 0, 0])?;
        self.delay.delay_ms(settle_ms);

        let mut response = [0u8; RESPONSE_FRAME_SIZE];
        self.read_response(&mut response, self.config.response_timeout_ms)?;

        if response[2] == MODE_ACCEPTED {
            Ok(())
        } else {
            warn!("module rejected sleep mode {:#04x}: {:02x?}", param, response);
            Err(Error::CommandRejected)
        }
    }

    fn read_byte(&mut self, timeout_ms: u32) -> Result<u8, Error<T::Error>> {
        let mut waited = 0u32;
        loop {
            if self.transport.available().map_err(Error::Serial)? > 0 {
                if let Some(byte) = self.transport.read().map_err(Error::Serial)? {
                    return Ok(byte);
                }
            }
            if waited > timeout_ms {
                return Err(Error::Timeout);
            }
            self.delay.delay_ms(1);
            waited += 1;
        }
    }
}

impl<Serial, D> Bm25s3221<BufferedSerial<Serial>, D>
where
    Serial: Read<u8> + Write<u8>,
    D: DelayMs<u32>,
{
    ///
    /// Creates a new sensor instance using a single object implementing embedded hal serial traits
    ///
    pub fn from_serial(serial: Serial, delay: D) -> Self {
        Self::new(BufferedSerial::new(serial), delay)
    }
}

impl<TX, RX, D> Bm25s3221<BufferedSerial<SplitSerial<TX, RX>>, D>
where
    TX: Write<u8>,
    RX: Read<u8>,
    D: DelayMs<u32>,
{
    ///
    /// Creates a new sensor instance using separate Read and Write embedded hal trait objects
    ///
    pub fn new_tx_rx(tx: TX, rx: RX, delay: D) -> Self {
        Self::from_serial(SplitSerial::new(tx, rx), delay)
    }
}
