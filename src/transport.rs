use embedded_hal::serial::{Read, Write};
use nb::block;

///
/// Byte stream the sensor is attached to
///
pub trait Transport {
    type Error;

    /// Number of received bytes that can be read without waiting
    fn available(&mut self) -> Result<usize, Self::Error>;

    /// Next received byte, `None` if nothing is buffered
    fn read(&mut self) -> Result<Option<u8>, Self::Error>;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Blocks until everything written has been sent
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Errors of [`BufferedSerial`], split by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError<RE, WE> {
    Read(RE),
    Write(WE),
}

pub const RX_BUFFER_SIZE: usize = 64;

///
/// Turns a non-blocking embedded hal serial port into a [`Transport`]
///
/// Incoming bytes are drained into a receive ring so their number can be reported.
/// Bytes arriving while the ring is full are left in the serial peripheral.
///
pub struct BufferedSerial<Serial> {
    serial: Serial,
    rx: [u8; RX_BUFFER_SIZE],
    head: usize,
    len: usize,
}

impl<Serial> BufferedSerial<Serial>
where
    Serial: Read<u8> + Write<u8>,
{
    pub fn new(serial: Serial) -> Self {
        Self {
            serial,
            rx: [0u8; RX_BUFFER_SIZE],
            head: 0,
            len: 0,
        }
    }

    pub fn release(self) -> Serial {
        self.serial
    }

    fn fill(&mut self) -> Result<(), <Serial as Read<u8>>::Error> {
        while self.len < RX_BUFFER_SIZE {
            match self.serial.read() {
                Ok(byte) => {
                    self.rx[(self.head + self.len) % RX_BUFFER_SIZE] = byte;
                    self.len += 1;
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<Serial> Transport for BufferedSerial<Serial>
where
    Serial: Read<u8> + Write<u8>,
{
    type Error = SerialError<<Serial as Read<u8>>::Error, <Serial as Write<u8>>::Error>;

    fn available(&mut self) -> Result<usize, Self::Error> {
        self.fill().map_err(SerialError::Read)?;
        Ok(self.len)
    }

    fn read(&mut self) -> Result<Option<u8>, Self::Error> {
        if self.len == 0 {
            self.fill().map_err(SerialError::Read)?;
        }
        if self.len == 0 {
            return Ok(None);
        }

        let byte = self.rx[self.head];
        self.head = (self.head + 1) % RX_BUFFER_SIZE;
        self.len -= 1;
        Ok(Some(byte))
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for byte in bytes {
            block!(self.serial.write(*byte)).map_err(SerialError::Write)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        block!(Write::flush(&mut self.serial)).map_err(SerialError::Write)
    }
}

///
/// Combines separate transmit and receive halves into one serial object
///
pub struct SplitSerial<TX, RX> {
    tx: TX,
    rx: RX,
}

impl<TX, RX> SplitSerial<TX, RX>
where
    TX: Write<u8>,
    RX: Read<u8>,
{
    pub fn new(tx: TX, rx: RX) -> Self {
        Self { tx, rx }
    }

    pub fn release(self) -> (TX, RX) {
        (self.tx, self.rx)
    }
}

impl<TX, RX> Read<u8> for SplitSerial<TX, RX>
where
    TX: Write<u8>,
    RX: Read<u8>,
{
    type Error = RX::Error;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.rx.read()
    }
}

impl<TX, RX> Write<u8> for SplitSerial<TX, RX>
where
    TX: Write<u8>,
    RX: Read<u8>,
{
    type Error = TX::Error;

    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        self.tx.write(word)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.tx.flush()
    }
}
