use scroll::ctx::TryFromCtx;
use scroll::{Endian, Pread};

pub const CMD_FRAME_SIZE: usize = 9;
pub const RESPONSE_FRAME_SIZE: usize = 9;

const START_BYTE: u8 = 0xFF;
const DEVICE_ID: u8 = 0x01;

pub const CMD_QUERY_DUST: u8 = 0x86;
pub const CMD_SLEEP: u8 = 0xA7;
pub const CMD_UPLOAD_MODE: u8 = 0x78;

/// Byte the module puts at offset 2 of a sleep/wake reply when it accepted the mode
pub const MODE_ACCEPTED: u8 = 0x01;

///
/// How the module reports dust concentration
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UploadMode {
    /// Module streams 32 byte telemetry frames on its own
    Auto = 0x40,
    /// Module stays silent until queried
    Command = 0x41,
}

///
/// Negated (two's complement) sum of the bytes, as used by command and response frames
///
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
        .wrapping_neg()
}

pub fn create_command(cmd: u8, params: [u8; 5]) -> [u8; CMD_FRAME_SIZE] {
    let mut buffer = [0_u8; CMD_FRAME_SIZE];

    buffer[0] = START_BYTE;
    buffer[1] = DEVICE_ID;
    buffer[2] = cmd;
    buffer[3..8].copy_from_slice(&params);
    buffer[CMD_FRAME_SIZE - 1] = checksum(&buffer[1..CMD_FRAME_SIZE - 1]);

    buffer
}

///
/// Checks the trailing checksum byte of a response against bytes `1..len-1`
///
pub fn verify_response(buffer: &[u8]) -> bool {
    match buffer.split_last() {
        Some((last, rest)) if !rest.is_empty() => checksum(&rest[1..]) == *last,
        _ => false,
    }
}

///
/// Dust concentration as reported in reply to a query command
///
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DustReading {
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10: u16,
}

// The reply does not keep the fields in size order: PM2.5 comes first, PM1.0 last.
impl<'a> TryFromCtx<'a, Endian> for DustReading {
    type Error = scroll::Error;

    fn try_from_ctx(src: &'a [u8], endian: Endian) -> Result<(Self, usize), Self::Error> {
        let reading = DustReading {
            pm1_0: src.pread_with(6, endian)?,
            pm2_5: src.pread_with(2, endian)?,
            pm10: src.pread_with(4, endian)?,
        };
        Ok((reading, 8))
    }
}
