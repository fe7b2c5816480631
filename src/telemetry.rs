use scroll::ctx::TryFromCtx;
use scroll::{Endian, Pread, BE};

pub const TELEMETRY_FRAME_SIZE: usize = 32;
pub const TELEMETRY_HEADER: [u8; 4] = [0x42, 0x4D, 0x00, 0x1C];

///
/// Decoded 32 byte frame the module uploads on its own in auto mode
///
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    pub frame_length: u16,
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10: u16,
    pub pm1_0_atm: u16,
    pub pm2_5_atm: u16,
    pub pm10_atm: u16,
    pub beyond_0_3: u16,
    pub beyond_0_5: u16,
    pub beyond_1_0: u16,
    pub beyond_2_5: u16,
    pub beyond_5_0: u16,
    pub beyond_10_0: u16,
    pub reserved: u16,
    pub check: u16,
}

impl TelemetryFrame {
    ///
    /// Decodes a frame obtained from [`read_info_packet`](crate::Bm25s3221::read_info_packet)
    ///
    /// Fails on a zeroed (never synchronized) buffer since its header does not match.
    ///
    pub fn from_bytes(buffer: &[u8; TELEMETRY_FRAME_SIZE]) -> Result<Self, scroll::Error> {
        buffer.pread_with(0, BE)
    }
}

impl<'a> TryFromCtx<'a, Endian> for TelemetryFrame {
    type Error = scroll::Error;

    fn try_from_ctx(src: &'a [u8], endian: Endian) -> Result<(Self, usize), Self::Error> {
        let mut offset = 0usize;

        let start1 = src.gread::<u8>(&mut offset)?;
        let start2 = src.gread::<u8>(&mut offset)?;
        if [start1, start2] != TELEMETRY_HEADER[..2] {
            return Err(scroll::Error::BadInput {
                size: offset,
                msg: "missing telemetry start bytes",
            });
        }

        let frame = TelemetryFrame {
            frame_length: src.gread_with(&mut offset, endian)?,
            pm1_0: src.gread_with(&mut offset, endian)?,
            pm2_5: src.gread_with(&mut offset, endian)?,
            pm10: src.gread_with(&mut offset, endian)?,
            pm1_0_atm: src.gread_with(&mut offset, endian)?,
            pm2_5_atm: src.gread_with(&mut offset, endian)?,
            pm10_atm: src.gread_with(&mut offset, endian)?,
            beyond_0_3: src.gread_with(&mut offset, endian)?,
            beyond_0_5: src.gread_with(&mut offset, endian)?,
            beyond_1_0: src.gread_with(&mut offset, endian)?,
            beyond_2_5: src.gread_with(&mut offset, endian)?,
            beyond_5_0: src.gread_with(&mut offset, endian)?,
            beyond_10_0: src.gread_with(&mut offset, endian)?,
            reserved: src.gread_with(&mut offset, endian)?,
            check: src.gread_with(&mut offset, endian)?,
        };

        Ok((frame, offset))
    }
}

#[cfg(test)]
pub(crate) fn build_frame(payload: [u8; 26]) -> [u8; TELEMETRY_FRAME_SIZE] {
    let mut frame = [0u8; TELEMETRY_FRAME_SIZE];
    frame[..4].copy_from_slice(&TELEMETRY_HEADER);
    frame[4..30].copy_from_slice(&payload);
    let sum = frame[..30].iter().map(|b| *b as u16).sum::<u16>();
    frame[30] = (sum >> 8) as u8;
    frame[31] = sum as u8;
    frame
}
