#![allow(dead_code)]

use bm25s3221::Transport;
use embedded_hal::blocking::delay::DelayMs;
use std::collections::VecDeque;

pub const HEADER: [u8; 4] = [0x42, 0x4D, 0x00, 0x1C];

///
/// Transport whose receive side is scripted. A reply queued with `replying`
/// shows up once a command has been written and flushed.
///
#[derive(Default)]
pub struct MockTransport {
    pub incoming: VecDeque<u8>,
    pub reply: Vec<u8>,
    pub sent: Vec<u8>,
    pub flushes: usize,
}

impl MockTransport {
    pub fn with_stream(bytes: &[u8]) -> Self {
        Self {
            incoming: bytes.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn replying(reply: &[u8]) -> Self {
        Self {
            reply: reply.to_vec(),
            ..Self::default()
        }
    }
}

impl Transport for MockTransport {
    type Error = ();

    fn available(&mut self) -> Result<usize, ()> {
        Ok(self.incoming.len())
    }

    fn read(&mut self) -> Result<Option<u8>, ()> {
        Ok(self.incoming.pop_front())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), ()> {
        self.sent.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        self.flushes += 1;
        self.incoming.extend(self.reply.drain(..));
        Ok(())
    }
}

///
/// Delay that only counts the time it was asked to wait
///
#[derive(Default)]
pub struct MockDelay {
    pub total_ms: u32,
    pub calls: Vec<u32>,
}

impl DelayMs<u32> for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms;
        self.calls.push(ms);
    }
}

pub fn response(body: [u8; 7]) -> [u8; 9] {
    let mut frame = [0u8; 9];
    frame[0] = 0xFF;
    frame[1..8].copy_from_slice(&body);
    frame[8] = body.iter().fold(0u8, |s, b| s.wrapping_add(*b)).wrapping_neg();
    frame
}

pub fn telemetry_frame(payload: [u8; 26]) -> [u8; 32] {
    let mut frame = [0u8; 32];
    frame[..4].copy_from_slice(&HEADER);
    frame[4..30].copy_from_slice(&payload);
    let sum: u16 = frame[..30].iter().map(|b| *b as u16).sum();
    frame[30] = (sum >> 8) as u8;
    frame[31] = sum as u8;
    frame
}

pub fn corrupted(mut frame: [u8; 32]) -> [u8; 32] {
    frame[20] ^= 0x10;
    frame
}
