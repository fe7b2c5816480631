use crate::telemetry::{TELEMETRY_FRAME_SIZE, TELEMETRY_HEADER};

#[derive(PartialEq, Debug)]
pub(crate) enum SyncStatus {
    InProgress,
    Finished([u8; TELEMETRY_FRAME_SIZE]),
    Failed,
}

#[derive(PartialEq, Debug)]
enum State {
    WaitingForHeader(usize),
    Reading,
    Finished,
    Failed,
}

///
/// Finds one telemetry frame in a byte stream fed to it one byte at a time.
///
/// Two budgets keep a call bounded: bytes skipped while looking for the first
/// header byte, and failed sync attempts (broken header or bad checksum).
///
pub(crate) struct SyncStateMachine {
    buffer: [u8; TELEMETRY_FRAME_SIZE],
    index: usize,
    sum: u16,
    state: State,
    skipped: usize,
    skip_budget: usize,
    failures: usize,
    max_failures: usize,
}

impl SyncStateMachine {
    pub(crate) fn new(skip_budget: usize, max_failures: usize) -> Self {
        Self {
            buffer: [0u8; TELEMETRY_FRAME_SIZE],
            index: 0,
            sum: 0,
            state: State::WaitingForHeader(0),
            skipped: 0,
            skip_budget,
            failures: 0,
            max_failures,
        }
    }

    fn sync_failed(&mut self) {
        self.failures += 1;
        if self.failures > self.max_failures {
            log::trace!("giving up after {} failed sync attempts", self.failures);
            self.state = State::Failed;
        } else {
            self.state = State::WaitingForHeader(0);
        }
    }

    fn header_byte_read(&mut self, position: usize, byte: u8) {
        if byte == TELEMETRY_HEADER[position] {
            self.buffer[position] = byte;
            self.sum = self.sum.wrapping_add(byte as u16);
            self.state = if position + 1 == TELEMETRY_HEADER.len() {
                self.index = TELEMETRY_HEADER.len();
                State::Reading
            } else {
                State::WaitingForHeader(position + 1)
            };
        } else if position > 0 {
            log::trace!("header broken at byte {}: {:#04x}", position, byte);
            self.sum = 0;
            self.sync_failed();
        } else {
            self.skipped += 1;
        }

        if self.skipped > self.skip_budget {
            log::trace!("no header within {} skipped bytes", self.skip_budget);
            self.state = State::Failed;
        }
    }

    fn byte_read(&mut self, byte: u8) {
        self.buffer[self.index] = byte;
        self.sum = self.sum.wrapping_add(byte as u16);
        self.index += 1;
        if self.index == TELEMETRY_FRAME_SIZE {
            self.frame_read();
        }
    }

    fn frame_read(&mut self) {
        let check_high = self.buffer[TELEMETRY_FRAME_SIZE - 2];
        let check_low = self.buffer[TELEMETRY_FRAME_SIZE - 1];
        let sum = self
            .sum
            .wrapping_sub(check_high as u16)
            .wrapping_sub(check_low as u16);
        self.sum = 0;

        if (sum >> 8) as u8 == check_high && sum as u8 == check_low {
            self.state = State::Finished;
        } else {
            log::trace!(
                "telemetry checksum mismatch: computed {:#06x}, frame has {:#04x}{:02x}",
                sum,
                check_high,
                check_low
            );
            self.sync_failed();
        }
    }

    pub(crate) fn update(&mut self, byte: u8) -> SyncStatus {
        match self.state {
            State::WaitingForHeader(position) => self.header_byte_read(position, byte),
            State::Reading => self.byte_read(byte),
            _ => {}
        };

        match self.state {
            State::WaitingForHeader(_) | State::Reading => SyncStatus::InProgress,
            State::Finished => SyncStatus::Finished(self.buffer),
            State::Failed => SyncStatus::Failed,
        }
    }
}
