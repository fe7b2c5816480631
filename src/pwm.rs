use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::InputPin;

/// Default wait for a complete pulse on the status pin
pub const PULSE_TIMEOUT_US: u32 = 2_000_000;

/// Shorter pulses are noise and read as zero concentration
pub const MIN_PULSE_US: u32 = 200;

///
/// Measures how long a pin stays high
///
pub trait PulseIn {
    type Error;

    ///
    /// Waits for the next complete high pulse and returns its width in microseconds.
    /// Returns 0 if no pulse finished within `timeout_us`.
    ///
    fn pulse_high_us(&mut self, timeout_us: u32) -> Result<u32, Self::Error>;
}

///
/// [`PulseIn`] implemented by sampling an input pin every `step_us`
///
pub struct PolledPulseIn<Pin, Delay> {
    pin: Pin,
    delay: Delay,
    step_us: u32,
}

impl<Pin, Delay> PolledPulseIn<Pin, Delay>
where
    Pin: InputPin,
    Delay: DelayUs<u32>,
{
    pub fn new(pin: Pin, delay: Delay, step_us: u32) -> Self {
        Self {
            pin,
            delay,
            step_us: step_us.max(1),
        }
    }

    pub fn release(self) -> (Pin, Delay) {
        (self.pin, self.delay)
    }

    // Waits while the pin is at `level`, returns the time spent or None past the deadline.
    fn wait_while(
        &mut self,
        level: bool,
        elapsed: &mut u32,
        timeout_us: u32,
    ) -> Result<Option<u32>, Pin::Error> {
        let start = *elapsed;
        while self.pin.is_high()? == level {
            if *elapsed >= timeout_us {
                return Ok(None);
            }
            self.delay.delay_us(self.step_us);
            *elapsed = elapsed.saturating_add(self.step_us);
        }
        Ok(Some(*elapsed - start))
    }
}

impl<Pin, Delay> PulseIn for PolledPulseIn<Pin, Delay>
where
    Pin: InputPin,
    Delay: DelayUs<u32>,
{
    type Error = Pin::Error;

    fn pulse_high_us(&mut self, timeout_us: u32) -> Result<u32, Self::Error> {
        let mut elapsed = 0u32;

        // a pulse already in progress is not measured
        if self.wait_while(true, &mut elapsed, timeout_us)?.is_none() {
            return Ok(0);
        }
        if self.wait_while(false, &mut elapsed, timeout_us)?.is_none() {
            return Ok(0);
        }
        Ok(self.wait_while(true, &mut elapsed, timeout_us)?.unwrap_or(0))
    }
}

///
/// Coarse PM2.5 reading from the width of the pulses on the module's status pin
///
pub struct Pm25Pwm<Pulse> {
    pulse: Pulse,
    timeout_us: u32,
}

impl<Pulse> Pm25Pwm<Pulse>
where
    Pulse: PulseIn,
{
    pub fn new(pulse: Pulse) -> Self {
        Self {
            pulse,
            timeout_us: PULSE_TIMEOUT_US,
        }
    }

    pub fn with_timeout(pulse: Pulse, timeout_us: u32) -> Self {
        Self { pulse, timeout_us }
    }

    ///
    /// PM2.5 concentration in ug/m3, one per millisecond of pulse width.
    /// Returns 0 when no pulse of at least 200 us was seen.
    ///
    pub fn read_pm25_value(&mut self) -> Result<u16, Pulse::Error> {
        let width = self.pulse.pulse_high_us(self.timeout_us)?;
        if width < MIN_PULSE_US {
            log::trace!("pulse of {} us below threshold", width);
            return Ok(0);
        }
        Ok((width / 1000) as u16)
    }

    pub fn release(self) -> Pulse {
        self.pulse
    }
}
