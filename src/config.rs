/// Timing and retry settings of the driver
///
/// The defaults follow the module's datasheet timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How long to wait for each response byte, polled in 1 ms steps
    pub response_timeout_ms: u32,
    /// Delay between sending a dust query and reading the reply
    pub query_settle_ms: u32,
    /// Delay between sending the sleep command and reading the reply
    pub sleep_settle_ms: u32,
    /// Delay between sending the wake command and reading the reply
    pub wake_settle_ms: u32,
    /// Failed sync attempts tolerated by a single telemetry availability check
    pub max_sync_failures: usize,
    pub preheat_seconds: u8,
    pub preheat_tick_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            response_timeout_ms: 10,
            query_settle_ms: 1,
            sleep_settle_ms: 20,
            wake_settle_ms: 45,
            max_sync_failures: 3,
            preheat_seconds: 30,
            preheat_tick_ms: 1030,
        }
    }
}
