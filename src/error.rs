use core::fmt;

/// Errors returned by the sensor driver
///
/// `E` is the error type of the underlying [`Transport`](crate::Transport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The transport failed to read or write
    Serial(E),
    /// A complete response arrived but its checksum did not match
    Checksum,
    /// No byte arrived within the response timeout
    Timeout,
    /// The module answered but refused the requested mode
    CommandRejected,
    /// The response passed the checksum but answers a different command
    UnexpectedReply,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Serial(e) => write!(f, "serial error: {:?}", e),
            Error::Checksum => f.write_str("response checksum mismatch"),
            Error::Timeout => f.write_str("timed out waiting for response"),
            Error::CommandRejected => f.write_str("module rejected the command"),
            Error::UnexpectedReply => f.write_str("unexpected reply"),
        }
    }
}
