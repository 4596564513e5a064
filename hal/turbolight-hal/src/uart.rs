//! UART serial receive abstraction
//!
//! The image ingest path polls for bytes between busy-wait slices so it can
//! give up on a stalled sender. The receiver is therefore non-blocking.

/// Non-blocking UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Take one byte if one is waiting
    ///
    /// Returns `Ok(None)` immediately when nothing has arrived.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

impl<T: UartRx + ?Sized> UartRx for &mut T {
    type Error = T::Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        T::try_read_byte(self)
    }
}

/// Adapter for any `embedded-io` reader that can report readiness
pub struct IoRx<R>(pub R);

impl<R> UartRx for IoRx<R>
where
    R: embedded_io::Read + embedded_io::ReadReady,
{
    type Error = R::Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.0.read_ready()? {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        match self.0.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_io::{ErrorType, Read, ReadReady};

    struct SliceReader<'a> {
        data: &'a [u8],
    }

    impl ErrorType for SliceReader<'_> {
        type Error = Infallible;
    }

    impl Read for SliceReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    impl ReadReady for SliceReader<'_> {
        fn read_ready(&mut self) -> Result<bool, Infallible> {
            Ok(!self.data.is_empty())
        }
    }

    #[test]
    fn test_io_rx_drains_then_reports_empty() {
        let mut rx = IoRx(SliceReader { data: &[0xAA, 0x01] });
        assert_eq!(rx.try_read_byte(), Ok(Some(0xAA)));
        assert_eq!(rx.try_read_byte(), Ok(Some(0x01)));
        assert_eq!(rx.try_read_byte(), Ok(None));
        assert_eq!(rx.try_read_byte(), Ok(None));
    }
}
