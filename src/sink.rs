//! Output sinks for captured command output.
//!
//! The child's combined stdout/stderr stream is delivered in
//! arbitrary-sized chunks; a sink only has to append them in order.
//! Two implementations are provided:
//!
//! - [`BufferSink`] accumulates everything in memory (buffering mode).
//! - [`WriterSink`] forwards each chunk to a caller-owned [`std::io::Write`]
//!   destination immediately, so output of unbounded size never has to fit
//!   in memory (streaming mode).

use std::io;

/// Destination for a command's combined output stream.
pub trait OutputSink {
    /// Append a chunk of output bytes.
    ///
    /// Chunks arrive in stream order but at arbitrary boundaries, not
    /// necessarily line-aligned.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// In-memory accumulating sink, owned by a single invocation.
#[derive(Debug, Default)]
pub struct BufferSink {
    buf: Vec<u8>,
}

impl BufferSink {
    /// Create an empty buffer sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes accumulated so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the sink and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Number of bytes accumulated.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl OutputSink for BufferSink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

/// Sink that forwards every chunk to a caller-owned writer.
///
/// The writer is never closed or repositioned; ownership of the underlying
/// resource stays with the caller (retrieve it back with
/// [`into_inner`](Self::into_inner)).
#[derive(Debug)]
pub struct WriterSink<W: io::Write> {
    inner: W,
}

impl<W: io::Write> WriterSink<W> {
    /// Wrap a writer as an output sink.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Reference to the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> OutputSink for WriterSink<W> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sink_accumulates_chunks() {
        let mut sink = BufferSink::new();
        sink.write(b"Hello ").unwrap();
        sink.write(b"Wor").unwrap();
        sink.write(b"ld\n").unwrap();

        assert_eq!(sink.as_bytes(), b"Hello World\n");
        assert_eq!(sink.len(), 12);
        assert_eq!(sink.into_bytes(), b"Hello World\n".to_vec());
    }

    #[test]
    fn test_buffer_sink_empty() {
        let sink = BufferSink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_buffer_sink_zero_length_write() {
        let mut sink = BufferSink::new();
        sink.write(b"").unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_writer_sink_forwards() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write(b"chunk one ").unwrap();
        sink.write(b"chunk two").unwrap();

        assert_eq!(sink.into_inner(), b"chunk one chunk two".to_vec());
    }

    #[test]
    fn test_writer_sink_error_propagates() {
        struct Failing;
        impl io::Write for Failing {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut sink = WriterSink::new(Failing);
        let err = sink.write(b"data").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
