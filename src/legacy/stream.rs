//! Body streams owned by the legacy host.
//!
//! A [`BodyStream`] is a handle: the bridge aliases it, it never copies the
//! bytes. Reads consume from a cursor, writes append, both through
//! `tokio::io` so the modern side can use `AsyncReadExt`/`AsyncWriteExt`.

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use crate::sync;

#[derive(Debug, Default)]
struct Buffer {
    data: Vec<u8>,
    cursor: usize,
    closed: bool,
}

/// Shared in-memory body stream.
#[derive(Debug, Clone, Default)]
pub struct BodyStream {
    inner: Arc<Mutex<Buffer>>,
}

impl BodyStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream pre-filled with `data`, positioned at the start.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Buffer {
                data: data.into(),
                ..Buffer::default()
            })),
        }
    }

    /// Everything written so far, independent of the read cursor.
    pub fn contents(&self) -> Vec<u8> {
        sync::lock(&self.inner).data.clone()
    }

    pub fn len(&self) -> usize {
        sync::lock(&self.inner).data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        sync::lock(&self.inner).closed
    }

    /// Returns true if both handles alias the same stream.
    pub fn ptr_eq(&self, other: &BodyStream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl AsyncRead for BodyStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut inner = sync::lock(&self.inner);
        let start = inner.cursor;
        let n = buf.remaining().min(inner.data.len() - start);
        buf.put_slice(&inner.data[start..start + n]);
        inner.cursor += n;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for BodyStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut inner = sync::lock(&self.inner);
        if inner.closed {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "body stream is closed",
            )));
        }
        inner.data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        sync::lock(&self.inner).closed = true;
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_read_and_write_through_aliases() {
        let stream = BodyStream::from_bytes("hello");
        let mut alias = stream.clone();

        let mut read = String::new();
        alias.read_to_string(&mut read).await.unwrap();
        assert_eq!(read, "hello");

        alias.write_all(b" world").await.unwrap();
        assert_eq!(stream.contents(), b"hello world");
        assert!(stream.ptr_eq(&alias));
    }

    #[tokio::test]
    async fn test_write_after_shutdown_fails() {
        let mut stream = BodyStream::new();
        stream.shutdown().await.unwrap();
        assert!(stream.is_closed());
        assert!(stream.write_all(b"late").await.is_err());
    }
}
