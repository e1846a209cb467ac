//! Response body
//!
//! File-backed bodies keep the open handle together with the number of bytes
//! still to be sent. The handle is released when the body is drained or
//! dropped, so an aborted request never leaks it.

use std::fs::File;
use std::io::{self, Read};

use hyper::body::Bytes;

#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    /// In-memory content (generated pages, error messages, plugin output).
    Bytes(Bytes),
    /// File positioned at the first byte to send, limited to `len` bytes.
    File { file: File, len: u64 },
}

impl Body {
    /// Number of bytes this body will produce
    pub fn len(&self) -> u64 {
        match self {
            Self::Empty => 0,
            Self::Bytes(b) => b.len() as u64,
            Self::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the body into memory, consuming the file handle if any.
    ///
    /// A file that turns out shorter than announced yields the bytes that
    /// were available; read errors are returned to the caller.
    pub fn into_bytes(self) -> io::Result<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Bytes(b) => Ok(b),
            Self::File { file, len } => {
                let mut buf = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
                file.take(len).read_to_end(&mut buf)?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Self::Bytes(Bytes::from(s))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Self::Bytes(Bytes::from_static(s.as_bytes()))
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(v))
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Self::Bytes(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};

    #[test]
    fn test_len() {
        assert_eq!(Body::Empty.len(), 0);
        assert!(Body::Empty.is_empty());
        assert_eq!(Body::from("hello").len(), 5);
    }

    #[test]
    fn test_file_body_respects_budget() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"0123456789").unwrap();
        file.seek(SeekFrom::Start(3)).unwrap();

        let body = Body::File { file, len: 4 };
        assert_eq!(body.len(), 4);
        assert_eq!(body.into_bytes().unwrap(), "3456");
    }

    #[test]
    fn test_file_body_shorter_than_announced() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"abc").unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let body = Body::File { file, len: 100 };
        assert_eq!(body.into_bytes().unwrap(), "abc");
    }
}
