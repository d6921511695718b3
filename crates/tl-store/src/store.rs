//! Byte-level backing stores for task repositories.
//!
//! A [`Store`] hands out short-lived reader and writer handles. Each handle
//! is a scoped value: dropping it releases the underlying file, on success
//! and error paths alike. Writers must be flushed by the caller so that
//! write errors surface instead of being swallowed on drop.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A backing store that can be read from the start, appended to, or rewritten.
pub trait Store {
    /// Opens the store positioned at its beginning.
    ///
    /// Returns `None` when nothing has been written yet.
    fn open_read(&mut self) -> io::Result<Option<Box<dyn BufRead + '_>>>;

    /// Opens the store positioned after its last byte.
    fn open_append(&mut self) -> io::Result<Box<dyn Write + '_>>;

    /// Empties the store and opens it positioned at the beginning.
    fn open_rewrite(&mut self) -> io::Result<Box<dyn Write + '_>>;
}

/// A store backed by a file that is reopened for every operation.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&self, options: &mut OpenOptions) -> io::Result<Box<dyn Write + '_>> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&self.path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

impl Store for FileStore {
    fn open_read(&mut self) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "store file does not exist yet");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn open_append(&mut self) -> io::Result<Box<dyn Write + '_>> {
        self.writer(OpenOptions::new().create(true).append(true))
    }

    fn open_rewrite(&mut self) -> io::Result<Box<dyn Write + '_>> {
        self.writer(OpenOptions::new().create(true).write(true).truncate(true))
    }
}

/// An in-memory, seekable store.
#[derive(Debug, Clone, Default)]
pub struct BufferStore {
    buffer: Cursor<Vec<u8>>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `bytes`, positioned at its end.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let position = bytes.len() as u64;
        let mut buffer = Cursor::new(bytes);
        buffer.set_position(position);
        Self { buffer }
    }

    pub fn contents(&self) -> &[u8] {
        self.buffer.get_ref()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer.into_inner()
    }
}

impl Store for BufferStore {
    fn open_read(&mut self) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        self.buffer.rewind()?;
        Ok(Some(Box::new(&mut self.buffer)))
    }

    fn open_append(&mut self) -> io::Result<Box<dyn Write + '_>> {
        self.buffer.seek(SeekFrom::End(0))?;
        Ok(Box::new(&mut self.buffer))
    }

    fn open_rewrite(&mut self) -> io::Result<Box<dyn Write + '_>> {
        self.buffer.get_mut().clear();
        self.buffer.set_position(0);
        Ok(Box::new(&mut self.buffer))
    }
}

/// A non-seekable stream, such as a pipe.
///
/// No positioning is attempted: reads continue from wherever the stream
/// currently is, and rewrites cannot truncate what was written before.
#[derive(Debug)]
pub struct StreamStore<S> {
    stream: S,
}

impl<S: Read + Write> StreamStore<S> {
    pub const fn new(stream: S) -> Self {
        Self { stream }
    }

    pub const fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write> Store for StreamStore<S> {
    fn open_read(&mut self) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        Ok(Some(Box::new(BufReader::new(&mut self.stream))))
    }

    fn open_append(&mut self) -> io::Result<Box<dyn Write + '_>> {
        Ok(Box::new(&mut self.stream))
    }

    fn open_rewrite(&mut self) -> io::Result<Box<dyn Write + '_>> {
        Ok(Box::new(&mut self.stream))
    }
}
