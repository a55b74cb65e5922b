//! Streaming delimiter-terminated record reader
//!
//! Reads the source in fixed-size chunks and scans a growable buffer for the
//! delimiter, so a multi-gigabyte dump is never resident in memory at once.
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use errors::*;

/// How much to ask the OS for on each refill
const CHUNK_SIZE: usize = 1 << 16;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SourceState {
    Normal,
    Eof,
    Error,
}

/// Stream delimiter-terminated records off a byte source
///
/// Single-use and forward-only, unless the source is seekable and you
/// `rewind()` it.
pub struct LineStreamer<R> {
    source: R,
    delimiter: u8,
    chunk: Vec<u8>,
    /// Bytes read but not yet handed out as a record
    buffer: Vec<u8>,
    /// How far `buffer` has already been scanned for the delimiter
    scanned: usize,
    state: SourceState,
}

impl LineStreamer<File> {
    /// Open a newline-delimited file, naming its role so a missing file
    /// complains usefully.
    pub fn open<P: AsRef<Path>>(path: P, role: &'static str) -> Result<LineStreamer<File>> {
        match File::open(path.as_ref()) {
            Ok(file) => Ok(LineStreamer::new(file, b'\n')),
            Err(err) => Err(Error::MissingFile(role, Some(err))),
        }
    }
}

impl<R: Read> LineStreamer<R> {
    pub fn new(source: R, delimiter: u8) -> LineStreamer<R> {
        LineStreamer::with_chunk_size(source, delimiter, CHUNK_SIZE)
    }

    /// Mostly for exercising chunk-boundary behavior without 64KiB fixtures
    pub fn with_chunk_size(source: R, delimiter: u8, chunk_size: usize) -> LineStreamer<R> {
        LineStreamer {
            source: source,
            delimiter: delimiter,
            chunk: vec![0; chunk_size],
            buffer: vec![],
            scanned: 0,
            state: SourceState::Normal,
        }
    }

    /// The next record, without its delimiter
    ///
    /// A final record with no trailing delimiter is still returned once;
    /// after that only exhaustion is reported.
    pub fn next_line(&mut self) -> Option<String> {
        loop {
            if let Some(at) = self.find_delimiter() {
                let line = String::from_utf8_lossy(&self.buffer[..at]).into_owned();
                self.buffer.drain(..at + 1);
                self.scanned = 0;
                return Some(line);
            }
            if self.state != SourceState::Normal {
                if self.buffer.is_empty() {
                    return None;
                }
                let line = String::from_utf8_lossy(&self.buffer).into_owned();
                self.buffer.clear();
                self.scanned = 0;
                return Some(line);
            }
            self.refill();
        }
    }

    fn find_delimiter(&self) -> Option<usize> {
        let delimiter = self.delimiter;
        self.buffer[self.scanned..]
            .iter()
            .position(|&byte| byte == delimiter)
            .map(|found| self.scanned + found)
    }

    fn refill(&mut self) {
        // Only the new bytes need scanning once they land
        self.scanned = self.buffer.len();
        match self.source.read(&mut self.chunk) {
            Ok(0) => {
                self.state = SourceState::Eof;
            }
            Ok(got) => {
                self.buffer.extend_from_slice(&self.chunk[..got]);
            }
            Err(err) => {
                warn!("Abandoning the input stream mid-read: {}", err);
                self.state = SourceState::Error;
            }
        }
    }
}

impl<R: Read + Seek> LineStreamer<R> {
    /// Restart from the top of the source
    pub fn rewind(&mut self) -> Result<()> {
        self.source.seek(SeekFrom::Start(0))?;
        self.buffer.clear();
        self.scanned = 0;
        self.state = SourceState::Normal;
        Ok(())
    }
}

impl<R: Read> Iterator for LineStreamer<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::Error;
    use std::io::Cursor;

    fn streamer(doc: &str, chunk_size: usize) -> LineStreamer<Cursor<Vec<u8>>> {
        LineStreamer::with_chunk_size(Cursor::new(doc.as_bytes().to_vec()), b'\n', chunk_size)
    }

    #[test]
    fn yields_each_record_without_the_delimiter() {
        let mut lines = streamer("one\ntwo\nthree\n", 4);
        assert_eq!(lines.next_line(), Some("one".to_string()));
        assert_eq!(lines.next_line(), Some("two".to_string()));
        assert_eq!(lines.next_line(), Some("three".to_string()));
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.next_line(), None);
    }

    #[test]
    fn final_record_without_delimiter_comes_back_once() {
        let mut lines = streamer("one\ntwo", 3);
        assert_eq!(lines.next_line(), Some("one".to_string()));
        assert_eq!(lines.next_line(), Some("two".to_string()));
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.next_line(), None);
    }

    #[test]
    fn delimiter_split_across_chunk_reads() {
        // Chunks of 2 land as "ab", "\nc", "d"
        let collected: Vec<String> = streamer("ab\ncd", 2).collect();
        assert_eq!(collected, vec!["ab".to_string(), "cd".to_string()]);
    }

    #[test]
    fn record_longer_than_a_chunk() {
        let collected: Vec<String> = streamer("abcdef\ng", 2).collect();
        assert_eq!(collected, vec!["abcdef".to_string(), "g".to_string()]);
    }

    #[test]
    fn empty_source_is_immediately_exhausted() {
        assert_eq!(streamer("", 4).next_line(), None);
    }

    #[test]
    fn blank_records_are_real_records() {
        let collected: Vec<String> = streamer("a\n\nb\n", 4).collect();
        assert_eq!(collected, vec!["a".to_string(), "".to_string(), "b".to_string()]);
    }

    #[test]
    fn rewind_restarts_the_source() {
        let mut lines = streamer("one\ntwo", 4);
        while let Some(_) = lines.next_line() {}
        lines.rewind().unwrap();
        assert_eq!(lines.next_line(), Some("one".to_string()));
        assert_eq!(lines.next_line(), Some("two".to_string()));
        assert_eq!(lines.next_line(), None);
    }

    #[test]
    fn missing_file_fails_construction() {
        match LineStreamer::open("definitely/not/a/real/path.csv", "tweet word dump") {
            Err(Error::MissingFile(role, _)) => assert_eq!(role, "tweet word dump"),
            _ => panic!("expected a missing file complaint"),
        }
    }
}
