//! Bare-bones CSV decoding
//!
//! The dumps this reads are machine-written: comma separated, at most one
//! layer of quoting, never an embedded separator. So: split on commas, strip
//! enclosing quotes, zip positionally with the header. Embedded separators
//! and escaped quotes are not handled.
use std::io::Read;
use errors::*;
use farm::{self, FarmMap};
use stream::LineStreamer;

const SEPARATOR: char = ',';
const QUOTE: char = '"';

/// One decoded row, header name to field value
///
/// Short rows leave their trailing headers absent rather than empty, so
/// callers can tell a missing column from a blank one.
pub struct Row {
    fields: FarmMap<String, String>,
}

impl Row {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|value| value.as_str())
    }
}

/// Decode rows off a line streamer, using the first record as the header
pub struct RowReader<R> {
    lines: LineStreamer<R>,
    headers: Vec<String>,
}

impl<R: Read> RowReader<R> {
    pub fn new(mut lines: LineStreamer<R>) -> Result<RowReader<R>> {
        let header = match lines.next_line() {
            Some(line) => line,
            None => {
                return Err(Error::Other(
                    "The input ended before a header row; there is no schema to decode against."
                        .to_string()));
            }
        };
        Ok(RowReader {
            headers: split_fields(&header),
            lines: lines,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The next data row
    ///
    /// No field-count validation: extra fields beyond the header are dropped
    /// by the zip, missing trailing fields simply never appear in the row.
    pub fn next_row(&mut self) -> Option<Row> {
        let line = match self.lines.next_line() {
            Some(line) => line,
            None => return None,
        };
        let mut fields = farm::new_farm();
        for (name, value) in self.headers.iter().zip(split_fields(&line)) {
            fields.insert(name.clone(), value);
        }
        Some(Row { fields: fields })
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.next_row()
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(SEPARATOR)
        .map(|field| unquote(field).to_string())
        .collect()
}

/// Strip one layer of enclosing quotes, nothing more
fn unquote(field: &str) -> &str {
    if field.len() >= 2 && field.starts_with(QUOTE) && field.ends_with(QUOTE) {
        &field[1..field.len() - 1]
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use stream::LineStreamer;

    fn reader(doc: &str) -> RowReader<Cursor<Vec<u8>>> {
        let lines = LineStreamer::new(Cursor::new(doc.as_bytes().to_vec()), b'\n');
        RowReader::new(lines).unwrap()
    }

    #[test]
    fn maps_fields_by_header_position() {
        let mut rows = reader("word,favoriteCount,id\nnato,12,817\n");
        assert_eq!(rows.headers(), &["word".to_string(),
                                     "favoriteCount".to_string(),
                                     "id".to_string()]);
        let row = rows.next_row().unwrap();
        assert_eq!(row.get("word"), Some("nato"));
        assert_eq!(row.get("favoriteCount"), Some("12"));
        assert_eq!(row.get("id"), Some("817"));
        assert_eq!(row.get("retweetCount"), None);
        assert!(rows.next_row().is_none());
    }

    #[test]
    fn strips_one_layer_of_enclosing_quotes() {
        let row = reader("w,x,y,z\n\"hi\",,\"\",x\"y\n").next_row().unwrap();
        assert_eq!(row.get("w"), Some("hi"));
        assert_eq!(row.get("x"), Some(""));
        assert_eq!(row.get("y"), Some(""));
        // Not enclosing, so untouched
        assert_eq!(row.get("z"), Some("x\"y"));
    }

    #[test]
    fn short_rows_leave_missing_keys_absent() {
        let row = reader("a,b,c\n1,2\n").next_row().unwrap();
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), Some("2"));
        assert_eq!(row.get("c"), None);
    }

    #[test]
    fn extra_fields_are_dropped() {
        let row = reader("a,b\n1,2,3,4\n").next_row().unwrap();
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), Some("2"));
    }

    #[test]
    fn source_without_a_header_is_an_error() {
        let lines = LineStreamer::new(Cursor::new(Vec::new()), b'\n');
        assert!(RowReader::new(lines).is_err());
    }

    #[test]
    fn header_only_input_yields_no_rows() {
        assert!(reader("a,b,c\n").next_row().is_none());
    }
}
