//! Minimal RFC 4180 record reader

use std::io::BufRead;

#[derive(Debug)]
pub(crate) enum RecordError {
    Io(std::io::Error),
    /// A quoted field was still open at end of input
    Unterminated { line: usize },
}

impl From<std::io::Error> for RecordError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Reads one CSV record at a time.
///
/// Quoted fields may contain commas, doubled quotes and line breaks. Blank
/// lines between records are skipped.
pub(crate) struct RecordReader<R> {
    inner: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> RecordReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Next record with the line number it starts on
    pub(crate) fn next_record(&mut self) -> Result<Option<(usize, Vec<String>)>, RecordError> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut start = None;

        loop {
            self.buf.clear();
            if self.inner.read_line(&mut self.buf)? == 0 {
                return match start {
                    Some(line) if in_quotes => Err(RecordError::Unterminated { line }),
                    Some(line) => {
                        fields.push(field);
                        Ok(Some((line, fields)))
                    }
                    None => Ok(None),
                };
            }
            self.line += 1;

            if start.is_none() {
                if self.buf.trim_end_matches(['\r', '\n']).is_empty() {
                    continue;
                }
                start = Some(self.line);
            }

            let mut chars = self.buf.chars().peekable();
            while let Some(c) = chars.next() {
                if in_quotes {
                    if c == '"' {
                        if chars.peek() == Some(&'"') {
                            field.push('"');
                            chars.next();
                        } else {
                            in_quotes = false;
                        }
                    } else {
                        field.push(c);
                    }
                    continue;
                }

                match c {
                    '"' if field.is_empty() => in_quotes = true,
                    ',' => fields.push(std::mem::take(&mut field)),
                    '\r' | '\n' => {}
                    _ => field.push(c),
                }
            }

            if !in_quotes {
                fields.push(field);
                return Ok(start.map(|line| (line, fields)));
            }
        }
    }
}
