
use std::io;
use std::io::BufRead;

/// A character or the end of the input.
#[derive(Copy, Clone, PartialEq)]
pub enum ExtChar {
    Char(char),
    EOF,
}

impl ExtChar {
    pub fn get_char(&self) -> Option<char> {
        match *self {
            ExtChar::Char(c) => Some(c),
            ExtChar::EOF => None,
        }
    }
}

/// Reads single characters from a `BufRead` source.
///
/// The source is consumed line by line so that multi-byte characters are
/// always decoded completely before being handed out.
pub struct CharReader<B: BufRead> {
    reader: B,
    line: String,
    byte_index: usize,
}

impl<B: BufRead> CharReader<B> {
    pub fn new(reader: B) -> CharReader<B> {
        CharReader {
            reader,
            line: String::new(),
            byte_index: 0,
        }
    }

    /// Read a single character, or `EOF` once the source is exhausted.
    ///
    /// The underlying `read_line()` might fail, in which case this method
    /// returns the error.
    pub fn read_char(&mut self) -> Result<ExtChar, io::Error> {
        loop {
            if let Some(c) = self.line[self.byte_index..].chars().next() {
                self.byte_index += c.len_utf8();
                return Ok(ExtChar::Char(c));
            }

            self.line.clear();
            self.byte_index = 0;

            let num_bytes = self.reader.read_line(&mut self.line)?;
            if num_bytes == 0 {
                return Ok(ExtChar::EOF);
            }
        }
    }
}
