//! Key/value dictionary wire format
//!
//! ```text
//! count: u8
//! count × { key: u32 LE, type: u8, length: u16 LE, value: [u8; length] }
//! ```
//!
//! Types are 0 = byte array, 1 = C string (NUL terminated), 2 = unsigned
//! and 3 = signed integer. Integers are little endian, 1, 2 or 4 bytes wide.

use super::Error;

const TYPE_BYTES: u8 = 0;
const TYPE_CSTRING: u8 = 1;
const TYPE_UINT: u8 = 2;
const TYPE_INT: u8 = 3;

const HEADER_LEN: usize = 1;
const TUPLE_HEADER_LEN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Bytes(&'a [u8]),
    CString(&'a str),
    UInt(u32),
    Int(i32),
}

impl<'a> Value<'a> {
    /// Integer value, if it is one and fits into an `i32`
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Value::Int(value) => Some(value),
            Value::UInt(value) => i32::try_from(value).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::CString(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple<'a> {
    pub key: u32,
    pub value: Value<'a>,
}

/// A validated, borrowed dictionary
#[derive(Debug, Clone, Copy)]
pub struct Dictionary<'a> {
    count: u8,
    tuples: &'a [u8],
}

impl<'a> Dictionary<'a> {
    /// Validate the framing of every tuple.
    ///
    /// Trailing bytes after the last tuple are rejected.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, Error> {
        let (&count, tuples) = bytes.split_first().ok_or(Error::Malformed)?;

        let mut rest = tuples;
        for _ in 0..count {
            let (_, next) = decode_tuple(rest)?;
            rest = next;
        }
        if !rest.is_empty() {
            return Err(Error::Malformed);
        }

        Ok(Self { count, tuples })
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> Iter<'a> {
        Iter {
            remaining: self.count,
            data: self.tuples,
        }
    }

    /// Value of the first tuple with `key`
    pub fn find(&self, key: u32) -> Option<Value<'a>> {
        self.iter()
            .find(|tuple| tuple.key == key)
            .map(|tuple| tuple.value)
    }
}

impl<'a> IntoIterator for &Dictionary<'a> {
    type Item = Tuple<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

pub struct Iter<'a> {
    remaining: u8,
    data: &'a [u8],
}

impl<'a> Iterator for Iter<'a> {
    type Item = Tuple<'a>;

    fn next(&mut self) -> Option<Tuple<'a>> {
        if self.remaining == 0 {
            return None;
        }
        // Framing was checked in `Dictionary::parse`
        let (tuple, rest) = decode_tuple(self.data).ok()?;
        self.remaining -= 1;
        self.data = rest;
        Some(tuple)
    }
}

fn decode_tuple(data: &[u8]) -> Result<(Tuple<'_>, &[u8]), Error> {
    if data.len() < TUPLE_HEADER_LEN {
        return Err(Error::Malformed);
    }
    let key = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let kind = data[4];
    let length = u16::from_le_bytes([data[5], data[6]]) as usize;

    let body = &data[TUPLE_HEADER_LEN..];
    if body.len() < length {
        return Err(Error::Malformed);
    }
    let (raw, rest) = body.split_at(length);

    let value = match kind {
        TYPE_BYTES => Value::Bytes(raw),
        TYPE_CSTRING => {
            let text = match raw.iter().position(|&b| b == 0) {
                Some(end) => &raw[..end],
                None => raw,
            };
            Value::CString(core::str::from_utf8(text).map_err(|_| Error::Malformed)?)
        }
        TYPE_UINT => Value::UInt(match *raw {
            [a] => a as u32,
            [a, b] => u16::from_le_bytes([a, b]) as u32,
            [a, b, c, d] => u32::from_le_bytes([a, b, c, d]),
            _ => return Err(Error::Malformed),
        }),
        TYPE_INT => Value::Int(match *raw {
            [a] => a as i8 as i32,
            [a, b] => i16::from_le_bytes([a, b]) as i32,
            [a, b, c, d] => i32::from_le_bytes([a, b, c, d]),
            _ => return Err(Error::Malformed),
        }),
        _ => return Err(Error::Malformed),
    };

    Ok((Tuple { key, value }, rest))
}

/// Builds a dictionary in a caller provided buffer
pub struct DictWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    count: u8,
}

impl<'a> DictWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Result<Self, Error> {
        if buf.len() < HEADER_LEN {
            return Err(Error::BufferOverflow);
        }
        Ok(Self {
            buf,
            len: HEADER_LEN,
            count: 0,
        })
    }

    pub fn write_u8(&mut self, key: u32, value: u8) -> Result<(), Error> {
        self.write_tuple(key, TYPE_UINT, &[value], &[])
    }

    pub fn write_int(&mut self, key: u32, value: i32) -> Result<(), Error> {
        self.write_tuple(key, TYPE_INT, &value.to_le_bytes(), &[])
    }

    /// Written with a trailing NUL
    pub fn write_cstring(&mut self, key: u32, value: &str) -> Result<(), Error> {
        self.write_tuple(key, TYPE_CSTRING, value.as_bytes(), &[0])
    }

    /// Write the tuple count and return the encoded dictionary
    pub fn finish(self) -> &'a [u8] {
        let DictWriter { buf, len, count } = self;
        buf[0] = count;
        &buf[..len]
    }

    fn write_tuple(&mut self, key: u32, kind: u8, value: &[u8], suffix: &[u8]) -> Result<(), Error> {
        let length = value.len() + suffix.len();
        let length_field = u16::try_from(length).map_err(|_| Error::BufferOverflow)?;
        let end = self.len + TUPLE_HEADER_LEN + length;
        if end > self.buf.len() || self.count == u8::MAX {
            return Err(Error::BufferOverflow);
        }

        let tuple = &mut self.buf[self.len..end];
        tuple[..4].copy_from_slice(&key.to_le_bytes());
        tuple[4] = kind;
        tuple[5..7].copy_from_slice(&length_field.to_le_bytes());
        tuple[7..7 + value.len()].copy_from_slice(value);
        tuple[7 + value.len()..].copy_from_slice(suffix);

        self.len = end;
        self.count += 1;
        Ok(())
    }
}
