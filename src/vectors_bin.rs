//! Compact binary cache for word vectors.
//!
//! Layout, all little-endian:
//! `b"WVEC"`, version `u32`, word count `u32`, dims `u32`,
//! then per word a `u32` byte length followed by UTF-8 bytes,
//! then the flattened `f64` matrix, one row per word in the same order.

use crate::error::VectorsError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

pub const MAGIC: [u8; 4] = *b"WVEC";
pub const VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub words: u32,
    pub dims: u32,
}

impl Header {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_u32::<LittleEndian>(VERSION)?;
        writer.write_u32::<LittleEndian>(self.words)?;
        writer.write_u32::<LittleEndian>(self.dims)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, VectorsError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC || reader.read_u32::<LittleEndian>()? != VERSION {
            return Err(VectorsError::BadHeader);
        }
        let words = reader.read_u32::<LittleEndian>()?;
        let dims = reader.read_u32::<LittleEndian>()?;
        Ok(Header { words, dims })
    }
}

/// Write a vocabulary and its flattened row-major matrix.
pub fn write_vectors<W: Write>(
    writer: &mut W,
    words: &[String],
    dims: usize,
    vectors: &[f64],
) -> io::Result<()> {
    let too_big =
        |what: &str| io::Error::new(io::ErrorKind::InvalidInput, format!("{what} exceeds u32"));
    let header = Header {
        words: u32::try_from(words.len()).map_err(|_| too_big("word count"))?,
        dims: u32::try_from(dims).map_err(|_| too_big("dimension"))?,
    };
    header.write_to(writer)?;

    for word in words {
        let bytes = word.as_bytes();
        let len = u32::try_from(bytes.len()).map_err(|_| too_big("word length"))?;
        writer.write_u32::<LittleEndian>(len)?;
        writer.write_all(bytes)?;
    }

    // The on-disk order is little-endian, which is the in-memory order on LE hosts.
    if cfg!(target_endian = "little") {
        writer.write_all(bytemuck::cast_slice(vectors))?;
    } else {
        for &v in vectors {
            writer.write_f64::<LittleEndian>(v)?;
        }
    }
    Ok(())
}

/// Read back what [`write_vectors`] produced: `(words, dims, vectors)`.
///
/// `byte_len` is the size of the whole input. A header that claims more
/// rows than that many bytes can hold is rejected before anything is
/// allocated for them.
pub fn read_vectors<R: Read>(
    reader: &mut R,
    byte_len: u64,
) -> Result<(Vec<String>, usize, Vec<f64>), VectorsError> {
    let header = Header::read_from(reader)?;
    if header.dims == 0 {
        return Err(VectorsError::ZeroDimensions);
    }
    if header.words == 0 {
        return Err(VectorsError::Empty);
    }
    let num_words = header.words as usize;
    let dims = header.dims as usize;
    let total = num_words
        .checked_mul(dims)
        .ok_or(VectorsError::BadHeader)?;

    // 16 header bytes, a length per word, eight bytes per value.
    let needed = u64::from(header.words)
        .checked_mul(u64::from(header.dims))
        .and_then(|n| n.checked_mul(8))
        .and_then(|n| n.checked_add(16 + 4 * u64::from(header.words)))
        .ok_or(VectorsError::BadHeader)?;
    if needed > byte_len {
        return Err(VectorsError::BadHeader);
    }

    let mut words = Vec::with_capacity(num_words.min(1 << 16));
    for index in 0..num_words {
        let len = reader.read_u32::<LittleEndian>()?;
        let mut bytes = Vec::new();
        (&mut *reader).take(u64::from(len)).read_to_end(&mut bytes)?;
        if bytes.len() != len as usize {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        let word = String::from_utf8(bytes).map_err(|_| VectorsError::BadWord { index })?;
        words.push(word);
    }

    let mut vectors = vec![0.0f64; total];
    reader.read_f64_into::<LittleEndian>(&mut vectors)?;
    Ok((words, dims, vectors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_rejects_wrong_magic() {
        let mut data = Cursor::new(b"GLOV\x01\x00\x00\x00".to_vec());
        assert!(matches!(
            Header::read_from(&mut data),
            Err(VectorsError::BadHeader)
        ));
    }

    #[test]
    fn matrix_survives_a_write_read_cycle() {
        let words = vec!["red".to_string(), "blåbær".to_string()];
        let vectors = vec![1.0, -2.5, 0.125, 3.0];
        let mut buf = Vec::new();
        write_vectors(&mut buf, &words, 2, &vectors).unwrap();

        let len = buf.len() as u64;
        let (w, dims, v) = read_vectors(&mut Cursor::new(buf), len).unwrap();
        assert_eq!(w, words);
        assert_eq!(dims, 2);
        assert_eq!(v, vectors);
    }

    #[test]
    fn truncated_matrix_is_an_io_error() {
        let words = vec!["a".to_string()];
        let mut buf = Vec::new();
        write_vectors(&mut buf, &words, 3, &[1.0, 2.0, 3.0]).unwrap();
        buf.truncate(buf.len() - 4);
        // a caller that trusts the header still gets an error, not a panic
        assert!(matches!(
            read_vectors(&mut Cursor::new(buf), u64::MAX),
            Err(VectorsError::Io(_))
        ));
    }

    fn header_only(words: u32, dims: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        Header { words, dims }.write_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn header_larger_than_input_is_rejected() {
        let buf = header_only(u32::MAX, u32::MAX);
        let len = buf.len() as u64;
        assert!(matches!(
            read_vectors(&mut Cursor::new(buf), len),
            Err(VectorsError::BadHeader)
        ));

        // one word short of what the header promises
        let mut buf = Vec::new();
        write_vectors(&mut buf, &["a".to_string()], 2, &[1.0, 2.0]).unwrap();
        buf[8] = 2;
        let len = buf.len() as u64;
        assert!(matches!(
            read_vectors(&mut Cursor::new(buf), len),
            Err(VectorsError::BadHeader)
        ));
    }

    #[test]
    fn oversized_word_length_hits_end_of_input() {
        let mut buf = header_only(1, 1);
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        buf.extend_from_slice(b"abc");
        let err = read_vectors(&mut Cursor::new(buf), u64::MAX).unwrap_err();
        assert!(matches!(
            err,
            VectorsError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof
        ));
    }
}
