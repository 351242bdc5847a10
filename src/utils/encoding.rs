use std::io::{self, Read, Write};

/// Encode a u32 as a variable-length integer (7 bits per byte, low first)
pub fn encode_varint(mut value: u32, buf: &mut Vec<u8>) {
    loop {
        if value < 0x80 {
            buf.push(value as u8);
            break;
        }
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
}

/// Write a varint to a stream
pub fn write_varint<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    let mut buf = Vec::with_capacity(5);
    encode_varint(value, &mut buf);
    writer.write_all(&buf)
}

/// Read a varint from a stream
pub fn read_varint<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut result: u32 = 0;
    let mut shift = 0;

    loop {
        if shift >= 35 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "varint too long"));
        }

        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        let byte = byte[0];

        result |= ((byte & 0x7F) as u32).checked_shl(shift).unwrap_or(0);

        if byte & 0x80 == 0 {
            return Ok(result);
        }

        shift += 7;
    }
}

/// Write an i32 in little-endian format
pub fn write_i32_le<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read an i32 in little-endian format
pub fn read_i32_le<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Write a string as varint byte length followed by UTF-8 bytes
pub fn write_string<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    let bytes = value.as_bytes();
    let len = u32::try_from(bytes.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string too long"))?;
    write_varint(writer, len)?;
    writer.write_all(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_roundtrip() {
        let values = [0, 1, 127, 128, 16383, 16384, u32::MAX];
        for value in values {
            let mut buf = Vec::new();
            encode_varint(value, &mut buf);
            assert!(buf.len() <= 5);

            let decoded = read_varint(&mut buf.as_slice()).unwrap();
            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn test_varint_single_byte_lengths() {
        // Short strings carry a one-byte length prefix
        let mut buf = Vec::new();
        write_string(&mut buf, "Code").unwrap();
        assert_eq!(buf, vec![4, b'C', b'o', b'd', b'e']);
    }

    #[test]
    fn test_read_varint_rejects_endless_continuation() {
        let buf = [0xFFu8; 8];
        let err = read_varint(&mut &buf[..]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_i32_le() {
        let mut buf = Vec::new();
        write_i32_le(&mut buf, -1).unwrap();
        assert_eq!(buf, vec![0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(read_i32_le(&mut buf.as_slice()).unwrap(), -1);

        let err = read_i32_le(&mut &buf[..2]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
