//! Binary encoding helpers: LEB128 integers and IEEE-754 floats.
//!
//! Pure functions with no shared state. Both integer encoders produce the
//! minimal byte count for a value; the matching decoders exist for the
//! round-trip tests and accept exactly what the encoders produce.

/// Encode an unsigned integer as LEB128. Used for every length, count, and
/// index field in the module.
pub fn unsigned_leb128(mut value: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
        if value == 0 {
            return bytes;
        }
    }
}

/// Encode a signed integer as LEB128 with two's-complement sign extension.
///
/// Termination is decided by arithmetic-shifting the remainder and checking
/// the pending sign bit, so power-of-two magnitudes (64, 128, ...) encode
/// minimally; a bit-count heuristic gets exactly those wrong.
pub fn signed_leb128(mut value: i32) -> Vec<u8> {
    let mut bytes = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        let done = (value == 0 && byte & 0x40 == 0) || (value == -1 && byte & 0x40 != 0);
        bytes.push(if done { byte } else { byte | 0x80 });
        if done {
            return bytes;
        }
    }
}

/// Encode a float as 4 little-endian IEEE-754 single-precision bytes.
pub fn ieee754_f32(value: f32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Decode an unsigned LEB128 integer from the front of `bytes`.
/// Returns the value and the number of bytes consumed.
pub fn decode_unsigned(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        value |= u32::from(byte & 0x7f) << (7 * i as u32);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

/// Decode a signed LEB128 integer from the front of `bytes`.
/// Returns the value and the number of bytes consumed.
pub fn decode_signed(bytes: &[u8]) -> Option<(i32, usize)> {
    let mut value: i32 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let shift = 7 * i as u32;
        value |= i32::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            if shift + 7 < 32 && byte & 0x40 != 0 {
                value |= -1i32 << (shift + 7);
            }
            return Some((value, i + 1));
        }
    }
    None
}
