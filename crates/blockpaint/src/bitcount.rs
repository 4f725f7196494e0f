//! Population count lookup for pixel rows.

/// Number of set bits for every byte value, built at compile time.
pub const BIT_COUNT: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut byte = 0;
    while byte < 256 {
        let mut value = byte;
        let mut count = 0u8;
        while value != 0 {
            count += (value & 1) as u8;
            value >>= 1;
        }
        table[byte] = count;
        byte += 1;
    }
    table
}

/// Number of set pixels in one row byte.
#[inline]
pub fn bit_count(byte: u8) -> u32 {
    BIT_COUNT[byte as usize] as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_count_ones() {
        for byte in 0..=255u8 {
            assert_eq!(bit_count(byte), byte.count_ones(), "byte {byte:#04x}");
        }
    }

    #[test]
    fn test_edges() {
        assert_eq!(bit_count(0x00), 0);
        assert_eq!(bit_count(0xff), 8);
        assert_eq!(bit_count(0x81), 2);
    }
}
