// crc.rs — 32-bit CRC (polynomial 0x04C11DB7, reflected, ISO-HDLC parameters)
// Converted from: utils.h crc_32() prototype
// Delegates to the `crc` crate, the way the 16-bit checksum does elsewhere
// in this workspace.

use crc::{Crc, CRC_32_ISO_HDLC};

const CRC_CALC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Compute the CRC-32 of a block of data.
pub fn crc_32(data: &[u8]) -> u32 {
    CRC_CALC.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value_matches_standard_vector() {
        // Standard check value for CRC-32/ISO-HDLC computed over "123456789".
        assert_eq!(crc_32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn empty_input_is_stable() {
        let crc = crc_32(&[]);
        assert_eq!(crc, crc_32(&[]));
    }

    #[test]
    fn differs_for_different_inputs() {
        assert_ne!(crc_32(b"abc"), crc_32(b"abd"));
    }
}
