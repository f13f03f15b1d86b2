use crate::ir::types::ByteFrame;

/// Mirrors a byte so bit 7 becomes bit 0.
pub const fn reverse_bits(byte: u8) -> u8 {
    byte.reverse_bits()
}

/// Frames are built least significant bit first but go out on the wire most
/// significant bit first.
pub fn to_transmit_order<T: AsRef<[u8]>>(frame: T) -> ByteFrame {
    ByteFrame(frame.as_ref().iter().copied().map(reverse_bits).collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reverse_is_an_involution() {
        for b in 0..=u8::MAX {
            assert_eq!(reverse_bits(reverse_bits(b)), b);
        }
    }

    #[test]
    fn reverse_known_values() {
        assert_eq!(reverse_bits(0x01), 0x80);
        assert_eq!(reverse_bits(0x11), 0x88);
        assert_eq!(reverse_bits(0xDA), 0x5B);
        assert_eq!(reverse_bits(0x27), 0xE4);
        assert_eq!(reverse_bits(0x00), 0x00);
        assert_eq!(reverse_bits(0xFF), 0xFF);
    }

    #[test]
    fn transmit_order_keeps_length_and_order() {
        let msb = to_transmit_order([0x11, 0xDA, 0x27, 0x00]);
        assert_eq!(msb, ByteFrame(vec![0x88, 0x5B, 0xE4, 0x00]));
    }
}
