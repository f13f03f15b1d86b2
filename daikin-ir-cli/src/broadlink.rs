use base64::{engine::general_purpose::STANDARD, Engine as _};
use daikin_ir::ir::types::{IrPulse, IrSequence};
use num_traits::AsPrimitive;

const IR_PACKET: u8 = 0x26;
const TRAILER: [u8; 2] = [0x0D, 0x05];
const BLOCK: usize = 16;

/// Broadlink counts time in units of 8192/269 microseconds.
fn ticks(pulse: IrPulse) -> u16 {
    let ticks = (AsPrimitive::<f64>::as_(pulse).abs() * 269.0 / 8192.0).round();
    if ticks > u16::MAX as f64 {
        u16::MAX
    } else {
        ticks as u16
    }
}

/// Packs a pulse sequence into a Broadlink IR packet.
pub fn packet(seq: &IrSequence, repeat: u8) -> Vec<u8> {
    let mut payload = Vec::with_capacity(seq.len() + TRAILER.len());
    for pulse in seq.as_ref() {
        match ticks(*pulse) {
            t if t < 256 => payload.push(t as u8),
            t => {
                payload.push(0x00);
                payload.extend(t.to_be_bytes());
            }
        }
    }
    payload.extend(TRAILER);

    let mut packet = vec![IR_PACKET, repeat];
    packet.extend((payload.len() as u16).to_le_bytes());
    packet.extend(payload);

    let rem = packet.len() % BLOCK;
    if rem != 0 {
        packet.resize(packet.len() + BLOCK - rem, 0x00);
    }
    packet
}

pub fn base64_code(seq: &IrSequence, repeat: u8) -> String {
    STANDARD.encode(packet(seq, repeat))
}

#[cfg(test)]
mod test {
    use super::*;

    fn seq(raw: &[i32]) -> IrSequence {
        IrSequence(raw.iter().copied().map(IrPulse).collect())
    }

    #[test]
    fn tick_conversion() {
        assert_eq!(ticks(IrPulse(435)), 14);
        assert_eq!(ticks(IrPulse(-1300)), 43);
        assert_eq!(ticks(IrPulse(3500)), 115);
        assert_eq!(ticks(IrPulse(-24900)), 818);
        assert_eq!(ticks(IrPulse(-34900)), 1146);
    }

    #[test]
    fn short_and_long_pulses() {
        let p = packet(&seq(&[435, -435, -34900]), 0);
        assert_eq!(
            &p[..11],
            &[0x26, 0x00, 0x07, 0x00, 14, 14, 0x00, 0x04, 0x7A, 0x0D, 0x05]
        );
        assert_eq!(p.len(), 16);
        assert!(p[11..].iter().all(|b| *b == 0));
    }

    #[test]
    fn repeat_is_kept() {
        let p = packet(&seq(&[435, -435]), 3);
        assert_eq!(p[1], 3);
    }

    #[test]
    fn base64_is_padded_to_blocks() {
        let code = base64_code(&seq(&[435, -435, 435]), 0);
        let decoded = STANDARD.decode(code).unwrap();
        assert_eq!(decoded.len() % BLOCK, 0);
        assert_eq!(decoded[0], IR_PACKET);
    }
}
