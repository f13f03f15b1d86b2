use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ir::types::{IrEncodeError, IrFormat, IrPulse, IrSequence};

const PREAMBLE_GAP: i32 = -24900;
const PREAMBLE_PAIRS: usize = 5;

/// Current ARC remote timing.
pub struct DaikinArc {}

/// Timing captured from older ARC remotes. Its preamble keeps the 435us
/// cadence even though data marks are longer.
pub struct DaikinArcLegacy {}

impl IrFormat for DaikinArc {
    const MARK: i32 = 435;
    const SPACE_ZERO: i32 = 435;
    const SPACE_ONE: i32 = 1300;
    const HEADER: (i32, i32) = (3500, -1750);
    const FRAME_GAP: i32 = -34900;
    const SPLIT_AT: usize = 20;
    const FRAME_LENGTH: usize = 39;

    fn preamble() -> Vec<IrPulse> {
        preamble(Self::MARK, Self::SPACE_ZERO)
    }

    fn encode<T: AsRef<[u8]>>(bytes: T) -> Result<IrSequence, IrEncodeError> {
        encode_frames::<Self>(bytes.as_ref())
    }
}

impl IrFormat for DaikinArcLegacy {
    const MARK: i32 = 530;
    const SPACE_ZERO: i32 = 335;
    const SPACE_ONE: i32 = 1300;
    const HEADER: (i32, i32) = (3500, -1750);
    const FRAME_GAP: i32 = -34900;
    const SPLIT_AT: usize = 20;
    const FRAME_LENGTH: usize = 39;

    fn preamble() -> Vec<IrPulse> {
        preamble(435, 435)
    }

    fn encode<T: AsRef<[u8]>>(bytes: T) -> Result<IrSequence, IrEncodeError> {
        encode_frames::<Self>(bytes.as_ref())
    }
}

fn preamble(mark: i32, space: i32) -> Vec<IrPulse> {
    let mut code = Vec::with_capacity(PREAMBLE_PAIRS * 2 + 2);
    for _ in 0..PREAMBLE_PAIRS {
        code.push(IrPulse(mark));
        code.push(IrPulse(-space));
    }
    code.push(IrPulse(mark));
    code.push(IrPulse(PREAMBLE_GAP));
    code
}

fn encode_frames<F: IrFormat>(bytes: &[u8]) -> Result<IrSequence, IrEncodeError> {
    if bytes.len() != F::FRAME_LENGTH {
        return Err(IrEncodeError::InvalidFrameLength {
            expected: F::FRAME_LENGTH,
            actual: bytes.len(),
        });
    }

    let (frame1, frame2) = bytes.split_at(F::SPLIT_AT);
    let mut code = F::preamble();

    for (i, frame) in [frame1, frame2].iter().enumerate() {
        if i > 0 {
            code.push(IrPulse(F::FRAME_GAP));
        }

        // leader
        code.push(IrPulse(F::HEADER.0));
        code.push(IrPulse(F::HEADER.1));

        // data, most significant bit first
        for byte in frame.iter() {
            for shift in (0..8).rev() {
                code.extend(F::encode_bit((byte >> shift) & 1 == 1));
            }
        }

        // stop bit
        code.push(IrPulse(F::MARK));
    }

    trace!("modulated {} bytes into {} pulses", bytes.len(), code.len());
    Ok(IrSequence(code))
}

/// Selects which set of ARC timing constants (and frame features) to use.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum ProtocolRevision {
    Legacy,
    #[default]
    Current,
}

impl ProtocolRevision {
    pub fn modulate<T: AsRef<[u8]>>(self, frame: T) -> Result<IrSequence, IrEncodeError> {
        match self {
            ProtocolRevision::Legacy => DaikinArcLegacy::encode(frame),
            ProtocolRevision::Current => DaikinArc::encode(frame),
        }
    }

    /// Whether the frame carries on/off timer bytes.
    pub fn has_timers(self) -> bool {
        match self {
            ProtocolRevision::Legacy => false,
            ProtocolRevision::Current => true,
        }
    }
}

impl fmt::Display for ProtocolRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolRevision::Legacy => write!(f, "legacy"),
            ProtocolRevision::Current => write!(f, "current"),
        }
    }
}

#[derive(Error, Debug)]
#[error("Invalid protocol revision")]
pub struct InvalidProtocolRevision;

impl FromStr for ProtocolRevision {
    type Err = InvalidProtocolRevision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(ProtocolRevision::Legacy),
            "current" => Ok(ProtocolRevision::Current),
            _ => Err(InvalidProtocolRevision),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FULL_LENGTH: usize = 12 + 2 + 20 * 16 + 1 + 1 + 2 + 19 * 16 + 1;

    fn frame() -> Vec<u8> {
        (0..39u8).collect()
    }

    #[test]
    fn sequence_length_is_fixed() {
        let seq = DaikinArc::encode(frame()).unwrap();
        assert_eq!(seq.len(), FULL_LENGTH);
        assert_eq!(seq.len(), 643);
        let legacy = DaikinArcLegacy::encode(frame()).unwrap();
        assert_eq!(legacy.len(), FULL_LENGTH);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(
            DaikinArc::encode([0u8; 38]),
            Err(IrEncodeError::InvalidFrameLength {
                expected: 39,
                actual: 38
            })
        );
        assert!(ProtocolRevision::Legacy.modulate([0u8; 40]).is_err());
        assert!(ProtocolRevision::Current.modulate(Vec::<u8>::new()).is_err());
    }

    #[test]
    fn layout_of_current_revision() {
        let mut bytes = vec![0u8; 39];
        bytes[0] = 0b1000_0001;
        let seq = DaikinArc::encode(&bytes).unwrap().into_inner();
        let raw: Vec<i32> = seq.iter().map(|p| p.0).collect();

        assert_eq!(
            &raw[..12],
            &[435, -435, 435, -435, 435, -435, 435, -435, 435, -435, 435, -24900]
        );
        assert_eq!(&raw[12..14], &[3500, -1750]);
        // first byte, msb first
        assert_eq!(&raw[14..16], &[435, -1300]);
        assert_eq!(&raw[16..18], &[435, -435]);
        assert_eq!(&raw[28..30], &[435, -1300]);

        let frame1_end = 14 + 20 * 16;
        assert_eq!(raw[frame1_end], 435);
        assert_eq!(raw[frame1_end + 1], -34900);
        assert_eq!(&raw[frame1_end + 2..frame1_end + 4], &[3500, -1750]);
        assert_eq!(*raw.last().unwrap(), 435);
    }

    #[test]
    fn layout_of_legacy_revision() {
        let mut bytes = vec![0u8; 39];
        bytes[20] = 0x80;
        let raw: Vec<i32> = DaikinArcLegacy::encode(&bytes)
            .unwrap()
            .into_inner()
            .into_iter()
            .map(IrPulse::into_inner)
            .collect();

        assert_eq!(&raw[..2], &[435, -435]);
        assert_eq!(raw[11], -24900);
        assert_eq!(&raw[14..16], &[530, -335]);

        let frame2_data = 14 + 20 * 16 + 4;
        assert_eq!(&raw[frame2_data..frame2_data + 2], &[530, -1300]);
        assert_eq!(*raw.last().unwrap(), 530);
    }

    #[test]
    fn marks_and_spaces_alternate() {
        let seq = ProtocolRevision::Current.modulate(frame()).unwrap();
        let raw = seq.into_inner();
        assert!(raw.iter().step_by(2).all(IrPulse::is_mark));
        assert!(raw.iter().skip(1).step_by(2).all(|p| !p.is_mark()));
    }

    #[test]
    fn revision_from_str() {
        assert_eq!(
            "Legacy".parse::<ProtocolRevision>().unwrap(),
            ProtocolRevision::Legacy
        );
        assert_eq!(
            "current".parse::<ProtocolRevision>().unwrap(),
            ProtocolRevision::Current
        );
        assert!("v3".parse::<ProtocolRevision>().is_err());
    }
}
