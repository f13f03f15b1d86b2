use itertools::Itertools;
use num_traits::AsPrimitive;
use std::fmt;
use thiserror::Error;

/// A single infrared interval in microseconds. Positive values are marks
/// (carrier on), negative values are spaces (carrier off).
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct IrPulse(pub i32);

impl IrPulse {
    pub fn into_inner(self) -> i32 {
        self.0
    }

    pub fn is_mark(&self) -> bool {
        self.0 > 0
    }

    pub fn duration(&self) -> u32 {
        self.0.unsigned_abs()
    }
}

impl AsPrimitive<f64> for IrPulse {
    fn as_(self) -> f64 {
        self.0.as_()
    }
}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct IrSequence(pub Vec<IrPulse>);

impl IrSequence {
    pub fn into_inner(self) -> Vec<IrPulse> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[IrPulse]> for IrSequence {
    fn as_ref(&self) -> &[IrPulse] {
        &self.0
    }
}

impl fmt::Display for IrSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|p| p.0).join(", "))
    }
}

/// Timing layout of a two sub-frame infrared protocol.
pub trait IrFormat {
    const MARK: i32;
    const SPACE_ZERO: i32;
    const SPACE_ONE: i32;
    const HEADER: (i32, i32);
    const FRAME_GAP: i32;
    /// Number of bytes in the first sub-frame, the rest belongs to the second.
    const SPLIT_AT: usize;
    const FRAME_LENGTH: usize;

    fn preamble() -> Vec<IrPulse>;

    fn encode_bit(bit: bool) -> [IrPulse; 2] {
        if bit {
            [IrPulse(Self::MARK), IrPulse(-Self::SPACE_ONE)]
        } else {
            [IrPulse(Self::MARK), IrPulse(-Self::SPACE_ZERO)]
        }
    }

    fn encode<T: AsRef<[u8]>>(bytes: T) -> Result<IrSequence, IrEncodeError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrEncodeError {
    #[error("Frame must be {expected} bytes long, got {actual}")]
    InvalidFrameLength { expected: usize, actual: usize },
}

/// Raw command bytes, in whichever bit order the producer used.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ByteFrame(pub Vec<u8>);

impl ByteFrame {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for ByteFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ByteFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|b| format!("{:02X}", b)).join(" "))
    }
}

/// A device that turns its own state type into infrared sequences.
pub trait IrTarget {
    type State;
    type Error: std::error::Error + Send + Sync;
    const SEQ_LENGTH: usize;

    fn command(&mut self, state: &Self::State) -> Result<ByteFrame, Self::Error>;
    fn send(&mut self, state: &Self::State) -> Result<IrSequence, Self::Error>;
}
