pub mod frame;
pub mod types;

use thiserror::Error;

use crate::ir::bits::to_transmit_order;
use crate::ir::daikin::frame::FrameEncoder;
use crate::ir::daikin::types::{AcIntent, AcMode};
use crate::ir::format::ProtocolRevision;
use crate::ir::types::{ByteFrame, IrEncodeError, IrSequence, IrTarget};

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DaikinError {
    #[error("Temperature {temperature} is out of range for {mode}, allowed values are between {min} and {max}")]
    TemperatureRange {
        mode: AcMode,
        temperature: i8,
        min: i8,
        max: i8,
    },
    #[error("Cannot encode {mode}: {reason}")]
    Unsupported { mode: AcMode, reason: String },
    #[error("Could not encode ir sequence")]
    EncodeError(#[from] IrEncodeError),
}

impl DaikinError {
    pub(crate) fn unsupported(mode: AcMode, reason: &str) -> Self {
        DaikinError::Unsupported {
            mode,
            reason: reason.to_string(),
        }
    }
}

/// A handset for ARC units. It remembers the last mode it switched to so that
/// an off command names the mode being turned off.
#[derive(Debug, Default)]
pub struct Daikin {
    encoder: FrameEncoder,
    last_mode: Option<AcMode>,
}

impl Daikin {
    pub fn new(revision: ProtocolRevision) -> Self {
        Daikin {
            encoder: FrameEncoder::new(revision),
            last_mode: None,
        }
    }

    pub fn revision(&self) -> ProtocolRevision {
        self.encoder.revision()
    }

    pub fn last_mode(&self) -> Option<AcMode> {
        self.last_mode
    }

    pub fn forget(&mut self) {
        self.last_mode = None;
    }

    fn remember(&mut self, mode: AcMode) {
        // off keeps the mode it turned off, so repeated offs stay identical
        if mode != AcMode::Off {
            self.last_mode = Some(mode);
        }
    }
}

impl IrTarget for Daikin {
    type State = AcIntent;
    type Error = DaikinError;
    const SEQ_LENGTH: usize = 643;

    fn command(&mut self, state: &AcIntent) -> Result<ByteFrame, Self::Error> {
        let frame = self.encoder.encode(state, self.last_mode)?;
        self.remember(state.mode);
        Ok(frame)
    }

    fn send(&mut self, state: &AcIntent) -> Result<IrSequence, Self::Error> {
        let frame = self.encoder.encode(state, self.last_mode)?;
        let sequence = self.revision().modulate(to_transmit_order(&frame))?;
        self.remember(state.mode);
        Ok(sequence)
    }
}
