use std::ops::RangeInclusive;

use crate::ir::daikin::types::{
    offset, AcIntent, AcMode, FanSpeed, SwingPosition, BOTH_TIMERS_MASK, DEFAULT_OFF_MODE,
    FAN_CODES, FRAME1_TEMPLATE, FRAME2_TEMPLATE, FRAME_LENGTH, MODE_CODES, NIGHT_MODE_ENABLED,
    NO_WIND_FAN_SWING, OFF_TIMER_MASK, ON_TIMER_MASK, SWING_CODES, TIMERS_DISABLED, TIMER_HOURS,
};
use crate::ir::daikin::DaikinError;
use crate::ir::format::ProtocolRevision;
use crate::ir::types::ByteFrame;

const HEAT_COOL_RANGE: RangeInclusive<i8> = 18..=30;
const AUTO_RANGE: RangeInclusive<i8> = -5..=5;

/// A single byte to overlay onto the frame template.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldWrite {
    pub offset: usize,
    pub value: u8,
}

const fn write(offset: usize, value: u8) -> FieldWrite {
    FieldWrite { offset, value }
}

/// Builds ARC command frames in least significant bit first order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameEncoder {
    revision: ProtocolRevision,
}

impl FrameEncoder {
    pub fn new(revision: ProtocolRevision) -> Self {
        FrameEncoder { revision }
    }

    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    pub fn encode(
        &self,
        intent: &AcIntent,
        previous_mode: Option<AcMode>,
    ) -> Result<ByteFrame, DaikinError> {
        // the mode being switched off decides the mode and temperature bytes
        let previous_mode = previous_mode.filter(|m| *m != AcMode::Off);
        let timers = self.timers(intent)?;

        let mut writes = Vec::with_capacity(16);
        writes.extend(mode_writes(intent.mode, previous_mode, &timers)?);
        writes.extend(match intent.mode {
            AcMode::Off => off_temperature_writes(previous_mode, intent.temperature)?,
            mode => temperature_writes(mode, intent.temperature)?,
        });
        writes.extend(fan_swing_writes(
            intent.mode,
            intent.fan_speed,
            intent.swing_position,
            intent.no_wind,
        )?);
        if self.revision.has_timers() {
            writes.extend(timers.writes());
        }
        writes.push(night_mode_write(intent.night_mode));

        let frame = apply(&writes);
        debug!("encoded {:?} into {}", intent, frame);
        Ok(frame)
    }

    fn timers(&self, intent: &AcIntent) -> Result<Timers, DaikinError> {
        let timers = Timers::new(intent.on_timer_hours, intent.off_timer_hours);
        if !self.revision.has_timers() && timers.is_set() {
            return Err(DaikinError::Unsupported {
                mode: intent.mode,
                reason: format!("{} revision has no timer field", self.revision),
            });
        }
        Ok(timers)
    }
}

/// On and off timers, only kept when within the handset's 1 to 12 hour range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Timers {
    on_hours: Option<u8>,
    off_hours: Option<u8>,
}

impl Timers {
    fn new(on_hours: Option<u8>, off_hours: Option<u8>) -> Self {
        let in_range = |h: &u8| TIMER_HOURS.contains(h);
        Timers {
            on_hours: on_hours.filter(in_range),
            off_hours: off_hours.filter(in_range),
        }
    }

    fn is_set(&self) -> bool {
        self.on_hours.is_some() || self.off_hours.is_some()
    }

    fn mask(&self) -> u8 {
        match (self.on_hours, self.off_hours) {
            (Some(_), Some(_)) => BOTH_TIMERS_MASK,
            (Some(_), None) => ON_TIMER_MASK,
            (None, Some(_)) => OFF_TIMER_MASK,
            (None, None) => 0x00,
        }
    }

    fn writes(&self) -> [FieldWrite; 3] {
        let mut bytes = TIMERS_DISABLED;
        if let Some(hours) = self.on_hours {
            let [lo, hi] = (u16::from(hours) * 60).to_le_bytes();
            bytes[0] = lo;
            bytes[1] = hi;
        }
        if let Some(hours) = self.off_hours {
            let [lo, hi] = (u16::from(hours) * 960).to_le_bytes();
            bytes[1] ^= lo;
            bytes[2] = hi;
        }
        [
            write(offset::TIMER, bytes[0]),
            write(offset::TIMER + 1, bytes[1]),
            write(offset::TIMER + 2, bytes[2]),
        ]
    }
}

fn mode_writes(
    mode: AcMode,
    previous_mode: Option<AcMode>,
    timers: &Timers,
) -> Result<Vec<FieldWrite>, DaikinError> {
    let code = MODE_CODES
        .get(&mode)
        .ok_or_else(|| DaikinError::unsupported(mode, "no mode code"))?;

    let mode_byte = match (code.mode, previous_mode) {
        (Some(byte), _) => byte,
        (None, None) => DEFAULT_OFF_MODE,
        // bit 0 of the mode byte is power, so off is the previous mode minus one
        (None, Some(previous)) => MODE_CODES
            .get(&previous)
            .and_then(|c| c.mode)
            .map(|byte| byte - 1)
            .ok_or_else(|| DaikinError::unsupported(mode, "previous mode has no mode byte"))?,
    };

    Ok(vec![
        write(offset::MODE, mode_byte ^ timers.mask()),
        write(offset::BUTTON, code.button as u8),
        write(offset::OFF_MARKER, code.off_marker),
    ])
}

/// Off carries the temperature bytes of whatever it switches off, or of cool
/// when that is unknown, matching the default off mode byte. A temperature
/// that mode would reject is replaced, since off never uses it.
fn off_temperature_writes(
    previous_mode: Option<AcMode>,
    temperature: i8,
) -> Result<[FieldWrite; 2], DaikinError> {
    let mode = previous_mode.unwrap_or(AcMode::Cool);
    temperature_writes(mode, temperature).or_else(|_| {
        let fallback = match mode {
            AcMode::Auto => 0,
            _ => 25,
        };
        temperature_writes(mode, fallback)
    })
}

fn temperature_writes(mode: AcMode, temperature: i8) -> Result<[FieldWrite; 2], DaikinError> {
    let (value, temperature_mode) = match mode {
        AcMode::Heat | AcMode::Cool => {
            check_range(mode, temperature, HEAT_COOL_RANGE)?;
            (temperature as u8 * 2, 0x00)
        }
        AcMode::Fan => (0x32, 0x00),
        AcMode::Dry => (0xC0, 0x80),
        AcMode::Auto => {
            check_range(mode, temperature, AUTO_RANGE)?;
            let base: u8 = if temperature >= 0 { 0xC0 } else { 0xE0 };
            (base.wrapping_add((temperature * 2) as u8), 0x80)
        }
        AcMode::Off => return Err(DaikinError::unsupported(mode, "off has no temperature")),
    };
    Ok([
        write(offset::TEMPERATURE, value),
        write(offset::TEMPERATURE_MODE, temperature_mode),
    ])
}

fn check_range(
    mode: AcMode,
    temperature: i8,
    range: RangeInclusive<i8>,
) -> Result<(), DaikinError> {
    if range.contains(&temperature) {
        Ok(())
    } else {
        Err(DaikinError::TemperatureRange {
            mode,
            temperature,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn fan_swing_writes(
    mode: AcMode,
    fan: FanSpeed,
    swing: SwingPosition,
    no_wind: bool,
) -> Result<[FieldWrite; 3], DaikinError> {
    if no_wind {
        // no wind disables both swing and fan control
        return Ok([
            write(offset::SWING_MODE, 0x00),
            write(offset::FAN_SWING_MODE, NO_WIND_FAN_SWING),
            write(offset::NO_WIND, 0x01),
        ]);
    }

    let fan_code = FAN_CODES
        .get(&fan)
        .ok_or_else(|| {
            DaikinError::unsupported(mode, &format!("no code for fan speed {}", fan))
        })?;
    let swing_code = SWING_CODES
        .get(&swing)
        .ok_or_else(|| {
            DaikinError::unsupported(mode, &format!("no code for swing position {}", swing))
        })?;
    Ok([
        write(offset::SWING_MODE, swing_code.swing_mode),
        write(offset::FAN_SWING_MODE, fan_code ^ swing_code.fan_swing),
        write(offset::NO_WIND, 0x00),
    ])
}

fn night_mode_write(night_mode: bool) -> FieldWrite {
    write(
        offset::NIGHT_MODE,
        if night_mode { NIGHT_MODE_ENABLED } else { 0x00 },
    )
}

/// Overlays the writes in order, then fills in both checksums.
pub(crate) fn apply(writes: &[FieldWrite]) -> ByteFrame {
    let mut bytes = Vec::with_capacity(FRAME_LENGTH);
    bytes.extend_from_slice(&FRAME1_TEMPLATE);
    bytes.extend_from_slice(&FRAME2_TEMPLATE);

    for w in writes {
        bytes[w.offset] = w.value;
    }

    bytes[offset::FRAME1_CHECKSUM] = checksum(&bytes[..offset::FRAME1_CHECKSUM]);
    bytes[offset::FRAME2_CHECKSUM] =
        checksum(&bytes[offset::FRAME2_START..offset::FRAME2_CHECKSUM]);
    ByteFrame(bytes)
}

pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}
