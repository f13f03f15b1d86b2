use std::collections::HashMap;
use std::str::FromStr;

use strum_macros::{Display, EnumIter};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, EnumIter, Display)]
pub enum AcMode {
    #[strum(serialize = "heat")]
    Heat,
    #[strum(serialize = "cool")]
    Cool,
    #[strum(serialize = "dry")]
    Dry,
    #[strum(serialize = "fan_only")]
    Fan,
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "off")]
    Off,
}

impl Default for AcMode {
    fn default() -> Self {
        AcMode::Cool
    }
}

#[derive(Error, Debug)]
#[error("Invalid AC mode")]
pub struct InvalidAcMode;

impl FromStr for AcMode {
    type Err = InvalidAcMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heat" | "warm" => Ok(AcMode::Heat),
            "cool" => Ok(AcMode::Cool),
            "dry" => Ok(AcMode::Dry),
            "fan" | "fan_only" => Ok(AcMode::Fan),
            "auto" => Ok(AcMode::Auto),
            "off" => Ok(AcMode::Off),
            _ => Err(InvalidAcMode),
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, EnumIter, Display)]
pub enum FanSpeed {
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "quiet")]
    Quiet,
    #[strum(serialize = "low")]
    Low,
    #[strum(serialize = "midLow")]
    LowMid,
    #[strum(serialize = "mid")]
    Mid,
    #[strum(serialize = "midHigh")]
    MidHigh,
    #[strum(serialize = "high")]
    High,
}

impl Default for FanSpeed {
    fn default() -> Self {
        FanSpeed::Auto
    }
}

#[derive(Error, Debug)]
#[error("Invalid fan speed")]
pub struct InvalidFanSpeed;

impl FromStr for FanSpeed {
    type Err = InvalidFanSpeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(FanSpeed::Auto),
            "quiet" => Ok(FanSpeed::Quiet),
            "low" => Ok(FanSpeed::Low),
            "midlow" | "lowmid" => Ok(FanSpeed::LowMid),
            "mid" => Ok(FanSpeed::Mid),
            "midhigh" => Ok(FanSpeed::MidHigh),
            "high" => Ok(FanSpeed::High),
            _ => Err(InvalidFanSpeed),
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, EnumIter, Display)]
pub enum SwingPosition {
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "low")]
    Low,
    #[strum(serialize = "midLow")]
    LowMid,
    #[strum(serialize = "mid")]
    Mid,
    #[strum(serialize = "midHigh")]
    MidHigh,
    #[strum(serialize = "high")]
    High,
}

impl Default for SwingPosition {
    fn default() -> Self {
        SwingPosition::Auto
    }
}

#[derive(Error, Debug)]
#[error("Invalid swing position")]
pub struct InvalidSwingPosition;

impl FromStr for SwingPosition {
    type Err = InvalidSwingPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SwingPosition::Auto),
            "low" => Ok(SwingPosition::Low),
            "midlow" | "lowmid" => Ok(SwingPosition::LowMid),
            "mid" => Ok(SwingPosition::Mid),
            "midhigh" => Ok(SwingPosition::MidHigh),
            "high" => Ok(SwingPosition::High),
            _ => Err(InvalidSwingPosition),
        }
    }
}

/// Everything one press of the handset communicates.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Default)]
pub struct AcIntent {
    pub mode: AcMode,
    pub temperature: i8,
    pub fan_speed: FanSpeed,
    pub swing_position: SwingPosition,
    pub no_wind: bool,
    pub night_mode: bool,
    pub on_timer_hours: Option<u8>,
    pub off_timer_hours: Option<u8>,
}

impl AcIntent {
    pub fn new(
        mode: AcMode,
        temperature: i8,
        fan_speed: FanSpeed,
        swing_position: SwingPosition,
    ) -> Self {
        AcIntent {
            mode,
            temperature,
            fan_speed,
            swing_position,
            ..AcIntent::default()
        }
    }

    pub fn off() -> Self {
        AcIntent::new(AcMode::Off, 25, FanSpeed::Auto, SwingPosition::Auto)
    }

    pub fn with_no_wind(self, no_wind: bool) -> Self {
        AcIntent { no_wind, ..self }
    }

    pub fn with_night_mode(self, night_mode: bool) -> Self {
        AcIntent { night_mode, ..self }
    }

    pub fn with_on_timer(self, hours: Option<u8>) -> Self {
        AcIntent {
            on_timer_hours: hours,
            ..self
        }
    }

    pub fn with_off_timer(self, hours: Option<u8>) -> Self {
        AcIntent {
            off_timer_hours: hours,
            ..self
        }
    }
}

/// Byte positions inside the combined 39 byte frame.
pub mod offset {
    pub const BUTTON: usize = 9;
    /// Only differs from 0x00 when the off button is pressed.
    pub const OFF_MARKER: usize = 11;
    pub const SWING_MODE: usize = 12;
    pub const FRAME1_CHECKSUM: usize = 19;
    pub const FRAME2_START: usize = 20;
    pub const MODE: usize = 25;
    pub const TEMPERATURE: usize = 26;
    pub const TEMPERATURE_MODE: usize = 27;
    pub const FAN_SWING_MODE: usize = 28;
    pub const TIMER: usize = 30;
    pub const NIGHT_MODE: usize = 33;
    pub const NO_WIND: usize = 36;
    pub const FRAME2_CHECKSUM: usize = 38;
}

pub const FRAME_LENGTH: usize = 39;

// 0xFF marks placeholders that every command overwrites.
pub const FRAME1_TEMPLATE: [u8; 20] = [
    0x11, 0xDA, 0x27, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0xFF,
];
pub const FRAME2_TEMPLATE: [u8; 19] = [
    0x11, 0xDA, 0x27, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0xFF, 0x00, 0x00, 0x06, 0x60, 0xFF, 0x00, 0xC3,
    0xFF, 0x00, 0xFF,
];

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DaikinButton {
    Off = 0x02,
    ModeCool = 0x0E,
    ModeAuto = 0x0D,
    ModeDry = 0x0F,
    ModeHeat = 0x10,
    ModeFan = 0x1A,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ModeCode {
    /// `None` for off, which borrows the byte of the mode being switched off.
    pub mode: Option<u8>,
    pub button: DaikinButton,
    pub off_marker: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SwingCode {
    pub swing_mode: u8,
    pub fan_swing: u8,
}

/// Mode byte sent when switching off without knowing the previous mode.
pub const DEFAULT_OFF_MODE: u8 = 0x38;
pub const OFF_MARKER_ENABLED: u8 = 0x80;

pub const ON_TIMER_MASK: u8 = 0x0B;
pub const OFF_TIMER_MASK: u8 = 0x0D;
pub const BOTH_TIMERS_MASK: u8 = 0x0F;
pub const TIMER_HOURS: std::ops::RangeInclusive<u8> = 1..=12;
pub const TIMERS_DISABLED: [u8; 3] = [0x00, 0x06, 0x60];

pub const NO_WIND_FAN_SWING: u8 = 0xA0;
pub const NIGHT_MODE_ENABLED: u8 = 0x04;

lazy_static! {
    pub static ref MODE_CODES: HashMap<AcMode, ModeCode> = {
        let code = |mode, button| ModeCode {
            mode: Some(mode),
            button,
            off_marker: 0x00,
        };
        let mut m = HashMap::new();
        m.insert(AcMode::Heat, code(0x49, DaikinButton::ModeHeat));
        m.insert(AcMode::Cool, code(0x39, DaikinButton::ModeCool));
        m.insert(AcMode::Dry, code(0x29, DaikinButton::ModeDry));
        m.insert(AcMode::Fan, code(0x69, DaikinButton::ModeFan));
        m.insert(AcMode::Auto, code(0x09, DaikinButton::ModeAuto));
        m.insert(
            AcMode::Off,
            ModeCode {
                mode: None,
                button: DaikinButton::Off,
                off_marker: OFF_MARKER_ENABLED,
            },
        );
        m
    };
    pub static ref FAN_CODES: HashMap<FanSpeed, u8> = {
        let mut m = HashMap::new();
        m.insert(FanSpeed::Auto, 0xA0);
        m.insert(FanSpeed::Quiet, 0xB0);
        m.insert(FanSpeed::Low, 0x30);
        m.insert(FanSpeed::LowMid, 0x40);
        m.insert(FanSpeed::Mid, 0x50);
        m.insert(FanSpeed::MidHigh, 0x60);
        m.insert(FanSpeed::High, 0x70);
        m
    };
    pub static ref SWING_CODES: HashMap<SwingPosition, SwingCode> = {
        let code = |swing_mode, fan_swing| SwingCode {
            swing_mode,
            fan_swing,
        };
        let mut m = HashMap::new();
        m.insert(SwingPosition::Auto, code(0x00, 0x0F));
        m.insert(SwingPosition::Low, code(0x50, 0x00));
        m.insert(SwingPosition::LowMid, code(0x40, 0x00));
        m.insert(SwingPosition::Mid, code(0x30, 0x00));
        m.insert(SwingPosition::MidHigh, code(0x20, 0x00));
        m.insert(SwingPosition::High, code(0x10, 0x00));
        m
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_variant_has_a_table_entry() {
        assert!(AcMode::iter().all(|m| MODE_CODES.contains_key(&m)));
        assert!(FanSpeed::iter().all(|f| FAN_CODES.contains_key(&f)));
        assert!(SwingPosition::iter().all(|s| SWING_CODES.contains_key(&s)));
    }

    #[test]
    fn smartir_names_round_trip() {
        for mode in AcMode::iter() {
            assert_eq!(mode.to_string().parse::<AcMode>().unwrap(), mode);
        }
        for fan in FanSpeed::iter() {
            assert_eq!(fan.to_string().parse::<FanSpeed>().unwrap(), fan);
        }
        for swing in SwingPosition::iter() {
            assert_eq!(swing.to_string().parse::<SwingPosition>().unwrap(), swing);
        }
        assert_eq!(AcMode::Fan.to_string(), "fan_only");
        assert_eq!(FanSpeed::LowMid.to_string(), "midLow");
        assert!("turbo".parse::<FanSpeed>().is_err());
    }

    #[test]
    fn templates_fill_the_frame() {
        assert_eq!(FRAME1_TEMPLATE.len() + FRAME2_TEMPLATE.len(), FRAME_LENGTH);
        assert_eq!(FRAME1_TEMPLATE.len(), offset::FRAME2_START);
    }
}
