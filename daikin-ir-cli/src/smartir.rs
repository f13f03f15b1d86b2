use std::str::FromStr;

use color_eyre::eyre::{eyre, Result, WrapErr};
use daikin_ir::ir::bits::to_transmit_order;
use daikin_ir::ir::daikin::frame::FrameEncoder;
use daikin_ir::ir::daikin::types::{AcIntent, AcMode, FanSpeed, SwingPosition};
use daikin_ir::ir::daikin::DaikinError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::broadlink;

/// A SmartIR climate device file. Unknown keys such as `manufacturer` are
/// carried through untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartIrDevice {
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub operation_modes: Vec<String>,
    pub fan_modes: Vec<String>,
    #[serde(default)]
    pub swing_modes: Vec<String>,
    #[serde(default)]
    pub commands: Map<String, Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

fn parse_all<T: FromStr>(names: &[String], what: &str) -> Result<Vec<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    names
        .iter()
        .map(|n| {
            n.parse::<T>()
                .wrap_err_with(|| format!("Unknown {} {:?}", what, n))
        })
        .collect()
}

pub fn broadlink_code(encoder: &FrameEncoder, intent: &AcIntent) -> Result<String, DaikinError> {
    let frame = encoder.encode(intent, None)?;
    trace!("{:?}: {}", intent, frame);
    let pulses = encoder.revision().modulate(to_transmit_order(&frame))?;
    Ok(broadlink::base64_code(&pulses, 0))
}

fn child<'a>(parent: &'a mut Map<String, Value>, key: &str) -> Result<&'a mut Map<String, Value>> {
    parent
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| eyre!("commands entry {:?} is not an object", key))
}

/// Fills in every missing mode/fan/swing/temperature command. Entries that
/// already exist are left alone and entries that cannot be encoded are skipped.
pub fn generate(mut device: SmartIrDevice, encoder: &FrameEncoder) -> Result<SmartIrDevice> {
    let modes: Vec<AcMode> = parse_all(&device.operation_modes, "operation mode")?;
    let fans: Vec<FanSpeed> = parse_all(&device.fan_modes, "fan mode")?;
    let mut swings: Vec<SwingPosition> = parse_all(&device.swing_modes, "swing mode")?;
    if swings.is_empty() {
        swings.push(SwingPosition::Auto);
    }
    let min = device.min_temperature.round() as i8;
    let max = device.max_temperature.round() as i8;

    let off = broadlink_code(encoder, &AcIntent::off())?;
    device.commands.insert("off".to_string(), Value::String(off));

    let mut written = 0usize;
    let mut skipped = 0usize;
    for mode in modes.iter().filter(|m| **m != AcMode::Off) {
        let mode_name = mode.to_string();
        for fan in &fans {
            let fan_name = fan.to_string();
            for swing in &swings {
                let swing_name = swing.to_string();
                let mode_commands = child(&mut device.commands, &mode_name)?;
                let fan_commands = child(mode_commands, &fan_name)?;
                let temps = child(fan_commands, &swing_name)?;

                for temp in min..=max {
                    let key = temp.to_string();
                    if temps.contains_key(&key) {
                        info!(
                            "Code for {}, {}, {}, {}C already exists, skipping...",
                            mode_name, fan_name, swing_name, temp
                        );
                        continue;
                    }

                    let intent = AcIntent::new(*mode, temp, *fan, *swing);
                    match broadlink_code(encoder, &intent) {
                        Ok(code) => {
                            debug!(
                                "Writing {}, {}, {}, {}C code",
                                mode_name, fan_name, swing_name, temp
                            );
                            temps.insert(key, Value::String(code));
                            written += 1;
                        }
                        Err(e) => {
                            warn!(
                                "Skipping {}, {}, {}, {}C: {}",
                                mode_name, fan_name, swing_name, temp, e
                            );
                            skipped += 1;
                        }
                    }
                }
            }
        }
    }

    info!("wrote {} codes, skipped {}", written, skipped);
    Ok(device)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn device(value: Value) -> SmartIrDevice {
        serde_json::from_value(value).unwrap()
    }

    fn base() -> Value {
        json!({
            "manufacturer": "Daikin",
            "supportedModels": ["ARC480A"],
            "minTemperature": 20,
            "maxTemperature": 22,
            "operationModes": ["cool", "heat"],
            "fanModes": ["auto", "quiet"],
            "swingModes": ["auto", "midLow"],
            "commands": {}
        })
    }

    #[test]
    fn generates_every_combination() {
        let out = generate(device(base()), &FrameEncoder::default()).unwrap();
        let commands = &out.commands;
        assert!(commands["off"].is_string());
        for mode in ["cool", "heat"] {
            for fan in ["auto", "quiet"] {
                for swing in ["auto", "midLow"] {
                    let temps = commands[mode][fan][swing].as_object().unwrap();
                    assert_eq!(temps.len(), 3);
                    assert!(temps["20"].is_string());
                    assert!(temps["22"].is_string());
                }
            }
        }
        assert_eq!(out.other["manufacturer"], "Daikin");
    }

    #[test]
    fn existing_codes_are_kept() {
        let mut value = base();
        value["commands"] = json!({ "cool": { "auto": { "auto": { "21": "keep" } } } });
        let out = generate(device(value), &FrameEncoder::default()).unwrap();
        assert_eq!(out.commands["cool"]["auto"]["auto"]["21"], "keep");
        assert!(out.commands["cool"]["auto"]["auto"]["20"].is_string());
    }

    #[test]
    fn unencodable_entries_are_skipped() {
        let mut value = base();
        value["operationModes"] = json!(["auto", "fan_only"]);
        let out = generate(device(value), &FrameEncoder::default()).unwrap();
        // auto only accepts offsets of -5 to 5
        assert!(out.commands["auto"]["auto"]["auto"]
            .as_object()
            .unwrap()
            .is_empty());
        assert_eq!(
            out.commands["fan_only"]["quiet"]["midLow"]
                .as_object()
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn unknown_mode_names_fail() {
        let mut value = base();
        value["fanModes"] = json!(["turbo"]);
        assert!(generate(device(value), &FrameEncoder::default()).is_err());
    }

    #[test]
    fn broadlink_code_decodes_to_packet() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        let intent = AcIntent::new(AcMode::Cool, 24, FanSpeed::Auto, SwingPosition::Auto);
        let code = broadlink_code(&FrameEncoder::default(), &intent).unwrap();
        let packet = STANDARD.decode(code).unwrap();
        assert_eq!(packet[0], 0x26);
        assert_eq!(packet.len() % 16, 0);
    }
}
