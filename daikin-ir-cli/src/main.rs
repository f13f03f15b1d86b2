mod broadlink;
mod smartir;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use daikin_ir::ir::bits::to_transmit_order;
use daikin_ir::ir::daikin::frame::FrameEncoder;
use daikin_ir::ir::daikin::types::{AcIntent, AcMode, FanSpeed, SwingPosition};
use daikin_ir::ir::format::ProtocolRevision;
use serde::Serialize;
use structopt::StructOpt;

use crate::smartir::SmartIrDevice;

#[derive(StructOpt, Debug)]
struct AcState {
    #[structopt(short, long, default_value = "cool")]
    mode: AcMode,
    /// Degrees for heat and cool, offset from -5 to 5 for auto
    #[structopt(short, long, default_value = "25", allow_hyphen_values = true)]
    temperature: i8,
    #[structopt(short, long, default_value = "auto")]
    fan: FanSpeed,
    #[structopt(short, long, default_value = "auto")]
    swing: SwingPosition,
    #[structopt(long)]
    no_wind: bool,
    #[structopt(long)]
    night: bool,
    /// Hours until the unit turns on (1-12)
    #[structopt(long)]
    on_timer: Option<u8>,
    /// Hours until the unit turns off (1-12)
    #[structopt(long)]
    off_timer: Option<u8>,
    /// Mode the unit is in before this command, used by off
    #[structopt(long)]
    previous: Option<AcMode>,
}

impl AcState {
    fn intent(&self) -> AcIntent {
        AcIntent::new(self.mode, self.temperature, self.fan, self.swing)
            .with_no_wind(self.no_wind)
            .with_night_mode(self.night)
            .with_on_timer(self.on_timer)
            .with_off_timer(self.off_timer)
    }
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Print the command bytes
    Frame(AcState),
    /// Print the pulse and space timings in microseconds
    Pulses(AcState),
    /// Print a base64 Broadlink code
    Broadlink {
        #[structopt(flatten)]
        state: AcState,

        #[structopt(long, default_value = "0")]
        repeat: u8,
    },
    /// Fill in a SmartIR climate device file
    Generate {
        /// SmartIR device file to start from
        #[structopt(short, long, parse(from_os_str))]
        base: PathBuf,

        /// Where to write the completed file
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
    },
}

#[derive(StructOpt, Debug)]
struct Opt {
    /// Protocol revision, legacy or current
    #[structopt(short, long, default_value = "current")]
    revision: ProtocolRevision,

    #[structopt(subcommand)]
    command: Command,
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut file =
        File::create(path).wrap_err_with(|| format!("Could not create {}", path.display()))?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut file, formatter);
    value
        .serialize(&mut ser)
        .wrap_err("Could not serialize device file")?;
    file.write_all(b"\n")?;
    Ok(())
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;

    let opts = Opt::from_args();

    debug!("opts: {:?}", opts);

    let encoder = FrameEncoder::new(opts.revision);

    match opts.command {
        Command::Frame(state) => {
            let frame = encoder
                .encode(&state.intent(), state.previous)
                .wrap_err("Could not encode state")?;
            println!("LSB: {}", frame);
            println!("MSB: {}", to_transmit_order(&frame));
        }
        Command::Pulses(state) => {
            let frame = encoder
                .encode(&state.intent(), state.previous)
                .wrap_err("Could not encode state")?;
            let pulses = opts.revision.modulate(to_transmit_order(&frame))?;
            println!("{}", pulses);
        }
        Command::Broadlink { state, repeat } => {
            let frame = encoder
                .encode(&state.intent(), state.previous)
                .wrap_err("Could not encode state")?;
            let pulses = opts.revision.modulate(to_transmit_order(&frame))?;
            println!("{}", broadlink::base64_code(&pulses, repeat));
        }
        Command::Generate { base, output } => {
            let file =
                File::open(&base).wrap_err_with(|| format!("Could not open {}", base.display()))?;
            let device: SmartIrDevice = serde_json::from_reader(BufReader::new(file))
                .wrap_err_with(|| format!("Could not parse {}", base.display()))?;

            info!("generating codes with the {} protocol revision", opts.revision);
            let device = smartir::generate(device, &encoder)?;
            write_pretty(&output, &device)?;
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}
