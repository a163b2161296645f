use clap::Parser;
use command::Command;
use config::Config;
use dispatch::Transmit;
use midi::{MidiReader, MidiWriter};
use remote::Remote;
use std::{path::PathBuf, time::Instant};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod command;
pub mod config;
pub mod dispatch;
pub mod midi;
pub mod remote;
pub mod sysex;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(about = "Edit a Roland JV-880 over MIDI System Exclusive.")]
pub struct Args {
    #[arg(short, long, help = "Path to a JSON config file")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "MIDI output port connected to the JV-880")]
    port: Option<String>,

    #[arg(short, long, help = "MIDI input port to monitor")]
    monitor: Option<String>,

    #[arg(long, help = "Minimum interval between writes to one parameter")]
    throttle_ms: Option<u64>,

    #[arg(
        long = "device-id",
        value_parser = parse_device_id,
        help = "Device id to address, repeatable (default: 0x10..0x1F)"
    )]
    device_ids: Vec<u8>,

    #[arg(long, help = "List MIDI ports and exit")]
    list_ports: bool,

    #[arg(long, default_value = "info", help = "trace, debug, info, warn or error")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        "Starting jv-remote > version: {}",
        VERSION.unwrap_or("?")
    );

    if args.list_ports {
        print_ports();
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    apply_args(&mut config, &args);
    config.validate()?;

    info!("| Throttle: {:?}", config.throttle());
    info!("| Device ids: {:02X?}", config.device_ids);

    let mut writer = MidiWriter::new();
    match &config.output_port {
        Some(port) => {
            writer.connect_output(port)?;
            if let Some(name) = writer.connected_port_name() {
                info!("MIDI output connected: {name}");
            }
        }
        None => warn!("No output port given, frames will be dropped"),
    }

    let (midi_tx, midi_rx) = midi::create_channel(32);
    let mut reader = MidiReader::new(midi_tx);
    if let Some(port) = &config.input_port {
        if let Err(e) = reader.connect_input(port) {
            warn!("{e}");
        }
        if let Some(name) = reader.connected_input_name() {
            info!("MIDI input connected: {name}");
        }
    }
    tokio::spawn(run_midi_logger(midi_rx));

    let (line_tx, mut line_rx) = mpsc::channel(32);
    tokio::spawn(read_stdin_lines(line_tx));

    let mut remote = Remote::from_config(writer, &config);
    remote.init();

    let mut interval = tokio::time::interval(config.tick_period());
    loop {
        tokio::select! {
            _ = interval.tick() => {
                remote.tick(Instant::now());
            }
            line = line_rx.recv() => match line {
                Some(line) => handle_line(&mut remote, &line),
                None => break,
            },
        }
    }

    // Input closed; let the last deferred values go out before exiting.
    while remote.pending() > 0 {
        interval.tick().await;
        remote.tick(Instant::now());
    }
    reader.disconnect_input();
    remote.sink_mut().disconnect();
    info!("Bye");

    Ok(())
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(port) = &args.port {
        config.output_port = Some(port.clone());
    }
    if let Some(port) = &args.monitor {
        config.input_port = Some(port.clone());
    }
    if let Some(throttle_ms) = args.throttle_ms {
        config.throttle_ms = throttle_ms;
    }
    if !args.device_ids.is_empty() {
        config.device_ids = args.device_ids.clone();
    }
}

fn parse_device_id(text: &str) -> Result<u8, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => text.parse(),
    };
    match parsed {
        Ok(id) if id <= 0x7F => Ok(id),
        _ => Err(format!("not a 7-bit device id: {text}")),
    }
}

fn print_ports() {
    info!("| Available MIDI outputs:");
    for port in MidiWriter::get_available_ports() {
        info!("| - {port}");
    }
    info!("| Available MIDI inputs:");
    for port in MidiReader::get_available_ports() {
        info!("| - {port}");
    }
}

fn handle_line<T: Transmit>(remote: &mut Remote<T>, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    match Command::parse(line) {
        Ok(Command::SetParam {
            target,
            name,
            value,
        }) => {
            if let Err(e) = remote.set_param(target, &name, value, Instant::now()) {
                error!("{e}");
            }
        }
        Ok(Command::Mode(mode)) => remote.set_mode(mode),
        Ok(Command::Panic) => {
            remote.all_notes_off();
            remote.reset_controllers();
        }
        Ok(Command::Sustain(on)) => remote.sustain(on),
        Ok(Command::ListParams(group)) => {
            let table = remote.registry().table(group);
            for name in table.names() {
                let max = remote.registry().max_value(name);
                info!("| {name} (0..={max})");
            }
        }
        Err(e) => warn!("{e}"),
    }
}

async fn read_stdin_lines(tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {e}");
                break;
            }
        }
    }
}

async fn run_midi_logger(mut midi_rx: midi::Receiver) {
    while let Ok(message) = midi_rx.recv().await {
        info!("MIDI in: ch{} {:?}", message.channel + 1, message.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_parsing() {
        assert_eq!(parse_device_id("0x11"), Ok(0x11));
        assert_eq!(parse_device_id("17"), Ok(17));
        assert!(parse_device_id("0x80").is_err());
        assert!(parse_device_id("sixteen").is_err());
    }

    #[test]
    fn args_override_config() {
        let args = Args::parse_from([
            "jv-remote",
            "--port",
            "JV-880",
            "--throttle-ms",
            "45",
            "--device-id",
            "0x10",
            "--device-id",
            "0x11",
        ]);
        let mut config = Config::default();
        apply_args(&mut config, &args);

        assert_eq!(config.output_port.as_deref(), Some("JV-880"));
        assert_eq!(config.throttle_ms, 45);
        assert_eq!(config.device_ids, vec![0x10, 0x11]);
        assert_eq!(config.input_port, None);
    }
}
