use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use enigma_core::{EnigmaMachine, Letter};
use env_logger::Env;
use log::{debug, LevelFilter};

#[derive(Parser)]
#[command(
    name = "enigma",
    author,
    version,
    about = "Terminal console for a three-rotor cipher machine"
)]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    /// Initial rotor windows, slow rotor first, e.g. QEV.
    #[arg(long, global = true, default_value = "AAA")]
    rotors: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a message by pressing each key in turn.
    Encode { text: String },
    /// Read lines from stdin and encode each one.
    Interactive,
    /// Press one key repeatedly and watch the rotor windows step.
    Trace {
        #[arg(long, default_value = "A")]
        letter: char,
        #[arg(long, default_value_t = 30)]
        count: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let mut machine = EnigmaMachine::historical();
    if cli.debug {
        machine.add_observer(|state| debug!("observer: rotors {}", state.rotors));
    }
    dial_rotors(&mut machine, &cli.rotors)?;
    match cli.command {
        Commands::Encode { text } => cmd_encode(&mut machine, &text),
        Commands::Interactive => cmd_interactive(&mut machine),
        Commands::Trace { letter, count } => cmd_trace(&mut machine, letter, count),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

/// Dials each rotor to the requested window letter with manual advances,
/// the way an operator sets a machine before keying a message.
fn dial_rotors(machine: &mut EnigmaMachine, windows: &str) -> Result<()> {
    if windows.chars().count() != 3 {
        bail!("--rotors expects exactly 3 letters, e.g. QEV");
    }
    for (rotor, c) in windows.chars().enumerate() {
        let target = Letter::from_char(c)?;
        for _ in 0..target.index() {
            machine.advance_rotor(rotor)?;
        }
    }
    Ok(())
}

fn cmd_encode(machine: &mut EnigmaMachine, text: &str) -> Result<()> {
    let ciphertext = type_text(machine, text);
    println!("{ciphertext}");
    println!("rotor windows now at {}", windows(machine));
    Ok(())
}

fn cmd_interactive(machine: &mut EnigmaMachine) -> Result<()> {
    println!("Type a line to encode it; press Ctrl-D to stop.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "{}> ", windows(machine))?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            continue;
        }
        println!("{}", type_text(machine, trimmed));
    }
    Ok(())
}

fn cmd_trace(machine: &mut EnigmaMachine, letter: char, count: u64) -> Result<()> {
    let key = Letter::from_char(letter)?;
    for step in 1..=count {
        let lamp = machine.press_key(key);
        machine.release_key(key);
        println!("{step:>5}  {}  {key} -> {lamp}", windows(machine));
    }
    Ok(())
}

/// Presses and releases one key per character. Characters outside the
/// machine alphabet pass through unchanged.
fn type_text(machine: &mut EnigmaMachine, text: &str) -> String {
    text.chars()
        .map(|c| match Letter::from_char(c) {
            Ok(key) => {
                let lamp = machine.press_key(key);
                machine.release_key(key);
                lamp.to_char()
            }
            Err(_) => c,
        })
        .collect()
}

fn windows(machine: &EnigmaMachine) -> String {
    machine.positions().to_string()
}
