//! Command handlers

use core::fmt::Write;

use super::parser::ParsedCommand;
use super::ConsoleError;
use crate::adc::{ntc_resistance, raw_to_millivolts, thermistor_celsius, AdcError};
use crate::config::{ADC_ONESHOT_SAMPLES, NTC_DIVIDER_OHMS};
use crate::fault::FaultSnapshot;
use crate::led::LedMode;
use crate::tick::Uptime;

const LED_USAGE: &str = "usage: led off|slow|fast";
const ADC_USAGE: &str = "usage: adc start|stop|volts|latest|avg|temp";

/// What command handlers may read and change.
///
/// Implemented by the application on top of its peripherals, and by fakes in
/// tests.
pub trait ConsoleContext {
    fn uptime_ms(&self) -> u32;
    fn led_mode(&self) -> LedMode;
    fn set_led_mode(&mut self, mode: LedMode);
    fn adc_start(&mut self);
    fn adc_stop(&mut self);
    /// Mean of the periodic sample window (0 when stopped)
    fn adc_average(&self) -> u16;
    /// Blocking average of `samples` one-shot reads
    fn adc_read_avg(&mut self, samples: u8) -> Result<u16, AdcError>;
    fn fault(&self) -> FaultSnapshot;
}

/// Console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Uptime,
    Led,
    Adc,
}

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub command: Command,
}

/// All available commands, in `help` order
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", help: "show this help", command: Command::Help },
    CommandDescriptor { name: "status", help: "system status", command: Command::Status },
    CommandDescriptor { name: "uptime", help: "system uptime", command: Command::Uptime },
    CommandDescriptor { name: "led", help: "led off|slow|fast", command: Command::Led },
    CommandDescriptor { name: "adc", help: "adc start|stop|volts|latest|avg|temp", command: Command::Adc },
];

/// Look up a command by exact name. First match wins.
pub fn find(name: &str) -> Option<&'static CommandDescriptor> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Get all command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

/// Execute a parsed command
pub fn execute(
    cmd: &ParsedCommand<'_>,
    ctx: &mut dyn ConsoleContext,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if cmd.is_empty() {
        return Ok(()); // Empty line, do nothing
    }

    let descriptor = find(cmd.command()).ok_or(ConsoleError::UnknownCommand)?;

    match descriptor.command {
        Command::Help => cmd_help(out),
        Command::Status => cmd_status(ctx, out),
        Command::Uptime => cmd_uptime(ctx, out),
        Command::Led => cmd_led(cmd, ctx, out),
        Command::Adc => cmd_adc(cmd, ctx, out),
    }
}

// --- Command Implementations ---

fn cmd_help(out: &mut dyn Write) -> Result<(), ConsoleError> {
    for c in COMMANDS {
        let _ = write!(out, "{:<6} - {}\r\n", c.name, c.help);
    }
    Ok(())
}

fn cmd_status(ctx: &mut dyn ConsoleContext, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = write!(
        out,
        "led={} uptime={} ms\r\n",
        ctx.led_mode().name(),
        ctx.uptime_ms()
    );

    let fault = ctx.fault();
    if fault.active {
        let _ = write!(out, "fault={} count={}\r\n", fault.code.as_str(), fault.count);
    }

    ok(out)
}

fn cmd_uptime(ctx: &mut dyn ConsoleContext, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = write!(out, "{}\r\n", Uptime::from_ms(ctx.uptime_ms()));
    Ok(())
}

fn cmd_led(
    cmd: &ParsedCommand<'_>,
    ctx: &mut dyn ConsoleContext,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let arg = cmd.arg(0).ok_or(ConsoleError::Usage(LED_USAGE))?;
    let mode = LedMode::parse(arg).ok_or(ConsoleError::InvalidMode)?;

    ctx.set_led_mode(mode);
    ok(out)
}

fn cmd_adc(
    cmd: &ParsedCommand<'_>,
    ctx: &mut dyn ConsoleContext,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let sub = cmd.arg(0).ok_or(ConsoleError::Usage(ADC_USAGE))?;

    match sub {
        "start" => {
            ctx.adc_start();
            let _ = write!(out, "adc started\r\n");
        }
        "stop" => {
            ctx.adc_stop();
            let _ = write!(out, "adc stopped\r\n");
        }
        "volts" => {
            let raw = ctx.adc_average();
            let _ = write!(out, "ADC volts={} mV\r\n", raw_to_millivolts(raw));
        }
        "latest" => {
            let raw = ctx.adc_read_avg(ADC_ONESHOT_SAMPLES)?;
            let _ = write!(out, "ADC latest={} (raw) [{} mV]\r\n", raw, raw_to_millivolts(raw));
        }
        "avg" => {
            let raw = ctx.adc_average();
            let _ = write!(out, "ADC avg={}  [{} mV]\r\n", raw, raw_to_millivolts(raw));
        }
        "temp" => {
            let raw = ctx.adc_read_avg(ADC_ONESHOT_SAMPLES)?;
            let temp_c = thermistor_celsius(raw);
            if !temp_c.is_finite() {
                return Err(ConsoleError::TempError);
            }
            let r_ntc = ntc_resistance(raw, NTC_DIVIDER_OHMS);
            let _ = write!(
                out,
                "ADC={}  Rntc={:.0} ohm  Temp={:.2} C\r\n",
                raw, r_ntc, temp_c
            );
        }
        _ => return Err(ConsoleError::UnknownAdcCommand),
    }

    ok(out)
}

fn ok(out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = write!(out, "ok\r\n");
    Ok(())
}
