use cabin_interlock::actuators::{ActuatorOutputs, ActuatorSink};
use cabin_interlock::report::{ReportFormat, SerialReportSink};
use cabin_interlock::sensors::{RawSensorReadings, ScriptedSensors};
use cabin_interlock::{Controller, ControllerConfig, ControllerState};
use clap::{App, Arg};
use colored::*;
use std::time::Duration;
use tokio::time;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_PERIOD_MS: &str = "100";

/// Actuator bank that prints each output change to the console.
#[derive(Default)]
struct ConsoleActuators {
    current: ActuatorOutputs,
    applied_once: bool,
}

impl ConsoleActuators {
    fn describe(label: &str, on: bool) -> ColoredString {
        if on {
            format!("{}:ON", label).green().bold()
        } else {
            format!("{}:off", label).dimmed()
        }
    }
}

impl ActuatorSink for ConsoleActuators {
    fn set_alarm(&mut self, driven: bool) {
        self.current.alarm_driven = driven;
    }

    fn set_engine_power(&mut self, powered: bool) {
        self.current.engine_powered = powered;
    }

    fn set_safe_indicator(&mut self, on: bool) {
        self.current.safe_indicator = on;
    }

    fn set_running_indicator(&mut self, on: bool) {
        self.current.running_indicator = on;
    }

    fn set_headlight_lamps(&mut self, on: bool) {
        self.current.headlight_lamps = on;
    }

    fn set_highbeam_lamps(&mut self, on: bool) {
        self.current.highbeam_lamps = on;
    }

    fn apply(&mut self, outputs: &ActuatorOutputs) {
        if self.applied_once && *outputs == self.current {
            return;
        }
        self.applied_once = true;
        self.current = *outputs;

        let alarm = if outputs.alarm_driven {
            "ALARM".red().bold()
        } else {
            "alarm".dimmed()
        };
        println!(
            "\n[outputs] {} {} {} {} {} {}",
            alarm,
            Self::describe("engine", outputs.engine_powered),
            Self::describe("safe", outputs.safe_indicator),
            Self::describe("running", outputs.running_indicator),
            Self::describe("lamps", outputs.headlight_lamps),
            Self::describe("highbeam", outputs.highbeam_lamps),
        );
    }
}

/// Occupants sit down, buckle up, start the engine, drive into dusk, a
/// passenger unbuckles mid-drive, buckles back up and the driver restarts.
fn demo_script() -> Result<ScriptedSensors, &'static str> {
    let seated = RawSensorReadings::all_safe().with_knob(0.5);
    let mut unbuckled = seated;
    unbuckled.passenger_seatbelt = false;
    let mut driver_only = RawSensorReadings::default();
    driver_only.driver_present = true;

    let mut script = ScriptedSensors::new();
    script.push(RawSensorReadings::default(), 3)?;
    script.push(driver_only, 3)?;
    script.push(driver_only.with_button(true), 2)?;
    script.push(driver_only, 2)?;
    script.push(seated, 3)?;
    script.push(seated.with_button(true), 3)?;
    script.push(seated, 3)?;
    script.push(seated.with_ambient(0.1), 4)?;
    script.push(seated.with_ambient(0.1).with_highbeam(true), 3)?;
    script.push(unbuckled.with_ambient(0.1), 3)?;
    script.push(seated.with_ambient(0.1), 3)?;
    script.push(seated.with_ambient(0.1).with_button(true), 2)?;
    script.push(seated.with_ambient(0.8), 3)?;
    script.push(seated.with_button(true), 2)?;
    script.push(seated, 3)?;
    Ok(script)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("cabin-interlock-sim")
        .version("0.1.0")
        .author("Vehicle Systems Engineering Team")
        .about("🚗 Cabin interlock controller - host simulation driver")
        .arg(
            Arg::with_name("scenario")
                .short("s")
                .long("scenario")
                .value_name("FILE")
                .help("JSON scenario of sensor frames to replay (built-in demo if omitted)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON controller configuration")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("period")
                .short("p")
                .long("period-ms")
                .value_name("MS")
                .help("Control loop period in milliseconds")
                .takes_value(true)
                .default_value(DEFAULT_PERIOD_MS)
                .validator(|v| match v.parse::<u64>() {
                    Ok(ms) if ms > 0 => Ok(()),
                    _ => Err("Period must be a positive number".into()),
                }),
        )
        .arg(
            Arg::with_name("ticks")
                .short("n")
                .long("ticks")
                .value_name("COUNT")
                .help("Number of ticks to run (defaults to the scenario length)")
                .takes_value(true)
                .validator(|v| match v.parse::<u64>() {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Tick count must be a valid number".into()),
                }),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Emit reports as JSON lines instead of operator text"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable verbose output"),
        )
        .get_matches();

    let level = if matches.is_present("verbose") { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match matches.value_of("config") {
        Some(path) => ControllerConfig::from_file(path)?,
        None => ControllerConfig::default(),
    };

    let mut sensors = match matches.value_of("scenario") {
        Some(path) => ScriptedSensors::from_json_str(&std::fs::read_to_string(path)?)?,
        None => demo_script()?,
    };

    let period_ms: u64 = matches.value_of("period").unwrap_or(DEFAULT_PERIOD_MS).parse()?;
    let ticks = match matches.value_of("ticks") {
        Some(n) => n.parse::<u64>()?,
        None => sensors.total_ticks(),
    };

    let format = if matches.is_present("json") {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };

    let mut controller = Controller::with_config(config);
    let mut actuators = ConsoleActuators::default();
    let mut reports = SerialReportSink::new(std::io::stdout(), format);

    println!("{}", "🚗 Cabin Interlock Simulator".bold());
    println!("================================");
    info!("Running {} ticks at {} ms", ticks, period_ms);

    let mut interval = time::interval(Duration::from_millis(period_ms));
    let mut last_state = controller.state();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    for _ in 0..ticks {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => {
                info!("Interrupted");
                break;
            }
        }

        match controller.run_cycle(&mut sensors, &mut actuators, &mut reports) {
            Ok(outcome) => {
                if outcome.state != last_state {
                    let label = match outcome.state {
                        ControllerState::Idle => "IDLE".yellow(),
                        ControllerState::Running => "RUNNING".green(),
                        ControllerState::Inhibited => "INHIBITED".red(),
                    };
                    println!("\n[state] {}", label.bold());
                    last_state = outcome.state;
                }
            }
            Err(e) => {
                error!("❌ Controller error: {}", e);
                break;
            }
        }
    }

    let stats = controller.stats();
    println!();
    info!(
        "Stopped after {} ticks: {} starts, {} inhibits, {} forced stops",
        stats.ticks, stats.engine_starts, stats.inhibit_count, stats.forced_stops
    );

    Ok(())
}
