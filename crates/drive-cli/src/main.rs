// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — drive-sim CLI
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use anyhow::Context;
use clap::{Parser, Subcommand};
use drive_control::simulator::DriveSimulator;
use drive_control::telemetry::CSV_HEADER;
use drive_optimizer::individual::{OBJECTIVE_NAMES, PARAMETER_NAMES};
use drive_optimizer::nsga2::Nsga2Optimizer;
use drive_types::config::{DriveConfig, OptimizerConfig};
use drive_types::modes::{ControlMode, FaultKind, LoadType, ProtectionMode, PwmType};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "drive-sim")]
#[command(about = "Inverter-fed induction motor drive simulator", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the closed-loop drive for a fixed simulated duration
    Simulate {
        /// JSON drive configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Simulated seconds
        #[arg(short, long, default_value_t = 1.0)]
        duration: f64,

        /// Control mode (V/f, FOC, DTC)
        #[arg(short, long)]
        mode: Option<ControlMode>,

        /// Modulation (SPWM, SVPWM)
        #[arg(short, long)]
        pwm: Option<PwmType>,

        /// Fault injected at t = 0
        #[arg(short, long)]
        fault: Option<FaultKind>,

        /// Load type (Constant, Fan/Pump, Inertia)
        #[arg(short, long)]
        load: Option<LoadType>,

        /// Thermal protection (None, Warning, Shutdown)
        #[arg(long)]
        protection: Option<ProtectionMode>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print every Nth tick as a CSV row (0 = summary only)
        #[arg(long, default_value_t = 0)]
        csv_every: usize,
    },
    /// Search PWM and cooling settings for a Pareto front
    Optimize {
        /// JSON optimizer configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        population: Option<usize>,

        #[arg(long)]
        generations: Option<usize>,

        /// Simulated seconds per evaluation
        #[arg(long)]
        duration: Option<f64>,

        #[arg(long)]
        seed: Option<u64>,

        /// Evaluate candidates on one thread
        #[arg(long)]
        sequential: bool,

        /// Print the front as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            duration,
            mode,
            pwm,
            fault,
            load,
            protection,
            seed,
            csv_every,
        } => {
            let mut cfg = match config {
                Some(path) => DriveConfig::from_file(&path.to_string_lossy())
                    .with_context(|| format!("loading {}", path.display()))?,
                None => DriveConfig::default(),
            };
            if let Some(mode) = mode {
                cfg.control.mode = mode;
            }
            if let Some(pwm) = pwm {
                cfg.inverter.pwm_type = pwm;
            }
            if let Some(fault) = fault {
                cfg.initial_fault = fault;
            }
            if let Some(load) = load {
                cfg.motor.load_type = load;
            }
            if let Some(protection) = protection {
                cfg.protection.mode = protection;
            }
            if let Some(seed) = seed {
                cfg.simulation.seed = seed;
            }
            if !(duration.is_finite() && duration > 0.0) {
                anyhow::bail!("duration must be a positive number of seconds");
            }

            let mut sim = DriveSimulator::new(cfg)?;
            info!(
                mode = sim.mode.label(),
                pwm = sim.pwm.label(),
                duration,
                "simulation started"
            );
            if csv_every > 0 {
                println!("{CSV_HEADER}");
            }
            let mut tick = 0usize;
            let report = sim.run_with(duration, |record| {
                if csv_every > 0 && tick % csv_every == 0 {
                    println!("{}", record.to_csv_row());
                }
                tick += 1;
            });

            eprintln!("steps                  {}", report.steps);
            eprintln!("final speed            {:.3} rad/s", report.final_speed);
            eprintln!("final torque           {:.3} Nm", report.final_torque);
            eprintln!("peak motor temp        {:.2} °C", report.peak_motor_temperature);
            eprintln!("peak inverter temp     {:.2} °C", report.peak_inverter_temperature);
            eprintln!("mean power loss        {:.2} W", report.mean_power_loss);
            eprintln!("mean |speed error|     {:.3} rad/s", report.mean_abs_speed_error);
            eprintln!("time faulted           {:.4} s", report.faulted_time_s);
            eprintln!("final fault            {}", report.final_fault);
        }
        Commands::Optimize {
            config,
            population,
            generations,
            duration,
            seed,
            sequential,
            json,
        } => {
            let mut cfg: OptimizerConfig = match config {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    serde_json::from_str(&text)
                        .with_context(|| format!("parsing {}", path.display()))?
                }
                None => OptimizerConfig::default(),
            };
            if let Some(n) = population {
                cfg.population_size = n;
            }
            if let Some(g) = generations {
                cfg.generations = g;
            }
            if let Some(d) = duration {
                cfg.evaluation_duration = d;
            }
            if let Some(s) = seed {
                cfg.seed = s;
            }
            if sequential {
                cfg.parallel = false;
            }

            let optimizer = Nsga2Optimizer::new(cfg)?;
            let front = optimizer.optimize();

            if json {
                println!("{}", serde_json::to_string_pretty(&front)?);
            } else {
                println!("{},{}", PARAMETER_NAMES.join(","), OBJECTIVE_NAMES.join(","));
                for ind in &front {
                    let p = &ind.parameters;
                    let o = &ind.objectives;
                    println!(
                        "{:.1},{:.4},{:.4},{:.4},{:.3},{:.3},{:.3}",
                        p[0], p[1], p[2], p[3], o[0], o[1], o[2]
                    );
                }
            }
            info!(front_size = front.len(), "optimization finished");
        }
    }

    Ok(())
}
