#![forbid(unsafe_code)]
use anyhow::Result;
use grafik::{
    calendar::MonthRef,
    generator::{generate_schedule, validate_exact_coverage, ScheduleError, ShiftRequirements},
    io,
    model::ManualConstraints,
    storage::{JsonStorage, Storage},
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de plannings jour/nuit (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le planning d'un mois
    Generate {
        /// Salariés (JSON ou CSV)
        #[arg(long)]
        employees: String,
        /// Contraintes manuelles (CSV `employee_id,1,2,...`)
        #[arg(long)]
        constraints: Option<String>,
        #[arg(long)]
        year: i32,
        /// 1 = janvier
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Ne garder que les salariés de ce service
        #[arg(long)]
        department: Option<String>,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        day_shift: i64,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        night_shift: i64,
        /// Refuser les effectifs hors plage au lieu de les ramener à 1
        #[arg(long)]
        strict: bool,
        /// Fichier JSON de sortie
        #[arg(long, default_value = "schedule.json")]
        out: String,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Revérifier qu'un planning enregistré couvre exactement le besoin
    Check {
        #[arg(long, default_value = "schedule.json")]
        schedule: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            employees,
            constraints,
            year,
            month,
            department,
            day_shift,
            night_shift,
            strict,
            out,
            out_csv,
        } => {
            let mut staff = io::import_employees(&employees)?;
            if let Some(dept) = department {
                staff.retain(|e| e.department == dept);
            }
            let constraints = match constraints {
                Some(path) => io::import_constraints_csv(path)?,
                None => ManualConstraints::new(),
            };
            let month_ref = MonthRef::new(year, month - 1)?;
            let requirements = if strict {
                ShiftRequirements::new(day_shift, night_shift)?
            } else {
                ShiftRequirements::normalized(Some(day_shift), Some(night_shift))
            };

            match generate_schedule(&staff, month_ref, &constraints, requirements) {
                Ok(generated) => {
                    let storage = JsonStorage::open(&out)?;
                    storage.save(&generated)?;
                    if let Some(path) = out_csv {
                        io::export_schedule_csv(path, &generated)?;
                    }
                    for row in generated.schedule.rows() {
                        println!(
                            "{} | {} shift(s)",
                            row.employee,
                            generated.schedule.working_shifts(&row.employee)
                        );
                    }
                    println!(
                        "OK: {} days written to {}",
                        generated.days_in_month,
                        storage.path().display()
                    );
                    0
                }
                Err(
                    err @ (ScheduleError::InsufficientCapacity { .. }
                    | ScheduleError::UncoveredShifts(_)),
                ) => {
                    eprintln!("{err}");
                    // Code 2 = planning incomplet
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Check { schedule } => {
            let generated = JsonStorage::open(&schedule)?.load()?;
            match validate_exact_coverage(&generated.schedule, &generated.demand()) {
                Ok(()) => {
                    println!("OK: all shifts covered");
                    0
                }
                Err(err) => {
                    eprintln!("{err}");
                    2
                }
            }
        }
    };

    std::process::exit(code);
}
