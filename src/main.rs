use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use quickfoil::config::{AlphaSweep, RunFile, alpha_range};
use quickfoil::geometry::StandardResolver;
use quickfoil::io::excel_read;
use quickfoil::solver::XfoilSolver;
use quickfoil::sweep::{SweepObserver, SweepRunner};
use quickfoil::{AirfoilId, FoilError, Result, RunConfig, SortKey, logging};

const DEFAULT_OUTPUT: &str = "QuickFoil_Run.xlsx";

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => execute_run(args),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn execute_run(args: RunArgs) -> Result<()> {
    let show_progress = !args.no_progress;
    logging::init(if show_progress {
        "quickfoil=warn"
    } else {
        "quickfoil=info"
    })?;

    let plan = args.resolve()?;
    let resolver = StandardResolver::new(args.airfoil_db.clone());
    let solver = XfoilSolver::new(&args.xfoil);

    let progress = show_progress.then(|| ProgressDisplay::new(plan.airfoils.len()));
    let mut runner = SweepRunner::new(resolver, solver);
    if let Some(display) = &progress {
        runner = runner.with_observer(display);
    }

    let outcome = runner.run_and_export(&plan.airfoils, &plan.config, &plan.output);
    if let Some(display) = &progress {
        display.bar.finish_and_clear();
    }
    outcome?;

    println!(
        "wrote {} sheets for {} airfoils to {}",
        plan.config.alphas().len(),
        plan.airfoils.len(),
        plan.output.display()
    );
    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    logging::init("quickfoil=warn")?;
    let sheets = excel_read::read_report(&args.workbook)?;
    for sheet in &sheets {
        let leader = sheet
            .rows
            .first()
            .map(|row| row.airfoil.as_str())
            .unwrap_or("-");
        println!("{}: {} rows, leading {leader}", sheet.title, sheet.rows.len());
    }
    Ok(())
}

/// Fully merged and validated inputs of a `run` invocation.
struct RunPlan {
    airfoils: Vec<AirfoilId>,
    config: RunConfig,
    output: PathBuf,
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Run XFoil over many airfoils and rank them per angle of attack in Excel."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sweep the airfoils and write the report workbook.
    Run(RunArgs),
    /// Summarise a report workbook.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Airfoil to analyse: a NACA 4-digit code or a database name. Repeatable.
    #[arg(short, long = "airfoil", value_name = "NAME")]
    airfoils: Vec<String>,

    /// JSON run file; command line values take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reynolds number.
    #[arg(long, visible_alias = "re")]
    reynolds: Option<f64>,

    /// Mach number, between 0 and 0.3.
    #[arg(long)]
    mach: Option<f64>,

    /// First angle of attack in degrees.
    #[arg(long, allow_negative_numbers = true)]
    alpha_start: Option<f64>,

    /// Last angle of attack in degrees (inclusive).
    #[arg(long, allow_negative_numbers = true)]
    alpha_stop: Option<f64>,

    /// Angle of attack increment in degrees.
    #[arg(long)]
    alpha_step: Option<f64>,

    /// Explicit comma-separated angles of attack.
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        conflicts_with_all = ["alpha_start", "alpha_stop", "alpha_step"]
    )]
    alphas: Vec<f64>,

    /// Coefficient to rank by: CL, CD, CDp, CL/CD, CM or Cpmin.
    #[arg(long)]
    sort_by: Option<String>,

    /// Output workbook path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// XFoil executable.
    #[arg(long, env = "QUICKFOIL_XFOIL", default_value = "xfoil")]
    xfoil: PathBuf,

    /// Directory of Selig `.dat` files for non-NACA airfoils.
    #[arg(long, env = "QUICKFOIL_AIRFOIL_DB")]
    airfoil_db: Option<PathBuf>,

    /// Points per surface after repanelling.
    #[arg(long)]
    panels_per_side: Option<usize>,

    /// Viscous iteration cap.
    #[arg(long)]
    max_iter: Option<u32>,

    /// Per-airfoil solver timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Hide the progress bar and log each airfoil instead.
    #[arg(long)]
    no_progress: bool,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Report workbook to read.
    workbook: PathBuf,
}

impl RunArgs {
    fn resolve(&self) -> Result<RunPlan> {
        let file = match &self.config {
            Some(path) => RunFile::load(path)?,
            None => RunFile::default(),
        };

        let airfoils = if self.airfoils.is_empty() {
            file.airfoils
        } else {
            self.airfoils.iter().map(|name| AirfoilId::new(name.trim())).collect()
        };

        let reynolds = self
            .reynolds
            .or(file.reynolds)
            .ok_or_else(|| FoilError::config("a Reynolds number is required (--reynolds)"))?;
        let mach = self.mach.or(file.mach).unwrap_or(0.0);
        let alphas = self.alpha_sequence(file.alphas.as_ref())?;
        let sort_by = match self.sort_by.as_deref().or(file.sort_by.as_deref()) {
            Some(label) => label.parse::<SortKey>()?,
            None => SortKey::default(),
        };

        let mut settings = file.solver.unwrap_or_default();
        if let Some(points) = self.panels_per_side {
            settings.points_per_side = points;
        }
        if let Some(iterations) = self.max_iter {
            settings.max_iterations = iterations;
        }
        if let Some(seconds) = self.timeout_secs {
            settings.timeout_secs = seconds;
        }

        let config = RunConfig::new(reynolds, mach, alphas, sort_by)?.with_solver_settings(settings)?;
        let output = with_xlsx_extension(
            self.output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        );

        Ok(RunPlan {
            airfoils,
            config,
            output,
        })
    }

    fn alpha_sequence(&self, from_file: Option<&AlphaSweep>) -> Result<Vec<f64>> {
        if !self.alphas.is_empty() {
            return Ok(self.alphas.clone());
        }
        match (self.alpha_start, self.alpha_stop, self.alpha_step) {
            (Some(start), Some(stop), Some(step)) => alpha_range(start, stop, step),
            (None, None, None) => match from_file {
                Some(sweep) => sweep.to_alphas(),
                // Quarter-degree steps from -5 up to, not including, 15.
                None => alpha_range(-5.0, 14.75, 0.25),
            },
            _ => Err(FoilError::config(
                "--alpha-start, --alpha-stop and --alpha-step must be given together",
            )),
        }
    }
}

fn with_xlsx_extension(path: PathBuf) -> PathBuf {
    let is_xlsx = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("xlsx"));
    if is_xlsx {
        return path;
    }
    let mut raw: OsString = path.into_os_string();
    raw.push(".xlsx");
    PathBuf::from(raw)
}

struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:30} {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl SweepObserver for ProgressDisplay {
    fn on_airfoil_started(&self, airfoil: &AirfoilId, _position: usize, _total: usize) {
        self.bar.set_message(airfoil.to_string());
    }

    fn on_airfoil_finished(&self, _airfoil: &AirfoilId, _position: usize, _total: usize) {
        self.bar.inc(1);
    }
}
