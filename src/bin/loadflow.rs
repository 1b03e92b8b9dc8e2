use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use loadflow::debug::format_ybus;
use loadflow::{load_case, load_powerviz, report, runpf, Case, Network, PFOptionsBuilder};
use std::fs::File;
use std::path::PathBuf;

/// Newton-Raphson power flow.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Power Flow
    #[clap(name = "pf")]
    PowerFlow(PfArgs),

    /// Bus admittance matrix
    #[clap(name = "ybus")]
    YBus(InputArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Bus table (CSV).
    #[arg(long, requires = "line", conflicts_with = "powerviz")]
    bus: Option<PathBuf>,

    /// Line table (CSV).
    #[arg(long, requires = "bus")]
    line: Option<PathBuf>,

    /// PowerViz case file.
    #[arg(long)]
    powerviz: Option<PathBuf>,
}

#[derive(Args)]
struct PfArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Write the results to this file as JSON.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Slack bus number.
    #[arg(long)]
    slack: Option<usize>,

    /// System MVA base.
    #[arg(long)]
    base_mva: Option<f64>,

    /// Starting voltage magnitude (p.u.).
    #[arg(long)]
    vm_start: Option<f64>,

    /// Starting voltage angle (degrees).
    #[arg(long)]
    va_start: Option<f64>,

    /// Maximum active power mismatch (MW).
    #[arg(long)]
    max_mw: Option<f64>,

    /// Maximum reactive power mismatch (Mvar).
    #[arg(long)]
    max_mvar: Option<f64>,

    /// Maximum number of iterations.
    #[arg(long)]
    max_it: Option<usize>,

    /// Minimum operating voltage (p.u.).
    #[arg(long)]
    vmin: Option<f64>,

    /// Maximum operating voltage (p.u.).
    #[arg(long)]
    vmax: Option<f64>,
}

fn main() {
    env_logger::Builder::from_default_env()
        .format_level(false)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(_) => {
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(2);
        }
    }
}

/// Returns the case and the power base given in the file, if any.
fn read_input(args: &InputArgs) -> Result<(Case, Option<f64>)> {
    match (&args.bus, &args.line, &args.powerviz) {
        (Some(bus), Some(line), None) => Ok((load_case(bus, line)?, None)),
        (None, None, Some(path)) => {
            let (case, base_mva) = load_powerviz(path)?;
            Ok((case, Some(base_mva)))
        }
        _ => Err(anyhow!("specify either --bus and --line, or --powerviz")),
    }
}

fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::YBus(args) => {
            let (case, _) = read_input(args)?;
            let net = Network::new(&case)?;
            println!("{}", format_ybus(&net.y_bus));
            Ok(())
        }
        Commands::PowerFlow(args) => power_flow(args),
    }
}

fn power_flow(args: &PfArgs) -> Result<()> {
    let (case, file_base) = read_input(&args.input)?;

    let mut builder = PFOptionsBuilder::default();
    if let Some(base_mva) = args.base_mva.or(file_base) {
        builder.base_mva(base_mva);
    }
    if let Some(slack) = args.slack {
        builder.slack_bus(slack);
    }
    if let Some(vm) = args.vm_start {
        builder.vm_start(vm);
    }
    if let Some(va) = args.va_start {
        builder.va_start(va);
    }
    if let Some(mw) = args.max_mw {
        builder.max_mismatch_mw(mw);
    }
    if let Some(mvar) = args.max_mvar {
        builder.max_mismatch_mvar(mvar);
    }
    if let Some(max_it) = args.max_it {
        builder.max_it(max_it);
    }
    if let Some(vmin) = args.vmin {
        builder.vmin(vmin);
    }
    if let Some(vmax) = args.vmax {
        builder.vmax(vmax);
    }
    let opt = builder.build()?;

    let results = runpf(&case, &opt)?;
    println!("{}", report::report(&results));

    if let Some(out_path) = &args.output {
        let file = File::create(out_path)
            .with_context(|| format!("unable to create {}", out_path.display()))?;
        serde_json::to_writer_pretty(file, &results)?;
    }

    if !results.converged() {
        return Err(anyhow!("power flow did not succeed"));
    }
    Ok(())
}
