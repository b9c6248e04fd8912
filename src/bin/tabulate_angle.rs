use anyhow::Result;
use clap::Parser;
use lmp_tools::tabulate::{
    AngleTabulator, DEFAULT_COMMENT, HarmonicAngle, TableWriter, Units, open_output,
};

/// tabulate-angle - write a harmonic angle potential as an angle table
///
/// E(θ) = K (θ - θ0)² with K in energy/radian² and angles in degrees,
/// sampled on [0, 180].
///
/// Examples:
///   tabulate-angle                          # 181 points, label HARM, to stdout
///   tabulate-angle -n 1801 -f angle.table   # append a finer table to a file
#[derive(Parser, Debug)]
#[command(author, version = lmp_tools::VERSION, about)]
struct Cli {
    /// Number of table points
    #[arg(short = 'n', long = "num-points", default_value_t = 181)]
    num_points: usize,

    /// Output file; `-` writes to stdout, a file is appended to
    #[arg(short = 'f', long = "filename", default_value = "-")]
    filename: String,

    /// Compute the force numerically from the energy
    #[arg(short = 'd', long = "diff-num")]
    diff_num: bool,

    /// Shift energies so the minimum is zero
    #[arg(short = 'e', long = "eshift")]
    eshift: bool,

    /// Unit system written in the header
    #[arg(short = 'u', long = "units", value_enum, default_value_t = Units::Real)]
    units: Units,

    /// Keyword identifying the table in the file
    #[arg(short = 'l', long = "label", default_value = "HARM")]
    label: String,

    /// Comment line in the header
    #[arg(short = 'c', long = "comment", default_value = DEFAULT_COMMENT)]
    comment: String,

    /// Force constant K (energy/radian²)
    #[arg(long = "k", default_value_t = 50.0)]
    k: f64,

    /// Equilibrium angle θ0 in degrees
    #[arg(long = "theta0", default_value_t = 120.0)]
    theta0: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let potential = HarmonicAngle::new(cli.k, cli.theta0);
    let table = AngleTabulator::new(cli.num_points)
        .with_diff_num(cli.diff_num)
        .with_eshift(cli.eshift)
        .tabulate(&potential, &cli.label, cli.units)?;

    let mut out = open_output(&cli.filename)?;
    TableWriter::new()
        .with_comment(cli.comment)
        .write(&table, &mut out)?;
    Ok(())
}
