mod cmd;
mod core;

use clap::{Parser, Subcommand};
use cmd::DataArgs;

#[derive(Parser, Debug)]
#[command(name = "councilc", version, about = "UK Council Tax and Budget Explorer")]
struct Opts {
    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Everything known about one council
    Show(cmd::show::ShowCommand),
    /// Find councils by name, type or area code
    Search(cmd::search::SearchCommand),
    /// Council tax for every band from a Band D figure
    Bands(cmd::bands::BandsCommand),
    /// National and per-type Band D statistics
    Stats(cmd::stats::StatsCommand),
    /// Highest or lowest councils by Band D, spending per resident or overhead
    Rankings(cmd::rankings::RankingsCommand),
    /// Year-over-year Band D changes
    Changes(cmd::changes::ChangesCommand),
    /// Histogram of current Band D figures
    Distribution(cmd::distribution::DistributionCommand),
    /// Spending per resident and administrative overhead
    Efficiency(cmd::efficiency::EfficiencyCommand),
    /// Service spending by category
    Spending(cmd::spending::SpendingCommand),
    /// Compare two councils side by side
    Compare(cmd::compare::CompareCommand),
    /// Report data gaps (exits 1 when any are found)
    Validate(cmd::validate::ValidateCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    log::debug!("{:?}", opts.command);

    match opts.command {
        Command::Show(show) => show.exec(&opts.data),
        Command::Search(search) => search.exec(&opts.data),
        Command::Bands(bands) => bands.exec(&opts.data),
        Command::Stats(stats) => stats.exec(&opts.data),
        Command::Rankings(rankings) => rankings.exec(&opts.data),
        Command::Changes(changes) => changes.exec(&opts.data),
        Command::Distribution(distribution) => distribution.exec(&opts.data),
        Command::Efficiency(efficiency) => efficiency.exec(&opts.data),
        Command::Spending(spending) => spending.exec(&opts.data),
        Command::Compare(compare) => compare.exec(&opts.data),
        Command::Validate(validate) => validate.exec(&opts.data),
        Command::Schema(schema) => schema.exec(),
    }
}
