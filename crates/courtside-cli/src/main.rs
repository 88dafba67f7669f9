// Courtside entry point.
//
// Startup sequence:
// 1. Parse command line
// 2. Load config
// 3. Initialize tracing (log to file, not terminal)
// 4. Open the season store for the selected gender
// 5. Run the subcommand and print its output

use courtside::config;
use courtside::render::{self, StatView};
use courtside::store::SeasonStore;
use courtside_core::{CategoryData, FinderQuery, Gender, Group, PlayerReport, Season};

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "courtside", version, about = "Lineup and on/off statistics for a basketball season")]
struct Cli {
    /// Gender to read data for (`men` or `women`); defaults to config
    #[arg(long, global = true)]
    gender: Option<Gender>,

    /// Season key such as 2023-24, or `Yearly`; defaults to the latest season
    #[arg(long, global = true)]
    season: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available seasons, latest first
    Seasons,

    /// Show the lineup or player table for a category
    Lineups {
        /// Category index (0 is season totals)
        #[arg(long, default_value_t = 0)]
        category: usize,

        /// Table to show
        #[arg(long, default_value = "lineups")]
        group: Group,

        /// Column set
        #[arg(long, value_enum, default_value_t = StatView::Total)]
        view: StatView,

        /// Include records below one possession per game
        #[arg(long)]
        all: bool,
    },

    /// On/off report for one player
    Report {
        /// Player name as it appears in the lineups
        #[arg(long)]
        player: String,

        /// Category index (0 is season totals)
        #[arg(long, default_value_t = 0)]
        category: usize,
    },

    /// Find lineups with and without given players
    Find {
        /// Player who must be on the floor (repeatable)
        #[arg(long)]
        include: Vec<String>,

        /// Player who must be off the floor (repeatable)
        #[arg(long)]
        omit: Vec<String>,

        /// Category index (0 is season totals)
        #[arg(long, default_value_t = 0)]
        category: usize,

        /// Column set
        #[arg(long, value_enum, default_value_t = StatView::Total)]
        view: StatView,
    },
}

fn main() -> anyhow::Result<()> {
    // 1. Parse command line
    let cli = Cli::parse();

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 3. Initialize tracing
    init_tracing(&config.log_dir)?;
    info!("Courtside starting: {:?}", cli.command);

    // 4. Open the season store
    let gender = cli.gender.unwrap_or(config.gender);
    let store = SeasonStore::new(config.season_dir(gender));
    info!("Reading {} data from {}", gender, store.dir().display());

    // 5. Run the subcommand
    match cli.command {
        Commands::Seasons => {
            let keys = store.available().context("failed to list seasons")?;
            if keys.is_empty() {
                println!("no seasons found in {}", store.dir().display());
            }
            for key in keys {
                println!("{key}");
            }
        }
        Commands::Lineups {
            category,
            group,
            view,
            all,
        } => {
            let season = load_season(&store, cli.season.as_deref())?;
            let data = category_of(&season, category)?;
            let records = data.qualified(group, config.display.filter_possessions && !all);
            info!(
                "{} {}: {} of {} records shown",
                data.game,
                group,
                records.len(),
                data.records(group).len()
            );
            println!("{} {} - {}", season.year, data.game, group);
            if records.is_empty() {
                println!("no lineups found");
            } else {
                print!("{}", render::render_table(&records, view, config.display.max_rows));
            }
        }
        Commands::Report { player, category } => {
            let season = load_season(&store, cli.season.as_deref())?;
            let data = category_of(&season, category)?;
            if !data.player_names().iter().any(|name| *name == player) {
                warn!("player {player:?} not in the {} player table", data.game);
            }
            let report = PlayerReport::build(data, &player);
            print!("{}", render::render_report(&report));
        }
        Commands::Find {
            include,
            omit,
            category,
            view,
        } => {
            let season = load_season(&store, cli.season.as_deref())?;
            let data = category_of(&season, category)?;
            let query =
                FinderQuery::from_lists(&include, &omit).context("invalid finder query")?;
            let found = query.run(&data.lineups);
            info!(
                "finder include={include:?} omit={omit:?}: {} of {} lineups",
                found.len(),
                data.lineups.len()
            );
            if found.is_empty() {
                println!("no lineups found");
            } else {
                print!("{}", render::render_table(&found, view, config.display.max_rows));
            }
        }
    }

    Ok(())
}

fn load_season(store: &SeasonStore, key: Option<&str>) -> anyhow::Result<Season> {
    let season = store
        .load(key)
        .with_context(|| format!("failed to load season from {}", store.dir().display()))?;
    info!(
        "Loaded season {} with {} categories",
        season.year,
        season.categories.len()
    );
    Ok(season)
}

fn category_of(season: &Season, index: usize) -> anyhow::Result<&CategoryData> {
    season.category(index).with_context(|| {
        format!(
            "season {} has no category {index} ({} categories)",
            season.year,
            season.categories.len()
        )
    })
}

/// Initialize tracing to log to a file (the terminal carries command output).
fn init_tracing(log_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("courtside.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtside=info,courtside_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
