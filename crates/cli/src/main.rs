mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use catalog::{CollectionItem, CollectionSource, PickerError};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use discogs_client::DiscogsClient;
use history::{export_to_file, ExportFormat, HistoryEntry, HistoryStore, Rating, Statistics};
use sampler::{FilteredSampler, ItemFilter};

use crate::config::{FileConfig, Overrides, Settings, DEFAULT_CONFIG_FILE};

/// Discogs Random Picker - pick something to listen to from your collection
#[derive(Parser)]
#[command(name = "discogs-pick", version)]
#[command(about = "Pick a random record from your Discogs collection", long_about = None)]
struct Cli {
    /// JSON config file [default: discogs-picker.json]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Discogs username
    #[arg(long, env = "DISCOGS_USERNAME", global = true)]
    username: Option<String>,

    /// Discogs personal access token
    #[arg(long, env = "DISCOGS_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Where the listening history is stored
    #[arg(long, env = "DISCOGS_HISTORY_FILE", global = true)]
    history_file: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a random record, optionally filtered
    Pick(PickArgs),

    /// Show how many items are in the collection
    Size,

    /// List one page of the collection
    Browse {
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Items per page (Discogs allows at most 100)
        #[arg(long, default_value = "25", value_parser = clap::value_parser!(u32).range(1..=100))]
        per_page: u32,
    },

    /// Show the most recent listens
    History {
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show listening statistics
    Stats,

    /// Export the listening history
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Output file [default: listening_history.<ext>]
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Delete the whole listening history
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct PickArgs {
    /// Genre contains (case-insensitive)
    #[arg(long)]
    genre: Option<String>,

    /// Style contains (case-insensitive)
    #[arg(long)]
    style: Option<String>,

    /// Exact release year
    #[arg(long)]
    year: Option<u16>,

    /// Artist contains (case-insensitive)
    #[arg(long)]
    artist: Option<String>,

    /// Format name or description contains, e.g. "vinyl" or "LP"
    #[arg(long)]
    format: Option<String>,

    /// Earliest release year (inclusive)
    #[arg(long)]
    min_year: Option<u16>,

    /// Latest release year (inclusive)
    #[arg(long)]
    max_year: Option<u16>,

    /// Record the pick in the listening history
    #[arg(long)]
    record: bool,

    /// Rate the pick from 1 to 5 stars
    #[arg(long, requires = "record", value_parser = clap::value_parser!(u8).range(1..=5))]
    rating: Option<u8>,

    /// Attach a note to the recorded listen
    #[arg(long, requires = "record")]
    note: Option<String>,
}

impl PickArgs {
    fn filter(&self) -> ItemFilter {
        let mut filter = ItemFilter::new().with_year_range(self.min_year, self.max_year);
        if let Some(genre) = &self.genre {
            filter = filter.with_genre(genre.as_str());
        }
        if let Some(style) = &self.style {
            filter = filter.with_style(style.as_str());
        }
        if let Some(year) = self.year {
            filter = filter.with_year(year);
        }
        if let Some(artist) = &self.artist {
            filter = filter.with_artist(artist.as_str());
        }
        if let Some(format) = &self.format {
            filter = filter.with_format(format.as_str());
        }
        filter
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Html,
    #[value(alias = "md")]
    Markdown,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Html => ExportFormat::Html,
            FormatArg::Markdown => ExportFormat::Markdown,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries command output
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new(default_filter)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    let store = HistoryStore::new(&settings.history_file);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Pick(args) => handle_pick(&settings, &store, &args),
        Commands::Size => handle_size(&settings),
        Commands::Browse { page, per_page } => handle_browse(&settings, page, per_page),
        Commands::History { limit } => handle_history(&store, limit),
        Commands::Stats => handle_stats(&store),
        Commands::Export { format, output } => handle_export(&store, format.into(), output),
        Commands::Clear { yes } => handle_clear(&store, yes),
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let (path, explicit) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let file = FileConfig::load(&path, explicit)?;
    let overrides = Overrides {
        username: cli.username.clone(),
        token: cli.token.clone(),
        history_file: cli.history_file.clone(),
    };
    Ok(Settings::resolve(file, overrides))
}

fn client(settings: &Settings) -> Result<DiscogsClient> {
    let credentials = settings.credentials()?;
    Ok(DiscogsClient::new(
        settings.client_config(&credentials),
        &credentials.token,
    ))
}

/// Handle the 'pick' command
fn handle_pick(settings: &Settings, store: &HistoryStore, args: &PickArgs) -> Result<()> {
    let client = client(settings)?;
    let filter = args.filter();
    let mut sampler = FilteredSampler::new(&client).with_max_attempts(settings.max_attempts);

    if filter.is_identity() {
        println!("Picking a random record...");
    } else {
        println!("Picking a random record matching your filters...");
    }

    let item = sampler.pick_random(&filter)?;
    print_item(&item);

    // The pick already succeeded; an unreadable history only loses the count
    match store.count_by_identifier(item.id) {
        Ok(0) => println!("\n{}", "First time picked!".green()),
        Ok(count) => println!(
            "\n{}",
            format!("Already listened {} time(s)", count).yellow()
        ),
        Err(err) => tracing::warn!("Could not read listening history: {}", err),
    }

    if args.record {
        let mut entry = HistoryEntry::from_item(&item, Local::now().naive_local());
        if let Some(stars) = args.rating {
            entry = entry.with_rating(Rating::new(stars)?);
        }
        if let Some(note) = &args.note {
            entry = entry.with_note(note.as_str());
        }
        store
            .append(entry)
            .context("Failed to record the listen")?;
        println!(
            "{} Added to listening history ({})",
            "✓".green(),
            store.path().display()
        );
    }

    Ok(())
}

/// Handle the 'size' command
fn handle_size(settings: &Settings) -> Result<()> {
    let client = client(settings)?;
    let size = client.fetch_collection_size()?;
    println!("Your collection contains {} items", size.to_string().bold());
    Ok(())
}

/// Handle the 'browse' command
fn handle_browse(settings: &Settings, page: u64, per_page: u32) -> Result<()> {
    let client = client(settings)?;
    let collection_page = client.fetch_page(page, per_page)?;

    let pages = collection_page.total_items.div_ceil(per_page as u64).max(1);
    println!(
        "{}",
        format!(
            "Page {} of {} ({} items in collection)",
            page, pages, collection_page.total_items
        )
        .bold()
        .blue()
    );

    if collection_page.items.is_empty() {
        println!("No items on this page");
        return Ok(());
    }

    let offset = (page - 1) * per_page as u64;
    for (i, item) in collection_page.items.iter().enumerate() {
        println!(
            "{:>4}. {} [{}]",
            (offset + i as u64 + 1).to_string().green(),
            item,
            item.formats_label()
        );
    }
    Ok(())
}

/// Handle the 'history' command
fn handle_history(store: &HistoryStore, limit: usize) -> Result<()> {
    let entries = store.recent(Some(limit))?;
    if entries.is_empty() {
        println!("No listening history yet");
        return Ok(());
    }

    println!("{}", "Recent listens:".bold().blue());
    for entry in &entries {
        let rating = entry
            .rating()
            .map(|rating| format!(" {}", "★".repeat(rating.stars() as usize).yellow()))
            .unwrap_or_default();
        println!(
            "{}  {}{}",
            entry.listened_at().format("%Y-%m-%d %H:%M").to_string().dimmed(),
            entry,
            rating
        );
        if let Some(note) = entry.note() {
            println!("                  {}", note.italic());
        }
    }
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(store: &HistoryStore) -> Result<()> {
    let stats = store.aggregate()?;
    print_statistics(&stats);
    Ok(())
}

/// Handle the 'export' command
fn handle_export(store: &HistoryStore, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let output =
        output.unwrap_or_else(|| PathBuf::from(format!("listening_history.{}", format.extension())));
    let entries = store.load()?;
    export_to_file(format, &entries, &output)
        .with_context(|| format!("Failed to export history to {}", output.display()))?;
    println!(
        "{} Exported {} entries to {}",
        "✓".green(),
        entries.len(),
        output.display()
    );
    Ok(())
}

/// Handle the 'clear' command
fn handle_clear(store: &HistoryStore, yes: bool) -> Result<()> {
    if !yes {
        bail!(
            "Refusing to clear {} without --yes",
            store.path().display()
        );
    }
    store.clear()?;
    println!("{} Listening history cleared", "✓".green());
    Ok(())
}

fn print_item(item: &CollectionItem) {
    println!("\n{}", "🎵 Your random pick:".bold().blue());
    println!("{}Artist: {}", "• ".green(), item.artists_label().bold());
    println!("{}Title:  {}", "• ".green(), item.title.bold());
    println!("{}Year:   {}", "• ".green(), item.year_label());
    if !item.formats.is_empty() {
        println!("{}Format: {}", "• ".green(), item.formats_label());
    }
    if !item.genres.is_empty() {
        println!("{}Genres: {}", "• ".green(), item.genres_label());
    }
    if !item.styles.is_empty() {
        println!("{}Styles: {}", "• ".green(), item.styles_label());
    }
    if let Some(cover) = &item.cover_image {
        println!("{}Cover:  {}", "• ".green(), cover);
    }
}

fn print_statistics(stats: &Statistics) {
    println!("{}", "Listening statistics:".bold().blue());
    if stats.is_empty() {
        println!("No listening history yet");
        return;
    }

    println!("{}Total listens: {}", "• ".cyan(), stats.total);
    if let Some(artist) = &stats.most_listened_artist {
        println!("{}Most listened artist: {}", "• ".cyan(), artist);
    }
    if let Some(year) = &stats.most_popular_year {
        println!("{}Most popular year: {}", "• ".cyan(), year);
    }
    if let Some(decade) = &stats.most_popular_decade {
        println!("{}Most popular decade: {}", "• ".cyan(), decade);
    }

    println!("\nTop artists:");
    for (artist, count) in stats.top_artists(5) {
        println!("  - {} ({})", artist, count);
    }
    println!("\nTop years:");
    for (year, count) in stats.top_years(5) {
        println!("  - {} ({})", year, count);
    }
}

/// One colored line, plus a hint for errors the user can act on
fn report(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let hint = match err.downcast_ref::<PickerError>() {
        Some(PickerError::NoMatchFound { .. }) => Some("Try relaxing your filter criteria"),
        Some(PickerError::RateLimited { .. }) => Some("Discogs is throttling requests, try again in a minute"),
        Some(PickerError::EmptyCollection) => Some("Add some releases to your Discogs collection first"),
        Some(PickerError::Unauthorized) => Some("Check DISCOGS_TOKEN or the token in your config file"),
        _ => None,
    };
    if let Some(hint) = hint {
        eprintln!("{} {}", "Hint:".yellow(), hint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("discogs-pick").chain(args.iter().copied()))
    }

    #[test]
    fn test_pick_flags_build_filter() {
        let cli = parse(&[
            "pick", "--genre", "Jazz", "--format", "vinyl", "--min-year", "1955", "--max-year", "1965",
        ])
        .unwrap();
        let Commands::Pick(args) = cli.command else {
            panic!("expected pick");
        };

        let filter = args.filter();
        assert_eq!(filter.genre.as_deref(), Some("Jazz"));
        assert_eq!(filter.format.as_deref(), Some("vinyl"));
        assert_eq!(filter.min_year, Some(1955));
        assert_eq!(filter.max_year, Some(1965));
        assert!(filter.artist.is_none());
    }

    #[test]
    fn test_bare_pick_is_identity() {
        let cli = parse(&["pick"]).unwrap();
        let Commands::Pick(args) = cli.command else {
            panic!("expected pick");
        };
        assert!(args.filter().is_identity());
        assert!(!args.record);
    }

    #[test]
    fn test_rating_requires_record() {
        assert!(parse(&["pick", "--rating", "4"]).is_err());
        assert!(parse(&["pick", "--note", "great"]).is_err());
        assert!(parse(&["pick", "--record", "--rating", "4", "--note", "great"]).is_ok());
    }

    #[test]
    fn test_rating_range() {
        assert!(parse(&["pick", "--record", "--rating", "0"]).is_err());
        assert!(parse(&["pick", "--record", "--rating", "6"]).is_err());
    }

    #[test]
    fn test_export_format_alias() {
        let cli = parse(&["export", "--format", "md"]).unwrap();
        let Commands::Export { format, output } = cli.command else {
            panic!("expected export");
        };
        assert_eq!(ExportFormat::from(format), ExportFormat::Markdown);
        assert!(output.is_none());
    }

    #[test]
    fn test_browse_page_size_bounds() {
        assert!(parse(&["browse", "--per-page", "100"]).is_ok());
        assert!(parse(&["browse", "--per-page", "101"]).is_err());
        assert!(parse(&["browse", "--page", "0"]).is_err());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        assert!(handle_clear(&store, false).is_err());
        assert!(handle_clear(&store, true).is_ok());
        assert!(store.load().unwrap().is_empty());
    }
}
