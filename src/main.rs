//! # Tweetscope
//!
//! Command-line front end for the tweetscope library: runs one search, writes
//! the resulting table to CSV and optionally prints keyword or attention
//! statistics.
//!
//! ## Environment Variables
//!
//! - `BEARER_TOKEN`: Twitter API app Bearer Token (required)
//! - `TWITTER_API_BASE`, `TWITTER_30DAY_LABEL`, `TWITTER_FULLARCHIVE_LABEL`: optional overrides
//! - `RUST_LOG`: log level, e.g. `info` or `debug`
//!
//! ## Example Usage
//!
//! ```bash
//! # 50 English tweets from the past week into search_7.csv
//! RUST_LOG=info tweetscope recent "rust lang" --max-results 50
//!
//! # Full archive between two dates, no language filter, custom output
//! tweetscope full-archive "#rustlang" --start 2021-01-01 --end "March 1, 2021" \
//!     --no-lang --output rust_2021.csv --keywords 20 --attention month
//! ```

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use tweetscope::analysis::DEFAULT_WORD_LIMIT;
use tweetscope::{
    attention_series, hashtag_frequencies, keyword_frequencies, search, AssumeYes, Error,
    Granularity, HttpSearchClient, Prompt, SearchDepth, SearchRequest, StdinPrompt, TweetTable,
    TwitterConfig,
};

#[derive(Parser)]
#[command(name = "tweetscope")]
#[command(about = "Search Twitter/X and export the results as CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the past 7 days
    Recent(SearchArgs),
    /// Search the past 30 days (premium)
    ThirtyDay(SearchArgs),
    /// Search the full archive (premium)
    FullArchive(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Search query, e.g. "rust lang" or "#rustlang"
    query: String,

    /// Earliest tweet time, e.g. 2022-03-01 or "March 1, 2022 14:00"
    #[arg(long)]
    start: Option<String>,

    /// Latest tweet time
    #[arg(long)]
    end: Option<String>,

    /// Number of tweets to retrieve
    #[arg(short = 'n', long, default_value_t = tweetscope::query::DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Language filter appended to the query
    #[arg(long, default_value = tweetscope::query::DEFAULT_LANG, conflicts_with = "no_lang")]
    lang: String,

    /// Send the query without a language filter
    #[arg(long)]
    no_lang: bool,

    /// CSV output path (defaults to search_7.csv, search_30.csv or search_full.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip writing a CSV file
    #[arg(long, conflicts_with = "output")]
    no_export: bool,

    /// Answer yes to the large-request confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the N most frequent keywords and hashtags
    #[arg(long, value_name = "N")]
    keywords: Option<Option<usize>>,

    /// Print tweet counts per day, month or year
    #[arg(long, value_name = "GRANULARITY")]
    attention: Option<Granularity>,
}

impl SearchArgs {
    fn to_request(&self, depth: SearchDepth) -> SearchRequest {
        let lang = (!self.no_lang).then_some(self.lang.as_str());
        let mut request = SearchRequest::new(self.query.clone())
            .with_window(self.start.as_deref(), self.end.as_deref())
            .with_max_results(self.max_results)
            .with_lang(lang);

        if !self.no_export {
            let path = self
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(depth.default_export_file()));
            request = request.with_export(path);
        }

        request
    }
}

fn print_report(args: &SearchArgs, table: &TweetTable) {
    if let Some(limit) = args.keywords {
        let limit = limit.unwrap_or(DEFAULT_WORD_LIMIT);

        println!("Top keywords:");
        for (word, count) in keyword_frequencies(table, Some(&args.query), limit) {
            println!("  {:<24} {}", word, count);
        }

        println!("Top hashtags:");
        for (tag, count) in hashtag_frequencies(table, limit) {
            println!("  {:<24} {}", tag, count);
        }
    }

    if let Some(granularity) = args.attention {
        for series in attention_series(&[(args.query.as_str(), table)], granularity) {
            println!(
                "Attention for '{}' per {} ({} tweets):",
                series.label,
                granularity,
                series.total()
            );
            for (label, count) in series.points() {
                println!("  {:<12} {}", label, count);
            }
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let (depth, args) = match &cli.command {
        Command::Recent(args) => (SearchDepth::Recent, args),
        Command::ThirtyDay(args) => (SearchDepth::ThirtyDay, args),
        Command::FullArchive(args) => (SearchDepth::FullArchive, args),
    };

    let config = TwitterConfig::from_env()?;
    let client = HttpSearchClient::new(config);
    let request = args.to_request(depth);

    let mut prompt: Box<dyn Prompt> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinPrompt)
    };

    let table = search(&client, prompt.as_mut(), depth, &request).await?;

    match &request.export {
        Some(path) => info!("Wrote {} tweets to {}", table.len(), path.display()),
        None => info!("Retrieved {} tweets", table.len()),
    }

    print_report(args, &table);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::UserAborted) => {
            eprintln!("{}", Error::UserAborted);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Search failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
