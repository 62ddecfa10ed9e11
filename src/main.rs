// repo-census: scrape repository metadata from the GitHub search API
// into a CSV stream, exhaustively and politely.

use std::io;
use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use futures::StreamExt;
use log::info;
use tokio_util::sync::CancellationToken;

use repo_census::{
    CsvSink, DateRangePartitioner, ExhaustiveSearch, GitHubClient, GraphqlFetcher,
    PartitionGranularity, RateGovernor, RecordSink, SearchConfig, SearchError, SearchQuery,
    SearchStrategy, SortField,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Overlapping-offset cursor walk (bounded at 1000 results per partition)
    Offset,
    /// Monotonic pushed-timestamp re-querying (unbounded depth)
    Watermark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Stars,
    Forks,
    Updated,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Stars => SortField::Stars,
            SortArg::Forks => SortField::Forks,
            SortArg::Updated => SortField::Updated,
        }
    }
}

/// Exhaustively scrape GitHub repository search results to CSV on stdout.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// GitHub repository search query
    #[arg(short, long)]
    query: String,

    /// Start date (YYYY-MM-DD, UTC) for creation-date partitioning
    #[arg(short, long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD, UTC), inclusive
    #[arg(short, long)]
    end: Option<NaiveDate>,

    /// Rate limit for making requests per hour
    #[arg(short, long, default_value_t = 4900)]
    rate: u32,

    /// Windowing strategy for exhausting each query
    #[arg(long, value_enum, default_value_t = StrategyArg::Offset)]
    strategy: StrategyArg,

    /// Sort metric for the offset strategy
    #[arg(long, value_enum, default_value_t = SortArg::Stars)]
    sort: SortArg,

    /// Partition by whole days instead of day+hour slices
    #[arg(long)]
    daily: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, finishing current page");
                cancel.cancel();
            }
        });
    }

    let config = SearchConfig {
        requests_per_hour: args.rate,
        ..SearchConfig::default()
    };
    let strategy = match args.strategy {
        StrategyArg::Offset => SearchStrategy::OverlappingOffset {
            sort: args.sort.into(),
        },
        StrategyArg::Watermark => SearchStrategy::Watermark,
    };

    let client = GitHubClient::from_env()?;
    let governor = Arc::new(RateGovernor::per_hour(config.requests_per_hour));
    let fetcher = Arc::new(GraphqlFetcher::new(client, &config));
    let search = ExhaustiveSearch::new(fetcher, governor, strategy, config);

    let query = SearchQuery::new(&args.query);
    let mut sink = CsvSink::new(io::stdout().lock());

    let outcome = match (args.start, args.end) {
        (Some(start), Some(end)) => {
            let granularity = if args.daily {
                PartitionGranularity::Day
            } else {
                PartitionGranularity::Hour
            };
            let partitioner = DateRangePartitioner::new(start, end, granularity)?;
            partitioner.run(&search, &query, &mut sink, &cancel).await
        }
        (None, None) => {
            let mut stream = search.run(query, cancel.clone());
            let drained = async {
                while let Some(item) = stream.next().await {
                    sink.write_record(&item?)?;
                }
                sink.flush()
            };
            drained.await
        }
        _ => bail!("--start and --end must be given together"),
    };

    match outcome {
        Ok(()) => Ok(()),
        // Interrupt is a graceful stop; everything already emitted stands.
        Err(SearchError::Cancelled) => {
            info!("cancelled, partial output preserved");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
