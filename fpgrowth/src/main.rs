use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser, ValueEnum};
use fpgrowth::fp::{
    MiningConfig, MiningOutcome, SupportThreshold, ThresholdPolicy, mine_transactions,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fpgrowth", about = "Mine frequent itemsets with FP-Growth")]
#[command(group(ArgGroup::new("threshold").required(true).args(["min_support", "min_count"])))]
struct Cli {
    /// Transactions file, one transaction per line.
    transactions: PathBuf,
    /// Minimum support as a share of transactions, rounded up to a count.
    #[arg(long)]
    min_support: Option<f64>,
    /// Minimum support as a transaction count.
    #[arg(long)]
    min_count: Option<usize>,
    /// Require support strictly above the threshold.
    #[arg(long)]
    exclusive: bool,
    /// Longest itemset to report.
    #[arg(long)]
    max_len: Option<usize>,
    /// Layout of the transactions file.
    #[arg(long, value_enum, default_value_t = InputFormat::Basket)]
    format: InputFormat,
    /// Item names, one per line, indexed by item id (attributes format only).
    #[arg(long)]
    names: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum InputFormat {
    /// Whitespace-separated item tokens.
    Basket,
    /// Whitespace-separated 0/1 attribute values; column `c` with value `v` is item `2c + v`.
    Attributes,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = mining_config(&cli);
    let path = &cli.transactions;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match cli.format {
        InputFormat::Basket => {
            let transactions = read_baskets(open(path)?)
                .with_context(|| format!("failed to read {}", path.display()))?;
            info!(transactions = transactions.len(), "loaded baskets");
            let outcome: MiningOutcome<String> = mine_transactions(&transactions, &config)?;
            write_outcome(&mut out, &outcome, |item: &String| item.clone())?;
        }
        InputFormat::Attributes => {
            let transactions = read_attribute_records(open(path)?)
                .with_context(|| format!("failed to read {}", path.display()))?;
            info!(transactions = transactions.len(), "loaded attribute records");
            let names = match names_path(&cli) {
                Some(names) => Some(
                    read_names(open(names)?)
                        .with_context(|| format!("failed to read {}", names.display()))?,
                ),
                None => None,
            };
            let outcome: MiningOutcome<usize> = mine_transactions(&transactions, &config)?;
            write_outcome(&mut out, &outcome, |&item: &usize| {
                item_name(names.as_deref(), item)
            })?;
        }
    }
    out.flush()?;

    Ok(())
}

fn mining_config(cli: &Cli) -> MiningConfig {
    let threshold = match (cli.min_count, cli.min_support) {
        (Some(count), _) => SupportThreshold::Count(count),
        (None, Some(fraction)) => SupportThreshold::Fraction(fraction),
        (None, None) => unreachable!("clap enforces the threshold group"),
    };
    let policy = if cli.exclusive {
        ThresholdPolicy::Exclusive
    } else {
        ThresholdPolicy::Inclusive
    };

    let mut config = MiningConfig::new(threshold).with_policy(policy);
    config.max_len = cli.max_len;
    config
}

/// The names file to apply, if the input format numbers its items.
fn names_path(cli: &Cli) -> Option<&Path> {
    let names = cli.names.as_deref()?;
    if cli.format == InputFormat::Basket {
        warn!(
            names = %names.display(),
            "--names only applies to --format attributes; printing basket tokens as read"
        );
        return None;
    }
    Some(names)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// One transaction per non-blank line, items separated by whitespace.
fn read_baskets(reader: impl BufRead) -> Result<Vec<Vec<String>>> {
    let mut transactions = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        transactions.push(line.split_whitespace().map(str::to_owned).collect());
    }
    Ok(transactions)
}

/// One record per non-blank line of 0/1 values; column `c` holding `v`
/// becomes item `2c + v`.
fn read_attribute_records(reader: impl BufRead) -> Result<Vec<Vec<usize>>> {
    let mut transactions = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut record = Vec::new();
        for (column, token) in line.split_whitespace().enumerate() {
            let value: usize = token.parse().with_context(|| {
                format!("invalid attribute value '{token}' on line {}", line_no + 1)
            })?;
            if value > 1 {
                bail!(
                    "attribute value {value} on line {} is not 0 or 1",
                    line_no + 1
                );
            }
            record.push(column * 2 + value);
        }
        transactions.push(record);
    }
    Ok(transactions)
}

fn read_names(reader: impl BufRead) -> Result<Vec<String>> {
    Ok(reader.lines().collect::<std::io::Result<Vec<String>>>()?)
}

fn item_name(names: Option<&[String]>, item: usize) -> String {
    names
        .and_then(|names| names.get(item).cloned())
        .unwrap_or_else(|| item.to_string())
}

/// Writes one `[ item item ] support` line per itemset, shortest first.
fn write_outcome<T, W, F>(out: &mut W, outcome: &MiningOutcome<T>, name: F) -> Result<()>
where
    W: Write,
    F: Fn(&T) -> String,
{
    info!(itemsets = outcome.len(), "frequent itemsets found");

    for (itemset, support) in outcome.iter_decoded() {
        write!(out, "[ ")?;
        for item in itemset {
            write!(out, "{} ", name(item))?;
        }
        writeln!(out, "] {support}")?;
    }
    Ok(())
}
