use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use hanzi_drill::export::DEFAULT_EXPORT_FILE;
use hanzi_drill::parser::{ColumnOverrides, ColumnSelector, SegmenterConfig};
use hanzi_drill::pipeline::{
    export_rows, load_document, LoadedDocument, Origin, ParseMode, PipelineConfig,
};
use hanzi_drill::session::{console, RevealSettings, StudyOrder};
use hanzi_drill::StudySession;

#[derive(Parser, Debug)]
#[command(name = "hanzi-drill")]
#[command(version, about = "Study Chinese sentences (Hán tự, Pinyin, Vietnamese) from CSV, Excel or PDF", long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a file and print the sentences found in it
    Parse {
        #[command(flatten)]
        load: LoadArgs,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Step through the sentences interactively and mark each one
    Study {
        #[command(flatten)]
        load: LoadArgs,

        /// sequential: step with next/prev; random: jump with r only
        #[arg(long, value_enum, default_value_t = Order::Sequential)]
        order: Order,

        /// Fields shown on each card
        #[arg(long, value_enum, value_delimiter = ',', default_values_t = vec![Reveal::Meaning])]
        show: Vec<Reveal>,

        /// Result file written when the session ends (.xlsx, .csv or .json)
        #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },

    /// Write the loaded sentences to a result file without studying
    Export {
        #[command(flatten)]
        load: LoadArgs,

        /// Output file (.xlsx, .csv or .json)
        #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },

    /// Show how a file would be read
    Info {
        #[command(flatten)]
        load: LoadArgs,
    },
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Input file (.csv, .xlsx, .xls or .pdf)
    input: PathBuf,

    /// How to read the input
    #[arg(short, long, value_enum, default_value_t = Mode::Auto)]
    mode: Mode,

    /// Column holding Hán tự (header name or 0-based index)
    #[arg(long)]
    han_col: Option<String>,

    /// Column holding Pinyin (header name or 0-based index)
    #[arg(long)]
    pinyin_col: Option<String>,

    /// Column holding the Vietnamese meaning (header name or 0-based index)
    #[arg(long)]
    meaning_col: Option<String>,

    /// PDF text: minimum delimited lines before falling back to 3-line groups
    #[arg(long, default_value_t = SegmenterConfig::default().fallback_threshold)]
    fallback_threshold: usize,

    /// PDF text: keep a trailing incomplete 3-line group
    #[arg(long)]
    keep_partial: bool,
}

impl From<LoadArgs> for PipelineConfig {
    fn from(a: LoadArgs) -> Self {
        PipelineConfig {
            input: a.input,
            mode: a.mode.into(),
            columns: ColumnOverrides {
                han: a.han_col.map(ColumnSelector::Name),
                pinyin: a.pinyin_col.map(ColumnSelector::Name),
                meaning: a.meaning_col.map(ColumnSelector::Name),
            },
            segmenter: SegmenterConfig {
                fallback_threshold: a.fallback_threshold,
                drop_incomplete_tail: !a.keep_partial,
            },
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Mode {
    Auto,
    Table,
    Pdf,
}

impl From<Mode> for ParseMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Auto => ParseMode::Auto,
            Mode::Table => ParseMode::Table,
            Mode::Pdf => ParseMode::Pdf,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Order {
    Sequential,
    Random,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Reveal {
    Meaning,
    Han,
    Pinyin,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { load, format } => parse_file(load.into(), format),
        Commands::Study {
            load,
            order,
            show,
            output,
        } => study(load.into(), order, show, output),
        Commands::Export { load, output } => export_file(load.into(), output),
        Commands::Info { load } => show_info(load.into()),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load(config: &PipelineConfig) -> Result<LoadedDocument> {
    if !config.input.is_file() {
        anyhow::bail!("Input file does not exist: {}", config.input.display());
    }
    let document = load_document(config)?;
    if let Origin::Pdf { strategy, lines, .. } = &document.origin {
        println!("[*] {lines} text line(s) read with {}", strategy.describe());
    }
    Ok(document)
}

fn parse_file(config: PipelineConfig, format: OutputFormat) -> Result<()> {
    let document = load(&config)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&document)?;
            println!("{json}");
        }
        OutputFormat::Text => {
            if document.records.is_empty() {
                println!("[!] No sentences found; check the column choice or fix the file by hand");
            }
            for record in &document.records {
                println!(
                    "{:>4}. {} | {} | {}",
                    record.ordinal, record.han, record.pinyin, record.meaning
                );
            }
        }
    }
    Ok(())
}

fn study(config: PipelineConfig, order: Order, show: Vec<Reveal>, output: PathBuf) -> Result<()> {
    let document = load(&config)?;
    if document.records.is_empty() {
        anyhow::bail!(
            "No sentences found in {}; nothing to study",
            config.input.display()
        );
    }

    let reveal = RevealSettings {
        meaning: show.contains(&Reveal::Meaning),
        han: show.contains(&Reveal::Han),
        pinyin: show.contains(&Reveal::Pinyin),
    };
    let order = match order {
        Order::Sequential => StudyOrder::Sequential,
        Order::Random => StudyOrder::Random,
    };
    let mut session = StudySession::new(document.records)
        .with_order(order)
        .with_reveal(reveal);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    console::run(&mut session, stdin.lock(), &mut stdout).context("Study session failed")?;

    let summary = session.summary();
    println!(
        "\n[+] Đúng: {}, Sai: {}, Chưa đánh dấu: {}",
        summary.correct, summary.incorrect, summary.unmarked
    );

    export_rows(&session.export(), &output)?;
    println!("[✓] Results saved to: {}", output.display());
    Ok(())
}

fn export_file(config: PipelineConfig, output: PathBuf) -> Result<()> {
    let document = load(&config)?;
    let session = StudySession::new(document.records);
    export_rows(&session.export(), &output)?;
    println!(
        "[✓] {} sentence(s) saved to: {}",
        session.len(),
        output.display()
    );
    Ok(())
}

fn show_info(config: PipelineConfig) -> Result<()> {
    let document = load(&config)?;

    println!("File Information");
    println!("================");
    println!("File: {}", config.input.display());
    match &document.origin {
        Origin::Table { headers, columns } => {
            let header = |idx: usize| headers.get(idx).map(String::as_str).unwrap_or("?");
            println!("Columns: {}", headers.join(", "));
            println!("Hán tự column: {}", header(columns.han));
            println!("Pinyin column: {}", header(columns.pinyin));
            println!("Nghĩa column: {}", header(columns.meaning));
        }
        Origin::Pdf {
            pages,
            lines,
            strategy,
        } => {
            println!("Pages: {pages}");
            println!("Text lines: {lines}");
            println!("Strategy: {}", strategy.describe());
        }
    }
    println!("Sentences: {}", document.records.len());
    Ok(())
}
