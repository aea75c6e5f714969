//! leetdown - problem page HTML and testcase blobs to Markdown

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueHint};
use url::Url;

use leetdown::markdown::{
    CachingFetcher, ConvertOptions, FileFetcher, GlossaryPair, append_glossary, assign_labels,
    convert_html,
};
use leetdown::testcase::{cases_to_json, combine_unique, render_table, segment};
use leetdown::{Error, LanguageResolver, Result, decode_html, fence_for};

#[derive(Parser)]
#[command(name = "leetdown")]
#[command(version, about = "Problem page HTML and testcase blobs to Markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    leetdown convert problem.html --glossary terms.json
    leetdown segment cases.txt --vars nums,target
    leetdown lang python --snippet python3")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an HTML problem description to Markdown
    Convert {
        /// HTML file, or `-` for stdin
        #[arg(value_name = "HTML", value_hint = ValueHint::FilePath)]
        input: String,

        /// Base URL for relative links and images
        #[arg(long, value_hint = ValueHint::Url)]
        base_url: Option<String>,

        /// Embed local images as base64 data URLs
        #[arg(long)]
        inline_images: bool,

        /// Per-image timeout in milliseconds
        #[arg(long, default_value_t = 20_000)]
        timeout_ms: u64,

        /// JSON array of `{term, body}` glossary entries
        #[arg(long, value_hint = ValueHint::FilePath)]
        glossary: Option<PathBuf>,

        /// Print image statistics to stderr
        #[arg(long)]
        stats: bool,

        /// Print the full result (markdown and image details) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Split a testcase blob into cases
    Segment {
        /// Blob file, or `-` for stdin
        #[arg(value_name = "BLOB", value_hint = ValueHint::FilePath)]
        input: String,

        /// Comma-separated variable names
        #[arg(long, value_delimiter = ',')]
        vars: Vec<String>,

        /// Print JSON instead of a Markdown table
        #[arg(long)]
        json: bool,
    },
    /// Merge default and custom testcase blobs, dropping duplicates
    Combine {
        /// Comma-separated variable names
        #[arg(long, value_delimiter = ',')]
        vars: Vec<String>,

        /// Default testcase blob
        #[arg(long = "default", value_hint = ValueHint::FilePath)]
        default_blob: PathBuf,

        /// Custom testcase blob
        #[arg(long = "custom", value_hint = ValueHint::FilePath)]
        custom_blob: Option<PathBuf>,

        /// Print JSON instead of a Markdown table
        #[arg(long)]
        json: bool,
    },
    /// Resolve an editor language id to a label and fence
    Lang {
        /// Editor language id
        id: String,

        /// Explicit display label
        #[arg(long)]
        label: Option<String>,

        /// Code-snippet language slug offered by the problem (repeatable)
        #[arg(long = "snippet")]
        snippets: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Convert {
            input,
            base_url,
            inline_images,
            timeout_ms,
            glossary,
            stats,
            json,
        } => {
            let bytes = read_input(&input)?;
            let html = decode_html(&bytes);

            let mut options = ConvertOptions::default()
                .with_inline_images(inline_images)
                .with_image_timeout(Duration::from_millis(timeout_ms));
            if let Some(base) = base_url {
                options = options.with_base_url(Url::parse(&base)?);
            }

            let root = match Path::new(&input).parent() {
                Some(dir) if input != "-" => dir.to_path_buf(),
                _ => std::env::current_dir()?,
            };
            let mut fetcher = CachingFetcher::new(FileFetcher::with_root(root));
            let mut result = convert_html(&html, &options, &mut fetcher);

            if let Some(path) = glossary {
                let pairs = read_glossary(&path)?;
                result.markdown = append_glossary(&result.markdown, &pairs);
            }

            if stats && !json {
                eprintln!("{}", result.image_stats);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.markdown);
            }
        }

        Commands::Segment { input, vars, json } => {
            let bytes = read_input(&input)?;
            let blob = decode_html(&bytes);
            let result = segment(&blob, &vars);
            if result.used_leading_count_heuristic {
                log::info!("first line read as a case count");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_table(&result.cases, &vars));
            }
        }

        Commands::Combine {
            vars,
            default_blob,
            custom_blob,
            json,
        } => {
            let default_blob = fs::read_to_string(&default_blob)?;
            let custom_blob = match custom_blob {
                Some(path) => fs::read_to_string(path)?,
                None => String::new(),
            };
            let cases = combine_unique(&vars, &default_blob, &custom_blob);
            if json {
                println!("{}", cases_to_json(&cases)?);
            } else {
                print!("{}", render_table(&cases, &vars));
            }
        }

        Commands::Lang {
            id,
            label,
            snippets,
        } => {
            let resolver = LanguageResolver::with_snippets(snippets);
            let label = resolver.resolve_label(&id, label.as_deref());
            println!("label: {label}");
            println!("fence: {}", fence_for(&label));
        }
    }

    Ok(())
}

fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    Ok(fs::read(path)?)
}

fn read_glossary(path: &Path) -> Result<Vec<GlossaryPair>> {
    let text = fs::read_to_string(path)?;
    let mut pairs: Vec<GlossaryPair> = serde_json::from_str(&text)?;
    if pairs.iter().any(|p| p.term.trim().is_empty()) {
        return Err(Error::InvalidArgument(format!(
            "{}: glossary entries need a non-empty term",
            path.display()
        )));
    }
    assign_labels(&mut pairs);
    Ok(pairs)
}
