// Command line front end for seqdiff.
//
// Reads whole files, splits them into lines or characters, and prints the
// section plan, the aligned elements, or the three-way merge of the inputs.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde_json::{Value, json};

use crate::align::similarity::DEFAULT_THRESHOLD;
use crate::align::{
    self, Aligner, InsertDeleteAligner, ReplaceInsertDeleteAligner, StringSimilarityAligner,
};
use crate::compare::DefaultComparer;
use crate::element::DiffElement;
use crate::error::{MergeConflict, MergeError};
use crate::merge::{
    ConflictResolver, RejectConflicts, TakeLeft, TakeLeftThenRight,
    TakeRightThenLeftIfDifferent, merge_all,
};
use crate::options::{DEFAULT_CONTEXT_SIZE, DiffOptions};
use crate::sections::compute_sections;

/// Exit status for a merge that stopped on an unresolved conflict.
const EXIT_CONFLICT: i32 = 2;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Sequence diff, alignment and three-way merge.
#[derive(Parser, Debug)]
#[command(
    name = "seqdiff",
    version,
    about = "Sequence diff, alignment and three-way merge",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (suppress non-error output on stderr).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the matched and unmatched sections between two files.
    Sections(PairArgs),
    /// Print the element-level alignment between two files.
    Align(AlignArgs),
    /// Three-way merge two edits of a common base.
    Merge(MergeArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Unit {
    Lines,
    Chars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlignerArg {
    /// Delete then insert every unmatched element.
    Basic,
    /// Replace pairwise, then delete or insert the rest.
    Replace,
    /// Pair up similar elements as modifications.
    Similarity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ResolverArg {
    TakeLeft,
    LeftThenRight,
    RightThenLeft,
    /// Stop on the first conflict.
    Fail,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Unit of comparison.
    #[arg(long, value_enum, default_value_t = Unit::Lines)]
    unit: Unit,

    /// Do not trim common prefixes and suffixes before matching.
    #[arg(long = "no-patience")]
    no_patience: bool,

    /// Minimum length of a common run.
    #[arg(long = "context-size", default_value_t = DEFAULT_CONTEXT_SIZE)]
    context_size: usize,
}

#[derive(Args, Debug)]
struct AlignTuningArgs {
    /// Strategy for unmatched spans.
    #[arg(long, value_enum, default_value_t = AlignerArg::Basic)]
    aligner: AlignerArg,

    /// Similarity at or above which elements count as modified.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
}

#[derive(Args, Debug)]
struct PairArgs {
    #[command(flatten)]
    diff: DiffArgs,

    /// Original file.
    #[arg(value_hint = ValueHint::FilePath)]
    old: PathBuf,

    /// Changed file.
    #[arg(value_hint = ValueHint::FilePath)]
    new: PathBuf,
}

#[derive(Args, Debug)]
struct AlignArgs {
    #[command(flatten)]
    diff: DiffArgs,

    #[command(flatten)]
    tuning: AlignTuningArgs,

    /// Original file.
    #[arg(value_hint = ValueHint::FilePath)]
    old: PathBuf,

    /// Changed file.
    #[arg(value_hint = ValueHint::FilePath)]
    new: PathBuf,
}

#[derive(Args, Debug)]
struct MergeArgs {
    #[command(flatten)]
    diff: DiffArgs,

    #[command(flatten)]
    tuning: AlignTuningArgs,

    /// How to settle spans both sides changed.
    #[arg(long, value_enum, default_value_t = ResolverArg::Fail)]
    resolver: ResolverArg,

    /// Common base file.
    #[arg(value_hint = ValueHint::FilePath)]
    base: PathBuf,

    /// Left edit of the base.
    #[arg(value_hint = ValueHint::FilePath)]
    left: PathBuf,

    /// Right edit of the base.
    #[arg(value_hint = ValueHint::FilePath)]
    right: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Sections,
    Align,
    Merge,
}

struct Options {
    command: Command,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    unit: Unit,
    diff: DiffOptions,
    aligner: AlignerArg,
    threshold: f64,
    resolver: ResolverArg,
    inputs: Vec<PathBuf>,
}

fn diff_options(args: &DiffArgs) -> DiffOptions {
    DiffOptions::default()
        .with_patience(!args.no_patience)
        .with_context_size(args.context_size)
}

fn resolve_options(cli: Cli) -> Options {
    let quiet = cli.quiet;
    let verbose = cli.verbose.min(2);
    let json_output = cli.json_output;

    match cli.command {
        Cmd::Sections(args) => Options {
            command: Command::Sections,
            quiet,
            verbose,
            json_output,
            unit: args.diff.unit,
            diff: diff_options(&args.diff),
            aligner: AlignerArg::Basic,
            threshold: DEFAULT_THRESHOLD,
            resolver: ResolverArg::Fail,
            inputs: vec![args.old, args.new],
        },
        Cmd::Align(args) => Options {
            command: Command::Align,
            quiet,
            verbose,
            json_output,
            unit: args.diff.unit,
            diff: diff_options(&args.diff),
            aligner: args.tuning.aligner,
            threshold: args.tuning.threshold,
            resolver: ResolverArg::Fail,
            inputs: vec![args.old, args.new],
        },
        Cmd::Merge(args) => Options {
            command: Command::Merge,
            quiet,
            verbose,
            json_output,
            unit: args.diff.unit,
            diff: diff_options(&args.diff),
            aligner: args.tuning.aligner,
            threshold: args.tuning.threshold,
            resolver: args.resolver,
            inputs: vec![args.base, args.left, args.right],
        },
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("seqdiff".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Strategy selection
// ---------------------------------------------------------------------------

fn build_aligner(opts: &Options) -> Box<dyn Aligner<String>> {
    match opts.aligner {
        AlignerArg::Basic => Box::new(InsertDeleteAligner),
        AlignerArg::Replace => Box::new(ReplaceInsertDeleteAligner),
        AlignerArg::Similarity => {
            Box::new(StringSimilarityAligner::new().with_threshold(opts.threshold))
        }
    }
}

impl ConflictResolver<String> for ResolverArg {
    fn resolve(
        &self,
        common_base: &[String],
        left: &[String],
        right: &[String],
    ) -> Result<Vec<String>, MergeConflict<String>> {
        match self {
            Self::TakeLeft => TakeLeft.resolve(common_base, left, right),
            Self::LeftThenRight => TakeLeftThenRight.resolve(common_base, left, right),
            Self::RightThenLeft => {
                TakeRightThenLeftIfDifferent::new().resolve(common_base, left, right)
            }
            Self::Fail => RejectConflicts.resolve(common_base, left, right),
        }
    }
}

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

fn split_units(text: &str, unit: Unit) -> Vec<String> {
    match unit {
        Unit::Lines => text.lines().map(str::to_owned).collect(),
        Unit::Chars => text.chars().map(String::from).collect(),
    }
}

fn join_units(items: &[String], unit: Unit) -> String {
    match unit {
        Unit::Lines => items.iter().map(|line| format!("{line}\n")).collect(),
        Unit::Chars => items.concat(),
    }
}

fn read_inputs(opts: &Options) -> Option<Vec<Vec<String>>> {
    let mut out = Vec::with_capacity(opts.inputs.len());
    for path in &opts.inputs {
        match std::fs::read_to_string(path) {
            Ok(text) => out.push(split_units(&text, opts.unit)),
            Err(e) => {
                eprintln!("seqdiff: input file: {}: {e}", path.display());
                return None;
            }
        }
    }
    Some(out)
}

fn write_stdout(text: &str) -> i32 {
    let mut writer = BufWriter::new(io::stdout().lock());
    if let Err(e) = writer.write_all(text.as_bytes()).and_then(|()| writer.flush()) {
        eprintln!("seqdiff: write error: {e}");
        return 1;
    }
    0
}

fn element_json(element: &DiffElement<'_, String>) -> Value {
    json!({
        "operation": element.operation.to_string(),
        "index1": element.index1,
        "index2": element.index2,
        "value1": element.value1,
        "value2": element.value2,
    })
}

// ---------------------------------------------------------------------------
// Sections command
// ---------------------------------------------------------------------------

fn cmd_sections(opts: &Options) -> i32 {
    let Some([old, new]) = read_inputs(opts).and_then(|v| <[_; 2]>::try_from(v).ok()) else {
        return 1;
    };

    let sections: Vec<_> = match compute_sections(&old, &new, &opts.diff, DefaultComparer) {
        Ok(sections) => sections.collect(),
        Err(e) => {
            eprintln!("seqdiff: {e}");
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        let matched = sections.iter().filter(|s| s.is_match).count();
        eprintln!(
            "seqdiff: sections: {} total, {matched} matched",
            sections.len()
        );
    }

    let text = if opts.json_output {
        let list: Vec<Value> = sections
            .iter()
            .map(|s| {
                json!({
                    "is_match": s.is_match,
                    "length1": s.length1,
                    "length2": s.length2,
                })
            })
            .collect();
        format!("{:#}\n", Value::Array(list))
    } else {
        sections.iter().map(|s| format!("{s}\n")).collect()
    };
    write_stdout(&text)
}

// ---------------------------------------------------------------------------
// Align command
// ---------------------------------------------------------------------------

fn cmd_align(opts: &Options) -> i32 {
    let Some([old, new]) = read_inputs(opts).and_then(|v| <[_; 2]>::try_from(v).ok()) else {
        return 1;
    };

    let aligner = build_aligner(opts);
    let elements = match align::diff(&old, &new, &opts.diff, DefaultComparer, aligner) {
        Ok(elements) => elements,
        Err(e) => {
            eprintln!("seqdiff: {e}");
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!("seqdiff: align: {} element(s)", elements.len());
    }

    let text = if opts.json_output {
        let list: Vec<Value> = elements.iter().map(element_json).collect();
        format!("{:#}\n", Value::Array(list))
    } else {
        elements.iter().map(|e| format!("{e}\n")).collect()
    };
    write_stdout(&text)
}

// ---------------------------------------------------------------------------
// Merge command
// ---------------------------------------------------------------------------

fn cmd_merge(opts: &Options) -> i32 {
    let Some([base, left, right]) =
        read_inputs(opts).and_then(|v| <[_; 3]>::try_from(v).ok())
    else {
        return 1;
    };

    let aligner = build_aligner(opts);
    let result = merge_all(
        &base,
        &left,
        &right,
        &opts.diff,
        aligner,
        opts.resolver,
        DefaultComparer,
    );

    match result {
        Ok(merged) => {
            if opts.verbose > 0 && !opts.quiet {
                eprintln!("seqdiff: merge: {} element(s)", merged.len());
            }
            let text = if opts.json_output {
                format!("{:#}\n", json!({ "merged": merged }))
            } else {
                join_units(&merged, opts.unit)
            };
            write_stdout(&text)
        }
        Err(MergeError::Conflict(conflict)) => {
            if !opts.quiet {
                eprintln!("seqdiff: {conflict}");
            }
            if opts.json_output {
                let text = format!(
                    "{:#}\n",
                    json!({
                        "conflict": conflict.reason.to_string(),
                        "common_base": conflict.common_base,
                        "left": conflict.left,
                        "right": conflict.right,
                    })
                );
                if write_stdout(&text) != 0 {
                    return 1;
                }
            }
            EXIT_CONFLICT
        }
        Err(MergeError::Diff(e)) => {
            eprintln!("seqdiff: {e}");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    let level = match opts.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Sections => cmd_sections(&opts),
        Command::Align => cmd_align(&opts),
        Command::Merge => cmd_merge(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
