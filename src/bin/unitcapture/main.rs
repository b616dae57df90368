//! UnitCapture CLI - Reduce and inspect recorded unit captures.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use unitcapture::prelude::*;

/// Verbosity requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Normal,
    Debug,
    Trace,
}

impl Verbosity {
    fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

fn init_tracing(verbosity: Option<Verbosity>) {
    // Explicit flags win over RUST_LOG
    let filter = match verbosity {
        Some(v) => EnvFilter::new(v.directive()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Verbosity::Normal.directive())),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut verbosity = None;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => verbosity = Some(Verbosity::Debug),
            "-vv" | "--trace" => verbosity = Some(Verbosity::Trace),
            "-q" | "--quiet" => verbosity = Some(Verbosity::Quiet),
            _ => filtered_args.push(arg),
        }
    }

    init_tracing(verbosity);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "reduce" | "r" => cmd_reduce(&filtered_args[1..]),
        "batch" | "b" => cmd_batch(&filtered_args[1..]),
        "info" | "i" => cmd_info(&filtered_args[1..]),
        "version" | "-V" | "--version" => {
            print_version();
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_help() {
    println!("unitcapture - BIS_fnc_UnitCapture reduction toolkit");
    println!();
    println!("USAGE:");
    println!("    unitcapture-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    r, reduce <input|-> [threshold]     Reduce one capture (stdin with -)");
    println!("    b, batch  <threshold> <files...>    Reduce several captures in parallel");
    println!("    i, info   <input|->                 Show frame count, time span and size");
    println!("    version                             Show version and build date");
    println!("    h, help                             Show this help");
    println!();
    println!("REDUCE / BATCH OPTIONS:");
    println!("    -m, --metric <gaussian|percent>     Similarity metric (default: gaussian)");
    println!("        --stddev <x>                    Gaussian standard deviation (default: 1)");
    println!("    -c, --config <file.json>            Load threshold and metric from JSON");
    println!("    -o, --output <file>                 Write reduced capture to file (reduce)");
    println!("        --out-dir <dir>                 Output directory (batch)");
    println!("        --json                          Print a JSON summary (reduce)");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show every reduction decision");
    println!("    -q, --quiet      Errors only");
    println!();
    println!("THRESHOLDS:");
    println!("    gaussian: frames whose reconstruction density is ABOVE the threshold are");
    println!("              dropped. Peak density is {:.4} (stddev 1); higher keeps more.",
        Metric::default().peak_score().unwrap_or_default());
    println!("    percent:  frames whose largest component error is BELOW the threshold");
    println!("              (in percent) are dropped; higher drops more.");
    println!();
    println!("EXAMPLES:");
    println!("    unitcapture-cli reduce heli.sqf 0.05 -o heli.small.sqf");
    println!("    unitcapture-cli reduce - 2 --metric percent < capture.sqf");
    println!("    unitcapture-cli batch 0.05 captures/*.sqf --out-dir reduced/");
    println!("    unitcapture-cli -v info heli.sqf");
}

fn print_version() {
    println!(
        "unitcapture-cli {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("UNITCAPTURE_BUILD_DATE"),
        env!("UNITCAPTURE_BUILD_TIME"),
    );
}

/// Options shared by `reduce` and `batch`.
#[derive(Debug, Default)]
struct ReduceArgs<'a> {
    positional: Vec<&'a str>,
    metric: Option<&'a str>,
    stddev: Option<&'a str>,
    config: Option<&'a str>,
    output: Option<&'a str>,
    out_dir: Option<&'a str>,
    json: bool,
}

impl<'a> ReduceArgs<'a> {
    fn parse(args: &[&'a str]) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter().copied();

        while let Some(arg) = iter.next() {
            let mut value = |name: &str| {
                iter.next().ok_or_else(|| anyhow!("missing value for {}", name))
            };
            match arg {
                "-m" | "--metric" => parsed.metric = Some(value(arg)?),
                "--stddev" => parsed.stddev = Some(value(arg)?),
                "-c" | "--config" => parsed.config = Some(value(arg)?),
                "-o" | "--output" => parsed.output = Some(value(arg)?),
                "--out-dir" => parsed.out_dir = Some(value(arg)?),
                "--json" | "-j" => parsed.json = true,
                _ if arg.starts_with("--") => bail!("unknown option {}", arg),
                _ => parsed.positional.push(arg),
            }
        }

        Ok(parsed)
    }

    /// Settings from the config file, then flags, then the threshold.
    fn settings(&self, threshold: Option<&str>) -> anyhow::Result<ReduceSettings> {
        let mut settings = match self.config {
            Some(path) => ReduceSettings::from_json_file(path)
                .with_context(|| format!("failed to load settings from {}", path))?,
            None => ReduceSettings::default(),
        };

        if let Some(name) = self.metric {
            let metric: Metric = name.parse().map_err(user_error)?;
            // Naming the configured kind again keeps its parameters
            if mem::discriminant(&metric) != mem::discriminant(&settings.metric) {
                settings.metric = metric;
            }
        }

        if let Some(text) = self.stddev {
            let value: f64 = text
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid --stddev value {:?}", text))?;
            match &mut settings.metric {
                Metric::GaussianDensity { stddev } => *stddev = value,
                Metric::PercentDifference => bail!("--stddev only applies to the gaussian metric"),
            }
        }

        if let Some(text) = threshold {
            settings.threshold = parse_threshold(text).map_err(user_error)?;
        }

        settings.validate().map_err(user_error)?;
        debug!(threshold = settings.threshold, metric = %settings.metric, "settings resolved");
        Ok(settings)
    }
}

/// Convert a library error into the message shown to users.
fn user_error(err: Error) -> anyhow::Error {
    let message = err.user_message();
    let detail = err.to_string();
    if err.is_internal() || message == detail {
        anyhow!(message)
    } else {
        anyhow!("{} ({})", message, detail)
    }
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read capture from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

fn cmd_reduce(args: &[&str]) -> anyhow::Result<()> {
    let args = ReduceArgs::parse(args)?;
    let (input, threshold) = match args.positional.as_slice() {
        [input] => (*input, None),
        [input, threshold] => (*input, Some(*threshold)),
        _ => bail!("usage: unitcapture-cli reduce <input|-> [threshold] [options]"),
    };
    if args.out_dir.is_some() {
        bail!("--out-dir is only valid for batch, use --output");
    }

    let settings = args.settings(threshold)?;
    let raw = read_input(input)?;

    info!("Reducing {} with {} at threshold {}", input, settings.metric, settings.threshold);
    let reduction = reduce_capture(&raw, &settings).map_err(user_error)?;

    if let Some(path) = args.output {
        fs::write(path, &reduction.output).with_context(|| format!("failed to write {}", path))?;
        info!("Wrote {}", path);
    }

    if args.json {
        let mut summary = serde_json::json!({
            "input": input,
            "metric": settings.metric,
            "threshold": settings.threshold,
            "frames_before": reduction.frames_before,
            "frames_after": reduction.frames_after,
            "kilobytes_before": reduction.kilobytes_before(),
            "kilobytes_after": reduction.kilobytes_after(),
        });
        if args.output.is_none() {
            summary["reduced"] = serde_json::Value::String(reduction.output.clone());
        }
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if args.output.is_none() {
        let mut stdout = io::stdout().lock();
        stdout.write_all(reduction.output.as_bytes())?;
        stdout.write_all(b"\n")?;
    }

    print_summary(input, &reduction);
    Ok(())
}

fn print_summary(input: &str, reduction: &Reduction) {
    info!("Capture: {}", input);
    info!(
        "  Frames: {} -> {} ({} removed)",
        reduction.frames_before,
        reduction.frames_after,
        reduction.frames_removed()
    );
    info!(
        "  Size:   {:.2} KiB -> {:.2} KiB",
        reduction.kilobytes_before(),
        reduction.kilobytes_after()
    );
}

/// Output path for a batch input: `<stem>.reduced.<ext>`.
fn batch_output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}.reduced.{}", stem, ext.to_string_lossy()),
        None => format!("{}.reduced", stem),
    };
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Output paths for every batch input, rejecting inputs that would share one.
fn batch_output_paths(files: &[&str], out_dir: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
    let mut outputs = Vec::with_capacity(files.len());
    for &file in files {
        let out = batch_output_path(Path::new(file), out_dir);
        if let Some(other) = claimed.insert(out.clone(), file) {
            bail!("{} and {} would both be written to {}", other, file, out.display());
        }
        outputs.push(out);
    }
    Ok(outputs)
}

fn cmd_batch(args: &[&str]) -> anyhow::Result<()> {
    let args = ReduceArgs::parse(args)?;
    let Some((threshold, files)) = args.positional.split_first() else {
        bail!("usage: unitcapture-cli batch <threshold> <files...> [options]");
    };
    if files.is_empty() {
        bail!("no capture files given");
    }
    if args.output.is_some() || args.json {
        bail!("--output and --json are only valid for reduce");
    }

    let settings = args.settings(Some(*threshold))?;
    let out_dir = args.out_dir.map(Path::new);
    let outputs = batch_output_paths(files, out_dir)?;
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    info!("Reducing {} captures with {}", files.len(), settings.metric);

    // Each file gets its own sequence; nothing is shared between workers.
    let results: Vec<(&str, anyhow::Result<(&PathBuf, Reduction)>)> = files
        .par_iter()
        .zip(outputs.par_iter())
        .map(|(&file, out)| {
            let result = (|| -> anyhow::Result<Reduction> {
                let raw = read_input(file)?;
                let reduction = reduce_capture(&raw, &settings).map_err(user_error)?;
                fs::write(out, &reduction.output)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                Ok(reduction)
            })();
            (file, result.map(|reduction| (out, reduction)))
        })
        .collect();

    let mut failed = 0;
    for (file, result) in &results {
        match result {
            Ok((out, r)) => println!(
                "{} -> {}: {} -> {} frames, {:.2} -> {:.2} KiB",
                file,
                out.display(),
                r.frames_before,
                r.frames_after,
                r.kilobytes_before(),
                r.kilobytes_after()
            ),
            Err(e) => {
                failed += 1;
                warn!("{}: {:#}", file, e);
                eprintln!("{}: FAILED: {:#}", file, e);
            }
        }
    }

    println!();
    println!("Reduced {}/{} captures", results.len() - failed, results.len());
    if failed > 0 {
        bail!("{} capture(s) failed", failed);
    }
    Ok(())
}

fn cmd_info(args: &[&str]) -> anyhow::Result<()> {
    let [input] = args else {
        bail!("usage: unitcapture-cli info <input|->");
    };

    let raw = read_input(input)?;
    let seq = parse_capture(&raw).map_err(user_error)?;

    println!("Capture: {}", input);
    println!("Frames:  {}", seq.len());
    println!("Size:    {:.2} KiB", raw.len() as f64 / 1024.0);

    let first = seq.first().and_then(|id| seq.get(id));
    let last = seq.last().and_then(|id| seq.get(id));
    if let (Some(first), Some(last)) = (first, last) {
        println!(
            "Time:    {} .. {} ({:.3}s)",
            first.time,
            last.time,
            last.time - first.time
        );
        println!(
            "Start:   ({:.3}, {:.3}, {:.3})",
            first.position.x, first.position.y, first.position.z
        );
        println!(
            "End:     ({:.3}, {:.3}, {:.3})",
            last.position.x, last.position.y, last.position.z
        );
        println!("Path:    {:.3} m", path_length(&seq));
    }

    if seq.len() < 3 {
        println!();
        println!("Note: fewer than 3 frames, nothing to reduce");
    }
    Ok(())
}

/// Sum of straight-line distances between consecutive positions.
fn path_length(seq: &CaptureSequence) -> f64 {
    seq.iter()
        .zip(seq.iter().skip(1))
        .map(|(a, b)| a.position.distance(b.position))
        .sum()
}
