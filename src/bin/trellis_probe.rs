use std::env;
use std::time::Instant;

use sysinfo::{get_current_pid, ProcessRefreshKind, System};
use trellis_dp::{find_best_path, find_path, WeightedGraph};

const LABELS: u32 = 3;

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("trellis_probe: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    eprintln!(
        "trellis_probe: {}-node ring graph, baseline check up to seq_len {}",
        options.nodes, options.verify_limit
    );
    eprintln!("columns: wall_s = wall-clock seconds, rss_delta_kib = resident memory growth");

    let graph = ring_graph(options.nodes);
    let mut sys = System::new();
    let mut measurements = Vec::new();

    eprintln!("reachability:");
    measurements.extend(run_reachability(&options, &graph, &mut sys));
    eprintln!();

    eprintln!("max_likelihood:");
    measurements.extend(run_max_likelihood(&options, &graph, &mut sys));
    eprintln!();

    print_summary(&measurements, &options);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("trellis_probe output error: {err}");
        std::process::exit(1);
    }
}

struct Options {
    format: OutputFormat,
    verify_limit: usize,
    nodes: u32,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut format = OutputFormat::Csv;
        let mut verify_limit = 4096usize;
        let mut nodes = 64u32;

        while let Some(arg) = args.next() {
            let arg = arg.into();
            if arg == "--help" || arg == "-h" {
                Options::print_help();
                std::process::exit(0);
            }
            let (key, inline) = match arg.split_once('=') {
                Some((k, v)) => (k.to_string(), Some(v.to_string())),
                None => (arg.clone(), None),
            };
            let mut value = || -> Result<String, String> {
                match &inline {
                    Some(v) => Ok(v.clone()),
                    None => args
                        .next()
                        .map(Into::into)
                        .ok_or_else(|| format!("missing value after {key}")),
                }
            };
            match key.as_str() {
                "--format" => format = OutputFormat::from_str(&value()?)?,
                "--verify-limit" => {
                    verify_limit = value()?
                        .parse::<usize>()
                        .map_err(|_| "verify limit must be a positive integer".to_string())?
                }
                "--nodes" => {
                    nodes = value()?
                        .parse::<u32>()
                        .ok()
                        .filter(|&n| n > 0)
                        .ok_or_else(|| "node count must be a positive integer".to_string())?
                }
                _ => return Err(format!("unrecognized argument '{arg}'")),
            }
        }

        Ok(Self {
            format,
            verify_limit,
            nodes,
        })
    }

    fn print_help() {
        println!(
            "\
Usage: cargo run --bin trellis_probe [-- <options>]

Options:
  --format <csv|table|json>     Output format (default: csv)
  --verify-limit <N>            Maximum sequence length to verify via baseline (default: 4096)
  --nodes <N>                   Number of graph nodes (default: 64)
  -h, --help                    Print this help message

Examples:
  cargo run --bin trellis_probe
  cargo run --release --features parallel --bin trellis_probe -- --format table --nodes 512
"
        );
    }
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => write_json(measurements),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Decoder {
    Reachability,
    MaxLikelihood,
}

impl Decoder {
    fn name(self) -> &'static str {
        match self {
            Decoder::Reachability => "reachability",
            Decoder::MaxLikelihood => "max_likelihood",
        }
    }
}

/// Outcome of comparing a decode against the dense baseline.
#[derive(Clone, Debug, PartialEq)]
enum Check {
    /// Sequence longer than `--verify-limit`.
    Skipped,
    Matched,
    Mismatch(String),
}

impl Check {
    fn label(&self) -> &'static str {
        match self {
            Check::Skipped => "skipped",
            Check::Matched => "ok",
            Check::Mismatch(_) => "MISMATCH",
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            Check::Mismatch(detail) => Some(detail.as_str()),
            _ => None,
        }
    }
}

struct Measurement {
    decoder: Decoder,
    seq_len: usize,
    wall_s: f64,
    rss_delta_kib: u64,
    check: Check,
}

const LENGTHS: &[usize] = &[64, 256, 1024, 4096, 16384, 65536];

fn run_reachability(
    options: &Options,
    graph: &WeightedGraph<u32, u32>,
    sys: &mut System,
) -> Vec<Measurement> {
    let total = LENGTHS.len();
    LENGTHS
        .iter()
        .enumerate()
        .map(|(idx, &len)| {
            eprint!("  ({}/{total}) seq_len={len:<6} ", idx + 1);
            let mut found = false;
            let m = measure(Decoder::Reachability, len, sys, || {
                let seq = cycling_sequence(len);
                let result = match find_path(graph, &0, &seq) {
                    Ok(result) => result,
                    Err(err) => return Check::Mismatch(err.to_string()),
                };
                found = result.is_some();

                if len > options.verify_limit {
                    return Check::Skipped;
                }
                let baseline = dense_baseline(graph, options.nodes, &seq).is_some();
                let consistent = match &result {
                    Some(path) => graph.follows(path, &seq),
                    None => true,
                };
                if baseline == found && consistent {
                    Check::Matched
                } else {
                    Check::Mismatch(format!("baseline found={baseline}, got found={found}"))
                }
            });
            eprintln!("found={found} {:.3}s {}", m.wall_s, m.check.label());
            m
        })
        .collect()
}

fn run_max_likelihood(
    options: &Options,
    graph: &WeightedGraph<u32, u32>,
    sys: &mut System,
) -> Vec<Measurement> {
    let total = LENGTHS.len();
    LENGTHS
        .iter()
        .enumerate()
        .map(|(idx, &len)| {
            eprint!("  ({}/{total}) seq_len={len:<6} ", idx + 1);
            let mut logp_result = f64::NEG_INFINITY;
            let m = measure(Decoder::MaxLikelihood, len, sys, || {
                let seq = cycling_sequence(len);
                let best = match find_best_path(graph, &0, &seq) {
                    Ok(best) => best,
                    Err(err) => return Check::Mismatch(err.to_string()),
                };
                let logp = best.as_ref().map_or(f64::NEG_INFINITY, |b| b.log_probability);
                logp_result = logp;

                if len > options.verify_limit {
                    return Check::Skipped;
                }
                match (dense_baseline(graph, options.nodes, &seq), best) {
                    (None, None) => Check::Matched,
                    (Some(baseline), Some(best))
                        if (baseline - logp).abs() <= 1e-6 && graph.follows(&best.path, &seq) =>
                    {
                        Check::Matched
                    }
                    (baseline, _) => {
                        Check::Mismatch(format!("baseline logp={baseline:?}, got={logp:.6}"))
                    }
                }
            });
            eprintln!("logp={logp_result:.3} {:.3}s {}", m.wall_s, m.check.label());
            m
        })
        .collect()
}

#[derive(Default, Debug, PartialEq)]
struct Tally {
    matched: usize,
    skipped: usize,
    mismatched: usize,
}

fn tally(measurements: &[Measurement], decoder: Decoder) -> Tally {
    measurements
        .iter()
        .filter(|m| m.decoder == decoder)
        .fold(Tally::default(), |mut t, m| {
            match m.check {
                Check::Matched => t.matched += 1,
                Check::Skipped => t.skipped += 1,
                Check::Mismatch(_) => t.mismatched += 1,
            }
            t
        })
}

fn print_summary(measurements: &[Measurement], options: &Options) {
    eprintln!("summary (baseline checked up to seq_len {}):", options.verify_limit);
    for decoder in [Decoder::Reachability, Decoder::MaxLikelihood] {
        let t = tally(measurements, decoder);
        let slowest = measurements
            .iter()
            .filter(|m| m.decoder == decoder)
            .map(|m| m.wall_s)
            .fold(0.0, f64::max);
        eprintln!(
            "  {:<15} ok={} skipped={} mismatched={} slowest={slowest:.3}s",
            decoder.name(),
            t.matched,
            t.skipped,
            t.mismatched
        );
    }
    for m in measurements {
        if let Some(detail) = m.check.detail() {
            eprintln!("  mismatch: {} seq_len={}: {detail}", m.decoder.name(), m.seq_len);
        }
    }
}

fn measure<F>(decoder: Decoder, seq_len: usize, sys: &mut System, compute: F) -> Measurement
where
    F: FnOnce() -> Check,
{
    let before = rss_kib(sys);
    let start = Instant::now();
    let check = compute();
    let wall_s = start.elapsed().as_secs_f64();
    let after = rss_kib(sys);

    Measurement {
        decoder,
        seq_len,
        wall_s,
        rss_delta_kib: after.saturating_sub(before),
        check,
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn json_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("decoder,seq_len,wall_s,rss_delta_kib,check,detail");
    for m in measurements {
        println!(
            "{},{},{:.6},{},{},{}",
            m.decoder.name(),
            m.seq_len,
            m.wall_s,
            m.rss_delta_kib,
            m.check.label(),
            csv_field(m.check.detail().unwrap_or(""))
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    println!(
        "{:<15} {:>8} {:>10} {:>10} {:<9} detail",
        "decoder", "seq_len", "wall_s", "rss_kib", "check"
    );
    for m in measurements {
        println!(
            "{:<15} {:>8} {:>10.4} {:>10} {:<9} {}",
            m.decoder.name(),
            m.seq_len,
            m.wall_s,
            m.rss_delta_kib,
            m.check.label(),
            m.check.detail().unwrap_or("-"),
        );
    }
    Ok(())
}

fn write_json(measurements: &[Measurement]) -> Result<(), String> {
    let rows: Vec<String> = measurements
        .iter()
        .map(|m| {
            let detail = m.check.detail().map_or_else(|| "null".to_string(), json_string);
            format!(
                "  {{\"decoder\": {}, \"seq_len\": {}, \"wall_s\": {:.6}, \"rss_delta_kib\": {}, \"check\": {}, \"detail\": {}}}",
                json_string(m.decoder.name()),
                m.seq_len,
                m.wall_s,
                m.rss_delta_kib,
                json_string(m.check.label()),
                detail
            )
        })
        .collect();
    println!("[\n{}\n]", rows.join(",\n"));
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    match get_current_pid().ok().and_then(|pid| sys.process(pid)) {
        Some(process) => process.memory() / 1024,
        None => 0,
    }
}

/// Each node `u` has three transitions, `u -> (3u + j) mod n` labeled
/// `(u + j) mod 3` with probability `(j + 1) / 6`.
fn ring_graph(nodes: u32) -> WeightedGraph<u32, u32> {
    let mut g = WeightedGraph::new();
    for u in 0..nodes {
        g.add_node(u);
        for j in 0..3u32 {
            let v = (3 * u + j) % nodes;
            g.add_weighted_edge(u, v, (u + j) % LABELS, f64::from(j + 1) / 6.0);
        }
    }
    g
}

fn cycling_sequence(len: usize) -> Vec<u32> {
    (0..len).map(|i| (i as u32 * 7 + i as u32 / 5) % LABELS).collect()
}

/// Best log-probability via dense per-node vectors, `None` if unreachable.
fn dense_baseline(graph: &WeightedGraph<u32, u32>, nodes: u32, seq: &[u32]) -> Option<f64> {
    let n = nodes as usize;
    let mut best = vec![f64::NEG_INFINITY; n];
    best[0] = 0.0;
    for symbol in seq {
        let mut next = vec![f64::NEG_INFINITY; n];
        for u in 0..nodes {
            let lu = best[u as usize];
            if lu == f64::NEG_INFINITY {
                continue;
            }
            for t in graph.transitions(&u) {
                if t.label == *symbol {
                    let cand = lu + t.weight.ln();
                    let slot = &mut next[t.target as usize];
                    if cand > *slot {
                        *slot = cand;
                    }
                }
            }
        }
        best = next;
    }
    best.into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}
