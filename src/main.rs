//! Command-line front end: load sources, run the pipeline, print one period.
//!
//! Usage: modalshare [--benchmark FILE] [--period P] [--country NAME]...
//!                   [--interpolate FROM:TO] [--estimated] [--json] [FILE...]
//!
//! With no files the embedded seed tables are used; `--estimated` swaps in
//! the ITF estimate and preselects the suggested countries. When `MODAL_REMOTE_URL`
//! is set its body is fetched and added as one more series source.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use std::fs;

use modalshare::config::Config;
use modalshare::estimate;
use modalshare::feed::RemoteSource;
use modalshare::logging::{self, Domain, Level, ProfileScope};
use modalshare::pipeline::{add_interpolated, run, summary_json, SourceText};
use modalshare::query::{select, PeriodView, Selection};
use modalshare::seed;
use modalshare::timeline::Timeline;
use modalshare::types::Period;

#[derive(Debug, Default, PartialEq)]
struct Args {
    files: Vec<String>,
    benchmark: Option<String>,
    period: Option<Period>,
    countries: Vec<String>,
    interpolate: Option<(i32, i32)>,
    estimated: bool,
    json: bool,
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let mut args = Args::default();
    let mut it = raw.iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| anyhow!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--benchmark" => args.benchmark = Some(value("--benchmark")?),
            "--period" => {
                let p = value("--period")?;
                args.period = Some(p.parse().map_err(|e: String| anyhow!(e))?);
            }
            "--country" => args.countries.push(value("--country")?),
            "--interpolate" => {
                let span = value("--interpolate")?;
                let (from, to) = span
                    .split_once(':')
                    .ok_or_else(|| anyhow!("--interpolate expects FROM:TO, got {}", span))?;
                args.interpolate = Some((
                    from.trim().parse().context("interpolate start year")?,
                    to.trim().parse().context("interpolate end year")?,
                ));
            }
            "--estimated" => args.estimated = true,
            "--json" => args.json = true,
            flag if flag.starts_with("--") => bail!("unknown flag {}", flag),
            file => args.files.push(file.to_string()),
        }
    }
    Ok(args)
}

fn load_sources(args: &Args) -> Result<Vec<SourceText>> {
    if args.estimated {
        return Ok(vec![estimate::estimated_source()?]);
    }
    if args.files.is_empty() && args.benchmark.is_none() {
        return Ok(seed::sources());
    }
    let mut sources = Vec::new();
    if let Some(path) = &args.benchmark {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
        sources.push(SourceText::benchmark(path, &text));
    }
    for path in &args.files {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
        sources.push(SourceText::series(path, &text));
    }
    Ok(sources)
}

fn fmt_share(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{:>8.*}", decimals, v),
        None => format!("{:>8}", "-"),
    }
}

fn print_table(view: &PeriodView, cfg: &Config) {
    println!("{}", view.title);
    if let Some(notice) = &view.notice {
        println!("{}", notice);
        return;
    }
    let decimals = cfg.display_decimals as usize;
    println!("{:<20} {:>8} {:>8} {:>8}  source", "Country", "Rail", "Road", "Water");
    for row in &view.rows {
        println!(
            "{:<20} {} {} {}  {}",
            row.country,
            fmt_share(row.display_rail, decimals),
            fmt_share(row.display_road, decimals),
            fmt_share(row.display_waterway, decimals),
            row.source
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw)?;
    let cfg = Config::from_env();
    logging::log(
        Level::Info,
        Domain::System,
        "run_start",
        logging::obj(&[
            ("run_id", logging::v_str(logging::run_id())),
            ("files", json!(args.files.len())),
            ("remote", json!(cfg.remote_url.is_some())),
        ]),
    );
    let _scope = ProfileScope::new("cli");

    let mut sources = load_sources(&args)?;
    if let Some(remote) = RemoteSource::from_config(&cfg)? {
        sources.push(remote.fetch_source().await?);
    }

    let mut out = run(&sources, &cfg);
    if let Some((from, to)) = args.interpolate {
        add_interpolated(&mut out, from, to);
    }

    let timeline = Timeline::from_table(&out.table);
    let period = args
        .period
        .or(timeline.default)
        .ok_or_else(|| anyhow!("no periods in the loaded sources"))?;
    let mut selection = Selection::period(period);
    if !args.countries.is_empty() {
        selection = selection.with_countries(&args.countries);
    } else if args.estimated {
        selection = selection.with_countries(&estimate::default_countries(&out.table.countries()));
    }
    let view = select(&out.table, &selection, &cfg);
    logging::log_view(&period.to_string(), view.rows.len(), view.notice.as_deref());

    if args.json {
        let payload = json!({
            "summary": summary_json(&out),
            "timeline": timeline,
            "view": view,
            "diagnostics": out.diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_table(&view, &cfg);
        if !out.diagnostics.is_empty() {
            println!();
            println!("{} diagnostics:", out.diagnostics.len());
            for (kind, n) in modalshare::diagnostics::summarize(&out.diagnostics) {
                println!("  {:<24} {}", kind, n);
            }
        }
    }
    Ok(())
}
