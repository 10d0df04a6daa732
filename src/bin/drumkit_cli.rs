use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drumkit_trainer::analysis::OnsetAnalysisPipeline;
use drumkit_trainer::audio::decode_wav_file;
use drumkit_trainer::config::AppConfig;
use drumkit_trainer::judgment::JudgmentResult;
use drumkit_trainer::rhythm::RhythmMap;
use drumkit_trainer::session::{PracticeSession, SessionState, SessionSummary};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "drumkit_cli",
    about = "Offline onset analysis and hit replay for the drum trainer"
)]
struct Cli {
    /// JSON config file (defaults to assets/drumkit_config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect drum hits and tempo in a WAV file
    Analyze {
        wav: PathBuf,
        /// Emit a playable rhythm map instead of the raw analysis
        #[arg(long)]
        map: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Judge a recorded hit list against a rhythm map
    Replay {
        #[arg(long)]
        map: PathBuf,
        #[arg(long)]
        hits: PathBuf,
        /// Also print every recorded judgment
        #[arg(long)]
        verbose: bool,
    },
}

/// One recorded pad strike
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordedHit {
    time_ms: f64,
    drum: String,
}

#[derive(Serialize)]
struct ReplayReport<'a> {
    summary: SessionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    judgments: Option<&'a [JudgmentResult]>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .map(AppConfig::load_from_file)
        .unwrap_or_else(AppConfig::load);

    match cli.command {
        Commands::Analyze { wav, map, output } => run_analyze(&config, &wav, map, output),
        Commands::Replay { map, hits, verbose } => run_replay(&config, &map, &hits, verbose),
    }
}

fn run_analyze(
    config: &AppConfig,
    wav: &Path,
    as_map: bool,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let audio = decode_wav_file(wav).with_context(|| format!("decoding {}", wav.display()))?;
    let pipeline = OnsetAnalysisPipeline::new(config.analysis.clone());
    let analysis = pipeline
        .analyze(&audio)
        .with_context(|| format!("analyzing {}", wav.display()))?;

    let json = if as_map {
        let stem = wav
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        let title = wav
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| stem.clone());
        let map = RhythmMap::from_analysis(&stem, &title, &analysis);
        serde_json::to_string_pretty(&map)?
    } else {
        serde_json::to_string_pretty(&analysis)?
    };

    emit(json, output_path)?;
    Ok(ExitCode::from(0))
}

fn run_replay(
    config: &AppConfig,
    map_path: &Path,
    hits_path: &Path,
    verbose: bool,
) -> Result<ExitCode> {
    let map: RhythmMap = read_json(map_path)?;
    let mut hits: Vec<RecordedHit> = read_json(hits_path)?;
    hits.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));

    let mut session = PracticeSession::new(map, config.judgment, config.session.clone())
        .with_context(|| format!("loading {}", map_path.display()))?;
    session.start()?;

    for hit in &hits {
        session.advance_to(hit.time_ms)?;
        if session.state() == SessionState::Finished {
            tracing::warn!(
                "Hit at {:.0}ms falls after the end of the map, ignoring the rest",
                hit.time_ms
            );
            break;
        }
        let result = session.hit(&hit.drum)?;
        tracing::debug!(
            "{} @ {:.0}ms -> {:?} ({:+.1}ms)",
            hit.drum,
            hit.time_ms,
            result.kind,
            result.delta_ms
        );
    }

    if session.state() == SessionState::Playing {
        session.advance_to(f64::INFINITY)?;
    }

    let report = ReplayReport {
        summary: session.summary(),
        judgments: verbose.then(|| session.history()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::from(0))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn emit(json: String, output_path: Option<PathBuf>) -> Result<()> {
    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }
    Ok(())
}
