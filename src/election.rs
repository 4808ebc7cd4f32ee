use log::{debug, info, warn};

use schulze_voting::builder::Builder;
use schulze_voting::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::election::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_json;
pub mod report;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ElectionError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Line {lineno}: cannot read cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error reading file {path}: {source}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}: {source}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a column or row index starting at 1"))]
    ParsingJsonNumber {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error opening CSV file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line: {source}"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Error writing CSV: {source}"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Line {lineno}: {content:?} is not a candidate id"))]
    InvalidCandidateId { lineno: usize, content: String },
    #[snafu(display("Voting error: {source}"))]
    Voting { source: VotingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, ElectionError>;

/// Everything the command line can change about a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: String,
    pub reference_path: Option<String>,
    pub out: Option<String>,
    pub print_text: bool,
    pub table_path: Option<String>,
    pub total_seats: Option<u32>,
    pub input: Option<String>,
    pub input_type: Option<String>,
    pub excel_worksheet_name: Option<String>,
}

fn read_ballot_source(root: &Path, cfs: &FileSource) -> TallyResult<Vec<Ballot>> {
    let p: PathBuf = root.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read ballot file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_ballots(&p2, cfs),
        "xlsx" => io_excel::read_excel_ballots(&p2, cfs),
        "json" => io_json::read_json_ballots(&p2),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn validate_rules(config: &ElectionConfig, options: &RunOptions) -> TallyResult<ElectionRules> {
    let total_seats = options.total_seats.unwrap_or(config.rules.total_seats);
    if total_seats == 0 {
        whatever!("The total number of seats must be positive");
    }
    let mut rules = ElectionRules::new(total_seats);
    if let Some(name) = config.rules.common_scope_name.clone() {
        rules.common_scope_name = name;
    }
    Ok(rules)
}

fn build_store(config: &ElectionConfig, ballots: &[Ballot]) -> TallyResult<MemoryStore> {
    let candidates: Vec<Candidate> = config
        .candidates
        .iter()
        .map(|c| Candidate {
            id: CandidateId(c.id),
            name: c.name.clone(),
            scope: c.course.clone(),
            description: c.description.clone().unwrap_or_default(),
            eligible: c.eligible.unwrap_or(true),
        })
        .collect();
    let mut builder = Builder::new().candidates(&candidates).context(VotingSnafu)?;
    for ballot in ballots.iter() {
        builder.add_ballot_2(ballot).context(VotingSnafu)?;
    }
    Ok(builder.build())
}

fn write_summary(
    pretty_js: &str,
    config: &ElectionConfig,
    config_dir: &Path,
    out: &Option<String>,
) -> TallyResult<()> {
    let out_path: Option<PathBuf> = match (out.as_deref(), &config.output_settings.output_directory)
    {
        (Some("stdout"), _) => {
            println!("{}", pretty_js);
            None
        }
        (Some(p), _) => Some(PathBuf::from(p)),
        (None, Some(dir)) => {
            let dir_p = config_dir.join(dir);
            let dir_s = dir_p.display().to_string();
            fs::create_dir_all(&dir_p).context(WritingFileSnafu { path: dir_s })?;
            Some(dir_p.join("summary.json"))
        }
        (None, None) => None,
    };
    if let Some(p) = out_path {
        let path = p.display().to_string();
        info!("Writing summary to {:?}", path);
        fs::write(&p, pretty_js).context(WritingFileSnafu { path })?;
    }
    Ok(())
}

/// Runs a complete election: scope winners, then the at-large seats.
///
/// If the at-large allocation fails, the scope results are still reported before the
/// error is returned.
pub fn run_election(options: &RunOptions) -> TallyResult<()> {
    let config = read_config(&options.config_path)?;
    info!("config: {:?}", config);
    let config_p = Path::new(options.config_path.as_str());
    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;

    let rules = validate_rules(&config, options)?;

    let sources: Vec<FileSource> = match options.input.clone() {
        Some(input) => vec![FileSource::from_input(
            &input,
            options.input_type.as_deref().unwrap_or("csv"),
            options.excel_worksheet_name.clone(),
        )],
        None => config.ballot_sources.clone(),
    };
    if sources.is_empty() {
        whatever!("No ballot sources detected");
    }
    let sources_root: &Path = if options.input.is_some() {
        Path::new("")
    } else {
        root_p
    };

    let mut ballots: Vec<Ballot> = Vec::new();
    for cfs in sources.iter() {
        let mut file_data = read_ballot_source(sources_root, cfs)?;
        ballots.append(&mut file_data);
    }
    info!("Read {} ballots", ballots.len());
    debug!("ballots: {:?}", ballots);

    let mut store = build_store(&config, &ballots)?;
    compute_scope_results(&mut store).context(VotingSnafu)?;
    let global_res = compute_global_allocation(&mut store, &rules);
    if let Err(e) = &global_res {
        warn!("The at-large seats could not be allocated: {}", e);
    }

    let results = store.results().context(VotingSnafu)?;
    let result_js = report::build_summary_js(&config, &rules, &results, &store)?;
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&pretty_js_stats, &config, root_p, &options.out)?;

    if options.print_text {
        for result in results.iter() {
            println!("{}", report::render_text(result, &store)?);
        }
    }

    if let Some(table_p) = options.table_path.clone() {
        report::write_table_file(&table_p, &results, &store)?;
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = options.reference_path.clone() {
        let summary_ref = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    global_res.context(VotingSnafu)?;
    Ok(())
}

#[cfg(test)]
fn test_dir() -> String {
    option_env!("SCHULZE_TEST_DIR")
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}/testdata", env!("CARGO_MANIFEST_DIR")))
}

#[cfg(test)]
fn test_wrapper(test_name: &str) -> TallyResult<()> {
    let dir = test_dir();
    info!("Running test {}", test_name);
    let options = RunOptions {
        config_path: format!("{}/{}/{}_config.json", dir, test_name, test_name),
        reference_path: Some(format!(
            "{}/{}/{}_expected_summary.json",
            dir, test_name, test_name
        )),
        ..RunOptions::default()
    };
    let res = run_election(&options);
    if let Err(e) = &res {
        eprintln!("An error occured {}", e);
    }
    res
}
