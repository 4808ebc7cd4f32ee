use crate::election::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "electionName")]
    pub election_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// A source given on the command line: ranked ids start in the first column.
    pub fn from_input(path: &str, provider: &str, excel_worksheet_name: Option<String>) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: path.to_string(),
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            id_column_index: None,
            excel_worksheet_name,
        }
    }

    /// The 0-based column of the first ranked candidate.
    ///
    /// Defaults to the column after the voter id, or to the first column.
    pub fn first_vote_column_index(&self) -> TallyResult<usize> {
        match &self._first_vote_column_index {
            Some(_) => read_js_int(&self._first_vote_column_index),
            None => Ok(self.id_column_index_int()?.map(|i| i + 1).unwrap_or(0)),
        }
    }

    /// The number of rows to skip before the first ballot.
    pub fn first_vote_row_index(&self) -> TallyResult<usize> {
        match &self._first_vote_row_index {
            Some(_) => read_js_int(&self._first_vote_row_index),
            None => Ok(0),
        }
    }

    pub fn id_column_index_int(&self) -> TallyResult<Option<usize>> {
        if self.id_column_index.is_some() {
            read_js_int(&self.id_column_index).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCandidate {
    pub id: u32,
    pub name: String,
    pub course: String,
    pub description: Option<String>,
    pub eligible: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRules {
    #[serde(rename = "totalSeats")]
    pub total_seats: u32,
    #[serde(rename = "commonScopeName")]
    pub common_scope_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub rules: ConfigRules,
    pub candidates: Vec<ConfigCandidate>,
    #[serde(rename = "ballotSources", default)]
    pub ballot_sources: Vec<FileSource>,
}

pub fn read_config(path: &str) -> TallyResult<ElectionConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: &str) -> TallyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

/// Reads a 1-based column or row index and returns it 0-based.
///
/// Accepts a number, a number in a string, or an Excel column letter.
fn read_js_int(x: &Option<JSValue>) -> TallyResult<usize> {
    let one_based: usize = match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {})?,
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            // Excel columns: A is 1, Z is 26, AA is 27.
            s.to_ascii_lowercase()
                .chars()
                .try_fold(0usize, |acc, c| {
                    acc.checked_mul(26)?
                        .checked_add(c as usize - 'a' as usize + 1)
                })
                .context(ParsingJsonNumberSnafu {})?
        }
        Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {})?,
        _ => None::<usize>.context(ParsingJsonNumberSnafu {})?,
    };
    one_based.checked_sub(1).context(ParsingJsonNumberSnafu {})
}
