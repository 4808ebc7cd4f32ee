use std::path::Path;

use crate::election::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Voter ids for files that do not carry one: the file name and the line number.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Reads a cell holding a candidate id. Empty cells are not ranked.
pub fn parse_candidate_id(cell: &str, lineno: usize) -> TallyResult<Option<CandidateId>> {
    let s = cell.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<u32>()
        .ok()
        .map(|x| Some(CandidateId(x)))
        .context(InvalidCandidateIdSnafu {
            lineno,
            content: cell,
        })
}
