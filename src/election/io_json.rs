use crate::election::*;

/// Reads a list of `{"voter": ..., "ranking": [...]}` objects.
pub fn read_json_ballots(path: &str) -> TallyResult<Vec<Ballot>> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let ballots: Vec<Ballot> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_json_ballots: {} ballots in {:?}", ballots.len(), path);
    Ok(ballots)
}
