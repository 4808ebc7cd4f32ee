// Primitives for reading CSV files.

use std::fs::File;

use crate::election::io_common::{make_default_id, parse_candidate_id};
use crate::election::*;

pub fn read_csv_ballots(path: &str, cfs: &FileSource) -> TallyResult<Vec<Ballot>> {
    let default_id = make_default_id(path);

    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;

    let mut res: Vec<Ballot> = Vec::new();
    let (records, row_offset) = get_records(path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        if line.iter().all(|s| s.trim().is_empty()) {
            continue;
        }
        let voter = if let Some(id_idx) = id_idx_o {
            line.get(id_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .trim()
                .to_string()
        } else {
            default_id(lineno)
        };

        let mut ranking: Vec<CandidateId> = Vec::new();
        for cell in line.iter().skip(choices_start_col) {
            if let Some(cid) = parse_candidate_id(cell, lineno)? {
                ranking.push(cid);
            }
        }
        debug!("read_csv_ballots: lineno: {:?} ranking: {:?}", lineno, &ranking);
        res.push(Ballot { voter, ranking });
    }
    Ok(res)
}

fn get_records(path: &str, cfs: &FileSource) -> TallyResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_vote_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    for _ in 0..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_tmp(name: &str, content: &str) -> String {
        let p = std::env::temp_dir().join(name);
        fs::write(&p, content).unwrap();
        p.display().to_string()
    }

    #[test]
    fn with_ids_and_header() {
        let path = write_tmp(
            "schulzetab_with_ids.csv",
            "voter,first,second,third\nv1,101,103,102\nv2,102,,\nv3,103,101\n",
        );
        let cfs: FileSource = serde_json::from_value(json!({
            "provider": "csv",
            "filePath": path,
            "idColumnIndex": 1,
            "firstVoteRowIndex": 2
        }))
        .unwrap();
        let ballots = read_csv_ballots(&path, &cfs).unwrap();
        assert_eq!(
            ballots,
            vec![
                Ballot::new("v1", &[101, 103, 102]),
                Ballot::new("v2", &[102]),
                Ballot::new("v3", &[103, 101]),
            ]
        );
    }

    #[test]
    fn without_ids() {
        let path = write_tmp("schulzetab_without_ids.csv", "1,2\n\n2,1\n");
        let cfs = FileSource::from_input(&path, "csv", None);
        let ballots = read_csv_ballots(&path, &cfs).unwrap();
        assert_eq!(ballots.len(), 2);
        assert_eq!(ballots[0].voter, "schulzetab_without_ids.csv-00000001");
        assert_eq!(ballots[1].ranking, vec![CandidateId(2), CandidateId(1)]);
    }

    #[test]
    fn names_are_not_ids() {
        let path = write_tmp("schulzetab_names.csv", "Alice,Bob\n");
        let cfs = FileSource::from_input(&path, "csv", None);
        assert!(matches!(
            read_csv_ballots(&path, &cfs),
            Err(ElectionError::InvalidCandidateId { lineno: 1, .. })
        ));
    }
}
