// Rendering of the results: JSON summary, text report and CSV table.

use serde_json::{json, Value as JSValue};
use std::io::Write;

use crate::election::*;

fn winner_label<S: ElectionStore>(store: &S, cid: CandidateId) -> TallyResult<String> {
    let c = store.candidate_by_id(cid).context(VotingSnafu)?;
    Ok(format!("st{} {}", cid, c.name))
}

fn result_to_js<S: ElectionStore>(result: &ElectionResult, store: &S) -> TallyResult<JSValue> {
    let mut names: Vec<String> = Vec::new();
    for cid in result.winners.iter() {
        names.push(store.candidate_by_id(*cid).context(VotingSnafu)?.name);
    }
    Ok(json!({
        "scope": result.scope,
        "stage": result.stage,
        "winners": result.winners,
        "winnerNames": names,
        "preferences": result.preferences,
        "strongestPaths": result.strongest_paths,
    }))
}

pub fn build_summary_js<S: ElectionStore>(
    config: &ElectionConfig,
    rules: &ElectionRules,
    results: &[ElectionResult],
    store: &S,
) -> TallyResult<JSValue> {
    let mut results_js: Vec<JSValue> = Vec::new();
    for result in results.iter() {
        results_js.push(result_to_js(result, store)?);
    }
    Ok(json!({
        "config": {
            "election": config.output_settings.election_name,
            "totalSeats": rules.total_seats,
            "commonScope": rules.common_scope_name,
        },
        "results": results_js,
    }))
}

/// The rows of a matrix, with a header row. The diagonal is marked with `-`.
fn matrix_rows(m: &Matrix) -> Vec<Vec<String>> {
    let cands = m.candidates();
    let mut header: Vec<String> = vec!["-".to_string()];
    header.extend(cands.iter().map(|c| c.to_string()));
    let mut rows = vec![header];
    for a in cands.iter() {
        let mut row: Vec<String> = vec![a.to_string()];
        for b in cands.iter() {
            if a == b {
                row.push("-".to_string());
            } else {
                row.push(m.get(*a, *b).to_string());
            }
        }
        rows.push(row);
    }
    rows
}

fn push_table(out: &mut String, m: &Matrix) {
    for row in matrix_rows(m) {
        let line: String = row.iter().map(|cell| format!("{:<10}", cell)).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

/// A plain text report of one result.
pub fn render_text<S: ElectionStore>(result: &ElectionResult, store: &S) -> TallyResult<String> {
    let mut labels: Vec<String> = Vec::new();
    for cid in result.winners.iter() {
        labels.push(winner_label(store, *cid)?);
    }
    let mut out = String::new();
    out.push_str(&format!("Scope: {}\n", result.scope));
    out.push_str(&format!("Stage: {}\n", result.stage));
    out.push_str(&format!("Winners: {}\n", labels.join(", ")));
    out.push_str("Pairwise preferences:\n");
    push_table(&mut out, &result.preferences);
    out.push_str("Strongest paths:\n");
    push_table(&mut out, &result.strongest_paths);
    Ok(out)
}

pub fn write_table<W: Write, S: ElectionStore>(
    writer: W,
    results: &[ElectionResult],
    store: &S,
) -> TallyResult<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for result in results.iter() {
        wtr.write_record(&["Scope", result.scope.as_str()])
            .context(CsvWriteSnafu {})?;
        wtr.write_record(&["Stage".to_string(), result.stage.to_string()])
            .context(CsvWriteSnafu {})?;
        let mut winners: Vec<String> = vec!["Winners".to_string()];
        for cid in result.winners.iter() {
            winners.push(winner_label(store, *cid)?);
        }
        wtr.write_record(&winners).context(CsvWriteSnafu {})?;
        for (title, m) in [
            ("Pairwise preferences", &result.preferences),
            ("Strongest paths", &result.strongest_paths),
        ] {
            wtr.write_record(&[title]).context(CsvWriteSnafu {})?;
            for row in matrix_rows(m) {
                wtr.write_record(&row).context(CsvWriteSnafu {})?;
            }
        }
    }
    wtr.flush().context(WritingFileSnafu { path: "table" })?;
    Ok(())
}

pub fn write_table_file<S: ElectionStore>(
    path: &str,
    results: &[ElectionResult],
    store: &S,
) -> TallyResult<()> {
    info!("Writing table to {:?}", path);
    let f = fs::File::create(path).context(WritingFileSnafu { path })?;
    write_table(f, results, store)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> (ElectionResult, MemoryStore) {
        let prefs = Matrix::from_rows(&[(1, &[(2, 3)]), (2, &[(1, 2)])]);
        let paths = Matrix::from_rows(&[(1, &[(2, 3)]), (2, &[(1, 0)])]);
        let result = ElectionResult {
            scope: "x".to_string(),
            winners: vec![CandidateId(1)],
            preferences: prefs,
            strongest_paths: paths,
            stage: Stage::Absolute,
        };
        let store = MemoryStore::new(
            vec![Candidate::new(1, "Ann", "x"), Candidate::new(2, "Bob", "x")],
            vec![],
        );
        (result, store)
    }

    #[test]
    fn text() {
        let (result, store) = small();
        let expected = "Scope: x
Stage: absolute
Winners: st000001 Ann
Pairwise preferences:
-         000001    000002
000001    -         3
000002    2         -
Strongest paths:
-         000001    000002
000001    -         3
000002    0         -
";
        assert_eq!(render_text(&result, &store).unwrap(), expected);
    }

    #[test]
    fn table() {
        let (result, store) = small();
        let mut buf: Vec<u8> = Vec::new();
        write_table(&mut buf, &[result], &store).unwrap();
        let s = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Scope,x",
                "Stage,absolute",
                "Winners,st000001 Ann",
                "Pairwise preferences",
                "-,000001,000002",
                "000001,-,3",
                "000002,2,-",
                "Strongest paths",
                "-,000001,000002",
                "000001,-,3",
                "000002,0,-",
            ]
        );
    }

    #[test]
    fn summary() {
        let (result, store) = small();
        let config: ElectionConfig = serde_json::from_value(json!({
            "outputSettings": {"electionName": "Test"},
            "rules": {"totalSeats": 2},
            "candidates": []
        }))
        .unwrap();
        let js = build_summary_js(&config, &ElectionRules::new(2), &[result], &store).unwrap();
        assert_eq!(js["config"]["commonScope"], json!("Common seats"));
        assert_eq!(js["results"][0]["stage"], json!("absolute"));
        assert_eq!(js["results"][0]["winners"], json!([1]));
        assert_eq!(js["results"][0]["winnerNames"], json!(["Ann"]));
        assert_eq!(js["results"][0]["preferences"]["2"]["1"], json!(2));
        assert_eq!(js["results"][0]["strongestPaths"]["1"]["2"], json!(3));
    }

    #[test]
    fn unknown_winner() {
        let (mut result, store) = small();
        result.winners = vec![CandidateId(9)];
        assert!(render_text(&result, &store).is_err());
    }
}
