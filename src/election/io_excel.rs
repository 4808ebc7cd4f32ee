use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::election::io_common::{make_default_id, parse_candidate_id};
use crate::election::*;

pub fn read_excel_ballots(path: &str, cfs: &FileSource) -> TallyResult<Vec<Ballot>> {
    let wrange = get_range(path, cfs)?;
    let default_id = make_default_id(path);
    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;
    let first_row = cfs.first_vote_row_index()?;

    let mut res: Vec<Ballot> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(first_row) {
        let lineno = idx + 1;
        if row.iter().all(|cell| matches!(cell, DataType::Empty)) {
            continue;
        }
        let voter = match id_idx_o {
            Some(id_idx) => match row.get(id_idx) {
                Some(DataType::String(s)) => s.trim().to_string(),
                Some(DataType::Int(i)) => i.to_string(),
                Some(DataType::Float(f)) => format!("{}", f),
                _ => default_id(lineno),
            },
            None => default_id(lineno),
        };
        let mut ranking: Vec<CandidateId> = Vec::new();
        for cell in row.iter().skip(choices_start_col) {
            if let Some(cid) = read_cell_id(cell, lineno)? {
                ranking.push(cid);
            }
        }
        debug!("read_excel_ballots: lineno: {:?} ranking: {:?}", lineno, &ranking);
        res.push(Ballot { voter, ranking });
    }
    Ok(res)
}

fn read_cell_id(cell: &DataType, lineno: usize) -> TallyResult<Option<CandidateId>> {
    match cell {
        DataType::Empty => Ok(None),
        DataType::String(s) => parse_candidate_id(s, lineno),
        DataType::Int(i) if *i >= 0 && *i <= u32::MAX as i64 => Ok(Some(CandidateId(*i as u32))),
        DataType::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64 => {
            Ok(Some(CandidateId(*f as u32)))
        }
        _ => Err(ElectionError::ExcelWrongCellType {
            lineno,
            content: format!("{:?}", cell),
        }),
    }
}

fn get_range(path: &str, cfs: &FileSource) -> TallyResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &cfs.excel_worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let wrange_o = match &cfs.excel_worksheet_name {
        Some(worksheet_name) => workbook.worksheet_range(worksheet_name),
        None => workbook.worksheet_range_at(0),
    };
    wrange_o
        .context(EmptyExcelSnafu { path })?
        .context(OpeningExcelSnafu { path })
}
