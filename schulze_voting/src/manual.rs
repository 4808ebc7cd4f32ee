/*!

This is the long-form manual for `schulze_voting` and `schulzetab`.

## Overview

An election is made of candidates and ballots. Each candidate runs in one *scope*
(a course, a category, ...). Each scope elects exactly one candidate, and the remaining
seats are then filled *at large*, in a strict order, among the candidates who did not
win their scope.

Both steps use the [Schulze method](https://en.wikipedia.org/wiki/Schulze_method):

1. The pairwise preferences are counted: `d[A][B]` is the number of voters who rank
   `A` strictly ahead of `B`. A voter may rank only some of the candidates. The
   candidates who are not ranked are not compared with the others for this voter.
2. The strongest paths are computed. A link `A -> B` exists if `d[A][B] > d[B][A]`, and
   the strength of a path is the strength of its weakest link.
3. A candidate is a potential winner if no other candidate has a stronger path to them
   than they have back.

## Ties

When several potential winners remain, the tie-breaker looks at the pairs of tied
candidates, in order. For a pair `(A, B)`, it finds the weakest links of the strongest
paths from `A` to `B`, and from `B` to `A`. A link that appears in both lists is removed
and the strongest paths are computed again, until one of the two candidates has a
stronger path than the other. The loser is removed and the procedure starts over.
See section 5 of [the Schulze paper](https://arxiv.org/pdf/1804.02973).

If no pair can be decided, the tie is reported as is:

| Stage         | Meaning                                                       |
|---------------|---------------------------------------------------------------|
| `absolute`    | one potential winner                                          |
| `tie-breaker` | several potential winners, one left after the tie-breaker     |
| `tie`         | several potential winners, the tie could not be broken        |
| `common`      | the strict order of the at-large seats                        |

A scope that ends in a `tie` blocks the at-large allocation: the election authority
must first decide which candidate takes the scope seat.

## At-large seats

The number of at-large seats is the total number of seats minus the number of scope
winners. The candidates are picked one at a time. After each pick, the preferences are
counted again without the picked candidates. A tie that cannot be broken stops the
allocation with an error.

## Configuration file

The `schulzetab` program reads a JSON file:

```json
{
  "outputSettings": { "electionName": "Student council 2024" },
  "rules": { "totalSeats": 10, "commonScopeName": "Common seats" },
  "candidates": [
    { "id": 101, "name": "Alice", "course": "1 bachelor" },
    { "id": 102, "name": "Boris", "course": "1 bachelor", "eligible": false }
  ],
  "ballotSources": [
    { "provider": "csv", "filePath": "ballots.csv", "idColumnIndex": 1, "firstVoteColumnIndex": 2 }
  ]
}
```

File paths are relative to the configuration file. Column and row indices start at 1.

## Input formats

### `csv`

One ballot per line, without a header. The ranked candidate ids start at the column
`firstVoteColumnIndex`. Empty cells are skipped. If `idColumnIndex` is not given, the
voter id is made from the file name and the line number.

### `xlsx`

The same layout as `csv`, in an Excel worksheet. The worksheet is chosen with
`excelWorksheetName`, or the first one is used. `firstVoteRowIndex` skips header rows.

### `json`

A list of ballots:

```json
[ { "voter": "v1", "ranking": [101, 103, 102] } ]
```

## Outputs

The summary is a JSON document with one entry per scope and one for the at-large
seats, including the preference and strongest path matrices. It can be compared with a
reference summary with `--reference`. `--text` prints the tables, and `--table` writes
them as CSV.

*/
