use clap::Parser;

/// This is a tabulation program for elections counted with the Schulze method.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The file containing the election: candidates, rules and ballot sources.
    /// Only JSON election descriptions are supported.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, schulzetab will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified in the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// If passed, prints the pairwise preferences and the strongest paths of every result.
    #[clap(long, takes_value = false)]
    pub text: bool,

    /// (file path or empty) If specified, the results are also exported to this location as a CSV table.
    #[clap(long, value_parser)]
    pub table: Option<String>,

    /// (number) The total number of seats. Overrides the value of the configuration.
    #[clap(long, value_parser, env = "TOTAL_SEATS")]
    pub total_seats: Option<u32>,

    /// (file path or empty) If specified, the ballots are read from this file instead of the sources listed in the
    /// configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv, xlsx or json.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file as input, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
