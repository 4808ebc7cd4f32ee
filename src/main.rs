mod args;
mod election;

use clap::Parser;
use log::{debug, LevelFilter};

use crate::args::Args;
use crate::election::{run_election, RunOptions};

fn main() {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    debug!("args: {:?}", args);

    let options = RunOptions {
        config_path: args.config,
        reference_path: args.reference,
        out: args.out,
        print_text: args.text,
        table_path: args.table,
        total_seats: args.total_seats,
        input: args.input,
        input_type: args.input_type,
        excel_worksheet_name: args.excel_worksheet_name,
    };

    if let Err(e) = run_election(&options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
