use chrono::Local;
use clap::CommandFactory;
use clap::Parser;
use env_logger::Env;
use std::env;
use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use fgsniffer::Config;
use fgsniffer::Pipeline;

const AFTER_HELP: &str = "On the fortigate use
\tdiagnose sniffer packet <interface> '<filter>' <3|6> <count> a
to create a parsable dump, then pipe it into fgsniffer.

FILTER is an interface name, a direction (in, out) or 'any'. Matching packets
are also written as a pcap stream to standard output.";

/// Convert text captures to pcap files.
///
/// The definition renders the help. Arguments are taken from argv as they are,
/// since clap would swallow `--`, which is also a direction token.
#[derive(Parser, Debug)]
#[command(name = "fgsniffer", disable_help_flag = true, after_help = AFTER_HELP)]
struct Args {
    /// Pass-through filter, or -h / -? for this help
    #[arg(value_name = "FILTER", allow_hyphen_values = true, trailing_var_arg = true, num_args = 0..)]
    args: Vec<String>,
}

impl Args {
    fn from_argv<I: IntoIterator<Item = OsString>>(argv: I) -> Args {
        Args {
            args: argv
                .into_iter()
                .skip(1)
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        }
    }
    /// More than one argument is not an error, it just leaves filtering off.
    fn filter(&self) -> Option<String> {
        match self.args.as_slice() {
            [one] => Some(one.clone()),
            _ => None,
        }
    }
    fn wants_help(&self) -> bool {
        matches!(self.args.as_slice(), [one] if one == "-h" || one == "-?")
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::from_argv(env::args_os());
    if args.wants_help() {
        if let Err(e) = Args::command().print_help() {
            log::error!("{}", e);
        }
        println!();
        return ExitCode::SUCCESS;
    }

    let mut config = Config::new(Local::now());
    config.filter(args.filter());
    log::info!(
        "writing {}*.pcap, filter {:?}",
        config.get_base_name(),
        config.get_filter()
    );

    let mut pipeline = Pipeline::new(&config);
    let ret = pipeline.run(io::stdin().lock());

    for (name, packets) in pipeline.registry().summary() {
        eprintln!("created output file {} with {} packets.", name, packets);
    }

    match ret {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
