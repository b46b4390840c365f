extern crate clap;
#[macro_use] extern crate derive_more;
extern crate env_logger;
extern crate ipv4_depletion;

use clap::App;
use clap::Arg;
use clap::SubCommand;
use ipv4_depletion::report;
use ipv4_depletion::report::depletion::DepletionReport;
use ipv4_depletion::report::depletion::DepletionReportOpts;
use ipv4_depletion::report::pools::PoolReport;
use ipv4_depletion::report::pools::PoolReportOpts;


fn main() {
    env_logger::init();

    match Options::create() {
        Err(e) => {
            eprintln!("{}", e);
            ::std::process::exit(1);
        },
        Ok(option) => {
            let res = match option {
                Options::Depletion(opts) => DepletionReport::execute(&opts),
                Options::Pools(opts) => PoolReport::execute(&opts)
            };
            match res {
                Ok(()) => {},
                Err(e) => {
                    eprintln!("{}", Error::ReportError(e));
                    ::std::process::exit(1);
                }
            }
        }
    }
}

enum Options {
    Depletion(DepletionReportOpts),
    Pools(PoolReportOpts)
}

impl Options {
    pub fn create() -> Result<Self, Error> {
        let matches = App::new("IPv4 depletion per RIR")
            .version("0.1.0")
            .subcommand(SubCommand::with_name("depletion")
                .about("Report remaining IPv4 addresses per RIR over time")
                .arg(Arg::with_name("prefixes")
                    .short("p")
                    .long("prefixes")
                    .value_name("FILE")
                    .help("Allocation records (prefixes.txt).")
                    .required(true))
                .arg(Arg::with_name("since")
                    .long("since")
                    .value_name("YYYY-MM-DD")
                    .help("Optional first date to report. Default: first date in file")
                    .required(false))
                .arg(Arg::with_name("until")
                    .long("until")
                    .value_name("YYYY-MM-DD | now")
                    .help("Optional last date to report. Default: last date in file")
                    .required(false))
                .arg(Arg::with_name("format")
                    .short("f")
                    .long("format")
                    .value_name("json | csv | text")
                    .help("Specify output format, defaults to json")
                    .required(false))
            )
            .subcommand(SubCommand::with_name("pools")
                .about("Report the allocation pool of each RIR")
                .arg(Arg::with_name("prefixes")
                    .short("p")
                    .long("prefixes")
                    .value_name("FILE")
                    .help("Allocation records (prefixes.txt).")
                    .required(true))
                .arg(Arg::with_name("format")
                    .short("f")
                    .long("format")
                    .value_name("json | text")
                    .help("Specify output format, defaults to json")
                    .required(false))
            )
            .get_matches();

        if let Some(opts) = matches.subcommand_matches("depletion") {
            Ok(Options::Depletion(DepletionReportOpts::parse(opts)?))
        } else if let Some(opts) = matches.subcommand_matches("pools") {
            Ok(Options::Pools(PoolReportOpts::parse(opts)?))
        } else {
            Err(Error::msg("No sub-command given. See --help for options."))
        }
    }
}


//------------ Error --------------------------------------------------------

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "{}", _0)]
    WithMessage(String),

    #[display(fmt = "{}", _0)]
    ReportError(report::Error),
}

impl Error {
    pub fn msg(s: &str) -> Self {
        Error::WithMessage(s.to_string())
    }
}

impl From<report::Error> for Error {
    fn from(e: report::Error) -> Self { Error::ReportError(e) }
}
