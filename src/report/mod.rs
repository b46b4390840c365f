use std::io;
use std::str::FromStr;
use chrono::Local;
use chrono::NaiveDate;
use clap::ArgMatches;
use crate::records;
use crate::remaining;

pub mod depletion;
pub mod pools;


//------------ DateRange ----------------------------------------------------

/// Inclusive range of dates to show. Either end may be open.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DateRange {
    since: Option<NaiveDate>,
    until: Option<NaiveDate>
}

impl DateRange {
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        DateRange { since, until }
    }

    pub fn all() -> Self {
        DateRange::default()
    }

    pub fn since(&self) -> Option<NaiveDate> { self.since }
    pub fn until(&self) -> Option<NaiveDate> { self.until }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since.map_or(true, |since| since <= date) &&
        self.until.map_or(true, |until| date <= until)
    }

    /// Reads the optional 'since' and 'until' arguments.
    pub fn parse(matches: &ArgMatches) -> Result<Self, Error> {
        let since = match matches.value_of("since") {
            Some(s) => Some(Self::parse_date(s)?),
            None => None
        };
        let until = match matches.value_of("until") {
            Some(s) => Some(Self::parse_date(s)?),
            None => None
        };

        if let (Some(since), Some(until)) = (since, until) {
            if since > until {
                return Err(Error::WithMessage(
                    format!("Empty date range: {} is after {}", since, until)))
            }
        }

        Ok(DateRange { since, until })
    }

    /// Parses YYYY-MM-DD, or 'now' for today.
    pub fn parse_date(s: &str) -> Result<NaiveDate, Error> {
        if s == "now" {
            Ok(Local::now().date_naive())
        } else {
            NaiveDate::from_str(s).map_err(|_| Error::WithMessage(
                format!("Unsupported date: {}. Use YYYY-MM-DD or now", s)))
        }
    }
}


//------------ ReportFormat -------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportFormat {
    Json,
    Csv,
    Text
}

impl ReportFormat {
    /// Reads the 'format' argument, defaults to json. Only the given
    /// formats are accepted.
    pub fn parse(
        matches: &ArgMatches,
        supported: &[ReportFormat]
    ) -> Result<Self, Error> {
        let format = match matches.value_of("format") {
            None => return Ok(ReportFormat::Json),
            Some("json") => ReportFormat::Json,
            Some("csv") => ReportFormat::Csv,
            Some("text") => ReportFormat::Text,
            Some(f) => return Err(Self::unsupported(f, supported))
        };

        if supported.contains(&format) {
            Ok(format)
        } else {
            Err(Self::unsupported(format.name(), supported))
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv  => "csv",
            ReportFormat::Text => "text",
        }
    }

    fn unsupported(f: &str, supported: &[ReportFormat]) -> Error {
        let names: Vec<&str> = supported.iter().map(|f| f.name()).collect();
        Error::WithMessage(format!(
            "Unsupported format: {}. Supported are: {}", f, names.join("|")
        ))
    }
}


//------------ millions -----------------------------------------------------

/// Address count in whole millions, rounded.
pub fn millions(count: i64) -> i64 {
    (count as f64 / 1_000_000.).round() as i64
}


//------------ Error --------------------------------------------------------

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "{}", _0)]
    WithMessage(String),

    #[display(fmt = "{}", _0)]
    RecordsError(records::Error),

    #[display(fmt = "{}", _0)]
    DepletionError(remaining::Error),

    #[display(fmt = "{}", _0)]
    JsonError(serde_json::Error),

    #[display(fmt = "{}", _0)]
    CsvError(csv::Error),

    #[display(fmt = "Cannot write report: {}", _0)]
    IoError(io::Error),
}

impl From<records::Error> for Error {
    fn from(e: records::Error) -> Self { Error::RecordsError(e) }
}

impl From<remaining::Error> for Error {
    fn from(e: remaining::Error) -> Self { Error::DepletionError(e) }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self { Error::JsonError(e) }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self { Error::CsvError(e) }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self { Error::IoError(e) }
}

impl ::std::error::Error for Error {}


//------------ Tests --------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::App;
    use clap::Arg;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app() -> App<'static, 'static> {
        App::new("test")
            .arg(Arg::with_name("since").long("since").takes_value(true))
            .arg(Arg::with_name("until").long("until").takes_value(true))
            .arg(Arg::with_name("format").long("format").takes_value(true))
    }

    #[test]
    fn should_contain_inclusive() {
        let range = DateRange::new(Some(date(2009, 1, 1)), Some(date(2010, 1, 1)));
        assert!(range.contains(date(2009, 1, 1)));
        assert!(range.contains(date(2010, 1, 1)));
        assert!(!range.contains(date(2008, 12, 31)));
        assert!(!range.contains(date(2010, 1, 2)));
        assert!(DateRange::all().contains(date(1983, 1, 1)));
    }

    #[test]
    fn should_parse_range() {
        let matches = app().get_matches_from(vec![
            "test", "--since", "2009-01-01", "--until", "now"
        ]);
        let range = DateRange::parse(&matches).unwrap();
        assert_eq!(Some(date(2009, 1, 1)), range.since());
        assert_eq!(Some(Local::now().date_naive()), range.until());
    }

    #[test]
    fn should_reject_bad_range() {
        let matches = app().get_matches_from(vec!["test", "--since", "20090101"]);
        assert!(DateRange::parse(&matches).is_err());

        let matches = app().get_matches_from(vec![
            "test", "--since", "2010-01-01", "--until", "2009-01-01"
        ]);
        assert!(DateRange::parse(&matches).is_err());
    }

    #[test]
    fn should_parse_format() {
        let all = [ReportFormat::Json, ReportFormat::Csv, ReportFormat::Text];
        let no_csv = [ReportFormat::Json, ReportFormat::Text];

        let matches = app().get_matches_from(vec!["test"]);
        assert_eq!(ReportFormat::Json, ReportFormat::parse(&matches, &all).unwrap());

        let matches = app().get_matches_from(vec!["test", "--format", "csv"]);
        assert_eq!(ReportFormat::Csv, ReportFormat::parse(&matches, &all).unwrap());
        assert!(ReportFormat::parse(&matches, &no_csv).is_err());

        let matches = app().get_matches_from(vec!["test", "--format", "html"]);
        assert!(ReportFormat::parse(&matches, &all).is_err());
    }

    #[test]
    fn should_round_to_millions() {
        assert_eq!(0, millions(499_999));
        assert_eq!(1, millions(1_499_999));
        assert_eq!(2, millions(1_500_000));
        assert_eq!(256, millions(256 * 1_000_000));
        assert_eq!(-2, millions(-1_500_000));
    }
}
