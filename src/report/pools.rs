//! Reporting of the allocation pool of each registry
use std::fmt;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use clap::ArgMatches;
use crate::records::AllocationRecords;
use crate::registry::Registry;
use crate::remaining::Depletion;
use crate::report::millions;
use crate::report::Error;
use crate::report::ReportFormat;


const FORMATS: [ReportFormat; 2] = [ReportFormat::Json, ReportFormat::Text];


//------------ PoolReportOpts -----------------------------------------------

pub struct PoolReportOpts {
    prefixes: PathBuf,
    format: ReportFormat
}

impl PoolReportOpts {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Error> {
        let prefixes_file = matches.value_of("prefixes").unwrap();
        let prefixes = PathBuf::from(prefixes_file);

        let format = ReportFormat::parse(matches, &FORMATS)?;

        Ok(PoolReportOpts { prefixes, format })
    }
}


//------------ PoolStat -----------------------------------------------------

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PoolStat {
    registry: Registry,
    pool: i64,
    consumed: i64,
    remaining: i64
}

impl PoolStat {
    pub fn registry(&self) -> Registry { self.registry }

    /// Sum of the 'rir' records.
    pub fn pool(&self) -> i64 { self.pool }

    /// Sum of all other records.
    pub fn consumed(&self) -> i64 { self.consumed }

    /// What is left after the last record.
    pub fn remaining(&self) -> i64 { self.remaining }
}

impl fmt::Display for PoolStat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:<9} pool: {:>5}M, consumed: {:>5}M, remaining: {:>5}M",
            self.registry.label(),
            millions(self.pool),
            millions(self.consumed),
            millions(self.remaining)
        )
    }
}


//------------ PoolReport ---------------------------------------------------

pub struct PoolReport;

impl PoolReport {
    pub fn execute(options: &PoolReportOpts) -> Result<(), Error> {
        info!("pool report for {}", options.prefixes.display());

        let records = AllocationRecords::from_file(&options.prefixes)?;
        let res = Self::analyse(&records)?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        res.write(&mut out, options.format)
    }

    pub fn analyse(records: &AllocationRecords) -> Result<PoolReportResult, Error> {
        let depletion = Depletion::new(records.all())?;
        let consumed = depletion.consumed();

        let stats: Vec<PoolStat> = depletion.initial_totals().iter().map(|(reg, pool)| {
            PoolStat {
                registry: *reg,
                pool: *pool,
                consumed: consumed[reg],
                remaining: *pool - consumed[reg]
            }
        }).collect();

        Ok(PoolReportResult { pools: stats })
    }
}


//------------ PoolReportResult ---------------------------------------------

#[derive(Clone, Debug, Serialize)]
pub struct PoolReportResult {
    pools: Vec<PoolStat>
}

impl PoolReportResult {
    pub fn pools(&self) -> &[PoolStat] { &self.pools }

    pub fn write<W: Write>(&self, w: &mut W, format: ReportFormat) -> Result<(), Error> {
        match format {
            ReportFormat::Json => {
                serde_json::to_writer(&mut *w, self)?;
                writeln!(w)?;
            },
            _ => write!(w, "{}", self)?
        }
        Ok(())
    }
}

impl fmt::Display for PoolReportResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Allocation pools:")?;
        for stat in &self.pools {
            writeln!(f, "  {}", stat)?;
        }
        Ok(())
    }
}


//------------ Tests --------------------------------------------------------
