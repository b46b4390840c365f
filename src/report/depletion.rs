//! Reporting of the remaining address space per registry over time
use std::fmt;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use clap::ArgMatches;
use crate::records::AllocationRecords;
use crate::registry::Registry;
use crate::remaining::Depletion;
use crate::remaining::Snapshot;
use crate::report::millions;
use crate::report::DateRange;
use crate::report::Error;
use crate::report::ReportFormat;


const FORMATS: [ReportFormat; 3] = [
    ReportFormat::Json,
    ReportFormat::Csv,
    ReportFormat::Text
];


//------------ DepletionReportOpts ------------------------------------------

/// Options for the DepletionReport
pub struct DepletionReportOpts {
    prefixes: PathBuf,
    range: DateRange,
    format: ReportFormat
}

impl DepletionReportOpts {
    pub fn new(prefixes: PathBuf, range: DateRange, format: ReportFormat) -> Self {
        DepletionReportOpts { prefixes, range, format }
    }

    pub fn parse(matches: &ArgMatches) -> Result<Self, Error> {
        let prefixes_file = matches.value_of("prefixes").unwrap();
        let prefixes = PathBuf::from(prefixes_file);

        let range = DateRange::parse(matches)?;
        let format = ReportFormat::parse(matches, &FORMATS)?;

        Ok(DepletionReportOpts { prefixes, range, format })
    }
}


//------------ DepletionReport ----------------------------------------------

/// Produces the remaining count of every registry for each date in the
/// input, clipped to the requested date range.
pub struct DepletionReport;

impl DepletionReport {
    pub fn execute(options: &DepletionReportOpts) -> Result<(), Error> {
        info!("depletion report for {}", options.prefixes.display());

        let records = AllocationRecords::from_file(&options.prefixes)?;
        let res = Self::analyse(&records, options.range)?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        res.write(&mut out, options.format)
    }

    pub fn analyse(
        records: &AllocationRecords,
        range: DateRange
    ) -> Result<DepletionReportResult, Error> {
        let depletion = Depletion::new(records.all())?;

        info!(
            "aggregating {} records from {} until {}",
            records.len(),
            depletion.first_date(),
            depletion.last_date()
        );

        let mut total = 0;
        let snapshots: Vec<Snapshot> = depletion.snapshots()
            .inspect(|_| total += 1)
            .filter(|s| range.contains(s.date()))
            .collect();

        debug!("{} distinct dates, {} in range", total, snapshots.len());

        if snapshots.is_empty() {
            warn!("no snapshots between {:?} and {:?}", range.since(), range.until());
        }

        Ok(DepletionReportResult {
            registries: depletion.registries(),
            snapshots
        })
    }
}


//------------ DepletionReportResult ----------------------------------------

#[derive(Clone, Debug, Serialize)]
pub struct DepletionReportResult {
    registries: Vec<Registry>,
    snapshots: Vec<Snapshot>
}

impl DepletionReportResult {
    pub fn registries(&self) -> &[Registry] { &self.registries }
    pub fn snapshots(&self) -> &[Snapshot] { &self.snapshots }

    pub fn write<W: Write>(&self, w: &mut W, format: ReportFormat) -> Result<(), Error> {
        match format {
            ReportFormat::Json => {
                serde_json::to_writer(&mut *w, self)?;
                writeln!(w)?;
            },
            ReportFormat::Csv => self.write_csv(w)?,
            ReportFormat::Text => write!(w, "{}", self)?
        }
        Ok(())
    }

    fn write_csv<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        let mut wtr = csv::Writer::from_writer(w);

        let mut header = vec!["date".to_string()];
        header.extend(self.registries.iter().map(|reg| reg.to_string()));
        wtr.write_record(&header)?;

        for snapshot in &self.snapshots {
            let mut row = vec![snapshot.date().to_string()];
            row.extend(self.registries.iter().map(|reg|
                snapshot.remaining_for(*reg).to_string()
            ));
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for DepletionReportResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Remaining IPv4 addresses (millions)")?;
        write!(f, "{:<12}", "date")?;
        for reg in &self.registries {
            write!(f, "{:>9}", reg.label())?;
        }
        writeln!(f)?;

        for snapshot in &self.snapshots {
            write!(f, "{:<12}", snapshot.date().to_string())?;
            for reg in &self.registries {
                write!(f, "{:>9}", millions(snapshot.remaining_for(*reg)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}


//------------ Tests --------------------------------------------------------
