//! Parse prefixes.txt allocation records
//!
//! Each line holds: ip range, address count, date, registry, status. Fields
//! are separated by whitespace. E.g.:
//!
//!   41.0.0.0/8 16777216 20050401 afrinic rir
use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::path::PathBuf;
use std::str::FromStr;
use chrono::NaiveDate;
use crate::registry::Registry;
use crate::registry;


/// Status marking a record as the allocation pool of a registry.
pub const POOL_STATUS: &str = "rir";

/// Size of the whole IPv4 space, no block can hold more addresses.
pub const IPV4_SPACE: u64 = 1 << 32;


//------------ AllocationRecord ---------------------------------------------

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllocationRecord {
    ip_range: String,
    ip_count: u64,
    date: NaiveDate,
    registry: Registry,
    status: String
}

impl AllocationRecord {
    pub fn ip_range(&self) -> &str { &self.ip_range }
    pub fn ip_count(&self) -> u64 { self.ip_count }
    pub fn date(&self) -> NaiveDate { self.date }
    pub fn registry(&self) -> Registry { self.registry }
    pub fn status(&self) -> &str { &self.status }

    /// Pool records make up the total a registry was given, they are never
    /// subtracted.
    pub fn is_pool(&self) -> bool {
        self.status == POOL_STATUS
    }

    /// Returns the registry label of a line, if it has one, without parsing
    /// anything else.
    fn registry_label(line: &str) -> Option<&str> {
        line.split_whitespace().nth(3)
    }

    /// Parses YYYYMMDD. Some files drop the leading zero of the month, so a
    /// seven digit date gets that zero back first.
    pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("date is not numeric: {}", s))
        }

        let s = match s.len() {
            8 => s.to_string(),
            // put back the leading zero of the month: YYYYMDD
            7 => format!("{}0{}", &s[..4], &s[4..]),
            _ => return Err(format!("date needs 7 or 8 digits: {}", s))
        };

        let year = i32::from_str(&s[..4]).map_err(|e| e.to_string())?;
        let month = u32::from_str(&s[4..6]).map_err(|e| e.to_string())?;
        let day = u32::from_str(&s[6..8]).map_err(|e| e.to_string())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| format!("not a calendar date: {}", s))
    }
}

impl FromStr for AllocationRecord {
    type Err = String;

    /// Expects: "ipRange ipCount dateStr registry status"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = s.split_whitespace();

        let ip_range_str = values.next().ok_or("missing ip range")?;
        let count_str = values.next().ok_or("missing ip count")?;
        let date_str = values.next().ok_or("missing date")?;
        let registry_str = values.next().ok_or("missing registry")?;
        let status_str = values.next().ok_or("missing status")?;

        let ip_count = u64::from_str(count_str)
            .map_err(|e| format!("bad ip count '{}': {}", count_str, e))?;
        if ip_count > IPV4_SPACE {
            return Err(format!("ip count exceeds the IPv4 space: {}", ip_count))
        }
        let date = Self::parse_date(date_str)?;
        let registry = Registry::from_str(registry_str)
            .map_err(|e: registry::Error| e.to_string())?;

        Ok(AllocationRecord {
            ip_range: ip_range_str.to_string(),
            ip_count,
            date,
            registry,
            status: status_str.to_string()
        })
    }
}


//------------ AllocationRecords --------------------------------------------

/// All records assigned to an RIR, sorted by date. Records with an equal
/// date keep the order of the file.
#[derive(Clone, Debug)]
pub struct AllocationRecords {
    records: Vec<AllocationRecord>
}

impl AllocationRecords {
    pub fn from_file(path: &PathBuf) -> Result<Self, Error> {
        let file = File::open(path).map_err(|_| Error::read_error(path))?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut records = vec![];
        let mut skipped = 0;

        for (idx, lres) in reader.lines().enumerate() {
            let line_nr = idx + 1;
            let line = match lres {
                Err(ref e) if e.kind() == io::ErrorKind::InvalidData => {
                    return Err(Error::malformed(line_nr, "not valid UTF-8"))
                },
                res => res?
            };

            if let Some(label) = AllocationRecord::registry_label(&line) {
                if Registry::is_unallocated(label) {
                    skipped += 1;
                    continue
                }
            }

            let record = AllocationRecord::from_str(&line)
                .map_err(|e| Error::malformed(line_nr, e))?;
            records.push(record);
        }

        debug!(
            "read {} allocation records, skipped {} unallocated",
            records.len(),
            skipped
        );

        records.sort_by_key(AllocationRecord::date);

        Ok(AllocationRecords { records })
    }

    pub fn all(&self) -> &[AllocationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}


//------------ Error --------------------------------------------------------

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "Cannot read file: {}", _0)]
    CannotRead(String),

    #[display(fmt = "{}", _0)]
    IoError(io::Error),

    #[display(fmt = "Malformed record at line {}: {}", _0, _1)]
    MalformedRecord(usize, String),
}

impl Error {
    fn read_error(path: &PathBuf) -> Self {
        Error::CannotRead(path.to_string_lossy().to_string())
    }
    fn malformed(line: usize, e: impl Display) -> Self {
        Error::MalformedRecord(line, format!("{}", e))
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self { Error::IoError(e) }
}

impl ::std::error::Error for Error {}


//------------ Tests --------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(s: &str) -> Result<AllocationRecords, Error> {
        AllocationRecords::from_reader(s.as_bytes())
    }

    #[test]
    fn should_parse_record() {
        let rec = AllocationRecord::from_str(
            "41.0.0.0/8  16777216\t20050401 afrinic rir"
        ).unwrap();

        assert_eq!("41.0.0.0/8", rec.ip_range());
        assert_eq!(16777216, rec.ip_count());
        assert_eq!(date(2005, 4, 1), rec.date());
        assert_eq!(Registry::Afrinic, rec.registry());
        assert_eq!("rir", rec.status());
        assert!(rec.is_pool());
    }

    #[test]
    fn should_repair_seven_digit_date() {
        assert_eq!(
            AllocationRecord::parse_date("20200101").unwrap(),
            AllocationRecord::parse_date("2020101").unwrap()
        );
        assert_eq!(date(2020, 1, 1), AllocationRecord::parse_date("2020101").unwrap());
    }

    #[test]
    fn should_reject_bad_dates() {
        assert!(AllocationRecord::parse_date("202001").is_err());
        assert!(AllocationRecord::parse_date("202001011").is_err());
        assert!(AllocationRecord::parse_date("2020O101").is_err());
        assert!(AllocationRecord::parse_date("20201301").is_err());
        assert!(AllocationRecord::parse_date("20200230").is_err());
    }

    #[test]
    fn should_reject_four_fields() {
        match parse("r1 1000 20200101 arin rir\nr2 400 20200101 arin\n") {
            Err(Error::MalformedRecord(2, _)) => {},
            other => panic!("expected malformed line 2, got: {:?}", other)
        }
    }

    #[test]
    fn should_reject_blank_line() {
        match parse("r1 1000 20200101 arin rir\n\nr2 400 20200101 arin alloc\n") {
            Err(Error::MalformedRecord(2, _)) => {},
            other => panic!("expected malformed line 2, got: {:?}", other)
        }
    }

    #[test]
    fn should_reject_bad_count_and_registry() {
        assert!(parse("r1 many 20200101 arin rir\n").is_err());
        assert!(parse("r1 -5 20200101 arin rir\n").is_err());
        assert!(parse("r1 100 20200101 ripe rir\n").is_err());
    }

    #[test]
    fn should_bound_ip_count() {
        let rec = AllocationRecord::from_str("0.0.0.0/0 4294967296 20200101 arin rir").unwrap();
        assert_eq!(IPV4_SPACE, rec.ip_count());

        assert!(AllocationRecord::from_str("r 4294967297 20200101 arin rir").is_err());
        match parse("r1 1000 20200101 arin rir
r2 18446744073709551615 20200101 arin rir
") {
            Err(Error::MalformedRecord(2, _)) => {},
            other => panic!("expected malformed line 2, got: {:?}", other)
        }
        assert!(parse("r1 9223372036854775807 20200101 arin rir
").is_err());
    }

    #[test]
    fn should_name_line_with_invalid_utf8() {
        let input: &[u8] = b"r1 1000 20200101 arin rir
r2 \xFF\xFE 20200101 arin rir
";
        match AllocationRecords::from_reader(input) {
            Err(Error::MalformedRecord(2, _)) => {},
            other => panic!("expected malformed line 2, got: {:?}", other)
        }
    }

    #[test]
    fn should_skip_unallocated() {
        let records = parse(
            "r0 16777216 19830101 iana ianapool\n\
             r1 1000 20200101 arin rir\n\
             r2 16777216 bogus var reserved\n"
        ).unwrap();

        assert_eq!(1, records.len());
        assert_eq!(Registry::Arin, records.all()[0].registry());
    }

    #[test]
    fn should_sort_stable_by_date() {
        let records = parse(
            "b 1 20200201 apnic rir\n\
             a1 1 20200101 arin rir\n\
             c 1 2020201 lacnic rir\n\
             a2 1 20200101 arin alloc\n"
        ).unwrap();

        let ranges: Vec<&str> = records.all().iter().map(|r| r.ip_range()).collect();
        assert_eq!(vec!["a1", "a2", "b", "c"], ranges);
    }

    #[test]
    fn should_read_from_file() {
        let path = PathBuf::from("test/prefixes.txt");
        let records = AllocationRecords::from_file(&path).unwrap();
        assert!(!records.is_empty());

        let dates: Vec<NaiveDate> = records.all().iter().map(|r| r.date()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(sorted, dates);
    }

    #[test]
    fn should_fail_on_missing_file() {
        let path = PathBuf::from("test/does-not-exist.txt");
        match AllocationRecords::from_file(&path) {
            Err(Error::CannotRead(_)) => {},
            other => panic!("expected read error, got: {:?}", other)
        }
    }
}
