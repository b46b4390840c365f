//! Remaining free address space per registry over time
use std::collections::BTreeMap;
use chrono::NaiveDate;
use crate::records::AllocationRecord;
use crate::registry::Registry;


//------------ RemainingCounts ----------------------------------------------

/// Free address count per registry. Signed, a registry may hand out more
/// than the pool records account for.
pub type RemainingCounts = BTreeMap<Registry, i64>;


//------------ Snapshot -----------------------------------------------------

/// The remaining counts of all registries at the end of a date.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    date: NaiveDate,
    remaining: RemainingCounts
}

impl Snapshot {
    pub fn new(date: NaiveDate, remaining: RemainingCounts) -> Self {
        Snapshot { date, remaining }
    }

    pub fn date(&self) -> NaiveDate { self.date }
    pub fn remaining(&self) -> &RemainingCounts { &self.remaining }

    /// Remaining count for a registry, zero when the registry has no
    /// records at all.
    pub fn remaining_for(&self, registry: Registry) -> i64 {
        self.remaining.get(&registry).cloned().unwrap_or(0)
    }
}


//------------ Depletion ----------------------------------------------------

/// Walks date sorted allocation records, starting from the allocation pool
/// of every registry and taking off everything that is not itself a pool
/// record.
#[derive(Clone, Debug)]
pub struct Depletion<'a> {
    records: &'a [AllocationRecord],
    initial_totals: RemainingCounts
}

impl<'a> Depletion<'a> {
    /// Expects the records sorted by date, as loaded by
    /// [`AllocationRecords`](crate::records::AllocationRecords).
    pub fn new(records: &'a [AllocationRecord]) -> Result<Self, Error> {
        if records.is_empty() {
            return Err(Error::EmptyInput)
        }

        // counts are bounded by the IPv4 space at parse time, so they fit
        let mut initial_totals = RemainingCounts::new();
        for rec in records {
            let total = initial_totals.entry(rec.registry()).or_insert(0);
            if rec.is_pool() {
                *total += rec.ip_count() as i64;
            }
        }

        Ok(Depletion { records, initial_totals })
    }

    /// The pool of each registry, that is the sum of its pool records.
    /// Registries without any pool record start at zero.
    pub fn initial_totals(&self) -> &RemainingCounts {
        &self.initial_totals
    }

    /// The registries present in every snapshot.
    pub fn registries(&self) -> Vec<Registry> {
        self.initial_totals.keys().cloned().collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.records[0].date()
    }

    pub fn last_date(&self) -> NaiveDate {
        self.records[self.records.len() - 1].date()
    }

    /// Sum of all records per registry that are taken from the pool.
    pub fn consumed(&self) -> RemainingCounts {
        let mut res: RemainingCounts = self.initial_totals.keys()
            .map(|reg| (*reg, 0))
            .collect();

        for rec in self.records.iter().filter(|rec| !rec.is_pool()) {
            *res.entry(rec.registry()).or_insert(0) += rec.ip_count() as i64;
        }
        res
    }

    /// Starts a new pass over the records, one snapshot per distinct date.
    pub fn snapshots(&self) -> Snapshots<'a> {
        Snapshots {
            records: self.records,
            pos: 0,
            remaining: self.initial_totals.clone()
        }
    }
}


//------------ Snapshots ----------------------------------------------------

/// Yields a snapshot for each run of records sharing a date.
#[derive(Clone, Debug)]
pub struct Snapshots<'a> {
    records: &'a [AllocationRecord],
    pos: usize,
    remaining: RemainingCounts
}

impl<'a> Iterator for Snapshots<'a> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        let date = self.records.get(self.pos)?.date();

        while let Some(rec) = self.records.get(self.pos) {
            if rec.date() != date {
                break
            }
            if !rec.is_pool() {
                *self.remaining.entry(rec.registry()).or_insert(0) -= rec.ip_count() as i64;
            }
            self.pos += 1;
        }

        Some(Snapshot::new(date, self.remaining.clone()))
    }
}


//------------ Error --------------------------------------------------------

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "No allocation records to aggregate")]
    EmptyInput,
}

impl ::std::error::Error for Error {}


//------------ Tests --------------------------------------------------------
