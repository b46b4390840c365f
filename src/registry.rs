//! Regional internet registries
use std::fmt;
use std::str::FromStr;
use serde::Serialize;
use serde::Serializer;


/// Registry labels that mean the space is not (yet) with any RIR.
const UNALLOCATED: [&str; 2] = ["iana", "var"];


//------------ Registry -----------------------------------------------------

/// One of the five RIRs. Ordering follows the label, which is also the
/// column order used in reports.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Registry {
    Afrinic,
    Apnic,
    Arin,
    Lacnic,
    RipeNcc
}

impl Registry {
    pub fn all() -> [Registry; 5] {
        [
            Registry::Afrinic,
            Registry::Apnic,
            Registry::Arin,
            Registry::Lacnic,
            Registry::RipeNcc
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Registry::Afrinic => "afrinic",
            Registry::Apnic   => "apnic",
            Registry::Arin    => "arin",
            Registry::Lacnic  => "lacnic",
            Registry::RipeNcc => "ripencc",
        }
    }

    /// True for labels of space that sits with IANA, or is otherwise not
    /// handed to an RIR. Such records do not take part in any count.
    pub fn is_unallocated(label: &str) -> bool {
        UNALLOCATED.contains(&label)
    }
}

impl FromStr for Registry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "afrinic" => Ok(Registry::Afrinic),
            "apnic"   => Ok(Registry::Apnic),
            "arin"    => Ok(Registry::Arin),
            "lacnic"  => Ok(Registry::Lacnic),
            "ripencc" => Ok(Registry::RipeNcc),
            r => Err(Error::UnknownRegistry(r.to_string()))
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Registry {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}


//------------ Error --------------------------------------------------------

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "unknown registry: {}", _0)]
    UnknownRegistry(String),
}

impl ::std::error::Error for Error {}


//------------ Tests --------------------------------------------------------
