extern crate chrono;
extern crate clap;
extern crate csv;
#[macro_use] extern crate derive_more;
#[macro_use] extern crate log;
#[macro_use] extern crate serde_derive;
extern crate serde;
extern crate serde_json;

pub mod records;
pub mod registry;
pub mod remaining;
pub mod report;
