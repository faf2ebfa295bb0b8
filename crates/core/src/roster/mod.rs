//! Yearly address rosters.
//!
//! A roster answers "is this building on the list for that year?". Heating
//! rows use two of them: buildings with an area-level meter, and buildings
//! whose heating was billed by average consumption.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use tracing::warn;

/// Membership test over per-year address lists.
pub trait AddressRoster {
    /// True when `address` matches an entry of the roster for `year`.
    fn contains(&self, year: i32, address: &str) -> bool;
}

impl<T: AddressRoster + ?Sized> AddressRoster for &T {
    fn contains(&self, year: i32, address: &str) -> bool {
        (**self).contains(year, address)
    }
}

/// Address lists keyed by year.
///
/// Entries are short building addresses (`ул ленина 5`); a full account
/// address matches when, lowercased, it contains an entry followed by a comma
/// or a space. A year with no list matches nothing.
#[derive(Debug, Default)]
pub struct YearlyAddressRoster {
    name: String,
    years: HashMap<i32, Vec<String>>,
    warned: RefCell<HashSet<i32>>,
}

impl YearlyAddressRoster {
    /// Creates an empty roster; `name` only appears in log records.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Replaces the list for `year`.
    #[must_use]
    pub fn with_year<I, S>(mut self, year: i32, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert_year(year, entries);
        self
    }

    /// Replaces the list for `year`.
    pub fn insert_year<I, S>(&mut self, year: i32, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        if entries.is_empty() {
            warn!(roster = %self.name, year, "Roster list is empty");
        }
        self.years.insert(year, entries);
    }

    /// Number of years with a list.
    #[must_use]
    pub fn years_count(&self) -> usize {
        self.years.len()
    }

    /// Total number of entries across all years.
    #[must_use]
    pub fn entries_count(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }
}

impl AddressRoster for YearlyAddressRoster {
    fn contains(&self, year: i32, address: &str) -> bool {
        let Some(entries) = self.years.get(&year) else {
            if self.warned.borrow_mut().insert(year) {
                warn!(roster = %self.name, year, "No roster list for year, treating as empty");
            }
            return false;
        };

        let address = address.to_lowercase();
        entries
            .iter()
            .any(|entry| {
                address.contains(&format!("{entry},")) || address.contains(&format!("{entry} "))
            })
    }
}
