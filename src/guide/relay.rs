//! Route-chat relay
//!
//! Every RouteChat call shares one history of notes keyed by location. A
//! single mutex covers the whole map so that reading a location's history and
//! appending to it is one atomic step; the global append order is what later
//! callers get replayed. The lock is never held across an `.await`.

use crate::common::{geo, Error, Result};
use crate::proto::{Point, RouteNote};
use std::collections::HashMap;
use std::sync::Mutex;

/// History key: (latitude, longitude).
type LocationKey = (i32, i32);

fn key(location: &Point) -> LocationKey {
    (location.latitude, location.longitude)
}

#[derive(Debug, Default)]
pub struct ChatRelay {
    history: Mutex<HashMap<LocationKey, Vec<RouteNote>>>,
}

impl ChatRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `note` and return the notes previously sent at its location,
    /// oldest first. The new note is not part of the returned snapshot.
    pub fn publish(&self, note: RouteNote) -> Result<Vec<RouteNote>> {
        let location = note
            .location
            .as_ref()
            .ok_or_else(|| Error::InvalidArgument("route note is missing its location".into()))?;
        geo::validate_point(location)?;
        let location = key(location);

        let mut history = self
            .history
            .lock()
            .map_err(|_| Error::Internal("route chat history lock poisoned".into()))?;
        let notes = history.entry(location).or_default();
        let previous = notes.clone();
        notes.push(note);
        Ok(previous)
    }
}

#[cfg(test)]
impl ChatRelay {
    /// Notes recorded at `location`, oldest first.
    fn history_at(&self, location: &Point) -> Result<Vec<RouteNote>> {
        let history = self
            .history
            .lock()
            .map_err(|_| Error::Internal("route chat history lock poisoned".into()))?;
        Ok(history.get(&key(location)).cloned().unwrap_or_default())
    }

    /// Number of distinct locations with at least one note.
    fn locations(&self) -> Result<usize> {
        let history = self
            .history
            .lock()
            .map_err(|_| Error::Internal("route chat history lock poisoned".into()))?;
        Ok(history.len())
    }
}
