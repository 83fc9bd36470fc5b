//! Active connection bookkeeping.
//!
//! The server owns one `ConnectionManager` and mutates it only from the
//! event dispatch path, so the table always mirrors what the controller
//! has reported.

use heapless::index_map::FnvIndexMap;

use crate::error::StateError;
use crate::gap::Address;

/// Maximum simultaneous connections tracked by the server.
pub const MAX_CONNECTIONS: usize = 4;

/// One active link, keyed by its controller handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionInfo {
    pub handle: u16,
    pub peer: Address,
}

/// The set of active connections.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: FnvIndexMap<u16, ConnectionInfo, MAX_CONNECTIONS>,
}

impl ConnectionManager {
    pub const fn new() -> Self {
        Self {
            connections: FnvIndexMap::new(),
        }
    }

    /// Records a new link. An existing entry under the same handle is
    /// replaced.
    pub fn add(&mut self, handle: u16, peer: Address) -> Result<ConnectionInfo, StateError> {
        let info = ConnectionInfo { handle, peer };
        if self.connections.insert(handle, info).is_err() {
            error!("connection table full, dropping handle {}", handle);
            return Err(StateError::ConnectionTableFull);
        }
        debug!("connection {} added", handle);
        Ok(info)
    }

    pub fn remove(&mut self, handle: u16) -> Option<ConnectionInfo> {
        let removed = self.connections.remove(&handle);
        if removed.is_some() {
            debug!("connection {} removed", handle);
        }
        removed
    }

    /// Drops every tracked link.
    pub fn clear(&mut self) {
        if !self.connections.is_empty() {
            debug!("clearing {} connections", self.connections.len());
        }
        self.connections.clear();
    }

    pub fn get(&self, handle: u16) -> Option<&ConnectionInfo> {
        self.connections.get(&handle)
    }

    pub fn contains(&self, handle: u16) -> bool {
        self.connections.contains_key(&handle)
    }

    pub fn count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionInfo> {
        self.connections.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEER: Address = Address([1, 2, 3, 4, 5, 6]);

    #[test]
    fn add_and_lookup() {
        let mut manager = ConnectionManager::new();
        assert!(manager.is_empty());
        manager.add(3, PEER).unwrap();
        assert!(manager.contains(3));
        assert_eq!(manager.count(), 1);
        assert_eq!(manager.get(3).unwrap().peer, PEER);
        assert!(manager.get(4).is_none());
    }

    #[test]
    fn remove_returns_the_entry() {
        let mut manager = ConnectionManager::new();
        manager.add(7, PEER).unwrap();
        let removed = manager.remove(7).unwrap();
        assert_eq!(removed.handle, 7);
        assert!(manager.is_empty());
        assert!(manager.remove(7).is_none());
    }

    #[test]
    fn table_capacity_is_enforced() {
        let mut manager = ConnectionManager::new();
        for handle in 0..MAX_CONNECTIONS as u16 {
            manager.add(handle, PEER).unwrap();
        }
        assert_eq!(
            manager.add(MAX_CONNECTIONS as u16, PEER),
            Err(StateError::ConnectionTableFull)
        );
        assert_eq!(manager.count(), MAX_CONNECTIONS);
    }

    #[test]
    fn clear_drops_every_entry() {
        let mut manager = ConnectionManager::new();
        manager.add(1, PEER).unwrap();
        manager.add(2, PEER).unwrap();
        manager.clear();
        assert!(manager.is_empty());
        assert!(!manager.contains(1));
        assert_eq!(manager.iter().count(), 0);
    }

    #[test]
    fn re_adding_a_handle_replaces_the_entry() {
        let mut manager = ConnectionManager::new();
        manager.add(1, PEER).unwrap();
        let other = Address([9, 9, 9, 9, 9, 9]);
        manager.add(1, other).unwrap();
        assert_eq!(manager.count(), 1);
        assert_eq!(manager.get(1).unwrap().peer, other);
    }
}
