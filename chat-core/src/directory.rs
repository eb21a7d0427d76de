//! Local cache of rooms known to the service.

use std::collections::HashMap;

use parley_chat_types::{Room, RoomId};

/// Local cache mapping room identity to room metadata.
///
/// Entries keep the order they were first seen in so listings are stable.
/// Name lookup is a linear scan and the first exact match wins: names are
/// human-entered and the service does not guarantee uniqueness.
#[derive(Debug, Clone, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomId, Room>,
    order: Vec<RoomId>,
}

impl RoomDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a room.
    ///
    /// A new id is appended to the listing order; a known id has its
    /// metadata updated in place.
    pub fn insert(&mut self, room: Room) {
        let id = room.id;
        if self.rooms.insert(id, room).is_none() {
            self.order.push(id);
        }
    }

    /// Merge a freshly fetched room list into the cache.
    pub fn merge(&mut self, rooms: impl IntoIterator<Item = Room>) {
        for room in rooms {
            self.insert(room);
        }
    }

    /// Room metadata by id.
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// The first room with this exact name, in listing order.
    pub fn find_by_name(&self, name: &str) -> Option<&Room> {
        self.iter().find(|room| room.name == name)
    }

    /// Rooms in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.order.iter().filter_map(|id| self.rooms.get(id))
    }

    /// Number of cached rooms.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: u32, name: &str) -> Room {
        Room {
            id: RoomId::new(id),
            name: name.to_string(),
        }
    }

    #[test]
    fn insert_and_get() {
        let mut directory = RoomDirectory::new();
        directory.insert(room(1, "main"));

        assert_eq!(directory.get(RoomId::new(1)), Some(&room(1, "main")));
        assert_eq!(directory.get(RoomId::new(2)), None);
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn find_by_name_returns_first_match() {
        let mut directory = RoomDirectory::new();
        directory.insert(room(3, "general"));
        directory.insert(room(7, "main"));
        directory.insert(room(9, "main"));

        let found = directory.find_by_name("main").unwrap();
        assert_eq!(found.id, RoomId::new(7));
    }

    #[test]
    fn find_by_name_is_exact() {
        let mut directory = RoomDirectory::new();
        directory.insert(room(1, "main"));

        assert!(directory.find_by_name("Main").is_none());
        assert!(directory.find_by_name("mai").is_none());
    }

    #[test]
    fn merge_updates_in_place_and_appends() {
        let mut directory = RoomDirectory::new();
        directory.insert(room(1, "main"));
        directory.insert(room(2, "random"));

        directory.merge(vec![room(1, "main-renamed"), room(3, "dev")]);

        let names: Vec<&str> = directory.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["main-renamed", "random", "dev"]);
        assert_eq!(directory.len(), 3);
    }

    #[test]
    fn iteration_keeps_first_seen_order() {
        let mut directory = RoomDirectory::new();
        for id in [5u32, 2, 9] {
            directory.insert(room(id, &format!("room-{id}")));
        }

        let ids: Vec<u32> = directory.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn empty_directory() {
        let directory = RoomDirectory::new();
        assert!(directory.is_empty());
        assert!(directory.find_by_name("main").is_none());
    }
}
