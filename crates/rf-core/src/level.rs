//! The level tree: committed rooms and their connection graph.
//!
//! Rooms live in an arena; a `RoomId` is the arena index and an
//! `EntranceRef` is (room id, socket index). These indices are the stable
//! identities the engine keys its visited set on, so the structure is plain
//! serializable data with no reliance on object identity.

use serde::{Deserialize, Serialize};

use crate::catalog::TemplateId;
use crate::geom::{Obb, Turn, Vec3};
use crate::instance::{SceneHandle, WorldSocket};

/// Arena index of a committed room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// One entrance socket on one committed room: the visitation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntranceRef {
    pub room: RoomId,
    pub socket: u32,
}

impl EntranceRef {
    pub fn new(room: RoomId, socket: u32) -> Self {
        Self { room, socket }
    }
}

/// A parent socket and the child socket attached through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub parent: EntranceRef,
    pub child: EntranceRef,
}

/// Recoverable conditions surfaced to the caller alongside the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationWarning {
    /// The repeat window excluded every template at this entrance; the
    /// engine fell back to the unrestricted catalog minus the source.
    RepeatWindowExhausted { at: EntranceRef },
}

/// A committed room instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub id: RoomId,
    pub template: TemplateId,
    pub turn: Turn,
    pub position: Vec3,
    /// World-space bounding volume
    pub bounds: Obb,
    /// World-space entrance sockets, in template socket order
    pub entrances: Vec<WorldSocket>,
    /// External representation owned by the instance factory collaborator
    pub scene: SceneHandle,
    /// The parent entrance this room was attached to; None for the root
    pub parent: Option<EntranceRef>,
    /// Index of this room's own socket used for the attachment; None for
    /// the root
    pub entry_socket: Option<u32>,
}

/// The output of a generation run.
///
/// Grows monotonically while the engine runs and is plain data afterwards.
/// Invariant: no two committed bounds penetrate deeper than the configured
/// tolerance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelTree {
    rooms: Vec<PlacedRoom>,
    connections: Vec<Connection>,
    warnings: Vec<GenerationWarning>,
}

impl LevelTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a room, assigning its arena id.
    ///
    /// `build` receives the id so the stored room can carry it.
    pub fn commit(&mut self, build: impl FnOnce(RoomId) -> PlacedRoom) -> RoomId {
        let id = RoomId(self.rooms.len() as u32);
        let room = build(id);
        debug_assert_eq!(room.id, id);
        if let (Some(parent), Some(socket)) = (room.parent, room.entry_socket) {
            self.connections.push(Connection {
                parent,
                child: EntranceRef::new(id, socket),
            });
        }
        self.rooms.push(room);
        id
    }

    pub fn push_warning(&mut self, warning: GenerationWarning) {
        self.warnings.push(warning);
    }

    pub fn rooms(&self) -> &[PlacedRoom] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&PlacedRoom> {
        self.rooms.get(id.0 as usize)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn warnings(&self) -> &[GenerationWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Committed children attached through the given room's sockets
    pub fn children_of(&self, id: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        self.connections
            .iter()
            .filter(move |c| c.parent.room == id)
            .map(|c| c.child.room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: RoomId, parent: Option<EntranceRef>) -> PlacedRoom {
        PlacedRoom {
            id,
            template: TemplateId(0),
            turn: Turn::R0,
            position: Vec3::ZERO,
            bounds: Obb::axis_aligned(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)),
            entrances: vec![],
            scene: SceneHandle(id.0 as u64),
            parent,
            entry_socket: parent.map(|_| 0),
        }
    }

    #[test]
    fn test_commit_assigns_sequential_ids() {
        let mut tree = LevelTree::new();
        let a = tree.commit(|id| placed(id, None));
        let b = tree.commit(|id| placed(id, Some(EntranceRef::new(a, 0))));
        assert_eq!(a, RoomId(0));
        assert_eq!(b, RoomId(1));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_connections_recorded_for_children() {
        let mut tree = LevelTree::new();
        let root = tree.commit(|id| placed(id, None));
        let child = tree.commit(|id| placed(id, Some(EntranceRef::new(root, 0))));
        assert_eq!(tree.connections().len(), 1);
        assert_eq!(tree.connections()[0].parent, EntranceRef::new(root, 0));
        assert_eq!(tree.connections()[0].child.room, child);
        let children: Vec<RoomId> = tree.children_of(root).collect();
        assert_eq!(children, vec![child]);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut tree = LevelTree::new();
        let root = tree.commit(|id| placed(id, None));
        tree.commit(|id| placed(id, Some(EntranceRef::new(root, 0))));
        tree.push_warning(GenerationWarning::RepeatWindowExhausted {
            at: EntranceRef::new(root, 0),
        });

        let json = serde_json::to_string(&tree).unwrap();
        let restored: LevelTree = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, tree);
    }
}
