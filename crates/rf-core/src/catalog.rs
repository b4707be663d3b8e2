//! Room template catalog.
//!
//! Templates are the authored pieces a level is assembled from: a bounding
//! volume plus the entrance sockets other pieces can attach to. The catalog
//! is loaded once, validated once, and read-only for the duration of a
//! generation run.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::geom::{Obb, Vec3};

/// Stable identity of a room template: its position in the catalog's
/// ordered template list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "template#{}", self.0)
    }
}

/// An attachment point on a template, in template-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntranceSocket {
    /// Offset from the template origin to the entrance point
    pub offset: Vec3,
    /// Outward direction through the entrance, unit length, horizontal
    pub outward: Vec3,
}

impl EntranceSocket {
    pub fn new(offset: Vec3, outward: Vec3) -> Self {
        Self {
            offset,
            outward: outward.normalize(),
        }
    }
}

/// An immutable authored room piece: bounds plus entrance sockets.
///
/// The bounds are local to the template origin; placement rotates and
/// translates them. A template with no sockets is legal and acts as a
/// terminal cap: it can be placed but nothing grows from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    /// Human-readable name, for logs and debugging only
    pub name: String,
    /// Local-space bounding volume
    pub bounds: Obb,
    /// Ordered entrance sockets
    pub entrances: Vec<EntranceSocket>,
}

impl RoomTemplate {
    pub fn new(
        name: impl Into<String>,
        bounds: Obb,
        entrances: Vec<EntranceSocket>,
    ) -> Self {
        Self {
            name: name.into(),
            bounds,
            entrances,
        }
    }
}

/// Ordered, non-empty, read-only set of room templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCatalog {
    templates: Vec<RoomTemplate>,
}

impl RoomCatalog {
    /// Build a catalog from an ordered template list.
    ///
    /// Fails on an empty list: generation cannot start with zero templates.
    pub fn new(templates: Vec<RoomTemplate>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { templates })
    }

    /// All templates, in id order
    pub fn templates(&self) -> &[RoomTemplate] {
        &self.templates
    }

    /// Look up a template by id
    pub fn template(&self, id: TemplateId) -> Option<&RoomTemplate> {
        self.templates.get(id.0 as usize)
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All template ids, in order
    pub fn ids(&self) -> impl Iterator<Item = TemplateId> + '_ {
        (0..self.templates.len() as u32).map(TemplateId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_template(name: &str) -> RoomTemplate {
        RoomTemplate::new(
            name,
            Obb::axis_aligned(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)),
            vec![EntranceSocket::new(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            )],
        )
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(RoomCatalog::new(vec![]), Err(CatalogError::Empty));
    }

    #[test]
    fn test_ids_are_insertion_order() {
        let catalog =
            RoomCatalog::new(vec![cube_template("a"), cube_template("b")]).unwrap();
        let ids: Vec<TemplateId> = catalog.ids().collect();
        assert_eq!(ids, vec![TemplateId(0), TemplateId(1)]);
        assert_eq!(catalog.template(TemplateId(1)).unwrap().name, "b");
        assert!(catalog.template(TemplateId(2)).is_none());
    }

    #[test]
    fn test_socket_outward_normalized() {
        let socket = EntranceSocket::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(socket.outward, Vec3::new(0.0, 0.0, 1.0));
    }
}
