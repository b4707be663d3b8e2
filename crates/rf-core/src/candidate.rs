//! Candidate construction: rotation, rigid alignment, materialization.
//!
//! A candidate is a transient room instance aligned to a target entrance.
//! Building one performs no validation and has no effect beyond a single
//! factory materialization; the placement engine decides its fate.

use crate::catalog::{RoomTemplate, TemplateId};
use crate::error::GenerateError;
use crate::geom::{Obb, Turn, Vec3};
use crate::instance::{InstanceFactory, Pose, SceneHandle, WorldSocket};

/// A transient, unvalidated room instance.
///
/// Owned by the placement step that built it until it is either committed
/// into the level tree or released back to the factory. Not `Clone`: a
/// candidate owns a live scene handle.
#[derive(Debug)]
pub struct Candidate {
    pub template: TemplateId,
    pub pose: Pose,
    /// World-space bounding volume
    pub bounds: Obb,
    /// World-space entrance sockets, in template socket order
    pub entrances: Vec<WorldSocket>,
    pub scene: SceneHandle,
    /// The socket index this candidate attaches through; None for a root
    pub entry: Option<u32>,
}

/// Materialize a template at a fixed pose (used for the root room).
pub fn assemble<F: InstanceFactory>(
    template_id: TemplateId,
    template: &RoomTemplate,
    pose: Pose,
    factory: &mut F,
) -> Result<Candidate, GenerateError> {
    let bounds = template.bounds.rotated(pose.turn).translated(pose.position);
    let entrances = template
        .entrances
        .iter()
        .map(|s| WorldSocket {
            position: pose.apply(s.offset),
            outward: pose.apply_dir(s.outward),
        })
        .collect();
    let scene = factory.materialize(template, pose)?;
    Ok(Candidate {
        template: template_id,
        pose,
        bounds,
        entrances,
        scene,
        entry: None,
    })
}

/// Build a candidate attached to the entrance at `target`.
///
/// The template frame is rotated by `turn` first. Alignment then solves
/// translation only: the room origin is pushed out from the target point by
/// the rotated socket offset, so the socket's face meets the target and the
/// body extends away from the room that owns it. Orientation is never
/// solved; sockets whose outward directions disagree beyond the discrete
/// quarter turns stay mismatched and the overlap check arbitrates.
pub fn build_candidate<F: InstanceFactory>(
    template_id: TemplateId,
    template: &RoomTemplate,
    turn: Turn,
    socket_index: usize,
    target: Vec3,
    factory: &mut F,
) -> Result<Candidate, GenerateError> {
    let socket = &template.entrances[socket_index];
    let position = target + turn.apply(socket.offset);
    let mut candidate = assemble(template_id, template, Pose::new(position, turn), factory)?;
    candidate.entry = Some(socket_index as u32);
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntranceSocket;
    use crate::instance::CountingFactory;

    fn corridor_template() -> RoomTemplate {
        RoomTemplate::new(
            "corridor",
            Obb::axis_aligned(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)),
            vec![EntranceSocket::new(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            )],
        )
    }

    #[test]
    fn test_alignment_extends_outward() {
        let template = corridor_template();
        let mut factory = CountingFactory::new();

        // Parent at the origin exposes its socket at (1, 0, 0).
        let candidate = build_candidate(
            TemplateId(0),
            &template,
            Turn::R0,
            0,
            Vec3::new(1.0, 0.0, 0.0),
            &mut factory,
        )
        .unwrap();

        assert_eq!(candidate.pose.position, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(candidate.bounds.center, Vec3::new(2.0, 0.0, 0.0));
        // The candidate's own socket sits on its far face.
        assert_eq!(candidate.entrances[0].position, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(candidate.entry, Some(0));
        assert_eq!(factory.materialized(), 1);
    }

    #[test]
    fn test_rotation_applied_before_alignment() {
        let template = corridor_template();
        let mut factory = CountingFactory::new();

        let candidate = build_candidate(
            TemplateId(0),
            &template,
            Turn::R90,
            0,
            Vec3::new(0.0, 0.0, 5.0),
            &mut factory,
        )
        .unwrap();

        // R90 carries the +X socket offset to (0, 0, -1).
        assert_eq!(candidate.pose.position, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(candidate.entrances[0].outward, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_assemble_root_pose() {
        let template = corridor_template();
        let mut factory = CountingFactory::new();

        let root = assemble(
            TemplateId(0),
            &template,
            Pose::new(Vec3::ZERO, Turn::R0),
            &mut factory,
        )
        .unwrap();

        assert_eq!(root.entry, None);
        assert_eq!(root.entrances[0].position, Vec3::new(1.0, 0.0, 0.0));
    }
}
