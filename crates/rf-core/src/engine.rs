//! The placement engine.
//!
//! Grows a level tree by depth-first recursion: for every open entrance,
//! enumerate template x turn x socket candidates, drop the ones that
//! penetrate committed rooms, commit one survivor at random, release the
//! rest, and recurse into the committed room's own entrances while the
//! depth budget lasts.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use rf_rng::GenRng;

use crate::candidate::{assemble, build_candidate, Candidate};
use crate::catalog::{RoomCatalog, TemplateId};
use crate::error::GenerateError;
use crate::geom::{OverlapOracle, Turn, Vec3};
use crate::instance::{InstanceFactory, Pose};
use crate::level::{EntranceRef, GenerationWarning, LevelTree, PlacedRoom, RoomId};

/// Default maximum penetration allowed between committed rooms.
///
/// Barely-touching neighbors measure at or near zero; anything deeper than
/// this is a real intersection and the candidate is rejected.
pub const DEFAULT_OVERLAP_TOLERANCE: f32 = 0.05;

/// Knobs for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// How many attachment levels to recurse past the root. Runs get slow
    /// above 10 with branchy catalogs.
    pub depth: u32,
    /// Try every candidate at all four quarter turns instead of only the
    /// unrotated step.
    pub rotate_rooms: bool,
    /// Don't reuse a template along a branch until this many other
    /// placements have passed. 0 disables repeat avoidance entirely.
    pub max_repeat: u32,
    /// Template committed at the origin; None draws one at random.
    pub root_template: Option<TemplateId>,
    /// Maximum allowed penetration between committed rooms.
    pub overlap_tolerance: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            rotate_rooms: true,
            max_repeat: 0,
            root_template: None,
            overlap_tolerance: DEFAULT_OVERLAP_TOLERANCE,
        }
    }
}

/// Generate a level tree from the catalog.
///
/// Deterministic for a fixed catalog, config, and RNG seed. Dead ends are
/// normal outcomes; only collaborator failures and an unknown root template
/// id are errors, and a tree from a failed run should be discarded.
pub fn generate<O: OverlapOracle, F: InstanceFactory>(
    catalog: &RoomCatalog,
    config: &GenerationConfig,
    oracle: &O,
    factory: &mut F,
    rng: &mut GenRng,
) -> Result<LevelTree, GenerateError> {
    let root_template = match config.root_template {
        Some(id) => {
            if catalog.template(id).is_none() {
                return Err(GenerateError::UnknownTemplate(id.0));
            }
            id
        }
        None => TemplateId(rng.index(catalog.len()) as u32),
    };

    let mut generator = Generator {
        catalog,
        config,
        oracle,
        factory,
        rng,
        tree: LevelTree::new(),
        visited: HashSet::new(),
    };
    generator.run(root_template)?;
    Ok(generator.tree)
}

/// State of one in-progress generation run.
struct Generator<'a, O: OverlapOracle, F: InstanceFactory> {
    catalog: &'a RoomCatalog,
    config: &'a GenerationConfig,
    oracle: &'a O,
    factory: &'a mut F,
    rng: &'a mut GenRng,
    tree: LevelTree,
    visited: HashSet<EntranceRef>,
}

impl<O: OverlapOracle, F: InstanceFactory> Generator<'_, O, F> {
    fn run(&mut self, root_template: TemplateId) -> Result<(), GenerateError> {
        let template = self
            .catalog
            .template(root_template)
            .ok_or(GenerateError::UnknownTemplate(root_template.0))?;

        let root = assemble(
            root_template,
            template,
            Pose::new(Vec3::ZERO, Turn::R0),
            self.factory,
        )?;
        let sockets = root.entrances.clone();
        let root_id = self.commit(root, None);

        if self.config.depth == 0 {
            return Ok(());
        }

        let mut history = Vec::new();
        push_window(&mut history, root_template, self.config.max_repeat);

        for (index, socket) in sockets.iter().enumerate() {
            self.place_at(
                EntranceRef::new(root_id, index as u32),
                socket.position,
                root_template,
                self.config.depth - 1,
                history.clone(),
            )?;
        }
        Ok(())
    }

    /// Attach one room at `target` and recurse into it.
    ///
    /// Terminates: every call either hits the visited set or strictly
    /// decreases `remaining` before recursing, and socket counts are finite.
    fn place_at(
        &mut self,
        target: EntranceRef,
        target_position: Vec3,
        source: TemplateId,
        remaining: u32,
        history: Vec<TemplateId>,
    ) -> Result<(), GenerateError> {
        // A socket reached through more than one recursive path is
        // processed only the first time.
        if !self.visited.insert(target) {
            return Ok(());
        }

        let candidate_templates = self.candidate_templates(target, source, &history);
        let mut survivors = self.evaluate(&candidate_templates, target_position)?;

        if survivors.is_empty() {
            log::debug!("dead end at {target:?}");
            return Ok(());
        }

        let winner = survivors.swap_remove(self.rng.index(survivors.len()));
        self.release_all(survivors);

        let template = winner.template;
        let sockets = winner.entrances.clone();
        let room_id = self.commit(winner, Some(target));
        log::debug!(
            "committed {} as {:?} at {:?}",
            self.catalog.template(template).map(|t| t.name.as_str()).unwrap_or("?"),
            room_id,
            target_position,
        );

        if remaining == 0 {
            return Ok(());
        }

        let mut history = history;
        push_window(&mut history, template, self.config.max_repeat);

        for (index, socket) in sockets.iter().enumerate() {
            self.place_at(
                EntranceRef::new(room_id, index as u32),
                socket.position,
                template,
                remaining - 1,
                history.clone(),
            )?;
        }
        Ok(())
    }

    /// Template ids eligible at this entrance.
    ///
    /// With repeat avoidance active, the history window is excluded; when
    /// that empties the set, fall back to the whole catalog minus the
    /// immediate source so generation never deadlocks, and surface the
    /// fallback as a warning.
    fn candidate_templates(
        &mut self,
        target: EntranceRef,
        source: TemplateId,
        history: &[TemplateId],
    ) -> Vec<TemplateId> {
        if self.config.max_repeat == 0 {
            return self.catalog.ids().collect();
        }

        let filtered: Vec<TemplateId> = self
            .catalog
            .ids()
            .filter(|id| !history.contains(id))
            .collect();
        if !filtered.is_empty() {
            return filtered;
        }

        log::warn!("repeat window exhausted at {target:?}, falling back to full catalog");
        self.tree
            .push_warning(GenerationWarning::RepeatWindowExhausted { at: target });
        self.catalog.ids().filter(|id| *id != source).collect()
    }

    /// Build and validate every template x turn x socket candidate.
    ///
    /// Rejected candidates are released immediately; on a collaborator
    /// failure every live candidate is released before the error leaves
    /// this frame.
    fn evaluate(
        &mut self,
        templates: &[TemplateId],
        target_position: Vec3,
    ) -> Result<Vec<Candidate>, GenerateError> {
        let turn_count = if self.config.rotate_rooms { 4 } else { 1 };
        let mut survivors: Vec<Candidate> = Vec::new();

        for &template_id in templates {
            let Some(template) = self.catalog.template(template_id) else {
                continue;
            };
            for turn in Turn::iter().take(turn_count) {
                for socket_index in 0..template.entrances.len() {
                    let candidate = match build_candidate(
                        template_id,
                        template,
                        turn,
                        socket_index,
                        target_position,
                        self.factory,
                    ) {
                        Ok(candidate) => candidate,
                        Err(err) => {
                            self.release_all(survivors);
                            return Err(err);
                        }
                    };

                    match self.deepest_penetration(&candidate) {
                        Ok(depth) if depth > self.config.overlap_tolerance => {
                            self.factory.release(candidate.scene);
                        }
                        Ok(_) => survivors.push(candidate),
                        Err(err) => {
                            self.factory.release(candidate.scene);
                            self.release_all(survivors);
                            return Err(err.into());
                        }
                    }
                }
            }
        }
        Ok(survivors)
    }

    /// Worst penetration of the candidate against every committed room.
    fn deepest_penetration(&self, candidate: &Candidate) -> Result<f32, crate::error::OverlapError> {
        let mut deepest = 0.0f32;
        for room in self.tree.rooms() {
            let depth = self.oracle.penetration(&candidate.bounds, &room.bounds)?;
            deepest = deepest.max(depth);
            if deepest > self.config.overlap_tolerance {
                break;
            }
        }
        Ok(deepest)
    }

    fn commit(&mut self, candidate: Candidate, parent: Option<EntranceRef>) -> RoomId {
        let entry_socket = candidate.entry;
        self.tree.commit(|id| PlacedRoom {
            id,
            template: candidate.template,
            turn: candidate.pose.turn,
            position: candidate.pose.position,
            bounds: candidate.bounds,
            entrances: candidate.entrances,
            scene: candidate.scene,
            parent,
            entry_socket,
        })
    }

    fn release_all(&mut self, candidates: Vec<Candidate>) {
        for candidate in candidates {
            self.factory.release(candidate.scene);
        }
    }
}

/// Append to a branch history window, keeping only the `max_repeat` most
/// recent template ids.
fn push_window(history: &mut Vec<TemplateId>, id: TemplateId, max_repeat: u32) {
    if max_repeat == 0 {
        return;
    }
    history.push(id);
    while history.len() > max_repeat as usize {
        history.remove(0);
    }
}
