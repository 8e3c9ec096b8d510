use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Identifies something in the game world an emitter can follow.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct AnchorId(pub u64);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub enum SceneAction {
    /// Moves (or creates) an anchor
    SetAnchor { anchor: AnchorId, position: Vec3 },

    /// Anchor left the world
    RemoveAnchor { anchor: AnchorId },

    /// Moves the listener (usually the main camera)
    SetListener { position: Vec3 },
}

/// World positions the pools need to evaluate distances.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    anchors: HashMap<AnchorId, Vec3>,
    listener: Vec3,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_anchor(&mut self, anchor: AnchorId, position: Vec3) {
        self.anchors.insert(anchor, position);
    }

    pub fn remove_anchor(&mut self, anchor: AnchorId) {
        self.anchors.remove(&anchor);
    }

    pub fn anchor_position(&self, anchor: AnchorId) -> Option<Vec3> {
        self.anchors.get(&anchor).copied()
    }

    pub fn set_listener(&mut self, position: Vec3) {
        self.listener = position;
    }

    pub fn listener(&self) -> Vec3 {
        self.listener
    }

    pub fn apply(&mut self, action: SceneAction) {
        match action {
            SceneAction::SetAnchor { anchor, position } => self.set_anchor(anchor, position),
            SceneAction::RemoveAnchor { anchor } => self.remove_anchor(anchor),
            SceneAction::SetListener { position } => self.set_listener(position),
        }
    }
}
