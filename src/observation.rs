//! The observation tree: a value-typed, serializable record of every
//! detected action and the geometry that triggered it.
//!
//! Field names and nesting in the serialized form are a compatibility
//! contract with downstream players; note the capitalized `"Height"` roi key
//! and the singular `"tracked_position"` array field, both preserved
//! deliberately.

use crate::Result;
use serde::{Deserialize, Serialize};

/// Name of the single lazily-created object per session
pub const FACE_OBJECT_NAME: &str = "face";

/// Kind of a detected action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Directional head drag
    Drag,
    /// Eye push (blink)
    Push,
    /// Mouth spread (angry / happy)
    Spread,
}

/// Bounding rectangle of an action, in the session's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    #[serde(rename = "Height")]
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Head rotation attached to a feed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// A point of interest at a feed's timestamp
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackedPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TrackedPosition {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One contributing snapshot of a detected action, in chronological order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub timestamp: f64,
    pub rotation: Rotation,
    #[serde(rename = "tracked_position")]
    pub tracked_positions: Vec<TrackedPosition>,
}

impl Feed {
    #[must_use]
    pub fn new(timestamp: f64, pitch: f64, yaw: f64, roll: f64) -> Self {
        Self {
            timestamp,
            rotation: Rotation { pitch, yaw, roll },
            tracked_positions: Vec::new(),
        }
    }

    pub fn add_tracked_position(&mut self, position: TrackedPosition) {
        self.tracked_positions.push(position);
    }
}

/// A detected action with its region of interest and contributing feeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Human-readable description ("drag-left", "blink", ...); not part of
    /// the wire schema
    #[serde(skip)]
    pub label: String,
    pub roi: Rect,
    pub feeds: Vec<Feed>,
}

impl Action {
    #[must_use]
    pub fn new(kind: ActionKind, label: impl Into<String>, roi: Rect) -> Self {
        Self {
            kind,
            label: label.into(),
            roi,
            feeds: Vec::new(),
        }
    }

    pub fn add_feed(&mut self, feed: Feed) {
        self.feeds.push(feed);
    }
}

/// A tracked object; exactly one, named "face", exists per session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    pub actions: Vec<Action>,
}

impl Object {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }
}

/// Root of the observation tree for one session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceObservation {
    pub file_path: String,
    pub objects: Vec<Object>,
}

impl FaceObservation {
    #[must_use]
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            objects: Vec::new(),
        }
    }

    /// Update the media file path attached to the document
    pub fn set_file_path(&mut self, file_path: impl Into<String>) {
        self.file_path = file_path.into();
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    /// The object actions are appended to, creating the "face" object on
    /// first use
    pub fn face_object_mut(&mut self) -> &mut Object {
        if self.objects.is_empty() {
            self.objects.push(Object::new(FACE_OBJECT_NAME));
        }
        // Non-empty by the branch above.
        self.objects.last_mut().unwrap()
    }

    /// Append an action to the face object
    pub fn add_action(&mut self, action: Action) {
        self.face_object_mut().add_action(action);
    }

    /// Serialize the tree to pretty-printed JSON.
    ///
    /// Safe to call at any point in a session, including on an empty tree.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a serialized observation document
    ///
    /// # Errors
    ///
    /// Returns a serialization error on malformed input.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree_serializes() {
        let observation = FaceObservation::new("");
        let json = observation.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["file_path"], "");
        assert!(value["objects"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_face_object_created_once() {
        let mut observation = FaceObservation::new("a.mp4");
        observation.add_action(Action::new(ActionKind::Drag, "drag-left", Rect::default()));
        observation.add_action(Action::new(ActionKind::Push, "blink", Rect::default()));
        assert_eq!(observation.object_count(), 1);
        assert_eq!(observation.objects[0].name, FACE_OBJECT_NAME);
        assert_eq!(observation.objects[0].actions.len(), 2);
    }

    #[test]
    fn test_wire_schema_quirks() {
        let mut observation = FaceObservation::new("clip.mp4");
        let mut action = Action::new(ActionKind::Spread, "happy", Rect::new(0.1, 0.2, 0.3, 0.4));
        let mut feed = Feed::new(1.5, 180.0, 200.0, 180.0);
        feed.add_tracked_position(TrackedPosition::new(0.5, 0.6, 0.0));
        action.add_feed(feed);
        observation.add_action(action);

        let json = observation.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let roi = &value["objects"][0]["actions"][0]["roi"];
        assert!(roi.get("Height").is_some(), "roi key must be capitalized");
        assert!(roi.get("height").is_none());

        let feed = &value["objects"][0]["actions"][0]["feeds"][0];
        assert!(feed["tracked_position"].is_array());
        assert!(feed.get("tracked_positions").is_none());
        assert_eq!(value["objects"][0]["actions"][0]["type"], "spread");
        assert!(value["objects"][0]["actions"][0].get("label").is_none());
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let mut observation = FaceObservation::new("clip.mp4");
        for object_index in 0..2 {
            let mut object = Object::new(format!("object-{object_index}"));
            for action_index in 0..3 {
                let mut action = Action::new(
                    ActionKind::Drag,
                    "drag-right",
                    Rect::new(0.0, 0.0, 1.0, 1.0),
                );
                for feed_index in 0..4 {
                    let mut feed = Feed::new(
                        f64::from(feed_index) / 30.0,
                        180.25,
                        190.125 + f64::from(action_index),
                        179.875,
                    );
                    for position_index in 0..2 {
                        feed.add_tracked_position(TrackedPosition::new(
                            0.25 + f64::from(position_index),
                            0.75,
                            0.0,
                        ));
                    }
                    action.add_feed(feed);
                }
                object.add_action(action);
            }
            observation.add_object(object);
        }

        let parsed = FaceObservation::from_json(&observation.to_json().unwrap()).unwrap();
        assert_eq!(parsed.objects.len(), 2);
        for (object, parsed_object) in observation.objects.iter().zip(&parsed.objects) {
            assert_eq!(parsed_object.actions.len(), 3);
            for (action, parsed_action) in object.actions.iter().zip(&parsed_object.actions) {
                assert_eq!(parsed_action.feeds.len(), 4);
                for (feed, parsed_feed) in action.feeds.iter().zip(&parsed_action.feeds) {
                    assert_eq!(parsed_feed.tracked_positions.len(), 2);
                    let rel = |a: f64, b: f64| (a - b).abs() / a.abs().max(b.abs()).max(1.0);
                    assert!(rel(feed.timestamp, parsed_feed.timestamp) < 1e-9);
                    assert!(rel(feed.rotation.yaw, parsed_feed.rotation.yaw) < 1e-9);
                }
            }
        }
    }
}
