//! Dynamic object implementation

use crate::foundation::math::Color;
use crate::property::{PositionsRef, PropertyRef};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Stable identity of a dynamic object within its collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    /// Create an entity id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Visual description of a polyline
///
/// Every field is independently time-sampled. A field left as `None`
/// means "no override": the visualizer keeps whatever the primitive had.
#[derive(Clone, Default)]
pub struct DynamicPolyline {
    /// Whether the polyline is drawn
    pub show: Option<PropertyRef<bool>>,
    /// Line color
    pub color: Option<PropertyRef<Color>>,
    /// Line width in pixels
    pub width: Option<PropertyRef<f32>>,
    /// Outline color
    pub outline_color: Option<PropertyRef<Color>>,
    /// Outline width in pixels
    pub outline_width: Option<PropertyRef<f32>>,
}

impl DynamicPolyline {
    /// Create a polyline description with no properties set
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for DynamicPolyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicPolyline")
            .field("show", &self.show.is_some())
            .field("color", &self.color.is_some())
            .field("width", &self.width.is_some())
            .field("outline_color", &self.outline_color.is_some())
            .field("outline_width", &self.outline_width.is_some())
            .finish()
    }
}

/// A time-varying, identity-bearing scene entity
pub struct DynamicObject {
    id: EntityId,
    /// Polyline visual description, if any
    pub polyline: Option<DynamicPolyline>,
    /// Source of the polyline's vertex positions
    pub vertex_positions: Option<PositionsRef>,
}

impl DynamicObject {
    /// Create an entity with no visual descriptions
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            polyline: None,
            vertex_positions: None,
        }
    }

    /// The entity's identity
    pub const fn id(&self) -> &EntityId {
        &self.id
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicObject")
            .field("id", &self.id)
            .field("polyline", &self.polyline)
            .field("vertex_positions", &self.vertex_positions.is_some())
            .finish()
    }
}

/// Shared, mutable handle to a dynamic object
///
/// Edits made through the handle are seen by the next visualizer update.
pub type DynamicObjectRef = Arc<RwLock<DynamicObject>>;
