//! Polyline render primitive
//!
//! A [`Polyline`] is the renderer-facing half of a visualized entity: plain
//! drawable state plus a back-reference to the entity that owns it. Every
//! setter records the written field in a [`PolylineDirty`] set so the
//! renderer can upload only what was touched since it last looked.

use crate::foundation::math::{Cartesian3, Color};
use crate::scene::EntityId;
use bitflags::bitflags;

bitflags! {
    /// Fields written since the renderer last consumed the primitive
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PolylineDirty: u32 {
        /// Visibility written
        const SHOW = 1 << 0;
        /// Vertex positions written
        const POSITIONS = 1 << 1;
        /// Line color written
        const COLOR = 1 << 2;
        /// Line width written
        const WIDTH = 1 << 3;
        /// Outline color written
        const OUTLINE_COLOR = 1 << 4;
        /// Outline width written
        const OUTLINE_WIDTH = 1 << 5;
    }
}

/// Default line width in pixels
pub const DEFAULT_WIDTH: f32 = 1.0;

/// Default outline width in pixels
pub const DEFAULT_OUTLINE_WIDTH: f32 = 0.0;

/// A drawable polyline owned by a primitive registry
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    show: bool,
    positions: Vec<Cartesian3>,
    color: Color,
    width: f32,
    outline_color: Color,
    outline_width: f32,
    owner: Option<EntityId>,
    dirty: PolylineDirty,
}

impl Default for Polyline {
    fn default() -> Self {
        Self {
            show: true,
            positions: Vec::new(),
            color: Color::WHITE,
            width: DEFAULT_WIDTH,
            outline_color: Color::WHITE,
            outline_width: DEFAULT_OUTLINE_WIDTH,
            owner: None,
            dirty: PolylineDirty::all(),
        }
    }
}

impl Polyline {
    /// Create a visible, empty polyline with default styling
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the polyline is drawn
    pub const fn show(&self) -> bool {
        self.show
    }

    /// Set visibility
    pub fn set_show(&mut self, show: bool) {
        self.show = show;
        self.dirty |= PolylineDirty::SHOW;
    }

    /// Vertex positions in world space
    pub fn positions(&self) -> &[Cartesian3] {
        &self.positions
    }

    /// Replace the vertex positions
    pub fn set_positions(&mut self, positions: Vec<Cartesian3>) {
        self.positions = positions;
        self.dirty |= PolylineDirty::POSITIONS;
    }

    /// Line color
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Set line color
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.dirty |= PolylineDirty::COLOR;
    }

    /// Line width in pixels
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Set line width
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.dirty |= PolylineDirty::WIDTH;
    }

    /// Outline color
    pub const fn outline_color(&self) -> Color {
        self.outline_color
    }

    /// Set outline color
    pub fn set_outline_color(&mut self, color: Color) {
        self.outline_color = color;
        self.dirty |= PolylineDirty::OUTLINE_COLOR;
    }

    /// Outline width in pixels
    pub const fn outline_width(&self) -> f32 {
        self.outline_width
    }

    /// Set outline width
    pub fn set_outline_width(&mut self, width: f32) {
        self.outline_width = width;
        self.dirty |= PolylineDirty::OUTLINE_WIDTH;
    }

    /// The entity this primitive visualizes, for traceability
    pub const fn owner(&self) -> Option<&EntityId> {
        self.owner.as_ref()
    }

    /// Record the owning entity
    pub fn set_owner(&mut self, owner: Option<EntityId>) {
        self.owner = owner;
    }

    /// Fields written since the last [`take_dirty`](Self::take_dirty)
    pub const fn dirty(&self) -> PolylineDirty {
        self.dirty
    }

    /// Return and reset the dirty set
    pub fn take_dirty(&mut self) -> PolylineDirty {
        std::mem::replace(&mut self.dirty, PolylineDirty::empty())
    }
}
