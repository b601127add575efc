//! Draw contract
//!
//! The simulation describes what to draw as textured quads; rasterization
//! lives outside this crate. Draw passes only read simulation state.

use glam::Vec2;

/// RGBA tint, components in 0..1
pub type Tint = [f32; 4];

pub const WHITE: Tint = [1.0, 1.0, 1.0, 1.0];

/// One textured quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad<'a> {
    /// Texture key, resolved by the renderer
    pub texture: &'a str,
    /// Center of the quad in world space
    pub position: Vec2,
    /// Radians, up/clockwise convention
    pub rotation: f32,
    pub scale: f32,
    pub tint: Tint,
    /// Animation frame or sprite-sheet cell
    pub frame: u32,
}

impl<'a> Quad<'a> {
    pub fn new(texture: &'a str, position: Vec2) -> Self {
        Self {
            texture,
            position,
            rotation: 0.0,
            scale: 1.0,
            tint: WHITE,
            frame: 0,
        }
    }
}

/// Receives draw calls
pub trait DrawSink {
    fn draw_quad(&mut self, quad: Quad<'_>);
}

/// Owned copy of a [`Quad`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuad {
    pub texture: String,
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub tint: Tint,
    pub frame: u32,
}

/// Sink that records every quad (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub quads: Vec<RecordedQuad>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn clear(&mut self) {
        self.quads.clear();
    }

    /// Number of quads drawn with `texture`
    pub fn count_texture(&self, texture: &str) -> usize {
        self.quads.iter().filter(|q| q.texture == texture).count()
    }
}

impl DrawSink for DrawList {
    fn draw_quad(&mut self, quad: Quad<'_>) {
        self.quads.push(RecordedQuad {
            texture: quad.texture.to_string(),
            position: quad.position,
            rotation: quad.rotation,
            scale: quad.scale,
            tint: quad.tint,
            frame: quad.frame,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records() {
        let mut list = DrawList::new();
        assert!(list.is_empty());
        list.draw_quad(Quad::new("spark", Vec2::new(1.0, 2.0)));
        list.draw_quad(Quad {
            frame: 3,
            ..Quad::new("yeti", Vec2::ZERO)
        });
        assert_eq!(list.len(), 2);
        assert_eq!(list.count_texture("spark"), 1);
        assert_eq!(list.quads[1].frame, 3);
        list.clear();
        assert!(list.is_empty());
    }
}
