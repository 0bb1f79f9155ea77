//! CPU-side sprite mesh building.
//!
//! Quads are appended in draw order into one vertex/index list. Consecutive
//! quads that share a texture collapse into a single draw call, so the render
//! pass only rebinds a texture when the key changes.

use crate::vertex::SpriteVertex;

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall<K> {
    pub texture_key: K,
    pub index_start: u32,
    pub index_count: u32,
}

/// Axis-aligned quad in screen space (top-left origin, y down).
#[derive(Debug, Clone, Copy)]
pub struct QuadSpec<K> {
    pub texture_key: K,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct SpriteBatch<K> {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall<K>>,
}

impl<K: Copy + PartialEq> SpriteBatch<K> {
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
            draw_calls: Vec::new(),
        }
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn push_quad(&mut self, spec: QuadSpec<K>) {
        let left = spec.x;
        let top = spec.y;
        let right = spec.x + spec.width;
        let bottom = spec.y + spec.height;
        let base_index = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&[
            SpriteVertex {
                position: [left, top],
                tex_coords: [0.0, 0.0],
                color: spec.color,
            },
            SpriteVertex {
                position: [right, top],
                tex_coords: [1.0, 0.0],
                color: spec.color,
            },
            SpriteVertex {
                position: [right, bottom],
                tex_coords: [1.0, 1.0],
                color: spec.color,
            },
            SpriteVertex {
                position: [left, bottom],
                tex_coords: [0.0, 1.0],
                color: spec.color,
            },
        ]);

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(spec.texture_key, draw_start, 6);
    }

    fn push_draw_call(&mut self, texture_key: K, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if last.texture_key == texture_key && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture_key,
            index_start,
            index_count,
        });
    }
}
