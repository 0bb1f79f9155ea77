//! Design-canvas to window mapping.
//!
//! All art and positions are authored against a fixed design canvas. At startup
//! a [`ScaleMapping`] is built once from the design canvas and the window size:
//!
//! - **Uniform scale** (`min(sx, sy)`) is applied to every size, so sprites keep
//!   their aspect ratio and relative proportions.
//! - **Axis scales** (`sx`, `sy`) are applied to positions only, so anchors stay
//!   where they were authored relative to each window edge.
//!
//! Results are truncated to whole pixels.

use glam::{IVec2, Vec2};

/// Design canvas the source art is authored against.
pub const DESIGN_CANVAS: Size = Size::new(1530, 3320);

pub const CHARACTER_DESIGN_SIZE: Size = Size::new(1530, 3320);
/// Character centre sits this far above the bottom edge of the design canvas.
pub const CHARACTER_BOTTOM_OFFSET: i32 = 1700;

pub const BUTTON_DESIGN_SIZE: Size = Size::new(495, 495);
/// Button top-left corner, measured from the right/bottom canvas edges.
pub const BUTTON_RIGHT_OFFSET: i32 = 950;
pub const BUTTON_BOTTOM_OFFSET: i32 = 800;

/// Smallest design canvas that keeps the button and character anchors on it.
pub const MIN_DESIGN_CANVAS: Size =
    Size::new(BUTTON_RIGHT_OFFSET as u32, CHARACTER_BOTTOM_OFFSET as u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Integer pixel rectangle in window space (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn from_top_left(top_left: IVec2, size: Size) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn from_center(center: IVec2, size: Size) -> Self {
        Self {
            x: center.x - (size.width / 2) as i32,
            y: center.y - (size.height / 2) as i32,
            width: size.width,
            height: size.height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }

    /// Left and top edges are inside, right and bottom edges are not.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x as f32
            && point.x < self.right() as f32
            && point.y >= self.y as f32
            && point.y < self.bottom() as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMapping {
    design: Size,
    window: Size,
    scale_x: f64,
    scale_y: f64,
    scale: f64,
}

impl ScaleMapping {
    /// Both sizes must be non-empty; callers validate configuration first.
    pub fn new(design: Size, window: Size) -> Self {
        debug_assert!(!design.is_empty(), "design canvas must be non-empty");
        let scale_x = f64::from(window.width) / f64::from(design.width);
        let scale_y = f64::from(window.height) / f64::from(design.height);
        Self {
            design,
            window,
            scale_x,
            scale_y,
            scale: scale_x.min(scale_y),
        }
    }

    pub fn design(&self) -> Size {
        self.design
    }

    pub fn window(&self) -> Size {
        self.window
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn scale_size(&self, size: Size) -> Size {
        Size::new(
            (f64::from(size.width) * self.scale) as u32,
            (f64::from(size.height) * self.scale) as u32,
        )
    }

    pub fn scale_position(&self, position: IVec2) -> IVec2 {
        IVec2::new(
            (f64::from(position.x) * self.scale_x) as i32,
            (f64::from(position.y) * self.scale_y) as i32,
        )
    }

    /// The whole design canvas under the uniform scale.
    pub fn scaled_canvas(&self) -> Size {
        self.scale_size(self.design)
    }
}

/// Window-space placement of every element on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLayout {
    pub background: Rect,
    pub character: Rect,
    pub button: Rect,
}

impl SceneLayout {
    pub fn compute(mapping: &ScaleMapping) -> Self {
        let design = mapping.design();
        let window = mapping.window();

        // The background is stretched over the whole window, not letterboxed.
        let background = Rect::from_top_left(IVec2::ZERO, window);

        let character_anchor = IVec2::new(
            (design.width / 2) as i32,
            design.height as i32 - CHARACTER_BOTTOM_OFFSET,
        );
        let character = Rect::from_center(
            mapping.scale_position(character_anchor),
            mapping.scale_size(CHARACTER_DESIGN_SIZE),
        );

        let button_anchor = IVec2::new(
            design.width as i32 - BUTTON_RIGHT_OFFSET,
            design.height as i32 - BUTTON_BOTTOM_OFFSET,
        );
        let button = Rect::from_top_left(
            mapping.scale_position(button_anchor),
            mapping.scale_size(BUTTON_DESIGN_SIZE),
        );

        Self {
            background,
            character,
            button,
        }
    }
}
