//! Drag-rectangle geometry for multi-select gestures.
//!
//! Coordinates are pixels relative to the scrollable content viewport.
//! Horizontal position accounts for element-local scroll and vertical
//! position for page-level scroll, because the content table scrolls
//! horizontally inside a vertically scrolling page.

/// Reserved band at the far edges where the resize dragger handle lives;
/// the selection rectangle never extends into it.
pub const DRAGGER_HANDLE_ALLOWANCE: f64 = 16.0;

/// A point in viewport-local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Pointer position in page coordinates, as delivered by the UI event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub client_x: f64,
    pub client_y: f64,
}

/// Geometry of the scrollable content viewport at gesture time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,

    /// Element-local horizontal scroll offset.
    pub scroll_left: f64,

    /// Page-level vertical scroll offset.
    pub page_scroll_y: f64,
}

impl Viewport {
    /// Converts a pointer position to viewport-local coordinates, folding in
    /// the two differently scoped scroll offsets.
    pub fn localize(&self, pointer: PointerPosition) -> Point {
        Point {
            x: pointer.client_x - self.left + self.scroll_left,
            y: pointer.client_y - self.top + self.page_scroll_y,
        }
    }
}

/// Padding the hosting component reserves on each side of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// The transient rectangle of an in-progress drag gesture.
///
/// Exclusive per container; starting a new drag overwrites any prior one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub start: Point,
    pub end: Point,
}

impl SelectionRect {
    pub fn new(start: Point) -> Self {
        Self { start, end: start }
    }

    /// Clamps the far corner to the viewport bounds minus the dragger-handle
    /// allowance and the caller-supplied padding.
    pub fn move_to(&mut self, local: Point, viewport: &Viewport, padding: &Padding) {
        let max_x = (viewport.width - DRAGGER_HANDLE_ALLOWANCE - padding.right).max(padding.left);
        let max_y = (viewport.height - DRAGGER_HANDLE_ALLOWANCE - padding.bottom).max(padding.top);
        self.end = Point {
            x: local.x.clamp(padding.left, max_x),
            y: local.y.clamp(padding.top, max_y),
        };
    }

    /// The rectangle with non-negative width and height regardless of drag
    /// direction.
    pub fn normalized(&self) -> Rect {
        Rect {
            x: self.start.x.min(self.end.x),
            y: self.start.y.min(self.end.y),
            width: (self.end.x - self.start.x).abs(),
            height: (self.end.y - self.start.y).abs(),
        }
    }
}
