use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle defined by min and max corners
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from min and max corners
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a new rectangle from position and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: Vec2::new(pos.x + size.x, pos.y + size.y),
        }
    }

    /// An empty rectangle that unions as the identity, so it can seed a
    /// bounds fold.
    pub const NOTHING: Self = Self {
        min: Vec2 {
            x: f32::INFINITY,
            y: f32::INFINITY,
        },
        max: Vec2 {
            x: f32::NEG_INFINITY,
            y: f32::NEG_INFINITY,
        },
    };

    /// Get the width of the rectangle
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Get the size of the rectangle
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Get the center of the rectangle
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }

    /// Check if the rectangle contains a point
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Return a new rectangle expanded by `amount` on all sides
    pub fn expand(&self, amount: f32) -> Rect {
        Rect {
            min: Vec2::new(self.min.x - amount, self.min.y - amount),
            max: Vec2::new(self.max.x + amount, self.max.y + amount),
        }
    }

    /// Return the smallest rectangle covering both `self` and `other`
    pub fn union(&self, other: Rect) -> Rect {
        Rect {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// Which side of a stage card a link attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl AnchorSide {
    pub const ALL: [AnchorSide; 4] = [
        AnchorSide::Left,
        AnchorSide::Right,
        AnchorSide::Top,
        AnchorSide::Bottom,
    ];

    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            AnchorSide::Left => AnchorSide::Right,
            AnchorSide::Right => AnchorSide::Left,
            AnchorSide::Top => AnchorSide::Bottom,
            AnchorSide::Bottom => AnchorSide::Top,
        }
    }

    /// Get a unit vector pointing in the direction of this side
    pub fn direction_vector(&self) -> Vec2 {
        match self {
            AnchorSide::Left => Vec2::new(-1.0, 0.0),
            AnchorSide::Right => Vec2::new(1.0, 0.0),
            AnchorSide::Top => Vec2::new(0.0, -1.0),
            AnchorSide::Bottom => Vec2::new(0.0, 1.0),
        }
    }

    /// The point on the border of `rect` where a link on this side attaches
    /// (the midpoint of the side).
    pub fn anchor_on(&self, rect: Rect) -> Vec2 {
        let center = rect.center();
        match self {
            AnchorSide::Left => Vec2::new(rect.min.x, center.y),
            AnchorSide::Right => Vec2::new(rect.max.x, center.y),
            AnchorSide::Top => Vec2::new(center.x, rect.min.y),
            AnchorSide::Bottom => Vec2::new(center.x, rect.max.y),
        }
    }
}
