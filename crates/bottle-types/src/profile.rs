use serde::{Deserialize, Serialize};

/// A 2D point on the sketch plane. `x` is the distance from the revolve axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub x: f64,
    pub y: f64,
}

impl ProfilePoint {
    pub const ORIGIN: ProfilePoint = ProfilePoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance_to(self, other: ProfilePoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: ProfilePoint) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Center of the circle through three points, `None` when they are collinear
    /// within `tol` (measured as the distance of `b` from the line `a`-`c`).
    pub fn circumcenter(
        a: ProfilePoint,
        b: ProfilePoint,
        c: ProfilePoint,
        tol: f64,
    ) -> Option<ProfilePoint> {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        let chord = a.distance_to(c);
        // |d| / 2 is twice the triangle area; area * 2 / chord is the height of b.
        if chord < tol || (d.abs() / 2.0) / chord < tol {
            return None;
        }
        let a2 = a.x * a.x + a.y * a.y;
        let b2 = b.x * b.x + b.y * b.y;
        let c2 = c.x * c.x + c.y * c.y;
        Some(ProfilePoint {
            x: (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
            y: (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
        })
    }

    /// Lift onto the XY sketch plane (z = 0).
    pub fn to_3d(self) -> [f64; 3] {
        [self.x, self.y, 0.0]
    }
}

/// Which part of the bottle outline a segment describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SegmentKind {
    /// Along the revolve axis, from the base origin to the top.
    HeightLine,
    /// Across the top of the neck.
    TopLine,
    /// Down the outside of the neck.
    TopHeightLine,
    /// Out along the ledge to the shoulder point.
    TopBodyLine,
    UpperArc,
    LowerArc,
    /// Back along the base to the origin.
    BottomLine,
}

impl SegmentKind {
    /// Walk order of the outline.
    pub const ORDER: [SegmentKind; 7] = [
        SegmentKind::HeightLine,
        SegmentKind::TopLine,
        SegmentKind::TopHeightLine,
        SegmentKind::TopBodyLine,
        SegmentKind::UpperArc,
        SegmentKind::LowerArc,
        SegmentKind::BottomLine,
    ];
}

/// One segment of the revolve profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProfileSegment {
    Line {
        kind: SegmentKind,
        start: ProfilePoint,
        end: ProfilePoint,
    },
    /// Arc through three points; `interior` fixes the curvature direction.
    Arc {
        kind: SegmentKind,
        start: ProfilePoint,
        interior: ProfilePoint,
        end: ProfilePoint,
    },
}

impl ProfileSegment {
    pub fn kind(&self) -> SegmentKind {
        match self {
            ProfileSegment::Line { kind, .. } | ProfileSegment::Arc { kind, .. } => *kind,
        }
    }

    pub fn start(&self) -> ProfilePoint {
        match self {
            ProfileSegment::Line { start, .. } | ProfileSegment::Arc { start, .. } => *start,
        }
    }

    pub fn end(&self) -> ProfilePoint {
        match self {
            ProfileSegment::Line { end, .. } | ProfileSegment::Arc { end, .. } => *end,
        }
    }

    pub fn interior(&self) -> Option<ProfilePoint> {
        match self {
            ProfileSegment::Line { .. } => None,
            ProfileSegment::Arc { interior, .. } => Some(*interior),
        }
    }

    /// Midpoint of the segment's endpoints. Used for dimension label placement.
    pub fn chord_midpoint(&self) -> ProfilePoint {
        self.start().midpoint(self.end())
    }
}

/// The closed half cross-section of the bottle, in walk order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileOutline {
    pub segments: Vec<ProfileSegment>,
}

impl ProfileOutline {
    /// Look up a segment by kind.
    pub fn segment(&self, kind: SegmentKind) -> Option<&ProfileSegment> {
        self.segments.iter().find(|s| s.kind() == kind)
    }

    pub fn first_point(&self) -> Option<ProfilePoint> {
        self.segments.first().map(|s| s.start())
    }

    pub fn last_point(&self) -> Option<ProfilePoint> {
        self.segments.last().map(|s| s.end())
    }

    /// Top of the height line, the center of the neck's top face after revolve.
    pub fn top_center(&self) -> Option<ProfilePoint> {
        self.segment(SegmentKind::HeightLine).map(|s| s.end())
    }
}
