use crate::geometry::{AnchorSide, Rect, Vec2};

/// A cubic bezier curve segment defined by four control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl CubicBezier {
    /// Sample the curve at parameter t [0, 1]
    pub fn sample(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = self.start.x * mt3
            + 3.0 * self.control1.x * mt2 * t
            + 3.0 * self.control2.x * mt * t2
            + self.end.x * t3;
        let y = self.start.y * mt3
            + 3.0 * self.control1.y * mt2 * t
            + 3.0 * self.control2.y * mt * t2
            + self.end.y * t3;

        Vec2::new(x, y)
    }

    /// Compute the minimum distance from a point to this bezier curve.
    ///
    /// Uses uniform sampling along the curve to find the closest point. The
    /// `num_samples` parameter controls accuracy (higher = more precise but
    /// slower); hit testing typically uses 32-64.
    pub fn point_distance(&self, point: Vec2, num_samples: usize) -> f32 {
        let mut min_dist_sq = f32::INFINITY;
        let samples = num_samples.max(2);

        for i in 0..=samples {
            let t = i as f32 / samples as f32;
            let curve_point = self.sample(t);
            let dx = curve_point.x - point.x;
            let dy = curve_point.y - point.y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq < min_dist_sq {
                min_dist_sq = dist_sq;
            }
        }

        min_dist_sq.sqrt()
    }
}

/// Router for calculating link curves between stage cards.
///
/// Unlike a free-form graph, every link records which side of each card it
/// attaches to, so the curve leaves and enters perpendicular to those sides.
#[derive(Debug, Clone, Copy)]
pub struct LinkRouter {
    /// Minimum control-point distance so curves clear the card border
    pub node_margin: f32,
    /// Curvature factor for bezier control points relative to distance
    pub curvature: f32,
}

impl Default for LinkRouter {
    fn default() -> Self {
        Self {
            node_margin: 20.0,
            curvature: 0.5,
        }
    }
}

impl LinkRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate the curve for a link between two cards.
    ///
    /// The curve starts at the midpoint of `source_side` on `source_rect`
    /// and ends at the midpoint of `target_side` on `target_rect`.
    pub fn route_link(
        &self,
        source_rect: Rect,
        source_side: AnchorSide,
        target_rect: Rect,
        target_side: AnchorSide,
    ) -> CubicBezier {
        let start = source_side.anchor_on(source_rect);
        let end = target_side.anchor_on(target_rect);
        self.calculate_curve(start, end, source_side, target_side)
    }

    /// Calculate the preview curve from a card side to a free point (the
    /// pointer position during a connect drag). The loose end is straight.
    pub fn route_to_point(
        &self,
        source_rect: Rect,
        source_side: AnchorSide,
        point: Vec2,
    ) -> CubicBezier {
        let start = source_side.anchor_on(source_rect);
        let curve = self.calculate_curve(start, point, source_side, source_side.opposite());
        CubicBezier {
            control2: point,
            ..curve
        }
    }

    fn calculate_curve(
        &self,
        start: Vec2,
        end: Vec2,
        start_side: AnchorSide,
        end_side: AnchorSide,
    ) -> CubicBezier {
        // Prevent control points from scaling unbounded with link length.
        // If they do, links can "swing" far outside the viewport and look comically long.
        const MAX_CONTROL_LEN: f32 = 260.0;

        // Basic vector math helpers since Vec2 does not implement ops
        let sub = |a: Vec2, b: Vec2| Vec2::new(a.x - b.x, a.y - b.y);
        let add = |a: Vec2, b: Vec2| Vec2::new(a.x + b.x, a.y + b.y);
        let mul = |v: Vec2, s: f32| Vec2::new(v.x * s, v.y * s);

        let delta = sub(end, start);

        // Use a directionally-biased "distance" instead of full Euclidean distance.
        // This keeps curves stable when cards are far apart vertically but close
        // horizontally, and reduces the chance of overshooting control points.
        let dx = delta.x.abs();
        let dy = delta.y.abs();
        let primary_dist = dx.max(dy * 0.5);

        let control_dist = primary_dist * self.curvature;

        let start_dir = start_side.direction_vector();
        let end_dir = end_side.direction_vector();

        let mut curve_len = if primary_dist < self.node_margin * 2.0 {
            // For very close cards, keep control points close so we don't create loops.
            control_dist
        } else {
            control_dist.max(self.node_margin)
        };
        if curve_len.is_finite() {
            curve_len = curve_len.min(MAX_CONTROL_LEN);
        } else {
            curve_len = self.node_margin.min(MAX_CONTROL_LEN);
        }

        let control1 = add(start, mul(start_dir, curve_len));
        let control2 = add(end, mul(end_dir, curve_len));

        CubicBezier {
            start,
            control1,
            control2,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn distance(a: Vec2, b: Vec2) -> f32 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (
            0.0f32..1000.0,
            0.0f32..1000.0,
            40.0f32..300.0,
            30.0f32..150.0,
        )
            .prop_map(|(x, y, w, h)| Rect::from_pos_size(Vec2::new(x, y), Vec2::new(w, h)))
    }

    fn side_strategy() -> impl Strategy<Value = AnchorSide> {
        prop_oneof![
            Just(AnchorSide::Left),
            Just(AnchorSide::Right),
            Just(AnchorSide::Top),
            Just(AnchorSide::Bottom),
        ]
    }

    proptest! {
        #[test]
        fn prop_curve_spans_the_recorded_anchors(
            source_rect in rect_strategy(),
            target_rect in rect_strategy(),
            source_side in side_strategy(),
            target_side in side_strategy(),
        ) {
            let router = LinkRouter::new();
            let curve = router.route_link(source_rect, source_side, target_rect, target_side);

            let expected_start = source_side.anchor_on(source_rect);
            let expected_end = target_side.anchor_on(target_rect);

            prop_assert!(distance(curve.start, expected_start) < 0.001,
                "Curve start should sit on the source anchor. Got {:?}, expected {:?}", curve.start, expected_start);
            prop_assert!(distance(curve.end, expected_end) < 0.001,
                "Curve end should sit on the target anchor. Got {:?}, expected {:?}", curve.end, expected_end);
        }

        #[test]
        fn prop_curve_leaves_along_the_source_side(
            source_rect in rect_strategy(),
            target_rect in rect_strategy(),
            source_side in side_strategy(),
            target_side in side_strategy(),
        ) {
            let router = LinkRouter::new();
            let far_enough = distance(
                source_side.anchor_on(source_rect),
                target_side.anchor_on(target_rect),
            ) > router.node_margin * 2.0;
            prop_assume!(far_enough);

            let curve = router.route_link(source_rect, source_side, target_rect, target_side);
            let dir = source_side.direction_vector();
            let near = curve.sample(0.05);
            let dot = (near.x - curve.start.x) * dir.x + (near.y - curve.start.y) * dir.y;

            prop_assert!(dot > 0.0,
                "Curve should initially head {:?} from the anchor, sampled {:?} from {:?}",
                source_side, near, curve.start);
        }

        #[test]
        fn prop_point_on_curve_has_zero_distance(
            source_rect in rect_strategy(),
            target_rect in rect_strategy(),
            source_side in side_strategy(),
            target_side in side_strategy(),
            t in 0.0f32..1.0,
        ) {
            let router = LinkRouter::new();
            let curve = router.route_link(source_rect, source_side, target_rect, target_side);
            let on_curve = curve.sample(t);

            // Sampling resolution bounds the error, not float noise.
            prop_assert!(curve.point_distance(on_curve, 512) < 10.0);
        }
    }

    #[test]
    fn test_preview_curve_ends_at_the_pointer() {
        let router = LinkRouter::new();
        let rect = Rect::from_pos_size(Vec2::new(100.0, 100.0), Vec2::new(180.0, 80.0));
        let pointer = Vec2::new(400.0, 320.0);

        let curve = router.route_to_point(rect, AnchorSide::Right, pointer);
        assert_eq!(curve.start, AnchorSide::Right.anchor_on(rect));
        assert_eq!(curve.end, pointer);
        assert_eq!(curve.control2, pointer);
    }

    #[test]
    fn test_self_loop_spans_two_sides_of_one_card() {
        let router = LinkRouter::new();
        let rect = Rect::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(200.0, 100.0));

        let curve = router.route_link(rect, AnchorSide::Top, rect, AnchorSide::Bottom);
        assert_eq!(curve.start, Vec2::new(100.0, 0.0));
        assert_eq!(curve.end, Vec2::new(100.0, 100.0));
        // Control points bow outward past the sides they leave from.
        assert!(curve.control1.y <= curve.start.y);
        assert!(curve.control2.y >= curve.end.y);
    }
}
