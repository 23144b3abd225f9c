use std::f32::consts::TAU;

use cgmath::Vector2;

// Screen-space units / radians / radians per second
pub const DEFAULT_RADIUS: f32 = 0.1;
pub const DEFAULT_AZIMUTH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 1.0;

/// One rotating element of a chain: an angle advanced every frame,
/// and a local offset derived from that angle and the node's radius.
pub struct ChainNode {
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
    // Derived from angle + radius on every update
    pub offset: Vector2<f32>,
}

impl ChainNode {
    pub fn new(radius: f32, speed: f32) -> Self {
        let angle = DEFAULT_AZIMUTH;
        Self {
            angle,
            speed,
            radius,
            offset: Vector2::new(radius * angle.cos(), radius * angle.sin()),
        }
    }

    /// Advance the angle by `speed * dt`, wrap it into [0, 2π),
    /// and recompute the local offset.
    fn update(&mut self, dt: f32) {
        // rem_euclid keeps the angle in [0, 2π) even for negative speeds
        self.angle = (self.angle + self.speed * dt).rem_euclid(TAU);
        self.offset = Vector2::new(self.radius * self.angle.cos(), self.radius * self.angle.sin());
    }
}

impl Default for ChainNode {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS, DEFAULT_SPEED)
    }
}

/// An ordered sequence of rotating nodes plus a fixed origin.
///
/// Sequence order is render order: node `i`'s drawn position is the
/// origin plus the running sum of local offsets of nodes `0..=i`.
/// Node count is fixed at construction.
pub struct Chain {
    pub origin: Vector2<f32>,
    pub nodes: Vec<ChainNode>,
}

impl Chain {
    pub fn new(node_count: usize) -> Self {
        let nodes = (0..node_count).map(|_| ChainNode::default()).collect();
        Self {
            origin: Vector2::new(0.0, 0.0),
            nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Advance every node by `elapsed_seconds`. Nodes are independent
    /// here; they only couple at render time through the accumulation
    /// walk in [`Chain::positions`].
    pub fn update(&mut self, elapsed_seconds: f32) {
        for node in &mut self.nodes {
            node.update(elapsed_seconds);
        }
    }

    /// The accumulation walk: the absolute position of each node, as a
    /// running sum of offsets starting from the chain origin.
    ///
    /// The accumulator is a fresh local value on every call. It must
    /// never alias the origin or any node state, otherwise positions
    /// drift a little further off-screen with every frame drawn.
    pub fn positions(&self) -> Vec<Vector2<f32>> {
        let mut acc = self.origin;
        self.nodes
            .iter()
            .map(|node| {
                acc += node.offset;
                acc
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-5;

    #[test]
    fn update_advances_and_wraps_angle() {
        let mut chain = Chain::new(1);
        chain.nodes[0].speed = 1.0;
        // 3π of rotation at 1 rad/s wraps once
        chain.update(3.0 * PI);
        assert_relative_eq!(chain.nodes[0].angle, PI, epsilon = EPS);
        assert!(chain.nodes[0].angle >= 0.0 && chain.nodes[0].angle < TAU);
    }

    #[test]
    fn negative_speed_stays_in_range() {
        let mut chain = Chain::new(1);
        chain.nodes[0].speed = -1.0;
        chain.update(FRAC_PI_2);
        assert_relative_eq!(chain.nodes[0].angle, TAU - FRAC_PI_2, epsilon = EPS);
        assert!(chain.nodes[0].angle >= 0.0 && chain.nodes[0].angle < TAU);
    }

    #[test]
    fn zero_elapsed_update_is_a_noop() {
        let mut chain = Chain::new(3);
        chain.update(0.7);
        let before: Vec<(f32, Vector2<f32>)> = chain
            .nodes
            .iter()
            .map(|n| (n.angle, n.offset))
            .collect();

        chain.update(0.0);

        for (node, (angle, offset)) in chain.nodes.iter().zip(before) {
            assert_relative_eq!(node.angle, angle, epsilon = EPS);
            assert_relative_eq!(node.offset.x, offset.x, epsilon = EPS);
            assert_relative_eq!(node.offset.y, offset.y, epsilon = EPS);
        }
    }

    #[test]
    fn offset_tracks_angle_and_radius() {
        let mut chain = Chain::new(1);
        chain.nodes[0].radius = 0.25;
        chain.nodes[0].speed = 2.5;
        chain.update(1.3);

        let node = &chain.nodes[0];
        assert_relative_eq!(node.offset.x, node.radius * node.angle.cos(), epsilon = EPS);
        assert_relative_eq!(node.offset.y, node.radius * node.angle.sin(), epsilon = EPS);
    }

    #[test]
    fn positions_accumulate_offsets_from_origin() {
        let mut chain = Chain::new(4);
        chain.origin = Vector2::new(0.3, -0.2);
        chain.update(2.1);

        let positions = chain.positions();
        let mut expected = chain.origin;
        for (i, node) in chain.nodes.iter().enumerate() {
            expected += node.offset;
            assert_relative_eq!(positions[i].x, expected.x, epsilon = EPS);
            assert_relative_eq!(positions[i].y, expected.y, epsilon = EPS);
        }
    }

    #[test]
    fn repeated_walks_do_not_drift() {
        // Regression for the in-place accumulator bug: two walks with no
        // update in between must land on exactly the same positions.
        let mut chain = Chain::new(5);
        chain.update(0.016);

        let first = chain.positions();
        let second = chain.positions();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn quarter_turn_stacks_nodes_vertically() {
        // 3 default nodes (r=0.1, speed=1.0) after a quarter turn: every
        // offset is (0, 0.1), so positions stack at y = 0.1, 0.2, 0.3.
        let mut chain = Chain::new(3);
        chain.update(FRAC_PI_2);

        for node in &chain.nodes {
            assert_relative_eq!(node.angle, FRAC_PI_2, epsilon = EPS);
            assert_relative_eq!(node.offset.x, 0.0, epsilon = EPS);
            assert_relative_eq!(node.offset.y, 0.1, epsilon = EPS);
        }

        let positions = chain.positions();
        for (i, p) in positions.iter().enumerate() {
            assert_relative_eq!(p.x, 0.0, epsilon = EPS);
            assert_relative_eq!(p.y, 0.1 * (i + 1) as f32, epsilon = EPS);
        }
    }

    #[test]
    fn empty_chain_has_no_positions() {
        let mut chain = Chain::new(0);
        assert!(chain.is_empty());
        chain.update(1.0);
        assert!(chain.positions().is_empty());
    }
}
