//! Circuit board field: jittered grid of nodes joined by short edges, with
//! data packets ("signals") travelling along the edges.
//!
//! Nodes live in a flat arena; edges and signals refer to them by index.
//! The whole arena is rebuilt by [`CircuitField::layout`], which also drops
//! every edge and signal, so no index outlives the node set it points into.

use std::f32::consts::TAU;

use rand::Rng;
use tracing::{debug, trace};

use super::config::CircuitParams;
use super::math::{self, Vec2};
use super::palette::circuit as colors;
use super::surface::Surface;

/// Amplitude of the pulse added to a node's base size
const PULSE_AMPLITUDE: f32 = 1.5;
/// Extra radius of the glow drawn behind active nodes
const NODE_GLOW_MARGIN: f32 = 4.0;
/// Extra radius of the glow drawn behind signals
const SIGNAL_GLOW_MARGIN: f32 = 3.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Current, pointer-displaced position
    pub pos: Vec2,
    /// Rest position chosen at layout time
    pub anchor: Vec2,
    /// Base radius before pulsing
    pub size: f32,
    pub pulse_phase: f32,
    pub pulse_speed: f32,
    pub active: bool,
    /// Number of edges touching this node
    pub degree: usize,
}

impl Node {
    fn spawn<R: Rng>(anchor: Vec2, active_probability: f64, rng: &mut R) -> Self {
        Self {
            pos: anchor,
            anchor,
            size: rng.gen_range(2.0..5.0),
            pulse_phase: rng.gen_range(0.0..TAU),
            pulse_speed: rng.gen_range(0.02..0.04),
            active: rng.gen_bool(active_probability),
            degree: 0,
        }
    }

    /// Advance the pulse and move the node for this frame.
    ///
    /// Within the repel radius the node sits on the pointer→anchor axis,
    /// pushed out proportionally to how close the pointer is. Outside it the
    /// node eases back towards its anchor.
    pub fn update(&mut self, pointer: Option<Vec2>, params: &CircuitParams) {
        self.pulse_phase = (self.pulse_phase + self.pulse_speed).rem_euclid(TAU);

        if let Some(pointer) = pointer {
            let (dir, distance) = math::direction_and_length(self.anchor - pointer);
            if distance < params.repel_radius {
                let force = (params.repel_radius - distance) / params.repel_radius;
                self.pos = self.anchor + dir * (force * params.repel_displacement);
                return;
            }
        }

        self.pos += (self.anchor - self.pos) * params.return_rate;
    }

    /// Radius including the sinusoidal pulse
    pub fn radius(&self) -> f32 {
        let pulse = self.pulse_phase.sin() * 0.5 + 0.5;
        self.size + pulse * PULSE_AMPLITUDE
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let radius = self.radius();

        if self.active {
            surface.fill_circle(self.pos, radius + NODE_GLOW_MARGIN, colors::NODE_GLOW);
        }

        let color = if self.active { colors::NODE_BRIGHT } else { colors::NODE };
        surface.fill_circle(self.pos, radius, color);

        // Inner highlight, offset up-left
        let offset = radius * 0.3;
        surface.fill_circle(
            self.pos - Vec2::new(offset, offset),
            offset,
            colors::NODE_HIGHLIGHT,
        );
    }
}

/// Undirected connection between two nodes (indices into the node arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub active: bool,
}

/// Packet travelling from one node to another along an edge
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Signal {
    pub from: usize,
    pub to: usize,
    /// Fraction of the way travelled, in [0, 1]
    pub progress: f32,
    /// Progress added per frame
    pub speed: f32,
    pub size: f32,
    /// Updates applied so far
    steps: u32,
    /// Update on which the signal lands, `ceil(1 / speed)`
    arrival: u32,
}

impl Signal {
    fn new(from: usize, to: usize, speed: f32, size: f32) -> Self {
        Self {
            from,
            to,
            progress: 0.0,
            speed,
            size,
            steps: 0,
            arrival: (1.0 / speed).ceil() as u32,
        }
    }

    /// Progress is derived from the step count rather than accumulated, so
    /// float error can't add or drop an update.
    fn advance(&mut self) {
        self.steps += 1;
        self.progress = if self.steps >= self.arrival {
            1.0
        } else {
            (self.steps as f32 * self.speed).min(1.0)
        };
    }

    pub fn is_done(&self) -> bool {
        self.steps >= self.arrival
    }
}

#[derive(Debug)]
pub struct CircuitField {
    params: CircuitParams,
    width: f32,
    height: f32,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    signals: Vec<Signal>,
}

impl CircuitField {
    pub fn new(params: CircuitParams) -> Self {
        Self {
            params,
            width: 0.0,
            height: 0.0,
            nodes: Vec::new(),
            edges: Vec::new(),
            signals: Vec::new(),
        }
    }

    /// Replace nodes, edges and signals with a fresh layout for the given size
    pub fn layout<R: Rng>(&mut self, width: f32, height: f32, rng: &mut R) {
        let nodes = self.place_nodes(width, height, rng);
        let (nodes, edges) = self.connect(nodes, rng);

        self.width = width;
        self.height = height;
        self.nodes = nodes;
        self.edges = edges;
        self.signals.clear();

        debug!(
            width,
            height,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "Circuit layout generated"
        );
    }

    /// Walk a regular grid, skip some cells and jitter the rest
    fn place_nodes<R: Rng>(&self, width: f32, height: f32, rng: &mut R) -> Vec<Node> {
        let p = &self.params;
        let mut nodes = Vec::new();

        if p.spacing <= 0.0 {
            return nodes;
        }

        let mut x = p.spacing / 2.0;
        while x < width {
            let mut y = p.spacing / 2.0;
            while y < height {
                if !rng.gen_bool(p.omit_probability) {
                    let jx = (rng.gen::<f32>() - 0.5) * p.jitter * 2.0;
                    let jy = (rng.gen::<f32>() - 0.5) * p.jitter * 2.0;
                    let anchor = Vec2::new((x + jx).clamp(0.0, width), (y + jy).clamp(0.0, height));
                    nodes.push(Node::spawn(anchor, p.active_node_probability, rng));
                }
                y += p.spacing;
            }
            x += p.spacing;
        }

        nodes
    }

    /// Join every close-enough pair whose endpoints are both under the degree cap
    fn connect<R: Rng>(&self, mut nodes: Vec<Node>, rng: &mut R) -> (Vec<Node>, Vec<Edge>) {
        let p = &self.params;
        let mut edges = Vec::new();

        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if nodes[i].degree >= p.max_degree || nodes[j].degree >= p.max_degree {
                    continue;
                }
                if nodes[i].anchor.distance(nodes[j].anchor) < p.connect_distance {
                    edges.push(Edge {
                        a: i,
                        b: j,
                        active: rng.gen_bool(p.active_edge_probability),
                    });
                    nodes[i].degree += 1;
                    nodes[j].degree += 1;
                }
            }
        }

        (nodes, edges)
    }

    /// One frame: edges, then nodes, then signals, then maybe a new signal.
    /// The caller clears the surface beforehand.
    pub fn step<R: Rng, S: Surface + ?Sized>(
        &mut self,
        pointer: Option<Vec2>,
        rng: &mut R,
        surface: &mut S,
    ) {
        self.draw_edges(pointer, surface);

        for node in &mut self.nodes {
            node.update(pointer, &self.params);
            node.draw(surface);
        }

        self.advance_signals(surface);
        self.maybe_spawn_signal(rng);
    }

    fn draw_edges<S: Surface + ?Sized>(&self, pointer: Option<Vec2>, surface: &mut S) {
        for edge in &self.edges {
            let from = self.nodes[edge.a].pos;
            let to = self.nodes[edge.b].pos;
            let near_pointer =
                pointer.is_some_and(|p| from.distance(p) < self.params.highlight_radius);

            let color = if edge.active || near_pointer {
                colors::LINE_ACTIVE
            } else {
                colors::LINE
            };
            let width = if near_pointer { 1.5 } else { 1.0 };
            surface.stroke_line(from, to, width, color);
        }
    }

    /// Drop signals that arrived last frame, move the rest and draw them
    pub(crate) fn advance_signals<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.signals.retain(|s| !s.is_done());

        for signal in &mut self.signals {
            signal.advance();

            let from = self.nodes[signal.from].pos;
            let to = self.nodes[signal.to].pos;
            let pos = from.lerp(to, signal.progress);

            surface.fill_circle(pos, signal.size + SIGNAL_GLOW_MARGIN, colors::PACKET_GLOW);
            surface.fill_circle(pos, signal.size, colors::PACKET);
        }
    }

    /// Roll for a new signal on a random edge, favouring active edges
    fn maybe_spawn_signal<R: Rng>(&mut self, rng: &mut R) {
        if !rng.gen_bool(self.params.signal_spawn_probability) {
            return;
        }
        if self.edges.is_empty() || self.signals.len() >= self.params.max_signals {
            return;
        }

        let edge = self.edges[rng.gen_range(0..self.edges.len())];
        if !edge.active && !rng.gen_bool(self.params.inactive_edge_signal_probability) {
            return;
        }

        let reverse = rng.gen_bool(0.5);
        let (from, to) = if reverse { (edge.b, edge.a) } else { (edge.a, edge.b) };
        let speed = rng.gen_range(0.008..0.020);
        let size = rng.gen_range(2.0..4.0);

        if self.push_signal(from, to, speed, size) {
            trace!(from, to, speed, live = self.signals.len(), "Signal spawned");
        }
    }

    /// Start a signal at progress 0. Refused once the pool is full, if
    /// either index is out of range, or if the speed isn't a positive number.
    pub fn push_signal(&mut self, from: usize, to: usize, speed: f32, size: f32) -> bool {
        if self.signals.len() >= self.params.max_signals
            || from >= self.nodes.len()
            || to >= self.nodes.len()
            || !(speed.is_finite() && speed > 0.0)
        {
            return false;
        }
        self.signals.push(Signal::new(from, to, speed, size));
        true
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn params(&self) -> &CircuitParams {
        &self.params
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
