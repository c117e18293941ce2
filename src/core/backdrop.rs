//! The animated background renderer
//!
//! `Backdrop` owns everything the animation needs between frames: the RNG,
//! the surface size, the last pointer position, the entity field and the
//! frame loop. Hosts feed it resize, pointer and visibility signals and call
//! [`Backdrop::frame`] once per display refresh.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::circuit::CircuitField;
use super::config::{BackdropConfig, ConfigError, Variant};
use super::drift::DriftField;
use super::frame_loop::FrameLoop;
use super::math::Vec2;
use super::stats::FrameStats;
use super::surface::Surface;

/// Entity set of the configured variant
#[derive(Debug)]
pub enum Field {
    Circuit(CircuitField),
    Drift(DriftField),
}

impl Field {
    fn for_config(config: &BackdropConfig) -> Self {
        match config.variant {
            Variant::Circuit => Field::Circuit(CircuitField::new(config.circuit.clone())),
            Variant::Drift => Field::Drift(DriftField::new(config.drift.clone())),
        }
    }

    pub fn point_count(&self) -> usize {
        match self {
            Field::Circuit(f) => f.nodes().len(),
            Field::Drift(f) => f.particles().len(),
        }
    }
}

pub struct Backdrop {
    config: BackdropConfig,
    rng: StdRng,
    width: f32,
    height: f32,
    pointer: Option<Vec2>,
    field: Field,
    frame_loop: FrameLoop,
    visible: bool,
    initialized: bool,
}

impl Backdrop {
    /// Renderer with a fixed seed; the same seed always yields the same layout
    pub fn new(config: BackdropConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_rng(config, StdRng::seed_from_u64(seed)))
    }

    /// Renderer seeded from `config.seed`, or from system entropy when unset
    pub fn from_config(config: BackdropConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::with_rng(config, rng))
    }

    fn with_rng(config: BackdropConfig, rng: StdRng) -> Self {
        let field = Field::for_config(&config);
        Self {
            config,
            rng,
            width: 0.0,
            height: 0.0,
            pointer: None,
            field,
            frame_loop: FrameLoop::new(),
            visible: true,
            initialized: false,
        }
    }

    /// Size to the surface, generate the entity set and start the loop
    pub fn initialize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);

        match &mut self.field {
            Field::Circuit(f) => f.layout(self.width, self.height, &mut self.rng),
            Field::Drift(f) => f.populate(self.width, self.height, &mut self.rng),
        }
        self.initialized = true;

        info!(
            variant = self.config.variant.label(),
            width = self.width,
            height = self.height,
            points = self.field.point_count(),
            "Backdrop initialized"
        );

        if self.visible {
            self.frame_loop.start();
        }
    }

    /// Rebuild for new surface dimensions. Returns `false` when nothing changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if !self.initialized {
            self.initialize(width, height);
            return true;
        }

        let (width, height) = (width.max(0.0), height.max(0.0));
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;

        match &mut self.field {
            Field::Circuit(f) => f.layout(width, height, &mut self.rng),
            // The count is fixed once particles exist; a zero-width start has none yet
            Field::Drift(f) if f.particles().is_empty() => {
                f.populate(width, height, &mut self.rng)
            }
            Field::Drift(f) => f.resize(width, height),
        }
        debug!(width, height, points = self.field.point_count(), "Backdrop resized");
        true
    }

    /// Remember the latest pointer position; read by the next frame
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Some(Vec2::new(x, y));
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Visibility gate: resume the loop when shown, cancel the pending
    /// frame when hidden. Entity state survives the pause.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;

        if visible {
            if self.initialized && self.frame_loop.start() {
                info!("Backdrop visible, animation resumed");
            }
        } else if let Some(frame) = self.frame_loop.cancel() {
            info!(frame, "Backdrop hidden, animation paused");
        }
    }

    /// Render one frame if the loop is running. Returns whether it drew.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.frame_loop.take_frame().is_none() {
            return false;
        }

        surface.clear();
        match &mut self.field {
            Field::Circuit(f) => f.step(self.pointer, &mut self.rng, surface),
            Field::Drift(f) => f.step(self.pointer, surface),
        }
        true
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn stats(&self) -> FrameStats {
        let (edges, signals) = match &self.field {
            Field::Circuit(f) => (f.edges().len(), f.signals().len()),
            Field::Drift(_) => (0, 0),
        };
        FrameStats {
            variant: self.config.variant,
            width: self.width,
            height: self.height,
            points: self.field.point_count(),
            edges,
            signals,
            frames: self.frame_loop.rendered(),
            running: self.is_running(),
        }
    }
}

/// Default config, seeded from entropy. The defaults always validate.
impl Default for Backdrop {
    fn default() -> Self {
        Self::with_rng(BackdropConfig::default(), StdRng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::{DrawCommand, RecordingSurface};

    fn circuit(seed: u64) -> Backdrop {
        let mut backdrop = Backdrop::new(BackdropConfig::default(), seed).unwrap();
        backdrop.initialize(1200.0, 800.0);
        backdrop
    }

    fn drift_config() -> BackdropConfig {
        BackdropConfig {
            variant: Variant::Drift,
            ..BackdropConfig::default()
        }
    }

    fn nodes(backdrop: &Backdrop) -> &CircuitField {
        match backdrop.field() {
            Field::Circuit(f) => f,
            Field::Drift(_) => panic!("expected circuit field"),
        }
    }

    #[test]
    fn test_initialize_starts_loop_and_draws() {
        let mut backdrop = circuit(1);
        assert!(backdrop.is_running());

        let mut surface = RecordingSurface::new();
        assert!(backdrop.frame(&mut surface));
        assert_eq!(surface.commands()[0], DrawCommand::Clear);
        assert_eq!(surface.lines().count(), backdrop.stats().edges);
        assert!(surface.circles().count() >= backdrop.stats().points * 2);
    }

    #[test]
    fn test_frame_before_initialize_is_noop() {
        let mut backdrop = Backdrop::new(BackdropConfig::default(), 1).unwrap();
        let mut surface = RecordingSurface::new();
        assert!(!backdrop.frame(&mut surface));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_hidden_pauses_and_visible_resumes() {
        let mut backdrop = circuit(2);
        let mut surface = RecordingSurface::new();
        for _ in 0..10 {
            backdrop.frame(&mut surface);
        }

        backdrop.set_visible(false);
        assert!(!backdrop.is_running());
        let before = surface.total_commands();
        assert!(!backdrop.frame(&mut surface));
        assert_eq!(surface.total_commands(), before);

        let phases: Vec<f32> = nodes(&backdrop).nodes().iter().map(|n| n.pulse_phase).collect();

        backdrop.set_visible(true);
        assert!(backdrop.is_running());
        // State carried over the pause: phases continue from where they were
        let resumed: Vec<f32> = nodes(&backdrop).nodes().iter().map(|n| n.pulse_phase).collect();
        assert_eq!(phases, resumed);
        assert!(backdrop.frame(&mut surface));
        assert_eq!(backdrop.stats().frames, 11);
    }

    #[test]
    fn test_signals_survive_pause() {
        let mut backdrop = circuit(3);
        if let Field::Circuit(f) = &mut backdrop.field {
            assert!(f.push_signal(0, 1, 0.01, 2.0));
        }
        backdrop.set_visible(false);
        backdrop.set_visible(true);
        assert!(backdrop.stats().signals >= 1);
    }

    #[test]
    fn test_pointer_recorded_without_recompute() {
        let mut backdrop = circuit(4);
        let anchor = nodes(&backdrop).nodes()[0].anchor;
        let before = nodes(&backdrop).nodes().to_vec();

        backdrop.pointer_moved(anchor.x + 5.0, anchor.y);
        assert_eq!(backdrop.pointer(), Some(Vec2::new(anchor.x + 5.0, anchor.y)));
        assert_eq!(nodes(&backdrop).nodes(), &before[..]);

        let mut surface = RecordingSurface::new();
        backdrop.frame(&mut surface);
        assert!(nodes(&backdrop).nodes()[0].pos.x < anchor.x);

        backdrop.pointer_left();
        assert_eq!(backdrop.pointer(), None);
    }

    #[test]
    fn test_successive_resizes_keep_final_only() {
        let mut backdrop = circuit(5);
        assert!(backdrop.resize(1920.0, 1080.0));
        assert!(backdrop.resize(640.0, 480.0));
        assert!(!backdrop.resize(640.0, 480.0));

        let field = nodes(&backdrop);
        assert_eq!(field.size(), (640.0, 480.0));
        for node in field.nodes() {
            assert!(node.anchor.x <= 640.0 && node.anchor.y <= 480.0);
        }
        for edge in field.edges() {
            assert!(edge.b < field.nodes().len());
        }

        let mut surface = RecordingSurface::new();
        assert!(backdrop.frame(&mut surface));
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = circuit(6);
        let mut b = circuit(6);
        let mut sa = RecordingSurface::new();
        let mut sb = RecordingSurface::new();
        for i in 0..200 {
            let p = (300.0 + i as f32, 400.0);
            a.pointer_moved(p.0, p.1);
            b.pointer_moved(p.0, p.1);
            a.frame(&mut sa);
            b.frame(&mut sb);
            assert_eq!(sa.commands(), sb.commands());
        }
    }

    #[test]
    fn test_drift_variant() {
        let mut backdrop = Backdrop::new(drift_config(), 7).unwrap();
        backdrop.initialize(1440.0, 900.0);
        let stats = backdrop.stats();
        assert_eq!(stats.variant, Variant::Drift);
        assert_eq!(stats.points, 100);
        assert_eq!(stats.edges, 0);

        let mut surface = RecordingSurface::new();
        for _ in 0..50 {
            backdrop.pointer_moved(720.0, 450.0);
            assert!(backdrop.frame(&mut surface));
        }
        if let Field::Drift(f) = backdrop.field() {
            for p in f.particles() {
                assert!((0.0..=1440.0).contains(&p.pos.x));
                assert!((0.0..=900.0).contains(&p.pos.y));
            }
        }
    }

    #[test]
    fn test_initialize_while_hidden_waits() {
        let mut backdrop = Backdrop::new(BackdropConfig::default(), 8).unwrap();
        backdrop.set_visible(false);
        backdrop.initialize(800.0, 600.0);
        assert!(!backdrop.is_running());
        backdrop.set_visible(true);
        assert!(backdrop.is_running());
    }

    #[test]
    fn test_seed_from_config() {
        let config = BackdropConfig {
            seed: Some(99),
            ..BackdropConfig::default()
        };
        let mut a = Backdrop::from_config(config.clone()).unwrap();
        let mut b = Backdrop::new(config, 99).unwrap();
        a.initialize(1000.0, 700.0);
        b.initialize(1000.0, 700.0);
        assert_eq!(nodes(&a).nodes(), nodes(&b).nodes());
    }

    #[test]
    fn test_default_backdrop_runs() {
        let mut backdrop = Backdrop::default();
        assert_eq!(backdrop.config().variant, Variant::Circuit);
        backdrop.initialize(800.0, 600.0);
        let mut surface = RecordingSurface::new();
        assert!(backdrop.frame(&mut surface));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BackdropConfig::default();
        config.circuit.spacing = 0.0;
        assert!(matches!(
            Backdrop::new(config, 1),
            Err(ConfigError::Invalid { field: "circuit.spacing", .. })
        ));

        let mut config = BackdropConfig::default();
        config.circuit.omit_probability = 1.5;
        assert!(matches!(
            Backdrop::from_config(config),
            Err(ConfigError::Invalid { field: "circuit.omit_probability", .. })
        ));
    }

    #[test]
    fn test_drift_populates_after_zero_width_start() {
        let mut backdrop = Backdrop::new(drift_config(), 10).unwrap();
        backdrop.initialize(0.0, 600.0);
        assert_eq!(backdrop.stats().points, 0);

        assert!(backdrop.resize(1440.0, 900.0));
        assert_eq!(backdrop.stats().points, 100);

        // Count stays fixed once populated
        assert!(backdrop.resize(600.0, 900.0));
        assert_eq!(backdrop.stats().points, 100);
    }
}
