//! Drift field: free-roaming particles that wrap at the surface edges and are
//! joined by faint lines when close to each other.

use rand::Rng;
use tracing::debug;

use super::config::DriftParams;
use super::math::{self, Vec2};
use super::palette::{self, Rgba};
use super::surface::Surface;

const LINK_WIDTH: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub velocity: Vec2,
    /// Velocity the particle relaxes back to once the pointer is away
    pub base_velocity: Vec2,
    pub size: f32,
    /// Hue in degrees
    pub hue: f32,
}

impl Particle {
    fn spawn<R: Rng>(width: f32, height: f32, params: &DriftParams, rng: &mut R) -> Self {
        let pos = Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height);
        let max = params.max_drift_speed;
        let base_velocity = Vec2::new(rng.gen_range(-max..=max), rng.gen_range(-max..=max));
        Self {
            pos,
            velocity: base_velocity,
            base_velocity,
            size: rng.gen_range(params.min_size..=params.max_size),
            hue: rng.gen_range(params.hue_min..=params.hue_max),
        }
    }

    /// Apply pointer repulsion (or relax towards the base drift), move, and
    /// wrap around the surface edges.
    pub fn update(&mut self, pointer: Option<Vec2>, width: f32, height: f32, params: &DriftParams) {
        let repelled = pointer.and_then(|p| {
            let (dir, distance) = math::direction_and_length(self.pos - p);
            (distance < params.repel_radius).then(|| {
                let force = (params.repel_radius - distance) / params.repel_radius;
                dir * (force * params.repel_strength)
            })
        });

        match repelled {
            Some(push) => self.velocity += push,
            None => self.velocity += (self.base_velocity - self.velocity) * params.return_rate,
        }

        self.pos += self.velocity;
        self.pos.x = wrap(self.pos.x, width);
        self.pos.y = wrap(self.pos.y, height);
    }

    pub fn color(&self) -> Rgba {
        Rgba::from_hsl(
            self.hue,
            palette::drift::SATURATION,
            palette::drift::LIGHTNESS,
            palette::drift::PARTICLE_ALPHA,
        )
    }
}

/// Send a coordinate that left [0, max] to the opposite edge
fn wrap(value: f32, max: f32) -> f32 {
    if value < 0.0 {
        max
    } else if value > max {
        0.0
    } else {
        value
    }
}

#[derive(Debug)]
pub struct DriftField {
    params: DriftParams,
    width: f32,
    height: f32,
    particles: Vec<Particle>,
}

impl DriftField {
    pub fn new(params: DriftParams) -> Self {
        Self {
            params,
            width: 0.0,
            height: 0.0,
            particles: Vec::new(),
        }
    }

    /// Number of particles for a surface of the given width
    pub fn particle_count(&self, width: f32) -> usize {
        let by_width = (width.max(0.0) / self.params.width_per_particle).floor() as usize;
        by_width.min(self.params.max_particles)
    }

    /// Create the particle set. The count is fixed from here on.
    pub fn populate<R: Rng>(&mut self, width: f32, height: f32, rng: &mut R) {
        let count = self.particle_count(width);
        self.particles = (0..count)
            .map(|_| Particle::spawn(width, height, &self.params, rng))
            .collect();
        self.width = width;
        self.height = height;

        debug!(width, height, particles = count, "Drift particles generated");
    }

    /// Adopt new bounds, pulling particles that are now outside back in
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        for particle in &mut self.particles {
            particle.pos.x = particle.pos.x.clamp(0.0, width.max(0.0));
            particle.pos.y = particle.pos.y.clamp(0.0, height.max(0.0));
        }
        debug!(width, height, particles = self.particles.len(), "Drift field resized");
    }

    /// One frame: move and draw every particle, then the proximity lines
    pub fn step<S: Surface + ?Sized>(&mut self, pointer: Option<Vec2>, surface: &mut S) {
        for particle in &mut self.particles {
            particle.update(pointer, self.width, self.height, &self.params);
            surface.fill_circle(particle.pos, particle.size, particle.color());
        }
        self.draw_links(surface);
    }

    /// O(n²) over all pairs; n is capped by `max_particles`
    fn draw_links<S: Surface + ?Sized>(&self, surface: &mut S) {
        let max = self.params.link_distance;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = a.pos.distance(b.pos);
                if distance >= max {
                    continue;
                }
                let alpha = (1.0 - distance / max) * self.params.link_alpha;
                let color = Rgba::from_hsl(
                    palette::blend_hue(a.hue, b.hue),
                    palette::drift::SATURATION,
                    palette::drift::LIGHTNESS,
                    alpha,
                );
                surface.stroke_line(a.pos, b.pos, LINK_WIDTH, color);
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub(crate) fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::RecordingSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(width: f32, height: f32, seed: u64) -> DriftField {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut field = DriftField::new(DriftParams::default());
        field.populate(width, height, &mut rng);
        field
    }

    fn particle_at(x: f32, y: f32) -> Particle {
        Particle {
            pos: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            base_velocity: Vec2::ZERO,
            size: 2.0,
            hue: 200.0,
        }
    }

    #[test]
    fn test_particle_count_from_width() {
        assert_eq!(field(1440.0, 900.0, 1).particles().len(), 100);
        assert_eq!(field(600.0, 900.0, 1).particles().len(), 50);
        assert_eq!(field(11.0, 900.0, 1).particles().len(), 0);
        assert_eq!(field(0.0, 0.0, 1).particles().len(), 0);
    }

    #[test]
    fn test_populate_within_bounds() {
        for seed in 0..5 {
            let field = field(1280.0, 720.0, seed);
            for p in field.particles() {
                assert!((0.0..=1280.0).contains(&p.pos.x));
                assert!((0.0..=720.0).contains(&p.pos.y));
                assert!((190.0..=270.0).contains(&p.hue));
            }
        }
    }

    #[test]
    fn test_updates_stay_in_bounds() {
        let params = DriftParams {
            repel_strength: 40.0,
            ..DriftParams::default()
        };
        let mut rng = StdRng::seed_from_u64(8);
        let mut field = DriftField::new(params);
        field.populate(800.0, 600.0, &mut rng);
        let mut surface = RecordingSurface::new();

        for frame in 0..500 {
            let t = frame as f32 * 0.05;
            let pointer = Vec2::new(400.0 + 300.0 * t.cos(), 300.0 + 200.0 * t.sin());
            surface.clear();
            field.step(Some(pointer), &mut surface);
            for p in field.particles() {
                assert!((0.0..=800.0).contains(&p.pos.x), "x = {}", p.pos.x);
                assert!((0.0..=600.0).contains(&p.pos.y), "y = {}", p.pos.y);
            }
        }
    }

    #[test]
    fn test_wraps_to_opposite_edge() {
        let params = DriftParams::default();
        let mut p = particle_at(799.5, 10.0);
        p.velocity = Vec2::new(1.0, -20.0);
        p.base_velocity = p.velocity;

        p.update(None, 800.0, 600.0, &params);
        assert_eq!(p.pos, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_pointer_repulsion_and_relax() {
        let params = DriftParams::default();
        let mut p = particle_at(400.0, 300.0);

        // Pointer 50 units left: pushed right by (100/150) * 0.5
        p.update(Some(Vec2::new(350.0, 300.0)), 800.0, 600.0, &params);
        let push = (100.0 / 150.0) * 0.5;
        assert!((p.velocity.x - push).abs() < 1e-5);
        assert_eq!(p.velocity.y, 0.0);

        // Away from pointer the velocity decays 5% towards the base drift
        let before = p.velocity.x;
        p.update(None, 800.0, 600.0, &params);
        assert!((p.velocity.x - before * 0.95).abs() < 1e-5);
    }

    #[test]
    fn test_pointer_on_particle_no_nan() {
        let params = DriftParams::default();
        let mut p = particle_at(100.0, 100.0);
        p.update(Some(Vec2::new(100.0, 100.0)), 800.0, 600.0, &params);
        assert!(p.pos.is_finite());
        assert!(p.velocity.is_finite());
    }

    #[test]
    fn test_link_alpha_fades_with_distance() {
        let mut field = DriftField::new(DriftParams::default());
        field.resize(800.0, 600.0);
        *field.particles_mut() = vec![
            particle_at(100.0, 100.0),
            particle_at(160.0, 100.0),
            particle_at(700.0, 500.0),
        ];
        let mut surface = RecordingSurface::new();
        field.draw_links(&mut surface);

        let lines: Vec<_> = surface.lines().collect();
        assert_eq!(lines.len(), 1);
        // (1 - 60/120) * 0.15 = 0.075
        assert_eq!(lines[0].3.a, (0.075_f32 * 255.0).round() as u8);
    }

    #[test]
    fn test_resize_keeps_count_and_clamps() {
        let mut field = field(1440.0, 900.0, 2);
        field.resize(1000.0, 700.0);
        field.resize(320.0, 480.0);
        assert_eq!(field.particles().len(), 100);
        assert_eq!(field.size(), (320.0, 480.0));
        for p in field.particles() {
            assert!(p.pos.x <= 320.0 && p.pos.y <= 480.0);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        assert_eq!(field(1024.0, 768.0, 77).particles(), field(1024.0, 768.0, 77).particles());
    }
}
