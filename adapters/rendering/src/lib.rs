#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tower Defence adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};
use tower_defence_core::{
    CellCoord, EnemyId, EnemyView, ProjectileView, SimulationConfig, SimulationCounters,
    TileKind, TurretId, TurretView,
};
use tower_defence_world::Grid;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill colors used for each kind of scene element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Background behind the grid.
    pub clear: Color,
    /// Empty tiles.
    pub empty: Color,
    /// Path tiles.
    pub path: Color,
    /// Waypoint tiles.
    pub waypoint: Color,
    /// Turret slot tiles.
    pub turret_slot: Color,
    /// Enemies at full health.
    pub enemy: Color,
    /// Turret bodies.
    pub turret: Color,
    /// Projectiles.
    pub projectile: Color,
}

impl Palette {
    /// Color of the provided tile kind.
    #[must_use]
    pub const fn tile(&self, kind: TileKind) -> Color {
        match kind {
            TileKind::Empty => self.empty,
            TileKind::Path => self.path,
            TileKind::Waypoint => self.waypoint,
            TileKind::TurretSlot => self.turret_slot,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            clear: Color::from_rgb_u8(0x10, 0x12, 0x16),
            empty: Color::from_rgb_u8(0x2b, 0x5d, 0x34),
            path: Color::from_rgb_u8(0xc2, 0xa8, 0x78),
            waypoint: Color::from_rgb_u8(0xd9, 0xc0, 0x8f),
            turret_slot: Color::from_rgb_u8(0x5a, 0x5f, 0x66),
            enemy: Color::from_rgb_u8(0xc8, 0x2a, 0x36),
            turret: Color::from_rgb_u8(0x58, 0x47, 0xff),
            projectile: Color::from_rgb_u8(0xff, 0xc1, 0x07),
        }
    }
}

/// Square tile drawn at a fixed world-space location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Corner of the tile with the smallest coordinates.
    pub origin: Vec2,
    /// Side length of the tile in world units.
    pub length: f32,
    /// Fill color.
    pub color: Color,
}

/// Enemy drawn as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Centre of the enemy in world units.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Remaining hit points.
    pub health: u32,
    /// Fill color, lightened as the enemy takes damage.
    pub color: Color,
}

/// Turret drawn at its slot with an optional range ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretPresentation {
    /// Identifier of the turret.
    pub id: TurretId,
    /// Centre of the turret slot.
    pub position: Vec2,
    /// Detection radius.
    pub range: f32,
    /// Whether the turret could fire this frame.
    pub ready: bool,
    /// Fill color.
    pub color: Color,
}

/// Projectile drawn as a small filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre of the projectile.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Counters shown as on-screen text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Enemies currently alive.
    pub live_enemies: usize,
    /// Projectiles currently in flight.
    pub live_projectiles: usize,
    /// Enemies spawned since the start.
    pub total_spawned: u32,
}

impl From<SimulationCounters> for Hud {
    fn from(counters: SimulationCounters) -> Self {
        Self {
            live_enemies: counters.live_enemies,
            live_projectiles: counters.live_projectiles,
            total_spawned: counters.total_spawned,
        }
    }
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "enemies: {}  bullets: {}  spawned: {}",
            self.live_enemies, self.live_projectiles, self.total_spawned
        )
    }
}

/// Scene description combining the static grid and every live inhabitant.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tiles of the level in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Live enemies.
    pub enemies: Vec<EnemyPresentation>,
    /// Every turret.
    pub turrets: Vec<TurretPresentation>,
    /// Live projectiles.
    pub projectiles: Vec<ProjectilePresentation>,
    /// On-screen counters.
    pub hud: Hud,
    /// Side length of the whole grid in world units.
    pub side_length: f32,
}

impl Scene {
    /// Creates a scene holding only the level tiles.
    #[must_use]
    pub fn new(grid: &Grid, palette: &Palette) -> Self {
        let dimension = grid.dimension();
        let mut tiles = Vec::new();
        for row in 0..dimension {
            for column in 0..dimension {
                let cell = CellCoord::new(row, column);
                if let Some(kind) = grid.tile(cell) {
                    tiles.push(TilePresentation {
                        origin: grid.cell_bounds(cell).min,
                        length: grid.tile_length(),
                        color: palette.tile(kind),
                    });
                }
            }
        }

        Self {
            tiles,
            enemies: Vec::new(),
            turrets: Vec::new(),
            projectiles: Vec::new(),
            hud: Hud::default(),
            side_length: grid.side_length(),
        }
    }

    /// Replaces the dynamic contents with the latest simulation snapshots.
    pub fn refresh(&mut self, snapshot: SceneSnapshot<'_>, palette: &Palette) {
        let SceneSnapshot {
            enemies,
            turrets,
            projectiles,
            counters,
            config,
        } = snapshot;

        self.enemies.clear();
        self.enemies.extend(enemies.iter().map(|enemy| {
            let lost = config.enemy.health.saturating_sub(enemy.health.get());
            let fraction = lost as f32 / config.enemy.health.max(1) as f32;
            EnemyPresentation {
                id: enemy.id,
                position: enemy.position,
                radius: config.enemy.radius,
                health: enemy.health.get(),
                color: palette.enemy.lighten(fraction * 0.6),
            }
        }));

        self.turrets.clear();
        self.turrets.extend(turrets.iter().map(|turret| TurretPresentation {
            id: turret.id,
            position: turret.position,
            range: turret.range,
            ready: turret.is_ready(),
            color: palette.turret,
        }));

        self.projectiles.clear();
        self.projectiles.extend(
            projectiles
                .iter()
                .filter(|projectile| projectile.is_active())
                .map(|projectile| ProjectilePresentation {
                    position: projectile.position,
                    radius: config.projectile.radius,
                    color: palette.projectile,
                }),
        );

        self.hud = counters.into();
    }
}

/// Borrowed simulation state consumed by [`Scene::refresh`].
#[derive(Clone, Copy, Debug)]
pub struct SceneSnapshot<'a> {
    /// Live enemies.
    pub enemies: &'a EnemyView,
    /// Every turret.
    pub turrets: &'a TurretView,
    /// Live projectiles.
    pub projectiles: &'a ProjectileView,
    /// Scalar counters.
    pub counters: SimulationCounters,
    /// Tuning supplying radii and full health.
    pub config: &'a SimulationConfig,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tower Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the elapsed frame time and
    /// mutates the scene before it is presented. Returning `false` asks the
    /// backend to stop after presenting the frame.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> bool + 'static;
}

/// Fixed frame pacing shared by backends that do not own a real clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameClock {
    frame_time: Duration,
}

impl FrameClock {
    /// Creates a clock producing `fps` frames per simulated second.
    ///
    /// Returns an error when `fps` is zero.
    pub fn new(fps: u32) -> Result<Self, RenderingError> {
        if fps == 0 {
            return Err(RenderingError::InvalidFrameRate { fps });
        }

        Ok(Self {
            frame_time: Duration::from_secs(1) / fps,
        })
    }

    /// Time elapsed between two frames.
    #[must_use]
    pub const fn frame_time(&self) -> Duration {
        self.frame_time
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Frame rates must be positive to yield a finite frame time.
    InvalidFrameRate {
        /// Provided frame rate that failed validation.
        fps: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrameRate { fps } => {
                write!(f, "frame rate must be positive (received {fps})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defence_core::{
        EnemySnapshot, EnemyState, Health, ProjectileId, ProjectileSnapshot, TurretSnapshot,
    };
    use tower_defence_world::Level;

    fn scene() -> Scene {
        let level = Level::classic(80.0).expect("classic layout is valid");
        Scene::new(level.grid(), &Palette::default())
    }

    #[test]
    fn scene_lays_out_every_tile() {
        let scene = scene();
        assert_eq!(scene.tiles.len(), 100);
        assert_eq!(scene.tiles[0].origin, Vec2::ZERO);
        assert_eq!(scene.tiles[11].origin, Vec2::new(80.0, 80.0));
        assert_eq!(scene.tiles[11].color, Palette::default().turret_slot);
        assert_eq!(scene.side_length, 800.0);
    }

    #[test]
    fn refresh_replaces_dynamic_contents() {
        let mut scene = scene();
        let config = SimulationConfig::default();
        let enemies = EnemyView::from_snapshots(vec![EnemySnapshot {
            id: EnemyId::new(4),
            position: Vec2::new(40.0, 40.0),
            health: Health::new(3),
            state: EnemyState::DEPARTING,
        }]);
        let turrets = TurretView::from_snapshots(vec![TurretSnapshot {
            id: TurretId::new(0),
            cell: CellCoord::new(1, 1),
            position: Vec2::new(120.0, 120.0),
            range: 250.0,
            fire_interval: Duration::from_millis(500),
            cooldown: Duration::from_millis(750),
        }]);
        let mut spent = ProjectileSnapshot {
            id: ProjectileId::new(0),
            position: Vec2::ZERO,
            direction: Vec2::X,
            speed: 480.0,
            lifetime: Duration::ZERO,
            enabled: true,
            expired: false,
        };
        let live = spent;
        spent.id = ProjectileId::new(1);
        spent.enabled = false;
        let projectiles = ProjectileView::from_snapshots(vec![live, spent]);
        let counters = SimulationCounters {
            live_enemies: 1,
            live_projectiles: 2,
            total_spawned: 5,
        };

        scene.refresh(
            SceneSnapshot {
                enemies: &enemies,
                turrets: &turrets,
                projectiles: &projectiles,
                counters,
                config: &config,
            },
            &Palette::default(),
        );

        assert_eq!(scene.enemies.len(), 1);
        assert_eq!(scene.enemies[0].radius, 20.0);
        assert_eq!(scene.enemies[0].color, Palette::default().enemy);
        assert!(scene.turrets[0].ready);
        assert_eq!(scene.projectiles.len(), 1);
        assert_eq!(scene.hud.total_spawned, 5);
    }

    #[test]
    fn hud_lists_every_counter() {
        let hud = Hud {
            live_enemies: 2,
            live_projectiles: 7,
            total_spawned: 9,
        };
        assert_eq!(hud.to_string(), "enemies: 2  bullets: 7  spawned: 9");
    }

    #[test]
    fn damaged_enemies_are_drawn_lighter() {
        let base = Color::from_rgb_u8(200, 0, 0);
        let lighter = base.lighten(0.5);
        assert!(lighter.green > base.green);
        assert_eq!(lighter.alpha, 1.0);
    }

    #[test]
    fn frame_clock_rejects_zero_fps() {
        assert_eq!(
            FrameClock::new(0),
            Err(RenderingError::InvalidFrameRate { fps: 0 })
        );
        assert_eq!(
            FrameClock::new(50).map(|clock| clock.frame_time()),
            Ok(Duration::from_millis(20))
        );
    }
}
