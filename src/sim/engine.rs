//! Game engine: level flow state machine and the per-tick simulation step
//!
//! The engine exclusively owns the tile map and every live entity. One call
//! to [`GameEngine::update`] advances exactly one fixed step.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{Bullet, Direction, EnemyKind, Explosion, Tank, Team, palette};
use super::level::LayoutError;
use super::map::TileMap;
use super::rect::RectF;
use crate::consts::*;
use crate::platform::InputState;
use crate::settings::{ConfigError, Settings};

/// Errors raised while building an engine or loading terrain
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    Paused,
    /// Kill goal reached, waiting for confirm
    LevelWon,
    /// Lives exhausted or base destroyed
    GameOver,
    /// Final level won
    GameCleared,
}

impl GamePhase {
    /// Won, over or cleared
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GamePhase::LevelWon | GamePhase::GameOver | GamePhase::GameCleared
        )
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { team: Team },
    TerrainHit,
    BulletsCollided,
    TankDestroyed { team: Team },
    BaseDestroyed,
    PlayerRespawned,
    EnemySpawned { kind: EnemyKind },
    LevelWon { level: u32 },
    GameOver,
    GameCleared,
}

/// HUD snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub total_levels: u32,
    pub kills: u32,
    pub kill_goal: u32,
    pub remaining_to_win: u32,
    pub paused: bool,
    pub game_over: bool,
    pub level_won: bool,
    pub game_cleared: bool,
}

pub struct GameEngine {
    pub(crate) settings: Settings,
    pub(crate) map: TileMap,
    pub(crate) rng: Pcg32,
    /// Live tanks in spawn order; the player keeps its slot across respawns
    /// and stays in the list while dead
    pub(crate) tanks: Vec<Tank>,
    pub(crate) bullets: Vec<Bullet>,
    pub(crate) explosions: Vec<Explosion>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) phase: GamePhase,
    pub(crate) level: u32,
    pub(crate) lives: u32,
    pub(crate) score: u64,
    pub(crate) kills: u32,
    pub(crate) spawn_timer: f32,
    pub(crate) remaining_to_spawn: u32,
    /// Render clock; keeps running while paused or over
    pub(crate) time: f32,
    next_id: u32,
}

impl GameEngine {
    /// Validate `settings`, build the arena and start level 1
    pub fn new(settings: Settings) -> Result<Self, EngineError> {
        let rng = Pcg32::seed_from_u64(settings.seed);
        Self::with_rng(settings, rng)
    }

    /// Like [`GameEngine::new`] with an explicit random source
    pub fn with_rng(settings: Settings, rng: Pcg32) -> Result<Self, EngineError> {
        settings.validate()?;
        let map = TileMap::new(settings.tile_size, settings.map_width, settings.map_height)?;
        let mut engine = Self {
            lives: settings.starting_lives,
            settings,
            map,
            rng,
            tanks: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            events: Vec::new(),
            phase: GamePhase::Running,
            level: 1,
            score: 0,
            kills: 0,
            spawn_timer: 0.0,
            remaining_to_spawn: 0,
            time: 0.0,
            next_id: 1,
        };
        engine.reset_to_level1()?;
        Ok(engine)
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Full restart: level 1, fresh lives and score
    pub fn reset_to_level1(&mut self) -> Result<(), EngineError> {
        self.level = 1;
        self.lives = self.settings.starting_lives;
        self.score = 0;
        self.load_level(1)
    }

    fn load_level(&mut self, level: u32) -> Result<(), EngineError> {
        self.map.load_level(level)?;
        self.level = level;
        self.begin_level();
        log::info!(
            "Level {} loaded: goal {} kills, {} lives",
            level,
            self.settings.kill_goal,
            self.lives
        );
        Ok(())
    }

    /// Replace the current level's terrain with an ASCII layout and restart it
    pub fn load_custom_level(&mut self, layout: &str) -> Result<(), EngineError> {
        self.map.load_layout(layout)?;
        self.begin_level();
        log::info!("Custom layout loaded for level {}", self.level);
        Ok(())
    }

    /// Reset per-level state over freshly loaded terrain
    fn begin_level(&mut self) {
        self.tanks.clear();
        self.bullets.clear();
        self.explosions.clear();

        self.kills = 0;
        self.phase = GamePhase::Running;

        let id = self.next_entity_id();
        let player = Tank::player(id, self.map.player_spawn_point(), self.settings.player_speed);
        self.tanks.push(player);

        self.remaining_to_spawn = self.settings.kill_goal;
        self.spawn_timer = self.settings.first_spawn_delay;
    }

    /// Pause or resume; ignored once won, over or cleared
    pub fn toggle_pause(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = match self.phase {
            GamePhase::Paused => GamePhase::Running,
            _ => GamePhase::Paused,
        };
    }

    /// Confirm action: restart after game over or clear, advance after a win
    pub fn handle_confirm(&mut self) -> Result<(), EngineError> {
        match self.phase {
            GamePhase::GameOver | GamePhase::GameCleared => {
                log::info!("Restarting from level 1");
                self.reset_to_level1()
            }
            GamePhase::LevelWon if self.level < self.settings.total_levels => {
                self.load_level(self.level + 1)
            }
            GamePhase::LevelWon => {
                self.phase = GamePhase::GameCleared;
                self.events.push(GameEvent::GameCleared);
                log::info!("All levels cleared with score {}", self.score);
                Ok(())
            }
            GamePhase::Running | GamePhase::Paused => Ok(()),
        }
    }

    /// Advance one fixed step
    pub fn update(&mut self, dt: f32, input: &InputState) {
        self.time += dt;
        if self.phase != GamePhase::Running {
            return;
        }

        self.spawn_enemies(dt);

        for i in 0..self.tanks.len() {
            let mut tank = self.tanks[i];
            if !tank.alive {
                continue;
            }
            if tank.is_player() {
                self.update_player(&mut tank, dt, input);
            } else {
                self.update_enemy(&mut tank, dt);
            }
            self.tanks[i] = tank;
        }

        self.update_bullets(dt);
        self.collide_bullets();
        self.hit_tanks();

        for fx in &mut self.explosions {
            fx.update(dt);
        }
        self.explosions.retain(|fx| fx.alive);
        self.bullets.retain(|b| b.alive);
        self.tanks.retain(|t| t.alive || t.is_player());
    }

    fn spawn_enemies(&mut self, dt: f32) {
        if self.remaining_to_spawn == 0 {
            return;
        }
        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 {
            return;
        }

        let alive = self.tanks.iter().filter(|t| t.alive && !t.is_player()).count();
        if alive < self.settings.enemy_cap {
            let points = self.map.enemy_spawn_points();
            let pos = points[self.rng.random_range(0..points.len())];
            let kind = EnemyKind::from_roll(self.rng.random::<f64>(), self.level);

            let mut enemy = Tank::enemy(0, pos, self.settings.enemy_speed, kind);
            enemy.fire_timer = FIRST_SHOT_DELAY + self.next_fire_interval(&enemy) * FIRST_SHOT_SCALE;
            let body = palette::enemy_body(self.rng.random_range(0..palette::ENEMY_PALETTE.len()));
            enemy.body_color = body;
            enemy.accent_color = palette::accent_for(body);

            let bounds = enemy.bounds();
            if !self.map.is_rect_blocked(&bounds) && !self.any_tank_intersects(&bounds) {
                enemy.id = self.next_entity_id();
                self.tanks.push(enemy);
                self.remaining_to_spawn -= 1;
                self.events.push(GameEvent::EnemySpawned { kind });
                log::debug!(
                    "Enemy {} ({:?}) spawned at {:?}, {} left to spawn",
                    enemy.id,
                    kind,
                    pos,
                    self.remaining_to_spawn
                );
            } else {
                log::debug!("Spawn at {:?} blocked, retrying", pos);
            }
        }

        self.spawn_timer = self.settings.spawn_interval;
    }

    fn any_tank_intersects(&self, r: &RectF) -> bool {
        self.tanks.iter().any(|t| t.alive && t.bounds().intersects(r))
    }

    fn respawn_player(&mut self) {
        let id = self.next_entity_id();
        let player = Tank::player(id, self.map.player_spawn_point(), self.settings.player_speed);
        match self.tanks.iter_mut().find(|t| t.is_player()) {
            Some(slot) => *slot = player,
            None => self.tanks.push(player),
        }
        self.events.push(GameEvent::PlayerRespawned);
    }

    fn update_player(&mut self, tank: &mut Tank, dt: f32, input: &InputState) {
        let axis = input.move_axis();
        if axis.length_squared() > 0.0001 {
            tank.try_set_dir_snap(Direction::from_vector(axis), self.map.tile_size());
            self.move_tank(tank, dt);
        } else {
            tank.vel = Vec2::ZERO;
        }

        if input.fire() {
            self.try_fire(tank);
        }

        tank.update(dt);
    }

    fn update_enemy(&mut self, tank: &mut Tank, dt: f32) {
        let tile_size = self.map.tile_size();

        tank.ai_timer -= dt;
        if tank.ai_timer <= 0.0 {
            tank.ai_timer = AI_INTERVAL_BASE + self.rng.random::<f32>() * AI_INTERVAL_SPREAD;
            let dir = self.random_direction();
            tank.try_set_dir_snap(dir, tile_size);
        }

        if !self.move_tank(tank, dt) {
            // Stuck: turn right away
            let dir = self.random_direction();
            tank.try_set_dir_snap(dir, tile_size);
        }

        tank.fire_timer -= dt;
        if tank.fire_timer <= 0.0 {
            let chance = tank.kind.map_or(0.0, |k| k.profile().fire_chance);
            if self.rng.random::<f64>() < chance {
                self.try_fire(tank);
            }
            tank.fire_timer = self.next_fire_interval(tank);
        }

        tank.update(dt);
    }

    fn random_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.random_range(0..Direction::ALL.len())]
    }

    /// Draw the next shot interval from the tank's age-ramped window
    fn next_fire_interval(&mut self, tank: &Tank) -> f32 {
        let kind = tank.kind.unwrap_or(EnemyKind::Light);
        let (min, max) = kind.profile().interval_window(tank.age);
        min + self.rng.random::<f32>() * (max - min)
    }

    /// Step along the facing; rejected if terrain or another tank is in the way
    fn move_tank(&self, tank: &mut Tank, dt: f32) -> bool {
        tank.vel = tank.dir.to_unit() * tank.speed;
        let next = tank.pos + tank.vel * dt;
        let next_bounds = Tank::bounds_at(next);

        if self.map.is_rect_blocked(&next_bounds) {
            tank.vel = Vec2::ZERO;
            return false;
        }

        let bumped = self
            .tanks
            .iter()
            .any(|other| other.alive && other.id != tank.id && next_bounds.intersects(&other.bounds()));
        if bumped {
            tank.vel = Vec2::ZERO;
            return false;
        }

        tank.pos = next;
        true
    }

    fn try_fire(&mut self, tank: &mut Tank) {
        if tank.shoot_cooldown > 0.0 {
            return;
        }

        let (cap, cooldown) = match tank.team {
            Team::Player => (self.settings.player_bullet_cap, self.settings.player_cooldown),
            Team::Enemy => (self.settings.enemy_bullet_cap, self.settings.enemy_cooldown),
        };
        let in_flight = self
            .bullets
            .iter()
            .filter(|b| b.alive && b.team == tank.team)
            .count();
        if in_flight >= cap {
            return;
        }

        let id = self.next_entity_id();
        self.bullets.push(Bullet::new(
            id,
            tank.muzzle(),
            tank.dir,
            tank.team,
            self.settings.bullet_speed,
        ));
        self.events.push(GameEvent::Fired { team: tank.team });
        tank.shoot_cooldown = cooldown;
    }

    fn spawn_explosion(&mut self, pos: Vec2, big: bool) {
        let id = self.next_entity_id();
        self.explosions.push(Explosion::new(id, pos, big));
    }

    fn enter_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver);
        log::info!("Game over on level {} with score {}", self.level, self.score);
    }

    fn update_bullets(&mut self, dt: f32) {
        let world = self.map.world_rect();
        for i in 0..self.bullets.len() {
            let mut bullet = self.bullets[i];
            if !bullet.alive {
                continue;
            }
            bullet.update(dt);

            if !world.contains(bullet.pos) {
                bullet.alive = false;
            } else {
                let hit = self.map.try_bullet_hit(&bullet.bounds(), bullet.dir);
                if hit.blocked {
                    bullet.alive = false;
                    if hit.hit_base {
                        self.spawn_explosion(bullet.pos, true);
                        self.events.push(GameEvent::BaseDestroyed);
                        self.enter_game_over();
                    } else {
                        self.spawn_explosion(bullet.pos, false);
                        self.events.push(GameEvent::TerrainHit);
                    }
                }
            }
            self.bullets[i] = bullet;
        }
    }

    fn collide_bullets(&mut self) {
        for i in 0..self.bullets.len() {
            if !self.bullets[i].alive {
                continue;
            }
            for j in (i + 1)..self.bullets.len() {
                if !self.bullets[j].alive {
                    continue;
                }
                if self.bullets[i].bounds().intersects(&self.bullets[j].bounds()) {
                    self.bullets[i].alive = false;
                    self.bullets[j].alive = false;
                    let mid = (self.bullets[i].pos + self.bullets[j].pos) * 0.5;
                    self.spawn_explosion(mid, false);
                    self.events.push(GameEvent::BulletsCollided);
                    break;
                }
            }
        }
    }

    fn hit_tanks(&mut self) {
        for i in 0..self.bullets.len() {
            let bullet = self.bullets[i];
            if !bullet.alive {
                continue;
            }
            let bounds = bullet.bounds();
            let target = self
                .tanks
                .iter()
                .position(|t| t.alive && t.team != bullet.team && bounds.intersects(&t.bounds()));
            let Some(t) = target else {
                continue;
            };

            self.bullets[i].alive = false;
            self.tanks[t].alive = false;
            let tank = self.tanks[t];
            self.spawn_explosion(tank.pos, true);
            self.events.push(GameEvent::TankDestroyed { team: tank.team });

            if tank.is_player() {
                self.lives = self.lives.saturating_sub(1);
                if self.lives == 0 {
                    self.enter_game_over();
                } else {
                    log::info!("Player destroyed, {} lives left", self.lives);
                    self.respawn_player();
                }
            } else {
                self.score += self.settings.score_per_kill;
                self.kills = (self.kills + 1).min(self.settings.kill_goal);
                if self.kills >= self.settings.kill_goal && self.phase == GamePhase::Running {
                    self.phase = GamePhase::LevelWon;
                    self.remaining_to_spawn = 0;
                    self.events.push(GameEvent::LevelWon { level: self.level });
                    log::info!("Level {} won with score {}", self.level, self.score);
                }
            }
        }
    }

    // === Read-only surface ===

    pub fn status(&self) -> GameStatus {
        GameStatus {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            level: self.level,
            total_levels: self.settings.total_levels,
            kills: self.kills,
            kill_goal: self.settings.kill_goal,
            remaining_to_win: self.remaining_to_win(),
            paused: self.is_paused(),
            game_over: self.is_game_over(),
            level_won: self.is_level_won(),
            game_cleared: self.is_game_cleared(),
        }
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn total_levels(&self) -> u32 {
        self.settings.total_levels
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn kill_goal(&self) -> u32 {
        self.settings.kill_goal
    }

    pub fn remaining_to_win(&self) -> u32 {
        self.settings.kill_goal.saturating_sub(self.kills)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_level_won(&self) -> bool {
        self.phase == GamePhase::LevelWon
    }

    pub fn is_game_cleared(&self) -> bool {
        self.phase == GamePhase::GameCleared
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    pub fn player(&self) -> Option<&Tank> {
        self.tanks.iter().find(|t| t.is_player())
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }
}
