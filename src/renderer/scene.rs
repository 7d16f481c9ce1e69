//! Scene renderer: letterboxes the arena onto a surface and draws one frame
//!
//! Reads engine state only. Missing tile art falls back to flat colors.

use glam::Vec2;

use super::surface::{Color, DrawSurface, TileArt};
use super::vertex::{colors, with_alpha};
use crate::letterbox;
use crate::settings::RenderOptions;
use crate::sim::{Bullet, Explosion, GameEngine, GamePhase, RectF, Tank, Team, TileKind, TileMap};

/// Backdrop stripe spacing, width and scroll speed (screen pixels)
const STRIPE_SPACING: f32 = 48.0;
const STRIPE_WIDTH: f32 = 10.0;
const STRIPE_SPEED: f32 = 22.0;

const OVERLAY_FONT: f32 = 20.0;
const OVERLAY_X: f32 = 18.0;
const PAUSE_Y: f32 = 70.0;
const BANNER_Y: f32 = 96.0;

/// Visual size of a bullet badge (collision box stays smaller)
const BULLET_VISUAL: f32 = 10.0;

/// Draw one frame of `engine` into `surface` of `size` pixels
pub fn render<S: DrawSurface + ?Sized>(
    engine: &GameEngine,
    surface: &mut S,
    size: Vec2,
    art: Option<&dyn TileArt>,
    options: &RenderOptions,
) {
    let time = engine.time();
    let map = engine.map();

    surface.set_transform(1.0, Vec2::ZERO);
    draw_backdrop(surface, size, time, options);

    let (scale, offset) = letterbox(map.world_size(), size);
    if !(scale.is_finite() && scale > 0.0) {
        return;
    }

    surface.set_transform(scale, offset);
    draw_terrain(surface, map, time, art, options);

    for tank in engine.tanks().iter().filter(|t| t.alive) {
        draw_tank(surface, tank, options);
    }
    for bullet in engine.bullets().iter().filter(|b| b.alive) {
        draw_bullet(surface, bullet);
    }

    // Bushes cover whatever drives under them
    draw_bushes(surface, map, art);

    for fx in engine.explosions().iter().filter(|e| e.alive) {
        draw_explosion(surface, fx);
    }

    surface.stroke_rect(map.world_rect(), 3.0, colors::ARENA_BORDER);

    surface.set_transform(1.0, Vec2::ZERO);
    if options.overlay_text {
        if let Some((text, pos, color)) = overlay_message(engine) {
            surface.text(&text, pos, OVERLAY_FONT, color);
        }
    }
}

/// Overlay banner for the current phase, in screen space
pub fn overlay_message(engine: &GameEngine) -> Option<(String, Vec2, Color)> {
    let banner = Vec2::new(OVERLAY_X, BANNER_Y);
    match engine.phase() {
        GamePhase::Running => None,
        GamePhase::Paused => Some((
            "PAUSED (Esc)".to_string(),
            Vec2::new(OVERLAY_X, PAUSE_Y),
            colors::TEXT,
        )),
        GamePhase::LevelWon => {
            let text = if engine.level() < engine.total_levels() {
                format!("VICTORY!  (Enter -> Level {})", engine.level() + 1)
            } else {
                "VICTORY!  (Enter -> ALL CLEAR)".to_string()
            };
            Some((text, banner, colors::TEXT))
        }
        GamePhase::GameCleared => Some((
            "ALL CLEAR! (Enter to play again)".to_string(),
            banner,
            colors::TEXT_CLEARED,
        )),
        GamePhase::GameOver => Some((
            "GAME OVER (Enter to play again)".to_string(),
            banner,
            colors::TEXT_GAME_OVER,
        )),
    }
}

fn draw_backdrop<S: DrawSurface + ?Sized>(surface: &mut S, size: Vec2, time: f32, options: &RenderOptions) {
    surface.fill_rect(RectF::new(0.0, 0.0, size.x, size.y), colors::BACKDROP);
    if !options.backdrop_stripes {
        return;
    }
    let off = (time * STRIPE_SPEED) % STRIPE_SPACING;
    let mut x = -STRIPE_SPACING;
    while x < size.x + STRIPE_SPACING {
        surface.fill_rect(
            RectF::new(x + off, 0.0, STRIPE_WIDTH, size.y),
            colors::BACKDROP_STRIPE,
        );
        x += STRIPE_SPACING;
    }
}

fn draw_terrain<S: DrawSurface + ?Sized>(
    surface: &mut S,
    map: &TileMap,
    time: f32,
    art: Option<&dyn TileArt>,
    options: &RenderOptions,
) {
    surface.fill_rect(map.world_rect(), colors::ARENA);
    let bitmap = |kind: TileKind| art.and_then(|a| a.bitmap(kind));
    let ts = map.tile_size();

    for y in 0..map.height() {
        for x in 0..map.width() {
            let Some(tile) = map.tile(x, y) else {
                continue;
            };
            let r = map.tile_rect(x, y);
            match tile.kind {
                TileKind::Empty | TileKind::Bush => {}
                TileKind::Brick => {
                    for q in tile.brick_quadrants(ts, x, y) {
                        match bitmap(TileKind::Brick) {
                            Some(id) => {
                                surface.draw_bitmap(id, q);
                                surface.stroke_rect(q, 1.0, colors::BITMAP_OUTLINE);
                            }
                            None => {
                                surface.fill_rect(q, colors::BRICK);
                                surface.stroke_rect(q, 1.0, colors::BRICK_OUTLINE);
                            }
                        }
                    }
                }
                TileKind::Steel => match bitmap(TileKind::Steel) {
                    Some(id) => {
                        surface.draw_bitmap(id, r);
                        surface.stroke_rect(r, 2.0, colors::STEEL_INSET);
                    }
                    None => {
                        surface.fill_rect(r, colors::STEEL);
                        let inset = RectF::new(r.x + 2.0, r.y + 2.0, r.w - 4.0, r.h - 4.0);
                        surface.stroke_rect(inset, 2.0, colors::STEEL_INSET);
                    }
                },
                TileKind::Water => {
                    surface.fill_rect(r, colors::WATER);
                    let wave = if options.water_animation {
                        ((time * 3.0 + x as f32 * 0.7 + y as f32 * 0.9).sin() + 1.0) * 0.5
                    } else {
                        0.5
                    };
                    let alpha = (90.0 + wave * 80.0) / 255.0;
                    let band = RectF::new(r.x, r.y + r.h * 0.35, r.w, r.h * 0.18);
                    surface.fill_rect(band, with_alpha(colors::WATER_WAVE, alpha));
                }
                TileKind::Ice => {
                    surface.fill_rect(r, colors::ICE);
                    let mid = r.y + r.h * 0.5;
                    surface.line(
                        Vec2::new(r.x, mid),
                        Vec2::new(r.right(), mid),
                        2.0,
                        colors::ICE_STREAK,
                    );
                }
                TileKind::Base => {
                    surface.fill_rect(r, colors::BASE);
                    let emblem = RectF::new(r.x + r.w * 0.2, r.y + r.h * 0.25, r.w * 0.6, r.h * 0.5);
                    surface.fill_rect(emblem, colors::BASE_EMBLEM);
                    surface.stroke_rect(r, 2.0, colors::BASE_OUTLINE);
                }
            }
        }
    }
}

fn draw_bushes<S: DrawSurface + ?Sized>(surface: &mut S, map: &TileMap, art: Option<&dyn TileArt>) {
    let bitmap = art.and_then(|a| a.bitmap(TileKind::Bush));
    for y in 0..map.height() {
        for x in 0..map.width() {
            if map.tile(x, y).is_some_and(|t| t.kind == TileKind::Bush) {
                let r = map.tile_rect(x, y);
                match bitmap {
                    Some(id) => surface.draw_bitmap(id, r),
                    None => surface.fill_rect(r, colors::BUSH),
                }
            }
        }
    }
}

fn draw_tank<S: DrawSurface + ?Sized>(surface: &mut S, tank: &Tank, options: &RenderOptions) {
    let r = tank.bounds();
    surface.fill_rounded_rect(r, 4.0, tank.body_color);
    surface.stroke_rect(r, 2.0, colors::TANK_OUTLINE);

    let size = r.w;
    let forward = tank.dir.to_unit();
    surface.line(
        tank.pos + forward * (size * 0.1),
        tank.pos + forward * (size * 0.6),
        4.0,
        colors::TURRET,
    );
    surface.fill_circle(tank.pos + forward * 6.0, 2.2, tank.accent_color);

    if let (true, Some(kind)) = (options.kind_labels, tank.kind) {
        let font = size * 0.5;
        let corner = tank.pos - Vec2::new(font * 0.3, font * 0.5);
        surface.text(kind.profile().label, corner, font, colors::TEXT);
    }
}

fn draw_bullet<S: DrawSurface + ?Sized>(surface: &mut S, bullet: &Bullet) {
    let fill = match bullet.team {
        Team::Player => colors::PLAYER_BULLET,
        Team::Enemy => colors::ENEMY_BULLET,
    };
    let r = RectF::from_center(bullet.pos, BULLET_VISUAL);
    surface.fill_rounded_rect(r, BULLET_VISUAL * 0.4, fill);
    surface.stroke_rect(r, 1.0, colors::BULLET_OUTLINE);
}

fn draw_explosion<S: DrawSurface + ?Sized>(surface: &mut S, fx: &Explosion) {
    let alpha = fx.intensity() * 200.0 / 255.0;
    let radius = fx.radius();
    surface.fill_circle(fx.pos, radius, with_alpha(colors::EXPLOSION_OUTER, alpha));
    surface.fill_circle(fx.pos, radius * 0.55, with_alpha(colors::EXPLOSION_CORE, alpha));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::BitmapId;
    use crate::renderer::MeshSurface;
    use crate::settings::Settings;
    use std::collections::HashMap;

    /// Records calls instead of drawing
    #[derive(Default)]
    struct Recorder {
        transforms: Vec<(f32, Vec2)>,
        fills: usize,
        bitmaps: Vec<BitmapId>,
        texts: Vec<String>,
    }

    impl DrawSurface for Recorder {
        fn set_transform(&mut self, scale: f32, offset: Vec2) {
            self.transforms.push((scale, offset));
        }
        fn fill_rect(&mut self, _: RectF, _: Color) {
            self.fills += 1;
        }
        fn stroke_rect(&mut self, _: RectF, _: f32, _: Color) {}
        fn fill_rounded_rect(&mut self, _: RectF, _: f32, _: Color) {
            self.fills += 1;
        }
        fn fill_circle(&mut self, _: Vec2, _: f32, _: Color) {}
        fn line(&mut self, _: Vec2, _: Vec2, _: f32, _: Color) {}
        fn draw_bitmap(&mut self, id: BitmapId, _: RectF) {
            self.bitmaps.push(id);
        }
        fn text(&mut self, text: &str, _: Vec2, _: f32, _: Color) {
            self.texts.push(text.to_string());
        }
    }

    #[test]
    fn test_letterbox_transform() {
        let engine = GameEngine::new(Settings::default()).unwrap();
        let mut rec = Recorder::default();
        // World is 1400x728, so a 2800x2000 surface is width-limited
        render(&engine, &mut rec, Vec2::new(2800.0, 2000.0), None, &RenderOptions::default());
        let (scale, offset) = rec.transforms[1];
        assert!((scale - 2.0).abs() < 1e-6);
        assert!(offset.x.abs() < 1e-4);
        assert!((offset.y - (2000.0 - 728.0 * 2.0) * 0.5).abs() < 1e-3);
        // Overlay pass is back in screen space
        assert_eq!(*rec.transforms.last().unwrap(), (1.0, Vec2::ZERO));
    }

    #[test]
    fn test_flat_fallback_without_art() {
        let engine = GameEngine::new(Settings::default()).unwrap();
        let mut rec = Recorder::default();
        render(&engine, &mut rec, Vec2::new(800.0, 600.0), None, &RenderOptions::default());
        assert!(rec.bitmaps.is_empty());
        assert!(rec.fills > engine.map().width() * 2);
    }

    #[test]
    fn test_art_used_when_present() {
        let engine = GameEngine::new(Settings::default()).unwrap();
        let mut art = HashMap::new();
        art.insert(TileKind::Steel, BitmapId(7));
        let mut rec = Recorder::default();
        render(&engine, &mut rec, Vec2::new(800.0, 600.0), Some(&art), &RenderOptions::default());
        assert!(!rec.bitmaps.is_empty());
        assert!(rec.bitmaps.iter().all(|&id| id == BitmapId(7)));
    }

    #[test]
    fn test_overlay_follows_phase() {
        let mut engine = GameEngine::new(Settings::default()).unwrap();
        assert!(overlay_message(&engine).is_none());

        engine.toggle_pause();
        let mut rec = Recorder::default();
        render(&engine, &mut rec, Vec2::new(800.0, 600.0), None, &RenderOptions::default());
        assert_eq!(rec.texts, vec!["PAUSED (Esc)".to_string()]);

        engine.phase = GamePhase::LevelWon;
        let (text, _, _) = overlay_message(&engine).unwrap();
        assert!(text.contains("Level 2"));
        engine.level = 3;
        let (text, _, _) = overlay_message(&engine).unwrap();
        assert!(text.contains("ALL CLEAR"));
    }

    #[test]
    fn test_render_leaves_state_alone() {
        let engine = GameEngine::new(Settings::default()).unwrap();
        let before = (engine.status(), engine.tanks().to_vec(), engine.map().tiles().to_vec());
        let mut mesh = MeshSurface::new();
        render(&engine, &mut mesh, Vec2::new(1280.0, 720.0), None, &RenderOptions::default());
        assert!(mesh.triangle_count() > 0);
        assert_eq!(mesh.vertices().len() % 3, 0);
        let after = (engine.status(), engine.tanks().to_vec(), engine.map().tiles().to_vec());
        assert_eq!(before, after);
    }

    #[test]
    fn test_zero_surface_draws_backdrop_only() {
        let engine = GameEngine::new(Settings::default()).unwrap();
        let mut rec = Recorder::default();
        let options = RenderOptions {
            backdrop_stripes: false,
            ..RenderOptions::default()
        };
        render(&engine, &mut rec, Vec2::ZERO, None, &options);
        assert_eq!(rec.fills, 1);
        assert_eq!(rec.transforms.len(), 1);
    }
}
