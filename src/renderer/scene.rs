//! Frame to triangle list

use glam::Vec2;

use super::Frame;
use super::shapes::{circle, polygon, rect};
use super::vertex::{Vertex, colors, tint_color, with_alpha};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::settings::Settings;
use crate::sim::{Entity, Tint};

const STAR_COUNT: u32 = 36;
const PARTICLE_SEGMENTS: u32 = 8;

/// Build every vertex for a frame, back to front
pub fn build_scene(frame: &Frame<'_>, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    if settings.starfield {
        let t = if settings.starfield_scrolls() {
            frame.time_secs
        } else {
            0.0
        };
        starfield(&mut vertices, t);
    }

    if !frame.shows_field() {
        return vertices;
    }

    for bullet in frame.player_bullets.iter().chain(frame.enemy_bullets) {
        vertices.extend(rect(&bullet.bounds(), tint_color(bullet.tint())));
    }

    for enemy in frame.enemies.iter().filter(|e| e.alive) {
        vertices.extend(enemy_hull(enemy.center(), enemy.size));
    }

    if frame.player.alive {
        let bounds = frame.player.bounds();
        vertices.extend(player_hull(bounds.center(), bounds.size));
    }

    if settings.particles {
        for p in frame.particles {
            let color = with_alpha(tint_color(p.tint), p.alpha());
            vertices.extend(circle(p.pos, p.radius, color, PARTICLE_SEGMENTS));
        }
    }

    vertices
}

/// Drifting background stars
fn starfield(out: &mut Vec<Vertex>, t: f32) {
    for i in 0..STAR_COUNT {
        let fi = i as f32;
        let x = ((i * 73) as f32 % CANVAS_WIDTH + (t * 0.7 + fi).sin() * 60.0)
            .rem_euclid(CANVAS_WIDTH);
        let y = ((i * 211) as f32 % CANVAS_HEIGHT + t * 50.0 * fi).rem_euclid(CANVAS_HEIGHT);
        let radius = (i % 3 + 1) as f32;
        let color = colors::STARS[(i % 4) as usize];
        out.extend(circle(Vec2::new(x, y), radius, color, 6));
    }
}

/// Arrowhead ship with a cockpit dome
fn player_hull(center: Vec2, size: Vec2) -> Vec<Vertex> {
    let (hw, hh) = (size.x / 2.0, size.y / 2.0);
    let outline = [
        Vec2::new(0.0, -hh),
        Vec2::new(hw, hh),
        Vec2::new(0.0, hh / 2.0),
        Vec2::new(-hw, hh),
    ];
    let mut vertices = polygon(center, &outline, tint_color(Tint::Player));
    vertices.extend(circle(
        center + Vec2::new(0.0, -hh / 2.0),
        6.0,
        colors::COCKPIT,
        12,
    ));
    vertices
}

/// Pentagon pointing down
fn enemy_hull(center: Vec2, size: Vec2) -> Vec<Vertex> {
    let (hw, hh) = (size.x / 2.0, size.y / 2.0);
    let outline = [
        Vec2::new(-hw, -hh / 2.0),
        Vec2::new(0.0, -hh),
        Vec2::new(hw, -hh / 2.0),
        Vec2::new(hw / 2.0, hh),
        Vec2::new(-hw / 2.0, hh),
    ];
    polygon(center, &outline, tint_color(Tint::Enemy))
}
