//! Collision detection and response
//!
//! One set of rules serves both the live frame step and the forward
//! simulator: both copy the ball into a [`Body`] and call
//! [`resolve_contacts`] against an [`Arena`].

use glam::Vec2;

use super::geometry::{Circle, Rect, contact_normal, reflect};
use super::state::{Brick, Paddle};

/// Copyable kinematic state of the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    /// Collision radius (already scaled)
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }
}

/// Result of a collision check
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the obstacle surface
    pub point: Vec2,
    /// Unit surface normal, pointing toward the ball center
    pub normal: Vec2,
    /// Overlap along the normal (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against a solid rectangle
///
/// The normal runs from the closest point on the rectangle to the ball
/// center. A center on or inside the rectangle gets the straight-up fallback.
pub fn ball_rect_collision(pos: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = rect.closest_point(pos);
    let (normal, dist) = contact_normal(pos, closest);
    if dist > radius {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: radius - dist,
    }
}

/// Check a ball against a solid circle
pub fn ball_circle_collision(pos: Vec2, radius: f32, circle: &Circle) -> CollisionResult {
    let (normal, dist) = contact_normal(pos, circle.center);
    let reach = radius + circle.radius;
    if dist > reach {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        point: circle.center + normal * circle.radius,
        normal,
        penetration: reach - dist,
    }
}

/// Reflect the body's velocity about the contact normal and push it clear
pub fn bounce(body: &mut Body, contact: &CollisionResult) {
    body.vel = reflect(body.vel, contact.normal);
    if contact.penetration > 0.0 {
        body.pos += contact.normal * contact.penetration;
    }
}

/// Bounce off the left, right and top walls
///
/// Left and right are exclusive; the top is checked independently, so a
/// corner hit flips both components. Returns true on any contact.
pub fn resolve_walls(body: &mut Body, width: f32) -> bool {
    let r = body.radius;
    let mut hit = false;

    if body.pos.x - r <= 0.0 {
        body.pos.x = r;
        body.vel.x = -body.vel.x;
        hit = true;
    } else if body.pos.x + r >= width {
        body.pos.x = width - r;
        body.vel.x = -body.vel.x;
        hit = true;
    }

    if body.pos.y - r <= 0.0 {
        body.pos.y = r;
        body.vel.y = -body.vel.y;
        hit = true;
    }

    hit
}

/// Bounce off the horseshoe paddle
///
/// Only a descending ball is tested. Sub-shapes are tried in order (left leg,
/// right leg, bowl) and the first hit wins.
pub fn resolve_paddle(body: &mut Body, paddle: &Paddle) -> Option<CollisionResult> {
    if body.vel.y <= 0.0 {
        return None;
    }

    let [left, right] = paddle.legs();
    let contact = [left, right]
        .iter()
        .map(|leg| ball_rect_collision(body.pos, body.radius, leg))
        .find(|c| c.hit)
        .or_else(|| {
            let c = ball_circle_collision(body.pos, body.radius, &paddle.bowl());
            c.hit.then_some(c)
        })?;

    bounce(body, &contact);
    Some(contact)
}

/// First intact brick (row-major) whose box overlaps `bounds`
pub fn first_brick_hit(bounds: &Rect, bricks: &[Brick]) -> Option<usize> {
    bricks
        .iter()
        .position(|b| !b.destroyed && bounds.intersects(&b.rect))
}

/// Flip one velocity axis after hitting a brick
///
/// Flips `vx` when the ball is further from the brick center horizontally
/// than vertically, otherwise `vy`.
pub fn reflect_off_brick(body: &mut Body, brick: &Rect) {
    let offset = brick.center() - body.pos;
    if offset.x.abs() > offset.y.abs() {
        body.vel.x = -body.vel.x;
    } else {
        body.vel.y = -body.vel.y;
    }
}

/// Reflect off the first overlapping brick; the caller decides whether it breaks
pub fn resolve_bricks(body: &mut Body, bricks: &[Brick]) -> Option<usize> {
    let index = first_brick_hit(&body.bounds(), bricks)?;
    reflect_off_brick(body, &bricks[index].rect);
    Some(index)
}

/// Static obstacles a body moves among
#[derive(Debug, Clone, Copy)]
pub struct Arena<'a> {
    pub width: f32,
    pub height: f32,
    /// Paddle at its rendered position; `None` leaves it out of the test
    pub paddle: Option<&'a Paddle>,
    pub bricks: &'a [Brick],
}

impl Arena<'_> {
    /// The bottom edge is open: a body whose top has passed it is gone
    pub fn below_floor(&self, body: &Body) -> bool {
        body.pos.y - body.radius > self.height
    }
}

/// Contacts resolved in one pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contacts {
    pub wall: bool,
    pub paddle: Option<CollisionResult>,
    pub brick: Option<usize>,
}

impl Contacts {
    pub fn any(&self) -> bool {
        self.wall || self.paddle.is_some() || self.brick.is_some()
    }

    /// Number of surfaces bounced off
    pub fn count(&self) -> u32 {
        self.wall as u32 + self.paddle.is_some() as u32 + self.brick.is_some() as u32
    }
}

/// Resolve walls, then the paddle, then bricks, mutating only `body`
pub fn resolve_contacts(body: &mut Body, arena: &Arena<'_>) -> Contacts {
    let wall = resolve_walls(body, arena.width);
    let paddle = arena.paddle.and_then(|p| resolve_paddle(body, p));
    let brick = resolve_bricks(body, arena.bricks);
    Contacts {
        wall,
        paddle,
        brick,
    }
}
