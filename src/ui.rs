//! Widgets and drawing helpers for the menu, the arena and the game-over screen.

use crate::entity::{Entity, Kind, HITBOX_SIZE};
use ggez::{
    graphics::{self, Canvas, Color, DrawMode, Drawable, Mesh, MeshBuilder, Rect, Text, TextLayout},
    Context, GameResult,
};
use std::ops::RangeInclusive;

//////////////////////////////////////////////////////////////////////////////
// Palette
//////////////////////////////////////////////////////////////////////////////

macro_rules! rgb {
    ($r:expr, $g:expr, $b:expr) => {
        Color {
            r: $r as f32 / 255.0,
            g: $g as f32 / 255.0,
            b: $b as f32 / 255.0,
            a: 1.0,
        }
    };
}

pub const BACKGROUND: Color = rgb!(255, 249, 222);
pub const TEXT: Color = rgb!(43, 57, 61);
pub const TEXT_HOVER: Color = rgb!(75, 100, 110);
const SLIDER_TRACK: Color = rgb!(166, 208, 221);
const SLIDER_HANDLE: Color = rgb!(87, 117, 127);
const ROCK_BAR: Color = rgb!(166, 208, 221);
const PAPER_BAR: Color = rgb!(255, 211, 176);
const SCISSORS_BAR: Color = rgb!(255, 105, 105);

/// Score bar colour for each kind
pub fn kind_color(kind: Kind) -> Color {
    match kind {
        Kind::Rock => ROCK_BAR,
        Kind::Paper => PAPER_BAR,
        Kind::Scissors => SCISSORS_BAR,
    }
}

pub const TITLE_SCALE: f32 = 24.0;
pub const LABEL_SCALE: f32 = 14.0;
/// Height of the score bar along the bottom edge
pub const SCORE_BAR_HEIGHT: f32 = 25.0;

//////////////////////////////////////////////////////////////////////////////
// Layout Helpers
//////////////////////////////////////////////////////////////////////////////

#[inline]
pub fn centered_rect(center: [f32; 2], w: f32, h: f32) -> Rect {
    Rect::new(center[0] - w * 0.5, center[1] - h * 0.5, w, h)
}

/// Text that is positioned by its center
pub fn centered_text(label: impl Into<String>, scale: f32) -> Text {
    let mut text = Text::new(label.into());
    text.set_scale(scale).set_layout(TextLayout::center());
    text
}

/// Horizontal slice of the score bar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub kind: Kind,
    pub start: f32,
    pub width: f32,
}

/// Splits `width` between the three kinds in proportion to their share of
/// `total`, laid out rock, paper, scissors from the left
pub fn score_segments(counts: [usize; 3], total: usize, width: f32) -> [Segment; 3] {
    let per_sprite = if total > 0 { width / total as f32 } else { 0.0 };
    let mut start = 0.0;

    Kind::ALL.map(|kind| {
        let segment = Segment {
            kind,
            start,
            width: counts[kind.index()] as f32 * per_sprite,
        };
        start += segment.width;
        segment
    })
}

//////////////////////////////////////////////////////////////////////////////
// Slider
//////////////////////////////////////////////////////////////////////////////

/// Horizontal integer slider with a draggable round handle
#[derive(Clone, Debug)]
pub struct Slider {
    track: Rect,
    min: u32,
    max: u32,
    value: u32,
    dragging: bool,
}

impl Slider {
    pub fn new(track: Rect, range: RangeInclusive<u32>, initial: u32) -> Self {
        let (min, max) = range.into_inner();
        Slider {
            track,
            min,
            max,
            value: initial.clamp(min, max),
            dragging: false,
        }
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[inline]
    fn handle_radius(&self) -> f32 {
        self.track.h / 1.3
    }

    fn handle_center(&self) -> [f32; 2] {
        let span = (self.max - self.min) as f32;
        let t = if span > 0.0 {
            (self.value - self.min) as f32 / span
        } else {
            0.0
        };
        [self.track.x + t * self.track.w, self.track.y + self.track.h * 0.5]
    }

    /// The track plus room for the handle above, below and past both ends
    fn grab_area(&self) -> Rect {
        let r = self.handle_radius();
        Rect::new(
            self.track.x - r,
            self.track.y - r,
            self.track.w + r * 2.0,
            self.track.h + r * 2.0,
        )
    }

    fn set_from_x(&mut self, x: f32) {
        let t = ((x - self.track.x) / self.track.w).clamp(0.0, 1.0);
        let span = (self.max - self.min) as f32;
        self.value = self.min + (t * span).round() as u32;
    }

    /// Starts a drag when the press lands on the slider and ends any drag
    /// left over otherwise. Returns whether this press grabbed the slider.
    pub fn press(&mut self, x: f32, y: f32) -> bool {
        self.dragging = self.grab_area().contains([x, y]);
        if self.dragging {
            self.set_from_x(x);
        }
        self.dragging
    }

    /// Follows the pointer while dragging. Returns whether the value changed.
    pub fn drag(&mut self, x: f32) -> bool {
        if !self.dragging {
            return false;
        }
        let before = self.value;
        self.set_from_x(x);
        before != self.value
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn draw(&self, ctx: &mut Context, canvas: &mut Canvas) -> GameResult {
        let track = Mesh::new_rounded_rectangle(
            ctx,
            DrawMode::fill(),
            self.track,
            self.track.h * 0.5,
            SLIDER_TRACK,
        )?;
        canvas.draw(&track, graphics::DrawParam::default());

        let handle = Mesh::new_circle(
            ctx,
            DrawMode::fill(),
            self.handle_center(),
            self.handle_radius(),
            0.1,
            SLIDER_HANDLE,
        )?;
        canvas.draw(&handle, graphics::DrawParam::default());
        Ok(())
    }
}

//////////////////////////////////////////////////////////////////////////////
// Button
//////////////////////////////////////////////////////////////////////////////

/// Clickable text that lights up under the pointer
#[derive(Clone, Debug)]
pub struct Button {
    label: &'static str,
    center: [f32; 2],
}

impl Button {
    pub const fn new(label: &'static str, center: [f32; 2]) -> Self {
        Button { label, center }
    }

    fn text(&self) -> Text {
        centered_text(self.label, TITLE_SCALE)
    }

    pub fn bounds(&self, ctx: &Context) -> Rect {
        let (w, h) = self
            .text()
            .dimensions(ctx)
            .map(|r| (r.w, r.h))
            .unwrap_or((0.0, 0.0));
        centered_rect(self.center, w, h)
    }

    pub fn contains(&self, ctx: &Context, x: f32, y: f32) -> bool {
        self.bounds(ctx).contains([x, y])
    }

    pub fn draw(&self, ctx: &Context, canvas: &mut Canvas) {
        let pointer = ctx.mouse.position();
        let color = if self.contains(ctx, pointer.x, pointer.y) {
            TEXT_HOVER
        } else {
            TEXT
        };
        canvas.draw(
            &self.text(),
            graphics::DrawParam::default().dest(self.center).color(color),
        );
    }
}

//////////////////////////////////////////////////////////////////////////////
// Sprites
//////////////////////////////////////////////////////////////////////////////

/// One prebuilt mesh per kind, drawn with the hit box's top-left as origin
pub struct SpriteMeshes {
    meshes: [Mesh; 3],
}

impl SpriteMeshes {
    pub fn new(ctx: &mut Context) -> GameResult<Self> {
        let mid = HITBOX_SIZE * 0.5;

        let mut rock = MeshBuilder::new();
        rock.circle(DrawMode::fill(), [mid, mid], mid - 1.0, 0.1, Color::from_rgb(140, 140, 140))?
            .circle(DrawMode::stroke(1.5), [mid, mid], mid - 1.0, 0.1, Color::from_rgb(70, 70, 70))?;

        let sheet = Rect::new(3.0, 1.0, HITBOX_SIZE - 6.0, HITBOX_SIZE - 2.0);
        let rule = Color::from_rgb(166, 208, 221);
        let mut paper = MeshBuilder::new();
        paper
            .rectangle(DrawMode::fill(), sheet, Color::WHITE)?
            .rectangle(DrawMode::stroke(1.0), sheet, Color::from_rgb(120, 120, 120))?
            .line(&[[6.0, 6.0], [14.0, 6.0]], 1.0, rule)?
            .line(&[[6.0, 10.0], [14.0, 10.0]], 1.0, rule)?
            .line(&[[6.0, 14.0], [14.0, 14.0]], 1.0, rule)?;

        let blade = Color::from_rgb(150, 150, 160);
        let grip = Color::from_rgb(255, 105, 105);
        let mut scissors = MeshBuilder::new();
        scissors
            .line(&[[4.0, 15.0], [17.0, 2.0]], 2.0, blade)?
            .line(&[[16.0, 15.0], [3.0, 2.0]], 2.0, blade)?
            .circle(DrawMode::stroke(1.5), [4.0, 16.0], 3.0, 0.1, grip)?
            .circle(DrawMode::stroke(1.5), [16.0, 16.0], 3.0, 0.1, grip)?;

        Ok(SpriteMeshes {
            meshes: [
                Mesh::from_data(ctx, rock.build()),
                Mesh::from_data(ctx, paper.build()),
                Mesh::from_data(ctx, scissors.build()),
            ],
        })
    }

    #[inline]
    pub fn draw(&self, canvas: &mut Canvas, entity: &Entity) {
        canvas.draw(
            &self.meshes[entity.kind.index()],
            graphics::DrawParam::default().dest([entity.x, entity.y]),
        );
    }
}
