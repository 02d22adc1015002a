//! Drawable entity: a tween state plus optional keyframe sequences per group,
//! attached to a visual (sprite, label or regular polygon).

use serde::Serialize;

use super::Render;
use super::sequence::{Heading, Keyframe, KeyframeSequence};
use super::tween::{Channel, Group, TweenState};
use crate::types::{Align, LabelPrim, LinePrim, Outputs, Point, Rgba, SpritePrim};

/// Approximate advance of one glyph relative to the label size.
const GLYPH_ASPECT: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Visual {
    Sprite { path: String },
    /// Glyph size is the entity's height.
    Label { text: String, align: Align },
    Polygon { sides: u32 },
}

/// Region used by `Entity::hit_test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Rect,
    /// Circle inscribed in the bounding box.
    Circle,
}

#[derive(Debug, Clone)]
pub struct Entity {
    visual: Visual,
    shape: Shape,
    tween: TweenState,
    colors: Option<KeyframeSequence<Rgba>>,
    path: Option<KeyframeSequence<Point>>,
    headings: Option<KeyframeSequence<Heading>>,
}

/// Structured snapshot of an entity for debugging.
#[derive(Debug, Clone, Serialize)]
pub struct EntityDump {
    pub visual: Visual,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub angle: f32,
    pub color: Rgba,
    pub changing: bool,
    pub spin: f32,
}

impl Entity {
    fn new(visual: Visual, shape: Shape, w: f32, h: f32) -> Self {
        let mut tween = TweenState::new();
        tween.apply_color(Rgba::WHITE, 0.0);
        tween.apply_size(w, h, 0.0);
        Entity {
            visual,
            shape,
            tween,
            colors: None,
            path: None,
            headings: None,
        }
    }

    pub fn sprite(path: impl Into<String>, w: f32, h: f32) -> Self {
        Self::new(Visual::Sprite { path: path.into() }, Shape::Rect, w, h)
    }

    /// A text label anchored at its top edge; `align` picks which point of
    /// the text sits on `x`.
    pub fn label(text: impl Into<String>, size: f32, align: Align) -> Self {
        let text = text.into();
        let w = text.chars().count() as f32 * size * GLYPH_ASPECT;
        Self::new(Visual::Label { text, align }, Shape::Rect, w, size)
    }

    pub fn polygon(sides: u32, radius: f32) -> Self {
        debug_assert!(sides >= 3, "a polygon needs at least three sides");
        Self::new(Visual::Polygon { sides }, Shape::Circle, radius * 2.0, radius * 2.0)
    }

    pub fn visual(&self) -> &Visual {
        &self.visual
    }

    pub fn tween(&self) -> &TweenState {
        &self.tween
    }

    pub fn x(&self) -> f32 {
        self.tween.get(Channel::X)
    }

    pub fn y(&self) -> f32 {
        self.tween.get(Channel::Y)
    }

    pub fn w(&self) -> f32 {
        self.tween.get(Channel::Width)
    }

    pub fn h(&self) -> f32 {
        self.tween.get(Channel::Height)
    }

    pub fn angle(&self) -> f32 {
        self.tween.get(Channel::Angle)
    }

    pub fn color(&self) -> Rgba {
        self.tween.color()
    }

    pub fn center(&self) -> Point {
        Point::new(self.x() + self.w() / 2.0, self.y() + self.h() / 2.0)
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        if let Visual::Label { text, .. } = &mut self.visual {
            *text = value.into();
        }
    }

    pub fn set_path(&mut self, value: impl Into<String>) {
        if let Visual::Sprite { path } = &mut self.visual {
            *path = value.into();
        }
    }

    // Setting a group directly drops any sequence driving that group.

    pub fn set_color(&mut self, color: Rgba, speed: f32) {
        self.colors = None;
        self.tween.apply_color(color, speed);
    }

    pub fn set_location(&mut self, x: f32, y: f32, speed: f32) {
        self.path = None;
        self.tween.apply_location(x, y, speed);
    }

    pub fn set_size(&mut self, w: f32, h: f32, speed: f32) {
        self.tween.apply_size(w, h, speed);
    }

    pub fn set_angle(&mut self, angle: f32, speed: f32) {
        self.headings = None;
        self.tween.apply_angle(angle, speed);
    }

    /// One revolution every `period` ticks; negative turns clockwise.
    pub fn spin(&mut self, period: f32) {
        self.headings = None;
        self.tween.spin(period);
    }

    pub fn color_cycle(&mut self, colors: Vec<Rgba>, speed: f32) {
        self.colors = Some(Self::started(KeyframeSequence::cycle(colors, speed), &mut self.tween));
    }

    pub fn color_sequence(&mut self, colors: Vec<Rgba>, speed: f32) {
        self.colors = Some(Self::started(KeyframeSequence::sequence(colors, speed), &mut self.tween));
    }

    pub fn location_cycle(&mut self, points: Vec<Point>, speed: f32) {
        self.path = Some(Self::started(KeyframeSequence::cycle(points, speed), &mut self.tween));
    }

    pub fn location_sequence(&mut self, points: Vec<Point>, speed: f32) {
        self.path = Some(Self::started(KeyframeSequence::sequence(points, speed), &mut self.tween));
    }

    pub fn angle_cycle(&mut self, headings: Vec<Heading>, speed: f32) {
        self.headings = Some(Self::started(KeyframeSequence::cycle(headings, speed), &mut self.tween));
    }

    pub fn angle_sequence(&mut self, headings: Vec<Heading>, speed: f32) {
        self.headings = Some(Self::started(KeyframeSequence::sequence(headings, speed), &mut self.tween));
    }

    fn started<K: Keyframe>(mut seq: KeyframeSequence<K>, tween: &mut TweenState) -> KeyframeSequence<K> {
        seq.start(tween);
        seq
    }

    pub fn is_moving(&self) -> bool {
        self.tween.is_group_changing(Group::Location)
    }

    pub fn is_changing(&self) -> bool {
        self.tween.is_changing()
    }

    pub fn is_visible(&self) -> bool {
        self.tween.get(Channel::Alpha) != 0.0
    }

    pub fn hit_test(&self, p: Point) -> bool {
        match self.shape {
            Shape::Rect => {
                p.x >= self.x() && p.x < self.x() + self.w() && p.y >= self.y() && p.y < self.y() + self.h()
            }
            Shape::Circle => {
                let r = self.w() / 2.0;
                let dx = p.x - (self.x() + r);
                let dy = p.y - (self.y() + r);
                dx * dx + dy * dy < r * r
            }
        }
    }

    /// Advance color, location, size and angle, in that order.
    pub fn update(&mut self) {
        advance(&mut self.colors, &mut self.tween);
        advance(&mut self.path, &mut self.tween);
        self.tween.advance_group(Group::Size);
        advance(&mut self.headings, &mut self.tween);
    }

    pub fn dump(&self) -> EntityDump {
        EntityDump {
            visual: self.visual.clone(),
            x: self.x(),
            y: self.y(),
            w: self.w(),
            h: self.h(),
            angle: self.angle(),
            color: self.color(),
            changing: self.is_changing(),
            spin: self.tween.spin_rate(),
        }
    }

    fn render_polygon(&self, sides: u32, out: &mut Outputs) {
        let r = self.w() / 2.0;
        let center = self.center();
        let color = self.color();

        // Inner rings darken toward the middle; the rim is drawn bright.
        for step in 0..4 {
            let inset = step as f32 * 5.0 * r / 64.0;
            outline(out, center, r - inset, sides, self.angle(), color.toned(step as f32 * 40.0));
        }
        outline(out, center, r, sides, self.angle(), color.toned(-255.0));

        out.labels.push(LabelPrim {
            x: center.x,
            y: center.y + r * 0.3,
            text: sides.to_string(),
            size: r * 0.5,
            align: Align::Center,
            tint: color,
        });
    }
}

fn advance<K: Keyframe>(seq: &mut Option<KeyframeSequence<K>>, tween: &mut TweenState) {
    match seq {
        Some(seq) => seq.advance(tween),
        None => tween.advance_group(K::GROUP),
    }
}

/// Closed outline of a regular polygon, first vertex at twelve o'clock.
fn outline(out: &mut Outputs, center: Point, radius: f32, sides: u32, angle: f32, color: Rgba) {
    let vertex = |i: u32| {
        let theta = (90.0 + angle + i as f32 * 360.0 / sides as f32).to_radians();
        Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
    };
    for i in 0..sides {
        let a = vertex(i);
        let b = vertex(i + 1);
        out.lines.push(LinePrim { x: a.x, y: a.y, x2: b.x, y2: b.y, color });
    }
}

impl Render for Entity {
    fn render(&self, out: &mut Outputs) {
        if !self.is_visible() {
            return;
        }
        match &self.visual {
            Visual::Sprite { path } => out.sprites.push(SpritePrim {
                x: self.x(),
                y: self.y(),
                w: self.w(),
                h: self.h(),
                path: path.clone(),
                angle: self.angle(),
                tint: self.color(),
            }),
            Visual::Label { text, align } => out.labels.push(LabelPrim {
                x: self.x(),
                y: self.y(),
                text: text.clone(),
                size: self.h(),
                align: *align,
                tint: self.color(),
            }),
            Visual::Polygon { sides } => self.render_polygon(*sides, out),
        }
    }
}
