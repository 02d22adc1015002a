//! Shared boundary types for the arcade.
//!
//! This module defines the two key data contracts:
//! - Host → Game (per tick): `FrameContext` with the tick, grid and mouse
//! - Game → Host (per tick): `Outputs` containing drawable primitives
//!
//! plus the terminal cell types the renderer and player exchange.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// World geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// The logical screen. Origin is bottom-left, y grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub w: f32,
    pub h: f32,
}

impl Grid {
    pub const fn new(w: f32, h: f32) -> Self {
        Grid { w, h }
    }

    pub fn center_x(&self) -> f32 {
        self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.h / 2.0
    }

    pub fn top(&self) -> f32 {
        self.h
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= self.w && p.y >= 0.0 && p.y <= self.h
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(1280.0, 720.0)
    }
}

/// RGBA tint with 0–255 channels. Stored as floats because colours are
/// tweened a fraction at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255.0, 255.0, 255.0, 255.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Rgba { r, g, b, a }
    }

    /// Darken (or lighten, for negative `tone`) the colour channels.
    pub fn toned(self, tone: f32) -> Self {
        Rgba::new(self.r - tone, self.g - tone, self.b - tone, self.a)
    }

    pub fn to_rgb(self) -> Rgb {
        Rgb {
            r: clamp_channel(self.r),
            g: clamp_channel(self.g),
            b: clamp_channel(self.b),
        }
    }

    /// Alpha as a 0.0–1.0 coverage factor.
    pub fn opacity(self) -> f32 {
        (self.a / 255.0).clamp(0.0, 1.0)
    }
}

fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

// ---------------------------------------------------------------------------
// Host → Game boundary
// ---------------------------------------------------------------------------

/// Read-only snapshot handed to the game once per tick.
#[derive(Debug, Clone, Serialize)]
pub struct FrameContext {
    pub tick: u64,
    pub grid: Grid,
    pub mouse: Point,
    /// Set only on the tick a click happened.
    pub click: Option<Point>,
}

impl FrameContext {
    pub fn new(tick: u64, grid: Grid) -> Self {
        FrameContext {
            tick,
            grid,
            mouse: Point::new(grid.center_x(), grid.center_y()),
            click: None,
        }
    }

    pub fn with_click(mut self, at: Point) -> Self {
        self.mouse = at;
        self.click = Some(at);
        self
    }

    pub fn with_mouse(mut self, at: Point) -> Self {
        self.mouse = at;
        self
    }
}

// ---------------------------------------------------------------------------
// Game → Host boundary (append-only per frame)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpritePrim {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub path: String,
    /// Degrees anticlockwise; 0 faces right.
    pub angle: f32,
    pub tint: Rgba,
}

/// Text anchored at its top edge, like the host's labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPrim {
    pub x: f32,
    pub y: f32,
    pub text: String,
    /// Nominal glyph height in world units.
    pub size: f32,
    pub align: Align,
    pub tint: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolidPrim {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePrim {
    pub x: f32,
    pub y: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum SoundRequest {
    Once(String),
    Looping(String),
    Stop,
}

/// Everything a game produced during one tick.
#[derive(Debug, Clone, Serialize)]
pub struct Outputs {
    pub background: Rgba,
    pub solids: Vec<SolidPrim>,
    pub lines: Vec<LinePrim>,
    pub sprites: Vec<SpritePrim>,
    pub labels: Vec<LabelPrim>,
    pub sounds: Vec<SoundRequest>,
}

impl Default for Outputs {
    fn default() -> Self {
        Outputs {
            background: Rgba::new(0.0, 0.0, 0.0, 255.0),
            solids: Vec::new(),
            lines: Vec::new(),
            sprites: Vec::new(),
            labels: Vec::new(),
            sounds: Vec::new(),
        }
    }
}

impl Outputs {
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
            && self.lines.is_empty()
            && self.sprites.is_empty()
            && self.labels.is_empty()
            && self.sounds.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Renderer → Player boundary (terminal cells)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Composite `over` onto this colour using its alpha.
    pub fn blend(self, over: Rgba) -> Rgb {
        let t = over.opacity();
        let top = over.to_rgb();
        let mix = |under: u8, above: u8| -> u8 {
            (under as f32 + (above as f32 - under as f32) * t).round() as u8
        };
        Rgb {
            r: mix(self.r, top.r),
            g: mix(self.g, top.g),
            b: mix(self.b, top.b),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Rgb>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalContract {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    #[serde(default)]
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Full { cells: Vec<Vec<Cell>> },
    Diff { changes: Vec<CellChange> },
}
