//! Renderer: the deterministic rasterizer.
//!
//! Takes the `Outputs` a game produced for one tick and paints them onto a
//! fixed-size cell grid, then diffs that grid against the previous one so
//! the player only redraws what changed.
//!
//! World space is the game's logical grid (origin bottom-left, y up); cell
//! space is the terminal canvas (origin top-left, rows down). Rasterizing
//! knows nothing about time, audio, or game rules.

use crate::types::{
    Align, Cell, CellChange, Frame, Grid, LabelPrim, LinePrim, Outputs, Point, Rgb, Rgba, SolidPrim, SpritePrim,
    Style, TerminalContract,
};

/// Sprites at least this opaque get their file stem printed inside them.
const CAPTION_ALPHA: f32 = 128.0;
/// Labels at least this tall (world units) are drawn bold.
const BOLD_SIZE: f32 = 40.0;

pub struct Renderer {
    contract: TerminalContract,
    grid: Grid,
    prev: Option<Vec<Vec<Cell>>>,
}

impl Renderer {
    pub fn new(contract: TerminalContract, grid: Grid) -> Self {
        Renderer {
            contract,
            grid,
            prev: None,
        }
    }

    pub fn contract(&self) -> &TerminalContract {
        &self.contract
    }

    /// Adopt a new canvas size. The next frame is a full frame.
    pub fn resize(&mut self, contract: TerminalContract) {
        self.contract = contract;
        self.prev = None;
    }

    /// Rasterize one tick's outputs. The first frame (and the first after a
    /// resize) is a full frame; later frames are diffs against the last.
    pub fn render(&mut self, out: &Outputs) -> Frame {
        let cells = Self::rasterize(out, self.grid, &self.contract);
        let frame = match &self.prev {
            None => Frame::Full { cells: cells.clone() },
            Some(prev) => Frame::Diff {
                changes: Self::diff(prev, &cells),
            },
        };
        self.prev = Some(cells);
        frame
    }

    /// Paint `out` onto a fresh cell grid.
    ///
    /// Layers go background, solids, sprites, lines, then labels, so text
    /// always lands on top.
    pub fn rasterize(out: &Outputs, grid: Grid, contract: &TerminalContract) -> Vec<Vec<Cell>> {
        let mut canvas = Canvas::new(grid, contract, out.background.to_rgb());
        for solid in &out.solids {
            canvas.solid(solid);
        }
        for sprite in &out.sprites {
            canvas.sprite(sprite);
        }
        for line in &out.lines {
            canvas.line(line);
        }
        for label in &out.labels {
            canvas.label(label);
        }
        canvas.cells
    }

    /// Compute a cell-level diff between two grids.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }
}

/// World point of the centre of a canvas cell.
pub fn cell_to_world(col: u16, row: u16, grid: Grid, contract: &TerminalContract) -> Point {
    let cols = contract.width.max(1) as f32;
    let rows = contract.height.max(1) as f32;
    Point::new(
        (col as f32 + 0.5) / cols * grid.w,
        grid.h - (row as f32 + 0.5) / rows * grid.h,
    )
}

/// Canvas cell containing a world point. Points on the far edges land in
/// the last column or row; points off the grid are `None`.
pub fn world_to_cell(p: Point, grid: Grid, contract: &TerminalContract) -> Option<(u16, u16)> {
    if !grid.contains(p) || contract.width == 0 || contract.height == 0 {
        return None;
    }
    let (col, row) = world_to_cell_unclamped(p, grid, contract);
    Some((
        col.clamp(0, contract.width as i32 - 1) as u16,
        row.clamp(0, contract.height as i32 - 1) as u16,
    ))
}

fn world_to_cell_unclamped(p: Point, grid: Grid, contract: &TerminalContract) -> (i32, i32) {
    let col = (p.x / grid.w * contract.width as f32).floor() as i32;
    let row = ((grid.h - p.y) / grid.h * contract.height as f32).floor() as i32;
    (col, row)
}

/// Arrow glyph for a heading in degrees (0 faces right, anticlockwise).
pub fn heading_glyph(angle: f32) -> char {
    const ARROWS: [char; 8] = ['→', '↗', '↑', '↖', '←', '↙', '↓', '↘'];
    let octant = ((angle.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize % 8;
    ARROWS[octant]
}

struct Canvas {
    cells: Vec<Vec<Cell>>,
    grid: Grid,
    width: i32,
    height: i32,
}

impl Canvas {
    fn new(grid: Grid, contract: &TerminalContract, background: Rgb) -> Self {
        let fill = Cell {
            ch: ' ',
            style: Style {
                fg: None,
                bg: Some(background),
                bold: false,
            },
        };
        Canvas {
            cells: vec![vec![fill; contract.width as usize]; contract.height as usize],
            grid,
            width: contract.width as i32,
            height: contract.height as i32,
        }
    }

    fn contract(&self) -> TerminalContract {
        TerminalContract {
            width: self.width as u16,
            height: self.height as u16,
        }
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.width || row >= self.height {
            return None;
        }
        Some(&mut self.cells[row as usize][col as usize])
    }

    fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        world_to_cell_unclamped(Point::new(x, y), self.grid, &self.contract())
    }

    /// Cells covered by a world rectangle, as half-open column and row ranges.
    fn span(&self, x: f32, y: f32, w: f32, h: f32) -> (std::ops::Range<i32>, std::ops::Range<i32>) {
        let (c0, r1) = self.to_cell(x, y);
        let (c1, r0) = self.to_cell(x + w, y + h);
        // Anything with area covers at least one cell.
        let cols = c0.min(c1)..c0.max(c1).max(c0.min(c1) + 1);
        let rows = r0.min(r1)..r0.max(r1).max(r0.min(r1) + 1);
        (cols, rows)
    }

    fn tint_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if color.a <= 0.0 || w <= 0.0 || h <= 0.0 {
            return;
        }
        let (cols, rows) = self.span(x, y, w, h);
        for row in rows {
            for col in cols.clone() {
                if let Some(cell) = self.cell_mut(col, row) {
                    let under = cell.style.bg.unwrap_or(Rgb::BLACK);
                    cell.style.bg = Some(under.blend(color));
                }
            }
        }
    }

    fn solid(&mut self, s: &SolidPrim) {
        self.tint_rect(s.x, s.y, s.w, s.h, s.color);
    }

    fn sprite(&mut self, s: &SpritePrim) {
        self.tint_rect(s.x, s.y, s.w, s.h, s.tint);
        if s.tint.a < CAPTION_ALPHA {
            return;
        }

        let (cx, cy) = self.to_cell(s.x + s.w / 2.0, s.y + s.h / 2.0);
        if s.angle != 0.0 {
            self.put(cx, cy, heading_glyph(s.angle), Rgb::BLACK, true);
            return;
        }

        let caption = sprite_caption(&s.path);
        let (cols, _) = self.span(s.x, s.y, s.w, s.h);
        let len = caption.chars().count() as i32;
        if len > cols.end - cols.start {
            return;
        }
        let start = cx - len / 2;
        for (i, ch) in caption.chars().enumerate() {
            self.put(start + i as i32, cy, ch, Rgb::BLACK, true);
        }
    }

    fn line(&mut self, l: &LinePrim) {
        if l.color.a <= 0.0 {
            return;
        }
        let ch = line_glyph(l.x2 - l.x, l.y2 - l.y);
        let (mut x0, mut y0) = self.to_cell(l.x, l.y);
        let (x1, y1) = self.to_cell(l.x2, l.y2);

        // Bresenham over cell coordinates.
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend_put(x0, y0, ch, l.color, false);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn label(&mut self, l: &LabelPrim) {
        if l.tint.a <= 0.0 || l.text.is_empty() {
            return;
        }
        let (col, row) = self.to_cell(l.x, l.y);
        let len = l.text.chars().count() as i32;
        let start = match l.align {
            Align::Left => col,
            Align::Center => col - len / 2,
            Align::Right => col - len,
        };
        let bold = l.size >= BOLD_SIZE;
        for (i, ch) in l.text.chars().enumerate() {
            self.blend_put(start + i as i32, row, ch, l.tint, bold);
        }
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Rgb, bold: bool) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.style.fg = Some(fg);
            cell.style.bold = bold;
        }
    }

    /// Draw `ch` in `color` composited over the cell's background.
    fn blend_put(&mut self, col: i32, row: i32, ch: char, color: Rgba, bold: bool) {
        if let Some(cell) = self.cell_mut(col, row) {
            let under = cell.style.bg.unwrap_or(Rgb::BLACK);
            cell.ch = ch;
            cell.style.fg = Some(under.blend(color));
            cell.style.bold = bold;
        }
    }
}

/// `adrift/sprites/start.png` → `start`.
fn sprite_caption(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.split('.').next().unwrap_or(file)
}

/// Pick a stroke for a world-space direction. World y points up, so a
/// rising line reads as `/` on screen.
fn line_glyph(dx: f32, dy: f32) -> char {
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if dx * dy > 0.0 {
        '/'
    } else {
        '\\'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: TerminalContract = TerminalContract { width: 64, height: 36 };

    fn grid() -> Grid {
        Grid::default()
    }

    fn outputs() -> Outputs {
        Outputs {
            background: Rgba::new(10.0, 20.0, 30.0, 255.0),
            ..Outputs::default()
        }
    }

    fn text_of(row: &[Cell]) -> String {
        row.iter().map(|c| c.ch).collect::<String>().trim().to_string()
    }

    #[test]
    fn background_fills_every_cell() {
        let cells = Renderer::rasterize(&outputs(), grid(), &CONTRACT);
        assert_eq!(cells.len(), 36);
        assert!(cells.iter().flatten().all(|c| c.ch == ' ' && c.style.bg == Some(Rgb { r: 10, g: 20, b: 30 })));
    }

    #[test]
    fn world_y_is_flipped() {
        let mut out = outputs();
        // One 20×20 cell in the bottom-left corner of the world.
        out.solids.push(SolidPrim {
            x: 0.0,
            y: 0.0,
            w: 20.0,
            h: 20.0,
            color: Rgba::new(255.0, 0.0, 0.0, 255.0),
        });
        let cells = Renderer::rasterize(&out, grid(), &CONTRACT);
        assert_eq!(cells[35][0].style.bg, Some(Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(cells[0][0].style.bg, Some(Rgb { r: 10, g: 20, b: 30 }));
        assert_eq!(cells[35][1].style.bg, Some(Rgb { r: 10, g: 20, b: 30 }));
    }

    #[test]
    fn tiny_solids_still_cover_a_cell() {
        let mut out = outputs();
        out.solids.push(SolidPrim {
            x: 645.0,
            y: 365.0,
            w: 1.0,
            h: 1.0,
            color: Rgba::WHITE,
        });
        let cells = Renderer::rasterize(&out, grid(), &CONTRACT);
        let white = cells.iter().flatten().filter(|c| c.style.bg == Some(Rgb { r: 255, g: 255, b: 255 })).count();
        assert_eq!(white, 1);
    }

    #[test]
    fn labels_align_around_their_anchor() {
        let mut out = outputs();
        for (align, y) in [(Align::Left, 700.0), (Align::Center, 600.0), (Align::Right, 500.0)] {
            out.labels.push(LabelPrim {
                x: 640.0,
                y,
                text: "abcd".into(),
                size: 20.0,
                align,
                tint: Rgba::WHITE,
            });
        }
        let cells = Renderer::rasterize(&out, grid(), &CONTRACT);
        let row_of = |y: f32| world_to_cell(Point::new(640.0, y), grid(), &CONTRACT).map(|(_, r)| r as usize);
        let start = |row: usize| cells[row].iter().position(|c| c.ch == 'a');

        assert_eq!(start(row_of(700.0).unwrap()), Some(32));
        assert_eq!(start(row_of(600.0).unwrap()), Some(30));
        assert_eq!(start(row_of(500.0).unwrap()), Some(28));
        assert_eq!(text_of(&cells[row_of(600.0).unwrap()]), "abcd");
    }

    #[test]
    fn transparent_primitives_draw_nothing() {
        let mut out = outputs();
        out.labels.push(LabelPrim {
            x: 640.0,
            y: 360.0,
            text: "hidden".into(),
            size: 20.0,
            align: Align::Center,
            tint: Rgba::new(255.0, 255.0, 255.0, 0.0),
        });
        out.lines.push(LinePrim {
            x: 0.0,
            y: 0.0,
            x2: 1280.0,
            y2: 720.0,
            color: Rgba::new(255.0, 0.0, 0.0, 0.0),
        });
        assert_eq!(
            Renderer::rasterize(&out, grid(), &CONTRACT),
            Renderer::rasterize(&outputs(), grid(), &CONTRACT)
        );
    }

    #[test]
    fn lines_pick_strokes_by_direction() {
        assert_eq!(line_glyph(10.0, 0.0), '-');
        assert_eq!(line_glyph(0.0, -10.0), '|');
        assert_eq!(line_glyph(10.0, 10.0), '/');
        assert_eq!(line_glyph(-10.0, 10.0), '\\');

        let mut out = outputs();
        out.lines.push(LinePrim {
            x: 0.0,
            y: 10.0,
            x2: 1279.0,
            y2: 10.0,
            color: Rgba::WHITE,
        });
        let cells = Renderer::rasterize(&out, grid(), &CONTRACT);
        assert!(cells[35].iter().all(|c| c.ch == '-'));
    }

    #[test]
    fn sprites_show_heading_or_caption() {
        assert_eq!(heading_glyph(0.0), '→');
        assert_eq!(heading_glyph(90.0), '↑');
        assert_eq!(heading_glyph(350.0), '→');
        assert_eq!(heading_glyph(-90.0), '↓');

        let mut out = outputs();
        out.sprites.push(SpritePrim {
            x: 512.0,
            y: 350.0,
            w: 256.0,
            h: 64.0,
            path: "adrift/sprites/start.png".into(),
            angle: 0.0,
            tint: Rgba::WHITE,
        });
        let cells = Renderer::rasterize(&out, grid(), &CONTRACT);
        assert!(cells.iter().any(|row| text_of(row) == "start"));
    }

    #[test]
    fn diff_reports_only_changed_cells() {
        let mut renderer = Renderer::new(CONTRACT, grid());
        assert!(matches!(renderer.render(&outputs()), Frame::Full { .. }));
        assert!(matches!(renderer.render(&outputs()), Frame::Diff { changes } if changes.is_empty()));

        let mut out = outputs();
        out.solids.push(SolidPrim {
            x: 0.0,
            y: 700.0,
            w: 20.0,
            h: 20.0,
            color: Rgba::WHITE,
        });
        match renderer.render(&out) {
            Frame::Diff { changes } => {
                assert_eq!(changes.len(), 1);
                assert_eq!((changes[0].x, changes[0].y), (0, 0));
            }
            Frame::Full { .. } => panic!("expected a diff"),
        }

        renderer.resize(TerminalContract { width: 32, height: 18 });
        assert!(matches!(renderer.render(&out), Frame::Full { cells } if cells.len() == 18));
    }

    #[test]
    fn cell_and_world_round_trip_at_centres() {
        let p = cell_to_world(10, 5, grid(), &CONTRACT);
        assert_eq!(world_to_cell(p, grid(), &CONTRACT), Some((10, 5)));
        assert_eq!(world_to_cell(Point::new(1280.0, 0.0), grid(), &CONTRACT), Some((63, 35)));
        assert_eq!(world_to_cell(Point::new(-1.0, 0.0), grid(), &CONTRACT), None);
    }
}
