//! Player: the interactive terminal host.
//!
//! Paces a `Game` at the configured tick rate, feeds it keyboard and mouse
//! input, and draws each tick's frame through the renderer. The player does
//! not interpret game semantics; sounds are logged (and optionally rung on
//! the terminal bell) rather than mixed.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use crossterm::{cursor, execute, queue, style, terminal};
use log::{debug, info};

use crate::config::{matches_binding, ArcadeConfig, KeyBindings};
use crate::engine::{Game, Phase};
use crate::menubar::{menu_items, print_menu_item};
use crate::renderer::{cell_to_world, Renderer};
use crate::types::{Frame, FrameContext, Grid, Outputs, Point, SoundRequest, Style, TerminalContract};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Menu bar plus status bar.
const CHROME_ROWS: u16 = 2;
const MIN_COLS: u16 = 40;
const MIN_ROWS: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleMusic,
    ToggleSound,
    Quit,
}

pub struct Player {
    game: Box<dyn Game>,
    renderer: Renderer,
    grid: Grid,
    bindings: KeyBindings,
    tick_rate: u32,
    bell: bool,
    tick: u64,
    mouse: Point,
    click: Option<Point>,
    now_playing: Option<String>,
    last_effect: Option<String>,
}

impl Player {
    pub fn new(game: Box<dyn Game>, config: &ArcadeConfig, grid: Grid) -> Self {
        Player {
            game,
            renderer: Renderer::new(canvas_contract(80, 24), grid),
            grid,
            bindings: config.key_bindings.clone(),
            tick_rate: config.tick_rate.max(1),
            bell: config.bell,
            tick: 0,
            mouse: Point::new(grid.center_x(), grid.center_y()),
            click: None,
            now_playing: None,
            last_effect: None,
        }
    }

    /// Play the game in the terminal until the user quits.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        if term_w < MIN_COLS || term_h < MIN_ROWS + CHROME_ROWS {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                MIN_COLS,
                MIN_ROWS + CHROME_ROWS,
                term_w,
                term_h,
            );
        }
        self.renderer.resize(canvas_contract(term_w, term_h));
        info!("playing {} at {} ticks/s on {term_w}x{term_h}", self.game.name(), self.tick_rate);

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();

        let mut out = Outputs::default();
        self.game.shutdown(&mut out);
        self.note_sounds(&out.sounds);
        info!("quit after {} ticks", self.tick);

        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let frame_time = Duration::from_secs_f64(1.0 / f64::from(self.tick_rate));
        self.render_menubar(stdout)?;

        loop {
            let deadline = Instant::now() + frame_time;
            let mut out = Outputs::default();

            while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
                if !event::poll(remaining)? {
                    break;
                }
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => match self.command(&key) {
                        Some(Command::Quit) => return Ok(()),
                        Some(Command::ToggleMusic) => self.game.toggle_music(&mut out),
                        Some(Command::ToggleSound) => self.game.toggle_sound(&mut out),
                        None => {}
                    },
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(w, h) => {
                        self.renderer.resize(canvas_contract(w, h));
                        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
                        self.render_menubar(stdout)?;
                    }
                    _ => {}
                }
            }

            self.step(&mut out);
            let frame = self.renderer.render(&out);
            self.draw(stdout, &frame)?;
            if self.note_sounds(&out.sounds) && self.bell {
                queue!(stdout, style::Print('\u{7}'))?;
            }
            self.render_status(stdout)?;
        }
    }

    pub fn command(&self, key: &KeyEvent) -> Option<Command> {
        let b = &self.bindings;
        if matches_binding(&b.quit, key) || matches_binding(&b.quit_alt, key) {
            Some(Command::Quit)
        } else if matches_binding(&b.toggle_music, key) {
            Some(Command::ToggleMusic)
        } else if matches_binding(&b.toggle_sound, key) {
            Some(Command::ToggleSound)
        } else {
            None
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(p) = canvas_point(mouse.column, mouse.row, self.grid, self.renderer.contract()) else {
            return;
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.mouse = p;
                self.click = Some(p);
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => self.mouse = p,
            _ => {}
        }
    }

    /// Run one game tick with the input gathered since the last one.
    pub fn step(&mut self, out: &mut Outputs) {
        let ctx = FrameContext {
            tick: self.tick,
            grid: self.grid,
            mouse: self.mouse,
            click: self.click.take(),
        };
        self.game.tick(&ctx, out);
        self.tick += 1;
    }

    /// Track music and effects for the status bar. Returns true when an
    /// effect played this tick.
    pub fn note_sounds(&mut self, sounds: &[SoundRequest]) -> bool {
        let mut effect = false;
        for sound in sounds {
            match sound {
                SoundRequest::Once(id) => {
                    debug!("effect {id}");
                    self.last_effect = Some(id.clone());
                    effect = true;
                }
                SoundRequest::Looping(id) => {
                    info!("music {id}");
                    self.now_playing = Some(id.clone());
                }
                SoundRequest::Stop => {
                    debug!("music stopped");
                    self.now_playing = None;
                }
            }
        }
        effect
    }

    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in menu_items(&self.bindings).iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item)?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn draw(&self, stdout: &mut io::Stdout, frame: &Frame) -> Result<()> {
        match frame {
            Frame::Full { cells } => {
                for (y, row) in cells.iter().enumerate() {
                    queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
                    for cell in row {
                        let cs = to_content_style(&cell.style);
                        queue!(stdout, style::PrintStyledContent(style::StyledContent::new(cs, cell.ch)))?;
                    }
                }
            }
            Frame::Diff { changes } => {
                for change in changes {
                    let cs = to_content_style(&change.cell.style);
                    queue!(
                        stdout,
                        cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                        style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
                    )?;
                }
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.renderer.contract().height + CANVAS_OFFSET;
        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, self.status_line())),
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn status_line(&self) -> String {
        let audio = self.game.audio();
        let on_off = |on: bool| if on { "on" } else { "off" };
        let phase = match self.game.phase() {
            Phase::Title => "title",
            Phase::Active => "playing",
        };
        let mut status = format!(
            " {} | {phase} | tick {} | music {} | sound {}",
            self.game.name(),
            self.tick,
            on_off(audio.music()),
            on_off(audio.sound()),
        );
        if let Some(track) = &self.now_playing {
            status.push_str(&format!(" | \u{266a} {track}"));
        }
        if let Some(effect) = &self.last_effect {
            status.push_str(&format!(" | last sound {effect}"));
        }
        status.push(' ');
        status
    }
}

/// Canvas size for a terminal of `w`×`h`, leaving room for the bars.
pub fn canvas_contract(w: u16, h: u16) -> TerminalContract {
    TerminalContract {
        width: w,
        height: h.saturating_sub(CHROME_ROWS),
    }
}

/// World point under a terminal cell, or `None` outside the canvas.
pub fn canvas_point(column: u16, row: u16, grid: Grid, contract: &TerminalContract) -> Option<Point> {
    let row = row.checked_sub(CANVAS_OFFSET)?;
    if column >= contract.width || row >= contract.height {
        return None;
    }
    Some(cell_to_world(column, row, grid, contract))
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = s.fg {
        cs.foreground_color = Some(style::Color::Rgb { r: fg.r, g: fg.g, b: fg.b });
    }
    if let Some(bg) = s.bg {
        cs.background_color = Some(style::Color::Rgb { r: bg.r, g: bg.g, b: bg.b });
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    cs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::GameKind;
    use crate::types::Rgb;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn player() -> Player {
        let config = ArcadeConfig::default();
        let grid = Grid::default();
        Player::new(GameKind::Vertices.build(&config, grid, Some(7)), &config, grid)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn keys_map_to_commands() {
        let p = player();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(p.command(&key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(p.command(&key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(p.command(&key(KeyCode::Char('m'))), Some(Command::ToggleMusic));
        assert_eq!(p.command(&key(KeyCode::Char('s'))), Some(Command::ToggleSound));
        assert_eq!(p.command(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn menu_and_status_rows_are_not_canvas() {
        let contract = canvas_contract(80, 24);
        assert_eq!(contract.height, 22);
        let grid = Grid::default();
        assert_eq!(canvas_point(0, 0, grid, &contract), None);
        assert_eq!(canvas_point(0, 23, grid, &contract), None);
        assert_eq!(canvas_point(80, 5, grid, &contract), None);
        let top_left = canvas_point(0, 1, grid, &contract).unwrap();
        assert_eq!(top_left.x, 8.0);
        assert!(top_left.y > 700.0);
    }

    #[test]
    fn clicks_reach_the_next_tick_only() {
        let mut p = player();
        p.handle_mouse(mouse(MouseEventKind::Moved, 40, 12));
        assert!(p.click.is_none());
        p.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, 12));
        assert!(p.click.is_some());
        p.step(&mut Outputs::default());
        assert!(p.click.is_none());
        assert_eq!(p.tick(), 1);
    }

    #[test]
    fn first_tick_starts_title_music() {
        let mut p = player();
        let mut out = Outputs::default();
        p.step(&mut out);
        assert!(!p.note_sounds(&out.sounds));
        assert_eq!(p.now_playing(), Some("vertices/sounds/title.ogg"));
        assert!(p.status_line().contains("vertices | title | tick 1 | music on | sound on"));

        assert!(p.note_sounds(&[SoundRequest::Once("x.wav".into()), SoundRequest::Stop]));
        assert_eq!(p.now_playing(), None);
        assert!(p.status_line().contains("last sound x.wav"));
    }

    #[test]
    fn styles_convert_to_truecolor() {
        let cs = to_content_style(&Style {
            fg: Some(Rgb { r: 1, g: 2, b: 3 }),
            bg: None,
            bold: true,
        });
        assert_eq!(cs.foreground_color, Some(style::Color::Rgb { r: 1, g: 2, b: 3 }));
        assert_eq!(cs.background_color, None);
        assert!(cs.attributes.has(style::Attribute::Bold));
    }
}
