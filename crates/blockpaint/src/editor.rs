//! The editor state a front end drives with pointer and key events.
//!
//! A mouse-down calls [`Editor::begin_stroke`], then every pointer position
//! goes to [`Editor::pointer`] together with the held button. With no button
//! held the active tool only previews; the front end renders
//! [`Editor::render`] to show canvas and preview together.

use crate::canvas::{Canvas, GridSize};
use crate::hires;
use crate::history::History;
use crate::import::{self, ImportOptions};
use crate::palette::Palette;
use crate::preview::Preview;
use crate::settings::Settings;
use crate::shapes::{self, Surface};
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;

/// Drawing tools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Freehand pixels.
    #[default]
    Pixel,
    /// Whole blocks in one color.
    Block,
    /// Rubber-band line.
    Line,
    /// Rubber-band circle around the drag origin.
    Circle,
}

impl Tool {
    pub fn next(self) -> Self {
        match self {
            Tool::Pixel => Tool::Block,
            Tool::Block => Tool::Line,
            Tool::Line => Tool::Circle,
            Tool::Circle => Tool::Pixel,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tool::Pixel => "pixel",
            Tool::Block => "block",
            Tool::Line => "line",
            Tool::Circle => "circle",
        };
        f.write_str(name)
    }
}

/// Pointer button state during a move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Button {
    /// Hovering.
    #[default]
    None,
    /// Paints with the foreground drawing color.
    Primary,
    /// Paints with the background drawing color.
    Secondary,
}

/// Named editor commands, usually bound to keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Clear,
    FlipHorizontal,
    FlipVertical,
    Randomize,
    Undo,
    Redo,
    ToggleMinimalChange,
    CycleTool,
    CycleDithering,
    SwapPalette,
}

impl Command {
    /// Whether the command alters the image and so records history first.
    pub fn mutates(self) -> bool {
        matches!(
            self,
            Command::Clear | Command::FlipHorizontal | Command::FlipVertical | Command::Randomize
        )
    }
}

/// Canvas, history, preview and drawing state of one editing session.
#[derive(Clone, Debug)]
pub struct Editor {
    canvas: Canvas,
    settings: Settings,
    history: History,
    preview: Preview,
    palette: Palette,
    import: ImportOptions,
    fg: u8,
    bg: u8,
    tool: Tool,
    last: Option<(i32, i32, Button)>,
    drag: Option<(i32, i32)>,
    rng: StdRng,
}

impl Editor {
    pub fn new(size: GridSize) -> Self {
        Self::with_canvas(Canvas::new(size))
    }

    /// Start editing an existing image, e.g. one restored from a session.
    pub fn with_canvas(canvas: Canvas) -> Self {
        Self {
            canvas,
            settings: Settings::default(),
            history: History::new(),
            preview: Preview::new(),
            palette: Palette::default(),
            import: ImportOptions::default(),
            fg: 1,
            bg: 0,
            tool: Tool::default(),
            last: None,
            drag: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed seed for randomize and random dithering.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn import_options(&self) -> &ImportOptions {
        &self.import
    }

    pub fn set_import_options(&mut self, import: ImportOptions) {
        self.import = import;
    }

    pub fn fg(&self) -> u8 {
        self.fg
    }

    pub fn set_fg(&mut self, color: u8) {
        self.fg = color & 0x0f;
    }

    pub fn bg(&self) -> u8 {
        self.bg
    }

    pub fn set_bg(&mut self, color: u8) {
        self.bg = color & 0x0f;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.drag = None;
        self.preview.cancel();
    }

    /// Origin of a line or circle drag in progress.
    pub fn drag_origin(&self) -> Option<(i32, i32)> {
        self.drag
    }

    /// Pointer pressed: record history and drop any hover preview.
    pub fn begin_stroke(&mut self) {
        self.preview.cancel();
        self.history.save(&self.canvas);
    }

    /// Pointer moved to pixel `(px, py)` with `button` held.
    ///
    /// Repeated positions and positions outside the canvas are ignored.
    /// Returns `true` if canvas or preview may have changed.
    pub fn pointer(&mut self, px: i32, py: i32, button: Button) -> bool {
        if self.last == Some((px, py, button)) {
            return false;
        }
        if self.canvas.locate(px, py).is_none() {
            return false;
        }
        self.last = Some((px, py, button));
        if button != Button::None && matches!(self.tool, Tool::Pixel | Tool::Block) {
            self.preview.cancel();
        }

        let settings = self.settings;
        match (self.tool, button) {
            (Tool::Pixel, Button::None) => self.hover(px, py),
            (Tool::Pixel, Button::Primary) => self.canvas.set_pixel(px, py, self.fg, &settings),
            (Tool::Pixel, Button::Secondary) => self.canvas.set_pixel(px, py, self.bg, &settings),
            (Tool::Block, Button::None) => {
                self.preview.cancel();
                self.preview.fill_block(&self.canvas, px, py, self.fg);
            }
            (Tool::Block, Button::Primary) => self.canvas.fill_block(px, py, self.fg),
            (Tool::Block, Button::Secondary) => self.canvas.fill_block(px, py, self.bg),
            (Tool::Line | Tool::Circle, Button::None) => match self.drag.take() {
                Some(origin) => {
                    self.preview.cancel();
                    let tool = self.tool;
                    Self::stroke(tool, &mut self.canvas, origin, (px, py), self.fg, &settings);
                }
                None => self.hover(px, py),
            },
            (Tool::Line | Tool::Circle, Button::Primary) => match self.drag {
                Some(origin) => {
                    self.preview.cancel();
                    let mut surface = self.preview.surface(&self.canvas);
                    Self::stroke(self.tool, &mut surface, origin, (px, py), self.fg, &settings);
                }
                None => self.drag = Some((px, py)),
            },
            (Tool::Line | Tool::Circle, Button::Secondary) => return false,
        }
        true
    }

    fn hover(&mut self, px: i32, py: i32) {
        self.preview.cancel();
        self.preview.set_pixel(&self.canvas, px, py, self.fg, &self.settings);
    }

    fn stroke<S: Surface + ?Sized>(
        tool: Tool,
        surface: &mut S,
        origin: (i32, i32),
        to: (i32, i32),
        color: u8,
        settings: &Settings,
    ) {
        match tool {
            Tool::Circle => shapes::circle(surface, origin, to, color, settings),
            _ => shapes::line(surface, origin, to, color, settings),
        }
    }

    /// Run a command. Returns `false` if it had nothing to do
    /// (undo at the oldest snapshot, redo at the newest).
    pub fn execute(&mut self, command: Command) -> bool {
        self.preview.cancel();
        if command.mutates() {
            self.history.save(&self.canvas);
        }
        log::debug!("command {command:?}");
        match command {
            Command::Clear => self.canvas.clear(),
            Command::FlipHorizontal => self.canvas.flip_horizontal(),
            Command::FlipVertical => self.canvas.flip_vertical(),
            Command::Randomize => self.canvas.randomize(&mut self.rng),
            Command::Undo => return self.history.undo(&mut self.canvas),
            Command::Redo => return self.history.redo(&mut self.canvas),
            Command::ToggleMinimalChange => {
                self.settings.policy = self.settings.policy.toggled();
            }
            Command::CycleTool => {
                self.tool = self.tool.next();
                self.drag = None;
            }
            Command::CycleDithering => {
                self.import.dithering = self.import.dithering.next();
            }
            Command::SwapPalette => self.palette = self.palette.swapped(),
        }
        true
    }

    /// Reduce an RGBA image onto the canvas with the current palette and
    /// import options. A failed import leaves canvas and history untouched.
    pub fn import_image(&mut self, rgba: &[u8], width: usize, height: usize) -> Result<usize> {
        self.preview.cancel();
        let mut canvas = self.canvas.clone();
        let written = import::import_rgba(
            &mut canvas,
            rgba,
            width,
            height,
            &self.palette,
            &self.import,
            &mut self.rng,
        )?;
        self.commit_import(canvas);
        Ok(written)
    }

    /// Load a Hi-Eddi picture. A failed import leaves canvas and history untouched.
    pub fn import_hires(&mut self, data: &[u8]) -> Result<bool> {
        self.preview.cancel();
        let mut canvas = self.canvas.clone();
        let colored = hires::import_hires(&mut canvas, data)?;
        self.commit_import(canvas);
        Ok(colored)
    }

    fn commit_import(&mut self, canvas: Canvas) {
        self.history.save(&self.canvas);
        self.canvas = canvas;
    }

    /// RGBA pixels of the canvas with the preview on top.
    pub fn render(&self) -> Vec<u8> {
        self.canvas
            .to_rgba_with_preview(&self.preview, &self.palette, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RecolorPolicy;

    fn editor() -> Editor {
        Editor::new(GridSize::new(4, 4).unwrap()).with_seed(3)
    }

    #[test]
    fn test_hover_only_previews() {
        let mut e = editor();
        e.set_fg(5);
        assert!(e.pointer(3, 3, Button::None));
        assert_eq!(e.canvas(), &Canvas::new(GridSize::new(4, 4).unwrap()));
        assert_eq!(e.preview().get_pixel(e.canvas(), 3, 3, e.settings()), Some(5));

        // moving on replaces the old hover pixel
        e.pointer(20, 3, Button::None);
        assert_eq!(e.preview().get_pixel(e.canvas(), 3, 3, e.settings()), Some(0));
    }

    #[test]
    fn test_repeat_and_out_of_bounds_ignored() {
        let mut e = editor();
        assert!(e.pointer(1, 1, Button::Primary));
        assert!(!e.pointer(1, 1, Button::Primary));
        assert!(!e.pointer(-1, 1, Button::Primary));
        assert!(!e.pointer(32, 0, Button::Primary));
    }

    #[test]
    fn test_pixel_tool_paints_both_buttons() {
        let mut e = editor();
        e.set_fg(6);
        e.set_bg(2);
        e.begin_stroke();
        e.pointer(0, 0, Button::Primary);
        e.pointer(1, 0, Button::Secondary);
        let s = *e.settings();
        assert_eq!(e.canvas().get_pixel(0, 0, &s), Some(6));
        assert_eq!(e.canvas().get_pixel(1, 0, &s), Some(2));
        assert_eq!(e.history().len(), 1);
    }

    #[test]
    fn test_line_drag_previews_then_commits() {
        let mut e = editor();
        e.set_tool(Tool::Line);
        e.begin_stroke();
        e.pointer(0, 0, Button::Primary);
        assert_eq!(e.drag_origin(), Some((0, 0)));
        e.pointer(10, 0, Button::Primary);
        let s = *e.settings();
        assert_eq!(e.canvas().get_pixel(5, 0, &s), Some(0));
        assert_eq!(e.preview().get_pixel(e.canvas(), 5, 0, &s), Some(1));

        // release
        e.pointer(12, 0, Button::None);
        assert_eq!(e.drag_origin(), None);
        assert!(e.preview().is_empty());
        assert!((0..=12).all(|x| e.canvas().get_pixel(x, 0, &s) == Some(1)));
        assert_eq!(e.canvas().get_pixel(13, 0, &s), Some(0));
    }

    #[test]
    fn test_circle_commit() {
        let mut e = editor();
        e.set_tool(Tool::Circle);
        e.pointer(16, 16, Button::Primary);
        e.pointer(20, 16, Button::Primary);
        e.pointer(20, 16, Button::None);
        let s = *e.settings();
        assert_eq!(e.canvas().get_pixel(20, 16, &s), Some(1));
        assert_eq!(e.canvas().get_pixel(12, 16, &s), Some(1));
        assert_eq!(e.canvas().get_pixel(16, 16, &s), Some(0));
    }

    #[test]
    fn test_block_tool() {
        let mut e = editor();
        e.set_tool(Tool::Block);
        e.set_fg(9);
        e.pointer(9, 9, Button::Primary);
        let s = *e.settings();
        assert!((8..16).all(|x| e.canvas().get_pixel(x, 12, &s) == Some(9)));
    }

    #[test]
    fn test_commands_record_history() {
        let mut e = editor();
        e.pointer(0, 0, Button::Primary);
        let drawn = e.canvas().clone();
        assert!(e.execute(Command::FlipHorizontal));
        assert_eq!(e.history().len(), 1);
        assert!(e.execute(Command::Undo));
        assert_eq!(e.canvas(), &drawn);
        assert!(e.execute(Command::Redo));
        assert!(!e.execute(Command::Redo));
        let s = *e.settings();
        assert_eq!(e.canvas().get_pixel(31, 0, &s), Some(1));
    }

    #[test]
    fn test_mode_commands() {
        let mut e = editor();
        e.execute(Command::ToggleMinimalChange);
        assert_eq!(e.settings().policy, RecolorPolicy::MinimalChange);
        e.execute(Command::CycleTool);
        assert_eq!(e.tool(), Tool::Block);
        e.execute(Command::CycleDithering);
        assert_eq!(e.import_options().dithering, crate::Dithering::Random);
        let name = e.palette().name();
        e.execute(Command::SwapPalette);
        assert_ne!(e.palette().name(), name);
        assert!(e.history().is_empty());
    }

    #[test]
    fn test_render_includes_preview() {
        let mut e = editor();
        e.pointer(0, 0, Button::None);
        let rgba = e.render();
        let white = e.palette().get(1);
        assert_eq!(&rgba[0..4], &[white.r, white.g, white.b, 255]);
    }
}
