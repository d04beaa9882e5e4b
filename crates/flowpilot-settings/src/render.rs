//! Rendering
//!
//! The settings surface does not draw widgets itself. Each frame it composes
//! a [`Frame`] (panel selector, visible rows, notices) and hands it to a
//! [`Renderer`].

use crate::controller::{Notice, PanelButton, PanelSwitchController};
use crate::panel::{ButtonStyle, RowValue};
use std::fmt;
use std::io::Write;

/// Virtual width the layout is designed for
pub const VIRTUAL_WIDTH: f32 = 1280.0;
/// Virtual height the layout is designed for
pub const VIRTUAL_HEIGHT: f32 = 720.0;

/// Fit viewport: scales the virtual area uniformly into the window and
/// letterboxes the rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub virtual_width: f32,
    pub virtual_height: f32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(VIRTUAL_WIDTH, VIRTUAL_HEIGHT)
    }
}

impl Viewport {
    pub fn new(virtual_width: f32, virtual_height: f32) -> Self {
        let mut viewport = Self {
            virtual_width,
            virtual_height,
            screen_width: 0,
            screen_height: 0,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        viewport.update(virtual_width as u32, virtual_height as u32);
        viewport
    }

    /// Recompute scale and letterbox for a new window size
    pub fn update(&mut self, width: u32, height: u32) {
        self.screen_width = width;
        self.screen_height = height;
        if width == 0 || height == 0 || self.virtual_width <= 0.0 || self.virtual_height <= 0.0 {
            self.scale = 0.0;
            self.offset_x = 0.0;
            self.offset_y = 0.0;
            return;
        }

        let sx = width as f32 / self.virtual_width;
        let sy = height as f32 / self.virtual_height;
        self.scale = sx.min(sy);
        self.offset_x = (width as f32 - self.virtual_width * self.scale) / 2.0;
        self.offset_y = (height as f32 - self.virtual_height * self.scale) / 2.0;
    }

    /// Map a window coordinate into virtual space. `None` inside the
    /// letterbox bars.
    pub fn to_virtual(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.scale <= 0.0 {
            return None;
        }
        let vx = (x - self.offset_x) / self.scale;
        let vy = (y - self.offset_y) / self.scale;
        let inside =
            (0.0..=self.virtual_width).contains(&vx) && (0.0..=self.virtual_height).contains(&vy);
        inside.then_some((vx, vy))
    }
}

/// Selector entry as drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameButton {
    pub title: String,
    pub checked: bool,
}

/// Row as drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRow {
    /// Index of the row on its panel
    pub index: usize,
    pub label: String,
    pub value: RowValue,
    pub divider: bool,
}

/// Everything drawn in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub title: String,
    pub buttons: Vec<FrameButton>,
    pub rows: Vec<FrameRow>,
    /// Rows hidden above and below the visible window
    pub hidden_above: usize,
    pub hidden_below: usize,
    pub notices: Vec<Notice>,
    pub viewport: Viewport,
    pub delta: f32,
}

impl Frame {
    /// Compose a frame from the controller's current state
    pub fn compose(
        controller: &PanelSwitchController,
        rows_per_page: usize,
        viewport: Viewport,
        notices: Vec<Notice>,
        delta: f32,
    ) -> Self {
        let panel = controller.panel();
        let offset = controller.session().scroll_offset.min(panel.rows.len());
        let end = offset.saturating_add(rows_per_page).min(panel.rows.len());

        let rows = panel.rows[offset..end]
            .iter()
            .enumerate()
            .map(|(i, row)| FrameRow {
                index: offset + i,
                label: row.label.clone(),
                value: row.value.clone(),
                divider: row.divider,
            })
            .collect();

        Self {
            title: panel.title.clone(),
            buttons: controller
                .panel_buttons()
                .into_iter()
                .map(|PanelButton { title, checked, .. }| FrameButton { title, checked })
                .collect(),
            rows,
            hidden_above: offset,
            hidden_below: panel.rows.len() - end,
            notices,
            viewport,
            delta,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selector: Vec<String> = self
            .buttons
            .iter()
            .map(|b| {
                if b.checked {
                    format!("[{}]", b.title)
                } else {
                    format!(" {} ", b.title)
                }
            })
            .collect();
        writeln!(f, "{}", selector.join(" | "))?;
        writeln!(f, "== {} ==", self.title)?;

        if self.hidden_above > 0 {
            writeln!(f, "   ... {} more above", self.hidden_above)?;
        }
        for row in &self.rows {
            let value = match &row.value {
                RowValue::Text(text) => text.clone(),
                RowValue::Toggle(true) => "[x]".to_string(),
                RowValue::Toggle(false) => "[ ]".to_string(),
                RowValue::Button { caption, style } => match style {
                    ButtonStyle::Normal => format!("<{}>", caption),
                    ButtonStyle::Critical => format!("<!{}!>", caption),
                },
            };
            writeln!(f, "{:>2}. {:<36} {}", row.index, row.label, value)?;
            if row.divider {
                writeln!(f, "    {}", "-".repeat(44))?;
            }
        }
        if self.hidden_below > 0 {
            writeln!(f, "   ... {} more below", self.hidden_below)?;
        }

        for notice in &self.notices {
            writeln!(f, "{}", notice)?;
        }
        Ok(())
    }
}

/// Draws composed frames.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame) -> anyhow::Result<()>;

    /// Free drawing resources. Called exactly once, on dispose.
    fn release(&mut self);
}

/// Renderer that prints frames as plain text.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
    frames: u64,
    released: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frames: 0,
            released: false,
        }
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, frame: &Frame) -> anyhow::Result<()> {
        if self.released {
            anyhow::bail!("renderer has been released");
        }
        write!(self.out, "{}", frame)?;
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }

    fn release(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::warn!("Failed to flush renderer output: {}", e);
        }
        self.released = true;
    }
}
