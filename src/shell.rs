//! Line-oriented shell driving a [`SettingsScreen`].

use crate::host::ShellNavigator;
use anyhow::{anyhow, bail, Context};
use flowpilot_settings::{ActionOutcome, PanelName, ScreenRef, SettingsError, SettingsScreen};
use std::io::{BufRead, Write};
use std::rc::Rc;

const HELP: &str = "\
commands:
  panel <device|software|toggles>   switch panel
  toggle <row> [on|off]             set or flip a toggle
  press <row>                       press a button row
  scroll <n>                        scroll by n rows (negative for up)
  refresh                           re-read the active panel from the store
  resize <width> <height>           resize the window
  get <key>                         print a raw parameter value
  close                             leave settings
  help                              show this help
  quit                              exit";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Panel(String),
    Toggle { row: usize, value: Option<bool> },
    Press(usize),
    Scroll(isize),
    Refresh,
    Resize(u32, u32),
    Get(String),
    Close,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb, args.as_slice()) {
            ("panel" | "p", [name]) => ShellCommand::Panel(name.to_string()),
            ("toggle" | "t", [row]) => ShellCommand::Toggle {
                row: parse_row(row)?,
                value: None,
            },
            ("toggle" | "t", [row, value]) => ShellCommand::Toggle {
                row: parse_row(row)?,
                value: Some(parse_switch(value)?),
            },
            ("press" | "x", [row]) => ShellCommand::Press(parse_row(row)?),
            ("scroll" | "s", [delta]) => ShellCommand::Scroll(
                delta
                    .parse()
                    .with_context(|| format!("invalid scroll amount '{}'", delta))?,
            ),
            ("refresh" | "r", []) => ShellCommand::Refresh,
            ("resize", [w, h]) => ShellCommand::Resize(
                w.parse().with_context(|| format!("invalid width '{}'", w))?,
                h.parse().with_context(|| format!("invalid height '{}'", h))?,
            ),
            ("get", [key]) => ShellCommand::Get(key.to_string()),
            ("close", []) => ShellCommand::Close,
            ("help" | "?", []) => ShellCommand::Help,
            ("quit" | "exit" | "q", []) => ShellCommand::Quit,
            _ => bail!("unrecognised command '{}', try 'help'", line.trim()),
        };
        Ok(Some(command))
    }
}

fn parse_row(text: &str) -> anyhow::Result<usize> {
    text.parse()
        .map_err(|_| anyhow!("invalid row number '{}'", text))
}

fn parse_switch(text: &str) -> anyhow::Result<bool> {
    match text.to_ascii_lowercase().as_str() {
        "on" | "1" | "true" | "yes" => Ok(true),
        "off" | "0" | "false" | "no" => Ok(false),
        _ => bail!("expected on or off, got '{}'", text),
    }
}

/// Whether the shell keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Runs the settings screen against line input.
pub struct Shell<W: Write> {
    screen: SettingsScreen,
    navigator: Rc<ShellNavigator>,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(screen: SettingsScreen, navigator: Rc<ShellNavigator>, out: W) -> Self {
        Self {
            screen,
            navigator,
            out,
        }
    }

    pub fn screen(&self) -> &SettingsScreen {
        &self.screen
    }

    /// Show the screen, process `input` until it ends or the user leaves,
    /// then hide and dispose the screen.
    pub fn run<R: BufRead>(&mut self, input: R) -> anyhow::Result<()> {
        self.screen.show()?;
        self.screen.render(0.0)?;

        for line in input.lines() {
            let line = line.context("failed to read input")?;
            let command = match ShellCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(self.out, "error: {:#}", e)?;
                    continue;
                }
            };
            if self.execute(command)? == Flow::Exit {
                break;
            }
        }

        self.screen.hide()?;
        self.screen.dispose();
        Ok(())
    }

    /// Execute one command and draw the result.
    pub fn execute(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        let started = std::time::Instant::now();
        match self.apply(command) {
            Ok(Flow::Exit) => return Ok(Flow::Exit),
            Ok(Flow::Continue) => {}
            Err(e) => match e.downcast_ref::<SettingsError>() {
                Some(SettingsError::Disposed) => return Err(e),
                _ => writeln!(self.out, "error: {:#}", e)?,
            },
        }

        for request in self.navigator.take_requests() {
            if request == ScreenRef::OnRoad {
                writeln!(self.out, "leaving settings")?;
                return Ok(Flow::Exit);
            }
            writeln!(self.out, "-> {}", request)?;
        }

        self.screen.render(started.elapsed().as_secs_f32())?;
        Ok(Flow::Continue)
    }

    fn apply(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        match command {
            ShellCommand::Panel(name) => {
                self.screen
                    .controller_mut()?
                    .select_panel(&PanelName::new(name))?;
            }
            ShellCommand::Toggle { row, value } => {
                let controller = self.screen.controller_mut()?;
                match value {
                    Some(checked) => {
                        controller.set_toggle(row, checked)?;
                    }
                    None => {
                        controller.press(row)?;
                    }
                }
            }
            ShellCommand::Press(row) => {
                let outcome = self.screen.controller_mut()?.press(row)?;
                if let ActionOutcome::DeviceCommand(command) = outcome {
                    writeln!(self.out, "requested {}", command)?;
                }
            }
            ShellCommand::Scroll(delta) => {
                self.screen.controller_mut()?.scroll_by(delta);
            }
            ShellCommand::Refresh => self.screen.controller_mut()?.refresh()?,
            ShellCommand::Resize(width, height) => self.screen.resize(width, height)?,
            ShellCommand::Get(key) => {
                let value = self.screen.params().get(&key)?;
                writeln!(self.out, "{} = {}", key, value)?;
            }
            ShellCommand::Close => self.screen.on_close()?,
            ShellCommand::Help => writeln!(self.out, "{}", HELP)?,
            ShellCommand::Quit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }
}
