// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line commands read from stdin.

use cube_model::ColorLabel;
use cube_session::SessionEvent;

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  start <n>             begin a session for an NxNxN cube
  capture               open the camera view
  stream                start sending frames to the vision service
  finish                stop streaming and open the editor
  edit                  open the editor
  pick <color>          choose the paint used by click
  click <x> <y>         paint the facelet under a surface point
  paint <idx> <color>   paint one facelet by index
  done                  validate the cube and hand it to play
  home                  return to the start screen
  resize <width>        change the surface width
  connect               reconnect to the vision service
  show                  redraw the editor
  help                  this text
  quit                  leave
colors: r b g o y w (or red, blue, green, orange, yellow, white)";

/// Parsed command from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Begin a session with the raw size typed by the user.
    Start {
        /// Requested side length (validated by the session).
        size: i64,
    },
    /// Open the camera view.
    Capture,
    /// Start streaming.
    Stream,
    /// Stop streaming and go to the editor.
    Finish,
    /// Open the editor.
    Edit,
    /// Select the click paint.
    Pick {
        /// Color to paint with.
        color: ColorLabel,
    },
    /// Click on the editor surface.
    Click {
        /// Surface x.
        x: u32,
        /// Surface y.
        y: u32,
    },
    /// Paint a facelet by index.
    Paint {
        /// Flat facelet index.
        facelet: usize,
        /// Color to paint with.
        color: ColorLabel,
    },
    /// Finish editing.
    Done,
    /// Go home.
    Home,
    /// Change the surface width.
    Resize {
        /// New width in pixels.
        width: u32,
    },
    /// Reconnect the vision channel.
    Connect,
    /// Redraw the editor.
    Show,
    /// Print usage.
    Help,
    /// Leave the client.
    Quit,
    /// Blank line.
    Empty,
    /// Unknown command.
    Unknown {
        /// The original input.
        input: String,
    },
    /// Command with missing or invalid arguments.
    InvalidArgs {
        /// Command name.
        command: String,
        /// Error message.
        error: String,
    },
}

impl Command {
    /// Session event for commands the session handles directly.
    pub fn into_event(self) -> Option<SessionEvent> {
        let ev = match self {
            Command::Start { size } => SessionEvent::Start { size },
            Command::Capture => SessionEvent::OpenCapture,
            Command::Stream => SessionEvent::StartStreaming,
            Command::Finish => SessionEvent::FinishCapture,
            Command::Edit => SessionEvent::OpenEditor,
            Command::Pick { color } => SessionEvent::SelectPaint(color),
            Command::Click { x, y } => SessionEvent::Click { x, y },
            Command::Paint { facelet, color } => SessionEvent::Paint { facelet, color },
            Command::Done => SessionEvent::FinishEditing,
            Command::Home => SessionEvent::GoHome,
            Command::Resize { width } => SessionEvent::Resize {
                surface_width: width,
            },
            Command::Connect
            | Command::Show
            | Command::Help
            | Command::Quit
            | Command::Empty
            | Command::Unknown { .. }
            | Command::InvalidArgs { .. } => return None,
        };
        Some(ev)
    }
}

fn invalid(command: &str, error: &str) -> Command {
    Command::InvalidArgs {
        command: command.into(),
        error: error.into(),
    }
}

fn color_arg(command: &str, arg: Option<&str>, usage: &str) -> Result<ColorLabel, Command> {
    let Some(arg) = arg else {
        return Err(invalid(command, usage));
    };
    match arg.parse::<ColorLabel>() {
        Ok(color) if !color.is_empty() => Ok(color),
        _ => Err(invalid(command, &format!("unknown color {arg:?}"))),
    }
}

/// Parse one input line.
pub fn parse(input: &str) -> Command {
    let input = input.trim();
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(command) = parts.first().copied() else {
        return Command::Empty;
    };

    match command {
        "start" => match parts.get(1).map(|s| s.parse::<i64>()) {
            Some(Ok(size)) => Command::Start { size },
            Some(Err(_)) => invalid("start", "cube size must be an integer"),
            None => invalid("start", "usage: start <n>"),
        },

        "capture" => Command::Capture,
        "stream" => Command::Stream,
        "finish" => Command::Finish,
        "edit" => Command::Edit,

        "pick" => match color_arg("pick", parts.get(1).copied(), "usage: pick <color>") {
            Ok(color) => Command::Pick { color },
            Err(cmd) => cmd,
        },

        "click" => match (parts.get(1), parts.get(2)) {
            (Some(x), Some(y)) => match (x.parse::<u32>(), y.parse::<u32>()) {
                (Ok(x), Ok(y)) => Command::Click { x, y },
                _ => invalid("click", "coordinates must be non-negative integers"),
            },
            _ => invalid("click", "usage: click <x> <y>"),
        },

        "paint" => {
            let usage = "usage: paint <idx> <color>";
            let Some(Ok(facelet)) = parts.get(1).map(|s| s.parse::<usize>()) else {
                return invalid("paint", usage);
            };
            match color_arg("paint", parts.get(2).copied(), usage) {
                Ok(color) => Command::Paint { facelet, color },
                Err(cmd) => cmd,
            }
        }

        "done" => Command::Done,
        "home" => Command::Home,

        "resize" => match parts.get(1).map(|s| s.parse::<u32>()) {
            Some(Ok(width)) if width > 0 => Command::Resize { width },
            _ => invalid("resize", "usage: resize <width> (pixels, > 0)"),
        },

        "connect" => Command::Connect,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,

        _ => Command::Unknown {
            input: input.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_start() {
        assert_eq!(parse("start 3"), Command::Start { size: 3 });
        assert_eq!(parse("  start -1 "), Command::Start { size: -1 });
        assert!(matches!(parse("start"), Command::InvalidArgs { command, .. } if command == "start"));
        assert!(matches!(parse("start three"), Command::InvalidArgs { .. }));
    }

    #[test]
    fn parse_paint_and_pick() {
        assert_eq!(
            parse("paint 12 o"),
            Command::Paint {
                facelet: 12,
                color: ColorLabel::Orange
            }
        );
        assert_eq!(
            parse("pick white"),
            Command::Pick {
                color: ColorLabel::White
            }
        );
        assert!(matches!(parse("pick x"), Command::InvalidArgs { .. }));
        assert!(matches!(parse("paint 3 purple"), Command::InvalidArgs { .. }));
        assert!(matches!(parse("paint red"), Command::InvalidArgs { .. }));
    }

    #[test]
    fn parse_click() {
        assert_eq!(parse("click 10 20"), Command::Click { x: 10, y: 20 });
        assert!(matches!(parse("click 10"), Command::InvalidArgs { .. }));
        assert!(matches!(parse("click -1 4"), Command::InvalidArgs { .. }));
    }

    #[test]
    fn parse_resize() {
        assert_eq!(parse("resize 640"), Command::Resize { width: 640 });
        assert!(matches!(parse("resize 0"), Command::InvalidArgs { .. }));
    }

    #[test]
    fn parse_bare_words() {
        assert_eq!(parse(""), Command::Empty);
        assert_eq!(parse("q"), Command::Quit);
        assert_eq!(parse("stream"), Command::Stream);
        assert!(matches!(parse("fly"), Command::Unknown { .. }));
    }

    #[test]
    fn only_session_commands_become_events() {
        assert!(matches!(
            parse("finish").into_event(),
            Some(SessionEvent::FinishCapture)
        ));
        assert!(matches!(
            parse("resize 300").into_event(),
            Some(SessionEvent::Resize { surface_width: 300 })
        ));
        assert!(parse("show").into_event().is_none());
        assert!(parse("quit").into_event().is_none());
    }
}
