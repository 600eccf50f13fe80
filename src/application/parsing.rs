//! # Block Scanner
//!
//! Turns an agent script into an ordered list of commands and inline parse errors.
//!
//! The scanner holds a single mode and one pending body. While a block is open,
//! every line except that block's own start/end marker belongs to the body, so a
//! marker of a different kind (say a save start inside a bash block) is kept as
//! plain body text. Errors never stop the scan.

use crate::domain::markers::{self, Marker, MarkerLine};
use crate::domain::types::{BlockKind, Command, ParseError, ScanItem};
use crate::strings::messages;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Outside,
    InBash,
    InSave { path: String },
    InApplyChoices { path: String },
}

impl Mode {
    fn block(&self) -> Option<BlockKind> {
        match self {
            Mode::Outside => None,
            Mode::InBash => Some(BlockKind::Bash),
            Mode::InSave { .. } => Some(BlockKind::Save),
            Mode::InApplyChoices { .. } => Some(BlockKind::ApplyChoices),
        }
    }
}

/// Scans `lines` in order. Unclosed-block errors come last.
pub fn scan<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<ScanItem> {
    let mut scanner = Scanner::new();
    for line in lines {
        scanner.feed(line);
    }
    scanner.finish()
}

struct Scanner {
    mode: Mode,
    body: Vec<String>,
    items: Vec<ScanItem>,
    line: usize,
}

impl Scanner {
    fn new() -> Self {
        Self {
            mode: Mode::Outside,
            body: Vec::new(),
            items: Vec::new(),
            line: 0,
        }
    }

    fn feed(&mut self, line: &str) {
        self.line += 1;
        let Some(kind) = self.mode.block() else {
            self.outside(line);
            return;
        };

        match markers::classify(line).map(|found| found.marker) {
            Some(marker) if marker == kind.start() => self.error(messages::nested_start(kind)),
            Some(marker) if marker == kind.end() => self.close(),
            _ => self.body.push(line.to_string()),
        }
    }

    fn outside(&mut self, line: &str) {
        let Some(MarkerLine { marker, argument }) = markers::classify(line) else {
            return;
        };

        match marker {
            Marker::BashStart => self.open(Mode::InBash),
            Marker::SaveStart => match markers::marker_value(argument) {
                "" => self.error(messages::invalid_start(BlockKind::Save)),
                path => self.open(Mode::InSave {
                    path: path.to_string(),
                }),
            },
            Marker::ApplyChoicesStart => match markers::marker_value(argument) {
                "" => self.error(messages::invalid_start(BlockKind::ApplyChoices)),
                path => self.open(Mode::InApplyChoices {
                    path: path.to_string(),
                }),
            },
            Marker::ReadFile => match markers::marker_value(argument) {
                "" => self.error(messages::INVALID_READ_FILE.to_string()),
                path => self.emit(Command::ReadFile {
                    path: path.to_string(),
                }),
            },
            Marker::ReadDir => match markers::read_dir_parts(argument) {
                Some((path, pattern)) => self.emit(Command::ReadDir {
                    path: path.to_string(),
                    pattern: pattern.to_string(),
                }),
                None => self.error(messages::INVALID_READ_DIR.to_string()),
            },
            Marker::BashEnd | Marker::SaveEnd | Marker::ApplyChoicesEnd => {
                if let Some(kind) = marker.block() {
                    self.error(messages::end_without_start(kind));
                }
            }
        }
    }

    fn open(&mut self, mode: Mode) {
        self.body.clear();
        self.mode = mode;
    }

    fn close(&mut self) {
        let body = std::mem::take(&mut self.body);
        let command = match std::mem::replace(&mut self.mode, Mode::Outside) {
            Mode::InBash => Command::Bash { body },
            Mode::InSave { path } => Command::Save { path, body },
            Mode::InApplyChoices { path } => Command::ApplyChoices { path, body },
            Mode::Outside => return,
        };
        self.emit(command);
    }

    fn emit(&mut self, command: Command) {
        self.items.push(ScanItem::Command(command));
    }

    fn error(&mut self, message: String) {
        self.items.push(ScanItem::Error(ParseError {
            message,
            line: self.line,
        }));
    }

    fn finish(mut self) -> Vec<ScanItem> {
        if let Some(kind) = self.mode.block() {
            self.error(messages::unclosed_block(kind));
            self.mode = Mode::Outside;
            self.body.clear();
        }
        self.items
    }
}
