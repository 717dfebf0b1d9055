#![forbid(unsafe_code)]

//! Clipboard capability.
//!
//! The shell only needs "put this text on the clipboard". The terminal
//! implementation uses OSC 52 (`ESC ] 52 ; c ; <base64> BEL`), wrapped in a
//! DCS passthrough when running under tmux or GNU screen.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Clipboard errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    NotAvailable,
    /// Encoded payload exceeds what terminals accept.
    PayloadTooLarge { encoded: usize, max: usize },
    WriteError(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "clipboard not available"),
            Self::PayloadTooLarge { encoded, max } => {
                write!(f, "OSC 52 payload too large ({encoded} > {max})")
            }
            Self::WriteError(msg) => write!(f, "clipboard write failed: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Something that can receive copied text.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

impl<S: ClipboardSink + ?Sized> ClipboardSink for Box<S> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// Multiplexer wrapping applied around the OSC 52 sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    None,
    /// `ESC P tmux; <ESC-doubled seq> ESC \`
    Tmux,
    /// `ESC P <seq> ESC \`
    Screen,
}

impl Passthrough {
    /// Pick the wrapping from the `TMUX` / `STY` environment variables.
    pub fn detect(var: impl Fn(&str) -> Option<String>) -> Self {
        if var("TMUX").is_some_and(|v| !v.is_empty()) {
            Self::Tmux
        } else if var("STY").is_some_and(|v| !v.is_empty()) {
            Self::Screen
        } else {
            Self::None
        }
    }
}

/// OSC 52 clipboard writing to a terminal stream.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    writer: W,
    passthrough: Passthrough,
    max_payload: usize,
}

impl<W: Write> Osc52Clipboard<W> {
    /// Largest base64 payload sent.
    pub const DEFAULT_MAX_PAYLOAD: usize = 74_994;

    pub fn new(writer: W, passthrough: Passthrough) -> Self {
        Self {
            writer,
            passthrough,
            max_payload: Self::DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Passthrough detected from the process environment.
    pub fn from_env(writer: W) -> Self {
        Self::new(writer, Passthrough::detect(|k| std::env::var(k).ok()))
    }

    #[must_use]
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        if max_payload > 0 {
            self.max_payload = max_payload;
        }
        self
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_wrapped(&mut self, seq: &[u8]) -> std::io::Result<()> {
        match self.passthrough {
            Passthrough::None => self.writer.write_all(seq)?,
            Passthrough::Tmux => {
                self.writer.write_all(b"\x1bPtmux;")?;
                for &byte in seq {
                    if byte == 0x1b {
                        self.writer.write_all(b"\x1b\x1b")?;
                    } else {
                        self.writer.write_all(&[byte])?;
                    }
                }
                self.writer.write_all(b"\x1b\\")?;
            }
            Passthrough::Screen => {
                self.writer.write_all(b"\x1bP")?;
                self.writer.write_all(seq)?;
                self.writer.write_all(b"\x1b\\")?;
            }
        }
        self.writer.flush()
    }
}

impl<W: Write> ClipboardSink for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let encoded = STANDARD.encode(text.as_bytes());
        if encoded.len() > self.max_payload {
            return Err(ClipboardError::PayloadTooLarge {
                encoded: encoded.len(),
                max: self.max_payload,
            });
        }
        let seq = format!("\x1b]52;c;{encoded}\x07");
        self.write_wrapped(seq.as_bytes())
            .map_err(|e| ClipboardError::WriteError(e.to_string()))?;
        tracing::debug!(bytes = text.len(), passthrough = ?self.passthrough, "clipboard write");
        Ok(())
    }
}

/// In-memory clipboard. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingClipboard {
    writes: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that records nothing and always fails.
    pub fn failing() -> Self {
        Self {
            writes: Rc::default(),
            fail: true,
        }
    }

    /// Everything written so far, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl ClipboardSink for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::NotAvailable);
        }
        self.writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(clip: Osc52Clipboard<Vec<u8>>) -> String {
        String::from_utf8(clip.into_inner()).expect("utf8")
    }

    #[test]
    fn writes_osc52_sequence() {
        let mut clip = Osc52Clipboard::new(Vec::new(), Passthrough::None);
        clip.write_text("hello").expect("write");
        assert_eq!(written(clip), "\x1b]52;c;aGVsbG8=\x07");
    }

    #[test]
    fn tmux_passthrough_doubles_escapes() {
        let mut clip = Osc52Clipboard::new(Vec::new(), Passthrough::Tmux);
        clip.write_text("hi").expect("write");
        assert_eq!(written(clip), "\x1bPtmux;\x1b\x1b]52;c;aGk=\x07\x1b\\");
    }

    #[test]
    fn screen_passthrough_wraps_sequence() {
        let mut clip = Osc52Clipboard::new(Vec::new(), Passthrough::Screen);
        clip.write_text("hi").expect("write");
        assert_eq!(written(clip), "\x1bP\x1b]52;c;aGk=\x07\x1b\\");
    }

    #[test]
    fn size_limit_is_enforced() {
        let mut clip = Osc52Clipboard::new(Vec::new(), Passthrough::None).with_max_payload(8);
        let err = clip.write_text("more than six bytes").unwrap_err();
        assert!(matches!(err, ClipboardError::PayloadTooLarge { max: 8, .. }));
        assert!(clip.writer().is_empty());
    }

    #[test]
    fn zero_max_payload_keeps_default() {
        let clip = Osc52Clipboard::new(Vec::new(), Passthrough::None).with_max_payload(0);
        assert_eq!(clip.max_payload, Osc52Clipboard::<Vec<u8>>::DEFAULT_MAX_PAYLOAD);
    }

    #[test]
    fn passthrough_detection() {
        assert_eq!(
            Passthrough::detect(|k| (k == "TMUX").then(|| "/tmp/tmux-0".into())),
            Passthrough::Tmux
        );
        assert_eq!(
            Passthrough::detect(|k| (k == "STY").then(|| "1234.pts".into())),
            Passthrough::Screen
        );
        assert_eq!(Passthrough::detect(|_| Some(String::new())), Passthrough::None);
        assert_eq!(Passthrough::detect(|_| None), Passthrough::None);
    }

    #[test]
    fn recording_clones_share_history() {
        let clip = RecordingClipboard::new();
        let mut sink: Box<dyn ClipboardSink> = Box::new(clip.clone());
        sink.write_text("a").expect("write");
        sink.write_text("b").expect("write");
        assert_eq!(clip.writes(), vec!["a", "b"]);
        assert_eq!(
            RecordingClipboard::failing().write_text("x"),
            Err(ClipboardError::NotAvailable)
        );
    }
}
