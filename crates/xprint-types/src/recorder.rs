//! Capability recorder: a virtual printer that logs every call.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::command::{Alignment, BarcodeType, Command, TextSize, DEFAULT_QR_SIZE};

/// Append-only printer command log.
///
/// Clones share the same log, so the recorder can be moved into a script
/// scope while the caller keeps a handle to read the result afterwards.
/// Every method appends exactly one command and never fails.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRecorder {
    commands: Arc<Mutex<Vec<Command>>>,
}

impl CapabilityRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_text(&self, text: impl Into<String>) {
        self.push(Command::text(text));
    }

    pub fn set_text_style(&self, bold: bool, size: TextSize, underline: bool) {
        self.push(Command::style(bold, size, underline));
    }

    pub fn set_alignment(&self, alignment: Alignment) {
        self.push(Command::align(alignment));
    }

    /// Pass `None` for the default module size.
    pub fn emit_qr(&self, data: impl Into<String>, size: Option<u32>) {
        self.push(Command::AddQrCode {
            data: data.into(),
            size: size.unwrap_or(DEFAULT_QR_SIZE),
        });
    }

    pub fn emit_barcode(&self, data: impl Into<String>, symbology: BarcodeType) {
        self.push(Command::AddBarcode {
            data: data.into(),
            symbology,
        });
    }

    pub fn feed_lines(&self, count: u32) {
        self.push(Command::feed(count));
    }

    pub fn cut(&self) {
        self.push(Command::CutPaper);
    }

    /// Snapshot of the log in call order.
    pub fn get_commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().is_empty()
    }

    fn push(&self, command: Command) {
        self.commands.lock().push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_call_order() {
        let rec = CapabilityRecorder::new();
        rec.set_alignment(Alignment::Center);
        rec.emit_text("hello");
        rec.feed_lines(2);
        rec.cut();

        assert_eq!(
            rec.get_commands(),
            vec![
                Command::align(Alignment::Center),
                Command::text("hello"),
                Command::feed(2),
                Command::CutPaper,
            ]
        );
        assert_eq!(rec.len(), 4);
    }

    #[test]
    fn test_qr_defaults_size() {
        let rec = CapabilityRecorder::new();
        rec.emit_qr("https://example.test", None);
        rec.emit_qr("x", Some(8));
        let cmds = rec.get_commands();
        assert_eq!(
            cmds[0],
            Command::AddQrCode {
                data: "https://example.test".into(),
                size: DEFAULT_QR_SIZE
            }
        );
        assert_eq!(
            cmds[1],
            Command::AddQrCode {
                data: "x".into(),
                size: 8
            }
        );
    }

    #[test]
    fn test_clones_share_log() {
        let rec = CapabilityRecorder::new();
        let handle = rec.clone();
        handle.emit_text("from clone");
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let rec = CapabilityRecorder::new();
        rec.emit_text("a");
        let snapshot = rec.get_commands();
        rec.emit_text("b");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn test_fresh_recorders_are_independent() {
        let a = CapabilityRecorder::new();
        let b = CapabilityRecorder::new();
        a.cut();
        assert!(b.is_empty());
    }
}
