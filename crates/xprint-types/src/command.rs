//! Printer command vocabulary.
//!
//! [`Command`] is the closed set of operations a receipt interpreter can
//! record. [`PrinterCommand`] is the flat `{type, params}` shape handed to
//! printer clients.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default QR module size used when the caller does not pass one.
pub const DEFAULT_QR_SIZE: u32 = 3;

// ================================
// Enums
// ================================

/// Character size supported by the printer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextSize {
    Small,
    #[default]
    Normal,
    Large,
    Xlarge,
}

impl TextSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextSize::Small => "SMALL",
            TextSize::Normal => "NORMAL",
            TextSize::Large => "LARGE",
            TextSize::Xlarge => "XLARGE",
        }
    }
}

/// Horizontal alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "LEFT",
            Alignment::Center => "CENTER",
            Alignment::Right => "RIGHT",
        }
    }
}

/// Barcode symbologies understood by the target printer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarcodeType {
    #[serde(rename = "UPC_A")]
    UpcA,
    #[serde(rename = "UPC_E")]
    UpcE,
    Ean13,
    Ean8,
    Code39,
    Itf,
    Codabar,
    Code93,
    #[default]
    Code128,
    #[serde(rename = "GS1_128")]
    Gs1_128,
    #[serde(rename = "GS1_DATABAR_OMNIDIRECTIONAL")]
    Gs1DatabarOmnidirectional,
    #[serde(rename = "GS1_DATABAR_TRUNCATED")]
    Gs1DatabarTruncated,
    #[serde(rename = "GS1_DATABAR_LIMITED")]
    Gs1DatabarLimited,
    #[serde(rename = "GS1_DATABAR_EXPANDED")]
    Gs1DatabarExpanded,
}

impl BarcodeType {
    pub const ALL: [BarcodeType; 14] = [
        BarcodeType::UpcA,
        BarcodeType::UpcE,
        BarcodeType::Ean13,
        BarcodeType::Ean8,
        BarcodeType::Code39,
        BarcodeType::Itf,
        BarcodeType::Codabar,
        BarcodeType::Code93,
        BarcodeType::Code128,
        BarcodeType::Gs1_128,
        BarcodeType::Gs1DatabarOmnidirectional,
        BarcodeType::Gs1DatabarTruncated,
        BarcodeType::Gs1DatabarLimited,
        BarcodeType::Gs1DatabarExpanded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeType::UpcA => "UPC_A",
            BarcodeType::UpcE => "UPC_E",
            BarcodeType::Ean13 => "EAN13",
            BarcodeType::Ean8 => "EAN8",
            BarcodeType::Code39 => "CODE39",
            BarcodeType::Itf => "ITF",
            BarcodeType::Codabar => "CODABAR",
            BarcodeType::Code93 => "CODE93",
            BarcodeType::Code128 => "CODE128",
            BarcodeType::Gs1_128 => "GS1_128",
            BarcodeType::Gs1DatabarOmnidirectional => "GS1_DATABAR_OMNIDIRECTIONAL",
            BarcodeType::Gs1DatabarTruncated => "GS1_DATABAR_TRUNCATED",
            BarcodeType::Gs1DatabarLimited => "GS1_DATABAR_LIMITED",
            BarcodeType::Gs1DatabarExpanded => "GS1_DATABAR_EXPANDED",
        }
    }
}

/// Returned when a printer enum name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

impl FromStr for TextSize {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "SMALL" => Ok(TextSize::Small),
            "NORMAL" => Ok(TextSize::Normal),
            "LARGE" => Ok(TextSize::Large),
            "XLARGE" | "X_LARGE" => Ok(TextSize::Xlarge),
            _ => Err(UnknownVariant {
                kind: "text size",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Alignment {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "LEFT" => Ok(Alignment::Left),
            "CENTER" | "CENTRE" => Ok(Alignment::Center),
            "RIGHT" => Ok(Alignment::Right),
            _ => Err(UnknownVariant {
                kind: "alignment",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for BarcodeType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        BarcodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UnknownVariant {
                kind: "barcode type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ================================
// Command
// ================================

/// One recorded printer operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    AddText {
        text: String,
    },
    SetTextStyle {
        bold: bool,
        size: TextSize,
        underline: bool,
    },
    SetAlignment {
        alignment: Alignment,
    },
    AddQrCode {
        data: String,
        size: u32,
    },
    AddBarcode {
        data: String,
        symbology: BarcodeType,
    },
    FeedLines {
        count: u32,
    },
    CutPaper,
}

impl Command {
    pub fn text(text: impl Into<String>) -> Self {
        Command::AddText { text: text.into() }
    }

    pub fn style(bold: bool, size: TextSize, underline: bool) -> Self {
        Command::SetTextStyle {
            bold,
            size,
            underline,
        }
    }

    pub fn align(alignment: Alignment) -> Self {
        Command::SetAlignment { alignment }
    }

    pub fn feed(count: u32) -> Self {
        Command::FeedLines { count }
    }

    /// Wire name used by printer clients.
    pub fn wire_type(&self) -> &'static str {
        match self {
            Command::AddText { .. } => "ADD_TEXT",
            Command::SetTextStyle { .. } => "ADD_TEXT_STYLE",
            Command::SetAlignment { .. } => "ADD_TEXT_ALIGN",
            Command::AddQrCode { .. } => "ADD_QR_CODE",
            Command::AddBarcode { .. } => "ADD_BARCODE",
            Command::FeedLines { .. } => "ADD_FEED_LINE",
            Command::CutPaper => "CUT_PAPER",
        }
    }

    /// Flatten into the `{type, params}` wire shape.
    pub fn to_wire(&self) -> PrinterCommand {
        let mut params = BTreeMap::new();
        match self {
            Command::AddText { text } => {
                params.insert("text".to_string(), text.clone());
            }
            Command::SetTextStyle {
                bold,
                size,
                underline,
            } => {
                params.insert("bold".to_string(), bold.to_string());
                params.insert("size".to_string(), size.to_string());
                params.insert("underline".to_string(), underline.to_string());
            }
            Command::SetAlignment { alignment } => {
                params.insert("alignment".to_string(), alignment.to_string());
            }
            Command::AddQrCode { data, size } => {
                params.insert("data".to_string(), data.clone());
                params.insert("size".to_string(), size.to_string());
            }
            Command::AddBarcode { data, symbology } => {
                params.insert("data".to_string(), data.clone());
                params.insert("type".to_string(), symbology.to_string());
            }
            Command::FeedLines { count } => {
                params.insert("lines".to_string(), count.to_string());
            }
            Command::CutPaper => {}
        }
        PrinterCommand {
            command_type: self.wire_type().to_string(),
            params,
        }
    }
}

/// Flat wire representation of a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterCommand {
    #[serde(rename = "type")]
    pub command_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}
