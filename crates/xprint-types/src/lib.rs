pub mod command;
pub mod fixture;
pub mod recorder;
pub mod sandbox;

pub use command::{
    Alignment, BarcodeType, Command, PrinterCommand, TextSize, UnknownVariant, DEFAULT_QR_SIZE,
};
pub use fixture::{
    CustomerInfo, Fixture, FixtureSource, ItemPromotion, OrderItem, OrderPromotion, SplitPayment,
    TableInfo,
};
pub use recorder::CapabilityRecorder;
pub use sandbox::{
    Artifact, CancelFlag, SandboxError, ScriptBindings, ScriptSandbox, ENTRY_POINT, JSON_STRING,
    ORDER, PRINTER,
};
