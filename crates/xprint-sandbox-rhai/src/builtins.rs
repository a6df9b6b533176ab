use rhai::{Dynamic, Engine, EvalAltResult, ImmutableString, INT};

use xprint_types::{Alignment, BarcodeType, CapabilityRecorder, TextSize};

/// Register all built-in APIs into an engine.
pub fn register_all(engine: &mut Engine) {
    register_printer(engine);
    register_json(engine);
    register_output(engine);
}

fn clamp_count(n: INT) -> u32 {
    u32::try_from(n.max(0)).unwrap_or(u32::MAX)
}

/// Printer methods, named after the printer API submitters write against.
/// Unknown enum names fall back to the enum default.
fn register_printer(engine: &mut Engine) {
    engine
        .register_type_with_name::<CapabilityRecorder>("Printer")
        .register_fn("add_text", |p: &mut CapabilityRecorder, text: Dynamic| {
            p.emit_text(text.to_string());
        })
        .register_fn(
            "add_text_style",
            |p: &mut CapabilityRecorder, bold: bool, size: ImmutableString, underline: bool| {
                let size: TextSize = size.as_str().parse().unwrap_or_default();
                p.set_text_style(bold, size, underline);
            },
        )
        .register_fn("add_text_align", |p: &mut CapabilityRecorder, align: ImmutableString| {
            let align: Alignment = align.as_str().parse().unwrap_or_default();
            p.set_alignment(align);
        })
        .register_fn("add_qr_code", |p: &mut CapabilityRecorder, data: Dynamic| {
            p.emit_qr(data.to_string(), None);
        })
        .register_fn(
            "add_qr_code",
            |p: &mut CapabilityRecorder, data: Dynamic, size: INT| {
                p.emit_qr(data.to_string(), Some(clamp_count(size)));
            },
        )
        .register_fn(
            "add_barcode",
            |p: &mut CapabilityRecorder, data: Dynamic, symbology: ImmutableString| {
                let symbology: BarcodeType = symbology.as_str().parse().unwrap_or_default();
                p.emit_barcode(data.to_string(), symbology);
            },
        )
        .register_fn("add_feed_line", |p: &mut CapabilityRecorder, lines: INT| {
            p.feed_lines(clamp_count(lines));
        })
        .register_fn("cut_paper", |p: &mut CapabilityRecorder| {
            p.cut();
        });
}

/// serde_json's `at line L column C` suffix points into the payload, not the
/// script, so it is left out of the message.
fn json_error_message(err: &serde_json::Error) -> String {
    let full = err.to_string();
    let reason = full
        .rsplit_once(" at line ")
        .map_or(full.as_str(), |(reason, _)| reason);
    format!("Invalid JSON: {}", reason)
}

fn parse_json(text: ImmutableString) -> Result<Dynamic, Box<EvalAltResult>> {
    let value: serde_json::Value =
        serde_json::from_str(text.as_str()).map_err(|e| json_error_message(&e))?;
    rhai::serde::to_dynamic(value)
}

fn register_json(engine: &mut Engine) {
    engine.register_fn("parse_json", parse_json);
}

fn register_output(engine: &mut Engine) {
    engine
        .on_print(|text| tracing::debug!(target: "xprint::script", "{}", text))
        .on_debug(|text, _source, pos| {
            tracing::debug!(target: "xprint::script", position = %pos, "{}", text)
        });
}
