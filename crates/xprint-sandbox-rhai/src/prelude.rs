//! Source wrapping for receipt interpreters.
//!
//! User code is placed between a fixed prelude of formatting helpers and a
//! single call to the entry point with the three bound values.

/// Helpers available to every interpreter. Must end with a newline so the
/// user's first line starts a fresh line.
pub const PRELUDE: &str = r#"fn pad_right(text, width) {
    let s = text.to_string();
    while s.len() < width { s += " "; }
    s
}
fn pad_left(text, width) {
    let s = text.to_string();
    while s.len() < width { s = " " + s; }
    s
}
fn money(amount) {
    let cents = (amount * 100.0).round().to_int();
    let sign = "";
    if cents < 0 { sign = "-"; cents = -cents; }
    let whole = cents / 100;
    let frac = cents % 100;
    let pad = if frac < 10 { "0" } else { "" };
    sign + whole.to_string() + "." + pad + frac.to_string()
}
"#;

pub const EPILOGUE: &str = "interpret(json_string, printer, order);\n";

/// Lines the prelude occupies ahead of user code.
pub fn wrapper_offset() -> usize {
    PRELUDE.lines().count()
}

pub fn wrap(source: &str) -> String {
    let mut wrapped = String::with_capacity(PRELUDE.len() + source.len() + EPILOGUE.len() + 1);
    wrapped.push_str(PRELUDE);
    wrapped.push_str(source);
    if !source.ends_with('\n') {
        wrapped.push('\n');
    }
    wrapped.push_str(EPILOGUE);
    wrapped
}
