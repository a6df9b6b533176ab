//! The gate is textual, so it misfires both ways. These cases pin down the
//! known misfires so a change in behaviour is deliberate.

use xprint::validation::{
    validate_command_count, validate_display_name, validate_key, validate_shape, validate_source,
    SubmissionValidator, ValidationConfig, ValidationError,
};
use xprint::Command;

fn interpreter(body: &str) -> String {
    format!("fn interpret(json_string, printer, order) {{\n{}\n}}\n", body)
}

fn gate(source: &str) -> Result<(), ValidationError> {
    validate_source(source)?;
    validate_shape(source)
}

#[test]
fn test_accepts_typical_receipts() {
    let plain = interpreter(
        r#"    printer.add_text_align("CENTER");
    printer.add_text(order.store_name);
    for item in order.items {
        printer.add_text(pad_right(item.name, 20) + money(item.total_price));
    }
    printer.add_barcode(order.order_id, "CODE128");
    printer.cut_paper();"#,
    );
    assert_eq!(gate(&plain), Ok(()));

    let bounded = interpreter(
        r#"    let i = 0;
    while i < 3 { printer.add_feed_line(1); i += 1; }"#,
    );
    assert_eq!(gate(&bounded), Ok(()));
}

#[test]
fn test_benign_text_rejected() {
    // words that merely contain a restricted fragment
    for body in [
        r#"    printer.add_text("Thanks for the invoke-free visit");"#,
        r#"    printer.add_text("Socket wrench sale");"#,
        r#"    printer.add_text("Self reflection hour");"#,
        r#"    printer.add_text("Download(s) available");"#,
    ] {
        assert!(
            matches!(
                gate(&interpreter(body)),
                Err(ValidationError::RestrictedOperation { .. })
            ),
            "{}",
            body
        );
    }

    // a helper called often enough looks like recursion
    let mut body = String::from("    fn row(t) { t }\n");
    for _ in 0..10 {
        body.push_str("    printer.add_text(row(\"x\"));\n");
    }
    assert!(matches!(
        gate(&interpreter(&body)),
        Err(ValidationError::ExcessiveRecursion { .. })
    ));

    // a loop with an exit condition the heuristic cannot see
    let watched = interpreter("    let n = 0;\n    loop { n += 1; if n > 3 { return; } }");
    assert_eq!(gate(&watched), Err(ValidationError::InfiniteLoop));
}

#[test]
fn test_disguised_code_accepted() {
    // a spin loop that mentions the escape word in a comment
    let spin = interpreter("    // no break here\n    loop { }");
    assert_eq!(gate(&spin), Ok(()));

    // a restricted name assembled at runtime
    let assembled = interpreter(r#"    let name = "ev" + "al";
    printer.add_text(name);"#);
    assert_eq!(gate(&assembled), Ok(()));

    // a conditional that never ends
    let endless = interpreter("    let x = 1;\n    while x > 0 { x += 1; }");
    assert_eq!(gate(&endless), Ok(()));
}

#[test]
fn test_entry_point_shape() {
    assert_eq!(
        validate_shape("fn interpret(json, printer, order) {}"),
        Err(ValidationError::MissingEntryPoint)
    );
    assert_eq!(
        validate_shape("fn interpret(json_string, printer) {}"),
        Err(ValidationError::MissingEntryPoint)
    );
    assert_eq!(
        validate_shape("fn   interpret ( json_string ,printer,  order ) {}"),
        Ok(())
    );
}

#[test]
fn test_identity_rules() {
    assert_eq!(validate_key("team_01-b"), Ok("team_01-b".to_string()));
    assert_eq!(validate_key(""), Err(ValidationError::EmptyKey));
    assert_eq!(validate_key(&"k".repeat(50)).map(|k| k.len()), Ok(50));
    assert_eq!(
        validate_key(&"k".repeat(51)),
        Err(ValidationError::KeyTooLong { max: 50 })
    );
    assert!(matches!(
        validate_key("team/../x"),
        Err(ValidationError::InvalidKey(_))
    ));

    assert_eq!(validate_display_name(None), "Unknown");
    assert_eq!(validate_display_name(Some("<b>")), "b");
}

#[test]
fn test_command_count_bounds() {
    let empty: Vec<Command> = Vec::new();
    assert_eq!(validate_command_count(&empty), Err(ValidationError::NoCommands));

    let full = vec![Command::CutPaper; 1000];
    assert_eq!(validate_command_count(&full), Ok(()));

    let over = vec![Command::CutPaper; 1001];
    assert_eq!(
        validate_command_count(&over),
        Err(ValidationError::TooManyCommands {
            max: 1000,
            actual: 1001
        })
    );
}

#[test]
fn test_custom_config_tightens_gate() {
    let validator = SubmissionValidator::new(ValidationConfig {
        max_self_calls: 2,
        deny_list: vec!["coupon".to_string()],
        ..ValidationConfig::default()
    });

    let body = interpreter(r#"    printer.add_text("COUPON inside");"#);
    assert!(matches!(
        validator.validate_source(&body),
        Err(ValidationError::RestrictedOperation { pattern }) if pattern == "coupon"
    ));

    let calls = interpreter("    fn h() { 1 }\n    h();\n    h();");
    assert!(matches!(
        validator.validate_source(&calls),
        Err(ValidationError::ExcessiveRecursion { calls: 3, .. })
    ));
}
