//! End-to-end flows through `PrintService`: submit, compile, run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use xprint::{
    header_commands, Alignment, Command, ExecuteResponse, JobStatus, PrintService, ServiceConfig,
    ServiceError, TextSize, TracingNotifier,
};

const RECEIPT: &str = r#"
fn interpret(json_string, printer, order) {
    let data = parse_json(json_string);
    printer.add_text_align("CENTER");
    printer.add_text_style(true, "LARGE", false);
    printer.add_text(order.store_name);
    printer.add_text_style(false, "NORMAL", false);
    printer.add_text_align("LEFT");
    for item in order.items {
        printer.add_text(pad_right(item.name, 16) + pad_left(money(item.total_price), 8));
    }
    printer.add_text(pad_right("TOTAL", 16) + pad_left(money(order.total_amount), 8));
    printer.add_qr_code(order.order_id);
    printer.add_feed_line(2);
    printer.add_text("Served by " + data.cashier);
    printer.cut_paper();
}
"#;

fn service(config: ServiceConfig) -> PrintService {
    PrintService::builder(config)
        .notifier(Arc::new(TracingNotifier))
        .build()
}

#[tokio::test]
async fn test_round_one_receipt() {
    let service = service(ServiceConfig::default());
    service.compile("burgers", RECEIPT, Some("Burger Team")).await.unwrap();

    let commands = service
        .execute("burgers", r#"{"cashier":"Sam"}"#, 1)
        .await
        .unwrap();

    let header = header_commands("burgers", 1);
    assert_eq!(&commands[..header.len()], header.as_slice());

    let body = &commands[header.len()..];
    assert_eq!(body[0], Command::align(Alignment::Center));
    assert_eq!(body[1], Command::style(true, TextSize::Large, false));
    assert_eq!(body[2], Command::text("BYTE BURGERS"));
    assert_eq!(
        body[5],
        Command::text(format!("{:<16}{:>8}", "Cheeseburger", "17.98"))
    );
    assert_eq!(
        body[8],
        Command::text(format!("{:<16}{:>8}", "TOTAL", "30.19"))
    );
    assert_eq!(
        body[9],
        Command::AddQrCode {
            data: "A-0042".into(),
            size: 3
        }
    );
    assert_eq!(body[10], Command::feed(2));
    assert_eq!(body[11], Command::text("Served by Sam"));
    assert_eq!(body.last(), Some(&Command::CutPaper));

    let wire = ExecuteResponse::from_result(&Ok(commands));
    let json = serde_json::to_value(&wire).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["commands"][0]["type"], "ADD_TEXT_ALIGN");
    assert_eq!(json["commands"][0]["params"]["alignment"], "CENTER");
}

#[tokio::test]
async fn test_compile_once_run_many_rounds() {
    let service = service(ServiceConfig::default());
    let source = "fn interpret(json_string, printer, order) {\n    if type_of(order) == \"()\" { printer.add_text(\"practice\"); } else { printer.add_text(order.order_id); }\n}";
    service.compile("rounds", source, None).await.unwrap();

    let mut seen = Vec::new();
    for round in 0..=5 {
        let commands = service.execute("rounds", "{}", round).await.unwrap();
        assert_eq!(commands[5], Command::text(format!("ROUND: {}", round)));
        seen.push(commands[9].clone());
    }
    assert_eq!(seen[0], Command::text("practice"));
    assert_eq!(seen[1], Command::text("A-0042"));
    assert_eq!(service.cache().size(), 1);
}

#[tokio::test]
async fn test_restricted_submission_is_failed_and_not_cached() {
    let service = service(ServiceConfig::default());
    service.compile("team", RECEIPT, None).await.unwrap();
    let before = service.cache().get("team").unwrap();

    let hostile = "fn interpret(json_string, printer, order) {\n    let rt = java.lang.Runtime;\n}";
    let err = service.compile("team", hostile, None).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Validation failed: Code contains restricted operations"
    );

    let job = service.job_tracker().get("team").unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error.as_deref(), Some("Code contains restricted operations"));

    let after = service.cache().get("team").unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

#[tokio::test]
async fn test_missing_entry_point_rejected() {
    let service = service(ServiceConfig::default());
    let err = service
        .compile("team", "fn run(printer) { printer.cut_paper(); }", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(service.cache().get("team").is_none());
}

#[tokio::test]
async fn test_execute_unknown_key() {
    let service = service(ServiceConfig::default());
    let err = service.execute("ghost", "{}", 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(service.jobs().is_empty());
}

#[tokio::test]
async fn test_runaway_interpreter_times_out() {
    let config = ServiceConfig {
        execution_timeout_ms: 300,
        ..ServiceConfig::default()
    };
    let service = service(config);
    let source = "fn interpret(json_string, printer, order) {\n    printer.add_text(\"start\");\n    loop { if false { break; } }\n}";
    service.compile("spinner", source, None).await.unwrap();

    let started = Instant::now();
    let err = service.execute("spinner", "{}", 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::Timeout(_)));
    assert!(started.elapsed() < Duration::from_secs(3));

    let response = ExecuteResponse::from_result(&Err(err));
    assert!(response.commands.is_none());

    // the key stays usable after a timeout
    let quick = "fn interpret(json_string, printer, order) {\n    printer.cut_paper();\n}";
    service.compile("spinner", quick, None).await.unwrap();
    let commands = service.execute("spinner", "{}", 1).await.unwrap();
    assert_eq!(commands.last(), Some(&Command::CutPaper));
}

#[tokio::test]
async fn test_runtime_error_reports_user_line() {
    let service = service(ServiceConfig::default());
    let source = "fn interpret(json_string, printer, order) {\n    printer.add_text(\"ok\");\n    let data = parse_json(json_string);\n    printer.add_text(data.name);\n}";
    service.compile("team", source, None).await.unwrap();

    let err = service.execute("team", "{not json", 1).await.unwrap_err();
    let response = ExecuteResponse::from_result(&Err(err));
    assert!(!response.success);
    assert_eq!(response.line_number, Some(3));

    // a bad payload's own line number must not leak into the source line
    let mut payload = String::from("{\n");
    for i in 0..23 {
        payload.push_str(&format!("  \"k{}\": {},\n", i, i));
    }
    payload.push_str("  \"last\": 1,\n}");
    assert_eq!(payload.lines().count(), 26);

    let err = service.execute("team", &payload, 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::Runtime { .. }));
    assert!(!err.to_string().contains("column"), "{}", err);
    assert_eq!(err.line(), Some(3));
}

#[tokio::test]
async fn test_concurrent_keys_are_isolated() {
    let service = Arc::new(service(ServiceConfig::default()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("team-{}", i);
            let source = format!(
                "fn interpret(json_string, printer, order) {{\n    printer.add_text(\"from {}\");\n}}",
                i
            );
            service.compile(&key, &source, None).await.unwrap();
            let commands = service.execute(&key, "{}", 2).await.unwrap();
            (i, commands)
        }));
    }

    for handle in handles {
        let (i, commands) = handle.await.unwrap();
        assert_eq!(commands.len(), 10);
        assert_eq!(commands[3], Command::text(format!("TEAM: team-{}", i)));
        assert_eq!(commands[9], Command::text(format!("from {}", i)));
    }
    assert_eq!(service.cache().size(), 8);
    assert!(service
        .jobs()
        .values()
        .all(|job| job.status == JobStatus::Success));
}
