use faultline_core::{ErrorInstance, KindRegistry, Params};
use faultline_report::{format, FormatOptions, Formatter, Serializer};
use serde_json::json;
use test_support::{app_resolver, CallSiteFixture};

fn query_failure(registry: &KindRegistry) -> ErrorInstance {
    let refused = registry
        .create("ConnectionRefused", json!({ "message": "connect refused", "port": 5432 }))
        .with_call_sites(vec![
            CallSiteFixture::new()
                .type_name("Socket")
                .function_name("connect")
                .file("/srv/app/node_modules/left-pad/index.js")
                .at(10, 3)
                .build(),
            CallSiteFixture::function("emit", "events.js", 517, 28).build(),
        ]);

    registry
        .create(
            "QueryFailed",
            json!({ "message": "query failed", "query": "SELECT 1" }),
        )
        .with_cause(refused)
        .with_call_sites(vec![
            CallSiteFixture::function("main", "/srv/app/index.js", 3, 1)
                .toplevel()
                .type_name("Object")
                .build(),
            CallSiteFixture::new()
                .eval()
                .function_name("compiled")
                .eval_origin("eval at load (/srv/app/lib/loader.js:8:5)")
                .at(1, 20)
                .build(),
        ])
}

#[test]
fn renders_full_report() {
    let registry = KindRegistry::new();
    let resolver = app_resolver();
    let report = Formatter::new(&resolver).format(&query_failure(&registry));

    insta::assert_snapshot!(report, @r#"
QueryFailed: query failed
    {
      "query": "SELECT 1"
    }
    at main (app@1.2.0 /index.js:3:1)
    at compiled (eval at load (app@1.2.0 /lib/loader.js:8:5), <anonymous>:1:20)
caused by ConnectionRefused: connect refused
    {
      "port": 5432
    }
    at Socket.connect (left-pad@1.3.0 /index.js:10:3)
    at emit (node@20.11.0 events.js:517:28)
"#);
}

#[test]
fn primitive_values() {
    let options = FormatOptions::default();
    assert!(format(&json!(42), &options).starts_with("Error value: 42"));
    assert_eq!(format(&json!("boom"), &options), "Error value: boom");
    assert_eq!(format(&json!(null), &options), "Error value: null");
}

#[test]
fn error_fields_of_plain_mapping() {
    let options = FormatOptions::default();
    let report = format(&json!({ "error": "x", "error_description": "y" }), &options);
    assert_eq!(report, "x: y");

    let report = format(&json!({ "name": "Oops", "message": "bad" }), &options);
    assert_eq!(report, "Oops: bad");

    let report = format(&json!({ "code": 3 }), &options);
    assert_eq!(report, "Error object\n    {\n      \"code\": 3\n    }");

    let report = format(&json!({ "error": "", "name": "  " }), &options);
    assert_eq!(report, "Error object\n    {\n      \"error\": \"\"\n    }");
}

#[test]
fn arrays() {
    let options = FormatOptions::default();
    assert_eq!(format(&json!([]), &options), "Error array");
    assert_eq!(
        format(&json!([1, 2]), &options),
        "Error array\n    [\n      1,\n      2\n    ]"
    );
}

#[test]
fn textual_stack_of_plain_mapping() {
    let options = FormatOptions::default();
    let report = format(
        &json!({
            "name": "Oops",
            "message": "bad",
            "stack": "Oops: bad\n    at run (/srv/app/a.js:1:2)"
        }),
        &options,
    );
    assert_eq!(report, "Oops: bad\n    at run (/srv/app/a.js:1:2)");

    let report = format(&json!({ "error": "x", "stack": "no frames here" }), &options);
    assert_eq!(report, "x\n    {\n      \"stack\": \"no frames here\"\n    }");
}

#[test]
fn textual_stack_of_error_without_call_sites() {
    let registry = KindRegistry::new();
    let resolver = app_resolver();
    let formatter = Formatter::new(&resolver);

    let error = registry
        .create("TypeError", "boom")
        .with_stack("TypeError: boom\n    at run (/srv/app/a.js:1:2)\n    at main (/srv/app/b.js:3:4)");
    assert_eq!(
        formatter.format(&error),
        "TypeError: boom\n    at run (/srv/app/a.js:1:2)\n    at main (/srv/app/b.js:3:4)"
    );

    let error = registry.create("TypeError", "boom").with_stack("TypeError: boom");
    assert_eq!(formatter.format(&error), "TypeError: boom");
}

#[test]
fn plain_mapping_causes() {
    let options = FormatOptions::default();
    let report = format(
        &json!({ "error": "outer", "cause": { "error": "inner", "error_description": "why" } }),
        &options,
    );
    assert_eq!(report, "outer\ncaused by inner: why");

    let report = format(&json!({ "error": "outer", "cause": "text" }), &options);
    assert_eq!(report, "outer\n    {\n      \"cause\": \"text\"\n    }");
}

#[test]
fn serialized_form_formats_like_the_error() {
    let registry = KindRegistry::new();
    let resolver = app_resolver();
    let error = query_failure(&registry);

    let serialized = Serializer::new(&resolver)
        .serialize(&error)
        .expect("serializes")
        .to_value()
        .expect("to json");
    let report = Formatter::new(&resolver).format(&serialized);

    assert!(report.starts_with("query_failed: query failed\n    {\n      \"query\": \"SELECT 1\"\n    }"));
    assert!(report.contains("\n    at main (app@1.2.0 /index.js:3:1)\n"));
    assert!(report.contains("\ncaused by connection_refused: connect refused\n"));
    assert!(report.ends_with("    at emit (node@20.11.0 events.js:517:28)"));
}

#[test]
fn long_cause_chains_are_truncated() {
    let registry = KindRegistry::new();
    let innermost = registry.create("C", "c");
    let middle = registry.create("B", Params::new().message("b").cause(innermost));
    let outer = registry.create("A", Params::new().message("a").cause(middle));

    let resolver = app_resolver();
    let report = Formatter::with_options(&resolver, FormatOptions::new().with_max_cause_depth(1))
        .format(&outer);
    assert_eq!(
        report,
        "A: a\ncaused by B: b\ncaused by (cause chain truncated after 1 levels)"
    );
}

#[test]
fn color_output_uses_escape_codes() {
    let report = format(
        &json!({ "error": "x", "error_description": "y" }),
        &FormatOptions::new().with_color(true),
    );
    assert!(report.contains("\u{1b}[36mx: \u{1b}[0m"));
    assert!(report.contains("\u{1b}[1my\u{1b}[0m"));
}

#[test]
fn clashing_error_data_is_kept_whole() {
    let report = format(
        &json!({ "error": "x", "id": 8, "error_data": { "id": 7 } }),
        &FormatOptions::default(),
    );
    assert!(report.starts_with("x\n    {\n"));
    assert!(report.contains("\"id\": 8"));
    assert!(report.contains("\"error_data\": {"));
    assert!(report.contains("\"id\": 7"));

    let report = format(
        &json!({ "error": "x", "error_data": { "id": 7 } }),
        &FormatOptions::default(),
    );
    assert_eq!(report, "x\n    {\n      \"id\": 7\n    }");
}

#[test]
fn located_and_bare_origins() {
    let registry = KindRegistry::new();
    let resolver = app_resolver();
    let error = registry.create("Boot", "failed").with_call_sites(vec![
        CallSiteFixture::new()
            .function_name("init")
            .eval_origin("/srv/app/lib/boot.js:4:2")
            .at(1, 1)
            .build(),
        CallSiteFixture::new()
            .function_name("push")
            .file("array.js")
            .eval_origin("native")
            .at(3, 7)
            .build(),
    ]);

    assert_eq!(
        Formatter::new(&resolver).format(&error),
        "Boot: failed\n    at init (app@1.2.0 /lib/boot.js:4:2, <anonymous>:1:1)\n    at push (native, node@20.11.0 array.js:3:7)"
    );
}
