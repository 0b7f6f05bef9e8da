use faultline_stack::{build_frame, build_frames, Invocation, Origin, PackageInfo, RuntimeResolver};
use test_support::{app_resolver, CallSiteFixture};

#[test]
fn invocation_priority_order() {
    let resolver = app_resolver();
    let call_site = CallSiteFixture::new().toplevel().eval().native().build();
    assert_eq!(build_frame(&call_site, &resolver).invocation, Invocation::Toplevel);

    let call_site = CallSiteFixture::new().eval().native().constructor().build();
    assert_eq!(build_frame(&call_site, &resolver).invocation, Invocation::Eval);

    let call_site = CallSiteFixture::new().native().constructor().build();
    assert_eq!(build_frame(&call_site, &resolver).invocation, Invocation::Native);

    let call_site = CallSiteFixture::new().constructor().build();
    assert_eq!(build_frame(&call_site, &resolver).invocation, Invocation::Constructor);

    let call_site = CallSiteFixture::new().build();
    assert_eq!(build_frame(&call_site, &resolver).invocation, Invocation::Function);
}

fn name_of(fixture: CallSiteFixture) -> Option<String> {
    build_frame(&fixture.build(), &RuntimeResolver::default()).name
}

#[test]
fn composes_qualified_names() {
    assert_eq!(
        name_of(CallSiteFixture::new().type_name("Server").function_name("listen")),
        Some("Server.listen".to_string())
    );
    assert_eq!(
        name_of(CallSiteFixture::new().type_name("Server").function_name("Server.listen")),
        Some("Server.listen".to_string())
    );
    assert_eq!(
        name_of(CallSiteFixture::new().type_name("Server").function_name("ServerListen")),
        Some("Server.ServerListen".to_string())
    );
    assert_eq!(
        name_of(CallSiteFixture::new().type_name("Server").method_name("close")),
        Some("Server.close".to_string())
    );
    assert_eq!(
        name_of(CallSiteFixture::new().type_name("Server")),
        Some("Server.<anonymous>".to_string())
    );
    assert_eq!(
        name_of(CallSiteFixture::new().method_name("close")),
        Some("close".to_string())
    );
    assert_eq!(name_of(CallSiteFixture::new()), None);
}

#[test]
fn generic_type_is_dropped_only_at_top_level() {
    assert_eq!(
        name_of(CallSiteFixture::new().toplevel().type_name("Object").function_name("main")),
        Some("main".to_string())
    );
    assert_eq!(
        name_of(CallSiteFixture::new().type_name("Object").function_name("main")),
        Some("Object.main".to_string())
    );
    assert_eq!(name_of(CallSiteFixture::new().toplevel().type_name("Object")), None);
}

#[test]
fn frame_without_eval_has_no_origin() {
    let call_site = CallSiteFixture::function("handle", "/srv/app/lib/router.js", 42, 7).build();
    let frame = build_frame(&call_site, &app_resolver());
    assert_eq!(frame.filename.as_deref(), Some("/srv/app/lib/router.js"));
    assert_eq!(frame.line, Some(42));
    assert_eq!(frame.column, Some(7));
    assert!(frame.origin.is_none());
    assert_eq!(
        frame.pkg,
        Some(PackageInfo::new("app", "1.2.0").with_dirname("/srv/app"))
    );
}

#[test]
fn eval_frame_gets_annotated_origin() {
    let call_site = CallSiteFixture::new()
        .eval()
        .function_name("compiled")
        .at(1, 20)
        .eval_origin("eval at load (/srv/app/node_modules/left-pad/index.js:3:9)")
        .build();
    let frame = build_frame(&call_site, &app_resolver());
    assert!(frame.filename.is_none());
    assert!(frame.pkg.is_none());

    let origin = frame.origin.expect("eval frames carry an origin");
    match origin.innermost() {
        Origin::Located(location) => {
            let pkg = location.pkg.as_ref().expect("origin location is annotated");
            assert_eq!(pkg.name, "left-pad");
        }
        other => panic!("expected a located origin, got {other:?}"),
    }
}

#[test]
fn runtime_paths_resolve_to_runtime() {
    let call_site = CallSiteFixture::new().native().file("events.js").at(1, 1).build();
    let frame = build_frame(&call_site, &app_resolver());
    assert_eq!(frame.pkg, Some(PackageInfo::new("node", "20.11.0")));
}

#[test]
fn frames_keep_call_site_order() {
    let call_sites = vec![
        CallSiteFixture::function("first", "/srv/app/a.js", 1, 1).build(),
        CallSiteFixture::function("second", "/srv/app/b.js", 2, 2).build(),
    ];
    let names: Vec<_> = build_frames(&call_sites, &app_resolver())
        .into_iter()
        .map(|frame| frame.name.unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn frame_json_omits_absent_pkg_and_origin() {
    let call_site = CallSiteFixture::function("run", "/opt/other/x.js", 5, 6).build();
    let value = serde_json::to_value(build_frame(&call_site, &app_resolver())).expect("serialize");
    assert_eq!(
        value,
        serde_json::json!({
            "invocation": "function",
            "name": "run",
            "filename": "/opt/other/x.js",
            "line": 5,
            "column": 6
        })
    );
}

#[test]
fn blank_eval_origin_is_no_origin() {
    for raw in ["", "   "] {
        let call_site = CallSiteFixture::new()
            .function_name("f")
            .eval_origin(raw)
            .at(1, 2)
            .build();
        assert_eq!(build_frame(&call_site, &app_resolver()).origin, None, "{raw:?}");
    }
}
