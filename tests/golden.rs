use pretty_assertions::assert_eq;
use serde_json::json;
use ts_joi_gen::check::Checker;
use ts_joi_gen::{compile_ir, compile_module, Options};

const MODEL: &str = include_str!("fixtures/model.ts");
const MODEL_EXPECTED: &str = include_str!("fixtures/model.expected.ts");
const EVENTS: &str = include_str!("fixtures/events.ts");
const EVENTS_EXPECTED: &str = include_str!("fixtures/events.expected.ts");

#[test]
fn model_fixture() {
    let out = compile_module(MODEL, &Options::default().with_input_label("model.ts")).unwrap();
    assert_eq!(out, MODEL_EXPECTED);
}

#[test]
fn events_fixture_with_suffix() {
    let options = Options::default().with_suffix("V1").with_input_label("events.ts");
    assert_eq!(compile_module(EVENTS, &options).unwrap(), EVENTS_EXPECTED);
}

#[test]
fn unsupported_fixture_fails() {
    let err = compile_module(include_str!("fixtures/unsupported.ts"), &Options::default()).unwrap_err();
    assert!(err.is_unsupported(), "{err}");
}

#[test]
fn model_guards_accept_and_reject() {
    let module = compile_ir(MODEL, &Options::default().with_input_label("model.ts")).unwrap();
    let checker = Checker::new(&module);
    let user = json!({
        "id": 7,
        "name": "Ada",
        "status": "active",
        "tags": ["admin"],
        "manager": null,
        "createdAt": "2024-01-01",
    });
    assert!(checker.is("User", &user).unwrap());

    let mut wrong_status = user.clone();
    wrong_status["status"] = json!("retired");
    assert!(!checker.is("User", &wrong_status).unwrap());

    let mut missing_id = user.clone();
    missing_id.as_object_mut().unwrap().remove("id");
    assert!(!checker.is("User", &missing_id).unwrap());

    let mut with_profile = user.clone();
    with_profile["profile"] = json!({ "bio": "", "links": [] });
    // empty strings are rejected by Joi.string()
    assert!(!checker.is("User", &with_profile).unwrap());
    with_profile["profile"]["bio"] = json!("hello");
    assert!(checker.is("User", &with_profile).unwrap());

    assert!(checker.is("Tags", &json!([])).unwrap());
    assert!(!checker.is("Tags", &json!([1])).unwrap());
    assert!(checker.is("Nothing", &json!({})).unwrap());
    assert!(!checker.is("Nothing", &json!({ "extra": 1 })).unwrap());
}
