// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::tests::utils::{
    idp_application, infrastructure_application, json_body, TestLoginAdapter,
    TestSignatureAdapter,
};
use crate::web::TestRequest;
use serde_json::Value;

#[test]
fn unknown_paths_are_an_unsupported_grant() {
    let application = infrastructure_application();
    let response = application.dispatch(&TestRequest::get("/nowhere"));

    assert_eq!(response.status_code, 400);
    let body = json_body(&response);
    assert_eq!(body["error"], "unsupported_grant");
    assert_eq!(body["error_description"], "Grant not supported");
}

#[test]
fn method_mismatch_is_an_unsupported_grant() {
    let application = idp_application(
        TestLoginAdapter { email: None },
        TestSignatureAdapter::default(),
    );
    // The sign endpoint only accepts POST.
    let response = application.dispatch(&TestRequest::get("/.well-known/spresso-sign"));
    assert_eq!(response.status_code, 400);
    assert_eq!(json_body(&response)["error"], "unsupported_grant");
}

#[test]
fn empty_application_rejects_everything() {
    let application = crate::Application::new();
    let response = application.dispatch(&TestRequest::get("/"));
    assert_eq!(response.status_code, 400);
    assert_eq!(json_body(&response)["error"], "unsupported_grant");
}

#[test]
fn proxy_serves_the_relay_document() {
    let application = infrastructure_application();
    let response = application.dispatch(&TestRequest::get("/proxy"));

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.header("Content-Type"),
        Some("text/html; charset=utf-8")
    );
    // The relay script is embedded into the document shell.
    assert!(response.body.contains("<script"));
    assert!(response.body.contains("postMessage"));
}

#[test]
fn api_lists_every_registered_grant() {
    let application = infrastructure_application();
    let response = application.dispatch(&TestRequest::get("/api"));

    assert_eq!(response.status_code, 200);
    assert_eq!(response.header("Content-Type"), Some("application/json"));

    let body = json_body(&response);
    let grants: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|grant| grant["name"].as_str().unwrap())
        .collect();
    assert_eq!(grants, ["forward_authentication", "api_information"]);

    let forward = &body.as_array().unwrap()[0];
    let endpoint = &forward["endpoints"].as_array().unwrap()[0];
    assert_eq!(endpoint["name"], "proxy");
    assert_eq!(endpoint["path"], "/proxy");
    assert_eq!(endpoint["methods"], Value::from(vec!["GET"]));
}

#[test]
fn first_matching_grant_wins() {
    // Two grants could both serve /api; registration order decides.
    let mut application = crate::Application::new();
    let settings = crate::settings::ApiSettings::new().unwrap();
    application.add_grant(std::sync::Arc::new(
        crate::grant::api::ApiInformationGrant::new(settings.clone()),
    ));
    application.add_grant(std::sync::Arc::new(
        crate::grant::api::ApiInformationGrant::new(settings),
    ));

    let response = application.dispatch(&TestRequest::get("/api"));
    assert_eq!(response.status_code, 200);
    // Both registrations are described, once each.
    assert_eq!(json_body(&response).as_array().unwrap().len(), 2);
}
