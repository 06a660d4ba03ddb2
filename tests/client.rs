//! Protocol client tests against a mock OCCI backend.

use occi_tent::client::{ClientError, OcciRequest, RequestBody, ResponseContent};
use occi_tent::occi::{AttributeStructure, Category, Structure};

mod common;
use common::{client_for, start_occi_backend, MockResponse};

#[tokio::test]
async fn test_structures_travel_as_headers() {
    let (addr, requests) = start_occi_backend(|_| {
        MockResponse::ok(
            "text/plain",
            "Category: storage; scheme=\"http://schemas.ogf.org/occi/infrastructure#\"; class=\"kind\"\nX-OCCI-Location: /storage/1\n",
        )
    })
    .await;
    let client = client_for(addr);

    let mut attributes = AttributeStructure::new();
    attributes.insert("occi.storage.size", "10");
    let rsp = client
        .request(
            OcciRequest::post("storage/")
                .header(Category::kind("storage", "http://schemas.ogf.org/occi/infrastructure#"))
                .header(Category::mixin("m", "http://e/#"))
                .header(attributes),
        )
        .await
        .unwrap();

    assert_eq!(rsp.status, 200);
    let structures = rsp.structures();
    assert_eq!(structures.len(), 2);
    assert!(matches!(structures[1], Structure::Location(loc) if loc.first() == Some("/storage/1")));

    let seen = requests.lock().unwrap();
    let request = &seen[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/storage/");
    assert_eq!(
        request.header("Category"),
        Some(r#"storage; scheme="http://schemas.ogf.org/occi/infrastructure#"; class="kind", m; scheme="http://e/#"; class="mixin""#)
    );
    assert_eq!(request.header("X-OCCI-Attribute"), Some("occi.storage.size=10"));
    assert_eq!(request.header("Content-Type"), Some("text/occi"));
    assert_eq!(request.header("Accept"), Some("text/occi, text/plain"));
    assert!(request.header("User-Agent").unwrap().starts_with("occi-tent/"));
}

#[tokio::test]
async fn test_uri_list_and_form_body() {
    let (addr, requests) =
        start_occi_backend(|_| MockResponse::ok("text/uri-list", "/compute/1\n\r/compute/2\n\r")).await;
    let client = client_for(addr);

    let rsp = client
        .request(
            OcciRequest::put("/compute/")
                .accept("text/uri-list")
                .body(RequestBody::Form(vec![("name".into(), "a b".into())])),
        )
        .await
        .unwrap();

    assert_eq!(rsp.uris(), &["/compute/1".to_string(), "/compute/2".to_string()]);

    let seen = requests.lock().unwrap();
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(seen[0].header("Accept"), Some("text/uri-list"));
    assert_eq!(seen[0].header("Content-Type"), Some("application/x-www-form-urlencoded"));
    assert_eq!(seen[0].body, "name=a+b");
}

#[tokio::test]
async fn test_text_occi_response_is_opaque() {
    let (addr, _) = start_occi_backend(|_| MockResponse::ok("text/occi", "OK")).await;
    let rsp = client_for(addr).request(OcciRequest::get("/-/")).await.unwrap();
    assert_eq!(rsp.content, ResponseContent::Opaque);
    assert!(rsp.structures().is_empty());
}

#[tokio::test]
async fn test_error_status_is_typed() {
    let (addr, _) = start_occi_backend(|_| MockResponse::status(403, "Forbidden mixin")).await;
    let err = client_for(addr)
        .request(OcciRequest::delete("/-/"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    match err {
        ClientError::Status(e) => assert_eq!(e.body, "Forbidden mixin"),
        other => panic!("unexpected error {:?}", other),
    }
}
