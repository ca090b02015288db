use crate::services::template::TemplateError;
use crate::types::errors::AssemblyError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::io;

#[test]
fn test_assembly_error_from_zip() {
    let zip_err = zip::result::ZipError::FileNotFound;
    let err = AssemblyError::from(zip_err);

    match err {
        AssemblyError::Archive(msg) => {
            assert!(msg.contains("not found"));
        }
        _ => panic!("Expected AssemblyError::Archive"),
    }
}

#[test]
fn test_io_error_names_path() {
    let err = AssemblyError::io(
        "/tmp/staging/word/document.xml",
        io::Error::new(io::ErrorKind::NotFound, "missing"),
    );
    let msg = err.to_string();
    assert!(msg.contains("/tmp/staging/word/document.xml"));
    assert!(msg.contains("missing"));
}

#[test]
fn test_template_error_names_member() {
    let err = AssemblyError::Template {
        member: "word/document.xml".to_string(),
        source: TemplateError::MissingField {
            name: "word/document.xml".to_string(),
            field: "Title".to_string(),
        },
    };
    assert!(err.to_string().starts_with("Template error in word/document.xml"));
}

#[test]
fn test_assembly_error_serialization() {
    let err = AssemblyError::UnsupportedKind("video".to_string());

    // AssemblyError serializes as just its Display string
    let serialized = serde_json::to_string(&err).unwrap();
    assert_eq!(serialized, "\"Unsupported manifest entry kind: video\"");
}

#[test]
fn test_assembly_error_maps_to_500() {
    let response = AssemblyError::Manifest("empty".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
