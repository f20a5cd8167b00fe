// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use ngo_console::error::{AppError, FieldErrors, Notice, LOGIN_ROUTE};
use ngo_console::models::forms::{check, LatestUpdateForm};
use reqwest::StatusCode;

#[test]
fn test_each_error_maps_to_one_notice() {
    let cases = [
        (AppError::invalid_field("email", "Email is invalid"), "fields"),
        (AppError::SessionExpired, "redirect"),
        (AppError::Permission("no".into()), "persistent"),
        (AppError::NotFound("/api/x/".into()), "dismissible"),
        (
            AppError::Server {
                status: 503,
                message: "down".into(),
            },
            "dismissible",
        ),
        (AppError::MalformedResponse("eof".into()), "dismissible"),
        (AppError::Network("refused".into()), "dismissible"),
        (AppError::Auth("bad".into()), "dismissible"),
    ];

    for (err, expected) in cases {
        let kind = match err.notice() {
            Notice::FieldErrors(_) => "fields",
            Notice::Redirect { .. } => "redirect",
            Notice::Banner {
                dismissible: false, ..
            } => "persistent",
            Notice::Banner {
                dismissible: true, ..
            } => "dismissible",
        };
        assert_eq!(kind, expected, "{:?}", err);
    }
}

#[test]
fn test_not_found_and_malformed_use_fixed_messages() {
    assert_eq!(
        AppError::NotFound("/api/member-reg/".into()).notice_message(),
        AppError::ENDPOINT_NOT_FOUND
    );
    assert_eq!(
        AppError::MalformedResponse("expected value at line 1".into()).notice_message(),
        AppError::INVALID_RESPONSE
    );
    assert_eq!(
        AppError::from_status(StatusCode::SERVICE_UNAVAILABLE, r#"{"error":"Maintenance"}"#)
            .notice_message(),
        "Maintenance"
    );
}

#[test]
fn test_session_expired_redirect_target() {
    let err = AppError::SessionExpired;
    assert!(err.is_session_expired());
    assert!(matches!(err.notice(), Notice::Redirect { to, .. } if to == LOGIN_ROUTE));
    assert!(!AppError::Auth("x".into()).is_session_expired());
}

#[test]
fn test_field_errors_flatten_in_field_order() {
    let mut fields = FieldErrors::new();
    fields.insert("phone".into(), "Phone number is required".into());
    fields.insert("email".into(), "Email is invalid".into());
    let err = AppError::Validation(fields);

    assert_eq!(
        err.notice_message(),
        "email: Email is invalid, phone: Phone number is required"
    );
}

#[test]
fn test_form_errors_convert_to_validation() {
    let form = LatestUpdateForm {
        title: "ab".into(),
        link: "not a link".into(),
    };
    match check(&form) {
        Err(AppError::Validation(fields)) => {
            assert_eq!(fields["title"], "Title must be at least 3 characters");
            assert_eq!(fields["link"], "Please enter a valid URL");
        }
        other => panic!("unexpected: {:?}", other),
    }
}
