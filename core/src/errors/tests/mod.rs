//! Unit tests for domain error types

use super::*;

#[test]
fn test_auth_error_messages() {
    assert_eq!(AuthError::AuthenticationFailed.to_string(), "Invalid email or password");
    assert_eq!(AuthError::InvalidCurrentPassword.to_string(), "Current password is incorrect");
}

#[test]
fn test_token_error_conversion() {
    let error: DomainError = TokenError::TokenExpired.into();
    assert!(matches!(error, DomainError::Token(TokenError::TokenExpired)));
    assert_eq!(error.code(), "INVALID_TOKEN");
    assert_eq!(error.to_string(), "Token expired");
}

#[test]
fn test_validation_error_with_fields() {
    let error = ValidationError::RequiredField {
        field: "email".to_string(),
    };
    assert!(error.to_string().contains("email"));

    let domain: DomainError = error.into();
    assert_eq!(domain.code(), "VALIDATION_ERROR");
}

#[test]
fn test_rejected_joins_messages() {
    let error = DomainError::Rejected {
        errors: vec!["Email already taken".to_string(), "Password too short".to_string()],
    };

    assert_eq!(error.to_string(), "Request rejected: Email already taken; Password too short");
    assert_eq!(error.client_messages().len(), 2);
}

#[test]
fn test_internal_details_are_not_exposed() {
    let error = DomainError::Internal {
        message: "connection refused on 10.0.0.3".to_string(),
    };

    let messages = error.client_messages();
    assert_eq!(messages, vec!["An internal error occurred".to_string()]);
    assert!(error.to_string().contains("connection refused"));
}

#[test]
fn test_error_codes() {
    let cases = [
        (
            DomainError::Configuration {
                message: "missing secret".to_string(),
            },
            "CONFIGURATION_ERROR",
        ),
        (DomainError::Rejected { errors: Vec::new() }, "REQUEST_REJECTED"),
        (DomainError::Unauthorized, "UNAUTHORIZED"),
        (
            DomainError::Internal {
                message: "boom".to_string(),
            },
            "INTERNAL_ERROR",
        ),
        (AuthError::UserNotFound.into(), "AUTHENTICATION_FAILED"),
        (ValidationError::InvalidEmail.into(), "VALIDATION_ERROR"),
    ];

    for (error, code) in cases {
        assert_eq!(error.code(), code);
    }
}
