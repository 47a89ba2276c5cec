//! Integration tests for the ordered request checks.

mod helpers;

use chrono::Utc;

use bookstore_auth::AuthError;
use bookstore_auth::jwt::{Claims, TokenKind};
use bookstore_core::types::Action;

use helpers::{TestApp, bearer};

#[tokio::test]
async fn test_malformed_headers_are_unauthenticated() {
    let app = TestApp::new().await;

    for header in ["", "abc.def.ghi", "Bearer", "Bearer a b", "Bearer abc.def.ghi"] {
        assert!(
            matches!(
                app.guard.authenticate(header).await,
                Err(AuthError::Unauthenticated)
            ),
            "header {header:?}"
        );
    }
}

#[tokio::test]
async fn test_header_shape_checked_before_signature() {
    let app = TestApp::new().await;

    assert!(matches!(
        app.tokens.extract_from_authorization_header("Bearer abc.def.ghi"),
        Err(AuthError::Malformed(_)) | Err(AuthError::InvalidSignature)
    ));
    assert!(matches!(
        app.tokens.extract_from_authorization_header("abc.def.ghi"),
        Err(AuthError::Malformed(_))
    ));
    assert!(matches!(
        app.tokens.extract_from_authorization_header(""),
        Err(AuthError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_any_scheme_is_accepted() {
    let app = TestApp::new().await;
    let principal = app.create_principal("u1", "u1@example.com", "pw");
    let pair = app.service.register(&principal).await.unwrap();

    let authenticated = app
        .guard
        .authenticate(&format!("Token {}", pair.access_token))
        .await
        .unwrap();
    assert_eq!(authenticated.principal_id, "u1");
}

#[tokio::test]
async fn test_valid_token_with_loose_spacing_is_unauthenticated() {
    let app = TestApp::new().await;
    let principal = app.create_principal("u1", "u1@example.com", "pw");
    let pair = app.service.register(&principal).await.unwrap();

    for header in [
        format!("Bearer  {}", pair.access_token),
        format!("Bearer\t{}", pair.access_token),
        format!(" Bearer {}", pair.access_token),
    ] {
        assert!(
            matches!(
                app.guard.authenticate(&header).await,
                Err(AuthError::Unauthenticated)
            ),
            "header {header:?}"
        );
    }
    assert!(app.guard.authenticate(&bearer(&pair.access_token)).await.is_ok());
}

#[tokio::test]
async fn test_unauthenticated_before_forbidden() {
    let app = TestApp::new().await;
    let principal = app.create_principal("u1", "u1@example.com", "pw");
    let pair = app.service.login("u1@example.com", "pw").await.unwrap();
    let header = bearer(&pair.access_token);

    // No grants yet: authenticated but forbidden.
    assert!(matches!(
        app.guard.authorize(&header, "resource", Action::Read).await,
        Err(AuthError::Forbidden)
    ));

    // Once the session is gone the permission check is never reached.
    let authenticated = app.guard.authenticate(&header).await.unwrap();
    app.service.logout(&authenticated).await.unwrap();
    app.enforcer
        .grant_policy(&principal.id, "resource", Action::Read)
        .await
        .unwrap();
    assert!(matches!(
        app.guard.authorize(&header, "resource", Action::Read).await,
        Err(AuthError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_expired_credential_is_unauthenticated() {
    let app = TestApp::new().await;
    let pair = app
        .tokens
        .issue_credential_pair("u1", "u1@example.com")
        .unwrap();
    app.sessions.create_session("u1", &pair).await.unwrap();

    let expired = app
        .tokens
        .sign_claims(
            TokenKind::Access,
            &Claims {
                sid: pair.access_session_id.clone(),
                sub: "u1".to_string(),
                email: "u1@example.com".to_string(),
                exp: Utc::now().timestamp() - 1,
            },
        )
        .unwrap();

    assert!(matches!(
        app.tokens.verify_credential(&expired),
        Err(AuthError::Expired)
    ));
    assert!(matches!(
        app.guard.authenticate(&bearer(&expired)).await,
        Err(AuthError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_session_owned_by_other_principal() {
    let app = TestApp::new().await;
    let pair = app
        .tokens
        .issue_credential_pair("u1", "u1@example.com")
        .unwrap();
    app.sessions.create_session("u1", &pair).await.unwrap();

    // A token for u2 that names u1's live session.
    let forged = app
        .tokens
        .sign_claims(
            TokenKind::Access,
            &Claims {
                sid: pair.access_session_id.clone(),
                sub: "u2".to_string(),
                email: "u2@example.com".to_string(),
                exp: Utc::now().timestamp() + 60,
            },
        )
        .unwrap();

    assert!(matches!(
        app.guard.authenticate(&bearer(&forged)).await,
        Err(AuthError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_unknown_resource_is_forbidden() {
    let app = TestApp::new().await;
    let principal = app.create_principal("u1", "u1@example.com", "pw");
    let pair = app.service.register(&principal).await.unwrap();

    assert!(matches!(
        app.guard
            .authorize(&bearer(&pair.access_token), "admin", Action::Read)
            .await,
        Err(AuthError::Forbidden)
    ));
}
