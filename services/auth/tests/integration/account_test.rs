use chrono::Duration;

use keyward_auth::domain::repository::{CodeStore, UserStore};
use keyward_auth::domain::types::{CodeScope, MSG_CODE_SENT, MSG_SUCCESS};
use keyward_auth::error::AuthServiceError;
use keyward_auth::usecase::account::AccountService;

use crate::helpers::{FailingNotifier, test_env};

// ── register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_user_and_return_assigned_id() {
    let env = test_env();

    let id = env.account.register("a@b.com", "secret").await.unwrap();

    let user = env.users.find_by_email("a@b.com").await.unwrap().unwrap();
    assert_eq!(user.id, id);
    assert!(!user.is_verified);
    assert!(!user.uses_two_factor);
    assert!(!user.is_admin);
    assert_ne!(user.password_hash, "secret", "password must be stored hashed");
}

#[tokio::test]
async fn should_fail_already_exists_on_second_register_and_keep_original() {
    let env = test_env();

    let id = env.account.register("a@b.com", "first").await.unwrap();
    let result = env.account.register("a@b.com", "second").await;

    assert!(
        matches!(result, Err(AuthServiceError::AlreadyExists)),
        "expected AlreadyExists, got {result:?}"
    );

    let user = env.users.find_by_email("a@b.com").await.unwrap().unwrap();
    assert_eq!(user.id, id, "original user must be unchanged");
}

#[tokio::test]
async fn should_reject_register_with_empty_email_or_password() {
    let env = test_env();

    let result = env.account.register("", "secret").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );

    let result = env.account.register("a@b.com", "").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
    assert!(
        env.users.find_by_email("a@b.com").await.unwrap().is_none(),
        "no user may be created on rejected registration"
    );
}

// ── email verification ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_send_code_for_unknown_email_without_persisting() {
    let env = test_env();

    let result = env.account.email_verify_send_code("nobody@b.com").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
    assert_eq!(
        env.codes.get(CodeScope::EmailVerify, "nobody@b.com").await.unwrap(),
        None,
        "no code may be persisted for an unknown email"
    );
    assert_eq!(env.notifier.sent_count(), 0);
}

#[tokio::test]
async fn should_verify_email_with_dispatched_code() {
    let env = test_env();
    env.account.register("a@b.com", "secret").await.unwrap();

    let msg = env.account.email_verify_send_code("a@b.com").await.unwrap();
    assert_eq!(msg, MSG_CODE_SENT);

    let code = env.notifier.last_code_for("a@b.com").unwrap();
    assert_eq!(
        env.codes.get(CodeScope::EmailVerify, "a@b.com").await.unwrap(),
        Some(code),
        "stored code must match the dispatched one"
    );

    let msg = env.account.email_verify("a@b.com", code).await.unwrap();
    assert_eq!(msg, MSG_SUCCESS);
    assert!(env.users.find_by_email("a@b.com").await.unwrap().unwrap().is_verified);
}

#[tokio::test]
async fn should_honor_only_the_last_stored_code() {
    let env = test_env();
    env.account.register("a@b.com", "secret").await.unwrap();

    env.account.email_verify_send_code("a@b.com").await.unwrap();
    let first = env.notifier.last_code_for("a@b.com").unwrap();
    env.account.email_verify_send_code("a@b.com").await.unwrap();
    let second = env.notifier.last_code_for("a@b.com").unwrap();

    if first != second {
        let result = env.account.email_verify("a@b.com", first).await;
        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials for the overwritten code, got {result:?}"
        );
    }
    env.account.email_verify("a@b.com", second).await.unwrap();
}

#[tokio::test]
async fn should_reject_wrong_or_zero_verify_code_and_leave_unverified() {
    let env = test_env();
    env.account.register("a@b.com", "secret").await.unwrap();
    env.account.email_verify_send_code("a@b.com").await.unwrap();
    let code = env.notifier.last_code_for("a@b.com").unwrap();

    // Any 4-digit value other than the stored one.
    let wrong = if code == 9999 { 1000 } else { code + 1 };
    let result = env.account.email_verify("a@b.com", wrong).await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );

    // The zero sentinel is always rejected, before any lookup.
    let result = env.account.email_verify("a@b.com", 0).await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );

    assert!(
        !env.users.find_by_email("a@b.com").await.unwrap().unwrap().is_verified,
        "failed verification must not flip is_verified"
    );
}

#[tokio::test]
async fn should_reject_expired_verify_code() {
    let env = test_env();
    env.account.register("a@b.com", "secret").await.unwrap();

    env.codes
        .put(CodeScope::EmailVerify, "a@b.com", 4321, Duration::seconds(-1))
        .await
        .unwrap();

    let result = env.account.email_verify("a@b.com", 4321).await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_accept_repeated_use_of_code_until_ttl() {
    // Codes are not invalidated on success; they stay usable until expiry.
    let env = test_env();
    env.account.register("a@b.com", "secret").await.unwrap();
    env.account.email_verify_send_code("a@b.com").await.unwrap();
    let code = env.notifier.last_code_for("a@b.com").unwrap();

    env.account.email_verify("a@b.com", code).await.unwrap();
    env.account.email_verify("a@b.com", code).await.unwrap();
}

#[tokio::test]
async fn should_fold_vanished_user_to_invalid_credentials_on_verify() {
    let env = test_env();

    // A live code without a matching user: the mark-verified miss must read
    // as InvalidCredentials, not as "user not found".
    env.codes
        .put(CodeScope::EmailVerify, "ghost@b.com", 1234, Duration::seconds(60))
        .await
        .unwrap();

    let result = env.account.email_verify("ghost@b.com", 1234).await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

// ── password recovery ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_recover_password_with_dispatched_code() {
    let env = test_env();
    env.account.register("a@b.com", "old-pass").await.unwrap();

    let msg = env.account.password_recover_send_code("a@b.com").await.unwrap();
    assert_eq!(msg, MSG_CODE_SENT);
    let code = env.notifier.last_code_for("a@b.com").unwrap();

    let msg = env
        .account
        .password_recover("a@b.com", "new-pass", code)
        .await
        .unwrap();
    assert_eq!(msg, MSG_SUCCESS);

    // The new password logs in; the old one no longer does.
    let output = env.session.login("a@b.com", "new-pass").await.unwrap();
    assert!(!output.token.is_empty());

    let result = env.session.login("a@b.com", "old-pass").await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_recover_with_empty_new_password() {
    let env = test_env();
    env.account.register("a@b.com", "old-pass").await.unwrap();
    env.account.password_recover_send_code("a@b.com").await.unwrap();
    let code = env.notifier.last_code_for("a@b.com").unwrap();

    let result = env.account.password_recover("a@b.com", "", code).await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_surface_user_not_found_when_recover_target_vanished() {
    let env = test_env();

    // Valid code, no user: the email was already proven known by the code
    // match, so this one storage miss is surfaced distinctly.
    env.codes
        .put(CodeScope::PasswordRecover, "ghost@b.com", 1234, Duration::seconds(60))
        .await
        .unwrap();

    let result = env.account.password_recover("ghost@b.com", "new-pass", 1234).await;
    assert!(
        matches!(result, Err(AuthServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

// ── notifier contract ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_code_even_when_dispatch_fails() {
    let env = test_env();
    env.account.register("a@b.com", "secret").await.unwrap();

    let account = AccountService {
        users: env.users.clone(),
        codes: env.codes.clone(),
        notifier: FailingNotifier,
        code_ttl: Duration::seconds(600),
    };

    let msg = account.email_verify_send_code("a@b.com").await.unwrap();
    assert_eq!(msg, MSG_CODE_SENT);
    assert!(
        env.codes.get(CodeScope::EmailVerify, "a@b.com").await.unwrap().is_some(),
        "code must be persisted regardless of delivery outcome"
    );
}
