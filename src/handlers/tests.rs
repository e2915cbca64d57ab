//! Handler tests
//!
//! Run against the in-memory directory, no database required.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use crate::auth::{PasswordHasher, TokenService};
    use crate::config::JwtSecret;
    use crate::domain::{NewAccount, TransferError};
    use crate::error::AppError;
    use crate::handlers::{
        CreateAccountCommand, CreateAccountHandler, LoginCommand, LoginHandler, TransferCommand,
        TransferHandler,
    };
    use crate::store::{AccountDirectory, InMemoryDirectory, StoreError};

    fn passwords() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            &JwtSecret::new(b"handler-secret".to_vec()).unwrap(),
            Duration::from_secs(60),
        ))
    }

    // =========================================================================
    // Account creation
    // =========================================================================

    #[tokio::test]
    async fn test_create_account_hashes_password() {
        let directory = Arc::new(InMemoryDirectory::new());
        let handler = CreateAccountHandler::new(directory.clone(), passwords());

        let account = handler
            .execute(CreateAccountCommand::new(
                "Ada".to_string(),
                "Lovelace".to_string(),
                "analytical".to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(account.first_name, "Ada");
        assert_eq!(account.balance, 0);
        assert!(account.number > 0);
        assert_ne!(account.encrypted_password, "analytical");
        assert!(passwords().verify(&account.encrypted_password, "analytical"));
        assert_eq!(directory.get_by_id(account.id).await.unwrap(), account);
    }

    #[tokio::test]
    async fn test_create_account_validates_input() {
        let handler = CreateAccountHandler::new(Arc::new(InMemoryDirectory::new()), passwords());

        let cases = [
            ("", "Lovelace", "pw"),
            ("Ada", "   ", "pw"),
            ("Ada", "Lovelace", ""),
        ];
        for (first, last, password) in cases {
            let result = handler
                .execute(CreateAccountCommand::new(
                    first.to_string(),
                    last.to_string(),
                    password.to_string(),
                ))
                .await;
            assert!(
                matches!(result, Err(AppError::InvalidRequest(_))),
                "expected rejection for {:?}",
                (first, last, password)
            );
        }
    }

    // =========================================================================
    // Login
    // =========================================================================

    async fn seeded_login() -> (Arc<InMemoryDirectory>, LoginHandler, Arc<TokenService>) {
        let directory = Arc::new(InMemoryDirectory::new());
        let secret = passwords().hash("open sesame").unwrap();
        directory
            .create(
                NewAccount::new("Ali".to_string(), "Baba".to_string(), secret).with_number(42),
            )
            .await
            .unwrap();
        let tokens = tokens();
        let handler = LoginHandler::new(directory.clone(), passwords(), tokens.clone());
        (directory, handler, tokens)
    }

    #[tokio::test]
    async fn test_login_issues_token_for_number() {
        let (_directory, handler, tokens) = seeded_login().await;

        let result = handler
            .execute(LoginCommand::new(42, "open sesame".to_string()))
            .await
            .unwrap();

        assert_eq!(result.number, 42);
        assert_eq!(tokens.decode(&result.token).unwrap().account_number, 42);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (_directory, handler, _tokens) = seeded_login().await;

        let result = handler
            .execute(LoginCommand::new(42, "open sesam".to_string()))
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_number_same_error() {
        let (_directory, handler, _tokens) = seeded_login().await;

        let result = handler
            .execute(LoginCommand::new(43, "open sesame".to_string()))
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_number_still_runs_bcrypt() {
        let (directory, _handler, tokens) = seeded_login().await;
        // Cost 10 takes tens of milliseconds; a lookup miss alone takes microseconds.
        let handler = LoginHandler::new(directory, PasswordHasher::new(10), tokens);

        let start = Instant::now();
        let result = handler
            .execute(LoginCommand::new(43, "open sesame".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
        assert!(
            start.elapsed() >= Duration::from_millis(5),
            "unknown number answered in {:?}",
            start.elapsed()
        );
    }

    // =========================================================================
    // Transfer
    // =========================================================================

    #[tokio::test]
    async fn test_transfer_credits_destination_only() {
        let directory = Arc::new(InMemoryDirectory::new());
        let source = directory
            .create(NewAccount::new("A".to_string(), "A".to_string(), "h".to_string()).with_number(1))
            .await
            .unwrap();
        let destination = directory
            .create(NewAccount::new("B".to_string(), "B".to_string(), "h".to_string()).with_number(2))
            .await
            .unwrap();
        let handler = TransferHandler::new(directory.clone());

        let result = handler
            .execute(TransferCommand::new(destination.id, 300))
            .await
            .unwrap();

        assert_eq!(result.balance, 300);
        assert_eq!(directory.get_by_id(destination.id).await.unwrap().balance, 300);
        assert_eq!(directory.get_by_id(source.id).await.unwrap().balance, 0);
    }

    #[tokio::test]
    async fn test_transfer_to_unknown_account() {
        let handler = TransferHandler::new(Arc::new(InMemoryDirectory::new()));

        let result = handler.execute(TransferCommand::new(77, 10)).await;
        assert!(matches!(result, Err(AppError::Store(StoreError::NotFound(77)))));
    }

    #[tokio::test]
    async fn test_transfer_overflow_is_client_error() {
        let directory = Arc::new(InMemoryDirectory::new());
        let account = directory
            .create(NewAccount::new("C".to_string(), "C".to_string(), "h".to_string()).with_number(3))
            .await
            .unwrap();
        let handler = TransferHandler::new(directory.clone());

        handler
            .execute(TransferCommand::new(account.id, i64::MAX))
            .await
            .unwrap();
        let err = handler
            .execute(TransferCommand::new(account.id, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Store(StoreError::BalanceOverflow(id)) if id == account.id));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(directory.get_by_id(account.id).await.unwrap().balance, i64::MAX);
    }

    #[tokio::test]
    async fn test_transfer_zero_amount() {
        let handler = TransferHandler::new(Arc::new(InMemoryDirectory::new()));

        let result = handler.execute(TransferCommand::new(1, 0)).await;
        assert!(matches!(
            result,
            Err(AppError::Transfer(TransferError::ZeroAmount))
        ));
    }
}
