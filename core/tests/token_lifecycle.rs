//! Integration tests for issuing, validating and authorizing tokens

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use tg_core::domain::entities::token::{Claims, CLAIM_ROLES};
    use tg_core::errors::{AuthError, DomainError, TokenError};
    use tg_core::services::authorization::{require_any_role, subject, Rbac};
    use tg_core::services::token::{
        DecodeOptions, FixedClock, IssueOptions, TokenService, TokenServiceConfig,
    };
    use tg_shared::config::{AppConfig, Settings};

    const SETTINGS: &str = r#"
        environment = "staging"
        secret_key = "integration-secret"
        jwt_algorithm = ["HS384", "HS256"]
        token_expiry_minutes = 15
        timezone = "UTC"
    "#;

    fn service_from_settings() -> TokenService {
        let settings = Settings::from_toml_str(SETTINGS).unwrap();
        let app_config = AppConfig::from_settings(settings).unwrap();
        TokenService::new(TokenServiceConfig::from(&app_config.auth))
    }

    #[test]
    fn test_settings_drive_the_token_service() {
        let service = service_from_settings();
        let claims = Claims::for_subject("alice").with(CLAIM_ROLES, vec!["admin"]);

        let token = service.create_token(&claims, &IssueOptions::default()).unwrap();
        let decoded = service.decode_token(&token, &DecodeOptions::default()).unwrap();

        assert_eq!(subject(&decoded), Ok("alice"));
        assert_eq!(decoded.expires_at().unwrap() - decoded.issued_at().unwrap(), 15 * 60);
        assert_eq!(
            jsonwebtoken::decode_header(&token).unwrap().alg,
            jsonwebtoken::Algorithm::HS384
        );
    }

    #[test]
    fn test_accepted_token_then_role_checks() {
        let service = service_from_settings();
        let claims = Claims::for_subject("bob").with(CLAIM_ROLES, vec!["user"]);
        let token = service.create_token(&claims, &IssueOptions::default()).unwrap();

        let decoded = service.decode_token(&token, &DecodeOptions::default()).unwrap();

        assert!(require_any_role(&decoded, &["user", "admin"]).is_ok());
        assert_eq!(require_any_role(&decoded, &["admin"]), Err(AuthError::InsufficientRole));
        assert!(Rbac::default().authorize(&decoded, "user:read").is_ok());
        assert!(Rbac::default().authorize(&decoded, "user:write").is_err());
    }

    #[test]
    fn test_one_minute_token_lifecycle() {
        let config = TokenServiceConfig::new("lifecycle-secret");
        let minted = Utc.with_ymd_and_hms(2090, 1, 1, 0, 0, 0).unwrap();
        let at = |seconds: i64| {
            TokenService::with_clock(
                config.clone(),
                Arc::new(FixedClock::new(minted + Duration::seconds(seconds))),
            )
        };

        let token = at(0)
            .create_token(&Claims::for_subject("alice"), &IssueOptions::new().expires_in_minutes(1))
            .unwrap();

        let fresh = at(59).decode_token(&token, &DecodeOptions::default()).unwrap();
        assert_eq!(fresh.subject(), Some("alice"));

        let late = at(61).decode_token(&token, &DecodeOptions::new().leeway(0));
        assert_eq!(late, Err(DomainError::Token(TokenError::TokenExpired)));

        let archived = at(3600).decode_token(&token, &DecodeOptions::new().skip_expiry());
        assert!(archived.is_ok());
    }

    #[test]
    fn test_token_from_one_deployment_rejected_by_another() {
        let ours = service_from_settings();
        let theirs = TokenService::new(TokenServiceConfig::new("another-deployment-secret"));
        let token = theirs
            .create_token(&Claims::for_subject("mallory"), &IssueOptions::default())
            .unwrap();

        let result = ours.decode_token(&token, &DecodeOptions::default());

        assert_eq!(result, Err(DomainError::Token(TokenError::TokenInvalid)));
    }

    #[test]
    fn test_missing_secret_surfaces_on_first_use() {
        let settings = Settings::from_toml_str("environment = \"staging\"").unwrap();
        let app_config = AppConfig::from_settings(settings).unwrap();
        let service = TokenService::new(TokenServiceConfig::from(app_config.auth));

        let result = service.create_token(&Claims::for_subject("alice"), &IssueOptions::default());

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_crate_root_exports() {
        let service = tg_core::TokenService::new(tg_core::TokenServiceConfig::new("root-secret"));
        let claims = tg_core::Claims::for_subject("carol").with(tg_core::CLAIM_ROLES, vec!["user"]);

        let token = service.create_token(&claims, &tg_core::IssueOptions::default()).unwrap();
        let decoded = service.decode_token(&token, &tg_core::DecodeOptions::default()).unwrap();

        assert_eq!(tg_core::subject(&decoded), Ok("carol"));
        assert!(tg_core::Rbac::default().authorize(&decoded, "user:read").is_ok());
    }
}
