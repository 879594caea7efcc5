//! Integration tests for JWT authentication middleware

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::header, test, web, App, HttpResponse};
    use serde_json::Value;
    use tg_api::middleware::auth::{AuthContext, JwtAuth, RequireRoles};
    use tg_core::domain::entities::token::{Claims, CLAIM_ROLES};
    use tg_core::services::token::{
        DecodeOptions, IssueOptions, OffsetClock, TokenService, TokenServiceConfig,
    };

    const SECRET: &str = "middleware-test-secret";

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(TokenServiceConfig::new(SECRET)))
    }

    fn issue(service: &TokenService, claims: Claims) -> String {
        service.create_token(&claims, &IssueOptions::default()).unwrap()
    }

    async fn protected_handler(auth: AuthContext) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "subject": auth.subject,
            "roles": auth.roles,
        }))
    }

    fn challenge(resp: &actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>) -> Option<String> {
        resp.headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    #[actix_web::test]
    async fn test_middleware_requires_auth_header() {
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(token_service()))
                .route("/protected", web::get().to(protected_handler)),
        )
        .await;

        let req = test::TestRequest::get().uri("/protected").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(challenge(&resp).as_deref(), Some("Bearer"));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    #[actix_web::test]
    async fn test_middleware_rejects_invalid_token() {
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(token_service()))
                .route("/protected", web::get().to(protected_handler)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((header::AUTHORIZATION, "Bearer invalid-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(challenge(&resp).as_deref(), Some("Bearer"));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "TOKEN_INVALID");
        assert_eq!(body["message"], "Invalid token");
    }

    #[actix_web::test]
    async fn test_middleware_accepts_valid_token() {
        let tokens = token_service();
        let token = issue(&tokens, Claims::for_subject("alice").with(CLAIM_ROLES, vec!["admin"]));
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(tokens))
                .route("/protected", web::get().to(protected_handler)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["subject"], "alice");
        assert_eq!(body["roles"], serde_json::json!(["admin"]));
    }

    #[actix_web::test]
    async fn test_expired_token_is_challenged() {
        let minted_earlier = TokenService::with_clock(
            TokenServiceConfig::new(SECRET),
            Arc::new(OffsetClock::seconds_ago(600)),
        );
        let token = minted_earlier
            .create_token(&Claims::for_subject("alice"), &IssueOptions::new().expires_in_minutes(1))
            .unwrap();
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(token_service()))
                .route("/protected", web::get().to(protected_handler)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(challenge(&resp).as_deref(), Some("Bearer"));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "TOKEN_EXPIRED");
        assert_eq!(body["message"], "Token expired");
    }

    #[actix_web::test]
    async fn test_audience_mismatch_is_challenged() {
        let tokens = token_service();
        let token = tokens
            .create_token(&Claims::for_subject("alice"), &IssueOptions::new().audience("web"))
            .unwrap();
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(tokens).with_options(DecodeOptions::new().audience("admin")))
                .route("/protected", web::get().to(protected_handler)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(challenge(&resp).as_deref(), Some("Bearer"));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "CLAIMS_INVALID");
    }

    #[actix_web::test]
    async fn test_token_without_subject_is_bad_request() {
        let tokens = token_service();
        let token = issue(&tokens, Claims::new().with("scope", "read"));
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(tokens))
                .route("/protected", web::get().to(protected_handler)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid token payload");
    }

    #[actix_web::test]
    async fn test_missing_secret_is_server_error() {
        let unconfigured = Arc::new(TokenService::new(TokenServiceConfig::default()));
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(unconfigured))
                .route("/protected", web::get().to(protected_handler)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((header::AUTHORIZATION, "Bearer a.b.c"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 500);
        assert_eq!(challenge(&resp), None);
    }

    #[actix_web::test]
    async fn test_auth_context_extractor() {
        let app = test::init_service(
            App::new().route("/protected", web::get().to(protected_handler)),
        )
        .await;

        // Request without auth context should fail
        let req = test::TestRequest::get().uri("/protected").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_require_roles_behind_auth() {
        let tokens = token_service();
        let admin = issue(&tokens, Claims::for_subject("root").with(CLAIM_ROLES, vec!["admin"]));
        let user = issue(&tokens, Claims::for_subject("bob").with(CLAIM_ROLES, vec!["user"]));
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(RequireRoles::any(["admin"]))
                    .wrap(JwtAuth::new(tokens))
                    .route("", web::get().to(protected_handler)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", admin)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", user)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
        assert_eq!(challenge(&resp), None);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Access forbidden: insufficient role");
    }
}
