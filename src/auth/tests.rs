//! Tests for auth module
//!
//! These tests verify the access guard:
//! - Token validation
//! - Lookup-or-create of users by principal id
//! - Plan resolution from subscription state

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::test_support::{make_premium, send_json, setup_test_db, test_app};
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, Utc};
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

    async fn user_count(pool: &sqlx::SqlitePool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[test]
    fn test_plan_limits() {
        assert_eq!(Plan::Free.budget_limit(), Some(10));
        assert_eq!(Plan::Premium.budget_limit(), None);

        assert!(Plan::Free.allows(9, 1));
        assert!(!Plan::Free.allows(10, 1));
        assert!(Plan::Free.allows(0, 10));
        assert!(!Plan::Free.allows(0, 11));
        assert!(Plan::Premium.allows(10_000, 500));
    }

    #[test]
    fn test_jwt_validation_fails_with_wrong_secret() {
        let claims = models::Claims {
            sub: "principal-123".to_string(),
            exp: 9999999999,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key"),
        )
        .expect("Failed to encode token");

        let result = decode::<models::Claims>(
            &token,
            &DecodingKey::from_secret(b"wrong_secret_key"),
            &Validation::new(Algorithm::HS256),
        );

        assert!(result.is_err(), "Token validation should fail with wrong secret");
    }

    #[tokio::test]
    async fn test_resolve_principal_creates_once() {
        let pool = setup_test_db().await;

        let first = services::resolve_principal(&pool, "principal-a").await.unwrap();
        let second = services::resolve_principal(&pool, "principal-a").await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(first.id.starts_with("U_"));
        assert_eq!(first.email, "");
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_contact_yields_single_user() {
        let pool = setup_test_db().await;

        let (a, b, c) = tokio::join!(
            services::resolve_principal(&pool, "principal-race"),
            services::resolve_principal(&pool, "principal-race"),
            services::resolve_principal(&pool, "principal-race"),
        );

        let ids = [a.unwrap().id, b.unwrap().id, c.unwrap().id];
        assert!(ids.iter().all(|id| id == &ids[0]));
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_upsert_keeps_existing_email() {
        let pool = setup_test_db().await;

        services::upsert_user(&pool, "principal-e", "first@test.com")
            .await
            .unwrap();
        let again = services::upsert_user(&pool, "principal-e", "other@test.com")
            .await
            .unwrap();

        assert_eq!(again.email, "first@test.com");
    }

    #[tokio::test]
    async fn test_resolve_plan_from_subscription_state() {
        let pool = setup_test_db().await;
        let user = services::resolve_principal(&pool, "principal-p").await.unwrap();

        assert_eq!(services::resolve_plan(&pool, &user.id).await.unwrap(), Plan::Free);

        let past = (Utc::now() - Duration::days(1)).to_rfc3339();
        sqlx::query("INSERT INTO subscriptions (user_id, active, current_period_end) VALUES (?, 1, ?)")
            .bind(&user.id)
            .bind(&past)
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(services::resolve_plan(&pool, &user.id).await.unwrap(), Plan::Free);

        let future = (Utc::now() + Duration::days(30)).to_rfc3339();
        sqlx::query("UPDATE subscriptions SET current_period_end = ? WHERE user_id = ?")
            .bind(&future)
            .bind(&user.id)
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(
            services::resolve_plan(&pool, &user.id).await.unwrap(),
            Plan::Premium
        );

        sqlx::query("UPDATE subscriptions SET active = 0 WHERE user_id = ?")
            .bind(&user.id)
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(services::resolve_plan(&pool, &user.id).await.unwrap(), Plan::Free);
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected_without_side_effects() {
        let (app, pool) = test_app().await;

        let (status, body) = send_json(&app, Method::GET, "/api/me", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(user_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let (app, _pool) = test_app().await;

        let request = axum::http::Request::builder()
            .uri("/api/me")
            .header("Authorization", "Bearer not-a-jwt")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_creates_user_on_first_contact() {
        let (app, pool) = test_app().await;

        let (status, body) =
            send_json(&app, Method::GET, "/api/me", Some("principal-me"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["principalId"], "principal-me");
        assert_eq!(body["plan"], "free");
        assert_eq!(body["budgetLimit"], 10);
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_me_reports_premium_plan() {
        let (app, pool) = test_app().await;
        make_premium(&pool, "principal-vip").await;

        let (status, body) =
            send_json(&app, Method::GET, "/api/me", Some("principal-vip"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plan"], "premium");
        assert!(body["budgetLimit"].is_null());
    }
}
