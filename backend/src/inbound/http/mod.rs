//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod claims;
pub mod disaster_updates;
pub mod error;
pub mod notifications;
pub mod profiles;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every REST endpoint under the caller's scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(claims::submit_claim)
        .service(claims::list_claims)
        .service(claims::get_claim)
        .service(claims::amend_claim)
        .service(claims::review_claim)
        .service(claims::delete_claim)
        .service(claims::list_claim_documents)
        .service(profiles::get_own_profile)
        .service(profiles::update_own_profile)
        .service(profiles::get_profile)
        .service(notifications::create_notification)
        .service(notifications::list_notifications)
        .service(notifications::unread_count)
        .service(notifications::mark_all_read)
        .service(notifications::mark_read)
        .service(notifications::delete_notification)
        .service(disaster_updates::list_disaster_updates)
        .service(disaster_updates::refresh_disaster_updates);
}

#[cfg(test)]
mod tests {
    //! End-to-end adapter coverage over mocked use-case ports.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};
    use chrono::Utc;

    use super::session::SessionContext;
    use super::test_utils::{test_session_middleware, test_state};
    use crate::domain::ports::{
        MockAccountAccess, MockClaimWorkflow, MockDisasterFeed, MockNotificationLedger,
    };
    use crate::domain::{
        Claim, ClaimId, ClaimStatus, DisasterType, Error, Money, Principal, PropertyType, UserId,
    };

    const OWNER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn sample_claim(owner: UserId) -> Claim {
        Claim {
            id: ClaimId::new(17),
            owner,
            disaster_type: DisasterType::Flood,
            property_type: PropertyType::House,
            description: "water damage".to_owned(),
            estimated_loss: Money::from_cents(1_250_075).expect("non-negative"),
            status: ClaimStatus::Pending,
            predicted_approval: None,
            predicted_limit: None,
            claim_number: Some("CLM-202517".to_owned()),
            insurance_policy_number: Some("POL202517".to_owned()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn authenticated_claim_listing_round_trips() {
        let owner = UserId::parse(OWNER_ID).expect("fixture id");
        let mut claims = MockClaimWorkflow::new();
        claims
            .expect_list()
            .withf(move |principal| principal.id() == &owner && !principal.is_admin())
            .times(1)
            .return_once(move |_| Ok(vec![sample_claim(owner)]));

        let state = test_state(
            Arc::new(MockAccountAccess::new()),
            Arc::new(claims),
            Arc::new(MockNotificationLedger::new()),
            Arc::new(MockDisasterFeed::new()),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .route(
                    "/test-login",
                    web::get().to(|session: SessionContext| async move {
                        let id = UserId::parse(OWNER_ID).expect("fixture id");
                        session.persist_principal(&Principal::new(id, false))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .service(web::scope("/api/v1").configure(super::configure)),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::get().uri("/test-login").to_request())
                .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/claims")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        let rows = body.as_array().expect("array body");
        assert_eq!(rows.len(), 1);
        let row = rows.first().expect("one claim");
        assert_eq!(row.get("claimNumber"), Some(&serde_json::json!("CLM-202517")));
        assert_eq!(row.get("estimatedLoss"), Some(&serde_json::json!("12500.75")));
    }

    #[actix_web::test]
    async fn unauthenticated_requests_are_rejected() {
        let state = test_state(
            Arc::new(MockAccountAccess::new()),
            Arc::new(MockClaimWorkflow::new()),
            Arc::new(MockNotificationLedger::new()),
            Arc::new(MockDisasterFeed::new()),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").configure(super::configure)),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/claims").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn domain_not_found_maps_to_http_404() {
        let mut claims = MockClaimWorkflow::new();
        claims
            .expect_fetch()
            .times(1)
            .return_once(|_, _| Err(Error::not_found("claim not found")));

        let state = test_state(
            Arc::new(MockAccountAccess::new()),
            Arc::new(claims),
            Arc::new(MockNotificationLedger::new()),
            Arc::new(MockDisasterFeed::new()),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .route(
                    "/test-login",
                    web::get().to(|session: SessionContext| async move {
                        let id = UserId::parse(OWNER_ID).expect("fixture id");
                        session.persist_principal(&Principal::new(id, false))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .service(web::scope("/api/v1").configure(super::configure)),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::get().uri("/test-login").to_request())
                .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/claims/99")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
