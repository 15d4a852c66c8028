//! Caller identity carried in the cookie session.
//!
//! The login flow lives in the external auth layer. It stores the caller's
//! id under [`USER_ID_KEY`]; this module only reads it back, turning a
//! missing or malformed id into `401 Unauthorized` before a handler runs.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, UserId};

/// Session key holding the authenticated user id.
pub const USER_ID_KEY: &str = "user_id";

/// Record `user_id` as the session's caller.
pub fn remember_caller(session: &Session, user_id: &UserId) -> Result<(), Error> {
    session
        .insert(USER_ID_KEY, user_id.as_str())
        .map_err(|error| Error::internal(format!("failed to write session: {error}")))
}

/// The authenticated user behind a request.
///
/// Extracting a `Caller` fails with `401` unless the session holds a valid
/// [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(UserId);

impl Caller {
    /// Read the caller from a session.
    pub fn from_session(session: &Session) -> Result<Self, Error> {
        let raw = session
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        UserId::new(raw).map(Self).map_err(|error| {
            warn!(%error, "malformed user id in session cookie");
            Error::unauthorized("login required")
        })
    }

    /// Authenticated user id.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    /// Consume the caller, returning the user id.
    pub fn into_user_id(self) -> UserId {
        self.0
    }
}

impl FromRequest for Caller {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_session(&req.get_session()).map_err(actix_web::Error::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use crate::domain::{ErrorCode, USER_ID_MAX};
    use crate::inbound::http::test_utils::test_session_middleware;

    async fn whoami(caller: Caller) -> HttpResponse {
        HttpResponse::Ok().body(caller.into_user_id().to_string())
    }

    #[derive(serde::Deserialize)]
    struct Planted {
        raw: String,
    }

    /// Store `raw` verbatim, bypassing [`UserId`] validation.
    async fn plant(session: Session, planted: web::Query<Planted>) -> HttpResponse {
        match session.insert(USER_ID_KEY, planted.into_inner().raw) {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(_) => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn whoami_after_planting(raw: &str) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/plant", web::post().to(plant))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let planted = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/plant?raw={raw}"))
                .to_request(),
        )
        .await;
        let cookie = planted
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn remembered_caller_is_extracted() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/login",
                    web::post().to(|session: Session| async move {
                        let ada = UserId::new("user-ada").expect("valid id");
                        remember_caller(&session, &ada)?;
                        Ok::<_, Error>(HttpResponse::NoContent().finish())
                    }),
                )
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "user-ada");
    }

    #[actix_web::test]
    async fn anonymous_request_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Error = test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case::padded("%20user-ada%20".to_owned())]
    #[case::too_long("x".repeat(USER_ID_MAX + 1))]
    #[actix_web::test]
    async fn malformed_session_ids_are_unauthorised(#[case] raw: String) {
        let res = whoami_after_planting(&raw).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn well_formed_planted_ids_pass() {
        let res = whoami_after_planting("user-bob").await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "user-bob");
    }
}
