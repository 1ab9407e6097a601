//! Buyer identity extraction.
//!
//! Authentication proper (login, sessions, token issuance) is handled upstream by the gateway that fronts this
//! service. By the time a request lands here, the gateway has already authenticated the buyer and stamped the
//! verified user id into the `x-user-id` header. [`OwnerId`] lifts that header into a typed extractor; every
//! owner-scoped handler takes one, so no handler can forget to scope its work to a user.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use log::*;

use crate::errors::ServerError;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerId(pub i64);

impl FromRequest for OwnerId {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = req
            .headers()
            .get(USER_ID_HEADER)
            .ok_or_else(|| ServerError::UnidentifiedUser(format!("No {USER_ID_HEADER} header")))
            .and_then(|v| {
                v.to_str().map_err(|e| {
                    debug!("💻️ Could not read {USER_ID_HEADER} header. {e}");
                    ServerError::UnidentifiedUser(format!("Unreadable {USER_ID_HEADER} header"))
                })
            })
            .and_then(|s| {
                s.parse::<i64>().map_err(|_| {
                    debug!("💻️ {USER_ID_HEADER} header is not a valid user id: {s}");
                    ServerError::UnidentifiedUser(format!("'{s}' is not a valid user id"))
                })
            })
            .map(OwnerId);
        ready(result)
    }
}
