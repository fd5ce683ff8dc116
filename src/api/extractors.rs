//! Request extractors shared by handlers.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, HeaderName, header, request::Parts},
};

use crate::domain::click_event::ClientInfo;
use crate::state::AppState;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");
const SEC_CH_UA: HeaderName = HeaderName::from_static("sec-ch-ua");
const SEC_CH_UA_PLATFORM: HeaderName = HeaderName::from_static("sec-ch-ua-platform");

/// Client metadata recorded with each click.
///
/// Never rejects: every field is optional. The client address comes from
/// the socket unless [`AppState::behind_proxy`] is set, in which case the
/// first `X-Forwarded-For` entry (or `X-Real-IP`) is trusted instead.
#[derive(Debug, Clone)]
pub struct ClientMeta(pub ClientInfo);

impl FromRequestParts<AppState> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ip = if state.behind_proxy {
            forwarded_ip(&parts.headers)
        } else {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        };

        Ok(Self(ClientInfo {
            ip,
            user_agent: header_value(&parts.headers, &header::USER_AGENT),
            device: header_value(&parts.headers, &SEC_CH_UA_PLATFORM),
            browser: header_value(&parts.headers, &SEC_CH_UA),
        }))
    }
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, &X_FORWARDED_FOR)
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_value(headers, &X_REAL_IP))
}
