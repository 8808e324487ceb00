//! Custom routing profile upload.

use std::time::{SystemTime, UNIX_EPOCH};

use log::info;
use serde::Deserialize;
use tour_core::OracleError;

use super::oracle::BRouterOracle;

/// Body BRouter returns after a profile upload.
#[derive(Debug, Default, Deserialize)]
struct UploadResponse {
    profileid: Option<String>,
    error: Option<String>,
}

/// Name under which a profile uploaded at `now` is stored.
fn custom_profile_name(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    format!("custom_{millis}")
}

/// Upload a BRouter profile script and return the name to route with.
///
/// The profile is POSTed to `{base}/profile/custom_<millis>`. When the server
/// confirms a different identifier, that identifier is returned instead.
/// Pass the result to [`BRouterOracle::with_profile`].
///
/// # Errors
///
/// Returns the transport errors of [`BRouterOracle::route`], or
/// [`OracleError::HttpError`] when the server rejects the script.
pub async fn upload_profile(oracle: &BRouterOracle, script: Vec<u8>) -> Result<String, OracleError> {
    let name = custom_profile_name(SystemTime::now());
    let url = format!("{}/profile/{name}", oracle.config().trimmed_base_url());

    let response = oracle
        .client()
        .post(&url)
        .body(script)
        .send()
        .await
        .map_err(|err| oracle.convert_reqwest_error(&err, &url))?
        .error_for_status()
        .map_err(|err| oracle.convert_reqwest_error(&err, &url))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|err| oracle.convert_reqwest_error(&err, &url))?;

    let reply: UploadResponse = serde_json::from_str(&body).unwrap_or_default();
    if let Some(message) = reply.error {
        return Err(OracleError::HttpError {
            url,
            status,
            message,
        });
    }
    let profile = reply.profileid.unwrap_or(name);
    info!("uploaded custom profile as {profile}");
    Ok(profile)
}
