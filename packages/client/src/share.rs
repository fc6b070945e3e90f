//! Share links and QR codes for guest access codes

use qrcode::render::{svg, unicode};
use qrcode::QrCode;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::routes::Route;

pub const SHARE_TITLE: &str = "Share Access Credentials";
pub const SHARE_TEXT: &str = "Share link";

const QR_MIN_SIZE: u32 = 200;
const QR_DARK: &str = "#010501";
const QR_LIGHT: &str = "#F5F7F5";

/// What gets handed to a share sheet or printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Url,
}

/// `<public_base>/guest-access/<code>`, keeping any path prefix of the base
pub fn share_url(public_base: &Url, code: &str) -> ClientResult<Url> {
    if code.trim().is_empty() {
        return Err(ClientError::validation("access code is empty"));
    }
    let joined = format!(
        "{}{}",
        public_base.as_str().trim_end_matches('/'),
        Route::GuestAccess(code.to_string()).path()
    );
    Url::parse(&joined).map_err(|e| ClientError::config(format!("Invalid public URL: {}", e)))
}

pub fn share_payload(public_base: &Url, code: &str) -> ClientResult<SharePayload> {
    Ok(SharePayload {
        title: SHARE_TITLE.to_string(),
        text: SHARE_TEXT.to_string(),
        url: share_url(public_base, code)?,
    })
}

fn qr(url: &Url) -> ClientResult<QrCode> {
    QrCode::new(url.as_str().as_bytes())
        .map_err(|e| ClientError::validation(format!("QR code generation failed: {}", e)))
}

/// SVG document encoding `url`
pub fn qr_svg(url: &Url) -> ClientResult<String> {
    Ok(qr(url)?
        .render()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .dark_color(svg::Color(QR_DARK))
        .light_color(svg::Color(QR_LIGHT))
        .build())
}

/// Half-block rendering for terminals
pub fn qr_terminal(url: &Url) -> ClientResult<String> {
    Ok(qr(url)?
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}
