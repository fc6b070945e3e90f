use chrono::{DateTime, Utc};
use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sprout_config::ClientConfig;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::api::{
    AccessGrant, AuthUser, CreateAccessGrantRequest, Disease, DiseaseEndRequest,
    DiseaseLogRequest, FertilisingRequest, GuestAuthorizeResponse, LoginRequest, LoginResponse,
    MyPlant, PlantInfo, PlantRequest, RegisterRequest, RevokeAccessGrantRequest,
    UpdateUserRequest, UploadResult, UserInfo,
};
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Largest photo the API accepts
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Image extensions and the MIME type they are sent as
const ACCEPTED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

/// HTTP client for the plant-care API.
///
/// Every request goes through [`ApiClient::request`], which attaches the
/// session's bearer token when one is present. Failures are returned to the
/// caller as-is; this type never retries and never redirects.
#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: Url, session: Session, timeout: Duration) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            session,
        })
    }

    pub fn from_config(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        Self::new(config.api_url.clone(), session, config.timeout)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ClientError::config(format!("Invalid API URL: {}", e)))
    }

    /// Build a request, attaching `Authorization: Bearer <token>` if logged in
    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!("{} {}", method, url.path());

        let builder = self.http_client.request(method, url);
        Ok(match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Map non-success statuses to typed errors
    async fn check(response: Response) -> ClientResult<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ClientError::auth("Invalid or expired token"))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::Http {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = Self::check(builder.send().await?).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> ClientResult<()> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)?).await
    }

    async fn write<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        self.send_empty(self.request(method, path)?.json(body)).await
    }

    // --- account ---

    /// `GET /me`
    pub async fn me(&self) -> ClientResult<AuthUser> {
        self.get("/me").await
    }

    /// `GET /me` viewed as a profile, with the e-mail checked
    pub async fn profile(&self) -> ClientResult<UserInfo> {
        let info: UserInfo = self.get("/me").await?;
        info.validate()?;
        Ok(info)
    }

    /// Log in and store the returned access token in the session
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .send(self.request(Method::POST, "/login")?.json(&request))
            .await?;
        self.session.set_token(response.access_token)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<()> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.write(Method::POST, "/register", &request).await
    }

    /// Forget the session token. The server keeps no logout state.
    pub fn logout(&self) -> ClientResult<()> {
        self.session.clear()
    }

    pub async fn update_profile(&self, request: &UpdateUserRequest) -> ClientResult<()> {
        self.write(Method::PATCH, "/me", request).await
    }

    pub async fn upload_user_photo(&self, path: &Path) -> ClientResult<UploadResult> {
        self.upload("/upload/user", path).await
    }

    pub async fn upload_plant_photo(&self, path: &Path) -> ClientResult<UploadResult> {
        self.upload("/upload/plant", path).await
    }

    async fn upload(&self, endpoint: &str, path: &Path) -> ClientResult<UploadResult> {
        let mime = image_mime(path)?;
        let size = tokio::fs::metadata(path).await?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(ClientError::validation("Max image size is 10MB."));
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| ClientError::validation(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        self.send(self.request(Method::POST, endpoint)?.multipart(form))
            .await
    }

    // --- access grants ---

    pub async fn access_grants(&self) -> ClientResult<Vec<AccessGrant>> {
        self.get("/access-tokens").await
    }

    pub async fn create_access_grant(
        &self,
        guest_name: &str,
        end_date: DateTime<Utc>,
    ) -> ClientResult<()> {
        let request = CreateAccessGrantRequest {
            guest_name: guest_name.to_string(),
            end_date,
        };
        self.write(Method::POST, "/access-tokens", &request).await
    }

    pub async fn revoke_access_grant(&self, token_id: i64) -> ClientResult<()> {
        self.write(
            Method::DELETE,
            "/access-tokens",
            &RevokeAccessGrantRequest { token_id },
        )
        .await
    }

    /// Exchange a guest access code for a guest session token.
    ///
    /// The token is returned, not stored; storing it is the flow's decision.
    pub async fn authorize_guest(&self, code: &str) -> ClientResult<String> {
        let path = format!("/access-tokens/authorize/{}", urlencoding::encode(code));
        let response: GuestAuthorizeResponse = self.get(&path).await?;
        Ok(response.guest_token)
    }

    // --- plants ---

    pub async fn my_plants(&self) -> ClientResult<Vec<MyPlant>> {
        let plants: Vec<MyPlant> = self.get("/my-plants").await?;
        for plant in &plants {
            plant.validate()?;
        }
        Ok(plants)
    }

    pub async fn plant(&self, plant_id: u64) -> ClientResult<PlantInfo> {
        let info: PlantInfo = self.get(&format!("/my-plants/{}", plant_id)).await?;
        info.validate()?;
        Ok(info)
    }

    pub async fn create_plant(&self, request: &PlantRequest) -> ClientResult<()> {
        request.validate()?;
        self.write(Method::POST, "/my-plants", request).await
    }

    pub async fn update_plant(&self, plant_id: u64, request: &PlantRequest) -> ClientResult<()> {
        request.validate()?;
        self.write(Method::PATCH, &format!("/my-plants/{}", plant_id), request)
            .await
    }

    pub async fn delete_plant(&self, plant_id: u64) -> ClientResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/my-plants/{}", plant_id))?)
            .await
    }

    pub async fn water_plant(&self, plant_id: u64) -> ClientResult<()> {
        self.write(
            Method::POST,
            &format!("/my-plants/{}/watering", plant_id),
            &serde_json::json!({}),
        )
        .await
    }

    pub async fn log_fertilising(
        &self,
        plant_id: u64,
        request: &FertilisingRequest,
    ) -> ClientResult<()> {
        request.validate()?;
        self.write(
            Method::POST,
            &format!("/my-plants/{}/fertilizing", plant_id),
            request,
        )
        .await
    }

    pub async fn log_disease(&self, plant_id: u64, request: &DiseaseLogRequest) -> ClientResult<()> {
        request.validate(Utc::now().date_naive())?;
        self.write(
            Method::POST,
            &format!("/my-plants/{}/plant-disease", plant_id),
            request,
        )
        .await
    }

    pub async fn end_disease(&self, plant_id: u64, request: &DiseaseEndRequest) -> ClientResult<()> {
        self.write(
            Method::PATCH,
            &format!("/my-plants/{}/plant-disease", plant_id),
            request,
        )
        .await
    }

    pub async fn diseases(&self) -> ClientResult<Vec<Disease>> {
        self.get("/all-diseases").await
    }
}

fn image_mime(path: &Path) -> ClientResult<&'static str> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    ACCEPTED_IMAGE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| {
            ClientError::validation("Only .jpg, .jpeg, .png and .webp formats are supported.")
        })
}
