//! Google Sheets sink.
//!
//! Authenticates with a service-account key (RS256 JWT exchanged for an
//! OAuth access token), creates a spreadsheet, shares it with the configured
//! addresses and writes one tab per sheet.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use saham_traits::{Cell, Result, SahamError, Sheet, SheetSink};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::env;
use std::time::Duration;
use tracing::{info, warn};

use super::sink_error;

const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Attempts after the first one for quota and server errors.
const MAX_RETRIES: u32 = 3;
/// Back-off unit; attempt `n` waits `n` units.
const BACKOFF: Duration = Duration::from_secs(2);

/// The fields of a service-account key file this sink uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    /// Service account address.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// OAuth token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccount {
    /// Parse a key from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the JSON lacks the required fields.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| SahamError::Config(format!("invalid service account key: {e}")))
    }

    fn claims(&self, now: i64) -> Claims<'_> {
        Claims {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat: now,
            exp: now + 3600,
        }
    }

    fn assertion(&self, now: i64) -> Result<String> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| SahamError::Config(format!("invalid service account private key: {e}")))?;
        encode(&Header::new(Algorithm::RS256), &self.claims(now), &key)
            .map_err(|e| sink_error("jwt", e))
    }
}

/// Spreadsheet sink configuration.
#[derive(Debug, Clone)]
pub struct SpreadsheetConfig {
    /// Service-account credentials.
    pub account: ServiceAccount,
    /// Addresses granted writer access to the new spreadsheet.
    pub share_with: Vec<String>,
}

impl SpreadsheetConfig {
    /// Load from `GOOGLE_SERVICE_ACCOUNT` (key JSON or a path to it) and
    /// `GOOGLE_DRIVE_EMAILS` (JSON array of addresses).
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a variable is missing or malformed.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let raw = env::var("GOOGLE_SERVICE_ACCOUNT")
            .map_err(|_| SahamError::Config("GOOGLE_SERVICE_ACCOUNT not set".to_string()))?;
        let text = if raw.trim_start().starts_with('{') {
            raw
        } else {
            std::fs::read_to_string(raw.trim())?
        };
        let account = ServiceAccount::from_json(&text)?;

        let share_with = match env::var("GOOGLE_DRIVE_EMAILS") {
            Ok(emails) => parse_emails(&emails)?,
            Err(_) => Vec::new(),
        };
        Ok(Self { account, share_with })
    }
}

fn parse_emails(text: &str) -> Result<Vec<String>> {
    serde_json::from_str(text)
        .map_err(|e| SahamError::Config(format!("GOOGLE_DRIVE_EMAILS must be a JSON array: {e}")))
}

fn cell_value(cell: &Cell) -> Value {
    match cell {
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Number(v) => serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number),
        Cell::Integer(v) => Value::from(*v),
        Cell::Empty => Value::String(String::new()),
    }
}

fn sheet_values(sheet: &Sheet) -> Value {
    let rows: Vec<Vec<Value>> = sheet
        .values()
        .iter()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    json!({ "values": rows })
}

/// A1 range at the top-left of `title`, percent-encoded for a URL path.
/// Apostrophes in the title are doubled inside the quoted sheet name.
fn range_path(title: &str) -> String {
    let range = format!("'{}'!A1", title.replace('\'', "''"));
    urlencoding::encode(&range).into_owned()
}

/// Form-encoded JWT-bearer grant exchanging `assertion` for an access token.
fn token_request(client: &Client, token_uri: &str, assertion: &str) -> RequestBuilder {
    client
        .post(token_uri)
        .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion)])
}

fn is_transient(status: StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

/// Writes sheets into a newly created, shared Google spreadsheet.
#[derive(Debug)]
pub struct SpreadsheetSink {
    client: Client,
    token: String,
    spreadsheet_id: String,
    default_sheet_id: Option<i64>,
    tabs: usize,
}

impl SpreadsheetSink {
    /// Authenticate, create a spreadsheet titled `title` and share it.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication, creation or sharing fails.
    pub async fn create(config: &SpreadsheetConfig, title: &str) -> Result<Self> {
        let client = Client::new();
        let token = Self::access_token(&client, &config.account).await?;

        let created: Value = Self::json(
            Self::send(|| {
                client
                    .post(SHEETS_URL)
                    .bearer_auth(&token)
                    .json(&json!({ "properties": { "title": title } }))
            })
            .await?,
        )
        .await?;
        let spreadsheet_id = created["spreadsheetId"]
            .as_str()
            .ok_or_else(|| sink_error("spreadsheet", "response lacks spreadsheetId"))?
            .to_string();
        let default_sheet_id = created["sheets"][0]["properties"]["sheetId"].as_i64();

        let sink = Self {
            client,
            token,
            spreadsheet_id,
            default_sheet_id,
            tabs: 0,
        };
        for email in &config.share_with {
            sink.share(email).await?;
        }
        info!(id = %sink.spreadsheet_id, title, "created spreadsheet");
        Ok(sink)
    }

    /// Identifier of the created spreadsheet.
    #[must_use]
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    async fn access_token(client: &Client, account: &ServiceAccount) -> Result<String> {
        let assertion = account.assertion(chrono::Utc::now().timestamp())?;
        let response =
            Self::send(|| token_request(client, &account.token_uri, &assertion)).await?;
        let token: TokenResponse = Self::json(response).await?;
        Ok(token.access_token)
    }

    /// Send a request, retrying quota and server errors with linear back-off.
    async fn send<F>(build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            let response = build()
                .send()
                .await
                .map_err(|e| sink_error("google api", e))?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }
            if is_transient(status) && attempt < MAX_RETRIES {
                attempt += 1;
                warn!(%status, attempt, "google api transient failure, retrying");
                tokio::time::sleep(BACKOFF * attempt).await;
                continue;
            }
            let text = response.text().await.unwrap_or_default();
            return Err(sink_error("google api", format!("HTTP {status}: {text}")));
        }
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| sink_error("google api response", e))
    }

    async fn share(&self, email: &str) -> Result<()> {
        let url = format!(
            "{DRIVE_URL}/{}/permissions?sendNotificationEmail=false",
            self.spreadsheet_id
        );
        Self::send(|| {
            self.client
                .post(&url)
                .bearer_auth(&self.token)
                .json(&json!({ "type": "user", "role": "writer", "emailAddress": email }))
        })
        .await?;
        Ok(())
    }

    async fn batch_update(&self, request: Value) -> Result<()> {
        let url = format!("{SHEETS_URL}/{}:batchUpdate", self.spreadsheet_id);
        Self::send(|| {
            self.client
                .post(&url)
                .bearer_auth(&self.token)
                .json(&json!({ "requests": [request] }))
        })
        .await?;
        Ok(())
    }
}

impl SheetSink for SpreadsheetSink {
    fn name(&self) -> &str {
        "spreadsheet"
    }

    async fn write_sheet(&mut self, sheet: &Sheet) -> Result<()> {
        self.batch_update(json!({ "addSheet": { "properties": { "title": sheet.title() } } }))
            .await?;

        let url = format!(
            "{SHEETS_URL}/{}/values/{}?valueInputOption=RAW",
            self.spreadsheet_id,
            range_path(sheet.title())
        );
        let body = sheet_values(sheet);
        Self::send(|| self.client.put(&url).bearer_auth(&self.token).json(&body)).await?;
        self.tabs += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        if self.tabs > 0
            && let Some(sheet_id) = self.default_sheet_id.take()
        {
            self.batch_update(json!({ "deleteSheet": { "sheetId": sheet_id } }))
                .await?;
        }
        info!(id = %self.spreadsheet_id, tabs = self.tabs, "spreadsheet written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_account_from_json() {
        let account = ServiceAccount::from_json(
            r#"{"client_email":"bot@project.iam.gserviceaccount.com","private_key":"pem","type":"service_account"}"#,
        )
        .unwrap();
        assert_eq!(account.client_email, "bot@project.iam.gserviceaccount.com");
        assert_eq!(account.token_uri, "https://oauth2.googleapis.com/token");

        let err = ServiceAccount::from_json(r#"{"client_email":"x"}"#).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_claims() {
        let account = ServiceAccount {
            client_email: "bot@example.com".to_string(),
            private_key: String::new(),
            token_uri: "https://oauth2.example.com/token".to_string(),
        };
        let claims = account.claims(1_700_000_000);
        assert_eq!(claims.iss, "bot@example.com");
        assert_eq!(claims.aud, "https://oauth2.example.com/token");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.scope.contains("spreadsheets"));
    }

    #[test]
    fn test_invalid_private_key_is_configuration_error() {
        let account = ServiceAccount {
            client_email: "bot@example.com".to_string(),
            private_key: "not a pem".to_string(),
            token_uri: default_token_uri(),
        };
        assert!(account.assertion(0).unwrap_err().is_configuration());
    }

    #[test]
    fn test_parse_emails() {
        let emails = parse_emails(r#"["a@example.com", "b@example.com"]"#).unwrap();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
        assert!(parse_emails("a@example.com").is_err());
    }

    #[test]
    fn test_sheet_values_header_first() {
        let mut sheet = Sheet::new(saham_traits::SheetKind::Sentiments, ["Ticker", "Rate"]);
        sheet.rows.push(vec![Cell::from("BBCA"), Cell::Number(0.5)]);
        sheet.rows.push(vec![Cell::from("BBRI"), Cell::Empty]);

        let body = sheet_values(&sheet);
        assert_eq!(body["values"][0], json!(["Ticker", "Rate"]));
        assert_eq!(body["values"][1], json!(["BBCA", 0.5]));
        assert_eq!(body["values"][2], json!(["BBRI", ""]));
    }

    #[test]
    fn test_cell_value_non_finite_is_null() {
        assert_eq!(cell_value(&Cell::Number(f64::NAN)), Value::Null);
        assert_eq!(cell_value(&Cell::Integer(7)), json!(7));
    }

    #[test]
    fn test_token_request_is_form_encoded() {
        let request = token_request(&Client::new(), &default_token_uri(), "a.b+c")
            .build()
            .unwrap();
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(
            body,
            b"grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion=a.b%2Bc"
        );
    }

    #[test]
    fn test_range_path() {
        assert_eq!(range_path("idx-stocks"), "%27idx-stocks%27%21A1");
        assert_eq!(range_path("a b"), "%27a%20b%27%21A1");
        assert_eq!(range_path("it's"), "%27it%27%27s%27%21A1");
        assert_eq!(range_path("saham/é"), "%27saham%2F%C3%A9%27%21A1");
    }

    #[test]
    fn test_transient_status() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::BAD_GATEWAY));
        assert!(!is_transient(StatusCode::FORBIDDEN));
        assert!(!is_transient(StatusCode::NOT_FOUND));
    }
}
