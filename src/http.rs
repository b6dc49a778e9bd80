//! [`DriveService`] over the Google Drive v3 REST API.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::error::ScanError;
use crate::remote::{ListPage, ListQuery, RemoteFile};
use crate::traits::DriveService;

/// Default API root.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Environment variables searched for a bearer token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["DRIVESCAN_ACCESS_TOKEN", "GOOGLE_OAUTH_ACCESS_TOKEN"];

const GET_FIELDS: &str = "id, name, mimeType";
const LIST_FIELDS: &str = "nextPageToken, files(id, name)";

/// Connection settings for [`DriveClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base:     String,
    pub access_token: Option<String>,
    pub timeout:      Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base:     DEFAULT_API_BASE.to_string(),
            access_token: None,
            timeout:      Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Defaults, with the access token taken from the first non-empty
    /// variable in [`TOKEN_ENV_VARS`].
    pub fn from_env() -> Self {
        let access_token = TOKEN_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|token| !token.trim().is_empty());
        Self {
            access_token,
            ..Self::default()
        }
    }
}

/// Blocking Drive API client. One instance is built per run and shared by
/// every fetch and listing call.
pub struct DriveClient {
    http:     Client,
    api_base: Url,
    token:    String,
}

impl DriveClient {
    /// # Errors
    ///
    /// [`ScanError::Auth`] when no access token is configured,
    /// [`ScanError::InvalidConfig`] when `api_base` is not a usable URL,
    /// [`ScanError::Transient`] when the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ScanError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("drivescan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScanError::Transient(format!("http client: {e}")))?;

        Self::with_http(http, config)
    }

    fn with_http(http: Client, config: ClientConfig) -> Result<Self, ScanError> {
        let token = config
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ScanError::Auth(format!("no access token; set {}", TOKEN_ENV_VARS[0]))
            })?;

        let api_base = Url::parse(&config.api_base)
            .map_err(|e| ScanError::InvalidConfig(format!("api base {}: {e}", config.api_base)))?;
        if api_base.cannot_be_a_base() {
            return Err(ScanError::InvalidConfig(format!(
                "api base {} cannot hold a path",
                config.api_base
            )));
        }

        Ok(Self { http, api_base, token })
    }

    fn send(&self, request: RequestBuilder, subject: &str) -> Result<Response, ScanError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| ScanError::Transient(format!("{subject}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(classify(status, subject, &body))
    }
}

impl DriveService for DriveClient {
    fn get(&self, id: &str) -> Result<RemoteFile, ScanError> {
        let url = endpoint(&self.api_base, &["files", id]);
        let request = self.http.get(url).query(&GET_PARAMS);

        self.send(request, id)?
            .json::<RemoteFile>()
            .map_err(|e| ScanError::Transient(format!("{id}: undecodable metadata: {e}")))
    }

    fn list(&self, query: &ListQuery) -> Result<ListPage, ScanError> {
        let params = list_params(query);
        debug!(?params, "listing");

        let url = endpoint(&self.api_base, &["files"]);
        let request = self.http.get(url).query(&params);

        self.send(request, &query.parent_id)?
            .json::<ListPage>()
            .map_err(|e| {
                ScanError::Transient(format!("{}: undecodable listing: {e}", query.parent_id))
            })
    }
}

const GET_PARAMS: [(&str, &str); 2] = [("fields", GET_FIELDS), ("supportsAllDrives", "true")];

/// Append `segments` to `base`, percent-encoding each one, so an id can never
/// change the endpoint it is sent to.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Query parameters for one listing page. `pageToken` is only sent once the
/// service has handed one out.
fn list_params(query: &ListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.to_query_string()),
        ("spaces", "drive".to_string()),
        ("fields", LIST_FIELDS.to_string()),
        ("pageSize", query.page_size.to_string()),
        ("supportsAllDrives", "true".to_string()),
        ("includeItemsFromAllDrives", "true".to_string()),
    ];
    if let Some(token) = query.page_token.as_deref() {
        params.push(("pageToken", token.to_string()));
    }
    params
}

/// Map a non-success status to the scan error taxonomy.
fn classify(status: StatusCode, subject: &str, body: &str) -> ScanError {
    match status {
        StatusCode::NOT_FOUND    => ScanError::NotFound(subject.to_string()),
        StatusCode::UNAUTHORIZED => ScanError::Auth(format!("{subject}: {status}")),
        _ => ScanError::Transient(format!("{subject}: {status}: {}", body.trim())),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, "abc", ""),
            ScanError::NotFound(id) if id == "abc"
        ));
        assert!(matches!(classify(StatusCode::UNAUTHORIZED, "abc", ""), ScanError::Auth(_)));
        assert!(classify(StatusCode::FORBIDDEN, "abc", "rate limit").is_transient());
        assert!(classify(StatusCode::TOO_MANY_REQUESTS, "abc", "").is_transient());
        assert!(classify(StatusCode::INTERNAL_SERVER_ERROR, "abc", "").is_transient());
    }

    #[test]
    fn missing_token_is_auth_error() {
        let err = DriveClient::new(ClientConfig::default()).err().unwrap();
        assert!(matches!(err, ScanError::Auth(_)));

        let blank = ClientConfig {
            access_token: Some("  ".into()),
            ..ClientConfig::default()
        };
        assert!(matches!(DriveClient::new(blank), Err(ScanError::Auth(_))));
    }

    #[test]
    fn ids_are_encoded_as_one_path_segment() {
        let base = Url::parse(DEFAULT_API_BASE).unwrap();
        let url = endpoint(&base, &["files", "a/b?c#d"]);
        assert_eq!(url.as_str(), "https://www.googleapis.com/drive/v3/files/a%2Fb%3Fc%23d");
    }

    #[test]
    fn api_base_trailing_slash_is_ignored() {
        let base = Url::parse("http://localhost:9/drive/v3/").unwrap();
        assert_eq!(endpoint(&base, &["files"]).as_str(), "http://localhost:9/drive/v3/files");
    }

    #[test]
    fn unusable_api_base_is_config_error() {
        let config = |base: &str| ClientConfig {
            api_base:     base.into(),
            access_token: Some("t".into()),
            ..ClientConfig::default()
        };
        assert!(matches!(DriveClient::new(config("not a url")), Err(ScanError::InvalidConfig(_))));
        assert!(matches!(DriveClient::new(config("mailto:x@y")), Err(ScanError::InvalidConfig(_))));
    }

    #[test]
    fn list_params_carry_token_only_after_first_page() {
        let mut query = ListQuery {
            parent_id:  "p1".into(),
            mime_types: Vec::new(),
            page_size:  1000,
            page_token: None,
        };
        let first = list_params(&query);
        let value = |params: &[(&str, String)], key: &str| {
            params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
        };

        assert_eq!(value(&first, "q").as_deref(), Some("'p1' in parents"));
        assert_eq!(value(&first, "spaces").as_deref(), Some("drive"));
        assert_eq!(value(&first, "fields").as_deref(), Some("nextPageToken, files(id, name)"));
        assert_eq!(value(&first, "pageSize").as_deref(), Some("1000"));
        assert_eq!(value(&first, "pageToken"), None);

        query.page_token = Some("tok2".into());
        assert_eq!(value(&list_params(&query), "pageToken").as_deref(), Some("tok2"));
    }

    // -----------------------------------------------------------------------
    // Loopback server
    // -----------------------------------------------------------------------

    /// Serve one canned `(status, body)` response per connection, in order,
    /// and hand back the request heads that were received.
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/drive/v3", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut heads = Vec::new();
            for (status, body) in responses {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(&stream);
                let mut head = String::new();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                    head.push_str(&line);
                }
                heads.push(head);

                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                (&stream).write_all(response.as_bytes()).unwrap();
            }
            heads
        });

        (base, handle)
    }

    fn loopback_client(base: String) -> DriveClient {
        let http = Client::builder().no_proxy().build().unwrap();
        DriveClient::with_http(http, ClientConfig {
            api_base:     base,
            access_token: Some("secret".into()),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn get_decodes_metadata_and_maps_404() {
        let (base, server) = serve(vec![
            (200, r#"{"id":"f1","name":"Root","mimeType":"application/vnd.google-apps.folder","kind":"drive#file"}"#),
            (404, r#"{"error":{"code":404,"message":"File not found"}}"#),
        ]);
        let client = loopback_client(base);

        let file = client.get("f1").unwrap();
        assert_eq!(file.name.as_deref(), Some("Root"));
        assert_eq!(file.mime_type.as_deref(), Some(crate::FOLDER_MIME_TYPE));

        let err = client.get("ghost").unwrap_err();
        assert!(matches!(err, ScanError::NotFound(ref id) if id == "ghost"));

        let heads = server.join().unwrap();
        assert!(heads[0].starts_with("GET /drive/v3/files/f1?"), "{}", heads[0]);
        assert!(heads[0].to_lowercase().contains("authorization: bearer secret"));
        assert!(heads[1].starts_with("GET /drive/v3/files/ghost?"));
    }

    #[test]
    fn list_follows_tokens_over_http() {
        let (base, server) = serve(vec![
            (200, r#"{"files":[{"id":"a","name":"A"},{"id":"b","name":"B"}],"nextPageToken":"tok2"}"#),
            (200, r#"{"files":[{"id":"c","name":"C"}]}"#),
        ]);
        let client = loopback_client(base);
        let mut query = ListQuery {
            parent_id:  "root".into(),
            mime_types: Vec::new(),
            page_size:  2,
            page_token: None,
        };

        let first = client.list(&query).unwrap();
        assert_eq!(first.files.len(), 2);
        assert_eq!(first.next_token(), Some("tok2"));

        query.page_token = first.next_token().map(str::to_string);
        let second = client.list(&query).unwrap();
        assert_eq!(second.files[0].id, "c");
        assert_eq!(second.next_token(), None);

        let heads = server.join().unwrap();
        let first_line = heads[0].lines().next().unwrap();
        let second_line = heads[1].lines().next().unwrap();
        assert!(first_line.starts_with("GET /drive/v3/files?"));
        assert!(first_line.contains("pageSize=2"));
        assert!(first_line.contains("spaces=drive"));
        assert!(!first_line.contains("pageToken"));
        assert!(second_line.contains("pageToken=tok2"));
    }

    #[test]
    fn server_errors_are_transient() {
        let (base, server) = serve(vec![(503, "backend unavailable")]);
        let client = loopback_client(base);

        assert!(client.get("f1").unwrap_err().is_transient());
        server.join().unwrap();
    }
}
