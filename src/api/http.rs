use super::VoteApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{MessageBody, TallyMap, VoteRequest};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode};

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

pub struct HttpVoteApi {
    http: Client,
    results_url: String,
    vote_url: String,
    reset_url: String,
}

impl HttpVoteApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            results_url: config.endpoint(&config.results_path),
            vote_url: config.endpoint(&config.vote_path),
            reset_url: config.endpoint(&config.reset_path),
        })
    }
}

#[async_trait]
impl VoteApi for HttpVoteApi {
    async fn fetch_results(&self) -> Result<TallyMap, ClientError> {
        debug!("GET {}", self.results_url);
        let response = self.http.get(&self.results_url).send().await.map_err(transport)?;
        let body = success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Malformed(e.to_string()))
    }

    async fn submit_vote(&self, vote: &VoteRequest) -> Result<MessageBody, ClientError> {
        debug!("POST {} candidate={}", self.vote_url, vote.candidate);
        let response = self
            .http
            .post(&self.vote_url)
            .json(vote)
            .send()
            .await
            .map_err(transport)?;
        let body = success_body(response).await?;
        Ok(parse_message(&body))
    }

    async fn reset(&self, admin_key: Option<&str>) -> Result<MessageBody, ClientError> {
        debug!("POST {} (admin key {})", self.reset_url, if admin_key.is_some() { "present" } else { "absent" });
        let mut request = self.http.post(&self.reset_url);
        if let Some(key) = admin_key {
            request = request.header(ADMIN_KEY_HEADER, key);
        }
        let response = request.send().await.map_err(transport)?;
        let body = success_body(response).await?;
        Ok(parse_message(&body))
    }
}

fn transport(e: reqwest::Error) -> ClientError {
    ClientError::Transport(e.to_string())
}

// Returns the body text of a 2xx response, or the mapped status error otherwise.
async fn success_body(response: Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(status_error(status, &body))
    }
}

fn status_error(status: StatusCode, body: &str) -> ClientError {
    let message = parse_message(body).message;
    if status == StatusCode::UNAUTHORIZED {
        ClientError::Unauthorized { message }
    } else {
        ClientError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

// Success and error bodies are both optional `{message}` objects; anything else reads as empty.
fn parse_message(body: &str) -> MessageBody {
    serde_json::from_str(body).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    // Answers a single request with a canned response and hands back the raw request
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (HttpVoteApi, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        let config = ClientConfig {
            base_url: format!("http://{}", addr),
            ..ClientConfig::default()
        };
        (HttpVoteApi::new(&config).unwrap(), server)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn request_body(request: &str) -> &str {
        request.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or("")
    }

    fn has_header(request: &str, name: &str) -> bool {
        request
            .lines()
            .filter_map(|line| line.split_once(':'))
            .any(|(header, _)| header.trim().eq_ignore_ascii_case(name))
    }

    #[tokio::test]
    async fn reset_sends_admin_key_only_when_given() {
        let (api, server) = serve_once("200 OK", r#"{"message":"Votes reset"}"#).await;
        let reply = api.reset(Some("secret")).await.unwrap();
        assert_eq!(reply.message.as_deref(), Some("Votes reset"));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/reset "));
        assert!(request.to_lowercase().contains("x-admin-key: secret"));

        let (api, server) = serve_once("200 OK", "{}").await;
        api.reset(None).await.unwrap();
        let request = server.await.unwrap();
        assert!(!has_header(&request, ADMIN_KEY_HEADER));
    }

    #[tokio::test]
    async fn vote_body_carries_voter_id_when_tracked() {
        let (api, server) = serve_once("200 OK", r#"{"message":"Vote recorded"}"#).await;
        let vote = VoteRequest {
            candidate: "a".to_string(),
            voter_id: Some("v-1".to_string()),
        };
        let reply = api.submit_vote(&vote).await.unwrap();
        assert_eq!(reply.message.as_deref(), Some("Vote recorded"));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/vote "));
        assert!(request.to_lowercase().contains("content-type: application/json"));
        let sent: serde_json::Value = serde_json::from_str(request_body(&request)).unwrap();
        assert_eq!(sent, serde_json::json!({"candidate": "a", "voter_id": "v-1"}));

        let (api, server) = serve_once("200 OK", "").await;
        let anonymous = VoteRequest {
            candidate: "b".to_string(),
            voter_id: None,
        };
        let reply = api.submit_vote(&anonymous).await.unwrap();
        assert_eq!(reply.message, None);
        let request = server.await.unwrap();
        let sent: serde_json::Value = serde_json::from_str(request_body(&request)).unwrap();
        assert_eq!(sent, serde_json::json!({"candidate": "b"}));
    }

    #[tokio::test]
    async fn results_that_are_not_json_are_malformed() {
        let (api, server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let err = api.fetch_results().await.unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/results "));
    }

    #[tokio::test]
    async fn results_parse_and_unauthorized_maps_over_the_wire() {
        let (api, server) = serve_once("200 OK", r#"{"a":3,"b":5}"#).await;
        let tally = api.fetch_results().await.unwrap();
        assert_eq!(tally.get("b"), Some(&5));
        server.await.unwrap();

        let (api, server) = serve_once(
            "401 Unauthorized",
            r#"{"message":"Unauthorized. Invalid Admin Key."}"#,
        )
        .await;
        let err = api.reset(Some("wrong")).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("Unauthorized. Invalid Admin Key."));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClientConfig {
            base_url: format!("http://{}", addr),
            ..ClientConfig::default()
        };
        let api = HttpVoteApi::new(&config).unwrap();
        let err = api.fetch_results().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn unauthorized_status_is_distinguished() {
        let err = status_error(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Unauthorized. Invalid Admin Key."}"#,
        );
        assert_eq!(
            err,
            ClientError::Unauthorized {
                message: Some("Unauthorized. Invalid Admin Key.".to_string())
            }
        );
    }

    #[test]
    fn other_statuses_keep_code_and_optional_message() {
        let err = status_error(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"message":"Voting service is currently unavailable."}"#,
        );
        assert_eq!(err.server_message(), Some("Voting service is currently unavailable."));
        assert!(matches!(err, ClientError::Status { status: 503, .. }));

        let err = status_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(
            err,
            ClientError::Status {
                status: 502,
                message: None
            }
        );
    }

    #[test]
    fn endpoints_are_joined_from_config() {
        let config = ClientConfig {
            base_url: "http://vote.local".to_string(),
            ..ClientConfig::default()
        };
        let api = HttpVoteApi::new(&config).unwrap();
        assert_eq!(api.results_url, "http://vote.local/api/results");
        assert_eq!(api.vote_url, "http://vote.local/api/vote");
        assert_eq!(api.reset_url, "http://vote.local/api/reset");
    }
}
