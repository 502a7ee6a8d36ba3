use log::debug;
use reqwest::{Client, Response, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::transport::{Transport, TransportError, TransportFuture};

/// Body of the job creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitRequest {
    pub prompt: String,
    pub negative_prompt: String,
    #[serde(rename = "modelId")]
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub num_images: u32,
    pub guidance_scale: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(
        rename = "sdGenerationJob",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sd_generation_job: Option<SdGenerationJob>,

    /// Anything else the service sent, kept for error reports.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SdGenerationJob {
    #[serde(rename = "generationId", default)]
    pub generation_id: Option<String>,
}

impl SubmitResponse {
    pub fn generation_id(&self) -> Option<&str> {
        self.sd_generation_job
            .as_ref()?
            .generation_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub generations_by_pk: Option<GenerationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct GenerationRecord {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub generated_images: Option<Vec<GeneratedImage>>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub nsfw: Option<bool>,
}

pub fn generation_url(endpoint: &str, generation_id: &str) -> String {
    format!("{}/{generation_id}", endpoint.trim_end_matches('/'))
}

/// [`Transport`] speaking to the Leonardo REST API over reqwest.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl Transport for HttpTransport {
    fn submit<'a>(
        &'a self,
        endpoint: &'a str,
        api_key: &'a str,
        body: &'a SubmitRequest,
    ) -> TransportFuture<'a, SubmitResponse> {
        Box::pin(async move {
            let request = self
                .client
                .post(endpoint)
                .header(header::ACCEPT, "application/json")
                .bearer_auth(api_key)
                .json(body);
            debug!("Submitting generation: {body:#?}");
            read_json(request.send().await?).await
        })
    }

    fn fetch_generation<'a>(
        &'a self,
        endpoint: &'a str,
        api_key: &'a str,
        generation_id: &'a str,
    ) -> TransportFuture<'a, PollResponse> {
        Box::pin(async move {
            let resp = self
                .client
                .get(generation_url(endpoint, generation_id))
                .header(header::ACCEPT, "application/json")
                .bearer_auth(api_key)
                .send()
                .await?;
            read_json(resp).await
        })
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, TransportError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|source| TransportError::Decode { source, body })
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    #[test]
    fn request_serialization() {
        let body = SubmitRequest {
            prompt: "(a fox), comic style art illustration style, high quality, detailed".into(),
            negative_prompt: "blurry".into(),
            model_id: "model".into(),
            width: 512,
            height: 512,
            num_images: 1,
            guidance_scale: 7,
        };

        let expect = expect![[r#"{"prompt":"(a fox), comic style art illustration style, high quality, detailed","negative_prompt":"blurry","modelId":"model","width":512,"height":512,"num_images":1,"guidance_scale":7}"#]];
        expect.assert_eq(&serde_json::to_string(&body).unwrap());
    }

    #[test]
    fn submit_response_finds_generation_id() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"sdGenerationJob":{"generationId":"abc-123","apiCreditCost":5}}"#)
                .unwrap();
        assert_eq!(resp.generation_id(), Some("abc-123"));
    }

    #[test]
    fn submit_response_keeps_unknown_fields() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"error":"Invalid API key","code":"unauthorized"}"#).unwrap();
        assert_eq!(resp.generation_id(), None);

        let expect = expect![[r#"{"code":"unauthorized","error":"Invalid API key"}"#]];
        expect.assert_eq(&serde_json::to_string(&resp).unwrap());
    }

    #[test]
    fn empty_generation_id_is_missing() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"sdGenerationJob":{"generationId":""}}"#).unwrap();
        assert_eq!(resp.generation_id(), None);
    }

    #[test]
    fn poll_response_tolerates_sparse_records() {
        let resp: PollResponse = serde_json::from_str(r#"{"generations_by_pk":null}"#).unwrap();
        assert!(resp.generations_by_pk.is_none());

        let resp: PollResponse =
            serde_json::from_str(r#"{"generations_by_pk":{"status":"PENDING","generated_images":null}}"#)
                .unwrap();
        let record = resp.generations_by_pk.unwrap();
        assert_eq!(record.status.as_deref(), Some("PENDING"));
        assert!(record.generated_images.is_none());
    }

    #[test]
    fn poll_response_reads_images() {
        let resp: PollResponse = serde_json::from_str(
            r#"{"generations_by_pk":{"status":"COMPLETE","generated_images":[
                {"url":"https://cdn/x.jpg","nsfw":false,"id":"img-1","likeCount":0}
            ]}}"#,
        )
        .unwrap();
        let images = resp.generations_by_pk.unwrap().generated_images.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url.as_deref(), Some("https://cdn/x.jpg"));
        assert_eq!(images[0].id.as_deref(), Some("img-1"));
        assert_eq!(images[0].nsfw, Some(false));
    }

    #[test]
    fn poll_response_accepts_null_url() {
        let resp: PollResponse = serde_json::from_str(
            r#"{"generations_by_pk":{"status":"COMPLETE","generated_images":[{"url":null},{}]}}"#,
        )
        .unwrap();
        let images = resp.generations_by_pk.unwrap().generated_images.unwrap();
        assert!(images.iter().all(|img| img.url.is_none()));
    }

    fn response(status: u16, body: &'static str) -> Response {
        Response::from(
            http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn error_status_keeps_body_as_payload() {
        let err = read_json::<SubmitResponse>(response(401, r#"{"error":"bad key"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 401, .. }));
        assert_eq!(err.payload(), Some(r#"{"error":"bad key"}"#));
        assert_eq!(err.to_string(), r#"Remote returned 401: {"error":"bad key"}"#);
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let err = read_json::<PollResponse>(response(200, "not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
        assert_eq!(err.payload(), Some("not json"));
    }

    #[tokio::test]
    async fn success_body_decodes() {
        let resp = read_json::<SubmitResponse>(response(
            201,
            r#"{"sdGenerationJob":{"generationId":"g-7"}}"#,
        ))
        .await
        .unwrap();
        assert_eq!(resp.generation_id(), Some("g-7"));
    }

    #[test]
    fn generation_url_joins_cleanly() {
        assert_eq!(
            generation_url("https://cloud.leonardo.ai/api/rest/v1/generations", "g1"),
            "https://cloud.leonardo.ai/api/rest/v1/generations/g1"
        );
        assert_eq!(generation_url("http://host/gen/", "g1"), "http://host/gen/g1");
    }
}
