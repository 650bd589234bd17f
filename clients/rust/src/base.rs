use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

pub(crate) struct BaseClient {
    address: String,
    api_key: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum APIErrorVariant {
    Network,
    MalformedResponse,
    Unauthorized,
    BadClientData,
    NotFound,
    UnexpectedStatusCode(StatusCode),
}

#[derive(Debug)]
pub struct APIError {
    pub variant: APIErrorVariant,
    pub message: String,
}

pub type APIResponse<T> = Result<T, APIError>;

impl BaseClient {
    pub fn new(address: String) -> Self {
        Self {
            address,
            api_key: None,
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    fn get_client(&self, method: Method, path: String) -> RequestBuilder {
        let client = Client::new();
        let url = format!("{}/{}", self.address, path);
        let builder = client.request(method, &url);

        if let Some(api_key) = &self.api_key {
            builder.header("capsule-scheduler-key", api_key.clone())
        } else {
            builder
        }
    }

    async fn check_status_code(
        &self,
        res: Response,
        expected_status_code: StatusCode,
    ) -> Result<Response, APIError> {
        let status = res.status();
        if status == expected_status_code {
            return Ok(res);
        }

        let variant = match status {
            StatusCode::UNAUTHORIZED => APIErrorVariant::Unauthorized,
            StatusCode::BAD_REQUEST => APIErrorVariant::BadClientData,
            StatusCode::NOT_FOUND => APIErrorVariant::NotFound,
            _ => APIErrorVariant::UnexpectedStatusCode(status),
        };
        Err(APIError {
            variant,
            message: res.text().await.unwrap_or_default(),
        })
    }

    async fn get_json_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
    ) -> APIResponse<T> {
        res.json::<T>().await.map_err(|e| APIError {
            variant: APIErrorVariant::MalformedResponse,
            message: e.to_string(),
        })
    }

    async fn handle_api_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Result<Response, reqwest::Error>,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = res.map_err(|e| APIError {
            variant: APIErrorVariant::Network,
            message: e.to_string(),
        })?;
        let res = self.check_status_code(res, expected_status_code).await?;
        self.get_json_response(res).await
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self.get_client(Method::GET, path).send().await;
        self.handle_api_response(res, expected_status_code).await
    }

    pub async fn post<T: for<'de> Deserialize<'de>, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self.get_client(Method::POST, path).json(&body).send().await;
        self.handle_api_response(res, expected_status_code).await
    }
}
