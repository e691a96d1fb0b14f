use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceApiError {
    #[error("Price API middleware error")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    #[error("Price API request error")]
    RequestError(#[from] reqwest::Error),
    #[error("Price API returned undecodable JSON")]
    DecodeError(#[from] serde_json::Error),
}
