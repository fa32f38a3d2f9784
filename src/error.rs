use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Error while retrieving data from: {url}")]
    Connection { url: String },

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },
}
