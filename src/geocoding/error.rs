use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding API key not configured")]
    MissingApiKey,

    #[error("geocoding request failed: {message}")]
    Transport { message: String },

    #[error("geocoding endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("failed to decode geocoding response: {message}")]
    Decode { message: String },
}

impl GeocodeError {
    /// Setup problems that say nothing about the company being looked up.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GeocodeError::MissingApiKey)
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GeocodeError::Decode {
                message: err.to_string(),
            }
        } else {
            GeocodeError::Transport {
                message: err.to_string(),
            }
        }
    }
}
