use crate::parser::candidate::CandidateId;

/// Failures on the way from an image to a list of candidates.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error("Failed to process image: {0}. Please try again with a clearer photo.")]
    OcrUnavailable(String),

    #[error("No text was found in the image. Please try again with a clearer photo.")]
    NoTextFound,
}

/// Failures of a review session operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("No joke with id {0}")]
    NotFound(CandidateId),

    #[error("No jokes selected")]
    NothingSelected,

    #[error("Review session is already closed")]
    SessionClosed,
}
