mod aggregate;
mod choice;
mod effect;
mod image;
mod vote_request;

pub use aggregate::{Aggregate, EffectId, Ratings, UserVotes};
pub use choice::Choice;
pub use effect::{Effect, ImageCount};
pub use image::{GeneratedImage, UploadedImage, ACCEPTED_MIME_TYPES, MIME_JPEG, MIME_PNG};
pub use vote_request::VoteRequest;
