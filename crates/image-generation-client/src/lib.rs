//! Text-to-image clients.
//!
//! FusionBrain and Kandinsky generate asynchronously: a job is submitted, then its status is polled
//! ([`Poller`]) until it finishes, fails or runs out of attempts. DALL-E answers synchronously.
//! Either way the returned artifacts (URLs or base64) are resolved into [`GeneratedImage`]s.

pub mod artifacts;
pub mod config;
pub mod dalle;
pub mod error;
pub mod generator;
pub mod job;
pub mod poller;
pub mod providers;
pub mod request;
pub mod sleeper;

pub use artifacts::{ArtifactError, ArtifactResolver, GeneratedImage};
pub use config::{mask_token, ImageGenConfig, ProviderKind};
pub use dalle::DalleGenerator;
pub use error::{GenerationError, Result, TransportError};
pub use generator::{build_generator, ImageGenerator, PollingGenerator};
pub use job::{Artifact, JobHandle, PollOutcome, PollResult};
pub use poller::{PollPolicy, PollState, Poller};
pub use providers::{FusionBrainProvider, JobProvider, KandinskyProvider};
pub use request::GenerationRequest;
pub use sleeper::{Sleeper, TokioSleeper};
