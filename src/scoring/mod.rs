//! Score fusion.
//!
//! Each channel contributes its single best match (from its first few results),
//! normalized to `[0, 1]`. The overall score is the larger of the two, passed
//! through [`calibrate`]: weak evidence below `0.5` is damped to a fifth so that
//! incidental overlap does not read as plagiarism, while anything at or above
//! `0.5` is reported as-is. Per-channel breakdowns are weighted but never feed
//! back into the overall score.

pub mod fusion;
pub mod types;


pub use fusion::{ScoreFusion, calibrate, channel_max};
pub use types::FusedScore;
