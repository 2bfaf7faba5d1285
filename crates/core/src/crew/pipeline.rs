//! # Pipeline Stages
//!
//! Per-paper state machine: read, review, research, write.

use serde::{Deserialize, Serialize};

/// Stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reader extracting the summary
    Reading,
    /// Reviewer correcting the summary
    Reviewing,
    /// Researcher gathering web context
    Researching,
    /// Writer drafting the article
    Writing,
    /// Complete
    Complete,
    /// Failed
    Failed,
}

/// The pipeline state machine for one paper
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Current stage
    pub stage: PipelineStage,
    /// Review passes that left violations behind
    pub review_rejections: u32,
    /// Maximum review passes; 0 skips the reviewer
    pub max_review_passes: u32,
    /// Whether the research stage runs
    pub research_enabled: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            stage: PipelineStage::Reading,
            review_rejections: 0,
            max_review_passes: 1,
            research_enabled: true,
        }
    }
}

impl Pipeline {
    pub fn new(max_review_passes: u32, research_enabled: bool) -> Self {
        Self {
            max_review_passes,
            research_enabled,
            ..Self::default()
        }
    }

    /// Advance to the next stage
    pub fn advance(&mut self) {
        self.stage = match self.stage {
            PipelineStage::Reading if self.max_review_passes > 0 => PipelineStage::Reviewing,
            PipelineStage::Reading | PipelineStage::Reviewing => {
                if self.research_enabled {
                    PipelineStage::Researching
                } else {
                    PipelineStage::Writing
                }
            }
            PipelineStage::Researching => PipelineStage::Writing,
            PipelineStage::Writing => PipelineStage::Complete,
            PipelineStage::Complete => PipelineStage::Complete,
            PipelineStage::Failed => PipelineStage::Failed,
        };
    }

    /// A review pass left violations. Returns true when another pass is allowed.
    ///
    /// When passes are exhausted the stage is left untouched; the caller
    /// advances and reports what remains.
    pub fn reject(&mut self) -> bool {
        self.review_rejections += 1;
        if self.review_rejections >= self.max_review_passes {
            false
        } else {
            self.stage = PipelineStage::Reviewing;
            true
        }
    }

    /// Fail the pipeline
    pub fn fail(&mut self) {
        self.stage = PipelineStage::Failed;
    }

    /// Check if pipeline is complete
    pub fn is_complete(&self) -> bool {
        matches!(self.stage, PipelineStage::Complete | PipelineStage::Failed)
    }

    /// Check if pipeline succeeded
    pub fn is_success(&self) -> bool {
        self.stage == PipelineStage::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_advance() {
        let mut pipeline = Pipeline::new(1, true);
        assert_eq!(pipeline.stage, PipelineStage::Reading);

        pipeline.advance();
        assert_eq!(pipeline.stage, PipelineStage::Reviewing);

        pipeline.advance();
        assert_eq!(pipeline.stage, PipelineStage::Researching);

        pipeline.advance();
        assert_eq!(pipeline.stage, PipelineStage::Writing);

        pipeline.advance();
        assert!(pipeline.is_success());
    }

    #[test]
    fn test_research_disabled_goes_straight_to_writing() {
        let mut pipeline = Pipeline::new(1, false);
        pipeline.advance();
        pipeline.advance();
        assert_eq!(pipeline.stage, PipelineStage::Writing);
    }

    #[test]
    fn test_zero_passes_skips_review() {
        let mut pipeline = Pipeline::new(0, false);
        pipeline.advance();
        assert_eq!(pipeline.stage, PipelineStage::Writing);
    }

    #[test]
    fn test_review_rejection_loop() {
        let mut pipeline = Pipeline::new(3, true);
        pipeline.stage = PipelineStage::Reviewing;

        assert!(pipeline.reject());
        assert_eq!(pipeline.stage, PipelineStage::Reviewing);
        assert!(pipeline.reject());

        // Third pass is the last one
        assert!(!pipeline.reject());
        assert_eq!(pipeline.stage, PipelineStage::Reviewing);
        pipeline.advance();
        assert_eq!(pipeline.stage, PipelineStage::Researching);
    }

    #[test]
    fn test_single_pass_never_loops() {
        let mut pipeline = Pipeline::new(1, true);
        pipeline.stage = PipelineStage::Reviewing;
        assert!(!pipeline.reject());
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut pipeline = Pipeline::new(1, true);
        pipeline.fail();
        pipeline.advance();
        assert!(pipeline.is_complete());
        assert!(!pipeline.is_success());
    }
}
