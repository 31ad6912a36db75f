use thiserror::Error;

use crate::model::{LessonError, ParseIdError, StepError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}
