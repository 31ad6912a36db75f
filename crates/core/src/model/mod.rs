mod answer;
pub mod facet;
mod ids;
mod lesson;
mod profile;
mod progress;
mod section;
mod session;
mod step;
pub mod week;

pub use answer::Answer;
pub use facet::{Facet, FacetOption, Facets};
pub use ids::{LessonId, ParseIdError, UserId};
pub use lesson::{Lesson, LessonError, PlanPlacement};
pub use profile::{Profile, ProfileUpdate};
pub use progress::ProgressRecord;
pub use section::{LessonSection, SectionKind, completion_percent};
pub use session::AuthSession;
pub use step::{OnboardingStep, StepCatalog, StepError, StepKind};
pub use week::WeekInfo;
