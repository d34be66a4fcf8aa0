pub mod pipeline;
pub mod resolve;
pub mod summarize;

pub use pipeline::Pipeline;
pub use resolve::ContentResolver;
pub use summarize::SummaryGenerator;
