mod evaluate;
pub use evaluate::EvaluateApp;

mod lexicon;
pub use lexicon::LexiconApp;

mod open_class;
pub use open_class::OpenClassApp;

mod prepare;
pub use prepare::PrepareApp;

mod reformat;
pub use reformat::ReformatApp;

mod stats;
pub use stats::StatsApp;

mod tag;
pub use tag::TagApp;
