pub mod db;
pub mod flashcards_llm;

pub use db::DbAdapter;
pub use flashcards_llm::OpenAiFlashcardAdapter;
